//! Retrieve, send and cancel USGS finite-fault products.
//!
//! Products are fetched from the ComCat event service and published or
//! withdrawn through the PDL Java `ProductClient`:
//! - [`get_fault`] looks up the latest finite-fault revision of an event (or
//!   both models of a two-solution product) and can download its files.
//! - [`store_fault`] sends a directory of files as a new revision.
//! - [`delete_fault`] cancels a product.
//!
//! The operations talk to the outside world through the [`Catalog`] and
//! [`Transport`] traits; [`ComcatClient`] and [`PdlSender`] are the production
//! implementations.
//!
//! ```no_run
//! use anyhow::Result;
//! use finite_fault_product::{ComcatClient, EventId, get_fault};
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let comcat = ComcatClient::from_default_host()?;
//!     let event = EventId::new("us", "1000abcd");
//!     let retrieved = get_fault(&comcat, &event, false, Some(Path::new("ffm")))?;
//!     println!("wrote {:?}", retrieved.directories);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

pub mod cli;
mod comcat;
mod config;
pub mod constants;
mod error;
mod event;
mod fault;
pub mod logging;
mod pdl;
mod time;
mod util;

pub use comcat::ComcatClient;
pub use config::{PdlConfig, PdlOverrides, load_comcat_host, load_pdl_config};
pub use error::FaultError;
pub use event::{Catalog, Content, EventDetail, EventId, ProductRevision};
pub use fault::{Retrieved, delete_fault, get_fault, get_fault_at, store_fault};
pub use pdl::{PdlProperties, PdlSender, Transport};
pub use time::{directory_stamp, get_date};
