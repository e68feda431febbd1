//! Arguments shared by the `deleteproduct`, `getproduct` and `sendproduct` tools.

use anyhow::{Result, anyhow};
use clap::Args;
use std::path::PathBuf;

use crate::config::{PdlConfig, PdlOverrides, load_pdl_config};
use crate::event::EventId;

/// Event identity given as two positional arguments.
#[derive(Args, Debug, Clone)]
pub struct EventArgs {
    /// Network that originated the event (e.g. `us`)
    pub eventsource: String,

    /// Event code from the originating network (e.g. `1000abcd`)
    pub eventsourcecode: String,
}

impl EventArgs {
    pub fn event_id(&self) -> EventId {
        EventId::new(&self.eventsource, &self.eventsourcecode)
    }
}

/// PDL locations; anything omitted comes from the environment or `.ffproductrc`.
#[derive(Args, Debug, Clone, Default)]
pub struct PdlArgs {
    /// Java binary
    #[arg(long, value_name = "PATH")]
    pub java: Option<PathBuf>,

    /// PDL ProductClient.jar
    #[arg(long, value_name = "PATH")]
    pub jarfile: Option<PathBuf>,

    /// PDL private key
    #[arg(long, value_name = "PATH")]
    pub privatekey: Option<PathBuf>,

    /// PDL config file
    #[arg(long, value_name = "PATH")]
    pub configfile: Option<PathBuf>,
}

impl PdlArgs {
    pub fn resolve(self) -> Result<PdlConfig> {
        load_pdl_config(PdlOverrides {
            java: self.java,
            jarfile: self.jarfile,
            privatekey: self.privatekey,
            configfile: self.configfile,
        })
    }
}

/// Parses a `key=value` product property.
pub fn parse_property(s: &str) -> Result<(String, String)> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got {:?}", s))?;
    let k = k.trim();
    if k.is_empty() {
        return Err(anyhow!("empty property name in {:?}", s));
    }
    Ok((k.to_string(), v.trim().to_string()))
}
