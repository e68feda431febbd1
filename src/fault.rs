//! Send, fetch and cancel finite-fault products.
//!
//! The operations only marshal parameters and name files; everything that
//! touches the network goes through a [`Catalog`] or a [`Transport`], and their
//! errors are returned exactly as produced.

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::PdlConfig;
use crate::constants::PRODUCT_TYPE;
use crate::error::FaultError;
use crate::event::{Catalog, EventId, ProductRevision};
use crate::pdl::{PdlProperties, Transport};
use crate::time::{directory_stamp, get_date};
use crate::util::base_filename;

/// Outcome of [`get_fault`].
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieved {
    /// The selected revision, or the `_1` and `_2` revisions in that order.
    pub models: Vec<ProductRevision>,
    /// Directories files were written to, parallel to `models`. Empty when no
    /// write directory was given.
    pub directories: Vec<PathBuf>,
}

/// Cancels a finite-fault product.
///
/// A two-solution product needs the model `number` to address one of its
/// models; without it this fails before the transport is contacted. The number
/// is ignored for single-solution products.
pub fn delete_fault<T>(
    transport: &T,
    pdl: &PdlConfig,
    event: &EventId,
    product_source: &str,
    two_solution: bool,
    number: Option<u32>,
) -> Result<String>
where
    T: Transport + ?Sized,
{
    let mut props = PdlProperties::new(pdl, event, product_source);
    if two_solution {
        match number {
            Some(n) => props.append_model(n),
            None => return Err(FaultError::MissingModelNumber.into()),
        }
    }
    transport.cancel(&props)
}

/// Retrieves the latest finite-fault revision(s) of an event, downloading their
/// contents below `write_directory` when one is given.
pub fn get_fault<C>(
    catalog: &C,
    event: &EventId,
    two_model: bool,
    write_directory: Option<&Path>,
) -> Result<Retrieved>
where
    C: Catalog + ?Sized,
{
    get_fault_at(catalog, event, two_model, write_directory, Utc::now())
}

/// [`get_fault`] with the directory timestamp fixed to `now`.
pub fn get_fault_at<C>(
    catalog: &C,
    event: &EventId,
    two_model: bool,
    write_directory: Option<&Path>,
    now: DateTime<Utc>,
) -> Result<Retrieved>
where
    C: Catalog + ?Sized,
{
    let eventid = event.id();
    let detail = catalog.event_by_id(&eventid)?;
    if !detail.has_product(PRODUCT_TYPE) {
        return Err(FaultError::NoFiniteFault(eventid).into());
    }

    let models = if two_model {
        let (mod1, mod2) = select_two_models(&eventid, detail.products(PRODUCT_TYPE))?;
        vec![mod1, mod2]
    } else {
        let latest = detail
            .preferred_product(PRODUCT_TYPE)
            .cloned()
            .ok_or_else(|| FaultError::NoFiniteFault(eventid.clone()))?;
        vec![latest]
    };

    let Some(write_directory) = write_directory else {
        return Ok(Retrieved {
            models,
            directories: Vec::new(),
        });
    };

    let stamp = directory_stamp(now);
    let names: Vec<String> = if two_model {
        vec![
            format!("{}_1_{}", eventid, stamp),
            format!("{}_2_{}", eventid, stamp),
        ]
    } else {
        vec![format!("{}_{}", eventid, stamp)]
    };

    let mut directories = Vec::with_capacity(names.len());
    for (model, name) in models.iter().zip(names) {
        let dir = write_directory.join(name);
        std::fs::create_dir_all(&dir)?;
        download_contents(catalog, model, &dir)?;
        directories.push(dir);
    }

    Ok(Retrieved {
        models,
        directories,
    })
}

/// Sends the files in `directory` as a finite-fault product.
///
/// When `reviewed` is set, `review-status = reviewed` is inserted into
/// `properties` in place, so the caller's map reflects exactly what was sent.
#[allow(clippy::too_many_arguments)]
pub fn store_fault<T>(
    transport: &T,
    pdl: &PdlConfig,
    event: &EventId,
    directory: &Path,
    product_source: &str,
    properties: &mut BTreeMap<String, String>,
    reviewed: bool,
    number: Option<u32>,
) -> Result<(usize, String)>
where
    T: Transport + ?Sized,
{
    let mut props = PdlProperties::new(pdl, event, product_source);
    if reviewed {
        properties.insert("review-status".to_string(), "reviewed".to_string());
    }
    if let Some(n) = number {
        props.append_model(n);
    }
    transport.send(&props, directory, properties)
}

/// Picks the newest `_1` and `_2` revisions. Entries are visited in feed order
/// and a revision replaces the current pick when it is at least as recent.
pub(crate) fn select_two_models(
    eventid: &str,
    revisions: &[ProductRevision],
) -> Result<(ProductRevision, ProductRevision)> {
    let mut mod1: Option<(DateTime<Local>, &ProductRevision)> = None;
    let mut mod2: Option<(DateTime<Local>, &ProductRevision)> = None;

    for prod in revisions {
        let slot = if prod.code.ends_with("_1") {
            &mut mod1
        } else if prod.code.ends_with("_2") {
            &mut mod2
        } else {
            continue;
        };
        let updated = get_date(prod.update_time as f64)?;
        if slot.as_ref().is_none_or(|(latest, _)| updated >= *latest) {
            *slot = Some((updated, prod));
        }
    }

    match (mod1, mod2) {
        (Some((_, m1)), Some((_, m2))) => Ok((m1.clone(), m2.clone())),
        _ => Err(FaultError::ModelsNotFound(eventid.to_string()).into()),
    }
}

fn download_contents<C>(catalog: &C, model: &ProductRevision, dir: &Path) -> Result<()>
where
    C: Catalog + ?Sized,
{
    for (name, content) in &model.contents {
        let Some(filename) = base_filename(name) else {
            continue;
        };
        catalog.download(content, &dir.join(filename))?;
    }
    Ok(())
}
