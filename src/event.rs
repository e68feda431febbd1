use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Network code plus network-local event code, e.g. `us` + `1000abcd`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventId {
    pub source: String,
    pub code: String,
}

impl EventId {
    pub fn new(source: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            code: code.into(),
        }
    }

    /// Catalog identifier (`source + code`).
    pub fn id(&self) -> String {
        format!("{}{}", self.source, self.code)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source, self.code)
    }
}

/// One downloadable file attached to a product revision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub last_modified: i64,
    #[serde(default)]
    pub length: u64,
    /// Empty for inline content, which ComCat ships as `bytes` instead.
    #[serde(default)]
    pub url: String,
}

/// A single version of a product as listed in the ComCat detail feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRevision {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub code: String,
    pub source: String,
    #[serde(default)]
    pub status: String,
    /// Milliseconds since the Unix epoch.
    pub update_time: i64,
    #[serde(default)]
    pub preferred_weight: i64,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub contents: BTreeMap<String, Content>,
}

impl ProductRevision {
    /// Model number encoded in the product code (`us1000abcd_2` -> 2).
    pub fn model_number(&self) -> Option<u32> {
        let (_, suffix) = self.code.rsplit_once('_')?;
        suffix.parse().ok()
    }
}

/// An event and every product attached to it, keyed by product type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDetail {
    pub id: String,
    pub products: BTreeMap<String, Vec<ProductRevision>>,
}

impl EventDetail {
    pub fn has_product(&self, kind: &str) -> bool {
        self.products.get(kind).is_some_and(|p| !p.is_empty())
    }

    /// All revisions of `kind`, in feed order.
    pub fn products(&self, kind: &str) -> &[ProductRevision] {
        self.products.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The authoritative revision of `kind`: highest preferred weight, then most
    /// recent update. Ties keep the later entry.
    pub fn preferred_product(&self, kind: &str) -> Option<&ProductRevision> {
        self.products(kind).iter().fold(None, |best, p| match best {
            Some(b)
                if (b.preferred_weight, b.update_time) > (p.preferred_weight, p.update_time) =>
            {
                Some(b)
            }
            _ => Some(p),
        })
    }
}

/// Read access to an earthquake catalog.
pub trait Catalog {
    /// Looks up one event by its catalog id.
    fn event_by_id(&self, eventid: &str) -> Result<EventDetail>;

    /// Downloads `content` to `target`, returning the written path.
    fn download(&self, content: &Content, target: &Path) -> Result<PathBuf>;
}
