use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::constants::DEFAULT_COMCAT_HOST;
use crate::error::format_comcat_error;
use crate::event::{Catalog, Content, EventDetail, ProductRevision};
use crate::util::{append_query, backoff, host_base_url, retriable_status, urljoin};

const EVENT_QUERY_PATH: &str = "fdsnws/event/1/query";

/// Blocking client for the ComCat FDSN event service.
#[derive(Debug, Clone)]
pub struct ComcatClient {
    base_url: String,

    timeout: Duration,
    retry_max: usize,
    sleep_max: Duration,
    progress: bool,

    http: HttpClient,
}

#[derive(Debug, serde::Deserialize)]
struct Feature {
    id: String,
    properties: FeatureProperties,
}

#[derive(Debug, serde::Deserialize)]
struct FeatureProperties {
    #[serde(default)]
    products: BTreeMap<String, Vec<ProductRevision>>,
}

impl ComcatClient {
    /// Creates a client for the public ComCat host.
    pub fn from_default_host() -> Result<Self> {
        Self::new(DEFAULT_COMCAT_HOST)
    }

    /// Creates a client for `host`.
    ///
    /// A bare host name is reached over https; a value that already carries a
    /// scheme (`http://127.0.0.1:8080`) is used as given.
    pub fn new(host: &str) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("finite-fault-product/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("finite-fault-product")),
        );

        let http = HttpClient::builder()
            .default_headers(default_headers)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: host_base_url(host),
            timeout: Duration::from_secs(60),
            retry_max: 3,
            sleep_max: Duration::from_secs(30),
            progress: false,
            http,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_max(mut self, retry_max: usize) -> Self {
        self.retry_max = retry_max.max(1);
        self
    }

    pub fn with_sleep_max(mut self, sleep_max: Duration) -> Self {
        self.sleep_max = sleep_max;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn event_url(&self, eventid: &str) -> String {
        append_query(
            &urljoin(&self.base_url, EVENT_QUERY_PATH),
            &[("eventid", eventid), ("format", "geojson")],
        )
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self.robust_request(|| self.http.get(url).timeout(self.timeout).send())?;

        let status = resp.status();
        let text = resp.text().unwrap_or_default();
        if !status.is_success() {
            return Err(format_comcat_error(status, url, &text));
        }

        serde_json::from_str::<T>(&text)
            .with_context(|| format!("failed to parse ComCat JSON (url={}, status={})", url, status))
    }

    fn robust_request<F>(&self, mut f: F) -> Result<Response>
    where
        F: FnMut() -> std::result::Result<Response, reqwest::Error>,
    {
        let mut tries = 0usize;
        let mut sleep = Duration::from_secs(1);
        loop {
            match f() {
                Ok(resp) => {
                    if retriable_status(resp.status().as_u16()) {
                        tries += 1;
                        if tries >= self.retry_max {
                            return Ok(resp);
                        }
                        warn!(status = %resp.status(), tries, "transient ComCat response, retrying");
                        thread::sleep(sleep);
                        sleep = backoff(sleep, self.sleep_max);
                        continue;
                    }
                    return Ok(resp);
                }
                Err(err) => {
                    tries += 1;
                    if tries >= self.retry_max {
                        return Err(err).context("could not connect to ComCat");
                    }
                    warn!(error = %err, tries, "ComCat request failed, retrying");
                    thread::sleep(sleep);
                    sleep = backoff(sleep, self.sleep_max);
                }
            }
        }
    }

    fn progress_bar(&self, total: u64) -> Result<Option<ProgressBar>> {
        if !self.progress {
            return Ok(None);
        }
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} {bytes}/{total_bytes} ({bytes_per_sec}) {wide_bar} {eta}",
            )?
            .progress_chars("=>-"),
        );
        Ok(Some(pb))
    }
}

impl Catalog for ComcatClient {
    fn event_by_id(&self, eventid: &str) -> Result<EventDetail> {
        let url = self.event_url(eventid);
        debug!(%url, "querying ComCat");

        let feature: Feature = self.get_json(&url)?;
        Ok(EventDetail {
            id: feature.id,
            products: feature.properties.products,
        })
    }

    fn download(&self, content: &Content, target: &Path) -> Result<PathBuf> {
        if content.url.is_empty() {
            bail!(
                "content for {} has no download url (inline content)",
                target.display()
            );
        }

        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
        }

        let resp =
            self.robust_request(|| self.http.get(&content.url).timeout(self.timeout).send())?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(format_comcat_error(status, &content.url, &text));
        }

        let total = resp.content_length().unwrap_or(content.length);
        let pb = self.progress_bar(total)?;
        let mut reader: Box<dyn Read> = match &pb {
            Some(pb) => Box::new(pb.wrap_read(resp)),
            None => Box::new(resp),
        };

        let mut out = File::create(target)
            .with_context(|| format!("failed to open {}", target.display()))?;
        let written = std::io::copy(&mut reader, &mut out).context("download interrupted")?;
        out.flush()?;

        if let Some(pb) = &pb {
            pb.finish_and_clear();
        }

        if written < content.length {
            bail!(
                "download failed: downloaded {} byte(s) out of {} for {}",
                written,
                content.length,
                content.url
            );
        }

        info!(path = %target.display(), bytes = written, "downloaded");
        Ok(target.to_path_buf())
    }
}
