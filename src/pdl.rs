//! PDL property set and the `ProductClient` transport.

use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use crate::config::PdlConfig;
use crate::constants::PRODUCT_TYPE;
use crate::event::EventId;
use crate::util::count_files;

/// Everything the transport needs to address one finite-fault product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdlProperties {
    pub java: String,
    pub jarfile: String,
    pub privatekey: String,
    pub configfile: String,
    /// Network contributing the product.
    pub source: String,
    pub eventsource: String,
    pub eventsourcecode: String,
    /// `eventsource + eventsourcecode`, plus `_<n>` for numbered models.
    pub code: String,
    pub product_type: String,
}

impl PdlProperties {
    pub fn new(pdl: &PdlConfig, event: &EventId, product_source: &str) -> Self {
        Self {
            java: pdl.java.display().to_string(),
            jarfile: pdl.jarfile.display().to_string(),
            privatekey: pdl.privatekey.display().to_string(),
            configfile: pdl.configfile.display().to_string(),
            source: product_source.to_string(),
            eventsource: event.source.clone(),
            eventsourcecode: event.code.clone(),
            code: event.id(),
            product_type: PRODUCT_TYPE.to_string(),
        }
    }

    /// Appends the model suffix to the product code.
    pub fn append_model(&mut self, number: u32) {
        self.code.push_str(&format!("_{}", number));
    }

    /// Flat key/value view of the property set.
    pub fn to_map(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("java", self.java.clone()),
            ("jarfile", self.jarfile.clone()),
            ("privatekey", self.privatekey.clone()),
            ("configfile", self.configfile.clone()),
            ("source", self.source.clone()),
            ("eventsource", self.eventsource.clone()),
            ("eventsourcecode", self.eventsourcecode.clone()),
            ("code", self.code.clone()),
            ("type", self.product_type.clone()),
        ])
    }
}

/// Publishes and withdraws products.
pub trait Transport {
    /// Sends every file under `directory` as a new product revision.
    /// Returns the number of files sent and the transport's status message.
    fn send(
        &self,
        props: &PdlProperties,
        directory: &Path,
        product_properties: &BTreeMap<String, String>,
    ) -> Result<(usize, String)>;

    /// Withdraws the product addressed by `props`.
    fn cancel(&self, props: &PdlProperties) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Update,
    Delete,
}

impl Action {
    fn status(self) -> &'static str {
        match self {
            Action::Update => "UPDATE",
            Action::Delete => "DELETE",
        }
    }
}

/// Runs the PDL Java `ProductClient` as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdlSender;

impl PdlSender {
    pub fn new() -> Self {
        Self
    }

    fn arguments(
        &self,
        action: Action,
        props: &PdlProperties,
        directory: Option<&Path>,
        product_properties: &BTreeMap<String, String>,
    ) -> Vec<String> {
        let mut args = vec![
            "-jar".to_string(),
            props.jarfile.clone(),
            "--send".to_string(),
            format!("--status={}", action.status()),
            format!("--configFile={}", props.configfile),
            format!("--privateKey={}", props.privatekey),
            format!("--source={}", props.source),
            format!("--type={}", props.product_type),
            format!("--code={}", props.code),
            format!("--eventsource={}", props.eventsource),
            format!("--eventsourcecode={}", props.eventsourcecode),
        ];
        if let Some(dir) = directory {
            args.push(format!("--directory={}", dir.display()));
        }
        for (k, v) in product_properties {
            args.push(format!("--property-{}={}", k, v));
        }
        args
    }

    fn run(&self, props: &PdlProperties, args: &[String]) -> Result<String> {
        debug!(java = %props.java, ?args, "running PDL ProductClient");

        let output = Command::new(&props.java)
            .args(args)
            .output()
            .with_context(|| format!("failed to run {}", props.java))?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            bail!(
                "PDL ProductClient failed for {} ({}):\n{}\n{}",
                props.code,
                output.status,
                stderr,
                stdout
            );
        }
        Ok(stdout)
    }
}

impl Transport for PdlSender {
    fn send(
        &self,
        props: &PdlProperties,
        directory: &Path,
        product_properties: &BTreeMap<String, String>,
    ) -> Result<(usize, String)> {
        if !directory.is_dir() {
            bail!("Local directory {} does not exist.", directory.display());
        }
        let nfiles = count_files(directory)
            .with_context(|| format!("failed to list {}", directory.display()))?;

        let args = self.arguments(Action::Update, props, Some(directory), product_properties);
        let stdout = self.run(props, &args)?;

        info!(code = %props.code, nfiles, "product sent");
        Ok((
            nfiles,
            format!(
                "{} files sent successfully: resulting in output: '{}'",
                nfiles, stdout
            ),
        ))
    }

    fn cancel(&self, props: &PdlProperties) -> Result<String> {
        let args = self.arguments(Action::Delete, props, None, &BTreeMap::new());
        let stdout = self.run(props, &args)?;

        info!(code = %props.code, "delete sent");
        Ok(format!(
            "Product {} was successfully deleted: resulting in output: '{}'",
            props.code, stdout
        ))
    }
}
