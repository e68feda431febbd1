use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_COMCAT_HOST;

/// Locations the PDL `ProductClient` needs on every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdlConfig {
    /// Java binary, `java` on `PATH` unless configured.
    pub java: PathBuf,
    /// PDL `ProductClient.jar`.
    pub jarfile: PathBuf,
    /// Private key used to sign products.
    pub privatekey: PathBuf,
    /// PDL `config.ini`.
    pub configfile: PathBuf,
}

/// Values given explicitly, typically from the command line.
#[derive(Debug, Clone, Default)]
pub struct PdlOverrides {
    pub java: Option<PathBuf>,
    pub jarfile: Option<PathBuf>,
    pub privatekey: Option<PathBuf>,
    pub configfile: Option<PathBuf>,
}

#[derive(Debug, Default, PartialEq)]
struct RcConfig {
    java: Option<String>,
    jarfile: Option<String>,
    privatekey: Option<String>,
    configfile: Option<String>,
    comcat_host: Option<String>,
}

impl RcConfig {
    fn set(&mut self, key: &str, value: &str) {
        let slot = match key {
            "java" => &mut self.java,
            "jarfile" => &mut self.jarfile,
            "privatekey" => &mut self.privatekey,
            "configfile" => &mut self.configfile,
            "comcat_host" => &mut self.comcat_host,
            _ => return,
        };
        *slot = Some(value.to_string());
    }

    fn get(&self, key: &str) -> Option<&String> {
        match key {
            "java" => self.java.as_ref(),
            "jarfile" => self.jarfile.as_ref(),
            "privatekey" => self.privatekey.as_ref(),
            "configfile" => self.configfile.as_ref(),
            "comcat_host" => self.comcat_host.as_ref(),
            _ => None,
        }
    }
}

/// Resolves the PDL locations from (in order of precedence):
/// - explicit overrides
/// - `FFPRODUCT_JAVA`, `FFPRODUCT_JARFILE`, `FFPRODUCT_PRIVATEKEY`, `FFPRODUCT_CONFIGFILE`
/// - the first rc file found (`FFPRODUCT_RC`, `./.ffproductrc`, `~/.ffproductrc`)
pub fn load_pdl_config(overrides: PdlOverrides) -> Result<PdlConfig> {
    resolve_pdl_config(overrides, |k| std::env::var(k).ok(), &rc_candidates())
}

/// ComCat host from the argument, `FFPRODUCT_COMCAT_HOST`, the rc file, or the
/// public default.
pub fn load_comcat_host(host: Option<String>) -> Result<String> {
    if let Some(h) = host.or_else(|| std::env::var("FFPRODUCT_COMCAT_HOST").ok()) {
        return Ok(h);
    }
    let rc = first_rc(&rc_candidates())?;
    Ok(rc
        .comcat_host
        .unwrap_or_else(|| DEFAULT_COMCAT_HOST.to_string()))
}

fn resolve_pdl_config<E>(
    overrides: PdlOverrides,
    env: E,
    rc_candidates: &[PathBuf],
) -> Result<PdlConfig>
where
    E: Fn(&str) -> Option<String>,
{
    let mut rc: Option<RcConfig> = None;
    let mut lookup = |explicit: Option<PathBuf>, key: &str| -> Result<Option<PathBuf>> {
        if let Some(v) = explicit {
            return Ok(Some(v));
        }
        if let Some(v) = env(&format!("FFPRODUCT_{}", key.to_uppercase())) {
            return Ok(Some(PathBuf::from(v)));
        }
        if rc.is_none() {
            rc = Some(first_rc(rc_candidates)?);
        }
        Ok(rc
            .as_ref()
            .and_then(|cfg| cfg.get(key))
            .map(PathBuf::from))
    };

    let java = lookup(overrides.java, "java")?.unwrap_or_else(|| PathBuf::from("java"));
    let jarfile = lookup(overrides.jarfile, "jarfile")?;
    let privatekey = lookup(overrides.privatekey, "privatekey")?;
    let configfile = lookup(overrides.configfile, "configfile")?;

    Ok(PdlConfig {
        java,
        jarfile: require(jarfile, "jarfile", rc_candidates)?,
        privatekey: require(privatekey, "privatekey", rc_candidates)?,
        configfile: require(configfile, "configfile", rc_candidates)?,
    })
}

fn require(value: Option<PathBuf>, key: &str, rc_candidates: &[PathBuf]) -> Result<PathBuf> {
    match value {
        Some(v) => Ok(v),
        None => {
            let env_name = format!("FFPRODUCT_{}", key.to_uppercase());
            if !rc_candidates.is_empty() {
                bail!(
                    "Missing configuration: {} (pass --{}, set {} or put `{}:` in one of: {})",
                    key,
                    key,
                    env_name,
                    key,
                    rc_candidates
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            bail!(
                "Missing configuration: {} (pass --{}, set {} or create .ffproductrc)",
                key,
                key,
                env_name
            );
        }
    }
}

fn first_rc(rc_candidates: &[PathBuf]) -> Result<RcConfig> {
    for rc_path in rc_candidates {
        if rc_path.exists() {
            return read_rc(rc_path).with_context(|| {
                format!("failed to read configuration file {}", rc_path.display())
            });
        }
    }
    Ok(RcConfig::default())
}

fn read_rc(path: &Path) -> Result<RcConfig> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_rc(&text))
}

fn parse_rc(text: &str) -> RcConfig {
    let mut cfg = RcConfig::default();

    // Support formatting where `key:` is on one line and the value is on the next line.
    let mut pending_key: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(pk) = pending_key.take() {
            if !line.contains(':') || looks_like_path(line) {
                cfg.set(pk, strip_quotes(line));
                continue;
            }
        }

        if let Some((k, v)) = line.split_once(':') {
            let k = k.trim();
            let v = strip_quotes(v.trim());
            if v.is_empty() {
                pending_key = Some(k);
            } else {
                cfg.set(k, v);
            }
        }
    }

    cfg
}

// Windows paths (`C:\pdl\key`) contain a colon but are still plain values.
fn looks_like_path(line: &str) -> bool {
    let b = line.as_bytes();
    b.len() > 2 && b[0].is_ascii_alphabetic() && b[1] == b':' && (b[2] == b'\\' || b[2] == b'/')
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // 1) FFPRODUCT_RC (explicit)
    // 2) ./.ffproductrc
    // 3) ~/.ffproductrc
    if let Ok(p) = std::env::var("FFPRODUCT_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".ffproductrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".ffproductrc"));
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn rc_parses_inline_and_continued_values() {
        let cfg = parse_rc(
            "# pdl settings\n\
             java: /usr/bin/java\n\
             jarfile: \"/opt/pdl/ProductClient.jar\"\n\
             privatekey:\n\
             /opt/pdl/key\n\
             configfile: '/opt/pdl/config.ini'\n\
             comcat_host: dev-earthquake.cr.usgs.gov\n\
             unknown: ignored\n",
        );
        assert_eq!(cfg.java.as_deref(), Some("/usr/bin/java"));
        assert_eq!(cfg.jarfile.as_deref(), Some("/opt/pdl/ProductClient.jar"));
        assert_eq!(cfg.privatekey.as_deref(), Some("/opt/pdl/key"));
        assert_eq!(cfg.configfile.as_deref(), Some("/opt/pdl/config.ini"));
        assert_eq!(cfg.comcat_host.as_deref(), Some("dev-earthquake.cr.usgs.gov"));
    }

    #[test]
    fn rc_accepts_drive_letter_on_next_line() {
        let cfg = parse_rc("privatekey:\nC:\\pdl\\key\n");
        assert_eq!(cfg.privatekey.as_deref(), Some("C:\\pdl\\key"));
    }

    #[test]
    fn overrides_beat_env_and_env_beats_rc() {
        let dir = tempfile::tempdir().unwrap();
        let rc = dir.path().join(".ffproductrc");
        std::fs::write(
            &rc,
            "jarfile: /rc/ProductClient.jar\nprivatekey: /rc/key\nconfigfile: /rc/config.ini\n",
        )
        .unwrap();

        let env: HashMap<&str, &str> = [("FFPRODUCT_PRIVATEKEY", "/env/key")].into();
        let overrides = PdlOverrides {
            configfile: Some(PathBuf::from("/cli/config.ini")),
            ..Default::default()
        };

        let cfg = resolve_pdl_config(overrides, |k| env.get(k).map(|v| v.to_string()), &[rc])
            .unwrap();
        assert_eq!(cfg.java, PathBuf::from("java"));
        assert_eq!(cfg.jarfile, PathBuf::from("/rc/ProductClient.jar"));
        assert_eq!(cfg.privatekey, PathBuf::from("/env/key"));
        assert_eq!(cfg.configfile, PathBuf::from("/cli/config.ini"));
    }

    #[test]
    fn missing_value_names_the_key_and_locations() {
        let dir = tempfile::tempdir().unwrap();
        let rc = dir.path().join(".ffproductrc");
        let err = resolve_pdl_config(PdlOverrides::default(), no_env, &[rc.clone()]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Missing configuration: jarfile"));
        assert!(msg.contains(&rc.display().to_string()));
    }

    #[test]
    fn first_existing_rc_wins() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let present = dir.path().join("present");
        std::fs::write(&present, "comcat_host: localhost\n").unwrap();
        let rc = first_rc(&[missing, present]).unwrap();
        assert_eq!(rc.comcat_host.as_deref(), Some("localhost"));
    }
}
