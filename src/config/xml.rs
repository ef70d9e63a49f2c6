//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Creates a secure template if missing (unless DRIVE_MOVER_CONFIG is set).
//!
//! Unknown XML fields are a hard error so misspelled settings never pass silently.
//!
//! ```text
//! <config>
//!   <target_folder_id>1cfT2p9GyexmIIFVwR4HmWpdaCzg2GYsX</target_folder_id>
//!   <name_contains>ChatGPT Summary</name_contains>
//!   <name_excludes>ChatGPT Sessions</name_excludes>
//!   <page_size>100</page_size>
//!   <skip_policy>exact</skip_policy>
//!   <move_strategy>atomic</move_strategy>
//!   <log_level>normal</log_level>
//!   <log_file>/path/to/drive_mover.log</log_file>
//!   <access_token_file>/path/to/token</access_token_file>
//!   <request_timeout_seconds>30</request_timeout_seconds>
//! </config>
//! ```

use anyhow::{bail, Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use super::paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel, MoveStrategy, SkipPolicy};
use super::{
    CONFIG_ENV, NAME_CONTAINS_DEFAULT, NAME_EXCLUDES_DEFAULT, PAGE_SIZE_DEFAULT,
    REQUEST_TIMEOUT_SECS_DEFAULT,
};
use crate::platform::{set_dir_mode_0700, set_file_mode_0600, write_config_secure_new_0600};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    target_folder_id: Option<String>,
    name_contains: Option<String>,
    name_excludes: Option<String>,
    #[serde(default, deserialize_with = "de_u64_trimmed_opt")]
    page_size: Option<u64>,
    skip_policy: Option<String>,
    move_strategy: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
    access_token_file: Option<String>,
    #[serde(default, deserialize_with = "de_u64_trimmed_opt")]
    request_timeout_seconds: Option<u64>,
}

/// Outcome of looking for the config file at startup.
#[derive(Debug)]
pub enum LoadResult {
    /// A config file was found and parsed.
    Loaded { config: Box<Config>, path: PathBuf },
    /// No file existed at the default location; a template was written there.
    CreatedTemplate(PathBuf),
    /// No file (explicit override pointing nowhere); built-in defaults apply.
    Defaults,
}

// Trims surrounding whitespace; non-numeric text is a parse error rather than silently ignored.
fn de_u64_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<u64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected a whole number, got '{s}'"))),
    }
}

fn non_empty_path(s: Option<&str>) -> Option<PathBuf> {
    s.map(str::trim).filter(|t| !t.is_empty()).map(PathBuf::from)
}

// Map XmlConfig -> Config, starting from defaults.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(id) = parsed.target_folder_id.as_deref() {
        cfg.target_folder_id = id.trim().to_string();
    }
    if let Some(s) = parsed.name_contains.as_deref() {
        cfg.name_contains = s.trim().to_string();
    }
    if let Some(s) = parsed.name_excludes.as_deref() {
        // present but empty disables the exclusion
        cfg.name_excludes = s.trim().to_string();
    }
    if let Some(n) = parsed.page_size {
        cfg.page_size = u32::try_from(n).with_context(|| format!("page_size {n} out of range"))?;
    }
    if let Some(s) = parsed.skip_policy.as_deref() {
        cfg.skip_policy = s.parse::<SkipPolicy>().map_err(anyhow::Error::msg)?;
    }
    if let Some(s) = parsed.move_strategy.as_deref() {
        cfg.move_strategy = s.parse::<MoveStrategy>().map_err(anyhow::Error::msg)?;
    }
    if let Some(s) = parsed.log_level.as_deref() {
        match s.trim().parse::<LogLevel>() {
            Ok(level) => cfg.log_level = level,
            Err(e) => warn!("{e}; keeping log level '{}'", cfg.log_level),
        }
    }
    if let Some(p) = non_empty_path(parsed.log_file.as_deref()) {
        cfg.log_file = Some(p);
    }
    cfg.access_token_file = non_empty_path(parsed.access_token_file.as_deref());
    if let Some(secs) = parsed.request_timeout_seconds {
        cfg.request_timeout = Duration::from_secs(secs);
    }

    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in '{}'", path.display()))
}

/// Locate and load the config file, writing a template on first use of the default path.
pub fn load_or_init() -> Result<LoadResult> {
    let env_set = env::var_os(CONFIG_ENV).is_some();
    let path = default_config_path()?;

    if path.exists() {
        let config = load_config_from_xml_path(&path)?;
        return Ok(LoadResult::Loaded {
            config: Box::new(config),
            path,
        });
    }

    if env_set {
        warn!(path = %path.display(), "{CONFIG_ENV} points to a missing file; using defaults");
        return Ok(LoadResult::Defaults);
    }

    create_template_config(&path)?;
    Ok(LoadResult::CreatedTemplate(path))
}

/// Create the default template config file and parent directory (best-effort permissions).
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory '{}'", parent.display()))?;
        let _ = set_dir_mode_0700(parent);
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "/path/to/drive_mover.log".into());

    let content = format!(
        "<!--\n  drive_mover configuration (XML)\n\n  Fields:\n    target_folder_id         -> id of the Drive folder documents are moved into (required)\n    name_contains            -> documents whose name contains this text are candidates\n    name_excludes            -> ...unless their name also contains this text (empty = no exclusion)\n    page_size                -> listing batch size (1-1000)\n    skip_policy              -> exact | contains : when a document already counts as in place\n    move_strategy            -> atomic | two-step : one update call, or attach then detach\n    log_level                -> quiet | normal | info | debug\n    log_file                 -> path to log file (optional; stdout still used)\n    access_token_file        -> file holding an OAuth access token ({token_env} wins if set)\n    request_timeout_seconds  -> per-request HTTP timeout\n\n  CLI flags override XML values.\n-->\n<config>\n  <target_folder_id></target_folder_id>\n  <name_contains>{NAME_CONTAINS_DEFAULT}</name_contains>\n  <name_excludes>{NAME_EXCLUDES_DEFAULT}</name_excludes>\n  <page_size>{PAGE_SIZE_DEFAULT}</page_size>\n  <skip_policy>exact</skip_policy>\n  <move_strategy>atomic</move_strategy>\n  <log_level>normal</log_level>\n  <log_file>{suggested_log}</log_file>\n  <request_timeout_seconds>{REQUEST_TIMEOUT_SECS_DEFAULT}</request_timeout_seconds>\n</config>\n",
        token_env = super::ACCESS_TOKEN_ENV,
    );

    write_config_secure_new_0600(path, content.as_bytes())?;
    let _ = set_file_mode_0600(path);

    info!("Created template config at {}", path.display());
    Ok(())
}
