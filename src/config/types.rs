//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - MoveConfig is the immutable slice of Config the mover consumes.
//! - LogLevel, SkipPolicy and MoveStrategy are small enums with string parsing.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::paths;
use super::{
    NAME_CONTAINS_DEFAULT, NAME_EXCLUDES_DEFAULT, PAGE_SIZE_DEFAULT, REQUEST_TIMEOUT_SECS_DEFAULT,
};
use crate::query::DocumentQuery;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// When a document already counts as being in the target folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkipPolicy {
    /// Skip only when the target is the sole parent; extra parents get stripped.
    #[default]
    Exact,
    /// Skip whenever the target is one of the parents.
    Contains,
}

impl fmt::Display for SkipPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipPolicy::Exact => "exact",
            SkipPolicy::Contains => "contains",
        })
    }
}

impl FromStr for SkipPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" | "sole" => Ok(SkipPolicy::Exact),
            "contains" | "any" => Ok(SkipPolicy::Contains),
            _ => Err(format!("invalid skip policy: '{s}' (expected exact or contains)")),
        }
    }
}

/// How parent changes are sent to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveStrategy {
    /// One update carrying both the parent to add and the parents to remove.
    #[default]
    Atomic,
    /// Attach the target first, then detach each other parent in its own call.
    TwoStep,
}

impl fmt::Display for MoveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MoveStrategy::Atomic => "atomic",
            MoveStrategy::TwoStep => "two-step",
        })
    }
}

impl FromStr for MoveStrategy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "atomic" => Ok(MoveStrategy::Atomic),
            "two-step" | "twostep" => Ok(MoveStrategy::TwoStep),
            _ => Err(format!("invalid move strategy: '{s}' (expected atomic or two-step)")),
        }
    }
}

/// Runtime configuration for the binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// Destination folder id
    pub target_folder_id: String,
    /// Required name substring
    pub name_contains: String,
    /// Disqualifying name substring; empty disables the exclusion
    pub name_excludes: String,
    /// Listing batch size
    pub page_size: u32,
    pub skip_policy: SkipPolicy,
    pub move_strategy: MoveStrategy,
    /// If true, report candidate moves but do not modify any document
    pub dry_run: bool,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// File holding an OAuth access token (env var takes precedence)
    pub access_token_file: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_folder_id: String::new(),
            name_contains: NAME_CONTAINS_DEFAULT.to_string(),
            name_excludes: NAME_EXCLUDES_DEFAULT.to_string(),
            page_size: PAGE_SIZE_DEFAULT,
            skip_policy: SkipPolicy::default(),
            move_strategy: MoveStrategy::default(),
            dry_run: false,
            log_level: LogLevel::Normal,
            log_file: paths::default_log_path().ok(),
            access_token_file: None,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS_DEFAULT),
        }
    }
}

impl Config {
    /// Construct a Config for a target folder; other fields use defaults.
    pub fn new(target_folder_id: impl Into<String>) -> Self {
        Self {
            target_folder_id: target_folder_id.into(),
            ..Default::default()
        }
    }

    /// The document predicate described by this config.
    pub fn query(&self) -> DocumentQuery {
        DocumentQuery::new(self.name_contains.trim()).excluding(self.name_excludes.trim())
    }

    /// Immutable settings for one mover run.
    pub fn move_config(&self) -> MoveConfig {
        MoveConfig {
            target_folder_id: self.target_folder_id.trim().to_string(),
            query: self.query(),
            page_size: self.page_size,
            dry_run: self.dry_run,
            skip_policy: self.skip_policy,
            move_strategy: self.move_strategy,
        }
    }
}

/// Settings for a single mover invocation. Built once, passed by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveConfig {
    pub target_folder_id: String,
    pub query: DocumentQuery,
    pub page_size: u32,
    pub dry_run: bool,
    pub skip_policy: SkipPolicy,
    pub move_strategy: MoveStrategy,
}

impl MoveConfig {
    pub fn new(target_folder_id: impl Into<String>, query: DocumentQuery) -> Self {
        Self {
            target_folder_id: target_folder_id.into(),
            query,
            page_size: PAGE_SIZE_DEFAULT,
            dry_run: false,
            skip_policy: SkipPolicy::default(),
            move_strategy: MoveStrategy::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_skip_policy(mut self, policy: SkipPolicy) -> Self {
        self.skip_policy = policy;
        self
    }

    pub fn with_move_strategy(mut self, strategy: MoveStrategy) -> Self {
        self.move_strategy = strategy;
        self
    }
}
