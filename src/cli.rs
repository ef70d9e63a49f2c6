//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - CLI flags override values loaded from config.xml.
//! - --debug is a shorthand for --log-level debug.

use clap::Parser;

use crate::config::types::{Config, LogLevel, MoveStrategy, SkipPolicy};

/// Move Google Docs whose name matches a pattern into one Drive folder.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Move matching Google Docs into one Drive folder (true move, not a link)"
)]
pub struct Args {
    /// Destination folder id (overrides <target_folder_id>).
    #[arg(long = "target-folder", short = 't', value_name = "ID")]
    pub target_folder: Option<String>,

    /// Documents whose name contains this text are candidates.
    #[arg(long, value_name = "TEXT")]
    pub name_contains: Option<String>,

    /// Skip documents whose name contains this text (empty string disables).
    #[arg(long, value_name = "TEXT")]
    pub name_excludes: Option<String>,

    /// Listing batch size (1-1000).
    #[arg(long, value_name = "N")]
    pub page_size: Option<u32>,

    /// When a document already counts as in the target: exact | contains.
    #[arg(long, value_name = "POLICY")]
    pub skip_policy: Option<SkipPolicy>,

    /// How parents are changed: atomic | two-step.
    #[arg(long, value_name = "STRATEGY")]
    pub move_strategy: Option<MoveStrategy>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Print where drive_mover will look for the config file, then exit.
    #[arg(
        long,
        help = "Print the config file location used by drive_mover and exit"
    )]
    pub print_config: bool,

    /// Dry-run: report candidate moves but do not modify any document.
    #[arg(
        long,
        help = "Show what would be moved, but do not modify any document"
    )]
    pub dry_run: bool,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(id) = &self.target_folder {
            cfg.target_folder_id = id.trim().to_string();
        }
        if let Some(s) = &self.name_contains {
            cfg.name_contains = s.clone();
        }
        if let Some(s) = &self.name_excludes {
            cfg.name_excludes = s.clone();
        }
        if let Some(n) = self.page_size {
            cfg.page_size = n;
        }
        if let Some(p) = self.skip_policy {
            cfg.skip_policy = p;
        }
        if let Some(s) = self.move_strategy {
            cfg.move_strategy = s;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
