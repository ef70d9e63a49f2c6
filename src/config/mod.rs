//! Config module.
//! Provides configuration types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
mod token;
mod validate;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel, MoveConfig, MoveStrategy, SkipPolicy};
pub use xml::{create_template_config, load_config_from_xml_path, load_or_init, LoadResult};

/// Substring a candidate's name must contain.
pub const NAME_CONTAINS_DEFAULT: &str = "ChatGPT Summary";
/// Substring that disqualifies a candidate.
pub const NAME_EXCLUDES_DEFAULT: &str = "ChatGPT Sessions";
/// Listing batch size; Drive accepts at most 1000.
pub const PAGE_SIZE_DEFAULT: u32 = 100;
pub const PAGE_SIZE_MAX: u32 = 1000;
pub const REQUEST_TIMEOUT_SECS_DEFAULT: u64 = 30;

/// Environment variable naming an explicit config file (or directory holding config.xml).
pub const CONFIG_ENV: &str = "DRIVE_MOVER_CONFIG";
/// Environment variable holding an OAuth bearer token for the Drive API.
pub const ACCESS_TOKEN_ENV: &str = "DRIVE_MOVER_ACCESS_TOKEN";
