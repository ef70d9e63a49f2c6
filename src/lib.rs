//! Core library for `drive_mover`.
//!
//! Finds documents in the user's own Drive whose name matches a pattern and
//! moves them into one folder, detaching every other parent (a true move).
//! The binary wires config, logging and the HTTP client around [`mover::run`].

pub mod cli;
pub mod config;
pub mod drive;
pub mod errors;
pub mod mover;
pub mod output;
pub mod platform;
pub mod query;
pub mod shutdown;

pub use config::{
    default_config_path, default_log_path, load_config_from_xml_path, path_has_symlink_ancestor,
    Config, LogLevel, MoveConfig, MoveStrategy, SkipPolicy,
};
pub use drive::http::DriveClient;
#[cfg(any(test, feature = "test-helpers"))]
pub use drive::memory::MemoryDrive;
pub use drive::{Document, DocumentPage, DriveService, Folder};
pub use errors::{DriveApiError, DriveMoverError};
pub use mover::{run, MoveFailure, MoveOutcome};
pub use query::DocumentQuery;
