//! Typed error definitions for drive_mover.
//! `DriveApiError` covers one failed call to the storage service;
//! `DriveMoverError` covers the failures that abort a whole run.

use thiserror::Error;

/// Failure of a single call to the document-storage service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DriveApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        /// First `error.errors[].reason` from the response body, when present.
        reason: Option<String>,
    },

    #[error("could not decode service response: {0}")]
    Decode(String),

    #[error("not found: {0}")]
    NotFound(String),
}

/// Drive reports quota throttling as 403 with one of these reasons.
const RATE_LIMIT_REASONS: [&str; 2] = ["rateLimitExceeded", "userRateLimitExceeded"];

impl DriveApiError {
    /// A status error without a reason.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        DriveApiError::Status {
            status,
            message: message.into(),
            reason: None,
        }
    }

    /// True for failures worth retrying on idempotent reads (rate limits, 5xx, timeouts).
    pub fn is_transient(&self) -> bool {
        match self {
            DriveApiError::Transport(_) => true,
            DriveApiError::Status { status, reason, .. } => {
                *status == 429
                    || *status >= 500
                    || reason
                        .as_deref()
                        .is_some_and(|r| RATE_LIMIT_REASONS.contains(&r))
            }
            DriveApiError::Decode(_) | DriveApiError::NotFound(_) => false,
        }
    }
}

/// Fatal errors: the run aborts and nothing further is processed.
#[derive(Debug, Error)]
pub enum DriveMoverError {
    #[error("no target folder id configured")]
    MissingTargetFolder,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("target folder {id} is not accessible: {source}")]
    TargetFolderUnavailable {
        id: String,
        #[source]
        source: DriveApiError,
    },

    #[error("target {id} is not a folder (mime type {mime_type})")]
    NotAFolder { id: String, mime_type: String },

    #[error("target folder {0} is in the trash")]
    TargetFolderTrashed(String),

    #[error("listing matching documents failed: {0}")]
    Listing(#[source] DriveApiError),

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl DriveMoverError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            DriveMoverError::MissingTargetFolder => 10,
            DriveMoverError::InvalidConfig(_) => 11,
            DriveMoverError::TargetFolderUnavailable { .. } => 20,
            DriveMoverError::NotAFolder { .. } => 21,
            DriveMoverError::TargetFolderTrashed(_) => 22,
            DriveMoverError::Listing(_) => 30,
            DriveMoverError::Interrupted => 130,
        }
    }

    /// Short machine-friendly kind used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            DriveMoverError::MissingTargetFolder => "missing_target_folder",
            DriveMoverError::InvalidConfig(_) => "invalid_config",
            DriveMoverError::TargetFolderUnavailable { .. } => "target_unavailable",
            DriveMoverError::NotAFolder { .. } => "not_a_folder",
            DriveMoverError::TargetFolderTrashed(_) => "target_trashed",
            DriveMoverError::Listing(_) => "listing_failed",
            DriveMoverError::Interrupted => "interrupted",
        }
    }
}
