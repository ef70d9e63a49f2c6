//! Config validation logic.
//! Rejects settings the Drive API would refuse before any request is made.

use tracing::{debug, error, info};

use super::types::{Config, MoveConfig};
use super::PAGE_SIZE_MAX;
use crate::errors::DriveMoverError;

impl MoveConfig {
    /// Check target id, predicate and page size.
    pub fn validate(&self) -> Result<(), DriveMoverError> {
        let target = &self.target_folder_id;
        if target.trim().is_empty() {
            error!("target_folder_id is empty");
            return Err(DriveMoverError::MissingTargetFolder);
        }
        if let Some(bad) = target
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            error!("target_folder_id contains invalid character {bad:?}: {target}");
            return Err(DriveMoverError::InvalidConfig(format!(
                "target_folder_id '{target}' contains invalid character {bad:?}"
            )));
        }
        if self.query.name_contains.trim().is_empty() {
            return Err(DriveMoverError::InvalidConfig(
                "name_contains must not be empty".into(),
            ));
        }
        if self.query.name_excludes.as_deref().is_some_and(|ex| ex == self.query.name_contains) {
            return Err(DriveMoverError::InvalidConfig(
                "name_excludes equals name_contains; nothing could ever match".into(),
            ));
        }
        if self.page_size == 0 || self.page_size > PAGE_SIZE_MAX {
            return Err(DriveMoverError::InvalidConfig(format!(
                "page_size must be between 1 and {PAGE_SIZE_MAX}, got {}",
                self.page_size
            )));
        }
        debug!(target = %target, page_size = self.page_size, "move config valid");
        Ok(())
    }
}

impl Config {
    /// Validate everything the run depends on.
    pub fn validate(&self) -> Result<(), DriveMoverError> {
        self.move_config().validate()?;
        if self.request_timeout.is_zero() {
            return Err(DriveMoverError::InvalidConfig(
                "request timeout must be greater than zero".into(),
            ));
        }
        info!(
            "Config validated: target='{}' contains='{}' excludes='{}' log_file='{}'",
            self.target_folder_id.trim(),
            self.name_contains,
            self.name_excludes,
            self.log_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<none>".into())
        );
        Ok(())
    }
}
