//! Access token lookup.
//! The token itself is obtained elsewhere (e.g. `gcloud auth print-access-token`);
//! we only read it from the environment or a file.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;

use super::types::Config;
use super::ACCESS_TOKEN_ENV;

impl Config {
    /// `DRIVE_MOVER_ACCESS_TOKEN` wins; otherwise the first line of `access_token_file`.
    pub fn access_token(&self) -> Result<String> {
        if let Ok(tok) = env::var(ACCESS_TOKEN_ENV) {
            let tok = tok.trim().to_string();
            if !tok.is_empty() {
                return Ok(tok);
            }
        }
        if let Some(path) = &self.access_token_file {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("read access token file '{}'", path.display()))?;
            let tok = contents.lines().next().unwrap_or_default().trim().to_string();
            if tok.is_empty() {
                bail!("access token file '{}' is empty", path.display());
            }
            return Ok(tok);
        }
        bail!(
            "no Drive access token: set {ACCESS_TOKEN_ENV} or <access_token_file> in the config"
        )
    }
}
