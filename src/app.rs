//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the Ctrl-C handler,
//! validates settings, builds the Drive client and runs the mover.

use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

use drive_mover::cli::Args;
use drive_mover::config::{load_or_init, LoadResult, CONFIG_ENV};
use drive_mover::output as out;
use drive_mover::{default_config_path, mover, shutdown, Config, DriveClient, DriveMoverError};

use crate::logging::init_tracing;

fn print_config_location() {
    if let Ok(cfg_env) = std::env::var(CONFIG_ENV) {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {cfg_env}\n"));
        out::print_info(&format!("To override, unset {CONFIG_ENV} or set it to another file."));
        return;
    }
    match default_config_path() {
        Ok(p) => {
            out::print_info(&format!("Default drive_mover config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info("No config file exists there yet. Run without --print-config to create a template.");
            }
        }
        Err(e) => out::print_error(&format!("Could not determine a default config path: {e}")),
    }
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    // Config file first (may write a template), then CLI overrides.
    let mut cfg = match load_or_init()? {
        LoadResult::Loaded { config, path } => {
            debug!(path = %path.display(), "loaded config");
            *config
        }
        LoadResult::CreatedTemplate(path) => {
            out::print_success(&format!(
                "A template drive_mover config was written to: {}",
                path.display()
            ));
            if args.target_folder.is_none() {
                out::print_info("Edit the file to set `target_folder_id` (and optionally the name filters), then re-run. To use a different location set DRIVE_MOVER_CONFIG.");
                return Ok(());
            }
            Config::default()
        }
        LoadResult::Defaults => Config::default(),
    };
    args.apply_overrides(&mut cfg);

    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    // Guard is dropped on SIGINT as well so buffered file logs get flushed.
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        if let Err(e) = ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; stopping after the current document...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        }) {
            warn!(error = %e, "could not install Ctrl-C handler");
        }
    }

    debug!("Starting drive_mover: {:?}", args);

    let result = (|| -> Result<()> {
        cfg.validate()?;
        let token = cfg.access_token()?;
        let client = DriveClient::new(token, cfg.request_timeout)
            .context("build Drive API client")?;

        match mover::run(&cfg.move_config(), &client) {
            Ok(outcome) => {
                out::print_summary(&outcome);
                if outcome.errored > 0 {
                    warn!(errored = outcome.errored, "some documents could not be moved");
                }
                info!("Run completed");
                Ok(())
            }
            Err(e) => {
                error!(code = e.code(), kind = e.kind(), error = %e, "Run aborted");
                Err(e.into())
            }
        }
    })();

    if let Err(e) = &result {
        match e.downcast_ref::<DriveMoverError>() {
            Some(DriveMoverError::MissingTargetFolder) => out::print_error(
                "No target folder configured. Set <target_folder_id> in the config or pass --target-folder.",
            ),
            _ => out::print_error(&format!("{e:#}")),
        }
    }

    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}
