pub mod config;
pub mod edit;
pub mod generate;
pub mod key;

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::core::StudioError;
use crate::credentials::{HostCredentials, KeyAvailability, KeyGate};

/// Gate on key availability before a network command runs. If no key is
/// found, the one-shot selection flow is offered; success persists the key,
/// so the config is reloaded to pick it up.
pub(crate) fn ensure_key(config: &Config) -> Result<Config> {
    let mut gate = KeyGate::new(HostCredentials::detect(config));

    if gate.check_availability() == KeyAvailability::Unavailable {
        eprintln!("{} No API key configured.", "!".yellow().bold());
        if gate.request_selection() == KeyAvailability::Unavailable {
            return Err(StudioError::MissingApiKey.into());
        }
        return Config::load_or_create();
    }

    Ok(config.clone())
}

/// Print a command failure, adding the re-auth hint for credential-looking
/// API errors.
pub(crate) fn report_failure(err: &StudioError, format: &str) {
    if format == "quiet" {
        return;
    }
    eprintln!("{}: {}", "Error".red().bold(), err);
    if err.is_credential_error() {
        eprintln!(
            "{}",
            "Your API key may be missing or invalid. Run: foto key connect".yellow()
        );
    }
}

/// Exit code for a successful API call that produced no image. Distinct
/// from transport failures so scripts can branch on it.
pub(crate) const NO_IMAGE_EXIT_CODE: i32 = 2;
