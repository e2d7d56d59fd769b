//! Runtime configuration for the API endpoint, the persisted session file and
//! the optional request timeout. Values arrive from CLI flags or their
//! environment fallbacks; blank values count as unset so an empty env var does
//! not clobber a default. Configuration values are public; do not store
//! secrets here.

use crate::errors::AppError;
use std::{path::PathBuf, time::Duration};
use url::Url;

/// Hosted MockAPI project backing the prisoners and users collections.
pub const DEFAULT_API_BASE_URL: &str = "https://6925dcd182b59600d7257f2e.mockapi.io/api";
/// Where the auth marker is persisted when no path is given.
pub const DEFAULT_STATE_FILE: &str = ".cellblock/state.json";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: Url,
    pub state_file: PathBuf,
    /// `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl AppConfig {
    /// Builds a config, falling back to defaults for blank values.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the API base URL is not an absolute
    /// `http`/`https` URL.
    pub fn new(
        api_base_url: Option<&str>,
        state_file: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Self, AppError> {
        let api_base_url = api_base_url
            .and_then(normalize_value)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let state_file = state_file
            .and_then(normalize_value)
            .unwrap_or_else(|| DEFAULT_STATE_FILE.to_string());

        Ok(Self {
            api_base_url: parse_base_url(&api_base_url)?,
            state_file: PathBuf::from(state_file),
            timeout: timeout.filter(|value| !value.is_zero()),
        })
    }
}

/// Parses an API base URL and rejects schemes reqwest cannot talk to.
///
/// # Errors
/// Returns `AppError::Config` for unparsable URLs, unsupported schemes or URLs
/// without a host.
pub fn parse_base_url(value: &str) -> Result<Url, AppError> {
    let url = Url::parse(value.trim())
        .map_err(|err| AppError::Config(format!("Invalid API base URL {value}: {err}")))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(AppError::Config(format!(
                "Unsupported API URL scheme: {scheme}"
            )));
        }
    }

    if url.host().is_none() {
        return Err(AppError::Config("API base URL has no host".to_string()));
    }

    Ok(url)
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
