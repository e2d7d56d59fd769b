use crate::config::AppConfig;
use anyhow::{Context, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub config: AppConfig,
}

impl GlobalArgs {
    /// # Errors
    /// Returns an error if the API URL is invalid.
    pub fn new(api_url: Option<&str>, state_file: Option<&str>, timeout: Option<u64>) -> Result<Self> {
        let config = AppConfig::new(api_url, state_file, timeout.map(Duration::from_secs))
            .context("invalid CELLBLOCK_API_URL")?;
        Ok(Self { config })
    }
}
