//! Fetch an image over HTTP and save it to disk, either once from the command
//! line or on demand through a small web form.

pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod routes;
pub mod server;
pub mod storage;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::Result;
use crate::fetcher::Fetcher;

/// State shared by every request handler
pub struct AppState {
    pub config: AppConfig,
    pub fetcher: Fetcher,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let fetcher = Fetcher::new(&config.http)?;
        Ok(Self { config, fetcher })
    }
}

/// Request handler context
pub type Ctx = Arc<AppState>;
