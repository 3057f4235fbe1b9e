use futures_util::StreamExt;
use reqwest::{Client, Response};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::{FetchRequest, FetchResult};
use crate::config::HttpConfig;
use crate::error::{Error, Result};

/// HTTP fetcher sharing one connection pool across calls
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a fetcher with an explicit timeout and user agent
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    #[cfg(test)]
    pub(crate) const fn inner(&self) -> &Client {
        &self.client
    }

    /// GET the request URL and buffer the whole body
    pub async fn fetch(&self, request: &FetchRequest) -> FetchResult {
        let url = request.source_url.as_str();

        let response = match self.send(url).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Fetch of {} failed: {}", url, e);
                return FetchResult::failure(e);
            }
        };

        let status = response.status().as_u16();
        match response.bytes().await {
            Ok(bytes) => {
                info!("Fetched {} ({} bytes)", url, bytes.len());
                FetchResult::success(bytes, status)
            }
            Err(e) => {
                warn!("Reading body of {} failed: {}", url, e);
                FetchResult::failure(e.into())
            }
        }
    }

    /// GET `url` and stream the body into `path`
    ///
    /// The file is only created once a 2xx response arrives. Returns the number of
    /// bytes written.
    pub async fn download_to(&self, url: &str, path: &Path) -> Result<u64> {
        let response = self.send(url).await?;

        let mut file = tokio::fs::File::create(path)
            .await
            .map_err(|e| Error::Write(format!("{}: {e}", path.display())))?;

        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|e| Error::Write(format!("{}: {e}", path.display())))?;
            written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| Error::Write(format!("{}: {e}", path.display())))?;

        info!("Downloaded {} to {} ({} bytes)", url, path.display(), written);
        Ok(written)
    }

    /// Send a GET and reject non-2xx responses
    async fn send(&self, url: &str) -> Result<Response> {
        if url.is_empty() {
            return Err(Error::Network("empty URL".into()));
        }

        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        Ok(response)
    }
}
