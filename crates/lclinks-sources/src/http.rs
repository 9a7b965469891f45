//! Blocking HTTP seam for the remote collaborators.
//!
//! The ESRI footprint query and the FROM_GLC catalog fetcher talk to the
//! network through [`HttpClient`], so tests can substitute a canned client.

use crate::{Result, SourceError};
use std::time::Duration;
use tracing::trace;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Minimal blocking HTTP client.
pub trait HttpClient: Send + Sync {
    /// GET `url` and return the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>>;

    /// POST a JSON body with extra headers and return the response body.
    fn post_json(&self, url: &str, headers: &[(&str, &str)], json_body: &str) -> Result<Vec<u8>>;
}

/// [`HttpClient`] backed by `reqwest::blocking`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Create a client with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    fn read_body(url: &str, response: reqwest::blocking::Response) -> Result<Vec<u8>> {
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::RemoteQueryFailed {
                service: "http",
                reason: format!("HTTP {status} from {url}"),
            });
        }
        let body = response.bytes()?;
        trace!(url, bytes = body.len(), "response received");
        Ok(body.to_vec())
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send()?;
        Self::read_body(url, response)
    }

    fn post_json(&self, url: &str, headers: &[(&str, &str)], json_body: &str) -> Result<Vec<u8>> {
        let mut request = self.client.post(url).body(json_body.to_string());
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request.send()?;
        Self::read_body(url, response)
    }
}
