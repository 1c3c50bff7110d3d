//! Blocking HTTP implementation of [`JsonSource`].

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use super::{FetchError, JsonSource};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// GETs JSON from the controller with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("sdn-pathfinder/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl JsonSource for HttpFetcher {
    fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.client.get(url).send().map_err(|e| FetchError::Connection {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            if let Ok(body) = response.text() {
                log::debug!("Response text from {}: {}", url, body);
            }
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|e| FetchError::Connection {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&body).map_err(|e| {
            log::debug!("Response text from {}: {}", url, body);
            FetchError::JsonDecode {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })
    }
}
