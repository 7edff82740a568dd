use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

pub mod catalog;
pub mod kill_switch;

pub use catalog::{Catalog, CatalogError, EntryType, SelectOption, TextureFileEntry};
pub use kill_switch::{DisableReason, DisabledNotice, RemoteControlConfig, Verdict};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Unexpected payload from {url}: {source}")]
    Schema {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of remote documents.
///
/// Everything the application downloads goes through this trait so that the
/// network can be swapped for an in-memory double.
pub trait Fetch: Send + Sync {
    /// GET `url` and return the body as text
    fn get_text(&self, url: &str) -> Result<String, FetchError>;

    /// GET `url` with the given `Accept` header and return the raw body
    fn get_bytes(&self, url: &str, accept: &str) -> Result<Vec<u8>, FetchError>;
}

/// Fetch `url` and decode it into `T`, failing with [`FetchError::Schema`]
/// when required fields are missing or mistyped.
pub fn fetch_json<T: DeserializeOwned>(fetcher: &dyn Fetch, url: &str) -> Result<T, FetchError> {
    let body = fetcher.get_text(url)?;
    serde_json::from_str(&body).map_err(|source| FetchError::Schema {
        url: url.to_string(),
        source,
    })
}

/// Blocking HTTP implementation of [`Fetch`]
pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    /// Create a client with a user agent (the GitHub API rejects requests
    /// without one) and an overall request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    fn send(
        &self,
        url: &str,
        accept: Option<&str>,
    ) -> Result<reqwest::blocking::Response, FetchError> {
        let mut request = self.client.get(url);
        if let Some(accept) = accept {
            request = request.header(reqwest::header::ACCEPT, accept);
        }

        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };
        let response = request.send().map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl Fetch for HttpClient {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        crate::logger::logln(&format!("GET {url}"));
        self.send(url, None)?
            .text()
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })
    }

    fn get_bytes(&self, url: &str, accept: &str) -> Result<Vec<u8>, FetchError> {
        crate::logger::logln(&format!("GET {url} ({accept})"));
        let bytes = self
            .send(url, Some(accept))?
            .bytes()
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Fetch, FetchError};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory [`Fetch`] that serves canned bodies and records every URL it
    /// was asked for, plus the `Accept` value of binary downloads. Unknown URLs
    /// answer with HTTP 404.
    #[derive(Default)]
    pub struct FakeFetch {
        responses: HashMap<String, Vec<u8>>,
        failing: HashMap<String, u16>,
        requests: Mutex<Vec<String>>,
        byte_requests: Mutex<Vec<(String, String)>>,
    }

    impl FakeFetch {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.responses.insert(url.to_string(), body.into());
            self
        }

        pub fn failing(mut self, url: &str, status: u16) -> Self {
            self.failing.insert(url.to_string(), status);
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        /// `(url, accept)` for every `get_bytes` call
        pub fn byte_requests(&self) -> Vec<(String, String)> {
            self.byte_requests.lock().unwrap().clone()
        }

        fn lookup(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            if let Some(status) = self.failing.get(url) {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: *status,
                });
            }
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    impl Fetch for FakeFetch {
        fn get_text(&self, url: &str) -> Result<String, FetchError> {
            self.lookup(url)
                .map(|body| String::from_utf8_lossy(&body).into_owned())
        }

        fn get_bytes(&self, url: &str, accept: &str) -> Result<Vec<u8>, FetchError> {
            self.byte_requests
                .lock()
                .unwrap()
                .push((url.to_string(), accept.to_string()));
            self.lookup(url)
        }
    }
}
