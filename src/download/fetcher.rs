//! Fetcher abstraction for testability
//!
//! The downloader never talks to the network directly. It goes through the
//! [`Fetcher`] trait, which has a blocking HTTP implementation
//! ([`HttpFetcher`]) and an in-memory one ([`MockFetcher`]) so the whole
//! pipeline can be exercised without a server.

use crate::core::error::{OrganizerError, Result};
use log::trace;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Read;
use std::time::Duration;

/// Per-request timeout
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on a single response body (100 MB)
pub const MAX_BODY_BYTES: u64 = 100 * 1024 * 1024;

/// What a successful fetch returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResource {
    /// HTTP status code (always 2xx for a returned resource)
    pub status: u16,
    /// Value of the Content-Type header, empty if absent
    pub content_type: String,
    /// Raw response body
    pub bytes: Vec<u8>,
}

impl FetchedResource {
    /// Whether the content type announces an image
    pub fn is_image(&self) -> bool {
        self.content_type.to_lowercase().contains("image")
    }
}

/// Retrieves raw bytes for a URL
///
/// Implementations must report non-2xx responses, timeouts and DNS failures as
/// [`OrganizerError::Fetch`].
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<FetchedResource>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, url: &str) -> Result<FetchedResource> {
        (**self).fetch(url)
    }
}

impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    fn fetch(&self, url: &str) -> Result<FetchedResource> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP fetcher backed by `ureq`
pub struct HttpFetcher {
    agent: ureq::Agent,
    max_body_bytes: u64,
}

impl HttpFetcher {
    /// Create a fetcher sending `user_agent` with the default 30s timeout
    pub fn new(user_agent: &str) -> Self {
        Self::with_timeout(user_agent, FETCH_TIMEOUT)
    }

    pub fn with_timeout(user_agent: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build();
        Self {
            agent,
            max_body_bytes: MAX_BODY_BYTES,
        }
    }

    /// Reject bodies larger than `limit` bytes
    pub fn with_max_body_bytes(mut self, limit: u64) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedResource> {
        let fetch_error = |message: String| OrganizerError::Fetch {
            url: url.to_string(),
            message,
        };

        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(fetch_error(format!("HTTP {}", code)));
            }
            Err(e) => return Err(fetch_error(e.to_string())),
        };

        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(fetch_error(format!("HTTP {}", status)));
        }

        let content_type = response.header("content-type").unwrap_or("").to_string();

        // one byte past the limit tells an oversized body from one that fits
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(self.max_body_bytes.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|e| fetch_error(format!("failed to read body: {}", e)))?;
        if bytes.len() as u64 > self.max_body_bytes {
            return Err(fetch_error(format!(
                "response exceeds {} bytes",
                self.max_body_bytes
            )));
        }

        trace!("Fetched {} ({} bytes, {})", url, bytes.len(), content_type);

        Ok(FetchedResource {
            status,
            content_type,
            bytes,
        })
    }
}

/// Canned response for [`MockFetcher`]
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// A 200 response with this content type and body
    Ok {
        content_type: String,
        bytes: Vec<u8>,
    },
    /// A non-2xx response
    Status(u16),
    /// A transport failure (timeout, DNS, refused connection)
    Network(String),
}

/// In-memory fetcher serving canned responses
///
/// Unknown URLs behave like a 404. Every requested URL is recorded.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: HashMap<String, MockResponse>,
    requests: RefCell<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` with `content_type` for `url`
    pub fn with_body(mut self, url: &str, content_type: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(
            url.to_string(),
            MockResponse::Ok {
                content_type: content_type.to_string(),
                bytes: bytes.into(),
            },
        );
        self
    }

    /// Answer `url` with an HTTP error status
    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses
            .insert(url.to_string(), MockResponse::Status(status));
        self
    }

    /// Fail `url` at the transport level
    pub fn with_network_error(mut self, url: &str, message: &str) -> Self {
        self.responses
            .insert(url.to_string(), MockResponse::Network(message.to_string()));
        self
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedResource> {
        self.requests.borrow_mut().push(url.to_string());

        match self.responses.get(url) {
            Some(MockResponse::Ok {
                content_type,
                bytes,
            }) => Ok(FetchedResource {
                status: 200,
                content_type: content_type.clone(),
                bytes: bytes.clone(),
            }),
            Some(MockResponse::Status(code)) => Err(OrganizerError::Fetch {
                url: url.to_string(),
                message: format!("HTTP {}", code),
            }),
            Some(MockResponse::Network(message)) => Err(OrganizerError::Fetch {
                url: url.to_string(),
                message: message.clone(),
            }),
            None => Err(OrganizerError::Fetch {
                url: url.to_string(),
                message: "HTTP 404".to_string(),
            }),
        }
    }
}
