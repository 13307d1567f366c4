//! HTTP GET of a whole asset into memory.
//!
//! Uses the curl crate (libcurl). Each call is a single blocking GET with a
//! bounded total timeout; redirects are followed. There is no retry: a failed
//! fetch is reported and the run moves on.

use crate::error::VendError;
use std::time::Duration;

/// Default total timeout per asset request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connect timeout per asset request.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Source of asset bytes. Implementations must be shareable across worker threads.
pub trait Fetch: Sync {
    /// GET `url` and return the full body. Non-2xx and empty bodies are errors.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, VendError>;
}

/// Tunables for `CurlFetcher`.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_redirections: u32,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_redirections: 10,
            user_agent: concat!("avend/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// libcurl-backed fetcher. A fresh Easy handle per request keeps it `Sync`.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    opts: FetchOptions,
}

impl CurlFetcher {
    pub fn new(opts: FetchOptions) -> Self {
        Self { opts }
    }
}

impl Fetch for CurlFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, VendError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.opts.max_redirections)?;
        easy.connect_timeout(self.opts.connect_timeout)?;
        easy.timeout(self.opts.timeout)?;
        easy.useragent(&self.opts.user_agent)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(VendError::Http(code));
        }
        if body.is_empty() {
            return Err(VendError::EmptyBody);
        }
        tracing::trace!(url, bytes = body.len(), "GET complete");
        Ok(body)
    }
}
