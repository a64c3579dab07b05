//! @ai:module:intent Link reachability checking
//! @ai:module:layer infrastructure
//! @ai:module:public_api LinkChecker, HttpLinkChecker, MockLinkChecker
//! @ai:module:stateless false

use crate::error::{PipelineError, Result};

/// @ai:intent Outcome of checking one URL
#[derive(Debug, Clone)]
pub struct LinkCheck {
    pub url: String,
    pub reachable: bool,
    pub detail: String,
}

/// @ai:intent Trait for URL reachability checks
#[allow(async_fn_in_trait)]
pub trait LinkChecker: Send + Sync {
    /// @ai:intent Check whether a URL is reachable
    async fn check(&self, url: &str) -> LinkCheck;
}

/// @ai:intent HEAD-request link checker with a short timeout
pub struct HttpLinkChecker {
    client: reqwest::Client,
}

impl HttpLinkChecker {
    /// @ai:intent Create a checker with the configured link timeout
    /// @ai:effects pure
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PipelineError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl LinkChecker for HttpLinkChecker {
    /// @ai:intent HEAD the URL; any error counts as broken, never fatal
    /// @ai:effects network
    async fn check(&self, url: &str) -> LinkCheck {
        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                LinkCheck {
                    url: url.to_string(),
                    reachable: (200..400).contains(&status),
                    detail: format!("status {status}"),
                }
            }
            Err(e) => LinkCheck {
                url: url.to_string(),
                reachable: false,
                detail: e.to_string(),
            },
        }
    }
}

/// @ai:intent Mock checker with a scripted set of broken URLs
pub struct MockLinkChecker {
    broken: std::collections::HashSet<String>,
}

impl MockLinkChecker {
    /// @ai:intent Create a mock where only the given URLs are broken
    /// @ai:effects pure
    pub fn with_broken(urls: &[&str]) -> Self {
        Self {
            broken: urls.iter().map(|u| u.to_string()).collect(),
        }
    }
}

impl LinkChecker for MockLinkChecker {
    /// @ai:intent Report scripted reachability
    /// @ai:effects pure
    async fn check(&self, url: &str) -> LinkCheck {
        let broken = self.broken.contains(url);
        LinkCheck {
            url: url.to_string(),
            reachable: !broken,
            detail: if broken { "scripted broken" } else { "scripted ok" }.to_string(),
        }
    }
}
