//! Client configuration.

use std::time::Duration;

use serde::Serialize;

use crate::http::TransportOptions;

/// Default UpYun REST endpoint.
pub const DEFAULT_DOMAIN: &str = "v0.api.upyun.com";

/// Default number of mutating requests allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 2;

/// Default number of sibling entries processed together during a traversal.
pub const DEFAULT_FAN_OUT: usize = 8;

/// Immutable settings for a [`Session`](crate::Session).
///
/// Built once and handed to the session; there are no setters afterwards.
///
/// # Example
/// ```
/// use upyunlib::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_domain("v1.api.upyun.com")
///     .with_concurrency(4);
/// assert_eq!(config.endpoint(), "http://v1.api.upyun.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientConfig {
    /// API host name (optionally with a port)
    pub domain: String,
    /// Use `https` instead of `http`
    pub secure: bool,
    /// Maximum concurrent mutating requests (uploads, deletes)
    pub concurrency: usize,
    /// Maximum siblings processed together per directory level
    pub fan_out: usize,
    /// Depth limit for recursive listings; `None` follows the real tree depth
    pub max_list_depth: Option<usize>,
    /// Per-request timeout forwarded to the transport
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            secure: false,
            concurrency: DEFAULT_CONCURRENCY,
            fan_out: DEFAULT_FAN_OUT,
            max_list_depth: None,
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Override the endpoint domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Switch between `https` and `http`.
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set the dispatcher concurrency limit (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the per-level traversal fan-out (at least 1).
    pub fn with_fan_out(mut self, fan_out: usize) -> Self {
        self.fan_out = fan_out.max(1);
        self
    }

    /// Bound recursive listings to `depth` folder levels below the root.
    pub fn with_max_list_depth(mut self, depth: usize) -> Self {
        self.max_list_depth = Some(depth);
        self
    }

    /// Set a per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Scheme and host, without a trailing slash.
    pub fn endpoint(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}", scheme, self.domain)
    }

    pub(crate) fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            timeout: self.request_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.domain, "v0.api.upyun.com");
        assert_eq!(config.concurrency, 2);
        assert_eq!(config.endpoint(), "http://v0.api.upyun.com");
        assert!(config.max_list_depth.is_none());
        assert_eq!(config.transport_options(), TransportOptions::default());
    }

    #[test]
    fn test_builder_clamps_limits() {
        let config = ClientConfig::default()
            .with_concurrency(0)
            .with_fan_out(0)
            .with_secure(true)
            .with_request_timeout(Duration::from_secs(30));

        assert_eq!(config.concurrency, 1);
        assert_eq!(config.fan_out, 1);
        assert_eq!(config.endpoint(), "https://v0.api.upyun.com");
        assert_eq!(
            config.transport_options().timeout,
            Some(Duration::from_secs(30))
        );
    }
}
