//! Session state.
//!
//! A [`Session`] binds one bucket's credentials, an immutable
//! [`ClientConfig`], the signing [`ApiClient`] and the [`Dispatcher`] that
//! every mutating request goes through. Filesystem operations are
//! implemented on it in `crate::fs`.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::Credential;
use crate::config::ClientConfig;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::http::{HttpClient, Transport};

/// Authenticated client for one UpYun bucket.
///
/// Cloning is cheap; clones share the transport and the dispatcher's
/// concurrency limit.
///
/// # Example
/// ```no_run
/// use upyunlib::{ClientConfig, Credential, Session};
///
/// # async fn example() -> upyunlib::Result<()> {
/// let session = Session::new(
///     Credential::new("my-bucket", "operator", "password"),
///     ClientConfig::default(),
/// );
///
/// for entry in session.list("/", false).await? {
///     println!("{} ({} bytes)", entry.name, entry.size);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    api: ApiClient,
    dispatcher: Dispatcher,
}

impl Session {
    /// Create a session using the default `reqwest` transport.
    pub fn new(credential: Credential, config: ClientConfig) -> Self {
        Self::with_transport(credential, config, Arc::new(HttpClient::new()))
    }

    /// Create a session sending its requests through an HTTP proxy.
    ///
    /// # Arguments
    /// * `proxy` - Proxy URL (e.g., "http://proxy:8080")
    pub fn with_proxy(credential: Credential, config: ClientConfig, proxy: &str) -> Result<Self> {
        Ok(Self::with_transport(
            credential,
            config,
            Arc::new(HttpClient::with_proxy(proxy)?),
        ))
    }

    /// Create a session on top of a custom transport.
    pub fn with_transport(
        credential: Credential,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let dispatcher = Dispatcher::new(config.concurrency);
        Self {
            api: ApiClient::new(credential, config, transport),
            dispatcher,
        }
    }

    /// Bucket this session operates on.
    pub fn bucket(&self) -> &str {
        self.api.credential().bucket()
    }

    /// Configuration the session was built with.
    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    /// The signing client used for direct requests.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The dispatcher mediating uploads and deletes.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub(crate) fn fan_out(&self) -> usize {
        self.config().fan_out.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let config = ClientConfig::default().with_concurrency(3);
        let session = Session::new(Credential::new("demo", "operator", "password"), config);

        assert_eq!(session.bucket(), "demo");
        assert_eq!(session.dispatcher().limit(), 3);
        assert_eq!(session.config().domain, "v0.api.upyun.com");
    }

    #[test]
    fn test_proxy_session() {
        let session = Session::with_proxy(
            Credential::new("demo", "operator", "password"),
            ClientConfig::default(),
            "http://127.0.0.1:8080",
        );
        assert!(session.is_ok());
    }

    #[test]
    fn test_clones_share_dispatcher() {
        let session = Session::new(
            Credential::new("demo", "operator", "password"),
            ClientConfig::default(),
        );
        let clone = session.clone();
        assert_eq!(clone.dispatcher().limit(), session.dispatcher().limit());
        assert_eq!(clone.bucket(), "demo");
    }
}
