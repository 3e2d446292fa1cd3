//! Storage usage operations.

use reqwest::Method;

use crate::error::{Result, UpyunError};
use crate::session::Session;

/// Query marker appended to a path to ask for its usage.
const USAGE_QUERY: &str = "usage";

impl Session {
    /// Get the number of bytes stored under `path` (use `"/"` for the bucket).
    pub async fn usage(&self, path: &str) -> Result<u64> {
        let response = self
            .api()
            .probe_query(path, USAGE_QUERY, Method::GET)
            .await?;

        let body = String::from_utf8_lossy(&response.body);
        body.trim()
            .parse()
            .map_err(|_| UpyunError::Parse(format!("invalid usage value {:?}", body)))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::UpyunError;
    use crate::testing::{session, MockTransport};

    #[tokio::test]
    async fn test_usage() {
        let transport = MockTransport::new();
        transport.on("GET", "/demo/?usage", |_| {
            MockTransport::reply(200, &[], "1048576\n")
        });
        let session = session(transport.clone());

        assert_eq!(session.usage("/").await.unwrap(), 1_048_576);
        assert_eq!(transport.calls(), vec!["GET /demo/?usage"]);
    }

    #[tokio::test]
    async fn test_usage_not_a_number() {
        let transport = MockTransport::new();
        transport.on("GET", "/demo/dir/?usage", |_| {
            MockTransport::reply(200, &[], "lots")
        });
        let session = session(transport);

        assert!(matches!(
            session.usage("/dir/").await,
            Err(UpyunError::Parse(_))
        ));
    }
}
