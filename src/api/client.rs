//! UpYun API client with request signing and response checking.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_LENGTH, DATE, EXPECT,
};
use reqwest::{Method, StatusCode};
use tracing::debug;

use crate::auth::Credential;
use crate::config::ClientConfig;
use crate::error::{Result, UpyunError};
use crate::http::{RawResponse, RequestDescriptor, Transport};

/// Format the current time the way the `Date` header expects (RFC 1123).
pub fn http_date() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Build a header value from a caller supplied string.
pub(crate) fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| UpyunError::InvalidHeader(format!("{}: {}", value, e)))
}

/// Build a header name from a caller supplied string.
pub(crate) fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| UpyunError::InvalidHeader(format!("{}: {}", name, e)))
}

/// Signed request client bound to one bucket.
///
/// Every call performs exactly one transport round trip. Retrying is left
/// to the [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, Clone)]
pub struct ApiClient {
    credential: Arc<Credential>,
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(
        credential: Credential,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            credential: Arc::new(credential),
            config: Arc::new(config),
            transport,
        }
    }

    /// Credentials this client signs with.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Assemble a signed request for `path` using an explicit `date`.
    ///
    /// `path` is the raw object path; each segment is percent-encoded once
    /// and the encoded form is used for both the URL and the signature.
    ///
    /// # Arguments
    /// * `path` - Path inside the bucket, starting with `/`
    /// * `query` - Optional query appended verbatim after `?` (e.g. `"usage"`)
    /// * `method` - HTTP method
    /// * `body` - Request body (may be empty)
    /// * `headers` - Caller headers; signing headers override same-named ones
    /// * `date` - Value for the `Date` header, also used in the signature
    pub fn build_request(
        &self,
        path: &str,
        query: Option<&str>,
        method: Method,
        body: Bytes,
        mut headers: HeaderMap,
        date: &str,
    ) -> Result<RequestDescriptor> {
        let mut full_uri = format!(
            "/{}{}",
            encode_path(self.credential.bucket()),
            encode_path(path)
        );
        if let Some(query) = query {
            full_uri.push('?');
            full_uri.push_str(query);
        }

        let length = body.len();
        let authorization = self
            .credential
            .sign(method.as_str(), &full_uri, date, length);

        headers.insert(EXPECT, HeaderValue::from_static(""));
        headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
        headers.insert(DATE, header_value(date)?);
        headers.insert(AUTHORIZATION, header_value(&authorization)?);

        Ok(RequestDescriptor {
            url: format!("{}{}", self.config.endpoint(), full_uri),
            uri: full_uri,
            method,
            body,
            headers,
            options: self.config.transport_options(),
        })
    }

    /// Sign and send a request, failing on any status other than 200.
    ///
    /// # Returns
    /// The full response (status, headers, raw body) for the caller to interpret.
    pub async fn execute(
        &self,
        path: &str,
        method: Method,
        body: Bytes,
        headers: HeaderMap,
    ) -> Result<RawResponse> {
        self.send(path, None, method, body, headers).await
    }

    /// Body-less request with no extra headers.
    pub async fn probe(&self, path: &str, method: Method) -> Result<RawResponse> {
        self.send(path, None, method, Bytes::new(), HeaderMap::new())
            .await
    }

    /// Body-less request carrying a query marker such as `usage`.
    pub async fn probe_query(
        &self,
        path: &str,
        query: &str,
        method: Method,
    ) -> Result<RawResponse> {
        self.send(path, Some(query), method, Bytes::new(), HeaderMap::new())
            .await
    }

    async fn send(
        &self,
        path: &str,
        query: Option<&str>,
        method: Method,
        body: Bytes,
        headers: HeaderMap,
    ) -> Result<RawResponse> {
        let request = self.build_request(path, query, method, body, headers, &http_date())?;
        let url = request.url.clone();
        debug!(method = %request.method, url = %url, bytes = request.body.len(), "api request");

        let response = self.transport.send(request).await?;
        if response.status != StatusCode::OK {
            debug!(status = response.status.as_u16(), url = %url, "api request failed");
            return Err(UpyunError::HttpError {
                status: response.status.as_u16(),
                body: String::from_utf8_lossy(&response.body).into_owned(),
                url,
            });
        }

        Ok(response)
    }
}

/// Percent-encode every segment of `path`, keeping the `/` separators.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}
