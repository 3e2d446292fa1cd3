//! HTTP transport for UpYun API requests.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};

use crate::error::{Result, UpyunError};

/// Per-request knobs handed to the transport alongside the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportOptions {
    /// Whole-request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

/// A fully assembled, signed request ready to be sent.
///
/// Built fresh by [`ApiClient`](crate::api::ApiClient) for every call and
/// consumed by the transport.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// Absolute URL (`http://domain/bucket/path`)
    pub url: String,
    /// Bucket-qualified, percent-encoded URI that was signed (`/bucket/path`)
    pub uri: String,
    /// HTTP method
    pub method: Method,
    /// Request body, empty for probes
    pub body: Bytes,
    /// Caller headers merged with the computed signing headers
    pub headers: HeaderMap,
    /// Transport options
    pub options: TransportOptions,
}

/// Raw response returned by a transport.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw response body, never text-decoded
    pub body: Bytes,
}

impl RawResponse {
    /// Build a response, mostly useful for custom transports.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Look up a header as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// The network collaborator that actually moves bytes.
///
/// Implementations perform exactly one round trip per call and must not
/// retry on their own; retries belong to the [`Dispatcher`](crate::Dispatcher).
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send the request and return whatever the server answered, whatever
    /// the status code.
    async fn send(&self, request: RequestDescriptor) -> Result<RawResponse>;
}

/// HTTP client for making requests to UpYun servers.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create a new HTTP client with a proxy.
    pub fn with_proxy(proxy: &str) -> Result<Self> {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|e| UpyunError::Custom(format!("Invalid proxy: {}", e)))?;

        let client = Client::builder()
            .proxy(proxy)
            .build()
            .map_err(|e| UpyunError::Custom(format!("Failed to build client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: RequestDescriptor) -> Result<RawResponse> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers)
            .body(request.body);

        if let Some(timeout) = request.options.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
