//! In-memory transport used by the unit tests.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;

use crate::auth::Credential;
use crate::config::ClientConfig;
use crate::error::{Result, UpyunError};
use crate::http::{RawResponse, RequestDescriptor, Transport};
use crate::session::Session;

type Handler = Box<dyn Fn(&RequestDescriptor) -> Result<RawResponse> + Send + Sync>;

struct Route {
    method: String,
    uri: String,
    handler: Handler,
}

/// A request as seen by the mock.
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: String,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Routes requests by method and bucket-qualified URI and records them in
/// arrival order. Unrouted requests get a 404.
pub(crate) struct MockTransport {
    routes: Mutex<Vec<Route>>,
    log: Mutex<Vec<Recorded>>,
    delay: Mutex<Option<Duration>>,
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransport").finish_non_exhaustive()
    }
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            routes: Mutex::new(Vec::new()),
            log: Mutex::new(Vec::new()),
            delay: Mutex::new(None),
        })
    }

    /// Register a handler; later registrations win over earlier ones.
    pub fn on<F>(&self, method: &str, uri: &str, handler: F)
    where
        F: Fn(&RequestDescriptor) -> Result<RawResponse> + Send + Sync + 'static,
    {
        self.routes.lock().unwrap().push(Route {
            method: method.to_string(),
            uri: uri.to_string(),
            handler: Box::new(handler),
        });
    }

    /// Make every request take `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn reply(
        status: u16,
        headers: &[(&str, &str)],
        body: impl Into<Bytes>,
    ) -> Result<RawResponse> {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.insert(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        Ok(RawResponse::new(
            StatusCode::from_u16(status).unwrap(),
            map,
            body,
        ))
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    /// `"METHOD /uri"` for each request, in arrival order.
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| format!("{} {}", r.method, r.uri))
            .collect()
    }

    pub fn position(&self, call: &str) -> Option<usize> {
        self.calls().iter().position(|c| c == call)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<RawResponse> {
        self.log.lock().unwrap().push(Recorded {
            method: request.method.to_string(),
            uri: request.uri.clone(),
            headers: request.headers.clone(),
            body: request.body.clone(),
        });

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let routes = self.routes.lock().unwrap();
        let method = request.method.as_str();
        match routes
            .iter()
            .rev()
            .find(|r| r.method == method && r.uri == request.uri)
        {
            Some(route) => (route.handler)(&request),
            None => MockTransport::reply(404, &[], "no route"),
        }
    }
}

/// A failing handler result that looks like a dropped connection.
pub(crate) fn connection_reset() -> Result<RawResponse> {
    Err(UpyunError::Transport("connection reset".to_string()))
}

/// Listing body in the wire format: `name\tF|N\tsize\tmodified` per line.
pub(crate) fn listing(entries: &[(&str, char, u64, i64)]) -> String {
    entries
        .iter()
        .map(|(name, marker, size, modified)| format!("{}\t{}\t{}\t{}", name, marker, size, modified))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Session for bucket `demo` backed by `transport`.
pub(crate) fn session(transport: Arc<MockTransport>) -> Session {
    Session::with_transport(
        Credential::new("demo", "operator", "password"),
        ClientConfig::default(),
        transport,
    )
}
