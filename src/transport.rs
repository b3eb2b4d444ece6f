use std::time::Duration;

use async_trait::async_trait;
use goose::prelude::GooseUser;
use goose::metrics::GooseRequestMetric;
use hyper::client::HttpConnector;
use hyper::{Client, Uri};

use crate::error::TransportError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Issues a GET for a path-and-query and reports the response status.
#[async_trait]
pub trait Transport: Send {
    async fn get(&mut self, target: &str) -> Result<u16, TransportError>;
}

/// Appends `target` to `base_url` as plain text, keeping any path prefix of
/// the base.
pub fn join_url(base_url: &str, target: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), target)
}

/// Sends requests through a goose user, so the harness records timings and
/// owns the connection pool.
///
/// Targets are sent as absolute URLs built from the user's base URL. Goose
/// would otherwise resolve a leading `/` against the host root and drop a
/// path prefix such as `http://shop.test/store`.
pub struct GooseTransport<'a> {
    user: &'a mut GooseUser,
    base_url: String,
    request: Option<GooseRequestMetric>,
}

impl<'a> GooseTransport<'a> {
    pub fn new(user: &'a mut GooseUser) -> Self {
        let base_url = user.base_url.as_str().to_owned();
        Self {
            user,
            base_url,
            request: None,
        }
    }

    pub fn url(&self, target: &str) -> String {
        join_url(&self.base_url, target)
    }

    /// Metric of the last request, needed to flag it as failed afterwards.
    pub fn into_request(self) -> Option<GooseRequestMetric> {
        self.request
    }
}

#[async_trait]
impl Transport for GooseTransport<'_> {
    async fn get(&mut self, target: &str) -> Result<u16, TransportError> {
        let url = self.url(target);
        let goose = self
            .user
            .get(&url)
            .await
            .map_err(|err| TransportError::Request(err.to_string()))?;
        self.request = Some(goose.request);

        match goose.response {
            Ok(response) => Ok(response.status().as_u16()),
            Err(err) => Err(TransportError::Request(err.to_string())),
        }
    }
}

pub struct HyperTransport {
    client: Client<HttpConnector>,
    base_url: String,
    timeout: Duration,
}

impl HyperTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout,
        }
    }

    fn uri(&self, target: &str) -> Result<Uri, TransportError> {
        let uri = join_url(&self.base_url, target);
        uri.parse::<Uri>()
            .map_err(|source| TransportError::InvalidUri { uri, source })
    }

    async fn send(&self, uri: Uri) -> Result<u16, TransportError> {
        let response = self.client.get(uri).await?;
        let status = response.status().as_u16();
        // Drain the body so the connection goes back to the pool.
        hyper::body::to_bytes(response.into_body()).await?;
        Ok(status)
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn get(&mut self, target: &str) -> Result<u16, TransportError> {
        let uri = self.uri(target)?;
        tokio::time::timeout(self.timeout, self.send(uri))
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))?
    }
}
