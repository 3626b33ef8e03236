//! JSON-over-HTTP adapter. Resolves with the decoded body on success and
//! rejects with a [`TransportError`] for everything else.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use shared::error::ErrorBody;
use tracing::{debug, warn};
use url::Url;

use crate::error::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, TransportError>;
}

pub struct MissingTransport;

#[async_trait]
impl Transport for MissingTransport {
    async fn send(
        &self,
        _method: Method,
        path: &str,
        _body: Option<Value>,
    ) -> Result<Value, TransportError> {
        Err(TransportError::Network(format!(
            "no transport configured for {path}"
        )))
    }
}

pub struct HttpTransport {
    http: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("invalid base url {base_url}"))?;
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build http client")?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `path` to the base url, keeping any prefix the base already has.
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            self.base_url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, TransportError> {
        let url = self.endpoint(path);
        let request = match method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
        }
        .header(header::CONTENT_TYPE, "application/json");
        let request = match body {
            Some(body) => request.json(&body),
            None => request,
        };

        let response = request.send().await.map_err(|err| {
            warn!(path, error = %err, "request failed before a response arrived");
            TransportError::Network(err.to_string())
        })?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;
        debug!(path, status = status.as_u16(), len = bytes.len(), "response received");

        if status.is_success() {
            serde_json::from_slice(&bytes).map_err(|err| TransportError::Malformed(err.to_string()))
        } else {
            let body = serde_json::from_slice::<Value>(&bytes)
                .or_else(|err| serde_json::to_value(ErrorBody::new(err.to_string())))
                .map_err(|err| TransportError::Malformed(err.to_string()))?;
            Err(TransportError::Backend {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
