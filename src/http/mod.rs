//! Minimal HTTP primitive the generators and results talk to.
//!
//! The production implementation is [`ReqwestTransport`]; tests swap in an
//! in-memory transport through the [`Transport`] trait.

pub mod client;

pub use client::ReqwestTransport;

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::core::{ReportError, ReportResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        HttpRequest {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post_json<T: serde::Serialize>(url: impl Into<String>, body: &T) -> ReportResult<Self> {
        let body = serde_json::to_vec(body)
            .map_err(|e| ReportError::InvalidRequest(format!("Cannot encode request body: {}", e)))?;

        Ok(HttpRequest {
            method: Method::Post,
            url: url.into(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Decodes the request body as JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }
}

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        HttpResponse {
            status,
            status_text: canonical_reason(status).to_string(),
            body: body.into(),
        }
    }

    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn bytes(&self) -> Bytes {
        self.body.clone()
    }

    pub fn json<T: DeserializeOwned>(&self) -> ReportResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            ReportError::InvalidResponse(format!("{} ({})", e, self.text()))
        })
    }
}

fn canonical_reason(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("")
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request. Non-success statuses are returned as responses, not
    /// errors; only connection-level failures are `Err`.
    async fn send(&self, request: HttpRequest) -> ReportResult<HttpResponse>;
}
