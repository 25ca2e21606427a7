//! HTTP transport seam.
//!
//! The session never reaches for a process-wide client: whatever implements [`HttpClient`] is
//! handed in at construction. [`reqwest::Client`] is the stock implementation.

use std::future::Future;

use reqwest::{
    header::{HeaderMap, CONTENT_TYPE},
    Method, StatusCode,
};

use crate::error::Result;

/// Content type of signed (mutating) requests.
pub const JOSE_JSON: &str = "application/jose+json";

/// A request as issued by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub content_type: Option<&'static str>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: &str) -> Self {
        HttpRequest {
            method: Method::GET,
            url: url.to_owned(),
            content_type: None,
            body: None,
        }
    }

    pub fn head(url: &str) -> Self {
        HttpRequest {
            method: Method::HEAD,
            ..HttpRequest::get(url)
        }
    }

    /// POST with the signed-message content type.
    pub fn post_jose(url: &str, body: String) -> Self {
        HttpRequest {
            method: Method::POST,
            url: url.to_owned(),
            content_type: Some(JOSE_JSON),
            body: Some(body),
        }
    }
}

/// A fully-read response.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Declared content type, if present and readable.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE)?.to_str().ok()
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Something that can carry a request to the ACME server and read back the whole response.
pub trait HttpClient: Send + Sync {
    fn send_request(
        &self,
        req: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse>> + Send;
}

impl HttpClient for reqwest::Client {
    fn send_request(
        &self,
        req: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse>> + Send {
        let mut builder = self.request(req.method, &req.url);

        if let Some(content_type) = req.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        async move {
            let res = builder.send().await?;

            let status = res.status();
            let headers = res.headers().clone();

            let body = res.bytes().await?.to_vec();

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
