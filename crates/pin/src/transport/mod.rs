//! HTTP plumbing shared by every backend.
//!
//! Backends only describe requests and interpret responses; a [`Transport`] (async) or
//! [`BlockingTransport`] actually sends them. This keeps one copy of each backend's logic for
//! both calling conventions.

use std::future::Future;

use pinnacle_common::{FilePart, PinError, RawBody, Result};
use serde::de::DeserializeOwned;

mod http;

pub use http::{BlockingReqwestTransport, ReqwestTransport};

/// HTTP method of a [`HttpRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
}

/// Body of a [`HttpRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// No body
    Empty,
    /// Raw bytes sent with their own `Content-Type`
    Raw(RawBody),
    /// `multipart/form-data` with a file part and extra text fields
    Multipart {
        /// The file part
        file: FilePart,
        /// Additional text fields, in order
        fields: Vec<(String, String)>,
    },
}

/// A transport-agnostic HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL, without query string
    pub url: String,
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// Request headers
    pub headers: Vec<(String, String)>,
    /// Request body
    pub body: RequestBody,
}

impl HttpRequest {
    /// A GET request to `url`.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// A POST request to `url` carrying `body`.
    pub fn post(url: impl Into<String>, body: RequestBody) -> Self {
        Self { method: Method::Post, body, ..Self::get(url) }
    }

    /// Appends a query parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Appends a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// The first value of header `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The first value of query parameter `name`.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }
}

/// A transport-agnostic HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Raw body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new [`HttpResponse`]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx response into a [`PinError::Status`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        Err(PinError::Status {
            status: self.status,
            body: String::from_utf8_lossy(&self.body).into_owned(),
        })
    }

    /// Checks the status, then deserializes the body as `backend`'s response schema.
    pub fn json<T: DeserializeOwned>(self, backend: &'static str) -> Result<T> {
        let response = self.error_for_status()?;
        serde_json::from_slice(&response.body).map_err(|e| PinError::schema(backend, e))
    }
}

/// Sends requests without blocking the calling task.
pub trait Transport {
    /// Sends `request`. Only failures to obtain a response are errors; a non-2xx status is
    /// returned as a normal response.
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse>> + Send;
}

/// Sends requests on the calling thread.
pub trait BlockingTransport {
    /// Sends `request`, blocking until the response is read.
    fn send_blocking(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        cid: String,
    }

    #[test]
    fn test_request_builders() {
        let request = HttpRequest::post("http://localhost/add", RequestBody::Empty)
            .with_query("cid-version", 1)
            .with_header("Authorization", "Bearer JWT");

        assert_eq!(request.method, Method::Post);
        assert_eq!(request.query_param("cid-version"), Some("1"));
        assert_eq!(request.header("authorization"), Some("Bearer JWT"));
        assert_eq!(request.header("content-type"), None);
        assert_eq!(HttpRequest::get("http://localhost").method, Method::Get);
    }

    #[test]
    fn test_error_for_status() {
        assert!(HttpResponse::new(200, "{}").error_for_status().is_ok());

        match HttpResponse::new(401, "unauthorized").error_for_status() {
            Err(PinError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "unauthorized");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn test_json() {
        let body: Body = HttpResponse::new(200, r#"{"cid":"bafy"}"#).json("test").unwrap();
        assert_eq!(body.cid, "bafy");

        assert!(matches!(
            HttpResponse::new(200, r#"{"nope":1}"#).json::<Body>("test"),
            Err(PinError::Schema { backend: "test", .. })
        ));
        assert!(matches!(
            HttpResponse::new(500, r#"{"cid":"bafy"}"#).json::<Body>("test"),
            Err(PinError::Status { status: 500, .. })
        ));
    }
}
