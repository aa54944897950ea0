use std::time::Duration;

use pinnacle_common::{FilePart, PinError, Result};
use reqwest::header::CONTENT_TYPE;
use tracing::trace;

use super::{BlockingTransport, HttpRequest, HttpResponse, Method, RequestBody, Transport};

/// [`Transport`] backed by an async [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Creates a transport whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(PinError::transport)?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Raw(raw) => {
                trace!("sending {} raw bytes to {}", raw.bytes.len(), request.url);
                builder.header(CONTENT_TYPE, raw.content_type).body(raw.bytes)
            }
            RequestBody::Multipart { file, fields } => {
                trace!("sending {} multipart bytes to {}", file.bytes.len(), request.url);
                let mut form = reqwest::multipart::Form::new().part(file.field.clone(), file_part(file)?);
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                builder.multipart(form)
            }
        };

        let response = builder.send().await.map_err(PinError::transport)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(PinError::transport)?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

/// [`BlockingTransport`] backed by a [`reqwest::blocking::Client`].
///
/// Must not be used from within an async runtime.
#[derive(Debug, Clone, Default)]
pub struct BlockingReqwestTransport {
    client: reqwest::blocking::Client,
}

impl BlockingReqwestTransport {
    /// Creates a transport with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing client.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }

    /// Creates a transport whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(PinError::transport)?;
        Ok(Self { client })
    }
}

impl BlockingTransport for BlockingReqwestTransport {
    fn send_blocking(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Raw(raw) => builder.header(CONTENT_TYPE, raw.content_type).body(raw.bytes),
            RequestBody::Multipart { file, fields } => {
                let mut form =
                    reqwest::blocking::multipart::Form::new().part(file.field.clone(), blocking_file_part(file)?);
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                builder.multipart(form)
            }
        };

        let response = builder.send().map_err(PinError::transport)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(PinError::transport)?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

fn file_part(file: FilePart) -> Result<reqwest::multipart::Part> {
    let part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
    match file.mimetype {
        Some(mimetype) => part.mime_str(&mimetype).map_err(PinError::transport),
        None => Ok(part),
    }
}

fn blocking_file_part(file: FilePart) -> Result<reqwest::blocking::multipart::Part> {
    let part = reqwest::blocking::multipart::Part::bytes(file.bytes).file_name(file.file_name);
    match file.mimetype {
        Some(mimetype) => part.mime_str(&mimetype).map_err(PinError::transport),
        None => Ok(part),
    }
}
