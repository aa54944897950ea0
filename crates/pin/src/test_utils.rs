use std::path::PathBuf;

use parking_lot::Mutex;
use pinnacle_common::{Content, Result};
use tempdir::TempDir;

use crate::{BlockingTransport, HttpRequest, HttpResponse, Transport};

pub(crate) const CID: &str = "bafkreifjjcie6lypi6ny7amxnfftagclbuxndqonfipmb64f2km2devei4";

/// Answers every request with the same canned response and remembers what was sent.
#[derive(Debug)]
pub(crate) struct RecordingTransport {
    response: HttpResponse,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub(crate) fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { response: HttpResponse::new(status, body), requests: Mutex::new(Vec::new()) }
    }

    pub(crate) fn json(body: serde_json::Value) -> Self {
        Self::new(200, body.to_string())
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    fn record(&self, request: HttpRequest) -> HttpResponse {
        self.requests.lock().push(request);
        self.response.clone()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        Ok(self.record(request))
    }
}

impl BlockingTransport for RecordingTransport {
    fn send_blocking(&self, request: HttpRequest) -> Result<HttpResponse> {
        Ok(self.record(request))
    }
}

/// Writes `bytes` to `name` in a fresh temporary directory.
pub(crate) fn fixture(name: &str, bytes: &[u8]) -> (TempDir, PathBuf) {
    let dir = TempDir::new("pinnacle-pin").unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    (dir, path)
}

/// An opened [`Content`] over a small png fixture.
pub(crate) fn opened_content() -> (TempDir, Content) {
    let (dir, path) = fixture("han.png", b"\x89PNG fixture");
    let mut content = Content::new(path);
    content.open().unwrap();
    (dir, content)
}
