use std::{
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
};

use tracing::{debug, trace};

use crate::{guess_mimetype, Gateway, GatewayStyle, PinError, Result, OCTET_STREAM};

/// Name of the multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// A raw request body with its `Content-Type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBody {
    /// The file bytes
    pub bytes: Vec<u8>,
    /// The `Content-Type` header value
    pub content_type: String,
}

/// A file part of a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name
    pub field: String,
    /// File name sent with the part
    pub file_name: String,
    /// The file bytes
    pub bytes: Vec<u8>,
    /// Part content type, when requested
    pub mimetype: Option<String>,
}

/// A local file on its way to being pinned.
///
/// Content starts unopened, holds its bytes in memory while open, and carries the CID once a
/// backend has pinned it. The CID is the pinned state: it is set if and only if the content is
/// pinned.
#[derive(Debug, Clone)]
pub struct Content {
    path: PathBuf,
    mimetype: Option<String>,
    bytes: Option<Vec<u8>>,
    cid: Option<String>,
    gateway: Option<Gateway>,
}

impl Content {
    /// Creates a new, unopened [`Content`] for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), mimetype: None, bytes: None, cid: None, gateway: None }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last path segment, used as the display and multipart file name.
    pub fn basename(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }

    /// Whether the bytes are currently loaded.
    pub fn is_open(&self) -> bool {
        self.bytes.is_some()
    }

    /// Whether a backend has pinned this content.
    pub fn is_pinned(&self) -> bool {
        self.cid.is_some()
    }

    /// The CID, once pinned.
    pub fn cid(&self) -> Option<&str> {
        self.cid.as_deref()
    }

    /// The loaded bytes, if open.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    /// The explicitly set MIME type, or one inferred from the file extension, falling back to
    /// `application/octet-stream`.
    pub fn mimetype(&self) -> String {
        if let Some(mimetype) = &self.mimetype {
            return mimetype.clone();
        }

        guess_mimetype(&self.basename()).unwrap_or(OCTET_STREAM).to_string()
    }

    /// Overrides the inferred MIME type.
    pub fn set_mimetype(&mut self, mimetype: impl Into<String>) {
        self.mimetype = Some(mimetype.into());
    }

    /// Loads the file into memory.
    pub fn open(&mut self) -> Result<&mut Self> {
        self.ensure_closed()?;

        let bytes = std::fs::read(&self.path)
            .map_err(|source| PinError::Read { path: self.path.clone(), source })?;
        self.loaded(bytes);

        Ok(self)
    }

    /// Loads the file into memory without blocking the runtime.
    pub async fn open_async(&mut self) -> Result<&mut Self> {
        self.ensure_closed()?;

        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| PinError::Read { path: self.path.clone(), source })?;
        self.loaded(bytes);

        Ok(self)
    }

    /// Releases the loaded bytes.
    pub fn close(&mut self) -> Result<()> {
        if self.bytes.take().is_none() {
            return Err(PinError::NotOpen(self.path.clone()));
        }

        trace!("closed {}", self.path.display());
        Ok(())
    }

    /// Opens the content for the lifetime of the returned guard, which closes it on drop.
    pub fn open_scoped(&mut self) -> Result<ContentGuard<'_>> {
        self.open()?;
        Ok(ContentGuard { content: self })
    }

    /// Async counterpart of [`Content::open_scoped`].
    pub async fn open_scoped_async(&mut self) -> Result<ContentGuard<'_>> {
        self.open_async().await?;
        Ok(ContentGuard { content: self })
    }

    /// Shapes the content into a raw request body.
    pub fn prepare_raw_body(&self) -> Result<RawBody> {
        Ok(RawBody { bytes: self.loaded_bytes()?.to_vec(), content_type: self.mimetype() })
    }

    /// Shapes the content into the multipart `file` part, optionally typed with its MIME type.
    pub fn prepare_multipart(&self, include_mimetype: bool) -> Result<FilePart> {
        Ok(FilePart {
            field: FILE_FIELD.to_string(),
            file_name: self.basename(),
            bytes: self.loaded_bytes()?.to_vec(),
            mimetype: include_mimetype.then(|| self.mimetype()),
        })
    }

    /// Records that a backend pinned this content under `cid`. A later call replaces the CID.
    pub fn mark_pinned(&mut self, cid: impl Into<String>) {
        let cid = cid.into();
        debug!("{} pinned as {}", self.path.display(), cid);
        self.cid = Some(cid);
    }

    /// Gateway-agnostic `ipfs://<cid>` URI.
    pub fn uri(&self) -> Result<String> {
        Ok(format!("ipfs://{}", self.pinned_cid()?))
    }

    /// Attaches a gateway that takes priority over the named registry.
    pub fn add_gateway(&mut self, gateway: Gateway) {
        self.gateway = Some(gateway);
    }

    /// Detaches the override gateway, returning it.
    pub fn remove_gateway(&mut self) -> Option<Gateway> {
        self.gateway.take()
    }

    /// A URL to view the pinned content, through the attached gateway if there is one,
    /// otherwise through the registry gateway called `name`.
    pub fn gateway_url(&self, name: &str, style: GatewayStyle) -> Result<String> {
        let cid = self.pinned_cid()?;

        match &self.gateway {
            Some(gateway) => gateway.url(cid, style),
            None => Gateway::named(name)?.url(cid, style),
        }
    }

    fn ensure_closed(&self) -> Result<()> {
        if self.is_open() {
            return Err(PinError::AlreadyOpen(self.path.clone()));
        }
        Ok(())
    }

    fn loaded(&mut self, bytes: Vec<u8>) {
        trace!("read {} bytes from {}", bytes.len(), self.path.display());
        self.bytes = Some(bytes);
    }

    /// The loaded bytes, which must be non-empty to be shaped into a payload.
    fn loaded_bytes(&self) -> Result<&[u8]> {
        match self.bytes.as_deref() {
            None => Err(PinError::NotLoaded(self.path.clone())),
            Some([]) => Err(PinError::EmptyContent(self.path.clone())),
            Some(bytes) => Ok(bytes),
        }
    }

    fn pinned_cid(&self) -> Result<&str> {
        self.cid.as_deref().ok_or_else(|| PinError::NotPinned(self.path.clone()))
    }
}

/// Open [`Content`] that is closed again when the guard goes out of scope.
#[derive(Debug)]
pub struct ContentGuard<'a> {
    content: &'a mut Content,
}

impl Deref for ContentGuard<'_> {
    type Target = Content;

    fn deref(&self) -> &Content {
        self.content
    }
}

impl DerefMut for ContentGuard<'_> {
    fn deref_mut(&mut self) -> &mut Content {
        self.content
    }
}

impl Drop for ContentGuard<'_> {
    fn drop(&mut self) {
        // the guarded content may have been closed by hand already
        let _ = self.content.close();
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;
    use crate::Scheme;

    const CID: &str = "bafkreifjjcie6lypi6ny7amxnfftagclbuxndqonfipmb64f2km2devei4";

    fn fixture(name: &str, bytes: &[u8]) -> (TempDir, PathBuf) {
        let dir = TempDir::new("pinnacle-content").unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        (dir, path)
    }

    #[test]
    fn test_open_and_close() {
        let (_dir, path) = fixture("han.png", b"png bytes");
        let mut content = Content::new(&path);

        assert!(!content.is_open());
        content.open().unwrap();
        assert_eq!(content.bytes(), Some(&b"png bytes"[..]));

        assert!(matches!(content.open(), Err(PinError::AlreadyOpen(_))));

        content.close().unwrap();
        assert!(!content.is_open());
        assert!(matches!(content.close(), Err(PinError::NotOpen(_))));
    }

    #[test]
    fn test_close_before_open() {
        let mut content = Content::new("never-opened.png");

        assert!(matches!(content.close(), Err(PinError::NotOpen(_))));
    }

    #[test]
    fn test_open_missing_file() {
        let mut content = Content::new("/definitely/not/here.png");

        assert!(matches!(content.open(), Err(PinError::Read { .. })));
        assert!(!content.is_open());
    }

    #[tokio::test]
    async fn test_open_async() {
        let (_dir, path) = fixture("kai.png", b"kai");
        let mut content = Content::new(&path);

        content.open_async().await.unwrap();
        assert_eq!(content.bytes(), Some(&b"kai"[..]));
        assert!(matches!(content.open_async().await, Err(PinError::AlreadyOpen(_))));
    }

    #[test]
    fn test_scoped_closes_on_drop() {
        let (_dir, path) = fixture("han.png", b"png bytes");
        let mut content = Content::new(&path);

        {
            let guard = content.open_scoped().unwrap();
            assert!(guard.is_open());
        }
        assert!(!content.is_open());

        let result: Result<()> = (|| {
            let guard = content.open_scoped()?;
            guard.uri()?;
            Ok(())
        })();
        assert!(matches!(result, Err(PinError::NotPinned(_))));
        assert!(!content.is_open());
    }

    #[tokio::test]
    async fn test_scoped_async_closes_on_drop() {
        let (_dir, path) = fixture("han.png", b"png bytes");
        let mut content = Content::new(&path);

        {
            let mut guard = content.open_scoped_async().await.unwrap();
            guard.mark_pinned(CID);
        }
        assert!(!content.is_open());
        assert!(content.is_pinned());
    }

    #[test]
    fn test_mimetype() {
        let mut content = Content::new("images/han.png");
        assert_eq!(content.mimetype(), "image/png");

        content.set_mimetype("image/custom");
        assert_eq!(content.mimetype(), "image/custom");

        assert_eq!(Content::new("blob").mimetype(), OCTET_STREAM);
    }

    #[test]
    fn test_basename() {
        assert_eq!(Content::new("images/han.png").basename(), "han.png");
        assert_eq!(Content::new("han.png").basename(), "han.png");
    }

    #[test]
    fn test_prepare_requires_loaded_bytes() {
        let content = Content::new("han.png");

        assert!(matches!(content.prepare_raw_body(), Err(PinError::NotLoaded(_))));
        assert!(matches!(content.prepare_multipart(false), Err(PinError::NotLoaded(_))));
    }

    #[test]
    fn test_empty_file_has_no_payload() {
        let (_dir, path) = fixture("empty.txt", b"");
        let mut content = Content::new(&path);
        content.open().unwrap();

        assert_eq!(content.bytes(), Some(&b""[..]));
        assert!(matches!(content.prepare_raw_body(), Err(PinError::EmptyContent(_))));
        assert!(matches!(content.prepare_multipart(true), Err(PinError::EmptyContent(_))));
        content.close().unwrap();
    }

    #[test]
    fn test_prepare_payloads() {
        let (_dir, path) = fixture("han.png", b"png bytes");
        let mut content = Content::new(&path);
        content.open().unwrap();

        let raw = content.prepare_raw_body().unwrap();
        assert_eq!(raw, RawBody { bytes: b"png bytes".to_vec(), content_type: "image/png".into() });

        let part = content.prepare_multipart(false).unwrap();
        assert_eq!(part.field, FILE_FIELD);
        assert_eq!(part.file_name, "han.png");
        assert_eq!(part.bytes, b"png bytes");
        assert_eq!(part.mimetype, None);

        let part = content.prepare_multipart(true).unwrap();
        assert_eq!(part.mimetype.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_pinned_state() {
        let mut content = Content::new("han.png");

        assert!(!content.is_pinned());
        assert!(matches!(content.uri(), Err(PinError::NotPinned(_))));
        assert!(matches!(
            content.gateway_url("local", GatewayStyle::Path),
            Err(PinError::NotPinned(_))
        ));

        content.mark_pinned("first");
        content.mark_pinned(CID);
        assert!(content.is_pinned());
        assert_eq!(content.cid(), Some(CID));
        assert_eq!(content.uri().unwrap(), format!("ipfs://{CID}"));
    }

    #[test]
    fn test_gateway_url() {
        let mut content = Content::new("han.png");
        content.mark_pinned(CID);

        assert_eq!(
            content.gateway_url("local", GatewayStyle::Path).unwrap(),
            format!("http://127.0.0.1:8080/ipfs/{CID}/")
        );
        assert_eq!(
            content.gateway_url("ipfs", GatewayStyle::Subdomain).unwrap(),
            format!("https://{CID}.ipfs.ipfs.io/")
        );
        assert!(matches!(
            content.gateway_url("pinata", GatewayStyle::Subdomain),
            Err(PinError::UnsupportedSubdomain(_))
        ));
        assert!(matches!(
            content.gateway_url("nope", GatewayStyle::Path),
            Err(PinError::UnknownGateway { .. })
        ));
    }

    #[test]
    fn test_override_gateway_takes_priority() {
        let mut content = Content::new("han.png");
        content.mark_pinned(CID);
        content.add_gateway(Gateway::new("test", true, Scheme::Https));

        assert_eq!(
            content.gateway_url("local", GatewayStyle::Subdomain).unwrap(),
            format!("https://{CID}.ipfs.test/")
        );

        content.remove_gateway();
        assert_eq!(
            content.gateway_url("local", GatewayStyle::Path).unwrap(),
            format!("http://127.0.0.1:8080/ipfs/{CID}/")
        );
    }
}
