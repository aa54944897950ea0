/// Fallback MIME type for content whose type cannot be inferred.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Guesses a MIME type from a file name's extension.
pub fn guess_mimetype(file_name: &str) -> Option<&'static str> {
    let (_, extension) = file_name.rsplit_once('.')?;

    let mimetype = match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "glb" => "model/gltf-binary",
        "gltf" => "model/gltf+json",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "car" => "application/vnd.ipld.car",
        "wasm" => "application/wasm",
        "js" => "text/javascript",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "csv" => "text/csv",
        "md" => "text/markdown",
        "txt" => "text/plain",
        "xml" => "application/xml",
        _ => return None,
    };

    Some(mimetype)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mimetype() {
        assert_eq!(guess_mimetype("han.png"), Some("image/png"));
        assert_eq!(guess_mimetype("photo.JPEG"), Some("image/jpeg"));
        assert_eq!(guess_mimetype("archive.tar.zip"), Some("application/zip"));
        assert_eq!(guess_mimetype("noextension"), None);
        assert_eq!(guess_mimetype("weird.xyz"), None);
    }
}
