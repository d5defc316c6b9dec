use std::path::Path;

use anyhow::Context as _;
use base64::Engine as _;

use crate::foundation::error::{FlyerError, FlyerResult};

const FALLBACK_MIME: &str = "application/octet-stream";

/// Opaque encoded image bytes plus the mime type they were sniffed as.
///
/// Nothing here checks that the bytes actually decode. A file that is not an image is carried
/// through unchanged and renders as a broken image downstream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageData {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Wrap raw bytes, sniffing the mime type from the content.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let mime = sniff_mime(&bytes);
        Self { mime, bytes }
    }

    pub fn from_path(path: impl AsRef<Path>) -> FlyerResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read image '{}'", path.display()))?;
        Ok(Self::from_bytes(bytes))
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.to_base64())
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    pub fn from_data_url(url: &str) -> FlyerResult<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| FlyerError::validation("data url must start with 'data:'"))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| FlyerError::validation("data url is missing ',' separator"))?;
        let mime = meta
            .strip_suffix(";base64")
            .ok_or_else(|| FlyerError::validation("only base64 data urls are supported"))?;
        let mime = if mime.is_empty() { FALLBACK_MIME } else { mime };
        Self::from_base64(mime, payload)
    }

    pub fn from_base64(mime: impl Into<String>, payload: &str) -> FlyerResult<Self> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| FlyerError::validation(format!("invalid base64 image payload: {e}")))?;
        Ok(Self::new(mime, bytes))
    }

    /// Preferred file extension for the sniffed mime type.
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/bmp" => "bmp",
            "image/svg+xml" => "svg",
            _ => "bin",
        }
    }
}

fn sniff_mime(bytes: &[u8]) -> String {
    if let Ok(fmt) = image::guess_format(bytes) {
        return fmt.to_mime_type().to_owned();
    }
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start();
    if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")) {
        return "image/svg+xml".to_owned();
    }
    FALLBACK_MIME.to_owned()
}
