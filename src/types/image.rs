use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Scannable code image fetched for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeImage {
    pub uid: String,
    pub payload: String,
    pub bytes: Vec<u8>,
}

impl CodeImage {
    /// Sniff the image format from its magic bytes.
    pub fn mime_type(&self) -> &'static str {
        match self.bytes.as_slice() {
            [0x89, b'P', b'N', b'G', ..] => "image/png",
            [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
            [b'G', b'I', b'F', b'8', ..] => "image/gif",
            _ => "application/octet-stream",
        }
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(&self.bytes))
    }
}
