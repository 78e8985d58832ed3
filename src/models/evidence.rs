//! User-submitted material included in a single analysis request.

/// Maximum number of screenshots included in one request. Applied by the
/// upload handler; anything past this is dropped with a warning.
pub const MAX_IMAGES: usize = 4;

/// One unit of user-submitted evidence, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evidence {
    /// A block of pasted text (the suspicious message or listing).
    Text(String),
    /// A screenshot, as raw bytes plus the MIME type sniffed from them.
    Image { mime_type: String, data: Vec<u8> },
}

impl Evidence {
    pub fn is_image(&self) -> bool {
        matches!(self, Evidence::Image { .. })
    }
}
