//! Error types for the file-facing parts of the editor.
//!
//! The drawing core never fails: out-of-range cells are clipped, degenerate
//! shapes fall back, zoom is clamped. Only loading and saving can error.

/// Errors raised by settings, palette, project and export I/O, and by
/// the replay script parser.
#[derive(Debug, thiserror::Error)]
pub enum PixelFeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] bincode::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid palette: {0}")]
    InvalidPalette(String),

    #[error("Invalid script (line {line}): {message}")]
    InvalidScript { line: usize, message: String },
}
