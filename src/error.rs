//! Error types for sheet indexing and dialog composition

use thiserror::Error;

/// A warning generated during dialog composition
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error when indexing an expression sheet or composing a dialog screen.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DialogError {
    /// Cell dimensions are zero or the body region exceeds the sheet.
    /// Callers treat this as "sheet has no expression grid", not a retry.
    #[error("Invalid sheet geometry: {0}")]
    InvalidGeometry(String),
    /// Source sheet or static art asset failed to decode
    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),
    /// Asset or config file I/O error
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed asset configuration
    #[error("Failed to parse asset config: {0}")]
    Config(#[from] toml::de::Error),
    /// Typeface bytes rejected by the font parser
    #[error("Failed to load typeface: {0}")]
    FontLoad(String),
    /// Expression index beyond the catalog length
    #[error("Expression selection {index} is out of range (catalog has {len} expressions)")]
    SelectionOutOfRange { index: usize, len: usize },
    /// Selected cell buffer does not match the head rectangle exactly.
    /// The overlay is a verbatim pixel replace, so sizes must agree.
    #[error("Expression cell is {actual_w}x{actual_h} but the head slot is {expected_w}x{expected_h}")]
    ExpressionSizeMismatch {
        expected_w: u32,
        expected_h: u32,
        actual_w: u32,
        actual_h: u32,
    },
}
