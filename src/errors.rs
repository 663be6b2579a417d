//! Custom error types for slicing and serving

use std::fmt;
use std::io;

/// Slicing-specific error types
#[derive(Debug)]
pub enum SliceError {
    /// I/O error
    IoError(io::Error),
    /// The uploaded bytes could not be decoded or a slice could not be encoded
    ImageError(image::ImageError),
    /// The coordinate document is not valid JSON or has the wrong shape
    InvalidCoordinates(String),
    /// A requested rectangle is empty or reaches outside the image
    InvalidRegion(String),
    /// The request carried no band to slice
    NoBands,
    /// A required multipart field was missing from the upload
    MissingField(&'static str),
    /// Zip container failure
    ArchiveError(zip::result::ZipError),
    /// Configuration file could not be parsed
    ConfigError(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for SliceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceError::IoError(e) => write!(f, "I/O error: {}", e),
            SliceError::ImageError(e) => write!(f, "Image error: {}", e),
            SliceError::InvalidCoordinates(msg) => write!(f, "Invalid coordinates: {}", msg),
            SliceError::InvalidRegion(msg) => write!(f, "Invalid region: {}", msg),
            SliceError::NoBands => write!(f, "No bands to slice"),
            SliceError::MissingField(name) => write!(f, "Missing form field: {}", name),
            SliceError::ArchiveError(e) => write!(f, "Archive error: {}", e),
            SliceError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            SliceError::GenericError(msg) => write!(f, "Slicer error: {}", msg),
        }
    }
}

impl std::error::Error for SliceError {}

impl From<io::Error> for SliceError {
    fn from(error: io::Error) -> Self {
        SliceError::IoError(error)
    }
}

impl From<image::ImageError> for SliceError {
    fn from(error: image::ImageError) -> Self {
        SliceError::ImageError(error)
    }
}

impl From<serde_json::Error> for SliceError {
    fn from(error: serde_json::Error) -> Self {
        SliceError::InvalidCoordinates(error.to_string())
    }
}

impl From<zip::result::ZipError> for SliceError {
    fn from(error: zip::result::ZipError) -> Self {
        SliceError::ArchiveError(error)
    }
}

impl From<toml::de::Error> for SliceError {
    fn from(error: toml::de::Error) -> Self {
        SliceError::ConfigError(error.to_string())
    }
}

/// Result type for slicing operations
pub type SliceResult<T> = Result<T, SliceError>;

impl From<String> for SliceError {
    fn from(msg: String) -> Self {
        SliceError::GenericError(msg)
    }
}
