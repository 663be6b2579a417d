//! Output formats for slices

use image::ImageFormat;
use serde::Deserialize;
use zip::CompressionMethod;

/// Prefix of every file name inside the archive
pub const SLICE_PREFIX: &str = "slice";

/// Lossless format every slice is re-encoded to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliceFormat {
    /// Portable Network Graphics
    #[default]
    Png,
    /// Uncompressed TIFF
    Tiff,
}

impl SliceFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            SliceFormat::Png => "png",
            SliceFormat::Tiff => "tiff",
        }
    }

    /// Encoder selector for the `image` crate
    pub fn image_format(&self) -> ImageFormat {
        match self {
            SliceFormat::Png => ImageFormat::Png,
            SliceFormat::Tiff => ImageFormat::Tiff,
        }
    }

    /// Archive entry name for the slice at `index` (1-based)
    pub fn slice_name(&self, index: usize) -> String {
        format!("{}_{}.{}", SLICE_PREFIX, index, self.extension())
    }

    /// PNG data is already deflated, so it is stored as-is
    pub fn archive_compression(&self) -> CompressionMethod {
        match self {
            SliceFormat::Png => CompressionMethod::Stored,
            SliceFormat::Tiff => CompressionMethod::Deflated,
        }
    }
}
