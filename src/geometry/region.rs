//! Region structure for defining a crop area
//!
//! This module defines the Region structure that specifies a rectangular
//! area of an image to cut out as one slice. The coordinates are in pixels
//! and follow the typical image coordinate system where (0,0) is the top-left
//! corner of the image.

/// Region for slice extraction (in pixel coordinates)
///
/// Represents a rectangular area defined by its top-left corner coordinates
/// and dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// X-coordinate of the top-left corner (pixels from left)
    pub x: u32,

    /// Y-coordinate of the top-left corner (pixels from top)
    pub y: u32,

    /// Width of the region in pixels
    pub width: u32,

    /// Height of the region in pixels
    pub height: u32,
}

impl Region {
    /// Create a new region
    ///
    /// # Arguments
    /// * `x` - X-coordinate of the top-left corner
    /// * `y` - Y-coordinate of the top-left corner
    /// * `width` - Width of the region in pixels
    /// * `height` - Height of the region in pixels
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Region { x, y, width, height }
    }

    /// Get the rightmost X coordinate (exclusive)
    pub fn end_x(&self) -> u32 {
        self.x + self.width
    }

    /// Get the bottommost Y coordinate (exclusive)
    pub fn end_y(&self) -> u32 {
        self.y + self.height
    }

    /// True when the region covers no pixel at all
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check that the region lies completely inside an image
    ///
    /// # Arguments
    /// * `image_width` - Width of the source image in pixels
    /// * `image_height` - Height of the source image in pixels
    ///
    /// # Returns
    /// `true` if every pixel of the region exists in the image
    pub fn fits_within(&self, image_width: u32, image_height: u32) -> bool {
        // u64 so that x + width cannot wrap
        (self.x as u64 + self.width as u64) <= image_width as u64
            && (self.y as u64 + self.height as u64) <= image_height as u64
    }
}
