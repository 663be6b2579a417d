//! View transform
//!
//! Maps image pixels to canvas pixels: `screen = image * base_scale * zoom + pan`.
//! Purely presentational; stored ROI coordinates never pass through here
//! except to convert a pointer delta back into image pixels.

use crate::geometry::Point;

/// Size of the on-screen canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }
}

/// Display scale for a freshly loaded image
///
/// Images smaller than the viewport in both dimensions are enlarged to fill
/// it; anything else is shrunk to fit and never enlarged.
pub fn fit_or_fill_scale(image_width: u32, image_height: u32, viewport: Viewport) -> f64 {
    if image_width == 0 || image_height == 0 {
        return 1.0;
    }
    let w = image_width as f64;
    let h = image_height as f64;
    let ratio_x = viewport.width / w;
    let ratio_y = viewport.height / h;

    if w < viewport.width && h < viewport.height {
        ratio_x.max(ratio_y).max(1.0)
    } else {
        ratio_x.min(ratio_y).min(1.0)
    }
}

/// Current mapping from image space to screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Fit-or-fill factor computed when the image was loaded
    pub base_scale: f64,
    /// User zoom on top of the base scale
    pub zoom: f64,
    /// Screen offset of the image origin
    pub pan: Point,
}

impl ViewTransform {
    /// No scaling, no offset
    pub fn identity() -> Self {
        ViewTransform { base_scale: 1.0, zoom: 1.0, pan: Point::origin() }
    }

    /// Initial transform for an image shown in `viewport`
    pub fn for_image(image_width: u32, image_height: u32, viewport: Viewport) -> Self {
        ViewTransform {
            base_scale: fit_or_fill_scale(image_width, image_height, viewport),
            ..Self::identity()
        }
    }

    /// Effective image-to-screen factor
    pub fn scale(&self) -> f64 {
        self.base_scale * self.zoom
    }

    pub fn zoom_in(&mut self, step: f64) {
        self.zoom *= step;
    }

    pub fn zoom_out(&mut self, step: f64) {
        self.zoom /= step;
    }

    /// Shift the image on screen by a pointer delta
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan = self.pan.offset(dx, dy);
    }

    /// Image pixel position to canvas position
    pub fn to_screen(&self, point: Point) -> Point {
        let s = self.scale();
        Point::new(point.x * s + self.pan.x, point.y * s + self.pan.y)
    }

    /// Canvas position to image pixel position
    pub fn to_image(&self, point: Point) -> Point {
        let s = self.scale();
        Point::new((point.x - self.pan.x) / s, (point.y - self.pan.y) / s)
    }

    /// Screen distance to image distance
    pub fn to_image_distance(&self, distance: f64) -> f64 {
        distance / self.scale()
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}
