//! One-dimensional pixel span
//!
//! Bands and the crop region are both a `[start, end]` range along one axis
//! of the image. All editing happens in image pixel space, so the span
//! operations below take an explicit `[0, limit]` bound rather than knowing
//! anything about the screen.

/// Minimum distance kept between the two edges of a span during a resize
pub const MIN_SPAN_LENGTH: f64 = 1.0;

/// Which edge of a span is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanEdge {
    /// The top edge of a band or the left edge of the crop region
    Start,
    /// The bottom edge of a band or the right edge of the crop region
    End,
}

/// A `[start, end]` range along one image axis, always `start <= end`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    /// First pixel row/column covered by the span
    pub start: f64,
    /// Row/column immediately after the span
    pub end: f64,
}

impl Span {
    /// Create a span from two values in any order
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Span { start: a, end: b }
        } else {
            Span { start: b, end: a }
        }
    }

    /// A span covering `fraction_start..fraction_end` of `extent`
    pub fn fraction_of(extent: f64, fraction_start: f64, fraction_end: f64) -> Self {
        Span::new(extent * fraction_start, extent * fraction_end)
    }

    /// Length of the span
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Move the whole span by `delta`, keeping its length and staying inside `[0, limit]`
    pub fn translated(&self, delta: f64, limit: f64) -> Self {
        let length = self.length().min(limit);
        let start = (self.start + delta).clamp(0.0, limit - length);
        Span { start, end: start + length }
    }

    /// Move one edge by `delta`
    ///
    /// The moved edge is clamped into `[0, limit]` and never crosses closer
    /// than `MIN_SPAN_LENGTH` to the opposite edge.
    pub fn resized(&self, edge: SpanEdge, delta: f64, limit: f64) -> Self {
        match edge {
            SpanEdge::Start => {
                let upper = (self.end - MIN_SPAN_LENGTH).max(0.0);
                let start = (self.start + delta).clamp(0.0, upper);
                Span { start, end: self.end }
            }
            SpanEdge::End => {
                let lower = (self.start + MIN_SPAN_LENGTH).min(limit);
                let end = (self.end + delta).clamp(lower, limit);
                Span { start: self.start, end }
            }
        }
    }

    /// Both ends rounded to the nearest integer pixel
    pub fn rounded(&self) -> [i64; 2] {
        [self.start.round() as i64, self.end.round() as i64]
    }

    /// True when both ends lie within `[0, limit]`
    pub fn within(&self, limit: f64) -> bool {
        self.start >= 0.0 && self.end <= limit && self.start <= self.end
    }
}
