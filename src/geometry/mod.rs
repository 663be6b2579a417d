//! Geometry primitives shared by the editor and the slicer
//!
//! Pixel-space rectangles for cropping, one-dimensional spans for band and
//! crop-region editing, and points for screen/image mapping.

mod region;
mod point;
mod span;

pub use self::region::Region;
pub use self::point::Point;
pub use self::span::{Span, SpanEdge, MIN_SPAN_LENGTH};
