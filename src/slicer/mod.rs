//! Slice-and-package service
//!
//! Takes the original image bytes and a band coordinate document, cuts one
//! lossless image per band out of the full-resolution source and packs them
//! into a zip archive in band order.

mod format;
mod coords;
mod plan;
mod encode;
mod archive;
mod service;
#[cfg(test)]
mod tests;

pub use format::SliceFormat;
pub use coords::SliceCoords;
pub use plan::{plan_slices, SlicePlan};
pub use encode::{init_encode_pool, EncodedSlice, SliceEncoder, SliceObserver};
pub use archive::SliceArchive;
pub use service::{SliceOutput, SliceService};
