//! Parallel crop and encode
//!
//! Every slice is an independent read-only view of the same decoded source,
//! so slices are cropped and encoded on the rayon pool. The results come
//! back in plan order regardless of which slice finished first.

use std::io::Cursor;

use image::DynamicImage;
use log::{debug, warn};
use rayon::prelude::*;

use crate::errors::SliceResult;

use super::format::SliceFormat;
use super::plan::SlicePlan;

/// Receives a notification for each finished slice
///
/// Called from rayon worker threads, in completion order.
pub trait SliceObserver: Sync {
    /// A slice has been cropped and encoded
    fn slice_encoded(&self, _plan: &SlicePlan, _encoded_bytes: usize) {}
}

impl SliceObserver for () {}

/// A finished archive entry
#[derive(Debug, Clone)]
pub struct EncodedSlice {
    /// Archive entry name
    pub name: String,
    /// Encoded image file
    pub data: Vec<u8>,
}

/// Crops slices out of a source image and encodes them
pub struct SliceEncoder {
    format: SliceFormat,
}

impl SliceEncoder {
    /// Create an encoder producing `format` files
    pub fn new(format: SliceFormat) -> Self {
        SliceEncoder { format }
    }

    /// Crop and encode a single slice
    pub fn encode_one(&self, source: &DynamicImage, plan: &SlicePlan) -> SliceResult<EncodedSlice> {
        let region = plan.region;
        let cropped = source.crop_imm(region.x, region.y, region.width, region.height);

        let mut buffer = Cursor::new(Vec::new());
        cropped.write_to(&mut buffer, self.format.image_format())?;

        let data = buffer.into_inner();
        debug!("Encoded {} ({}x{}, {} bytes)", plan.name, region.width, region.height, data.len());
        Ok(EncodedSlice { name: plan.name.clone(), data })
    }

    /// Crop and encode every slice in parallel
    ///
    /// # Arguments
    /// * `source` - Decoded original image
    /// * `plans` - Validated slice plans
    /// * `observer` - Progress receiver
    ///
    /// # Returns
    /// The encoded slices in the same order as `plans`, or the first error
    pub fn encode_all(&self, source: &DynamicImage, plans: &[SlicePlan],
                      observer: &dyn SliceObserver) -> SliceResult<Vec<EncodedSlice>> {
        plans.par_iter()
            .map(|plan| {
                let slice = self.encode_one(source, plan)?;
                observer.slice_encoded(plan, slice.data.len());
                Ok(slice)
            })
            .collect()
    }
}

/// Size the global rayon pool used by `encode_all`
///
/// `threads == 0` keeps rayon's default of one thread per core. The pool can
/// only be built once per process; later calls are ignored with a warning.
pub fn init_encode_pool(threads: usize) -> SliceResult<()> {
    if threads == 0 {
        return Ok(());
    }
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
        Ok(()) => {
            debug!("Encode pool sized to {} thread(s)", threads);
            Ok(())
        }
        Err(e) => {
            warn!("Encode pool already initialized, keeping {} thread(s): {}", rayon::current_num_threads(), e);
            Ok(())
        }
    }
}
