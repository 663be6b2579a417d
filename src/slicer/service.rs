//! Request-level slicing
//!
//! One call is one unit of work: parse the coordinates, decode the upload,
//! plan, encode in parallel, then append to the archive in band order. Any
//! error aborts the whole call before archive bytes leave this module.

use log::info;

use crate::errors::SliceResult;

use super::archive::SliceArchive;
use super::coords::SliceCoords;
use super::encode::{SliceEncoder, SliceObserver};
use super::format::SliceFormat;
use super::plan::plan_slices;

/// Result of a successful slicing call
#[derive(Debug, Clone)]
pub struct SliceOutput {
    /// Finalized zip archive
    pub archive: Vec<u8>,
    /// Number of slices in the archive
    pub slice_count: usize,
    /// Dimensions of the decoded source image
    pub source_size: (u32, u32),
}

/// Stateless slicing service
#[derive(Debug, Clone, Copy)]
pub struct SliceService {
    format: SliceFormat,
}

impl SliceService {
    /// Create a service producing `format` slices
    pub fn new(format: SliceFormat) -> Self {
        SliceService { format }
    }

    /// Output format of the slices
    pub fn format(&self) -> SliceFormat {
        self.format
    }

    /// Slice an image according to a JSON coordinate document
    ///
    /// # Arguments
    /// * `image` - Original encoded image bytes
    /// * `coords_json` - `{ "yRois": [...], "xRoi": [...] | null }`
    ///
    /// # Returns
    /// The finalized archive, or the first error encountered
    pub fn process(&self, image: &[u8], coords_json: &str) -> SliceResult<SliceOutput> {
        self.process_observed(image, coords_json, &())
    }

    /// Same as `process`, reporting every encoded slice to `observer`
    pub fn process_observed(&self, image: &[u8], coords_json: &str,
                            observer: &dyn SliceObserver) -> SliceResult<SliceOutput> {
        let coords = SliceCoords::from_json(coords_json)?;
        self.process_coords(image, &coords, observer)
    }

    /// Slice an image according to already parsed coordinates
    pub fn process_coords(&self, image: &[u8], coords: &SliceCoords,
                          observer: &dyn SliceObserver) -> SliceResult<SliceOutput> {
        let source = image::load_from_memory(image)?;
        let (width, height) = (source.width(), source.height());
        info!("Slicing {}x{} image into {} band(s), crop region: {:?}",
              width, height, coords.band_count(), coords.x_roi);

        let plans = plan_slices(coords, width, height, self.format)?;
        let slices = SliceEncoder::new(self.format).encode_all(&source, &plans, observer)?;

        let mut archive = SliceArchive::new(self.format);
        for slice in &slices {
            archive.append(&slice.name, &slice.data)?;
        }
        let slice_count = archive.len();
        let archive = archive.finish()?;

        info!("Archive ready: {} slice(s), {} bytes", slice_count, archive.len());
        Ok(SliceOutput { archive, slice_count, source_size: (width, height) })
    }
}
