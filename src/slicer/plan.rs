//! Turning band coordinates into validated crop rectangles

use log::debug;

use crate::errors::{SliceError, SliceResult};
use crate::geometry::Region;

use super::coords::SliceCoords;
use super::format::SliceFormat;

/// One slice to produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicePlan {
    /// Position of the band in the request, starting at 1
    pub index: usize,
    /// Archive entry name
    pub name: String,
    /// Rectangle to crop from the original image
    pub region: Region,
}

/// Compute the crop rectangle of every band
///
/// Each band spans its own rows and the crop region's columns, or the full
/// width when there is no crop region. Rectangles that are empty or reach
/// outside the image are rejected, so a failing request never produces a
/// partial archive.
///
/// # Arguments
/// * `coords` - Band and crop coordinates
/// * `image_width` - Width of the decoded original image
/// * `image_height` - Height of the decoded original image
/// * `format` - Output format, used for the entry names
///
/// # Returns
/// One plan per band, in band order
pub fn plan_slices(coords: &SliceCoords, image_width: u32, image_height: u32,
                   format: SliceFormat) -> SliceResult<Vec<SlicePlan>> {
    if coords.y_rois.is_empty() {
        return Err(SliceError::NoBands);
    }

    let (x, width) = pixel_range("crop region", coords.x_roi.unwrap_or([0, image_width as i64]))?;

    coords.y_rois.iter().enumerate().map(|(i, &rows)| {
        let index = i + 1;
        let label = format!("band {}", index);
        let (y, height) = pixel_range(&label, rows)?;

        let region = Region::new(x, y, width, height);
        if region.is_empty() {
            return Err(SliceError::InvalidRegion(format!("{} has no extent", label)));
        }
        if !region.fits_within(image_width, image_height) {
            return Err(SliceError::InvalidRegion(format!(
                "{} covers {}-{} x {}-{}, outside the {}x{} image",
                label, region.x, region.end_x(), region.y, region.end_y(), image_width, image_height)));
        }
        debug!("Slice {}: x={}, y={}, width={}, height={}",
               index, region.x, region.y, region.width, region.height);

        Ok(SlicePlan { index, name: format.slice_name(index), region })
    }).collect()
}

/// Convert `[start, end]` into an offset and length in pixels
///
/// Reversed ranges and ranges starting before 0 are rejected here; emptiness
/// and the far image edge are checked on the resulting `Region`.
fn pixel_range(label: &str, [start, end]: [i64; 2]) -> SliceResult<(u32, u32)> {
    if end < start {
        return Err(SliceError::InvalidRegion(format!(
            "{} {}-{} is reversed", label, start, end)));
    }
    let offset = u32::try_from(start).map_err(|_| SliceError::InvalidRegion(format!(
        "{} starts at {}, outside the image", label, start)))?;
    let length = u32::try_from(end - start).map_err(|_| SliceError::InvalidRegion(format!(
        "{} {}-{} is too long", label, start, end)))?;
    Ok((offset, length))
}
