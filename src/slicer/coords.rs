//! Band coordinate document
//!
//! This is the wire contract between the editor and the slice service:
//! `{ "yRois": [[y1, y2], ...], "xRoi": [x1, x2] | null }`, integer pixels
//! in the original image's coordinate space.

use serde::{Deserialize, Serialize};

use crate::errors::{SliceError, SliceResult};

/// Rounded band and crop coordinates as exchanged over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceCoords {
    /// One `[start, end]` row range per band, in band order
    pub y_rois: Vec<[i64; 2]>,
    /// Optional `[start, end]` column range applied to every band
    pub x_roi: Option<[i64; 2]>,
}

impl SliceCoords {
    /// Create a coordinate document
    pub fn new(y_rois: Vec<[i64; 2]>, x_roi: Option<[i64; 2]>) -> Self {
        SliceCoords { y_rois, x_roi }
    }

    /// Parse the JSON form
    ///
    /// # Returns
    /// The parsed document, or an error if the JSON is malformed or
    /// carries no band
    pub fn from_json(json: &str) -> SliceResult<Self> {
        let coords: SliceCoords = serde_json::from_str(json)?;
        if coords.y_rois.is_empty() {
            return Err(SliceError::NoBands);
        }
        Ok(coords)
    }

    /// Serialize to the JSON form
    pub fn to_json(&self) -> SliceResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Number of bands
    pub fn band_count(&self) -> usize {
        self.y_rois.len()
    }
}
