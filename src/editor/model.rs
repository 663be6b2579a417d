//! ROI model
//!
//! Bands and the crop region, stored in original image pixel coordinates.
//! Nothing in here knows about zoom, pan or the screen.

use std::fmt;

use crate::geometry::Span;
use crate::slicer::SliceCoords;

/// Stable identifier of a band, unique for the lifetime of the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BandId(pub u64);

impl fmt::Display for BandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A horizontal strip of the image that becomes one slice
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub id: BandId,
    /// Row range in image pixels
    pub span: Span,
}

impl Band {
    /// Text shown for this band in the band list
    ///
    /// `position` is the 1-based row in the list, not the band id, so rows
    /// are renumbered after a deletion.
    pub fn label(&self, position: usize) -> String {
        let [start, end] = self.span.rounded();
        format!("ROI {}: {}-{}px", position, start, end)
    }
}

/// Ordered bands plus the optional crop region
#[derive(Debug, Clone)]
pub struct RoiModel {
    /// Bands in creation order
    bands: Vec<Band>,
    /// Column range applied to every band, full width when absent
    crop: Option<Span>,
    next_id: u64,
}

impl RoiModel {
    /// Create an empty model
    pub fn new() -> Self {
        RoiModel { bands: Vec::new(), crop: None, next_id: 1 }
    }

    /// All bands in creation order
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Look up a band by id
    pub fn band(&self, id: BandId) -> Option<&Band> {
        self.bands.iter().find(|b| b.id == id)
    }

    /// Look up a band by id for mutation
    pub fn band_mut(&mut self, id: BandId) -> Option<&mut Band> {
        self.bands.iter_mut().find(|b| b.id == id)
    }

    /// The most recently created band still present
    pub fn last_band(&self) -> Option<&Band> {
        self.bands.last()
    }

    /// Append a band and hand out the next id
    pub fn push_band(&mut self, span: Span) -> BandId {
        let id = BandId(self.next_id);
        self.next_id += 1;
        self.bands.push(Band { id, span });
        id
    }

    /// Remove a band, keeping the order of the others
    pub fn remove_band(&mut self, id: BandId) -> Option<Band> {
        let index = self.bands.iter().position(|b| b.id == id)?;
        Some(self.bands.remove(index))
    }

    /// Remove every band; ids keep counting
    pub fn clear_bands(&mut self) -> usize {
        let removed = self.bands.len();
        self.bands.clear();
        removed
    }

    pub fn crop(&self) -> Option<Span> {
        self.crop
    }

    pub fn set_crop(&mut self, crop: Option<Span>) {
        self.crop = crop;
    }

    /// Drop all bands and the crop region
    pub fn reset(&mut self) {
        self.bands.clear();
        self.crop = None;
    }

    /// Band list labels in display order
    pub fn list_labels(&self) -> Vec<String> {
        self.bands.iter().enumerate().map(|(i, band)| band.label(i + 1)).collect()
    }

    /// Integer pixel coordinates as sent to the slice service
    pub fn to_coords(&self) -> SliceCoords {
        SliceCoords::new(
            self.bands.iter().map(|b| b.span.rounded()).collect(),
            self.crop.map(|c| c.rounded()),
        )
    }
}

impl Default for RoiModel {
    fn default() -> Self {
        Self::new()
    }
}
