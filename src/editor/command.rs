//! Commands accepted by the editor and effects it produces

use std::fmt;
use std::sync::Arc;

use crate::errors::SliceResult;
use crate::geometry::SpanEdge;
use crate::slicer::SliceCoords;

use super::model::BandId;

/// Zoom step direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Every user intent the editor understands
///
/// Pointer deltas (`dx`, `dy`) are in screen pixels; the controller converts
/// them to image pixels with the current view transform.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// A file was picked
    LoadImage { bytes: Vec<u8>, file_name: String },
    /// "Add band" button; `auto` continues below the last band
    AddBand { auto: bool },
    /// "Crop region" button
    ToggleCropRegion,
    /// Click on a band or its list row
    SelectBand(BandId),
    /// Delete key
    DeleteSelected,
    /// "Clear bands" button
    ClearAllBands,
    /// Zoom buttons
    Zoom(ZoomDirection),
    /// Canvas drag on empty space
    Pan { dx: f64, dy: f64 },
    /// Band body drag
    DragBand { id: BandId, dy: f64 },
    /// Band edge drag
    ResizeBand { id: BandId, edge: SpanEdge, dy: f64 },
    /// Crop region body drag
    DragCrop { dx: f64 },
    /// Crop region edge drag
    ResizeCrop { edge: SpanEdge, dx: f64 },
    /// "Save" button
    Save,
}

/// Recoverable user-input problems, shown as blocking alerts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorWarning {
    /// An operation needs an image and none is loaded
    NoImage,
    /// Saving without any band
    NoBands,
    /// The last band already ends at the bottom of the image
    NoRoomBelow,
    /// The crop region is narrower than the configured minimum
    CropTooNarrow,
    /// The picked file is not a readable image
    UnreadableImage(String),
}

impl fmt::Display for EditorWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorWarning::NoImage => write!(f, "画像を読み込んでください"),
            EditorWarning::NoBands => write!(f, "Y‑ROI がありません"),
            EditorWarning::NoRoomBelow => write!(f, "最後の Y‑ROI の下に余白がありません"),
            EditorWarning::CropTooNarrow => write!(f, "幅 ROI が狭すぎます"),
            EditorWarning::UnreadableImage(reason) => write!(f, "画像を読み込めません: {}", reason),
        }
    }
}

/// Everything needed to post one save request
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    /// Original file bytes, never a resized copy
    pub image: Arc<[u8]>,
    pub file_name: String,
    pub coords: SliceCoords,
}

impl UploadRequest {
    /// The `coords` multipart field
    pub fn coords_json(&self) -> SliceResult<String> {
        self.coords.to_json()
    }
}

/// Side effects the hosting UI has to perform after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Show a blocking warning
    Alert(EditorWarning),
    /// Redraw the canvas from the current state
    Render,
    /// Replace the band list rows
    SyncList(Vec<String>),
    /// Status line text
    Status(String),
    /// Send the save request
    Upload(UploadRequest),
}
