//! Editor controller
//!
//! Single owner of the editor state. Every user intent enters through
//! `dispatch`, mutates the state synchronously and returns the effects for
//! the UI layer. Guard failures come back as `Effect::Alert` and leave the
//! state untouched.

use std::io::Cursor;
use std::sync::Arc;

use image::ImageReader;
use log::{debug, info, warn};

use crate::geometry::{Span, SpanEdge, MIN_SPAN_LENGTH};
use crate::slicer::SliceCoords;

use super::command::{EditorCommand, EditorWarning, Effect, UploadRequest, ZoomDirection};
use super::model::{BandId, RoiModel};
use super::settings::EditorSettings;
use super::view::ViewTransform;

/// The image currently being edited
#[derive(Clone)]
pub struct LoadedImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Name of the picked file
    pub file_name: String,
    /// Original bytes, re-uploaded on every save
    bytes: Arc<[u8]>,
}

impl LoadedImage {
    /// Read the dimensions of an encoded image
    ///
    /// Only the header is parsed; the format is guessed from the content.
    fn read(bytes: Vec<u8>, file_name: String) -> Result<Self, EditorWarning> {
        let (width, height) = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(|e| EditorWarning::UnreadableImage(e.to_string()))?
            .into_dimensions()
            .map_err(|e| EditorWarning::UnreadableImage(e.to_string()))?;

        if width == 0 || height == 0 {
            return Err(EditorWarning::UnreadableImage(format!("{}x{} image", width, height)));
        }

        Ok(LoadedImage { width, height, file_name, bytes: Arc::from(bytes) })
    }

    /// The original encoded bytes
    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }
}

impl std::fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Everything the editor knows
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    image: Option<LoadedImage>,
    model: RoiModel,
    view: ViewTransform,
    selection: Option<BandId>,
}

impl EditorState {
    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    pub fn model(&self) -> &RoiModel {
        &self.model
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    /// The selected band, if any
    pub fn selection(&self) -> Option<BandId> {
        self.selection
    }
}

/// Owns the editor state and applies commands to it
#[derive(Debug, Clone)]
pub struct EditorController {
    state: EditorState,
    settings: EditorSettings,
}

impl EditorController {
    /// Create a controller with no image loaded
    pub fn new(settings: EditorSettings) -> Self {
        EditorController { state: EditorState::default(), settings }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Apply one command and report what the UI has to do
    pub fn dispatch(&mut self, command: EditorCommand) -> Vec<Effect> {
        match command {
            EditorCommand::LoadImage { bytes, file_name } => {
                debug!("Loading {} ({} bytes)", file_name, bytes.len());
                match self.load_image(bytes, file_name) {
                    Ok((width, height)) => {
                        let mut effects = self.geometry_changed();
                        effects.push(Effect::Status(format!("読み込み完了: {}x{}", width, height)));
                        effects
                    }
                    Err(warning) => alert(warning),
                }
            }
            EditorCommand::AddBand { auto } => match self.add_band(auto) {
                Ok(_) => self.geometry_changed(),
                Err(warning) => alert(warning),
            },
            EditorCommand::ToggleCropRegion => match self.toggle_crop_region() {
                Ok(true) => vec![Effect::Render, Effect::Status("幅 ROI 追加: ドラッグで調整可".to_string())],
                Ok(false) => vec![Effect::Render, Effect::Status("幅 ROI を解除し、全幅で保存".to_string())],
                Err(warning) => alert(warning),
            },
            EditorCommand::SelectBand(id) => {
                if self.select_band(id) { vec![Effect::Render] } else { Vec::new() }
            }
            EditorCommand::DeleteSelected => {
                if self.delete_selected().is_some() { self.geometry_changed() } else { Vec::new() }
            }
            EditorCommand::ClearAllBands => {
                self.clear_all_bands();
                self.geometry_changed()
            }
            EditorCommand::Zoom(direction) => {
                self.set_zoom(direction);
                vec![Effect::Render]
            }
            EditorCommand::Pan { dx, dy } => {
                if self.pan(dx, dy) { vec![Effect::Render] } else { Vec::new() }
            }
            EditorCommand::DragBand { id, dy } => {
                if self.drag_band(id, dy) { self.geometry_changed() } else { Vec::new() }
            }
            EditorCommand::ResizeBand { id, edge, dy } => {
                if self.resize_band(id, edge, dy) { self.geometry_changed() } else { Vec::new() }
            }
            EditorCommand::DragCrop { dx } => {
                if self.drag_crop(dx) { vec![Effect::Render] } else { Vec::new() }
            }
            EditorCommand::ResizeCrop { edge, dx } => {
                if self.resize_crop(edge, dx) { vec![Effect::Render] } else { Vec::new() }
            }
            EditorCommand::Save => match self.prepare_upload() {
                Ok(request) => vec![Effect::Upload(request)],
                Err(warning) => alert(warning),
            },
        }
    }

    /// Replace the image, dropping every band, the crop region and the selection
    ///
    /// # Returns
    /// The image dimensions, or a warning if the bytes are not an image
    pub fn load_image(&mut self, bytes: Vec<u8>, file_name: String) -> Result<(u32, u32), EditorWarning> {
        let image = LoadedImage::read(bytes, file_name)?;
        let (width, height) = (image.width, image.height);

        self.state.view = ViewTransform::for_image(width, height, self.settings.viewport());
        self.state.model.reset();
        self.state.selection = None;
        info!("Loaded {} ({}x{}), base scale {:.3}", image.file_name, width, height, self.state.view.base_scale);
        self.state.image = Some(image);

        Ok((width, height))
    }

    /// Add a band
    ///
    /// With `auto` and an existing band, the new band starts where the last
    /// one ends and has the same height, cut off at the image bottom.
    /// Otherwise it covers the middle half of the image.
    pub fn add_band(&mut self, auto: bool) -> Result<BandId, EditorWarning> {
        let height = self.require_image()?.height as f64;

        let span = match self.state.model.last_band() {
            Some(last) if auto => {
                let start = last.span.end;
                let end = (start + last.span.length()).min(height);
                if end - start < MIN_SPAN_LENGTH {
                    return Err(EditorWarning::NoRoomBelow);
                }
                Span::new(start, end)
            }
            _ => Span::fraction_of(height, 0.25, 0.75),
        };

        let id = self.state.model.push_band(span);
        debug!("Added band {} at {:.1}-{:.1}", id, span.start, span.end);
        Ok(id)
    }

    /// Create the crop region over the central 80% of the width, or remove it
    ///
    /// # Returns
    /// Whether a crop region exists afterwards
    pub fn toggle_crop_region(&mut self) -> Result<bool, EditorWarning> {
        let width = self.require_image()?.width as f64;

        let crop = match self.state.model.crop() {
            Some(_) => None,
            None => Some(Span::fraction_of(width, 0.1, 0.9)),
        };
        self.state.model.set_crop(crop);
        Ok(crop.is_some())
    }

    /// Mark a band as selected; unknown ids are ignored
    pub fn select_band(&mut self, id: BandId) -> bool {
        if self.state.model.band(id).is_none() {
            return false;
        }
        self.state.selection = Some(id);
        true
    }

    /// Remove the selected band, if there is one
    pub fn delete_selected(&mut self) -> Option<BandId> {
        let id = self.state.selection.take()?;
        let removed = self.state.model.remove_band(id)?;
        debug!("Deleted band {}", removed.id);
        Some(removed.id)
    }

    /// Remove every band; the crop region stays
    pub fn clear_all_bands(&mut self) -> usize {
        self.state.selection = None;
        self.state.model.clear_bands()
    }

    /// Zoom one step in or out
    pub fn set_zoom(&mut self, direction: ZoomDirection) {
        let step = self.settings.zoom_step;
        match direction {
            ZoomDirection::In => self.state.view.zoom_in(step),
            ZoomDirection::Out => self.state.view.zoom_out(step),
        }
        debug!("Zoom now {:.3}", self.state.view.zoom);
    }

    /// Move the canvas by a screen delta
    pub fn pan(&mut self, dx: f64, dy: f64) -> bool {
        if !dx.is_finite() || !dy.is_finite() {
            return false;
        }
        self.state.view.pan_by(dx, dy);
        true
    }

    /// Move a band by a vertical screen delta, keeping its height
    pub fn drag_band(&mut self, id: BandId, dy: f64) -> bool {
        if !dy.is_finite() {
            return false;
        }
        let Some(height) = self.image_extent().map(|(_, h)| h) else {
            return false;
        };
        let delta = self.state.view.to_image_distance(dy);
        match self.state.model.band_mut(id) {
            Some(band) => {
                band.span = band.span.translated(delta, height);
                true
            }
            None => false,
        }
    }

    /// Move one edge of a band by a vertical screen delta
    pub fn resize_band(&mut self, id: BandId, edge: SpanEdge, dy: f64) -> bool {
        if !dy.is_finite() {
            return false;
        }
        let Some(height) = self.image_extent().map(|(_, h)| h) else {
            return false;
        };
        let delta = self.state.view.to_image_distance(dy);
        match self.state.model.band_mut(id) {
            Some(band) => {
                band.span = band.span.resized(edge, delta, height);
                true
            }
            None => false,
        }
    }

    /// Move the crop region by a horizontal screen delta, keeping its width
    pub fn drag_crop(&mut self, dx: f64) -> bool {
        if !dx.is_finite() {
            return false;
        }
        let delta = self.state.view.to_image_distance(dx);
        self.update_crop(|crop, width| crop.translated(delta, width))
    }

    /// Move one edge of the crop region by a horizontal screen delta
    pub fn resize_crop(&mut self, edge: SpanEdge, dx: f64) -> bool {
        if !dx.is_finite() {
            return false;
        }
        let delta = self.state.view.to_image_distance(dx);
        self.update_crop(|crop, width| crop.resized(edge, delta, width))
    }

    /// Integer pixel coordinates for the slice service
    ///
    /// Only depends on the model, so zooming and panning never change it.
    pub fn serialize_for_export(&self) -> SliceCoords {
        self.state.model.to_coords()
    }

    /// Build the save request
    pub fn prepare_upload(&self) -> Result<UploadRequest, EditorWarning> {
        let image = self.require_image()?;
        if self.state.model.bands().is_empty() {
            return Err(EditorWarning::NoBands);
        }
        if let Some(crop) = self.state.model.crop() {
            let [x1, x2] = crop.rounded();
            if ((x2 - x1) as f64) < self.settings.min_crop_width {
                return Err(EditorWarning::CropTooNarrow);
            }
        }

        let coords = self.serialize_for_export();
        info!("Prepared upload of {} with {} band(s)", image.file_name, coords.band_count());
        Ok(UploadRequest {
            image: Arc::clone(image.bytes()),
            file_name: image.file_name.clone(),
            coords,
        })
    }

    fn require_image(&self) -> Result<&LoadedImage, EditorWarning> {
        self.state.image.as_ref().ok_or(EditorWarning::NoImage)
    }

    fn image_extent(&self) -> Option<(f64, f64)> {
        self.state.image.as_ref().map(|i| (i.width as f64, i.height as f64))
    }

    fn update_crop(&mut self, change: impl FnOnce(Span, f64) -> Span) -> bool {
        let (Some((width, _)), Some(crop)) = (self.image_extent(), self.state.model.crop()) else {
            return false;
        };
        self.state.model.set_crop(Some(change(crop, width)));
        true
    }

    fn geometry_changed(&self) -> Vec<Effect> {
        vec![Effect::Render, Effect::SyncList(self.state.model.list_labels())]
    }
}

impl Default for EditorController {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

fn alert(warning: EditorWarning) -> Vec<Effect> {
    warn!("{}", warning);
    vec![Effect::Alert(warning)]
}
