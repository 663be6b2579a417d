//! Renderer seam
//!
//! The renderer owns its visual nodes and hands out opaque handles. The
//! `SceneGraph` remembers which handle belongs to which band, observes the
//! editor state and issues create/update/remove calls so the display
//! follows the model.

use std::collections::{BTreeMap, HashMap};

use crate::geometry::Point;

use super::controller::EditorState;
use super::model::BandId;

/// Opaque reference to a renderer-owned node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(pub u64);

/// What a node depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The loaded image
    Image,
    /// A band overlay
    Band,
    /// The crop region overlay
    CropRegion,
}

/// Axis-aligned rectangle in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        ScreenRect { x, y, width, height }
    }
}

/// One line per image pixel boundary, drawn when pixels are magnified
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelGrid {
    /// Canvas position of the image origin
    pub origin: Point,
    /// Canvas size of one image pixel
    pub cell: f64,
    pub columns: u32,
    pub rows: u32,
}

/// Drawing backend
pub trait SceneRenderer {
    /// Create a node and return its handle
    fn create_node(&mut self, kind: NodeKind) -> VisualHandle;

    /// Move/resize a node and set its highlight
    fn update_node(&mut self, handle: VisualHandle, rect: ScreenRect, selected: bool);

    /// Destroy a node
    fn remove_node(&mut self, handle: VisualHandle);

    /// Show or hide the pixel grid
    fn set_pixel_grid(&mut self, grid: Option<PixelGrid>);
}

/// Mapping from model objects to renderer handles
#[derive(Debug, Default)]
pub struct SceneGraph {
    image: Option<VisualHandle>,
    crop: Option<VisualHandle>,
    bands: HashMap<BandId, VisualHandle>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle currently showing a band
    pub fn band_handle(&self, id: BandId) -> Option<VisualHandle> {
        self.bands.get(&id).copied()
    }

    /// Handle currently showing the crop region
    pub fn crop_handle(&self) -> Option<VisualHandle> {
        self.crop
    }

    /// Bring the renderer in line with `state`
    pub fn sync(&mut self, state: &EditorState, renderer: &mut dyn SceneRenderer) {
        let Some(image) = state.image() else {
            self.clear(renderer);
            return;
        };

        let view = state.view();
        let scale = view.scale();
        let origin = view.to_screen(Point::origin());
        let image_width = image.width as f64 * scale;
        let image_height = image.height as f64 * scale;

        let image_handle = *self.image.get_or_insert_with(|| renderer.create_node(NodeKind::Image));
        renderer.update_node(image_handle, ScreenRect::new(origin.x, origin.y, image_width, image_height), false);

        let model = state.model();
        let stale: Vec<BandId> = self.bands.keys()
            .filter(|id| model.band(**id).is_none())
            .copied()
            .collect();
        for id in stale {
            if let Some(handle) = self.bands.remove(&id) {
                renderer.remove_node(handle);
            }
        }

        for band in model.bands() {
            let handle = *self.bands.entry(band.id)
                .or_insert_with(|| renderer.create_node(NodeKind::Band));
            let top = view.to_screen(Point::new(0.0, band.span.start));
            let rect = ScreenRect::new(origin.x, top.y, image_width, band.span.length() * scale);
            renderer.update_node(handle, rect, state.selection() == Some(band.id));
        }

        match (model.crop(), self.crop) {
            (Some(crop), existing) => {
                let handle = existing.unwrap_or_else(|| renderer.create_node(NodeKind::CropRegion));
                self.crop = Some(handle);
                let left = view.to_screen(Point::new(crop.start, 0.0));
                let rect = ScreenRect::new(left.x, origin.y, crop.length() * scale, image_height);
                renderer.update_node(handle, rect, false);
            }
            (None, Some(handle)) => {
                renderer.remove_node(handle);
                self.crop = None;
            }
            (None, None) => {}
        }

        let grid = (scale > 1.0).then(|| PixelGrid {
            origin,
            cell: scale,
            columns: image.width,
            rows: image.height,
        });
        renderer.set_pixel_grid(grid);
    }

    fn clear(&mut self, renderer: &mut dyn SceneRenderer) {
        for (_, handle) in self.bands.drain() {
            renderer.remove_node(handle);
        }
        if let Some(handle) = self.crop.take() {
            renderer.remove_node(handle);
        }
        if let Some(handle) = self.image.take() {
            renderer.remove_node(handle);
        }
        renderer.set_pixel_grid(None);
    }
}

/// A node as last drawn by the `RecordingRenderer`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedNode {
    pub kind: NodeKind,
    pub rect: Option<ScreenRect>,
    pub selected: bool,
}

/// In-memory renderer keeping the current display list
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    next_handle: u64,
    nodes: BTreeMap<VisualHandle, RecordedNode>,
    grid: Option<PixelGrid>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, handle: VisualHandle) -> Option<&RecordedNode> {
        self.nodes.get(&handle)
    }

    /// Number of live nodes of one kind
    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.values().filter(|n| n.kind == kind).count()
    }

    pub fn pixel_grid(&self) -> Option<&PixelGrid> {
        self.grid.as_ref()
    }
}

impl SceneRenderer for RecordingRenderer {
    fn create_node(&mut self, kind: NodeKind) -> VisualHandle {
        self.next_handle += 1;
        let handle = VisualHandle(self.next_handle);
        self.nodes.insert(handle, RecordedNode { kind, rect: None, selected: false });
        handle
    }

    fn update_node(&mut self, handle: VisualHandle, rect: ScreenRect, selected: bool) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.rect = Some(rect);
            node.selected = selected;
        }
    }

    fn remove_node(&mut self, handle: VisualHandle) {
        self.nodes.remove(&handle);
    }

    fn set_pixel_grid(&mut self, grid: Option<PixelGrid>) {
        self.grid = grid;
    }
}
