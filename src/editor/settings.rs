//! Editor settings

use serde::Deserialize;

use super::view::Viewport;

/// Tunables of the editor, read from the `[editor]` configuration table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EditorSettings {
    /// Canvas width the base scale fits into
    pub viewport_width: f64,
    /// Canvas height the base scale fits into
    pub viewport_height: f64,
    /// Factor applied by one zoom in / zoom out step
    pub zoom_step: f64,
    /// Crop regions narrower than this many pixels cannot be saved
    pub min_crop_width: f64,
}

impl EditorSettings {
    /// The canvas size as a viewport
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        EditorSettings {
            viewport_width: 900.0,
            viewport_height: 600.0,
            zoom_step: 1.25,
            min_crop_width: 5.0,
        }
    }
}
