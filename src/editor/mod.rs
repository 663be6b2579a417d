//! Band editor
//!
//! A headless controller for the band/crop-region editor. The controller owns
//! all editor state, accepts `EditorCommand`s and answers with `Effect`s
//! (alerts, re-render requests, list updates, uploads) that the hosting UI
//! carries out. Rendering goes through the `SceneRenderer` trait; the
//! `SceneGraph` keeps the mapping from band ids to visual handles so the
//! model never holds rendering objects.

mod settings;
mod model;
mod view;
mod command;
mod controller;
mod renderer;

pub use settings::EditorSettings;
pub use model::{Band, BandId, RoiModel};
pub use view::{fit_or_fill_scale, ViewTransform, Viewport};
pub use command::{EditorCommand, EditorWarning, Effect, UploadRequest, ZoomDirection};
pub use controller::{EditorController, EditorState, LoadedImage};
pub use renderer::{
    NodeKind, PixelGrid, RecordedNode, RecordingRenderer, SceneGraph, SceneRenderer, ScreenRect,
    VisualHandle,
};
