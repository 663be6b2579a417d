pub mod errors;
pub mod config;
pub mod geometry;
pub mod editor;
pub mod slicer;
pub mod server;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::{BandSlicer, PlanReport};

pub use config::SlicerConfig;
pub use errors::{SliceError, SliceResult};
pub use editor::{EditorCommand, EditorController, Effect};
pub use slicer::{SliceCoords, SliceFormat, SliceService};
