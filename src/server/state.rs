use std::sync::Arc;

use crate::config::SlicerConfig;
use crate::slicer::SliceService;

/// Shared, read-only handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: SliceService,
    /// Body of every failed slice response
    pub failure_message: Arc<str>,
    /// File name offered for download
    pub archive_name: Arc<str>,
}

impl AppState {
    pub fn from_config(config: &SlicerConfig) -> Self {
        AppState {
            service: SliceService::new(config.slicing.output_format),
            failure_message: Arc::from(config.slicing.failure_message.as_str()),
            archive_name: Arc::from(config.slicing.archive_name.as_str()),
        }
    }
}
