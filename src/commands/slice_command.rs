//! Offline slicing command
//!
//! Runs the same slice-and-package pipeline as the HTTP endpoint on a local
//! file and writes the archive to disk.

use clap::ArgMatches;
use log::info;

use crate::api::BandSlicer;
use crate::commands::command_traits::Command;
use crate::commands::{coords_argument, required_argument};
use crate::config::SlicerConfig;
use crate::errors::SliceResult;
use crate::slicer::{init_encode_pool, SliceCoords};
use crate::utils::progress::ProgressTracker;

/// Command for slicing a local image into a zip archive
pub struct SliceCommand {
    /// Path to the input image
    input_file: String,
    /// Path of the archive to write
    output_file: String,
    /// Bands and optional crop region
    coords: SliceCoords,
    slicer: BandSlicer,
}

impl SliceCommand {
    /// Create a new slice command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `config` - Loaded configuration
    ///
    /// # Returns
    /// A new SliceCommand instance or an error
    pub fn new(args: &ArgMatches, config: &SlicerConfig) -> SliceResult<Self> {
        let input_file = required_argument(args, "input")?;
        let output_file = required_argument(args, "output")?;
        let coords = coords_argument(args)?;

        Ok(SliceCommand {
            input_file,
            output_file,
            coords,
            slicer: BandSlicer::new(config.clone()),
        })
    }
}

impl Command for SliceCommand {
    fn execute(&self) -> SliceResult<()> {
        init_encode_pool(self.slicer.config().slicing.encode_threads)?;
        info!("Slicing {} into {} band(s)", self.input_file, self.coords.band_count());

        let progress = ProgressTracker::new(self.coords.band_count() as u64, "Encoding slices");
        let written = self.slicer.slice_file_observed(&self.input_file, &self.coords, &self.output_file, &progress);
        progress.finish();

        let count = written?;
        info!("Slicing completed: {} slice(s) in {}", count, self.output_file);
        Ok(())
    }
}
