//! Slice planning command
//!
//! Shows what a coordinate document would produce for an image without
//! decoding or encoding any pixels.

use clap::ArgMatches;
use log::{debug, info};

use crate::api::BandSlicer;
use crate::commands::command_traits::Command;
use crate::commands::{coords_argument, required_argument};
use crate::config::SlicerConfig;
use crate::errors::SliceResult;
use crate::slicer::SliceCoords;

/// Command for listing the planned slices of an image
pub struct PlanCommand {
    /// Path to the input image
    input_file: String,
    coords: SliceCoords,
    /// Whether to enable verbose output
    verbose: bool,
    slicer: BandSlicer,
}

impl PlanCommand {
    pub fn new(args: &ArgMatches, config: &SlicerConfig) -> SliceResult<Self> {
        Ok(PlanCommand {
            input_file: required_argument(args, "input")?,
            coords: coords_argument(args)?,
            verbose: args.get_flag("verbose"),
            slicer: BandSlicer::new(config.clone()),
        })
    }
}

impl Command for PlanCommand {
    fn execute(&self) -> SliceResult<()> {
        let report = self.slicer.plan(&self.input_file, &self.coords)?;

        if self.verbose {
            debug!("Coordinates: {:?}", self.coords);
        }
        for line in report.summary().lines() {
            info!("{}", line);
        }
        println!("{}", report.summary().trim_end());
        Ok(())
    }
}
