//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod serve_command;
pub mod slice_command;
pub mod plan_command;

pub use command_traits::{Command, CommandFactory};
pub use serve_command::ServeCommand;
pub use slice_command::SliceCommand;
pub use plan_command::PlanCommand;

use std::fs;

use clap::ArgMatches;

use crate::config::SlicerConfig;
use crate::errors::{SliceError, SliceResult};
use crate::slicer::SliceCoords;

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the selected subcommand and creates
/// the appropriate command instance for execution.
pub struct SlicerCommandFactory;

impl SlicerCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        SlicerCommandFactory
    }
}

impl Default for SlicerCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandFactory for SlicerCommandFactory {
    fn create_command(&self, args: &ArgMatches, config: &SlicerConfig) -> SliceResult<Box<dyn Command>> {
        match args.subcommand() {
            Some(("slice", sub)) => Ok(Box::new(SliceCommand::new(sub, config)?)),
            Some(("plan", sub)) => Ok(Box::new(PlanCommand::new(sub, config)?)),
            Some(("serve", sub)) => Ok(Box::new(ServeCommand::new(sub, config)?)),
            Some((other, _)) => Err(SliceError::GenericError(format!("Unknown command: {}", other))),
            None => Err(SliceError::GenericError("No command given".to_string())),
        }
    }
}

/// Fetch a required string argument
pub(crate) fn required_argument(args: &ArgMatches, name: &str) -> SliceResult<String> {
    args.get_one::<String>(name)
        .cloned()
        .ok_or_else(|| SliceError::GenericError(format!("Missing argument: {}", name)))
}

/// Read `--coords`, either inline JSON or `@path` to a JSON file
pub(crate) fn coords_argument(args: &ArgMatches) -> SliceResult<SliceCoords> {
    let value = required_argument(args, "coords")?;
    parse_coords_value(&value)
}

fn parse_coords_value(value: &str) -> SliceResult<SliceCoords> {
    match value.strip_prefix('@') {
        Some(path) => SliceCoords::from_json(&fs::read_to_string(path)?),
        None => SliceCoords::from_json(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_coords() {
        let coords = parse_coords_value(r#"{"yRois":[[0,10]],"xRoi":null}"#).unwrap();
        assert_eq!(coords.y_rois, vec![[0, 10]]);
    }

    #[test]
    fn test_coords_from_file() {
        let path = std::env::temp_dir().join(format!("bandslicer-coords-{}.json", std::process::id()));
        fs::write(&path, r#"{"yRois":[[5,15]],"xRoi":[1,9]}"#).unwrap();

        let coords = parse_coords_value(&format!("@{}", path.display())).unwrap();
        assert_eq!(coords.y_rois, vec![[5, 15]]);
        assert_eq!(coords.x_roi, Some([1, 9]));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_coords_file() {
        let result = parse_coords_value("@/nonexistent/bandslicer/coords.json");
        assert!(matches!(result, Err(SliceError::IoError(_))));
    }
}
