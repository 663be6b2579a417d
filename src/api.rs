use std::fs;
use std::path::Path;

use image::ImageReader;
use log::info;

use crate::config::SlicerConfig;
use crate::errors::SliceResult;
use crate::slicer::{plan_slices, SliceCoords, SliceObserver, SlicePlan, SliceService};

/// Main interface to the bandslicer library
pub struct BandSlicer {
    config: SlicerConfig,
    service: SliceService,
}

/// Outcome of `BandSlicer::plan`
#[derive(Debug, Clone)]
pub struct PlanReport {
    pub width: u32,
    pub height: u32,
    pub slices: Vec<SlicePlan>,
}

impl PlanReport {
    /// Human-readable summary, one line per slice
    pub fn summary(&self) -> String {
        let mut result = format!("Image size: {}x{}\n", self.width, self.height);
        result.push_str(&format!("Planned slices: {}\n", self.slices.len()));
        for plan in &self.slices {
            let region = plan.region;
            result.push_str(&format!("  {}: x={} y={} {}x{}\n",
                                     plan.name, region.x, region.y, region.width, region.height));
        }
        result
    }
}

impl BandSlicer {
    /// Create a new BandSlicer instance
    ///
    /// # Arguments
    /// * `config` - Loaded configuration; only the `slicing` table is used here
    pub fn new(config: SlicerConfig) -> Self {
        let service = SliceService::new(config.slicing.output_format);
        BandSlicer { config, service }
    }

    /// Instance running on the built-in defaults
    pub fn with_defaults() -> SliceResult<Self> {
        Ok(Self::new(SlicerConfig::builtin()?))
    }

    pub fn config(&self) -> &SlicerConfig {
        &self.config
    }

    /// Slice an image file and write the archive to disk
    ///
    /// # Arguments
    /// * `input_path` - Path to the original image
    /// * `coords` - Bands and optional crop region
    /// * `output_path` - Where to write the zip archive
    ///
    /// # Returns
    /// Number of slices written, or an error
    pub fn slice_file(&self, input_path: &str, coords: &SliceCoords, output_path: &str) -> SliceResult<usize> {
        self.slice_file_observed(input_path, coords, output_path, &())
    }

    /// Same as `slice_file`, reporting every encoded slice to `observer`
    pub fn slice_file_observed(&self, input_path: &str, coords: &SliceCoords, output_path: &str,
                               observer: &dyn SliceObserver) -> SliceResult<usize> {
        let image = fs::read(input_path)?;
        let output = self.service.process_coords(&image, coords, observer)?;

        // Nothing is written unless every slice succeeded
        fs::write(Path::new(output_path), &output.archive)?;
        info!("Wrote {} slice(s) to {}", output.slice_count, output_path);
        Ok(output.slice_count)
    }

    /// Plan the slices for an image without decoding its pixels
    pub fn plan(&self, input_path: &str, coords: &SliceCoords) -> SliceResult<PlanReport> {
        let (width, height) = ImageReader::open(input_path)?
            .with_guessed_format()?
            .into_dimensions()?;
        let slices = plan_slices(coords, width, height, self.service.format())?;
        Ok(PlanReport { width, height, slices })
    }
}
