use indicatif::{ProgressBar, ProgressStyle};

use crate::slicer::{SliceObserver, SlicePlan};

pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    pub fn new(total: u64, description: &str) -> Self {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar.set_message(description.to_string());

        ProgressTracker {
            bar,
        }
    }

    pub fn increment(&self, amount: u64) {
        self.bar.inc(amount);
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Completed");
    }

    pub fn set_message(&self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }
}

// ProgressBar is internally synchronized, so rayon workers may tick it directly
impl SliceObserver for ProgressTracker {
    fn slice_encoded(&self, plan: &SlicePlan, _encoded_bytes: usize) {
        self.set_message(&plan.name);
        self.increment(1);
    }
}
