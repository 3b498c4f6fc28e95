//! Progress reporting utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for batch operations over many relations.
#[derive(Debug)]
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Create a progress bar over a known number of relations.
    pub fn new_for_batch(total: u64, message: &str) -> Self {
        Self {
            bar: Some(create_progress_bar(total, message)),
        }
    }

    /// Create a spinner for a single long-running operation.
    pub fn new_for_single(message: &str) -> Self {
        Self {
            bar: Some(create_spinner(message)),
        }
    }

    /// Create a silent reporter (no progress output).
    pub fn new_minimal() -> Self {
        Self { bar: None }
    }

    /// Mark one relation as processed.
    pub fn tick(&self, relation: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(relation.to_string());
            bar.inc(1);
        }
    }

    /// Finish with a closing message.
    pub fn finish(&mut self, message: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message(message.to_string());
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Create a spinner progress bar
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .expect("Invalid progress template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a progress bar with known total
fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}/{len:3} {msg}")
            .expect("Invalid progress template")
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}
