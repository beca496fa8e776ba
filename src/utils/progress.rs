//! Progress indicators for loading and per-feature discretization

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Spinner for steps of unknown length (dataset load, export)
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style.tick_chars(SPINNER_TICKS));
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Bar counting discretized features out of `features`
pub fn create_feature_bar(features: u64) -> ProgressBar {
    let pb = ProgressBar::new(features);
    let style = ProgressStyle::with_template(
        "   Discretizing [{bar:40.cyan/blue}] {pos}/{len} features ({percent}%) [{eta}]",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style.progress_chars("=>-"));
    pb
}

/// Finish with a check mark
pub fn finish_with_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✅ {}", message));
}

/// Finish with a warning sign, e.g. when some features failed
pub fn finish_with_warning(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("⚠️  {}", message));
}
