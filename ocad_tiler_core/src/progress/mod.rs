//! Terminal progress reporting.
//!
//! ```rust
//! use ocad_tiler_core::progress::get_progress_bar;
//!
//! let progress = get_progress_bar("rendering tiles", 100);
//! progress.inc(10);
//! progress.finish();
//! ```

mod inner;
mod progress_bar;

pub use progress_bar::ProgressBar;

/// Creates a progress bar that is drawn to stderr.
#[must_use]
pub fn get_progress_bar(message: &str, max_value: u64) -> ProgressBar {
	ProgressBar::new(message, max_value)
}
