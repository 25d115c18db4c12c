//! A cloneable, thread-safe progress bar handle.

use super::inner::Inner;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Progress of a long-running job, drawn as a single line on stderr.
///
/// Clones share the same state, so worker tasks can each hold one and report completed work.
#[derive(Clone)]
pub struct ProgressBar {
	inner: Arc<Mutex<Inner>>,
}

impl ProgressBar {
	pub fn new(message: &str, max_value: u64) -> ProgressBar {
		let progress = ProgressBar {
			inner: Arc::new(Mutex::new(Inner::new(message, max_value))),
		};
		progress.lock().redraw();
		progress
	}

	fn lock(&self) -> MutexGuard<'_, Inner> {
		self.inner.lock().unwrap_or_else(PoisonError::into_inner)
	}

	pub fn set_position(&self, value: u64) {
		let mut inner = self.lock();
		inner.pos = value.min(inner.len);
		inner.redraw();
	}

	pub fn inc(&self, value: u64) {
		let mut inner = self.lock();
		inner.pos = inner.pos.saturating_add(value).min(inner.len);
		inner.redraw();
	}

	/// Advances like [`inc`](Self::inc), for items that needed no work.
	pub fn skip(&self, value: u64) {
		let mut inner = self.lock();
		let advance = value.min(inner.len - inner.pos);
		inner.pos += advance;
		inner.skipped += advance;
		inner.redraw();
	}

	pub fn position(&self) -> u64 {
		self.lock().pos
	}

	/// Sets the position to the maximum, draws a last time and ends the line.
	pub fn finish(&self) {
		let mut inner = self.lock();
		inner.pos = inner.len;
		inner.finished = true;
		inner.redraw();
		inner.write("\n");
	}

	/// Clears the line without finishing it, e.g. when a job is aborted.
	pub fn remove(&self) {
		let mut inner = self.lock();
		inner.finished = true;
		inner.write("\r\x1b[2K");
	}
}
