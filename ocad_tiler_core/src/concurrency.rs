//! How many tiles are rendered at the same time.
//!
//! ```
//! use ocad_tiler_core::ConcurrencyLimits;
//!
//! assert_eq!(ConcurrencyLimits::with_jobs(Some(3)).cpu_bound, 3);
//! assert_eq!(ConcurrencyLimits::default().cpu_bound, ConcurrencyLimits::cpu_count());
//! ```

/// Upper bound for CPU-heavy tasks running at once.
///
/// A tile render keeps one core busy and holds its scene and pixmap in memory until it is
/// encoded, so the limit caps both CPU load and peak memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencyLimits {
	pub cpu_bound: usize,
}

impl ConcurrencyLimits {
	pub fn new(cpu_bound: usize) -> Self {
		Self {
			cpu_bound: cpu_bound.max(1),
		}
	}

	/// `jobs` when given, one task per CPU otherwise.
	pub fn with_jobs(jobs: Option<usize>) -> Self {
		jobs.map_or_else(Self::default, Self::new)
	}

	pub fn cpu_count() -> usize {
		num_cpus::get().max(1)
	}
}

impl Default for ConcurrencyLimits {
	fn default() -> Self {
		Self::new(Self::cpu_count())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn one_job_per_cpu_by_default() {
		assert_eq!(ConcurrencyLimits::default().cpu_bound, num_cpus::get().max(1));
		assert_eq!(ConcurrencyLimits::with_jobs(None), ConcurrencyLimits::default());
	}

	#[test]
	fn limits_are_at_least_one() {
		assert_eq!(ConcurrencyLimits::new(0).cpu_bound, 1);
		assert_eq!(ConcurrencyLimits::with_jobs(Some(0)).cpu_bound, 1);
	}

	#[test]
	fn jobs_override_the_cpu_count() {
		assert_eq!(ConcurrencyLimits::with_jobs(Some(1000)).cpu_bound, 1000);
	}
}
