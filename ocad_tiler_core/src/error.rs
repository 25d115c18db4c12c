//! Configuration errors.
//!
//! Everything in here is detected before any rendering work starts. The variants are
//! wrapped into `anyhow::Error` like every other failure, so callers that need to tell a
//! configuration problem apart from an upstream failure can use
//! `err.downcast_ref::<ConfigError>()`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
	#[error("missing output target: either an output path or an output format must be given")]
	MissingOutputTarget,

	#[error("ambiguous output target: give either an output path or an output format, not both")]
	AmbiguousOutputTarget,

	#[error("invalid bounds {0:?}: expected four numbers \"x_min,y_min,x_max,y_max\" with min <= max")]
	InvalidBounds(String),

	#[error("invalid symbol number {0:?}")]
	InvalidSymbolNumber(String),

	#[error("invalid color {0:?}")]
	InvalidColor(String),

	#[error("invalid scale {0:?}")]
	InvalidScale(String),

	#[error("number of zoom levels must be at least 1")]
	NoZoomLevels,

	#[error("tile size must be greater than 0")]
	InvalidTileSize,

	#[error("resolution must be a positive finite number, got {0}")]
	InvalidResolution(f64),

	#[error("the map contains no features, so its bounds are unknown; pass explicit bounds")]
	EmptyMap,
}
