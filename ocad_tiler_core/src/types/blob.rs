//! Owned byte buffers for encoded artifacts.
//!
//! ```rust
//! use ocad_tiler_core::Blob;
//!
//! let blob = Blob::from("<svg/>");
//! assert_eq!(blob.len(), 6);
//! assert_eq!(blob.as_str(), "<svg/>");
//! ```

use std::fmt;

/// An encoded image, vector document or web page held in memory.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Blob(Vec<u8>);

impl Blob {
	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}

	/// Interprets the bytes as UTF-8, replacing invalid sequences.
	#[must_use]
	pub fn as_str(&self) -> &str {
		std::str::from_utf8(&self.0).unwrap_or("<invalid utf-8>")
	}

	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for Blob {
	fn from(data: Vec<u8>) -> Self {
		Blob(data)
	}
}

impl From<&[u8]> for Blob {
	fn from(data: &[u8]) -> Self {
		Blob(data.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(text: &str) -> Self {
		Blob(text.as_bytes().to_vec())
	}
}

impl From<String> for Blob {
	fn from(text: String) -> Self {
		Blob(text.into_bytes())
	}
}

impl fmt::Debug for Blob {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Blob({} bytes)", self.0.len())
	}
}
