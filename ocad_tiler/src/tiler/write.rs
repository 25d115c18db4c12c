//! Atomic file output.

use anyhow::{Context, Result};
use ocad_tiler_core::Blob;
use std::{
	io::{ErrorKind, Write},
	path::Path,
};
use tempfile::NamedTempFile;

/// Writes `blob` to `path` through a temporary file in the same directory.
///
/// Readers see either no file or the complete file. Missing parent directories are created.
/// An existing file is replaced.
pub fn write_atomic(path: &Path, blob: &Blob) -> Result<()> {
	let file = staged(path, blob)?;
	file.persist(path).with_context(|| format!("moving temporary file to {path:?}"))?;

	log::trace!("wrote {} bytes to {path:?}", blob.len());
	Ok(())
}

/// Like [`write_atomic`], but never replaces an existing file.
///
/// Returns `false` if `path` already existed, in which case it is left untouched.
pub fn write_new(path: &Path, blob: &Blob) -> Result<bool> {
	let file = staged(path, blob)?;
	match file.persist_noclobber(path) {
		Ok(_) => {
			log::trace!("wrote {} bytes to {path:?}", blob.len());
			Ok(true)
		}
		Err(err) if err.error.kind() == ErrorKind::AlreadyExists => {
			log::trace!("{path:?} appeared while writing, keeping it");
			Ok(false)
		}
		Err(err) => Err(err.error).with_context(|| format!("moving temporary file to {path:?}")),
	}
}

fn staged(path: &Path, blob: &Blob) -> Result<NamedTempFile> {
	let dir = match path.parent() {
		Some(dir) if !dir.as_os_str().is_empty() => dir,
		_ => Path::new("."),
	};
	std::fs::create_dir_all(dir).with_context(|| format!("creating directory {dir:?}"))?;

	let mut file = NamedTempFile::new_in(dir).with_context(|| format!("creating temporary file in {dir:?}"))?;
	file.write_all(blob.as_slice())
		.with_context(|| format!("writing {} bytes for {path:?}", blob.len()))?;
	file.as_file().sync_all().with_context(|| format!("flushing {path:?}"))?;
	Ok(file)
}
