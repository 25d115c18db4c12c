use crate::{ColorTable, Feature, SymbolTable};
use ocad_tiler_core::ReferenceSystem;

/// Read-only access to a parsed map.
///
/// Implementations are loaded once per run and shared between all render tasks.
pub trait MapDocument: Send + Sync {
	fn features(&self) -> &[Feature];

	fn crs(&self) -> &ReferenceSystem;

	fn colors(&self) -> &ColorTable;

	fn symbols(&self) -> &SymbolTable;
}
