use anyhow::Result;
use ocad_tiler_image::{Orientation, PageSize, PdfPage};
use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PdfConfig {
	/// A0 to A5, letter or legal.
	pub page_size: Option<String>,

	pub landscape: Option<bool>,

	/// Page margin in millimeters.
	pub margin: Option<f64>,
}

impl PdfConfig {
	pub fn page(&self) -> Result<PdfPage> {
		let default = PdfPage::default();
		Ok(PdfPage {
			size: match &self.page_size {
				Some(text) => text.parse()?,
				None => PageSize::default(),
			},
			orientation: if self.landscape.unwrap_or(false) {
				Orientation::Landscape
			} else {
				Orientation::Portrait
			},
			margin_mm: self.margin.unwrap_or(default.margin_mm),
		})
	}

	pub fn override_optional_page_size(&mut self, page_size: Option<&str>) {
		if let Some(page_size) = page_size {
			self.page_size = Some(page_size.to_string());
		}
	}

	pub fn override_landscape(&mut self, landscape: bool) {
		if landscape {
			self.landscape = Some(true);
		}
	}
}
