//! HTTP handlers and small response helpers for the tile server.

use super::TileCache;
use axum::{
	body::Body,
	extract::{Path, State},
	http::{StatusCode, header},
	response::{IntoResponse, Response},
};
use ocad_tiler_core::{Blob, TileCoord};
use std::sync::Arc;

const CACHE_CONTROL: &str = "public, max-age=2419200, no-transform";

#[derive(Clone)]
pub struct ServerState {
	pub cache: Arc<TileCache>,
	pub index_page: Arc<str>,
}

pub async fn serve_index(State(state): State<ServerState>) -> Response<Body> {
	(
		[(header::CONTENT_TYPE, "text/html; charset=utf-8")],
		state.index_page.to_string(),
	)
		.into_response()
}

pub async fn serve_tile(
	Path((z, x, y)): Path<(String, String, String)>,
	State(state): State<ServerState>,
) -> Response<Body> {
	log::debug!("handle tile request: {z}/{x}/{y}");

	let Some(coord) = parse_tile_coord(&z, &x, &y) else {
		log::debug!("send 404 for malformed tile request: {z}/{x}/{y}");
		return error_404();
	};

	match state.cache.get(coord).await {
		Ok(Some(blob)) => {
			log::debug!("send response for tile request: {coord}");
			ok_data(blob, "image/png")
		}
		Ok(None) => {
			log::debug!("send 404 for tile request: {coord}");
			error_404()
		}
		Err(err) => {
			log::warn!("send 500 for tile request: {coord}. Error:\n{}", format_error_chain(&err));
			error_500()
		}
	}
}

pub async fn fallback() -> Response<Body> {
	error_404()
}

/// Parses `{z}`, `{x}` and `{y}.png` path segments.
fn parse_tile_coord(z: &str, x: &str, y: &str) -> Option<TileCoord> {
	let y = y.strip_suffix(".png")?;
	Some(TileCoord::new(z.parse().ok()?, x.parse().ok()?, y.parse().ok()?))
}

// --- small helpers -----------------------------------------------------------

pub fn format_error_chain(err: &anyhow::Error) -> String {
	let mut result = err.to_string();
	for (i, cause) in err.chain().skip(1).enumerate() {
		if i == 0 {
			result.push_str("\n  Caused by:");
		}
		result.push_str(&format!("\n    {cause}"));
	}
	result
}

fn error_with(status: StatusCode, message: &'static str) -> Response<Body> {
	(status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], message).into_response()
}

pub fn error_404() -> Response<Body> {
	error_with(StatusCode::NOT_FOUND, "Not Found")
}

pub fn error_500() -> Response<Body> {
	error_with(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

fn ok_data(blob: Blob, mime: &'static str) -> Response<Body> {
	(
		[(header::CONTENT_TYPE, mime), (header::CACHE_CONTROL, CACHE_CONTROL)],
		blob.into_vec(),
	)
		.into_response()
}

#[cfg(test)]
mod tests {
	use super::*;
	use anyhow::anyhow;
	use rstest::rstest;

	#[rstest]
	#[case("3", "-2", "7.png", Some(TileCoord::new(3, -2, 7)))]
	#[case("12", "585", "146.png", Some(TileCoord::new(12, 585, 146)))]
	#[case("3", "2", "7", None)]
	#[case("3", "2", "7.jpg", None)]
	#[case("-1", "2", "7.png", None)]
	#[case("256", "2", "7.png", None)]
	#[case("a", "2", "7.png", None)]
	#[case("3", "2.5", "7.png", None)]
	fn parses_tile_paths(#[case] z: &str, #[case] x: &str, #[case] y: &str, #[case] expected: Option<TileCoord>) {
		assert_eq!(parse_tile_coord(z, x, y), expected);
	}

	#[test]
	fn formats_error_chains() {
		let err = anyhow!("disk full").context("writing tile").context("rendering tile 3/1/2");
		assert_eq!(
			format_error_chain(&err),
			"rendering tile 3/1/2\n  Caused by:\n    writing tile\n    disk full"
		);
	}

	#[tokio::test]
	async fn error_responses_are_plain_text() {
		let response = error_404();
		assert_eq!(response.status(), StatusCode::NOT_FOUND);
		assert_eq!(
			response.headers()[header::CONTENT_TYPE],
			"text/plain; charset=utf-8"
		);
		let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
		assert_eq!(&body[..], b"Not Found");
		assert_eq!(error_500().status(), StatusCode::INTERNAL_SERVER_ERROR);
	}
}
