//! Lifecycle of the HTTP tile server.
//!
//! `TileServer` builds the router, binds the socket, and shuts down gracefully. The handlers
//! live in `handlers`.

use super::{
	TileCache,
	handlers::{ServerState, fallback, serve_index, serve_tile},
};
use anyhow::{Context, Result};
use axum::{Router, routing::get};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::oneshot};
use tower_http::catch_panic::CatchPanicLayer;

/// Serves `index.html` and the tiles of one pyramid, rendering missing tiles on request.
///
/// Starting twice restarts the server, stopping twice is a no-op.
pub struct TileServer {
	ip: String,
	port: u16,
	state: ServerState,
	local_addr: Option<SocketAddr>,
	/// Signals graceful shutdown to the serving task.
	exit_signal: Option<oneshot::Sender<()>>,
	join: Option<tokio::task::JoinHandle<()>>,
}

impl TileServer {
	pub fn new(ip: &str, port: u16, cache: TileCache, index_page: String) -> TileServer {
		TileServer {
			ip: ip.to_owned(),
			port,
			state: ServerState {
				cache: Arc::new(cache),
				index_page: Arc::from(index_page),
			},
			local_addr: None,
			exit_signal: None,
			join: None,
		}
	}

	/// `GET /`, `/index.html`, `/status` and `/{z}/{x}/{y}.png`; everything else is a 404.
	pub fn router(&self) -> Router {
		Router::new()
			.route("/", get(serve_index))
			.route("/index.html", get(serve_index))
			.route("/status", get(|| async { "ready!" }))
			.route("/{z}/{x}/{y}", get(serve_tile))
			.fallback(fallback)
			.with_state(self.state.clone())
			.layer(CatchPanicLayer::new())
	}

	/// The bound address while the server is running.
	pub fn local_addr(&self) -> Option<SocketAddr> {
		self.local_addr
	}

	pub async fn start(&mut self) -> Result<()> {
		if self.exit_signal.is_some() || self.join.is_some() {
			self.stop().await;
		}

		log::info!("starting server");
		let router = self.router();

		let addr = format!("{}:{}", self.ip, self.port);
		let listener = TcpListener::bind(&addr)
			.await
			.with_context(|| format!("binding server to {addr}"))?;
		let local_addr = listener.local_addr()?;
		log::info!("server listening on http://{local_addr}/");

		let (tx, rx) = oneshot::channel::<()>();
		let handle = tokio::spawn(async move {
			if let Err(err) = axum::serve(listener, router.into_make_service())
				.with_graceful_shutdown(async {
					rx.await.ok();
				})
				.await
			{
				log::error!("server task exited with error: {err}");
			}
		});

		self.local_addr = Some(local_addr);
		self.exit_signal = Some(tx);
		self.join = Some(handle);
		Ok(())
	}

	/// Triggers a graceful shutdown and waits up to ten seconds for the serving task.
	pub async fn stop(&mut self) {
		if self.exit_signal.is_none() && self.join.is_none() {
			return;
		}

		log::info!("stopping server");
		if let Some(tx) = self.exit_signal.take() {
			let _ = tx.send(());
		}
		if let Some(handle) = self.join.take() {
			match tokio::time::timeout(Duration::from_secs(10), handle).await {
				Ok(Err(join_err)) => log::warn!("server task join error: {join_err}"),
				Ok(Ok(())) => {}
				Err(_) => log::warn!("server task did not shutdown within timeout; continuing"),
			}
		}
		self.local_addr = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tiler::{
		RenderOptions,
		testing::{CountingRasterizer, sample_tiler},
	};
	use assert_fs::TempDir;
	use axum::{
		body::Body,
		http::{Request, StatusCode, header},
	};
	use ocad_tiler_core::{Extent, TilePyramid, ZoomLevels};
	use std::path::Path;
	use tokio::io::{AsyncReadExt, AsyncWriteExt};
	use tower::ServiceExt as _;

	fn server(rasterizer: &CountingRasterizer, root: &Path) -> TileServer {
		let levels = ZoomLevels::new(2, 10, 4.0).unwrap();
		let bounds = Extent::new(600000.0, 150000.0, 601000.0, 150800.0).unwrap();
		let pyramid = TilePyramid::new(levels, 256, bounds).unwrap();
		let cache = TileCache::new(
			sample_tiler(rasterizer),
			pyramid,
			RenderOptions::default(),
			root.to_path_buf(),
		);
		TileServer::new("127.0.0.1", 0, cache, "<html>viewer</html>".to_string())
	}

	async fn get_path(router: &Router, path: &str) -> (StatusCode, Option<String>, Vec<u8>) {
		let request = Request::builder().uri(path).body(Body::empty()).unwrap();
		let response = router.clone().oneshot(request).await.unwrap();
		let status = response.status();
		let content_type = response
			.headers()
			.get(header::CONTENT_TYPE)
			.map(|v| v.to_str().unwrap().to_string());
		let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
		(status, content_type, body.to_vec())
	}

	#[tokio::test]
	async fn serves_status_and_index() {
		let dir = TempDir::new().unwrap();
		let router = server(&CountingRasterizer::default(), dir.path()).router();

		let (status, _, body) = get_path(&router, "/status").await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body, b"ready!");

		for path in ["/", "/index.html"] {
			let (status, content_type, body) = get_path(&router, path).await;
			assert_eq!(status, StatusCode::OK);
			assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
			assert_eq!(body, b"<html>viewer</html>");
		}
	}

	#[tokio::test]
	async fn renders_tiles_on_first_request() {
		let dir = TempDir::new().unwrap();
		let rasterizer = CountingRasterizer::default();
		let router = server(&rasterizer, dir.path()).router();

		let (status, content_type, body) = get_path(&router, "/11/586/147.png").await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(content_type.as_deref(), Some("image/png"));
		assert!(body.starts_with(b"\x89PNG"));
		assert_eq!(std::fs::read(dir.path().join("11/586/147.png")).unwrap(), body);

		get_path(&router, "/11/586/147.png").await;
		assert_eq!(rasterizer.calls(), 1);
	}

	#[tokio::test]
	async fn sends_cache_headers_with_tiles() {
		let dir = TempDir::new().unwrap();
		let router = server(&CountingRasterizer::default(), dir.path()).router();
		let request = Request::builder().uri("/10/292/73.png").body(Body::empty()).unwrap();
		let response = router.oneshot(request).await.unwrap();
		assert_eq!(
			response.headers()[header::CACHE_CONTROL],
			"public, max-age=2419200, no-transform"
		);
	}

	#[tokio::test]
	async fn answers_404_outside_the_pyramid() {
		let dir = TempDir::new().unwrap();
		let rasterizer = CountingRasterizer::default();
		let router = server(&rasterizer, dir.path()).router();

		for path in [
			"/9/292/73.png",
			"/12/585/146.png",
			"/11/587/146.png",
			"/11/585/148.png",
			"/11/585/146.jpg",
			"/11/x/146.png",
			"/11/585",
			"/favicon.ico",
		] {
			let (status, _, body) = get_path(&router, path).await;
			assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
			assert_eq!(body, b"Not Found");
		}
		assert_eq!(rasterizer.calls(), 0);
		assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
	}

	#[tokio::test]
	async fn answers_500_when_rendering_fails() {
		let dir = TempDir::new().unwrap();
		let router = server(&CountingRasterizer::failing(), dir.path()).router();
		let (status, _, body) = get_path(&router, "/11/585/146.png").await;
		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(body, b"Internal Server Error");
	}

	#[tokio::test]
	async fn starts_and_stops() {
		let dir = TempDir::new().unwrap();
		let mut server = server(&CountingRasterizer::default(), dir.path());
		server.start().await.unwrap();
		let addr = server.local_addr().unwrap();

		let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
		stream
			.write_all(b"GET /status HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
			.await
			.unwrap();
		let mut response = String::new();
		stream.read_to_string(&mut response).await.unwrap();
		assert!(response.starts_with("HTTP/1.1 200 OK"));
		assert!(response.ends_with("ready!"));

		server.start().await.unwrap();
		server.stop().await;
		assert!(server.local_addr().is_none());
		server.stop().await;
	}
}
