
use pretty_assertions::assert_eq;
use std::{
	fs,
	io::{Read, Write},
	net::{TcpListener, TcpStream},
	path::Path,
	process::Child,
	thread,
	time::Duration,
};
use test_utilities::*;

fn list_tiles(root: &Path) -> Vec<String> {
	let mut tiles = Vec::new();
	for zoom in fs::read_dir(root).unwrap() {
		let zoom = zoom.unwrap().path();
		if !zoom.is_dir() {
			continue;
		}
		for column in fs::read_dir(&zoom).unwrap() {
			for row in fs::read_dir(column.unwrap().path()).unwrap() {
				let path = row.unwrap().path();
				tiles.push(path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"));
			}
		}
	}
	tiles.sort();
	tiles
}

fn tiles_cmd(output: &Path) -> assert_cmd::Command {
	let input = get_testdata("sample_map.json");
	let mut cmd = ocad_tiler_cmd();
	cmd.args([
		"tiles",
		input.to_str().unwrap(),
		output.to_str().unwrap(),
		"-n",
		"2",
		"-o",
		"10",
		"-r",
		"4",
	]);
	cmd
}

#[test]
fn renders_a_pyramid() {
	let (_dir, output) = get_temp_output("tiles");
	tiles_cmd(&output).assert().success();

	assert_eq!(
		list_tiles(&output),
		vec![
			"10/292/73.png",
			"10/293/73.png",
			"11/585/146.png",
			"11/585/147.png",
			"11/586/146.png",
			"11/586/147.png",
		]
	);

	let index = fs::read_to_string(output.join("index.html")).unwrap();
	assert!(index.contains("minZoom = 10"));
	assert!(!index.contains("${"));

	let tile = image::open(output.join("11/586/147.png")).unwrap();
	assert_eq!((tile.width(), tile.height()), (256, 256));
}

#[test]
fn keeps_existing_tiles() {
	let (_dir, output) = get_temp_output("tiles");
	let tile = output.join("10/292/73.png");
	fs::create_dir_all(tile.parent().unwrap()).unwrap();
	fs::write(&tile, b"existing").unwrap();

	tiles_cmd(&output).assert().success();

	assert_eq!(fs::read(&tile).unwrap(), b"existing");
	assert_eq!(list_tiles(&output).len(), 6);
}

#[test]
fn rejects_zero_levels() {
	let (_dir, output) = get_temp_output("tiles");
	let input = get_testdata("sample_map.json");
	ocad_tiler_cmd()
		.args(["tiles", input.to_str().unwrap(), output.to_str().unwrap(), "-n", "0"])
		.assert()
		.failure()
		.code(1)
		.stderr(predicates::str::contains("zoom levels"));
	assert!(!output.exists());
}

struct Server {
	port: u16,
	child: Child,
}

impl Server {
	fn new(output: &Path) -> Self {
		let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
		let input = get_testdata("sample_map.json");
		let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin!("ocad-tiler"))
			.args([
				"tiles",
				input.to_str().unwrap(),
				output.to_str().unwrap(),
				"-n",
				"2",
				"-o",
				"10",
				"-r",
				"4",
				"--serve",
				"-i",
				"127.0.0.1",
				"-p",
				&port.to_string(),
			])
			.spawn()
			.unwrap();

		loop {
			thread::sleep(Duration::from_millis(100));
			assert!(child.try_wait().unwrap().is_none(), "server process exited prematurely");
			if TcpStream::connect(("127.0.0.1", port)).is_ok() {
				break;
			}
		}

		Self { port, child }
	}

	fn get(&self, path: &str) -> (String, Vec<u8>) {
		let mut stream = TcpStream::connect(("127.0.0.1", self.port)).unwrap();
		write!(stream, "GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n").unwrap();
		let mut response = Vec::new();
		stream.read_to_end(&mut response).unwrap();

		let split = response.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
		let head = String::from_utf8_lossy(&response[..split]).to_string();
		(head, response[split + 4..].to_vec())
	}
}

impl Drop for Server {
	fn drop(&mut self) {
		let _ = self.child.kill();
		let _ = self.child.wait();
	}
}

#[test]
fn serves_tiles_on_demand() {
	let (_dir, output) = get_temp_output("tiles");
	let server = Server::new(&output);

	let (head, body) = server.get("/");
	assert!(head.starts_with("HTTP/1.1 200"));
	assert!(String::from_utf8(body).unwrap().contains("ol.js"));

	let tile = output.join("11/586/147.png");
	assert!(!tile.exists());
	let (head, body) = server.get("/11/586/147.png");
	assert!(head.starts_with("HTTP/1.1 200"));
	assert!(head.to_lowercase().contains("content-type: image/png"));
	assert_eq!(&body[..4], &[0x89, b'P', b'N', b'G']);
	assert!(tile.is_file());

	let (head, _) = server.get("/12/0/0.png");
	assert!(head.starts_with("HTTP/1.1 404"));
	let (head, _) = server.get("/11/584/147.png");
	assert!(head.starts_with("HTTP/1.1 404"));
}
