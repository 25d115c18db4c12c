use predicates::str;
use rstest::rstest;
use test_utilities::{BINARY_NAME, ocad_tiler_cmd};

#[test]
fn command() -> Result<(), Box<dyn std::error::Error>> {
	ocad_tiler_cmd()
		.assert()
		.failure()
		.code(1)
		.stdout(str::is_empty())
		.stderr(str::contains(format!("Usage: {BINARY_NAME} [OPTIONS] <COMMAND>")));
	Ok(())
}

#[rstest]
#[case("render", "[OPTIONS] <MAP> <OUTPUT>")]
#[case("tiles", "[OPTIONS] <MAP> <OUTPUT_DIR>")]
fn subcommand(#[case] sub_command: &str, #[case] usage: &str) -> Result<(), Box<dyn std::error::Error>> {
	ocad_tiler_cmd()
		.arg(sub_command)
		.assert()
		.failure()
		.code(1)
		.stdout(str::is_empty())
		.stderr(str::contains(format!("Usage: {BINARY_NAME} {sub_command} {usage}")));
	Ok(())
}

#[rstest]
#[case(&["--help"])]
#[case(&["render", "--help"])]
#[case(&["--version"])]
fn help_and_version_succeed(#[case] args: &[&str]) {
	ocad_tiler_cmd()
		.args(args)
		.assert()
		.success()
		.code(0)
		.stdout(str::contains("ocad-tiler"));
}

#[test]
fn missing_output_argument() {
	ocad_tiler_cmd()
		.args(["render", "map.json"])
		.assert()
		.failure()
		.code(1)
		.stderr(str::contains("<OUTPUT>"));
}

#[test]
fn unknown_flag() {
	ocad_tiler_cmd()
		.args(["tiles", "map.json", "out", "--zoom", "3"])
		.assert()
		.failure()
		.code(1)
		.stderr(str::contains("--zoom"));
}
