mod common;

use similar_asserts::assert_eq;
use stitch_core::AnyEmptyResult;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::stitch_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created template.html"))
		.stdout(predicates::str::contains("Created stitch.toml"));

	let template = std::fs::read_to_string(tmp.path().join("template.html"))?;
	assert!(template.contains("{{header}}"));
	assert!(template.contains("{{content}}"));
	assert!(tmp.path().join("components/header.html").exists());
	assert!(tmp.path().join("components/content.html").exists());

	let config = std::fs::read_to_string(tmp.path().join("stitch.toml"))?;
	assert!(config.contains("# indent_num_spaces = 2"));

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(
		tmp.path(),
		&[
			("template.html", "existing template"),
			("stitch.toml", "indent_num_spaces = 4\n"),
		],
	)?;

	common::stitch_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Already exists: template.html"))
		.stdout(predicates::str::contains("Created components/header.html"));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("template.html"))?,
		"existing template"
	);
	assert_eq!(
		std::fs::read_to_string(tmp.path().join("stitch.toml"))?,
		"indent_num_spaces = 4\n"
	);

	Ok(())
}

#[test]
fn init_output_builds() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::stitch_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	common::stitch_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let index = std::fs::read_to_string(tmp.path().join("project-dist/index.html"))?;
	assert!(index.contains("      <h1>Hello from stitch</h1>"));
	assert!(index.contains("      <p>Edit components/content.html to change this text.</p>"));
	assert!(!index.contains("{{"));

	Ok(())
}
