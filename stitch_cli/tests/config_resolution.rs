mod common;

use rstest::rstest;
use stitch_core::AnyEmptyResult;

#[rstest]
#[case::stitch_toml("stitch.toml")]
#[case::dot_stitch_toml(".stitch.toml")]
#[case::dot_config(".config/stitch.toml")]
fn build_resolves_config_candidate(#[case] config_path: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_site(tmp.path())?;
	common::write_files(tmp.path(), &[(config_path, "dist_folder_name = \"public\"\n")])?;

	common::stitch_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert!(tmp.path().join("public/index.html").exists());
	assert!(!tmp.path().join("project-dist").exists());

	Ok(())
}

#[test]
fn build_prefers_stitch_toml_over_other_candidates() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_site(tmp.path())?;
	common::write_files(
		tmp.path(),
		&[
			("stitch.toml", "dist_folder_name = \"first\"\n"),
			(".stitch.toml", "dist_folder_name = \"second\"\n"),
			(".config/stitch.toml", "dist_folder_name = \"third\"\n"),
		],
	)?;

	common::stitch_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert!(tmp.path().join("first/index.html").exists());
	assert!(!tmp.path().join("second").exists());
	assert!(!tmp.path().join("third").exists());

	Ok(())
}

#[test]
fn build_uses_configured_delimiters_and_folders() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(
		tmp.path(),
		&[
			(
				"stitch.toml",
				"open_comp_tag = \"<%\"\nclose_comp_tag = \"%>\"\nindent_num_spaces = \
				 4\ncomponent_folder_name = \"parts\"\n",
			),
			("template.html", "<ul><% item %></ul>\n"),
			("parts/item.html", "<li>1</li>\n"),
		],
	)?;

	common::stitch_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("project-dist/index.html"))?,
		"<ul>\n    <li>1</li>\n</ul>\n"
	);

	Ok(())
}

#[rstest]
#[case::unknown_key("indent = 2\n", "stitch::config_parse")]
#[case::same_delimiters(
	"open_comp_tag = \"%%\"\nclose_comp_tag = \"%%\"\n",
	"stitch::config_invalid"
)]
fn build_rejects_bad_config(#[case] content: &str, #[case] code: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_site(tmp.path())?;
	common::write_files(tmp.path(), &[("stitch.toml", content)])?;

	common::stitch_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains(code));

	assert!(!tmp.path().join("project-dist").exists());

	Ok(())
}
