mod common;

use clap::Parser;
use predicates::prelude::PredicateBooleanExt;
use stitch_cli::Commands;
use stitch_cli::StitchCli;
use stitch_core::AnyEmptyResult;

fn build(root: &std::path::Path) {
	common::stitch_cmd()
		.arg("build")
		.arg("--path")
		.arg(root)
		.assert()
		.success();
}

#[test]
fn check_fails_before_first_build() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_site(tmp.path())?;

	common::stitch_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("has not been built yet"));

	Ok(())
}

#[test]
fn check_passes_when_up_to_date() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_site(tmp.path())?;
	build(tmp.path());

	common::stitch_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Check passed"))
		.stdout(predicates::str::contains("up to date"));

	Ok(())
}

#[test]
fn check_detects_changed_component() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_site(tmp.path())?;
	build(tmp.path());

	common::write_files(
		tmp.path(),
		&[("components/articles.html", "<article>two</article>\n")],
	)?;

	common::stitch_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("is out of date"))
		.stderr(predicates::str::contains("<article>two</article>").not());

	Ok(())
}

#[test]
fn check_diff_shows_changed_lines() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_site(tmp.path())?;
	build(tmp.path());

	common::write_files(
		tmp.path(),
		&[("components/articles.html", "<article>two</article>\n")],
	)?;

	common::stitch_cmd()
		.arg("check")
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("-      <article>one</article>"))
		.stderr(predicates::str::contains("+      <article>two</article>"));

	Ok(())
}

#[test]
fn check_uses_out_folder() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let src = tmp.path().join("site");
	let out = tmp.path().join("public");
	common::write_site(&src)?;

	common::stitch_cmd()
		.arg("build")
		.arg("--path")
		.arg(&src)
		.arg("--out")
		.arg(&out)
		.assert()
		.success();

	common::stitch_cmd()
		.arg("check")
		.arg("--path")
		.arg(&src)
		.arg("--out")
		.arg(&out)
		.assert()
		.success();

	Ok(())
}

#[test]
fn check_does_not_write_anything() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_site(tmp.path())?;

	common::stitch_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1);

	assert!(!tmp.path().join("project-dist").exists());

	Ok(())
}

#[test]
fn check_flags_parse() {
	let cli = StitchCli::parse_from(["stitch", "check", "--diff"]);
	match cli.command {
		Some(Commands::Check { diff, out }) => {
			assert!(diff);
			assert!(out.is_none());
		}
		_ => panic!("expected Check command"),
	}

	let cli = StitchCli::parse_from(["stitch", "--no-color", "check", "-o", "public"]);
	assert!(cli.no_color);
	match cli.command {
		Some(Commands::Check { diff, out }) => {
			assert!(!diff);
			assert_eq!(out, Some(std::path::PathBuf::from("public")));
		}
		_ => panic!("expected Check command"),
	}
}
