#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn stitch_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("stitch"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("STITCH_LOG");
	cmd
}

/// Write `files` (relative path, content) below `root`, creating folders.
pub fn write_files(root: &Path, files: &[(&str, &str)]) -> std::io::Result<()> {
	for (relative, content) in files {
		let path = root.join(relative);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, content)?;
	}

	Ok(())
}

/// A source folder with a template, two components, styles and assets.
pub fn write_site(root: &Path) -> std::io::Result<()> {
	write_files(
		root,
		&[
			(
				"template.html",
				"<html>\n  <body>\n    {{header}}\n    <main>{{articles}}</main>\n  </body>\n</html>\n",
			),
			("components/header.html", "<header>\n  <h1>Site</h1>\n</header>\n"),
			("components/articles.html", "<article>one</article>\n"),
			("styles/main.css", "body {}\n"),
			("assets/logo.svg", "<svg/>"),
		],
	)
}

pub const SITE_INDEX: &str = "<html>\n  <body>\n    <header>\n      <h1>Site</h1>\n    \
                              </header>\n    <main>\n      <article>one</article>\n    \
                              </main>\n  </body>\n</html>\n";
