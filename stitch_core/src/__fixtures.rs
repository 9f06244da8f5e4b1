use std::cell::Cell;
use std::path::Path;

use crate::Fragment;
use crate::FragmentResolver;
use crate::MemoryResolver;
use crate::StitchConfig;
use crate::StitchResult;
use crate::compose_str;

pub(crate) fn components() -> MemoryResolver {
	MemoryResolver::new()
		.with("header", "<h1>Hi</h1>\n<p>sub</p>\n")
		.with("footer", "<span>f</span>\n")
		.with("x", "X")
		.with("y", "Y")
		.with("item", "<li>1</li>")
}

/// Compose with the default config and return the document.
pub(crate) fn compose_default(template: &str) -> StitchResult<String> {
	compose_str(template, &StitchConfig::default(), components()).map(|c| c.output)
}

/// Counts every call that reaches it.
pub(crate) struct CountingResolver {
	inner: MemoryResolver,
	pub(crate) reads: Cell<usize>,
}

impl CountingResolver {
	pub(crate) fn new(inner: MemoryResolver) -> Self {
		Self {
			inner,
			reads: Cell::new(0),
		}
	}
}

impl FragmentResolver for CountingResolver {
	fn resolve(&self, name: &str) -> StitchResult<Fragment> {
		self.reads.set(self.reads.get() + 1);
		self.inner.resolve(name)
	}
}

/// Write `files` (relative path, content) below `root`, creating folders.
pub(crate) fn write_files(root: &Path, files: &[(&str, &str)]) -> std::io::Result<()> {
	for (relative, content) in files {
		let path = root.join(relative);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, content)?;
	}

	Ok(())
}

/// A small site with a template, components, styles and assets.
pub(crate) fn write_site(root: &Path) -> std::io::Result<()> {
	write_files(
		root,
		&[
			(
				"template.html",
				"<html>\n  <body>\n    {{header}}\n    <main>{{articles}}</main>\n    \
				 {{footer}}\n  </body>\n</html>\n",
			),
			("components/header.html", "<header>\n  <h1>Site</h1>\n</header>\n"),
			("components/articles.html", "<article>one</article>\n"),
			("components/footer.html", "<footer>bye</footer>\n"),
			("styles/b.css", "b {}\n"),
			("styles/a.css", "a {}\n"),
			("styles/notes.txt", "not a style\n"),
			("assets/img/logo.svg", "<svg/>"),
			("assets/fonts/main.woff", "font"),
		],
	)
}

pub(crate) const SITE_INDEX: &str = "<html>\n  <body>\n    <header>\n      <h1>Site</h1>\n    \
                                     </header>\n    <main>\n      <article>one</article>\n    \
                                     </main>\n    <footer>bye</footer>\n  </body>\n</html>\n";
