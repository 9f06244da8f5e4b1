use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::BuildLayout;
use crate::CachingResolver;
use crate::Composer;
use crate::Composition;
use crate::FileSystemResolver;
use crate::MissingFragment;
use crate::StitchConfig;
use crate::StitchError;
use crate::StitchResult;
use crate::Substitution;
use crate::assets::BundleReport;
use crate::assets::MirrorReport;
use crate::assets::build_exclude_set;
use crate::assets::bundle_styles;
use crate::assets::mirror_directory;
use crate::lines::read_lines;
use crate::output::write_atomically;

/// Everything one build produced.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
	pub layout: BuildLayout,
	pub assets: MirrorReport,
	pub styles: BundleReport,
	pub substitutions: Vec<Substitution>,
	pub missing: Vec<MissingFragment>,
	/// Size of the composed document in bytes.
	pub bytes: usize,
}

/// Result of comparing a fresh composition with the document on disk.
#[derive(Debug, Clone)]
pub struct CheckResult {
	/// The destination document.
	pub path: PathBuf,
	/// The document on disk, `None` if it does not exist.
	pub current: Option<String>,
	/// The freshly composed document.
	pub expected: Composition,
}

impl CheckResult {
	/// Returns true if the document on disk matches a fresh composition.
	pub fn is_ok(&self) -> bool {
		self.current.as_deref() == Some(self.expected.output.as_str())
	}
}

/// Build the distribution folder for the project at `src_root`.
///
/// Runs the asset pipeline (asset mirroring, then style bundling) to
/// completion before composing the template, and writes the composed
/// document once at the end. On error the previous document, if any, is left
/// untouched.
pub fn build_page(
	src_root: &Path,
	dist_root: &Path,
	config: &StitchConfig,
) -> StitchResult<BuildReport> {
	config.validate()?;
	let layout = config.layout(src_root, dist_root);
	let exclude = build_exclude_set(&config.assets.exclude)?;

	std::fs::create_dir_all(&layout.dist_root).map_err(|e| {
		StitchError::DestinationWrite {
			path: layout.dist_root.display().to_string(),
			reason: e.to_string(),
		}
	})?;

	let assets = mirror_directory(&layout.src_assets, &layout.dist_assets, &exclude)?;
	let styles = bundle_styles(
		&layout.src_styles,
		&layout.dist_style,
		&config.style_extension,
	)?;

	let composition = compose_layout(&layout, config)?;
	write_atomically(&layout.dist_html, &composition.output)?;
	tracing::info!(
		path = %layout.dist_html.display(),
		substitutions = composition.substitutions.len(),
		missing = composition.missing.len(),
		"wrote composed document"
	);

	Ok(BuildReport {
		bytes: composition.output.len(),
		substitutions: composition.substitutions,
		missing: composition.missing,
		layout,
		assets,
		styles,
	})
}

/// Compose the template of the project at `src_root` without writing
/// anything.
pub fn render_page(src_root: &Path, config: &StitchConfig) -> StitchResult<Composition> {
	config.validate()?;
	let layout = config.layout(src_root, &config.default_dist_root(src_root));
	compose_layout(&layout, config)
}

/// Compose the template in memory and compare it with the document already
/// in `dist_root`.
pub fn check_page(
	src_root: &Path,
	dist_root: &Path,
	config: &StitchConfig,
) -> StitchResult<CheckResult> {
	config.validate()?;
	let layout = config.layout(src_root, dist_root);
	let expected = compose_layout(&layout, config)?;

	let current = match std::fs::read_to_string(&layout.dist_html) {
		Ok(content) => Some(content),
		Err(error) if error.kind() == std::io::ErrorKind::NotFound => None,
		Err(error) => return Err(error.into()),
	};

	Ok(CheckResult {
		path: layout.dist_html,
		current,
		expected,
	})
}

fn compose_layout(layout: &BuildLayout, config: &StitchConfig) -> StitchResult<Composition> {
	let template = read_lines(&layout.template).map_err(|e| {
		StitchError::TemplateUnreadable {
			path: layout.template.display().to_string(),
			reason: e.to_string(),
		}
	})?;
	let source = layout.template.display().to_string();
	let resolver = FileSystemResolver::new(&layout.components, &config.component_extension);

	tracing::debug!(
		template = %source,
		lines = template.len(),
		cache = config.cache_fragments,
		"composing template"
	);

	if config.cache_fragments {
		Composer::new(config, CachingResolver::new(resolver))
			.with_source(source)
			.compose(&template)
	} else {
		Composer::new(config, resolver)
			.with_source(source)
			.compose(&template)
	}
}
