use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::StitchError;
use crate::StitchResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["stitch.toml", ".stitch.toml", ".config/stitch.toml"];

/// What to do when a tag names a component file that does not exist.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MissingFragmentPolicy {
	/// Log a warning and substitute nothing.
	#[default]
	Skip,
	/// Stop the composition with [`StitchError::FragmentNotFound`].
	Abort,
}

/// Settings for mirroring the asset folder into the destination.
///
/// ```toml
/// [assets]
/// exclude = ["**/*.psd", "drafts/**"]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
	/// Glob patterns, relative to the asset source folder, that are not
	/// copied.
	pub exclude: Vec<String>,
}

/// Configuration loaded from a `stitch.toml` file.
///
/// Every key is optional; missing keys fall back to the defaults below.
///
/// ```toml
/// open_comp_tag = "{{"
/// close_comp_tag = "}}"
/// indent_num_spaces = 2
/// component_folder_name = "components"
/// component_extension = ".html"
/// template_html_file_name = "template.html"
/// dist_html_file_name = "index.html"
/// style_extension = ".css"
/// src_style_folder_name = "styles"
/// dist_style_file_name = "style.css"
/// src_asset_folder_name = "assets"
/// dist_asset_folder_name = "assets"
/// dist_folder_name = "project-dist"
/// missing_fragment = "skip"
/// cache_fragments = false
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StitchConfig {
	/// Delimiter that opens a tag.
	pub open_comp_tag: String,
	/// Delimiter that closes a tag.
	pub close_comp_tag: String,
	/// Extra indentation applied to content of inline tags.
	pub indent_num_spaces: usize,
	/// Folder inside the source root holding the component files.
	pub component_folder_name: String,
	/// Suffix appended to a tag name to find its component file.
	pub component_extension: String,
	/// Root template file inside the source root.
	pub template_html_file_name: String,
	/// Composed document written to the destination folder.
	pub dist_html_file_name: String,
	/// Suffix of the files collected into the style bundle.
	pub style_extension: String,
	/// Folder inside the source root holding the style files.
	pub src_style_folder_name: String,
	/// Bundle file written to the destination folder.
	pub dist_style_file_name: String,
	/// Folder inside the source root that is mirrored verbatim.
	pub src_asset_folder_name: String,
	/// Mirror target inside the destination folder.
	pub dist_asset_folder_name: String,
	/// Destination folder used when none is given on the command line.
	pub dist_folder_name: String,
	/// Whether a missing component is skipped or aborts the build.
	pub missing_fragment: MissingFragmentPolicy,
	/// Read each component at most once per run.
	pub cache_fragments: bool,
	/// Asset mirroring options.
	pub assets: AssetsConfig,
}

impl Default for StitchConfig {
	fn default() -> Self {
		Self {
			open_comp_tag: "{{".to_string(),
			close_comp_tag: "}}".to_string(),
			indent_num_spaces: 2,
			component_folder_name: "components".to_string(),
			component_extension: ".html".to_string(),
			template_html_file_name: "template.html".to_string(),
			dist_html_file_name: "index.html".to_string(),
			style_extension: ".css".to_string(),
			src_style_folder_name: "styles".to_string(),
			dist_style_file_name: "style.css".to_string(),
			src_asset_folder_name: "assets".to_string(),
			dist_asset_folder_name: "assets".to_string(),
			dist_folder_name: "project-dist".to_string(),
			missing_fragment: MissingFragmentPolicy::Skip,
			cache_fragments: false,
			assets: AssetsConfig::default(),
		}
	}
}

impl StitchConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> StitchResult<Option<StitchConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml(&content)?;

		Ok(Some(config))
	}

	/// Load the config at `root`, falling back to the defaults when no config
	/// file exists.
	pub fn load_or_default(root: &Path) -> StitchResult<StitchConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	/// Parse and validate a config from TOML text.
	pub fn from_toml(content: &str) -> StitchResult<StitchConfig> {
		let config: StitchConfig =
			toml::from_str(content).map_err(|e| StitchError::ConfigParse(e.to_string()))?;
		config.validate()?;

		Ok(config)
	}

	/// Reject settings the scanner or resolver cannot work with.
	pub fn validate(&self) -> StitchResult<()> {
		if self.open_comp_tag.is_empty() || self.close_comp_tag.is_empty() {
			return Err(StitchError::ConfigInvalid(
				"`open_comp_tag` and `close_comp_tag` must not be empty".to_string(),
			));
		}

		if self.open_comp_tag == self.close_comp_tag {
			return Err(StitchError::ConfigInvalid(format!(
				"`open_comp_tag` and `close_comp_tag` must differ (both are `{}`)",
				self.open_comp_tag
			)));
		}

		if self.component_extension.contains(['/', '\\']) {
			return Err(StitchError::ConfigInvalid(format!(
				"`component_extension` must not contain a path separator: `{}`",
				self.component_extension
			)));
		}

		Ok(())
	}

	/// The source paths and destination paths this config resolves to.
	pub fn layout(&self, src_root: &Path, dist_root: &Path) -> BuildLayout {
		BuildLayout {
			template: src_root.join(&self.template_html_file_name),
			components: src_root.join(&self.component_folder_name),
			src_assets: src_root.join(&self.src_asset_folder_name),
			src_styles: src_root.join(&self.src_style_folder_name),
			dist_root: dist_root.to_path_buf(),
			dist_html: dist_root.join(&self.dist_html_file_name),
			dist_assets: dist_root.join(&self.dist_asset_folder_name),
			dist_style: dist_root.join(&self.dist_style_file_name),
		}
	}

	/// Destination used when the caller does not pick one.
	pub fn default_dist_root(&self, src_root: &Path) -> PathBuf {
		src_root.join(&self.dist_folder_name)
	}
}

/// Absolute locations of every input and output of one build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildLayout {
	pub template: PathBuf,
	pub components: PathBuf,
	pub src_assets: PathBuf,
	pub src_styles: PathBuf,
	pub dist_root: PathBuf,
	pub dist_html: PathBuf,
	pub dist_assets: PathBuf,
	pub dist_style: PathBuf,
}
