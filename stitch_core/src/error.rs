use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum StitchError {
	#[error(transparent)]
	#[diagnostic(code(stitch::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to read template `{path}`: {reason}")]
	#[diagnostic(
		code(stitch::template_unreadable),
		help("check that `template_html_file_name` points at an existing file in the source folder")
	)]
	TemplateUnreadable { path: String, reason: String },

	#[error("no component found for tag `{name}` (looked for `{path}`)")]
	#[diagnostic(
		code(stitch::fragment_not_found),
		help(
			"create the component file, fix the tag name, or set `missing_fragment = \"skip\"` in \
			 stitch.toml"
		)
	)]
	FragmentNotFound { name: String, path: String },

	#[error("malformed tag in {file} at {line}:{column}: {reason}")]
	#[diagnostic(
		code(stitch::malformed_tag),
		help("every tag must be opened and closed exactly once, e.g. `{{{{header}}}}`")
	)]
	MalformedTag {
		file: String,
		line: usize,
		column: usize,
		reason: String,
	},

	#[error("failed to write `{path}`: {reason}")]
	#[diagnostic(code(stitch::destination_write))]
	DestinationWrite { path: String, reason: String },

	#[error("failed to mirror assets at `{path}`: {reason}")]
	#[diagnostic(code(stitch::asset_mirror))]
	AssetMirror { path: String, reason: String },

	#[error("failed to bundle styles at `{path}`: {reason}")]
	#[diagnostic(code(stitch::style_bundle))]
	StyleBundle { path: String, reason: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(stitch::config_parse),
		help("check that stitch.toml is valid TOML and only uses known keys")
	)]
	ConfigParse(String),

	#[error("invalid configuration: {0}")]
	#[diagnostic(code(stitch::config_invalid))]
	ConfigInvalid(String),

	#[error("invalid asset exclude pattern `{pattern}`: {reason}")]
	#[diagnostic(code(stitch::invalid_glob))]
	InvalidGlob { pattern: String, reason: String },
}

pub type StitchResult<T> = Result<T, StitchError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
