use std::path::Path;
use std::time::UNIX_EPOCH;

use derive_more::Deref;

use crate::StitchError;
use crate::StitchResult;
use crate::lines::indent;

/// The text of the document being composed. Append only.
#[derive(Debug, Clone, Default, Deref)]
pub struct OutputBuffer(String);

impl OutputBuffer {
	pub fn new() -> Self {
		Self::default()
	}

	/// True when the next character written starts a new output line.
	pub fn at_line_start(&self) -> bool {
		self.0.is_empty() || self.0.ends_with('\n')
	}

	pub fn push_str(&mut self, text: &str) {
		self.0.push_str(text);
	}

	/// Write a line terminator.
	pub fn end_line(&mut self) {
		self.0.push('\n');
	}

	/// Write `text` as a full line indented by `column` spaces.
	pub fn push_indented_line(&mut self, column: usize, text: &str) {
		self.0.push_str(&indent(column));
		self.0.push_str(text);
		self.0.push('\n');
	}

	pub fn into_string(self) -> String {
		self.0
	}
}

/// Replace the file at `path` with `contents` in one step.
///
/// The contents go to a temporary sibling first which is then renamed over
/// `path`, so readers see either the previous file or the complete new one.
pub fn write_atomically(path: &Path, contents: impl AsRef<[u8]>) -> StitchResult<()> {
	let destination_error = |error: std::io::Error| {
		StitchError::DestinationWrite {
			path: path.display().to_string(),
			reason: error.to_string(),
		}
	};

	if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
		std::fs::create_dir_all(parent).map_err(destination_error)?;
	}

	let file_name = path
		.file_name()
		.map(|name| name.to_string_lossy().to_string())
		.unwrap_or_default();
	let temp_path = path.with_file_name(format!(
		".{file_name}.tmp-{}-{}",
		std::process::id(),
		std::time::SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_or(0, |duration| duration.as_nanos())
	));

	std::fs::write(&temp_path, contents).map_err(destination_error)?;

	if let Err(error) = std::fs::rename(&temp_path, path) {
		let _ = std::fs::remove_file(&temp_path);
		return Err(destination_error(error));
	}

	Ok(())
}
