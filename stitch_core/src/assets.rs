//! The asset pipeline that runs before composition: mirroring the asset folder
//! into the destination and bundling the style sheets into one file.
//!
//! Both steps walk the file system sequentially and return only once every
//! file has been written, so a composed document is never published next to a
//! half-copied asset folder.

use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use serde::Serialize;

use crate::StitchError;
use crate::StitchResult;
use crate::output::write_atomically;

/// Files handled while mirroring the asset folder.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MirrorReport {
	/// Copied files, relative to the asset folder.
	pub copied: Vec<PathBuf>,
	/// Files left out by an exclude pattern, relative to the asset folder.
	pub excluded: Vec<PathBuf>,
	/// Entries removed from the destination before copying.
	pub removed: usize,
}

/// Style files concatenated into the bundle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BundleReport {
	/// File names in the order they were concatenated.
	pub files: Vec<String>,
	/// Size of the bundle in bytes.
	pub bytes: usize,
}

/// Build a [`GlobSet`] from exclude patterns.
pub fn build_exclude_set(patterns: &[String]) -> StitchResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| {
			StitchError::InvalidGlob {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
		builder.add(glob);
	}

	builder.build().map_err(|e| {
		StitchError::InvalidGlob {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Make `dest` an exact copy of `src`.
///
/// `dest` is created if needed and emptied, then every file of `src` not
/// matched by `exclude` is copied in file name order. A missing `src` leaves
/// an empty `dest`.
pub fn mirror_directory(src: &Path, dest: &Path, exclude: &GlobSet) -> StitchResult<MirrorReport> {
	let mut report = MirrorReport::default();

	std::fs::create_dir_all(dest).map_err(|e| mirror_error(dest, &e))?;
	if let (Ok(src_real), Ok(dest_real)) = (src.canonicalize(), dest.canonicalize()) {
		if src_real == dest_real {
			return Err(StitchError::AssetMirror {
				path: dest.display().to_string(),
				reason: "source and destination are the same folder".to_string(),
			});
		}
	}

	report.removed = empty_directory(dest)?;

	if !src.is_dir() {
		tracing::debug!(src = %src.display(), "no asset folder, nothing to mirror");
		return Ok(report);
	}

	copy_directory(src, src, dest, exclude, &mut report)?;
	tracing::debug!(
		src = %src.display(),
		dest = %dest.display(),
		copied = report.copied.len(),
		excluded = report.excluded.len(),
		"mirrored assets"
	);

	Ok(report)
}

fn empty_directory(dir: &Path) -> StitchResult<usize> {
	let mut removed = 0;

	for path in sorted_entries(dir)? {
		let file_type = std::fs::symlink_metadata(&path)
			.map_err(|e| mirror_error(&path, &e))?
			.file_type();
		let result = if file_type.is_dir() {
			std::fs::remove_dir_all(&path)
		} else {
			std::fs::remove_file(&path)
		};
		result.map_err(|e| mirror_error(&path, &e))?;
		removed += 1;
	}

	Ok(removed)
}

fn copy_directory(
	root: &Path,
	src: &Path,
	dest: &Path,
	exclude: &GlobSet,
	report: &mut MirrorReport,
) -> StitchResult<()> {
	for path in sorted_entries(src)? {
		let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
		if exclude.is_match(&relative) {
			report.excluded.push(relative);
			continue;
		}

		let Some(file_name) = path.file_name() else {
			continue;
		};
		let target = dest.join(file_name);

		if path.is_dir() {
			std::fs::create_dir_all(&target).map_err(|e| mirror_error(&target, &e))?;
			copy_directory(root, &path, &target, exclude, report)?;
		} else if path.is_file() {
			std::fs::copy(&path, &target).map_err(|e| mirror_error(&path, &e))?;
			report.copied.push(relative);
		} else {
			tracing::debug!(path = %path.display(), "skipping entry that is neither file nor folder");
		}
	}

	Ok(())
}

/// Concatenate every `extension` file directly inside `src` into `dest`, in
/// file name order. A missing `src` produces an empty bundle.
pub fn bundle_styles(src: &Path, dest: &Path, extension: &str) -> StitchResult<BundleReport> {
	let mut report = BundleReport::default();
	let mut bundle = Vec::new();

	if src.is_dir() {
		let extension = extension.trim_start_matches('.');
		let entries = sorted_entries(src).map_err(|e| {
			StitchError::StyleBundle {
				path: src.display().to_string(),
				reason: e.to_string(),
			}
		})?;

		for path in entries {
			let matches = path.is_file()
				&& path
					.extension()
					.is_some_and(|ext| ext.to_string_lossy() == extension);
			if !matches {
				continue;
			}

			let contents = std::fs::read(&path).map_err(|e| {
				StitchError::StyleBundle {
					path: path.display().to_string(),
					reason: e.to_string(),
				}
			})?;
			bundle.extend_from_slice(&contents);

			if let Some(name) = path.file_name() {
				report.files.push(name.to_string_lossy().to_string());
			}
		}
	} else {
		tracing::warn!(src = %src.display(), "style folder not found, writing an empty bundle");
	}

	report.bytes = bundle.len();
	write_atomically(dest, &bundle)?;
	tracing::debug!(dest = %dest.display(), files = report.files.len(), "bundled styles");

	Ok(report)
}

/// Entries of `dir` sorted by file name.
fn sorted_entries(dir: &Path) -> StitchResult<Vec<PathBuf>> {
	let mut entries = std::fs::read_dir(dir)
		.map_err(|e| mirror_error(dir, &e))?
		.map(|entry| entry.map(|entry| entry.path()))
		.collect::<Result<Vec<_>, _>>()
		.map_err(|e| mirror_error(dir, &e))?;
	entries.sort();

	Ok(entries)
}

fn mirror_error(path: &Path, error: &std::io::Error) -> StitchError {
	StitchError::AssetMirror {
		path: path.display().to_string(),
		reason: error.to_string(),
	}
}
