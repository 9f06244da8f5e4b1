//! Loading the component files that tags refer to.
//!
//! The composition engine only talks to the [`FragmentResolver`] trait. The
//! build uses [`FileSystemResolver`], optionally wrapped in a
//! [`CachingResolver`]; [`MemoryResolver`] serves fragments from memory.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use derive_more::Deref;

use crate::StitchError;
use crate::StitchResult;
use crate::lines::read_lines;
use crate::lines::split_lines;

/// The lines of one component, substituted in place of a tag.
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct Fragment {
	name: String,
	#[deref]
	lines: Vec<String>,
}

impl Fragment {
	pub fn new(name: impl Into<String>, lines: Vec<String>) -> Self {
		Self {
			name: name.into(),
			lines,
		}
	}

	/// A fragment with no lines, used in place of a missing component.
	pub fn empty(name: impl Into<String>) -> Self {
		Self::new(name, Vec::new())
	}

	pub fn name(&self) -> &str {
		&self.name
	}
}

/// Loads fragments by tag name.
///
/// Implementations return [`StitchError::FragmentNotFound`] when no fragment
/// exists for the name. Whether that stops the composition is decided by the
/// caller.
pub trait FragmentResolver {
	fn resolve(&self, name: &str) -> StitchResult<Fragment>;
}

impl<R: FragmentResolver + ?Sized> FragmentResolver for &R {
	fn resolve(&self, name: &str) -> StitchResult<Fragment> {
		(**self).resolve(name)
	}
}

/// Reads `<folder>/<name><extension>` on every call.
#[derive(Debug, Clone)]
pub struct FileSystemResolver {
	folder: PathBuf,
	extension: String,
}

impl FileSystemResolver {
	pub fn new(folder: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
		Self {
			folder: folder.into(),
			extension: extension.into(),
		}
	}

	/// The file a tag name maps to.
	pub fn path_for(&self, name: &str) -> PathBuf {
		self.folder.join(format!("{name}{}", self.extension))
	}
}

impl FragmentResolver for FileSystemResolver {
	fn resolve(&self, name: &str) -> StitchResult<Fragment> {
		let path = self.path_for(name);
		let not_found = || {
			StitchError::FragmentNotFound {
				name: name.to_string(),
				path: path.display().to_string(),
			}
		};

		// Tag names must stay inside the component folder.
		if !is_plain_name(name) {
			return Err(not_found());
		}

		match read_lines(&path) {
			Ok(lines) => {
				tracing::debug!(name, path = %path.display(), lines = lines.len(), "read component");
				Ok(Fragment::new(name, lines))
			}
			Err(error) => {
				tracing::debug!(name, path = %path.display(), %error, "component unreadable");
				Err(not_found())
			}
		}
	}
}

fn is_plain_name(name: &str) -> bool {
	!name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}

/// Serves fragments from memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
	fragments: HashMap<String, Vec<String>>,
}

impl MemoryResolver {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a fragment. `content` is split into lines like a component file.
	pub fn add(&mut self, name: impl Into<String>, content: &str) -> &mut Self {
		self.fragments.insert(name.into(), split_lines(content));
		self
	}

	/// Builder form of [`MemoryResolver::add`].
	#[must_use]
	pub fn with(mut self, name: impl Into<String>, content: &str) -> Self {
		self.add(name, content);
		self
	}
}

impl FragmentResolver for MemoryResolver {
	fn resolve(&self, name: &str) -> StitchResult<Fragment> {
		self.fragments
			.get(name)
			.map(|lines| Fragment::new(name, lines.clone()))
			.ok_or_else(|| {
				StitchError::FragmentNotFound {
					name: name.to_string(),
					path: format!("<memory>/{name}"),
				}
			})
	}
}

/// Remembers every fragment the inner resolver returned for the lifetime of
/// the wrapper. Missing fragments are not remembered.
///
/// Fragment files must not change while the wrapper is alive.
#[derive(Debug)]
pub struct CachingResolver<R> {
	inner: R,
	cache: RefCell<HashMap<String, Fragment>>,
}

impl<R: FragmentResolver> CachingResolver<R> {
	pub fn new(inner: R) -> Self {
		Self {
			inner,
			cache: RefCell::new(HashMap::new()),
		}
	}

	/// Number of distinct fragments held.
	pub fn len(&self) -> usize {
		self.cache.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.cache.borrow().is_empty()
	}
}

impl<R: FragmentResolver> FragmentResolver for CachingResolver<R> {
	fn resolve(&self, name: &str) -> StitchResult<Fragment> {
		if let Some(fragment) = self.cache.borrow().get(name) {
			return Ok(fragment.clone());
		}

		let fragment = self.inner.resolve(name)?;
		self.cache
			.borrow_mut()
			.insert(name.to_string(), fragment.clone());

		Ok(fragment)
	}
}
