use serde::Serialize;

use crate::Fragment;
use crate::FragmentResolver;
use crate::StitchError;
use crate::StitchResult;
use crate::config::MissingFragmentPolicy;
use crate::config::StitchConfig;
use crate::lines::indent;
use crate::lines::leading_whitespace;
use crate::lines::split_lines;
use crate::output::OutputBuffer;
use crate::scanner::Delimiters;
use crate::scanner::Malformation;
use crate::scanner::TagKind;
use crate::scanner::TagScanner;
use crate::scanner::TagToken;

/// A tag that was opened on an earlier line and has not been closed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTag {
	/// Tag text collected so far, untrimmed.
	pub name: String,
	/// Indentation fixed when the open delimiter was seen.
	pub column: usize,
	/// Leading whitespace width of the line the tag opened on.
	pub leading: usize,
	/// Whether a line break goes before the fragment.
	pub break_before: bool,
	/// 1-indexed line of the open delimiter.
	pub line: usize,
	/// 1-indexed character column of the open delimiter.
	pub line_column: usize,
}

/// Scan state carried from one template line to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CompositionState {
	/// Not inside a tag.
	#[default]
	Idle,
	/// Inside a tag whose close delimiter is on a later line.
	AccumulatingTag(PendingTag),
}

/// A complete tag, ready to be substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTag {
	/// Trimmed tag name.
	pub name: String,
	pub column: usize,
	/// Indentation for literal text left on the line after the tag.
	pub leading: usize,
	pub break_before: bool,
	/// 1-indexed line of the open delimiter.
	pub line: usize,
	/// 1-indexed character column of the open delimiter.
	pub line_column: usize,
}

/// What the engine does with a scanned window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition<'l> {
	/// Literal text; the line is finished.
	Literal(&'l str),
	/// The window was added to the pending tag name; the line is finished.
	Accumulated,
	/// A tag was opened and continues on the next line. `before` is written
	/// as-is and the line is finished.
	Opened { before: &'l str },
	/// A tag is complete. `after` is scanned next, on the same line.
	Resolved {
		before: &'l str,
		tag: ResolvedTag,
		after: &'l str,
	},
}

impl CompositionState {
	pub fn is_accumulating(&self) -> bool {
		matches!(self, Self::AccumulatingTag(_))
	}

	/// Apply a scanned token to the state.
	///
	/// `line` is the 1-indexed template line and `line_column` the 1-indexed
	/// character column of the token's delimiter.
	pub fn transition<'l>(
		&mut self,
		token: TagToken<'l>,
		line: usize,
		line_column: usize,
	) -> Transition<'l> {
		match (std::mem::take(self), token.kind) {
			(Self::Idle, TagKind::Plain) => Transition::Literal(token.before),
			(Self::Idle, TagKind::Opened) => {
				*self = Self::AccumulatingTag(PendingTag {
					name: token.name.to_string(),
					column: token.column,
					leading: token.leading,
					break_before: token.break_before,
					line,
					line_column,
				});
				Transition::Opened {
					before: token.before,
				}
			}
			(Self::Idle, TagKind::Closed | TagKind::Concluded) => {
				Transition::Resolved {
					before: token.before,
					tag: ResolvedTag {
						name: token.name.trim().to_string(),
						column: token.column,
						leading: token.leading,
						break_before: token.break_before,
						line,
						line_column,
					},
					after: token.after,
				}
			}
			(Self::AccumulatingTag(mut pending), TagKind::Plain) => {
				pending.name.push_str(token.before);
				*self = Self::AccumulatingTag(pending);
				Transition::Accumulated
			}
			(Self::AccumulatingTag(mut pending), _) => {
				pending.name.push_str(token.name);
				Transition::Resolved {
					before: "",
					tag: ResolvedTag {
						name: pending.name.trim().to_string(),
						column: pending.column,
						leading: pending.leading,
						break_before: pending.break_before,
						line: pending.line,
						line_column: pending.line_column,
					},
					after: token.after,
				}
			}
		}
	}
}

/// A substitution performed during composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
	pub name: String,
	/// 1-indexed template line of the tag.
	pub line: usize,
	/// Number of fragment lines inserted.
	pub lines: usize,
}

/// A tag whose fragment could not be found and was replaced with nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingFragment {
	pub name: String,
	pub path: String,
	pub line: usize,
	pub column: usize,
}

/// The result of one composition run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Composition {
	/// The composed document.
	pub output: String,
	/// Every substitution, in document order.
	pub substitutions: Vec<Substitution>,
	/// Tags skipped because their fragment was missing.
	pub missing: Vec<MissingFragment>,
}

impl Composition {
	pub fn has_missing(&self) -> bool {
		!self.missing.is_empty()
	}
}

/// Composes a template with the fragments its tags name.
pub struct Composer<'c, R> {
	config: &'c StitchConfig,
	resolver: R,
	source: String,
}

impl<'c, R: FragmentResolver> Composer<'c, R> {
	pub fn new(config: &'c StitchConfig, resolver: R) -> Self {
		Self {
			config,
			resolver,
			source: config.template_html_file_name.clone(),
		}
	}

	/// Name of the template used in error messages.
	#[must_use]
	pub fn with_source(mut self, source: impl Into<String>) -> Self {
		self.source = source.into();
		self
	}

	fn scanner(&self) -> TagScanner<'c> {
		TagScanner::new(
			Delimiters {
				open: &self.config.open_comp_tag,
				close: &self.config.close_comp_tag,
			},
			self.config.indent_num_spaces,
		)
	}

	/// Compose the template `lines` into a single document.
	pub fn compose<S: AsRef<str>>(&self, lines: &[S]) -> StitchResult<Composition> {
		let scanner = self.scanner();
		let mut state = CompositionState::Idle;
		let mut out = OutputBuffer::new();
		let mut composition = Composition::default();

		for (index, line) in lines.iter().enumerate() {
			let line = line.as_ref();
			let line_number = index + 1;
			let mut leading = leading_whitespace(line);
			let mut cursor = 0;

			loop {
				let token = scanner
					.scan(line, cursor, state.is_accumulating())
					.map_err(|malformation| self.malformed(line, line_number, malformation))?;
				let next = token.end;
				let line_column = char_column(line, token.offset);

				match state.transition(token, line_number, line_column) {
					Transition::Literal(text) => {
						write_literal(&mut out, text, cursor, leading);
						out.end_line();
						break;
					}
					Transition::Accumulated => break,
					Transition::Opened { before } => {
						write_literal(&mut out, before, cursor, leading);
						break;
					}
					Transition::Resolved { before, tag, after } => {
						write_literal(&mut out, before, cursor, leading);
						let fragment = self.fragment_for(&tag, &mut composition)?;

						if tag.break_before && !out.at_line_start() {
							out.end_line();
						}

						for fragment_line in fragment.iter() {
							out.push_indented_line(tag.column, fragment_line);
						}

						// Nothing but whitespace left: the line ends with the
						// fragment's last terminator.
						if after.trim().is_empty() {
							break;
						}

						// Text after a tag that spanned lines lines up with
						// the line the tag opened on.
						leading = tag.leading;
						cursor = next;
					}
				}
			}
		}

		if let CompositionState::AccumulatingTag(pending) = state {
			return Err(StitchError::MalformedTag {
				file: self.source.clone(),
				line: pending.line,
				column: pending.line_column,
				reason: format!(
					"tag is never closed with `{}`",
					self.config.close_comp_tag
				),
			});
		}

		composition.output = out.into_string();
		Ok(composition)
	}

	/// Compose template text held in memory.
	pub fn compose_str(&self, template: &str) -> StitchResult<Composition> {
		self.compose(&split_lines(template))
	}

	fn fragment_for(
		&self,
		tag: &ResolvedTag,
		composition: &mut Composition,
	) -> StitchResult<Fragment> {
		if tag.name.is_empty() {
			return Err(StitchError::MalformedTag {
				file: self.source.clone(),
				line: tag.line,
				column: tag.line_column,
				reason: "tag has an empty name".to_string(),
			});
		}

		match self.resolver.resolve(&tag.name) {
			Ok(fragment) => {
				composition.substitutions.push(Substitution {
					name: tag.name.clone(),
					line: tag.line,
					lines: fragment.len(),
				});
				Ok(fragment)
			}
			Err(StitchError::FragmentNotFound { name, path })
				if self.config.missing_fragment == MissingFragmentPolicy::Skip =>
			{
				tracing::warn!(
					tag = %name,
					path = %path,
					line = tag.line,
					"component not found, substituting nothing"
				);
				composition.missing.push(MissingFragment {
					name: name.clone(),
					path,
					line: tag.line,
					column: tag.line_column,
				});
				Ok(Fragment::empty(name))
			}
			Err(error) => Err(error),
		}
	}

	fn malformed(&self, line: &str, line_number: usize, malformation: Malformation) -> StitchError {
		StitchError::MalformedTag {
			file: self.source.clone(),
			line: line_number,
			column: char_column(line, malformation.offset()),
			reason: malformation.to_string(),
		}
	}
}

/// Write literal template text.
///
/// Text that starts at the beginning of its line is written verbatim. Text
/// left over after a substitution is re-indented to the line's own
/// indentation; whitespace-only leftovers are dropped.
fn write_literal(out: &mut OutputBuffer, text: &str, window_start: usize, leading: usize) {
	if window_start == 0 {
		out.push_str(text);
		return;
	}

	let text = text.trim_start();
	if text.is_empty() {
		return;
	}

	if out.at_line_start() {
		out.push_str(&indent(leading));
	}
	out.push_str(text);
}

/// 1-indexed character column of byte `offset` in `line`.
fn char_column(line: &str, offset: usize) -> usize {
	line[..offset].chars().count() + 1
}

/// Compose `template` with the settings in `config`.
pub fn compose_str<R: FragmentResolver>(
	template: &str,
	config: &StitchConfig,
	resolver: R,
) -> StitchResult<Composition> {
	Composer::new(config, resolver).compose_str(template)
}
