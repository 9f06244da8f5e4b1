use std::fmt::Display;

use crate::lines::leading_whitespace;

/// The pair of strings that open and close a tag, e.g. `{{` and `}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters<'a> {
	pub open: &'a str,
	pub close: &'a str,
}

impl Default for Delimiters<'static> {
	fn default() -> Self {
		Self {
			open: "{{",
			close: "}}",
		}
	}
}

/// Which of the scanner cases a [`TagToken`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
	/// No tag delimiter in the window.
	Plain,
	/// An open delimiter without a close delimiter. The tag continues on the
	/// next line.
	Opened,
	/// An open and a close delimiter in the same window.
	Closed,
	/// The close delimiter of a tag that was opened on an earlier line.
	Concluded,
}

/// The result of one scan over a window of a line.
///
/// `before`, `name` and `after` borrow from the scanned line. `column`,
/// `leading` and `break_before` are only meaningful for [`TagKind::Opened`]
/// and [`TagKind::Closed`]; a concluded tag reuses what was recorded when it
/// was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken<'l> {
	pub kind: TagKind,
	/// Literal text preceding the tag. Empty for standalone tags.
	pub before: &'l str,
	/// Raw (untrimmed) tag text, possibly only part of the full name.
	pub name: &'l str,
	/// Text following the close delimiter.
	pub after: &'l str,
	/// Indentation for the inserted fragment lines.
	pub column: usize,
	/// Leading whitespace width of the line the tag opened on.
	pub leading: usize,
	/// Whether the tag was closed within this window.
	pub closed: bool,
	/// Whether a line break goes before the inserted fragment lines.
	pub break_before: bool,
	/// Byte offset in the line of the delimiter that defined this token.
	pub offset: usize,
	/// Byte offset in the line where `after` starts.
	pub end: usize,
}

impl<'l> TagToken<'l> {
	fn plain(line: &'l str, start: usize) -> Self {
		Self {
			kind: TagKind::Plain,
			before: &line[start..],
			name: "",
			after: "",
			column: 0,
			leading: 0,
			closed: true,
			break_before: false,
			offset: start,
			end: line.len(),
		}
	}
}

/// Why a window could not be scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformation {
	/// A close delimiter with no open delimiter before it.
	StrayClose { offset: usize },
	/// An open delimiter while another tag is still open.
	NestedOpen { offset: usize },
}

impl Malformation {
	/// Byte offset in the line of the offending delimiter.
	pub fn offset(&self) -> usize {
		match self {
			Self::StrayClose { offset } | Self::NestedOpen { offset } => *offset,
		}
	}
}

impl Display for Malformation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::StrayClose { .. } => write!(f, "close delimiter without a matching open delimiter"),
			Self::NestedOpen { .. } => write!(f, "open delimiter inside a tag that is not closed yet"),
		}
	}
}

/// Finds tags in template lines.
#[derive(Debug, Clone, Copy)]
pub struct TagScanner<'a> {
	delimiters: Delimiters<'a>,
	indent_step: usize,
}

impl<'a> TagScanner<'a> {
	pub fn new(delimiters: Delimiters<'a>, indent_step: usize) -> Self {
		Self {
			delimiters,
			indent_step,
		}
	}

	/// Scan `line` from byte offset `start`.
	///
	/// With `continuing` set the scanner looks for the close delimiter of a
	/// tag opened on an earlier line; otherwise it looks for the next tag.
	/// Indentation is always computed against the whole `line`, never just the
	/// window, so every tag on a physical line is classified the same way.
	pub fn scan<'l>(
		&self,
		line: &'l str,
		start: usize,
		continuing: bool,
	) -> Result<TagToken<'l>, Malformation> {
		if continuing {
			self.scan_continuation(line, start)
		} else {
			self.scan_tag(line, start)
		}
	}

	fn scan_tag<'l>(&self, line: &'l str, start: usize) -> Result<TagToken<'l>, Malformation> {
		let Delimiters { open, close } = self.delimiters;
		let open_at = find_at(line, start, open);
		let close_at = find_at(line, start, close);

		let open_at = match (open_at, close_at) {
			(None, None) => return Ok(TagToken::plain(line, start)),
			(None, Some(offset)) => return Err(Malformation::StrayClose { offset }),
			(Some(open_at), Some(close_at)) if close_at < open_at => {
				return Err(Malformation::StrayClose { offset: close_at });
			}
			(Some(open_at), _) => open_at,
		};

		let name_start = open_at + open.len();
		let standalone = open_at == line.len() - line.trim_start().len();
		let leading = leading_whitespace(line);
		let (before, column, break_before) = if standalone {
			("", leading, false)
		} else {
			(&line[start..open_at], leading + self.indent_step, true)
		};

		let close_at = find_at(line, name_start, close);
		// The name runs to the close delimiter, or to the end of the line.
		let nested_at = find_at(line, name_start, open)
			.filter(|&nested_at| close_at.is_none_or(|close_at| nested_at < close_at));
		if let Some(offset) = nested_at {
			return Err(Malformation::NestedOpen { offset });
		}

		let token = match close_at {
			Some(close_at) => {
				let end = close_at + close.len();
				TagToken {
					kind: TagKind::Closed,
					before,
					name: &line[name_start..close_at],
					after: &line[end..],
					column,
					leading,
					closed: true,
					break_before,
					offset: open_at,
					end,
				}
			}
			None => {
				TagToken {
					kind: TagKind::Opened,
					before,
					name: &line[name_start..],
					after: "",
					column,
					leading,
					closed: false,
					break_before,
					offset: open_at,
					end: line.len(),
				}
			}
		};

		Ok(token)
	}

	fn scan_continuation<'l>(
		&self,
		line: &'l str,
		start: usize,
	) -> Result<TagToken<'l>, Malformation> {
		let Delimiters { open, close } = self.delimiters;
		let open_at = find_at(line, start, open);
		let close_at = find_at(line, start, close);

		match (open_at, close_at) {
			(Some(offset), None) => Err(Malformation::NestedOpen { offset }),
			(Some(open_at), Some(close_at)) if open_at < close_at => {
				Err(Malformation::NestedOpen { offset: open_at })
			}
			(None, None) => Ok(TagToken::plain(line, start)),
			(_, Some(close_at)) => {
				let end = close_at + close.len();
				Ok(TagToken {
					kind: TagKind::Concluded,
					before: "",
					name: &line[start..close_at],
					after: &line[end..],
					column: 0,
					leading: 0,
					closed: true,
					break_before: false,
					offset: close_at,
					end,
				})
			}
		}
	}
}

/// Byte offset of the first `needle` in `haystack` at or after `start`.
fn find_at(haystack: &str, start: usize, needle: &str) -> Option<usize> {
	haystack[start..].find(needle).map(|index| start + index)
}
