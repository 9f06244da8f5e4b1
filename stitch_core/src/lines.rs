use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

/// Read a file into its lines with the terminators (`\n` or `\r\n`) removed.
///
/// The file handle is dropped before returning, on success and on error.
pub fn read_lines(path: &Path) -> std::io::Result<Vec<String>> {
	let file = File::open(path)?;
	BufReader::new(file).lines().collect()
}

/// Split in-memory text the same way [`read_lines`] splits a file.
pub fn split_lines(text: &str) -> Vec<String> {
	text.lines().map(ToString::to_string).collect()
}

/// A string of `width` spaces.
pub fn indent(width: usize) -> String {
	" ".repeat(width)
}

/// Number of leading whitespace characters in `line`.
pub fn leading_whitespace(line: &str) -> usize {
	line.chars().take_while(|ch| ch.is_whitespace()).count()
}
