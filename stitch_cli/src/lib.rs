use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Assemble a static page from an html template and a folder of components.",
	long_about = "stitch replaces every `{{name}}` tag in `template.html` with the contents of \
	              `components/name.html`, keeping the template's indentation, then copies the \
	              asset folder and bundles the style sheets next to the composed \
	              page.\n\nQuick start:\n  stitch init   Create a sample template and \
	              components\n  stitch build  Write the page to project-dist/\n  stitch check  \
	              Verify the built page is up to date"
)]
pub struct StitchCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the source folder holding the template.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output and debug logging.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample template, components and config in the source folder.
	///
	/// Existing files are left untouched, so running this twice is harmless.
	Init,
	/// Build the page into the destination folder.
	///
	/// Mirrors the asset folder, bundles the style sheets and then writes the
	/// composed template. The composed page is written in one step at the end,
	/// so a failed build never leaves a partial page behind.
	Build {
		/// Destination folder. Defaults to `dist_folder_name` inside the
		/// source folder.
		#[arg(long, short)]
		out: Option<PathBuf>,

		/// Print the composed page instead of writing anything.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Rebuild whenever a file in the source folder changes.
		#[arg(long, default_value_t = false)]
		watch: bool,

		/// Output format for the build summary.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Check that the built page matches the current template and components.
	///
	/// Composes the template in memory and compares it with the page in the
	/// destination folder. Exits with status 1 when the page is missing or
	/// out of date.
	Check {
		/// Destination folder. Defaults to `dist_folder_name` inside the
		/// source folder.
		#[arg(long, short)]
		out: Option<PathBuf>,

		/// Show a line diff between the built page and the expected page.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors.
	Text,
	/// JSON build report for programmatic consumption.
	Json,
}
