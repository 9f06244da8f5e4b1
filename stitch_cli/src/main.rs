use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use notify::Watcher;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use stitch_cli::Commands;
use stitch_cli::OutputFormat;
use stitch_cli::StitchCli;
use stitch_core::MissingFragment;
use stitch_core::StitchConfig;
use stitch_core::build_page;
use stitch_core::check_page;
use stitch_core::render_page;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

const SAMPLE_TEMPLATE: &str = "<!DOCTYPE html>\n<html>\n  <head>\n    <link rel=\"stylesheet\" \
                               href=\"style.css\">\n  </head>\n  <body>\n    {{header}}\n    \
                               <main>{{content}}</main>\n  </body>\n</html>\n";

const SAMPLE_HEADER: &str = "<header>\n  <h1>Hello from stitch</h1>\n</header>\n";

const SAMPLE_CONTENT: &str = "<p>Edit components/content.html to change this text.</p>\n";

const SAMPLE_CONFIG: &str = "# stitch configuration. Every key is optional; the values below \
                             are the defaults.\n\n# open_comp_tag = \"{{\"\n# close_comp_tag = \
                             \"}}\"\n# indent_num_spaces = 2\n# component_folder_name = \
                             \"components\"\n# component_extension = \".html\"\n# \
                             template_html_file_name = \"template.html\"\n# dist_folder_name = \
                             \"project-dist\"\n# missing_fragment = \"skip\"\n\n# [assets]\n# \
                             exclude = [\"**/*.psd\"]\n";

fn main() {
	let args = StitchCli::parse();

	// Respect NO_COLOR env var, --no-color flag and terminals without color.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_logging(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Build {
			out,
			dry_run,
			watch,
			format,
		}) => run_build(&args, out.as_deref(), *dry_run, *watch, *format),
		Some(Commands::Check { out, diff }) => run_check(&args, out.as_deref(), *diff),
		None => {
			eprintln!("No subcommand specified. Run `stitch --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		print_error(e);
		process::exit(2);
	}
}

/// Log to stderr. `--verbose` wins over `STITCH_LOG`; the default only shows
/// warnings such as missing components.
fn init_logging(verbose: bool, use_color: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_env("STITCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

/// Render core errors through miette so their code and help text show up.
fn print_error(error: Box<dyn std::error::Error>) {
	match error.downcast::<stitch_core::StitchError>() {
		Ok(stitch_err) => {
			let report: miette::Report = (*stitch_err).into();
			eprintln!("{report:?}");
		}
		Err(e) => {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

fn resolve_root(args: &StitchCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn resolve_dist(root: &Path, out: Option<&Path>, config: &StitchConfig) -> PathBuf {
	out.map_or_else(|| config.default_dist_root(root), Path::to_path_buf)
}

fn run_init(args: &StitchCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	std::fs::create_dir_all(root.join("components"))?;

	let files = [
		("template.html", SAMPLE_TEMPLATE),
		("components/header.html", SAMPLE_HEADER),
		("components/content.html", SAMPLE_CONTENT),
		("stitch.toml", SAMPLE_CONFIG),
	];

	let mut created = 0;
	for (relative, content) in files {
		let path = root.join(relative);
		if path.exists() {
			println!("Already exists: {relative}");
			continue;
		}

		std::fs::write(&path, content)?;
		println!("Created {relative}");
		created += 1;
	}

	if created > 0 {
		println!();
		println!("Next steps:");
		println!("  1. Add components to components/ and reference them as {{{{name}}}}");
		println!("  2. Run `stitch build` to write project-dist/index.html");
	}

	Ok(())
}

fn run_build(
	args: &StitchCli,
	out: Option<&Path>,
	dry_run: bool,
	watch: bool,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	run_build_once(args, out, dry_run, format)?;

	if !watch || dry_run {
		return Ok(());
	}

	println!("\nWatching for file changes... (press Ctrl+C to stop)");

	let root = resolve_root(args);
	let config = StitchConfig::load_or_default(&root)?;
	let dist = resolve_dist(&root, out, &config);
	let dist = dist.canonicalize().unwrap_or(dist);
	let root = root.canonicalize()?;
	let (tx, rx) = mpsc::channel();

	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				// Writes into the destination must not trigger another build.
				let relevant = matches!(
					event.kind,
					notify::EventKind::Modify(_)
						| notify::EventKind::Create(_)
						| notify::EventKind::Remove(_)
				) && event.paths.iter().any(|path| !path.starts_with(&dist));
				if relevant {
					let _ = tx.send(());
				}
			}
		})?;

	watcher.watch(&root, notify::RecursiveMode::Recursive)?;

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		println!("\nFile change detected, rebuilding...");
		if let Err(e) = run_build_once(args, out, false, format) {
			print_error(e);
		}
	}
}

fn run_build_once(
	args: &StitchCli,
	out: Option<&Path>,
	dry_run: bool,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = StitchConfig::load_or_default(&root)?;

	if dry_run {
		let composition = render_page(&root, &config)?;
		match format {
			OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&composition)?),
			OutputFormat::Text => {
				print_missing(&composition.missing, &root);
				print!("{}", composition.output);
			}
		}
		return Ok(());
	}

	let dist = resolve_dist(&root, out, &config);
	let report = build_page(&root, &dist, &config)?;

	match format {
		OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
		OutputFormat::Text => {
			print_missing(&report.missing, &root);
			println!(
				"{} {} ({} substitution(s), {} asset file(s), {} style sheet(s)).",
				colored!("Built", green),
				make_relative(&report.layout.dist_html, &root),
				report.substitutions.len(),
				report.assets.copied.len(),
				report.styles.files.len(),
			);

			if args.verbose {
				for substitution in &report.substitutions {
					println!(
						"  line {}: {} ({} line(s))",
						substitution.line, substitution.name, substitution.lines
					);
				}
			}
		}
	}

	Ok(())
}

fn run_check(
	args: &StitchCli,
	out: Option<&Path>,
	show_diff: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = StitchConfig::load_or_default(&root)?;
	let dist = resolve_dist(&root, out, &config);
	let result = check_page(&root, &dist, &config)?;
	let rel = make_relative(&result.path, &root);

	print_missing(&result.expected.missing, &root);

	if result.is_ok() {
		println!("Check passed: {rel} is up to date.");
		return Ok(());
	}

	match &result.current {
		None => {
			eprintln!("{} {rel} has not been built yet.", colored!("Check failed:", red));
		}
		Some(current) => {
			eprintln!("{} {rel} is out of date.", colored!("Check failed:", red));
			if show_diff {
				eprintln!();
				print_diff(current, &result.expected.output);
			}
		}
	}

	eprintln!();
	eprintln!("Run `{}` to update it.", colored!("stitch build", bold));
	process::exit(1);
}

fn print_missing(missing: &[MissingFragment], root: &Path) {
	for entry in missing {
		eprintln!(
			"{} no component for tag `{}` at line {}:{} (looked for {})",
			colored!("warning:", yellow),
			entry.name,
			entry.line,
			entry.column,
			make_relative(Path::new(&entry.path), root),
		);
	}
}

/// Print a line diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
