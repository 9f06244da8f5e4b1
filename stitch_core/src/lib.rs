//! `stitch_core` is the core library for the stitch page builder. It composes
//! an html document from a root template and a folder of components,
//! replacing every `{{name}}` tag with the lines of `components/name.html`
//! while keeping the template's indentation.
//!
//! ## Processing Pipeline
//!
//! ```text
//! source folder
//!   → Asset pipeline (mirror assets/, bundle styles/*.css into style.css)
//!   → Line reader (template.html → lines)
//!   → Tag scanner (finds open/close delimiters, computes indentation)
//!   → Composition engine (Idle / AccumulatingTag state machine)
//!   → Fragment resolver (tag name → component lines)
//!   → Output buffer (written once to index.html)
//! ```
//!
//! ## Indentation
//!
//! A tag that starts its line is *standalone*: the component is inserted at
//! the line's indentation and the tag's line disappears. Any other tag is
//! *inline*: the text before it is kept, the component goes on the following
//! lines indented one step deeper, and the text after it continues on a new
//! line.
//!
//! ```text
//! template.html          components/footer.html     index.html
//! <div>{{footer}}</div>  <span>f</span>             <div>
//!                                                     <span>f</span>
//!                                                   </div>
//! ```
//!
//! Substitution is one level deep: component content is never scanned for
//! tags.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `stitch.toml`.
//! - [`scanner`]: The tag scanner.
//! - [`resolver`]: Fragment resolvers (file system, memory, caching).
//! - [`assets`]: Asset mirroring and style bundling.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use stitch_core::StitchConfig;
//! use stitch_core::build_page;
//!
//! let src = Path::new("site");
//! let config = StitchConfig::load_or_default(src).unwrap();
//! let report = build_page(src, &config.default_dist_root(src), &config).unwrap();
//! for missing in &report.missing {
//! 	eprintln!("no component for `{}`", missing.name);
//! }
//! ```

pub use build::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use resolver::*;

pub mod assets;
mod build;
pub mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
pub mod lines;
pub mod output;
pub mod resolver;
pub mod scanner;

#[cfg(test)]
mod __fixtures;
