//! `srr` is a library for search, replace and rename across a directory tree.
//!
//! It provides the core logic for the `srr` command-line tool but can also be
//! used as a standalone library. The main components are:
//!
//! - `TreeRewriter`: the depth-first traversal that rewrites file content and
//!   renames files and directories, reporting each step as a `ProgressEvent`.
//! - `runner`: runs a traversal on a worker thread and streams its events
//!   over a channel.
//! - `config`: the request of a run and the fixed exclusion and allow-lists.
//! - `output_formatter`: renders the event stream as text, JSON or CSV.
//!
//! The traversal is strictly sequential: a rename can change the paths that
//! later steps depend on, so nothing runs in parallel.

pub mod cli;
pub mod config;
pub mod errors;
pub mod events;
pub mod file_renamer;
pub mod logging;
pub mod output_formatter;
pub mod replacer;
pub mod rewriter;
pub mod runner;

// Re-export main types for easier access by library users.
pub use config::{RewriteRequest, RewriteRules};
pub use errors::{Error, Result};
pub use events::{ProgressEvent, Reporter};
pub use output_formatter::{EventWriter, OutputFormat};
pub use rewriter::{RewriteSummary, TreeRewriter};
pub use runner::RewriteRun;
