//! The main entry point for the `srr` command-line application.
//!
//! It parses the arguments, starts the rewrite on a worker thread and prints
//! its progress as it arrives.

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use srr::cli::{self, Args};
use srr::{runner, EventWriter, OutputFormat, ProgressEvent, RewriteRequest, TreeRewriter};
use std::io;
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    let args = cli::parse_args();
    srr::logging::init(args.verbose);

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Runs one rewrite and reports whether it completed without error.
fn run(args: Args) -> anyhow::Result<bool> {
    let format = OutputFormat::from(args.format.as_str());
    let request = RewriteRequest::new(&args.dir, args.search, args.replace)?;

    let stdout = io::stdout();
    let mut writer = EventWriter::new(stdout.lock(), format, args.verbose)
        .context("failed to write to stdout")?;

    let spinner = if format == OutputFormat::Text && !args.no_progress {
        progress_spinner()
    } else {
        ProgressBar::hidden()
    };

    let rewrite = runner::spawn(TreeRewriter::default(), request)
        .context("failed to start the rewrite worker")?;

    // A failed write stops the display, not the run: the worker is still
    // joined and the completion record still attempted.
    let mut seen = 0usize;
    let (outcome, write_error) = rewrite.drain(|event| {
        seen += 1;
        if let Some(path) = event_path(event) {
            spinner.set_message(format!("{seen} events | {path}"));
        }
        spinner.suspend(|| writer.write_event(event))
    });
    spinner.finish_and_clear();

    let completion = writer.write_completion(&outcome);
    if let Some(e) = write_error {
        return Err(e).context("failed to write progress");
    }
    completion.context("failed to write completion")?;
    Ok(outcome.is_ok())
}

fn progress_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let template = "{spinner} [{elapsed}] {wide_msg}";
    if let Ok(style) = ProgressStyle::default_spinner().template(template) {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// The path an event is about, for the spinner message.
fn event_path(event: &ProgressEvent) -> Option<String> {
    let path = match event {
        ProgressEvent::ContentRewritten { path, .. }
        | ProgressEvent::ContentFailed { path, .. }
        | ProgressEvent::SkippedFolder { path } => path,
        ProgressEvent::Renamed { to, .. } => to,
        _ => return None,
    };
    Some(path.display().to_string())
}
