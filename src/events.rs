use crate::errors::{Error, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// How a listener should treat an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Skip,
    Error,
}

/// One line of progress emitted by a run, in the order the work happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// The root exists and the traversal is about to start.
    Started {
        #[serde(serialize_with = "lossy_path")]
        root: PathBuf,
        search: String,
        replace: String,
    },
    /// The root is missing or not a directory. Nothing else follows.
    InvalidRoot {
        #[serde(serialize_with = "lossy_path")]
        root: PathBuf,
    },
    /// An excluded folder was left alone.
    SkippedFolder {
        #[serde(serialize_with = "lossy_path")]
        path: PathBuf,
    },
    /// A file's content had every occurrence replaced.
    ContentRewritten {
        #[serde(serialize_with = "lossy_path")]
        path: PathBuf,
        replacements: usize,
    },
    /// A file or directory was moved to its rewritten name.
    Renamed {
        #[serde(serialize_with = "lossy_path")]
        from: PathBuf,
        #[serde(serialize_with = "lossy_path")]
        to: PathBuf,
    },
    /// A file's content could not be read or written; the run continues.
    ContentFailed {
        #[serde(serialize_with = "lossy_path")]
        path: PathBuf,
        message: String,
    },
    /// A failure that ends the run.
    Error { message: String },
}

/// Paths are written as text even when they are not valid UTF-8.
fn lossy_path<S: Serializer>(path: &Path, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

impl ProgressEvent {
    pub fn level(&self) -> Level {
        match self {
            ProgressEvent::Started { .. }
            | ProgressEvent::ContentRewritten { .. }
            | ProgressEvent::Renamed { .. } => Level::Info,
            ProgressEvent::SkippedFolder { .. } => Level::Skip,
            ProgressEvent::InvalidRoot { .. }
            | ProgressEvent::ContentFailed { .. }
            | ProgressEvent::Error { .. } => Level::Error,
        }
    }

    /// The serialized tag of this event.
    pub fn kind(&self) -> &'static str {
        match self {
            ProgressEvent::Started { .. } => "started",
            ProgressEvent::InvalidRoot { .. } => "invalid_root",
            ProgressEvent::SkippedFolder { .. } => "skipped_folder",
            ProgressEvent::ContentRewritten { .. } => "content_rewritten",
            ProgressEvent::Renamed { .. } => "renamed",
            ProgressEvent::ContentFailed { .. } => "content_failed",
            ProgressEvent::Error { .. } => "error",
        }
    }

    /// Returns `true` for events that record a change on disk.
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            ProgressEvent::ContentRewritten { .. } | ProgressEvent::Renamed { .. }
        )
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Started {
                root,
                search,
                replace,
            } => write!(
                f,
                concat!(
                    "Renaming all files and directories containing '{}' ",
                    "to have '{}' instead in path '{}'"
                ),
                search,
                replace,
                root.display()
            ),
            ProgressEvent::InvalidRoot { .. } => write!(
                f,
                "ERROR: Path does not exist. Please select a valid path and try again"
            ),
            ProgressEvent::SkippedFolder { path } => {
                write!(f, "Skipping folder: {}", path.display())
            }
            ProgressEvent::ContentRewritten { path, replacements } => {
                write!(f, "Rewrote {} ({replacements} replacements)", path.display())
            }
            ProgressEvent::Renamed { from, to } => {
                write!(f, "Renamed {} -> {}", from.display(), to.display())
            }
            ProgressEvent::ContentFailed { path, message } => {
                write!(f, "Skipping file {}: {message}", path.display())
            }
            ProgressEvent::Error { message } => f.write_str(message),
        }
    }
}

/// The receiving end of a run's progress events.
///
/// An error returned from `report` aborts the traversal, which is how a
/// listener that went away stops the worker.
pub trait Reporter {
    fn report(&mut self, event: ProgressEvent) -> Result<()>;
}

impl Reporter for Vec<ProgressEvent> {
    fn report(&mut self, event: ProgressEvent) -> Result<()> {
        self.push(event);
        Ok(())
    }
}

impl Reporter for Sender<ProgressEvent> {
    fn report(&mut self, event: ProgressEvent) -> Result<()> {
        self.send(event).map_err(|_| Error::Disconnected)
    }
}
