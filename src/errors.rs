use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in the `srr` application.
///
/// Only some of these end a run. Content failures are reported and the
/// traversal carries on; rename and listing failures abort it.
#[derive(Error, Debug)]
pub enum Error {
    /// An error related to file system I/O.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The root of a run is missing or is not a directory.
    #[error("Path does not exist or is not a directory: {}", .0.display())]
    InvalidRoot(PathBuf),

    /// A request was built with an empty search token.
    #[error("Search token must not be empty")]
    EmptySearchToken,

    /// Moving a file or directory to its rewritten name failed.
    #[error("Failed to rename {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    /// Reading or writing the text content of a single file failed.
    #[error("File processing failed for {}: {source}", path.display())]
    Content {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An error from the `walkdir` crate while listing a directory.
    #[error("Walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// An error related to CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An error related to JSON serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The listener stopped receiving progress events before the run ended.
    #[error("Progress listener disconnected")]
    Disconnected,

    /// The worker thread panicked instead of returning.
    #[error("Rewrite worker panicked")]
    WorkerPanicked,
}

/// A convenient type alias for `Result<T, srr::errors::Error>`.
pub type Result<T> = std::result::Result<T, Error>;
