//! The traversal engine: a depth-first walk that rewrites file content and
//! renames files and directories containing the search token.

use crate::config::{RewriteRequest, RewriteRules};
use crate::errors::{Error, Result};
use crate::events::{ProgressEvent, Reporter};
use crate::file_renamer::rename_if_match;
use crate::replacer::replace_in_file;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Counters collected over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteSummary {
    /// Allow-listed files whose content was examined.
    pub files_scanned: usize,
    /// Files whose content was written back.
    pub files_rewritten: usize,
    /// Total occurrences replaced across all file contents.
    pub replacements: usize,
    /// Files and directories moved to a new name.
    pub paths_renamed: usize,
    /// Excluded folders encountered.
    pub folders_skipped: usize,
    /// Files whose content could not be read or written.
    pub content_failures: usize,
}

/// Rewrites a directory tree in place according to a set of rules.
///
/// A `TreeRewriter` holds no per-run state; every call to [`rewrite`]
/// walks the tree from scratch.
///
/// [`rewrite`]: TreeRewriter::rewrite
#[derive(Debug, Clone, Default)]
pub struct TreeRewriter {
    rules: RewriteRules,
}

impl TreeRewriter {
    pub fn new(rules: RewriteRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RewriteRules {
        &self.rules
    }

    /// Runs one traversal, reporting every step to `reporter`.
    ///
    /// The process is as follows:
    /// 1. A root that is missing or not a directory is reported once and
    ///    the run ends with `Error::InvalidRoot` without touching anything.
    /// 2. In each non-excluded directory, allow-listed files have their
    ///    content rewritten and are then renamed.
    /// 3. Each subdirectory is processed recursively under its current
    ///    name and only afterwards renamed itself.
    ///
    /// Content failures are reported and skipped. A failed rename is
    /// reported and aborts the whole run.
    pub fn rewrite<R: Reporter + ?Sized>(
        &self,
        request: &RewriteRequest,
        reporter: &mut R,
    ) -> Result<RewriteSummary> {
        let root = request.root();
        if !root.is_dir() {
            warn!("Root is not a directory: {}", root.display());
            reporter.report(ProgressEvent::InvalidRoot {
                root: root.to_path_buf(),
            })?;
            return Err(Error::InvalidRoot(root.to_path_buf()));
        }

        reporter.report(ProgressEvent::Started {
            root: root.to_path_buf(),
            search: request.search().to_string(),
            replace: request.replace().to_string(),
        })?;
        info!(
            "Rewriting '{}' -> '{}' under {}",
            request.search(),
            request.replace(),
            root.display()
        );

        let mut pass = Pass {
            rules: &self.rules,
            search: request.search(),
            replace: request.replace(),
            reporter,
            summary: RewriteSummary::default(),
        };
        pass.visit_directory(root)?;

        info!(
            "Rewrite complete: {} files scanned, {} rewritten, {} paths renamed",
            pass.summary.files_scanned, pass.summary.files_rewritten, pass.summary.paths_renamed
        );
        Ok(pass.summary)
    }
}

/// The mutable state of a single traversal.
struct Pass<'a, R: ?Sized> {
    rules: &'a RewriteRules,
    search: &'a str,
    replace: &'a str,
    reporter: &'a mut R,
    summary: RewriteSummary,
}

impl<R: Reporter + ?Sized> Pass<'_, R> {
    /// Processes `dir` and everything below it.
    ///
    /// Returns `Ok(false)` when the directory is excluded, in which case the
    /// caller must not rename it either.
    fn visit_directory(&mut self, dir: &Path) -> Result<bool> {
        if self.rules.is_excluded(dir) {
            debug!("Skipping excluded folder {}", dir.display());
            self.summary.folders_skipped += 1;
            self.reporter.report(ProgressEvent::SkippedFolder {
                path: dir.to_path_buf(),
            })?;
            return Ok(false);
        }

        debug!("Processing directory {}", dir.display());
        let children = match Children::list(dir) {
            Ok(children) => children,
            Err(e) => return Err(self.fatal(e)?),
        };

        let rules = self.rules;
        for file in children.files.iter().filter(|f| rules.is_allowed(f)) {
            self.visit_file(file)?;
        }

        // Links are renamed as entries of this directory but never followed.
        for link in children.links.iter().filter(|l| rules.is_allowed(l) || l.is_dir()) {
            self.rename_entry(link)?;
        }

        for sub in &children.dirs {
            if self.visit_directory(sub)? {
                self.rename_entry(sub)?;
            }
        }

        Ok(true)
    }

    /// Rewrites a file's content, then its name.
    fn visit_file(&mut self, file: &Path) -> Result<()> {
        self.summary.files_scanned += 1;

        match replace_in_file(file, self.search, self.replace) {
            Ok(0) => {}
            Ok(replacements) => {
                self.summary.files_rewritten += 1;
                self.summary.replacements += replacements;
                self.reporter.report(ProgressEvent::ContentRewritten {
                    path: file.to_path_buf(),
                    replacements,
                })?;
            }
            Err(e) => {
                warn!("{e}");
                self.summary.content_failures += 1;
                let message = match e {
                    Error::Content { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                self.reporter.report(ProgressEvent::ContentFailed {
                    path: file.to_path_buf(),
                    message,
                })?;
            }
        }

        self.rename_entry(file)
    }

    fn rename_entry(&mut self, path: &Path) -> Result<()> {
        match rename_if_match(path, self.search, self.replace) {
            Ok(Some(new_path)) => {
                debug!("Renamed {} -> {}", path.display(), new_path.display());
                self.summary.paths_renamed += 1;
                self.reporter.report(ProgressEvent::Renamed {
                    from: path.to_path_buf(),
                    to: new_path,
                })
            }
            Ok(None) => Ok(()),
            Err(e) => Err(self.fatal(e)?),
        }
    }

    /// Reports an error that ends the run and hands it back for propagation.
    ///
    /// If the listener is gone as well, that disconnect is what propagates.
    fn fatal(&mut self, e: Error) -> Result<Error> {
        error!("{e}");
        self.reporter.report(ProgressEvent::Error {
            message: e.to_string(),
        })?;
        Ok(e)
    }
}

/// A snapshot of the immediate children of a directory, in file name order.
#[derive(Default)]
struct Children {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
    links: Vec<PathBuf>,
}

impl Children {
    /// Lists `dir` one level deep.
    ///
    /// Symlinks are not followed; they are collected separately.
    fn list(dir: &Path) -> Result<Self> {
        let mut children = Self::default();
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry?;
            let file_type = entry.file_type();
            if file_type.is_dir() {
                children.dirs.push(entry.into_path());
            } else if file_type.is_file() {
                children.files.push(entry.into_path());
            } else if file_type.is_symlink() {
                children.links.push(entry.into_path());
            } else {
                debug!("Ignoring non-regular entry {}", entry.path().display());
            }
        }

        Ok(children)
    }
}
