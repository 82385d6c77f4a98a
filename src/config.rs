use crate::errors::{Error, Result};
use std::path::{Path, PathBuf};

/// Directory names that are never descended into or renamed.
pub const EXCLUDED_FOLDERS: &[&str] = &["bin", ".vs", ".git", "Logs"];

/// File name suffixes whose content and names are rewritten.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".cs", ".cshtml", ".csproj", ".csproj.user", ".sln"];

/// The exclusion and allow-lists a traversal runs with.
///
/// Both lists are matched case-insensitively, so they are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRules {
    excluded_folders: Vec<String>,
    allowed_extensions: Vec<String>,
}

impl Default for RewriteRules {
    fn default() -> Self {
        Self::new(EXCLUDED_FOLDERS, ALLOWED_EXTENSIONS)
    }
}

impl RewriteRules {
    /// Creates a rule set from folder names and file name suffixes.
    pub fn new<F, E>(excluded_folders: F, allowed_extensions: E) -> Self
    where
        F: IntoIterator,
        F::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            excluded_folders: excluded_folders
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Returns `true` if the last segment of `dir` names an excluded folder.
    ///
    /// Paths without a final name segment (`.`, `/`) are never excluded.
    pub fn is_excluded(&self, dir: &Path) -> bool {
        dir.file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .is_some_and(|name| self.excluded_folders.iter().any(|ex| *ex == name))
    }

    /// Returns `true` if the file name of `file` ends with an allowed suffix.
    pub fn is_allowed(&self, file: &Path) -> bool {
        file.file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .is_some_and(|name| {
                self.allowed_extensions
                    .iter()
                    .any(|ext| name.ends_with(ext.as_str()))
            })
    }
}

/// The three inputs of a run: where to work, what to find, what to put instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRequest {
    root: PathBuf,
    search: String,
    replace: String,
}

impl RewriteRequest {
    /// Builds a request, rejecting an empty search token.
    ///
    /// The root is not checked here; a missing root is reported by the run
    /// itself so that the listener sees it as part of the event stream.
    /// An empty `replace` deletes every occurrence of `search`.
    pub fn new(
        root: impl Into<PathBuf>,
        search: impl Into<String>,
        replace: impl Into<String>,
    ) -> Result<Self> {
        let search = search.into();
        if search.is_empty() {
            return Err(Error::EmptySearchToken);
        }
        Ok(Self {
            root: root.into(),
            search,
            replace: replace.into(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn replace(&self) -> &str {
        &self.replace
    }
}
