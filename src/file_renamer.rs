use crate::errors::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Computes the path an entry moves to when its name contains `search`.
///
/// Only the last path segment is rewritten; the entry stays in its parent.
/// Returns `None` when the name has no occurrence, or when it is not valid
/// UTF-8 and therefore cannot contain a `str` token reliably.
pub fn renamed_path(path: &Path, search: &str, replace: &str) -> Option<PathBuf> {
    let file_name = path.file_name()?;
    let Some(name) = file_name.to_str() else {
        debug!("Leaving non UTF-8 name untouched: {}", path.display());
        return None;
    };
    if !name.contains(search) {
        return None;
    }
    Some(path.with_file_name(name.replace(search, replace)))
}

/// Renames a file or directory if its name contains the search token.
///
/// # Returns
///
/// Returns `Ok(Some(new_path))` if the entry was renamed, and `Ok(None)` if
/// its name did not match. A failed move is an `Error::Rename`, and so is a
/// target that already exists: it is never replaced.
pub fn rename_if_match(path: &Path, search: &str, replace: &str) -> Result<Option<PathBuf>> {
    let Some(new_path) = renamed_path(path, search, replace) else {
        return Ok(None);
    };
    if fs::symlink_metadata(&new_path).is_ok() {
        return Err(Error::Rename {
            from: path.to_path_buf(),
            to: new_path,
            source: io::Error::from(io::ErrorKind::AlreadyExists),
        });
    }
    fs::rename(path, &new_path).map_err(|source| Error::Rename {
        from: path.to_path_buf(),
        to: new_path.clone(),
        source,
    })?;
    Ok(Some(new_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_renamed_path_rewrites_every_occurrence_in_name_only() {
        let path = Path::new("/Foo/FooFoo.cs");
        assert_eq!(
            renamed_path(path, "Foo", "Bar"),
            Some(PathBuf::from("/Foo/BarBar.cs"))
        );
        assert_eq!(renamed_path(Path::new("/Foo/other.cs"), "Foo", "Bar"), None);
    }

    #[test]
    fn test_renamed_path_is_case_sensitive() {
        assert_eq!(renamed_path(Path::new("foo.cs"), "Foo", "Bar"), None);
    }

    #[test]
    fn test_rename_if_match_moves_within_parent() {
        let temp_dir = TempDir::new().unwrap();
        let original = temp_dir.path().join("OldName.cs");
        fs::write(&original, "x").unwrap();

        let new_path = rename_if_match(&original, "Old", "New").unwrap();
        assert_eq!(new_path, Some(temp_dir.path().join("NewName.cs")));
        assert!(!original.exists());
        assert!(temp_dir.path().join("NewName.cs").exists());

        let untouched = rename_if_match(&temp_dir.path().join("NewName.cs"), "Old", "New").unwrap();
        assert_eq!(untouched, None);
    }

    #[test]
    fn test_existing_target_is_not_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let original = temp_dir.path().join("OldName.cs");
        let taken = temp_dir.path().join("NewName.cs");
        fs::write(&original, "old").unwrap();
        fs::write(&taken, "precious").unwrap();

        let result = rename_if_match(&original, "Old", "New");
        assert!(matches!(
            result,
            Err(Error::Rename { ref source, .. }) if source.kind() == io::ErrorKind::AlreadyExists
        ));
        assert_eq!(fs::read_to_string(&original).unwrap(), "old");
        assert_eq!(fs::read_to_string(&taken).unwrap(), "precious");
    }

    #[test]
    fn test_rename_failure_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("OldGone.cs");
        let result = rename_if_match(&missing, "Old", "New");
        assert!(matches!(result, Err(Error::Rename { .. })));
    }
}
