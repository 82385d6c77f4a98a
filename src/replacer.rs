use crate::errors::{Error, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Replaces every literal occurrence of `search` in a text file.
///
/// The file is read as UTF-8. If the token occurs, the new content is
/// written back atomically, keeping the original permissions.
///
/// # Returns
///
/// The number of occurrences replaced; `0` means the file was not written.
/// Any read or write failure is an `Error::Content` for this path.
pub fn replace_in_file(path: &Path, search: &str, replace: &str) -> Result<usize> {
    let content_error = |source| Error::Content {
        path: path.to_path_buf(),
        source,
    };

    let content = fs::read_to_string(path).map_err(content_error)?;
    let occurrences = content.matches(search).count();
    if occurrences == 0 {
        return Ok(0);
    }

    let new_content = content.replace(search, replace);
    write_atomic(path, &new_content).map_err(content_error)?;
    Ok(occurrences)
}

/// Writes `content` to a temp file next to `path` and moves it over `path`.
fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Could not get parent directory for {}", path.display()),
        )
    })?;

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_bytes())?;

    // Preserve file permissions
    let perms = fs::metadata(path)?.permissions();
    fs::set_permissions(temp_file.path(), perms)?;

    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
