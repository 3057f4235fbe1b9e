//! Local persistence of fetched bytes and the naming rules that keep every
//! write inside its destination directory.

use reqwest::Url;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{Error, Result};

/// Linux `NAME_MAX`
const NAME_MAX: usize = 255;

/// Write `bytes` to `path`, truncating any existing file
///
/// The file handle is dropped on every exit path. A failure partway through
/// leaves whatever was already written on disk.
pub async fn persist(bytes: &[u8], path: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| write_error(path, &e))?;

    file.write_all(bytes)
        .await
        .map_err(|e| write_error(path, &e))?;
    file.flush().await.map_err(|e| write_error(path, &e))?;

    debug!("Persisted {} bytes to {}", bytes.len(), path.display());
    Ok(bytes.len() as u64)
}

/// Create `dir` and its parents if missing
pub async fn ensure_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| write_error(dir, &e))
}

/// Accept `name` only if it is a single plain path component
pub fn safe_file_name(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(Error::Validation("file name is required".into()));
    }
    if name == "." || name == ".." {
        return Err(Error::Validation(format!("invalid file name: {name}")));
    }
    if name
        .chars()
        .any(|c| c == '/' || c == '\\' || c == '\0' || c.is_control())
    {
        return Err(Error::Validation(format!(
            "file name must not contain path separators or control characters: {name:?}"
        )));
    }
    if name.len() > NAME_MAX {
        return Err(Error::Validation(format!(
            "file name longer than {NAME_MAX} bytes"
        )));
    }
    Ok(name)
}

/// Derive a file name from the final path segment of `url`
///
/// Query string and fragment are ignored. The segment is percent-decoded before
/// validation, so an encoded `%2F` is still rejected.
pub fn file_name_from_url(url: &str) -> Result<String> {
    let parsed =
        Url::parse(url).map_err(|e| Error::Validation(format!("invalid URL {url:?}: {e}")))?;

    let segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::Validation(format!("cannot derive a file name from {url}")))?;

    let decoded = urlencoding::decode(segment)
        .map_err(|e| Error::Validation(format!("invalid file name in {url}: {e}")))?;

    safe_file_name(&decoded).map(str::to_owned)
}

/// Join a validated `name` onto `dir`
pub fn resolve_in(dir: &Path, name: &str) -> Result<PathBuf> {
    Ok(dir.join(safe_file_name(name)?))
}

fn write_error(path: &Path, e: &std::io::Error) -> Error {
    Error::Write(format!("{}: {e}", path.display()))
}
