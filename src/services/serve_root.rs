//! Serve root selection and request path resolution.
//!
//! The server always works relative to a single directory: the process
//! changes into it before binding, and every request path is mapped onto it.

use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::errors::AppError;

/// Directory containing the running executable.
pub fn default_root() -> Result<PathBuf, AppError> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| AppError::Config(format!("{} has no parent directory", exe.display())))
}

/// Canonicalize `root`, make it the working directory and return the canonical path.
pub fn enter(root: &Path) -> Result<PathBuf, AppError> {
    let root = root.canonicalize()?;
    if !root.is_dir() {
        return Err(AppError::Config(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    std::env::set_current_dir(&root)?;
    tracing::debug!(root = %root.display(), "Changed working directory");
    Ok(root)
}

/// Percent-decode a URL path.
pub fn decode(path: &str) -> Result<String, AppError> {
    percent_decode_str(path)
        .decode_utf8()
        .map(|p| p.into_owned())
        .map_err(|_| AppError::BadRequest("Path is not valid UTF-8".to_string()))
}

/// Map a decoded URL path onto the filesystem under `root`.
///
/// Returns `None` for paths that would leave the root.
pub fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut resolved = root.to_path_buf();
    for component in Path::new(request_path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}
