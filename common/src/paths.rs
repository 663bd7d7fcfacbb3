//! Path utilities
//!
//! Paths handed to the distribution layer are recorded relative to the
//! working directory whenever that is possible, so a manifest reads the same
//! regardless of where the driver binary was launched from.

use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Lexically normalize a path: drop `.` components and fold `name/..` pairs.
///
/// This never touches the filesystem, so symlinks are not resolved. A `..`
/// directly under the root is dropped, a leading `..` on a relative path is
/// kept. An empty result becomes `.`.
pub fn normalize<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Express `path` relative to `base`.
///
/// Relative inputs are only normalized. An absolute `path` is rewritten
/// relative to `base` (which must itself be absolute), walking up with `..`
/// as needed. Returns `None` when the two share no root, e.g. they live on
/// different volumes, or when `base` is relative.
pub fn relativize<P: AsRef<Path>, B: AsRef<Path>>(path: P, base: B) -> Option<PathBuf> {
    let path = path.as_ref();
    if path.is_relative() {
        return Some(normalize(path));
    }

    let base = base.as_ref();
    if base.is_relative() {
        return None;
    }

    let path = normalize(path);
    let base = normalize(base);
    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return None;
    }

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    Some(relative)
}

/// Express `path` relative to the current working directory, falling back to
/// the path as given when that is not possible.
pub fn relativize_to_cwd<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            debug!("Cannot read working directory, keeping {:?}: {}", path, e);
            return path.to_path_buf();
        }
    };

    relativize(path, &cwd).unwrap_or_else(|| {
        debug!("Cannot relativize {:?} against {:?}, keeping it", path, cwd);
        path.to_path_buf()
    })
}
