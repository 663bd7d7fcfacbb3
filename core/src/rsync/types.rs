//! Wire types for the file distribution service
//!
//! These are the JSON shapes agents see when they ask a driver which files
//! to download.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A local file that must travel with a job, and the folder (relative to the
/// agent's working directory) it has to land in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResource {
    #[serde(rename = "path")]
    pub full_path: PathBuf,
    #[serde(rename = "targetFolder")]
    pub target_folder: String,
}

impl FileResource {
    pub fn new(full_path: impl Into<PathBuf>, target_folder: impl Into<String>) -> Self {
        Self {
            full_path: full_path.into(),
            target_folder: target_folder.into(),
        }
    }
}

/// A fingerprinted [`FileResource`].
///
/// `hash` is the CRC32 (IEEE) of the file content and is what agents use to
/// address the file; `file` is the base name they should save it under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHash {
    #[serde(rename = "path")]
    pub full_path: PathBuf,
    #[serde(rename = "targetFolder")]
    pub target_folder: String,
    pub file: String,
    pub hash: u32,
}

/// Body of `GET /list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFileResult {
    #[serde(default)]
    pub files: Vec<FileHash>,
}
