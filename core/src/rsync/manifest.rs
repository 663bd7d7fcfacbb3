//! The manifest of files a distribution server can hand out
//!
//! A manifest is built once, when the server is created, and never changes
//! afterwards. Cloning it is cheap and clones share the same entries, so any
//! number of request handlers can read it concurrently without locking.

use crate::rsync::fingerprint::generate_file_hash;
use crate::rsync::types::{FileHash, FileResource, ListFileResult};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct Manifest {
    entries: Arc<[FileHash]>,
}

impl Manifest {
    /// Fingerprint every resource, in order.
    ///
    /// A resource that cannot be fingerprinted is logged and left out; the
    /// rest of the manifest is still built.
    pub fn build<I>(resources: I) -> Self
    where
        I: IntoIterator<Item = FileResource>,
    {
        let mut entries = Vec::new();
        for resource in resources {
            match generate_file_hash(&resource.full_path) {
                Ok(mut fh) => {
                    fh.target_folder = resource.target_folder;
                    debug!(
                        "Fingerprinted {} as {} -> {}",
                        fh.full_path.display(),
                        fh.hash,
                        fh.target_folder
                    );
                    entries.push(fh);
                }
                Err(e) => {
                    warn!(
                        "Failed to read {}, leaving it out of the manifest ({:?}): {}",
                        resource.full_path.display(),
                        e.category(),
                        e
                    );
                }
            }
        }

        Self {
            entries: entries.into(),
        }
    }

    pub fn entries(&self) -> &[FileHash] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry with the given fingerprint. Two resources with identical
    /// content share a fingerprint and are served from the first one.
    pub fn find(&self, hash: u32) -> Option<&FileHash> {
        self.entries.iter().find(|fh| fh.hash == hash)
    }

    /// Look up an entry by the decimal form of its fingerprint, as it appears
    /// in a `/file/{hash}` request path.
    pub fn find_by_key(&self, key: &str) -> Option<&FileHash> {
        key.parse::<u32>().ok().and_then(|hash| self.find(hash))
    }

    pub fn to_list_result(&self) -> ListFileResult {
        ListFileResult {
            files: self.entries.to_vec(),
        }
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::build(Vec::new())
    }
}
