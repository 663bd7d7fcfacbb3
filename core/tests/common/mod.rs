//! Common test utilities and helpers for integration tests

use ferry_core::rsync::{FileResource, RsyncServer, RsyncServerHandle};
use std::path::{Path, PathBuf};

/// Write `content` to `dir/name` and return the full path
pub fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// Start a file server for `resources` on an ephemeral loopback port
#[allow(dead_code)] // Only used by some test binaries
pub async fn start_server(resources: Vec<FileResource>) -> RsyncServerHandle {
    RsyncServer::new(resources)
        .start("127.0.0.1:0")
        .await
        .expect("file server should bind an ephemeral port")
}

/// Full URL of `path` on a running server
#[allow(dead_code)] // Only used by some test binaries
pub fn url(handle: &RsyncServerHandle, path: &str) -> String {
    format!("http://{}{}", handle.local_addr(), path)
}

/// Deterministic test data that is not a repeat of a short pattern
#[allow(dead_code)] // Only used by some test binaries
pub fn patterned_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 31 + i / 7) % 256) as u8).collect()
}
