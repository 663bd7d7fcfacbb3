//! File distribution between a driver and its agents
//!
//! The driver fingerprints the files a job needs and serves them over HTTP;
//! agents list the manifest and download each file by fingerprint into the
//! folder named by its entry.

pub mod fingerprint;
pub mod manifest;
pub mod server;
pub mod types;

pub use fingerprint::{checksum_reader, generate_file_hash};
pub use manifest::Manifest;
pub use server::{RsyncServer, RsyncServerHandle};
pub use types::{FileHash, FileResource, ListFileResult};
