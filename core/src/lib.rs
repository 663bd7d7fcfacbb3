//! Ferry Core - shipping a driver's files to its agents
//!
//! A driver registers the files a distributed flow needs, including its own
//! executable, and serves them over HTTP keyed by content fingerprint. Agents
//! fetch the manifest and download each file before running their tasks.

pub mod distributed;
pub mod rsync;

pub use distributed::{
    DistributedOption, DriverOption, FlowContextDriver, FlowRunner, ResourceBid,
};
pub use rsync::{
    FileHash, FileResource, ListFileResult, Manifest, RsyncServer, RsyncServerHandle,
};
