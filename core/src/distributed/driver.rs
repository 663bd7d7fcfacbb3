//! Driver side of a distributed flow
//!
//! The driver makes the flow's required files reachable before agents are
//! asked to run anything. The scheduler that places tasks on agents lives
//! outside this crate and talks to the driver through [`FlowRunner`].

use crate::rsync::{Manifest, RsyncServer, RsyncServerHandle, types::FileResource};
use async_trait::async_trait;
use ferry_common::{CommonError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::info;

/// Everything the driver needs to run one flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverOption {
    pub required_files: Vec<FileResource>,
    pub master: String,
    pub data_center: String,
    pub rack: String,
    pub task_memory_mb: u64,
    pub flow_bid: f64,
    pub module: String,
    pub host: String,
    pub port: u16,
}

/// Placement and resources requested for each task of a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceBid {
    pub data_center: String,
    pub rack: String,
    pub task_memory_mb: u64,
    pub flow_bid: f64,
}

/// Entry point the scheduler uses to drive a flow.
#[async_trait]
pub trait FlowRunner: Send + Sync {
    /// Fingerprint the required files and start serving them. Returns the
    /// address agents download from. Calling it again returns the address of
    /// the server already running.
    async fn start_file_server(&mut self) -> Result<SocketAddr>;

    /// Address of the running file server, if started.
    fn file_server_addr(&self) -> Option<SocketAddr>;

    /// Stop the file server. A runner that never started one does nothing.
    async fn shutdown(&mut self) -> Result<()>;
}

/// [`FlowRunner`] backed by an in-process file server.
#[derive(Debug)]
pub struct FlowContextDriver {
    option: DriverOption,
    file_server: Option<RsyncServerHandle>,
}

impl FlowContextDriver {
    pub fn new(option: DriverOption) -> Self {
        Self {
            option,
            file_server: None,
        }
    }

    pub fn option(&self) -> &DriverOption {
        &self.option
    }

    pub fn master(&self) -> &str {
        &self.option.master
    }

    pub fn resource_bid(&self) -> ResourceBid {
        ResourceBid {
            data_center: self.option.data_center.clone(),
            rack: self.option.rack.clone(),
            task_memory_mb: self.option.task_memory_mb,
            flow_bid: self.option.flow_bid,
        }
    }

    /// Files the running server hands out; `None` before it is started.
    pub fn manifest(&self) -> Option<&Manifest> {
        self.file_server.as_ref().map(|handle| handle.manifest())
    }
}

#[async_trait]
impl FlowRunner for FlowContextDriver {
    async fn start_file_server(&mut self) -> Result<SocketAddr> {
        if let Some(handle) = &self.file_server {
            return Ok(handle.local_addr());
        }

        // Fingerprinting reads every file in full.
        let required_files = self.option.required_files.clone();
        let server = tokio::task::spawn_blocking(move || RsyncServer::new(required_files))
            .await
            .map_err(|e| CommonError::io_error_with_source("fingerprinting task failed", e))?;

        let listen_on = format!("{}:{}", self.option.host, self.option.port);
        let handle = server.start(listen_on.as_str()).await?;
        let addr = handle.local_addr();
        info!(
            "Driver for master {} serving {} of {} required files on {}",
            self.option.master,
            handle.manifest().len(),
            self.option.required_files.len(),
            addr
        );

        self.file_server = Some(handle);
        Ok(addr)
    }

    fn file_server_addr(&self) -> Option<SocketAddr> {
        self.file_server.as_ref().map(|handle| handle.local_addr())
    }

    async fn shutdown(&mut self) -> Result<()> {
        match self.file_server.take() {
            Some(handle) => handle.shutdown_and_wait().await,
            None => Ok(()),
        }
    }
}
