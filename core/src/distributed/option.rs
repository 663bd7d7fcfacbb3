//! Options for submitting a flow to a cluster
//!
//! `DistributedOption` collects everything a driver needs before it hands a
//! job to the cluster: the files agents must download, where the master is,
//! placement hints and the per-task resource bid.

use crate::distributed::driver::{DriverOption, FlowContextDriver};
use crate::rsync::types::FileResource;
use ferry_common::{CommonError, Result, relativize_to_cwd};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MASTER: &str = "localhost:45326";
pub const DEFAULT_TASK_MEMORY_MB: u64 = 64;
pub const DEFAULT_FLOW_BID: f64 = 100.0;
pub const DEFAULT_HOST: &str = "localhost";

/// Builder for a distributed flow submission.
///
/// Every setter consumes the option and returns it, so calls chain:
///
/// ```
/// use ferry_core::distributed::DistributedOption;
///
/// let option = DistributedOption::new("target/debug/wordcount")
///     .set_master("master.internal:45326")
///     .set_placement("dc1", "rack7")
///     .with_file("data/stopwords.txt", "data");
/// assert_eq!(option.required_files.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributedOption {
    pub required_files: Vec<FileResource>,
    pub master: String,
    pub data_center: String,
    pub rack: String,
    pub task_memory_mb: u64,
    pub flow_bid: f64,
    pub module: String,
    /// Host the file server binds to.
    pub host: String,
    /// Port the file server binds to, `0` for any free port.
    pub port: u16,
}

impl DistributedOption {
    /// Default options that ship `driver_executable` to every agent, so the
    /// same binary can run both the driver and the agent side of a flow.
    pub fn new<P: AsRef<Path>>(driver_executable: P) -> Self {
        Self::without_files().with_driver_file(driver_executable)
    }

    /// [`DistributedOption::new`] for the executable of the running process.
    pub fn for_current_executable() -> Result<Self> {
        let exe = std::env::current_exe().map_err(|e| {
            CommonError::configuration_error_with_source("cannot locate the driver executable", e)
        })?;
        Ok(Self::new(exe))
    }

    fn without_files() -> Self {
        Self {
            required_files: Vec::new(),
            master: DEFAULT_MASTER.to_string(),
            data_center: String::new(),
            rack: String::new(),
            task_memory_mb: DEFAULT_TASK_MEMORY_MB,
            flow_bid: DEFAULT_FLOW_BID,
            module: String::new(),
            host: DEFAULT_HOST.to_string(),
            port: 0,
        }
    }

    pub fn set_master(mut self, master: impl Into<String>) -> Self {
        self.master = master.into();
        self
    }

    pub fn set_data_center(mut self, data_center: impl Into<String>) -> Self {
        self.data_center = data_center.into();
        self
    }

    pub fn set_rack(mut self, rack: impl Into<String>) -> Self {
        self.rack = rack.into();
        self
    }

    pub fn set_placement(self, data_center: impl Into<String>, rack: impl Into<String>) -> Self {
        self.set_data_center(data_center).set_rack(rack)
    }

    pub fn set_task_memory_mb(mut self, task_memory_mb: u64) -> Self {
        self.task_memory_mb = task_memory_mb;
        self
    }

    pub fn set_flow_bid(mut self, flow_bid: f64) -> Self {
        self.flow_bid = flow_bid;
        self
    }

    pub fn set_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn set_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn set_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Send `related_file` to the agents, into `to_folder` under the task's
    /// working directory.
    ///
    /// The path is recorded relative to the current directory when possible.
    /// Nothing is read here; a missing file only shows up, as a logged
    /// warning, when the file server starts.
    pub fn with_file<P: AsRef<Path>>(
        mut self,
        related_file: P,
        to_folder: impl Into<String>,
    ) -> Self {
        let relative_path = relativize_to_cwd(related_file);
        self.required_files
            .push(FileResource::new(relative_path, to_folder));
        self
    }

    /// Send the driver executable to the agents' working directory.
    pub fn with_driver_file<P: AsRef<Path>>(self, driver_executable: P) -> Self {
        self.with_file(driver_executable, ".")
    }

    /// Address the file server binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn driver_option(&self) -> DriverOption {
        DriverOption {
            required_files: self.required_files.clone(),
            master: self.master.clone(),
            data_center: self.data_center.clone(),
            rack: self.rack.clone(),
            task_memory_mb: self.task_memory_mb,
            flow_bid: self.flow_bid,
            module: self.module.clone(),
            host: self.host.clone(),
            port: self.port,
        }
    }

    /// The runner the scheduler drives for this flow.
    pub fn get_flow_runner(&self) -> FlowContextDriver {
        FlowContextDriver::new(self.driver_option())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_include_driver_file() {
        let option = DistributedOption::new("bin/driver");
        assert_eq!(option.master, DEFAULT_MASTER);
        assert_eq!(option.task_memory_mb, 64);
        assert_eq!(option.flow_bid, 100.0);
        assert_eq!(option.host, "localhost");
        assert_eq!(option.port, 0);
        assert!(option.data_center.is_empty());
        assert_eq!(
            option.required_files,
            vec![FileResource::new("bin/driver", ".")]
        );
    }

    #[test]
    fn test_setters_chain() {
        let option = DistributedOption::new("driver")
            .set_master("10.0.0.1:45326")
            .set_placement("dc2", "r1")
            .set_task_memory_mb(512)
            .set_flow_bid(2.5)
            .set_module("wordcount")
            .set_host("0.0.0.0")
            .set_port(9000);

        assert_eq!(option.master, "10.0.0.1:45326");
        assert_eq!(option.data_center, "dc2");
        assert_eq!(option.rack, "r1");
        assert_eq!(option.task_memory_mb, 512);
        assert_eq!(option.flow_bid, 2.5);
        assert_eq!(option.module, "wordcount");
        assert_eq!(option.listen_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn test_with_file_appends_in_order() {
        let option = DistributedOption::new("driver")
            .with_file("./conf/app.toml", "conf")
            .with_file("lib/../data/input.csv", "data");

        let files: Vec<(PathBuf, &str)> = option
            .required_files
            .iter()
            .map(|f| (f.full_path.clone(), f.target_folder.as_str()))
            .collect();
        assert_eq!(
            files,
            vec![
                (PathBuf::from("driver"), "."),
                (PathBuf::from("conf/app.toml"), "conf"),
                (PathBuf::from("data/input.csv"), "data"),
            ]
        );
    }

    #[test]
    fn test_with_file_relativizes_absolute_paths() {
        let cwd = std::env::current_dir().unwrap();
        let option = DistributedOption::new(cwd.join("target").join("driver"));
        assert_eq!(
            option.required_files[0].full_path,
            PathBuf::from("target").join("driver")
        );
    }

    #[test]
    fn test_for_current_executable() {
        let option = DistributedOption::for_current_executable().unwrap();
        assert_eq!(option.required_files.len(), 1);
        assert_eq!(option.required_files[0].target_folder, ".");
    }

    #[test]
    fn test_driver_option_snapshot() {
        let option = DistributedOption::new("driver").set_rack("r9");
        let driver_option = option.driver_option();
        assert_eq!(driver_option.rack, "r9");
        assert_eq!(driver_option.required_files, option.required_files);
    }

    #[test]
    fn test_option_json_uses_file_field_names() {
        let option = DistributedOption::new("driver");
        let value = serde_json::to_value(&option).unwrap();
        assert_eq!(value["required_files"][0]["path"], "driver");
        assert_eq!(value["required_files"][0]["targetFolder"], ".");
    }
}
