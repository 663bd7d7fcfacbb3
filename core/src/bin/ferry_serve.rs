//! Serve a set of files the way a driver does for its agents.
//!
//! ```bash
//! cargo run --bin ferry-serve -- --file data/input.csv=data --port 8080
//! ```

use clap::Parser;
use ferry_core::distributed::{DEFAULT_HOST, DEFAULT_MASTER};
use ferry_core::{DistributedOption, FlowRunner};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ferry-serve", about = "Serve driver files to flow agents")]
struct Args {
    /// File to distribute, optionally followed by `=<target folder>` (default `.`)
    #[arg(short, long = "file", value_name = "PATH[=FOLDER]")]
    files: Vec<String>,

    /// Host to bind the file server to
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port to bind the file server to, 0 for any free port
    #[arg(long, default_value_t = 0)]
    port: u16,

    /// Master the flow is submitted to
    #[arg(long, default_value = DEFAULT_MASTER)]
    master: String,

    #[arg(long, default_value = "")]
    data_center: String,

    #[arg(long, default_value = "")]
    rack: String,
}

fn parse_file_spec(spec: &str) -> (&str, &str) {
    match spec.split_once('=') {
        Some((path, folder)) if !folder.is_empty() => (path, folder),
        Some((path, _)) => (path, "."),
        None => (spec, "."),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut option = DistributedOption::for_current_executable()?
        .set_master(args.master)
        .set_placement(args.data_center, args.rack)
        .set_host(args.host)
        .set_port(args.port);
    for spec in &args.files {
        let (path, folder) = parse_file_spec(spec);
        option = option.with_file(path, folder);
    }

    let mut runner = option.get_flow_runner();
    let addr = match runner.start_file_server().await {
        Ok(addr) => addr,
        Err(e) => {
            error!(
                "Cannot start file server on {} (retryable: {}): {}",
                option.listen_addr(),
                e.is_retryable(),
                e
            );
            return Err(e.into());
        }
    };
    if let Some(manifest) = runner.manifest() {
        for fh in manifest.entries() {
            info!(
                "{} -> {}/{} (hash {})",
                fh.full_path.display(),
                fh.target_folder,
                fh.file,
                fh.hash
            );
        }
    }

    info!("Serving on http://{}, press Ctrl-C to stop", addr);
    tokio::signal::ctrl_c().await?;
    runner.shutdown().await?;
    Ok(())
}
