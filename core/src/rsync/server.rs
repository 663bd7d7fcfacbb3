//! HTTP server that hands the driver's files out to agents
//!
//! Two routes are served:
//!
//! - `GET /list` returns the manifest as JSON.
//! - `GET /file/{hash}` returns the content of the manifest entry with that
//!   fingerprint. Range, conditional and `HEAD` requests are honored, so an
//!   agent can resume or split a download.
//!
//! Files are addressed by fingerprint only; request paths never reach the
//! filesystem.

use crate::rsync::manifest::Manifest;
use crate::rsync::types::{FileResource, ListFileResult};
use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Request, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use ferry_common::{CommonError, Result};
use std::net::{IpAddr, SocketAddr};
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

#[derive(Clone)]
struct RsyncServerState {
    manifest: Manifest,
}

/// A file distribution server that has fingerprinted its files but is not
/// listening yet. [`RsyncServer::start`] turns it into a running server.
#[derive(Debug, Clone)]
pub struct RsyncServer {
    manifest: Manifest,
}

impl RsyncServer {
    /// Fingerprint `related_files`. Files that cannot be read are logged and
    /// skipped; this never fails.
    pub fn new<I>(related_files: I) -> Self
    where
        I: IntoIterator<Item = FileResource>,
    {
        Self {
            manifest: Manifest::build(related_files),
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The routes of the server, without a listener attached.
    pub fn router(&self) -> Router {
        let state = RsyncServerState {
            manifest: self.manifest.clone(),
        };
        Router::new()
            .route("/list", get(list_files))
            .route("/file/{hash}", get(fetch_file))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Bind `listen_on` and serve in the background.
    ///
    /// Port `0` picks a free port; the handle reports the one actually bound.
    /// A bind failure is returned as a network error and no task is spawned.
    pub async fn start<A: ToSocketAddrs>(self, listen_on: A) -> Result<RsyncServerHandle> {
        let listener = TcpListener::bind(listen_on)
            .await
            .map_err(|e| CommonError::network_error_with_source("cannot bind file server", e))?;
        let local_addr = listener.local_addr().map_err(|e| {
            CommonError::network_error_with_source("cannot resolve file server address", e)
        })?;

        let app = self.router();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        info!(
            "File server listening on {} with {} files",
            local_addr,
            self.manifest.len()
        );
        let task = tokio::spawn(async move {
            let shutdown = async move {
                // A dropped handle must not stop the server.
                if shutdown_rx.await.is_err() {
                    std::future::pending::<()>().await;
                }
            };
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
                .map_err(|e| CommonError::network_error_with_source("file server failed", e));
            if result.is_ok() {
                info!("File server on {} stopped", local_addr);
            }
            result
        });

        Ok(RsyncServerHandle {
            local_addr,
            manifest: self.manifest,
            shutdown_tx: Some(shutdown_tx),
            task,
        })
    }
}

/// A running file server.
///
/// The server keeps running until [`shutdown`](Self::shutdown) is called or
/// the process exits; dropping the handle does not stop it.
#[derive(Debug)]
pub struct RsyncServerHandle {
    local_addr: SocketAddr,
    manifest: Manifest,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<()>>,
}

impl RsyncServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn ip(&self) -> IpAddr {
        self.local_addr.ip()
    }

    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Ask the server to stop accepting connections. In-flight responses are
    /// allowed to finish. Calling this more than once is a no-op.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            debug!("Shutting down file server on {}", self.local_addr);
            let _ = tx.send(());
        }
    }

    /// Wait for the serve task to finish. Without a prior
    /// [`shutdown`](Self::shutdown) this waits until the server fails.
    pub async fn stopped(self) -> Result<()> {
        self.task.await.map_err(|e| {
            CommonError::network_error_with_source("file server task did not complete", e)
        })?
    }

    /// [`shutdown`](Self::shutdown) followed by [`stopped`](Self::stopped).
    pub async fn shutdown_and_wait(mut self) -> Result<()> {
        self.shutdown();
        self.stopped().await
    }
}

async fn list_files(State(state): State<RsyncServerState>) -> Json<ListFileResult> {
    Json(state.manifest.to_list_result())
}

async fn fetch_file(
    State(state): State<RsyncServerState>,
    Path(key): Path<String>,
    request: Request,
) -> Response {
    let Some(fh) = state.manifest.find_by_key(&key) else {
        debug!("No file with hash {}", key);
        return (StatusCode::NOT_FOUND, format!("no file with hash {}", key)).into_response();
    };

    let response = match ServeFile::new(&fh.full_path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };
    if response.status() == StatusCode::NOT_FOUND {
        warn!(
            "Can not read file {} for hash {}",
            fh.full_path.display(),
            fh.hash
        );
    }

    let mut response = response.map(Body::new);
    if response.status().is_success() {
        let disposition = format!("attachment; filename=\"{}\"", fh.file.replace('"', ""));
        match HeaderValue::from_str(&disposition) {
            Ok(value) => {
                response
                    .headers_mut()
                    .insert(header::CONTENT_DISPOSITION, value);
            }
            Err(_) => debug!("File name {:?} is not a valid header value", fh.file),
        }
    }
    response
}
