//! Per-request access log
//!
//! One line per request, emitted when the response is ready: request id,
//! method, target, status and latency.

use hyper::{Method, StatusCode};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

/// Header carrying the request id back to the client
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Access log entry for an in-flight request
#[derive(Debug)]
pub struct AccessLog {
    request_id: Uuid,
    method: Method,
    target: String,
    remote: Option<SocketAddr>,
    started: Instant,
}

impl AccessLog {
    /// Start timing a request
    pub fn start(method: &Method, target: &str, remote: Option<SocketAddr>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            method: method.clone(),
            target: target.to_string(),
            remote,
            started: Instant::now(),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Emit the log line for the finished request
    pub fn finish(self, status: StatusCode) {
        let elapsed_ms = self.elapsed().as_secs_f64() * 1000.0;
        let remote = self
            .remote
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "-".to_string());

        if status.is_server_error() {
            warn!(
                request_id = %self.request_id,
                remote = %remote,
                method = %self.method,
                target = %self.target,
                status = status.as_u16(),
                elapsed_ms,
                "request failed"
            );
        } else {
            info!(
                request_id = %self.request_id,
                remote = %remote,
                method = %self.method,
                target = %self.target,
                status = status.as_u16(),
                elapsed_ms,
                "request"
            );
        }
    }
}
