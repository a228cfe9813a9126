//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo; every connection is served on its own task.

use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::header::HeaderValue;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::db::LodgingStore;
use crate::legacy::LegacyStore;
use crate::logging::access::{AccessLog, REQUEST_ID_HEADER};
use crate::routes::response::{client_error, payload_too_large, FullBody};
use crate::routes::{self, not_found_response};
use crate::types::Result;
use crate::validation::Schema;

/// Largest request body accepted, in bytes
pub const MAX_BODY_BYTES: usize = 100 * 1024;

/// Shared application state
pub struct AppState {
    /// Persistent lodging store backing `/lodgings`
    pub store: Arc<dyn LodgingStore>,
    /// Positional store backing `/lodgings/{id}`
    pub legacy: LegacyStore,
    /// Schema every created or replaced lodging must satisfy
    pub schema: Schema,
}

impl AppState {
    pub fn new(store: Arc<dyn LodgingStore>, legacy: LegacyStore, schema: Schema) -> Self {
        Self {
            store,
            legacy,
            schema,
        }
    }
}

/// Bind `addr` and serve until the process exits
pub async fn run(state: Arc<AppState>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("== Server is listening on {}", addr);
    serve(listener, state).await
}

/// Accept connections from an already bound listener
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        debug!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Read the request body, route it, and log the outcome
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> std::result::Result<Response<FullBody>, hyper::Error> {
    let method = req.method().clone();
    let target = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let log = AccessLog::start(&method, &target, Some(addr));

    let mut response = read_and_dispatch(&state, method, &target, req.into_body()).await;

    if let Ok(value) = HeaderValue::from_str(&log.request_id().to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    log.finish(response.status());
    Ok(response)
}

/// Read at most `MAX_BODY_BYTES` of `body`, then route the request
pub async fn read_and_dispatch<B>(
    state: &AppState,
    method: Method,
    target: &str,
    body: B,
) -> Response<FullBody>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => dispatch(state, method, target, collected.to_bytes()).await,
        Err(e) if e.is::<LengthLimitError>() => {
            debug!("Rejected {} {}: body over {} bytes", method, target, MAX_BODY_BYTES);
            payload_too_large()
        }
        Err(e) => {
            warn!("Request body error on {} {}: {}", method, target, e);
            client_error(hyper::StatusCode::BAD_REQUEST, "Failed to read request body")
        }
    }
}

/// Route a fully read request.
///
/// `target` is the request path plus query string; the 404 body echoes it.
pub async fn dispatch(
    state: &AppState,
    method: Method,
    target: &str,
    body: Bytes,
) -> Response<FullBody> {
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    };

    let path = if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    };

    let handled = match (method, path) {
        (Method::GET, "/lodgings") => Some(routes::handle_list_lodgings(state, query).await),
        (Method::POST, "/lodgings") => {
            Some(routes::handle_create_lodging(state, &parse_body(&body)).await)
        }

        (method, p) if p.starts_with("/lodgings/") => {
            let raw_id = &p["/lodgings/".len()..];
            match urlencoding::decode(raw_id) {
                Ok(id) if !id.is_empty() && !raw_id.contains('/') => match method {
                    Method::GET => routes::handle_get_lodging(state, &id),
                    Method::PUT => routes::handle_replace_lodging(state, &id, &parse_body(&body)),
                    Method::DELETE => routes::handle_delete_lodging(state, &id),
                    _ => None,
                },
                _ => None,
            }
        }

        _ => None,
    };

    handled.unwrap_or_else(|| not_found_response(target))
}

/// Parse a JSON request body; anything unreadable validates as nothing
fn parse_body(body: &Bytes) -> Value {
    if body.is_empty() {
        return Value::Null;
    }

    serde_json::from_slice(body).unwrap_or_else(|e| {
        debug!("Ignoring malformed JSON body: {}", e);
        Value::Null
    })
}
