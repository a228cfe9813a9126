//! HTTP server for the lodgings service

pub mod http;

pub use http::{dispatch, read_and_dispatch, run, serve, AppState, MAX_BODY_BYTES};
