pub mod config;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod services;

use std::path::PathBuf;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Canonical directory every request is resolved against.
    pub root: PathBuf,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}
