//! Guard around `ServeDir` so its bare status responses become HTML error pages.

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::routes::listing::file_not_found;
use crate::services::serve_root;
use crate::AppState;

/// Reject unsupported methods and file paths with a trailing slash, then map
/// `ServeDir`'s open failures onto a 404 page.
pub async fn guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    if method != Method::GET && method != Method::HEAD {
        return AppError::MethodNotAllowed(method).into_response();
    }

    let path = request.uri().path().to_owned();
    if path.len() > 1 && path.ends_with('/') && names_file(&state, &path).await {
        return file_not_found().into_response();
    }

    let response = next.run(request).await;
    // Only ServeDir answers 500 here: opening the path failed with something
    // other than NotFound (EACCES, ENAMETOOLONG, ...).
    if response.status() == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::warn!(%path, "File could not be opened");
        return file_not_found().into_response();
    }
    response
}

async fn names_file(state: &AppState, path: &str) -> bool {
    let Ok(decoded) = serve_root::decode(path) else {
        return false;
    };
    let Some(target) = serve_root::resolve(&state.root, &decoded) else {
        return false;
    };
    tokio::fs::metadata(&target)
        .await
        .map(|m| !m.is_dir())
        .unwrap_or(false)
}
