//! Fallback for paths the static file service could not answer: directory
//! listings, `index.htm` pages, and the HTML 404 page.

use axum::{
    body::Body,
    extract::{Request, State},
    response::{Html, IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::errors::AppError;
use crate::services::listing as listing_service;
use crate::services::serve_root;
use crate::AppState;

/// GET <any path> — list a directory or report the path as missing.
pub async fn show(State(state): State<AppState>, request: Request) -> Result<Response, AppError> {
    let request_path = serve_root::decode(request.uri().path())?;

    let path = serve_root::resolve(&state.root, &request_path).ok_or_else(file_not_found)?;
    let metadata = tokio::fs::metadata(&path)
        .await
        .map_err(|_| file_not_found())?;

    // Directories without a trailing slash never get here: ServeDir redirects them.
    if !metadata.is_dir() {
        return Err(file_not_found());
    }

    let index = path.join("index.htm");
    if tokio::fs::metadata(&index)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
    {
        let response = match ServeFile::new(index).oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        return Ok(response.map(Body::new));
    }

    let entries = listing_service::read_entries(&path).await.map_err(|e| {
        tracing::warn!(error = %e, path = %path.display(), "Directory listing failed");
        AppError::NotFound("No permission to list directory".to_string())
    })?;

    Ok(Html(listing_service::render(&request_path, &entries)).into_response())
}

pub(crate) fn file_not_found() -> AppError {
    AppError::NotFound("File not found".to_string())
}
