//! Router for the static file server.

pub mod listing;

use axum::{
    http::{header, HeaderValue},
    routing::{get, MethodRouter},
    Router,
};
use tower_http::{
    services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::middleware::static_files;
use crate::AppState;

/// Value of the `Server` header on every response.
pub const SERVER_HEADER: &str = concat!("pageserve/", env!("CARGO_PKG_VERSION"));

/// Build the application router serving `state.root`.
///
/// Files (and directories holding an `index.html`) are answered by `ServeDir`;
/// everything else goes to [`listing::show`]. [`static_files::guard`] sits in
/// front of both.
pub fn router(state: AppState) -> Router {
    let fallback: MethodRouter = get(listing::show).with_state(state.clone());
    let files = ServeDir::new(&state.root)
        .append_index_html_on_directories(true)
        .fallback(fallback);

    Router::new()
        .fallback_service(files)
        .layer(axum::middleware::from_fn_with_state(state, static_files::guard))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::SERVER,
            HeaderValue::from_static(SERVER_HEADER),
        ))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    use super::*;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.txt"), "hello").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("Notes.md"), "# notes").unwrap();
        std::fs::create_dir(dir.path().join("legacy")).unwrap();
        std::fs::write(dir.path().join("legacy").join("index.htm"), "<p>legacy</p>").unwrap();
        dir
    }

    async fn send(root: &Path, method: Method, uri: &str) -> Response {
        let app = router(AppState::new(root.to_path_buf()));
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn serves_existing_file() {
        let dir = fixture();
        let response = send(dir.path(), Method::GET, "/hello.txt").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        assert_eq!(body_text(response).await, "hello");
    }

    #[tokio::test]
    async fn every_response_names_the_server() {
        let dir = fixture();
        let ok = send(dir.path(), Method::GET, "/hello.txt").await;
        let missing = send(dir.path(), Method::GET, "/nope").await;
        assert_eq!(ok.headers()[header::SERVER], SERVER_HEADER);
        assert_eq!(missing.headers()[header::SERVER], SERVER_HEADER);
    }

    #[tokio::test]
    async fn missing_file_renders_error_page() {
        let dir = fixture();
        let response = send(dir.path(), Method::GET, "/missing.html").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_text(response).await;
        assert!(body.contains("<p>Error code: 404</p>"));
        assert!(body.contains("Message: File not found."));
    }

    #[tokio::test]
    async fn parent_traversal_is_not_found() {
        let dir = fixture();
        let response = send(dir.path(), Method::GET, "/../hello.txt").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_utf8_path_is_bad_request() {
        let dir = fixture();
        let response = send(dir.path(), Method::GET, "/%FF/").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn directory_without_slash_redirects() {
        let dir = fixture();
        let response = send(dir.path(), Method::GET, "/sub").await;
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/sub/");
    }

    #[tokio::test]
    async fn directory_without_index_is_listed() {
        let dir = fixture();
        let response = send(dir.path(), Method::GET, "/sub/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let body = body_text(response).await;
        assert!(body.contains("Directory listing for /sub/"));
        assert!(body.contains(r#"<a href="Notes.md">Notes.md</a>"#));
    }

    #[tokio::test]
    async fn root_listing_shows_directories_with_slash() {
        let dir = fixture();
        let body = body_text(send(dir.path(), Method::GET, "/").await).await;
        assert!(body.contains(r#"<a href="hello.txt">hello.txt</a>"#));
        assert!(body.contains(r#"<a href="sub/">sub/</a>"#));
    }

    #[tokio::test]
    async fn index_html_takes_precedence_over_listing() {
        let dir = fixture();
        std::fs::write(dir.path().join("sub").join("index.html"), "<h1>sub</h1>").unwrap();
        let response = send(dir.path(), Method::GET, "/sub/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "<h1>sub</h1>");
    }

    #[tokio::test]
    async fn index_htm_is_served() {
        let dir = fixture();
        let response = send(dir.path(), Method::GET, "/legacy/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "<p>legacy</p>");
    }

    #[tokio::test]
    async fn head_returns_no_body() {
        let dir = fixture();
        let response = send(dir.path(), Method::HEAD, "/hello.txt").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "5");
        assert!(body_text(response).await.is_empty());
    }

    #[tokio::test]
    async fn post_is_not_allowed() {
        let dir = fixture();
        let response = send(dir.path(), Method::POST, "/hello.txt").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, HEAD");
        assert_eq!(response.headers()[header::SERVER], SERVER_HEADER);
        let body = body_text(response).await;
        assert!(body.contains("<p>Error code: 405</p>"));
        assert!(body.contains("Unsupported method (&#x27;POST&#x27;)"));
    }

    #[tokio::test]
    async fn post_to_missing_path_gets_method_page() {
        let dir = fixture();
        let response = send(dir.path(), Method::POST, "/nope").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(body_text(response).await.contains("<h1>Error response</h1>"));
    }

    #[tokio::test]
    async fn overlong_name_is_not_found_page() {
        let dir = fixture();
        let uri = format!("/{}", "a".repeat(300));
        let response = send(dir.path(), Method::GET, &uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Message: File not found."));
    }

    #[tokio::test]
    async fn file_with_trailing_slash_is_not_found() {
        let dir = fixture();
        let response = send(dir.path(), Method::GET, "/hello.txt/").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Message: File not found."));
    }

    #[tokio::test]
    async fn redirect_keeps_query_string() {
        let dir = fixture();
        let response = send(dir.path(), Method::GET, "/sub?x=1").await;
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/sub/?x=1");
    }
}
