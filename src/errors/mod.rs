//! Unified error handling with a consistent HTML error page.

use std::net::SocketAddr;

use axum::{
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Response},
};

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(Method),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cannot bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Browser launch failed: {0}")]
    Browser(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) => msg.clone(),
            AppError::MethodNotAllowed(method) => {
                let body = error_page(status, &format!("Unsupported method ('{method}')"));
                return (status, [(header::ALLOW, "GET, HEAD")], Html(body)).into_response();
            }
            other => {
                tracing::error!(error = %other, "Internal error");
                "Internal server error".to_string()
            }
        };

        (status, Html(error_page(status, &message))).into_response()
    }
}

/// Render the error page body for a status and a short message.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let code = status.as_u16();
    let explanation = explain(status);
    let message = escape_html(message);
    format!(
        "<!DOCTYPE HTML>\n\
         <html lang=\"en\">\n\
         \x20   <head>\n\
         \x20       <meta charset=\"utf-8\">\n\
         \x20       <title>Error response</title>\n\
         \x20   </head>\n\
         \x20   <body>\n\
         \x20       <h1>Error response</h1>\n\
         \x20       <p>Error code: {code}</p>\n\
         \x20       <p>Message: {message}.</p>\n\
         \x20       <p>Error code explanation: {code} - {explanation}.</p>\n\
         \x20   </body>\n\
         </html>\n"
    )
}

fn explain(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "Nothing matches the given URI",
        StatusCode::BAD_REQUEST => "Bad request syntax or unsupported method",
        StatusCode::METHOD_NOT_ALLOWED => "Specified method is invalid for this resource",
        _ => "Server got itself in trouble",
    }
}

/// Escape text for inclusion in HTML element content.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
