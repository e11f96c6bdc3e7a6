use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::errors::AppError;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Directory to serve. `None` means the directory of the executable.
    pub root: Option<PathBuf>,
    pub open_browser: bool,
    pub browser_host: String,
    pub open_path: String,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            root: None,
            open_browser: true,
            browser_host: "localhost".to_string(),
            open_path: "/test_scam.html".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("SERVE_HOST") {
            config.host = host
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("SERVE_HOST is not an IP address: {host}")))?;
        }
        if let Some(port) = lookup("SERVE_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("SERVE_PORT is not a port number: {port}")))?;
        }
        if let Some(root) = lookup("SERVE_ROOT").filter(|r| !r.trim().is_empty()) {
            config.root = Some(PathBuf::from(root));
        }
        if let Some(flag) = lookup("OPEN_BROWSER") {
            config.open_browser = parse_bool("OPEN_BROWSER", &flag)?;
        }
        if let Some(host) = lookup("BROWSER_HOST").filter(|h| !h.trim().is_empty()) {
            config.browser_host = host.trim().to_string();
        }
        if let Some(path) = lookup("OPEN_PATH") {
            config.open_path = normalize_path(path.trim());
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            config.log_format = match format.trim().to_ascii_lowercase().as_str() {
                "text" | "pretty" => LogFormat::Text,
                "json" => LogFormat::Json,
                other => {
                    return Err(AppError::Config(format!(
                        "LOG_FORMAT must be `text` or `json`, got `{other}`"
                    )))
                }
            };
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Config(format!(
            "{key} must be a boolean, got `{value}`"
        ))),
    }
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
