use anyhow::Context;
use mimalloc::MiMalloc;
use pageserve::config::{AppConfig, LogFormat};
use pageserve::services::{browser, serve_root};
use pageserve::{routes, server, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    init_tracing(config.log_format);

    let root = match &config.root {
        Some(root) => root.clone(),
        None => serve_root::default_root()?,
    };
    let root = serve_root::enter(&root)
        .with_context(|| format!("Cannot serve {}", root.display()))?;

    let listener = server::bind(config.bind_addr()).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, root = %root.display(), "Starting pageserve");

    if config.open_browser {
        let url = browser::launch_url(&config.browser_host, addr.port(), &config.open_path);
        tokio::task::spawn_blocking(move || match browser::open(&url) {
            Ok(()) => tracing::debug!(%url, "Opened browser"),
            Err(e) => tracing::warn!(error = %e, "Could not open browser"),
        });
    }

    tracing::info!(
        "Server running at http://{}:{}",
        config.browser_host,
        addr.port()
    );
    tracing::info!("Press Ctrl+C to stop the server");

    let app = routes::router(AppState::new(root));
    server::serve(listener, app, server::shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let registry = tracing_subscriber::registry().with(
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "pageserve=info,tower_http=debug".into()),
    );

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
