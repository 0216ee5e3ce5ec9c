//! DevEvent API - REST backend for developer events and bookings

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt::MakeWriter, Layer, Registry};

use devevent_api::{
    build_router,
    config::{self, LogFormat},
    db, middleware,
    services::{CloudinaryImageStore, ImageStore},
    AppConfig, AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        println!("DevEvent API {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration first (before logging, so we know log format)
    let config = AppConfig::load().context("Failed to load configuration")?;

    // The guard must outlive the server so buffered file logs are flushed
    let _log_guard = init_logging(&config);

    info!("DevEvent API starting up");

    ensure_data_directory(&config)?;

    info!("Initializing database connection");
    let db = db::init_pool(&config.database)
        .await
        .context("Failed to initialize database")?;

    let images: Option<Arc<dyn ImageStore>> = match config.cloudinary {
        Some(ref cloudinary) if cloudinary.is_complete() => {
            info!(cloud_name = %cloudinary.cloud_name, "Initializing Cloudinary image store");
            Some(Arc::new(
                CloudinaryImageStore::new(cloudinary)
                    .context("Failed to initialize Cloudinary client")?,
            ))
        }
        _ => {
            warn!("Cloudinary not configured, event creation is disabled");
            None
        }
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address configuration")?;

    let state = AppState::new(config, db, images);
    let app = create_router(state);

    info!("Starting HTTP server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Initialize the logging/tracing infrastructure
fn init_logging(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use config::LogTarget;
    use tracing_subscriber::{prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let log_config = &config.logging;
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    let mut guard = None;

    if matches!(log_config.target, LogTarget::Console | LogTarget::Both) {
        layers.push(fmt_layer(&log_config.format, std::io::stdout, true));
    }

    if matches!(log_config.target, LogTarget::File | LogTarget::Both) {
        let (writer, file_guard) = create_file_writer(log_config);
        layers.push(fmt_layer(&log_config.format, writer, false));
        guard = Some(file_guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .init();

    guard
}

/// Formatting layer for one output
fn fmt_layer<W>(format: &LogFormat, writer: W, ansi: bool) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    use tracing_subscriber::fmt;

    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed(),
    }
}

/// Create a file writer with optional daily rotation
fn create_file_writer(
    log_config: &config::LoggingConfig,
) -> (
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
) {
    if let Err(e) = std::fs::create_dir_all(&log_config.log_dir) {
        eprintln!(
            "Failed to create log directory {:?}: {}",
            log_config.log_dir, e
        );
    }

    let file_appender = if log_config.daily_rotation {
        tracing_appender::rolling::daily(&log_config.log_dir, &log_config.log_prefix)
    } else {
        tracing_appender::rolling::never(&log_config.log_dir, &log_config.log_prefix)
    };

    tracing_appender::non_blocking(file_appender)
}

/// Directory holding the SQLite file, if the URL names one
fn database_directory(url: &str) -> Option<&std::path::Path> {
    let path = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.starts_with(':') {
        return None;
    }
    std::path::Path::new(path)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}

/// Ensure the data directory exists
fn ensure_data_directory(config: &AppConfig) -> Result<()> {
    if let Some(parent) = database_directory(&config.database.url) {
        if !parent.exists() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
            info!("Created data directory: {:?}", parent);
        }
    }
    Ok(())
}

/// Create the application router with all routes and middleware
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let rate_limit = if state.config.rate_limit.enabled {
        let rate_limit = middleware::RateLimitState::new(&state.config.rate_limit);
        middleware::spawn_rate_limit_cleanup(rate_limit.clone());
        Some(rate_limit)
    } else {
        info!("Rate limiting disabled by configuration");
        None
    };

    build_router(state, rate_limit)
        .layer(CompressionLayer::new())
        .layer(trace_layer)
        .layer(cors)
}

/// Print help message
fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        r#"DevEvent API {}

USAGE:
    devevent-api [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information

ENVIRONMENT:
    DEVEVENT_CONFIG         Path to configuration file (default: config.yaml)
    DEVEVENT_HOST           Address to bind
    DEVEVENT_PORT           Port to bind
    DATABASE_URL            SQLite database URL
    RUST_LOG                Log filter
    DEVEVENT_LOG_FORMAT     Log format: pretty, compact or json
    DEVEVENT_LOG_TARGET     Log target: console, file or both
    DEVEVENT_LOG_DIR        Directory for log files
    CLOUDINARY_CLOUD_NAME   Cloudinary cloud name
    CLOUDINARY_API_KEY      Cloudinary API key
    CLOUDINARY_API_SECRET   Cloudinary API secret
    CLOUDINARY_URL_BASE     Cloudinary API base URL

CONFIGURATION:
    The application looks for configuration files in the following order:
    1. Path specified by DEVEVENT_CONFIG environment variable
    2. ./config.yaml
    3. ./config/config.yaml
    4. /etc/devevent-api/config.yaml
    5. devevent-api/config.yaml in the user configuration directory"#,
        env!("CARGO_PKG_VERSION")
    )
}
