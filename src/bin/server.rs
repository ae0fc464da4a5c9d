use std::{
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    process::exit,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use wallet_rs::{AppState, build_router, graceful_shutdown, logging_middleware};

/// The web server for wallet_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "DATABASE_PATH", default_value = "wallet.db")]
    db_path: String,

    /// The port to serve the app from.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// The IP address to listen on.
    #[arg(short, long, env = "ADDRESS", default_value = "127.0.0.1")]
    address: IpAddr,

    /// The canonical name of the timezone used for "today", e.g. "Pacific/Auckland".
    #[arg(long, env = "LOCAL_TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,

    /// An optional file to write debug level logs to.
    #[arg(long, env = "LOG_PATH")]
    log_path: Option<String>,

    /// The secret used to derive the key that encrypts session cookies.
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    secret_key: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logging(args.log_path.as_deref());

    let addr = SocketAddr::new(args.address, args.port);

    let conn = match Connection::open(&args.db_path) {
        Ok(conn) => conn,
        Err(error) => {
            tracing::error!("Could not open database at {}: {error}", args.db_path);
            exit(1);
        }
    };

    let state = match AppState::new(conn, &args.secret_key, &args.timezone) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not start the server: {error}");
            exit(1);
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        build_router(state).layer(middleware::from_fn(logging_middleware)),
    );

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        exit(1);
    }
}

fn setup_logging(log_path: Option<&str>) {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let debug_log = log_path.and_then(|log_path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .inspect_err(|error| eprintln!("Could not open log file {log_path}: {error}"))
            .ok()
            .map(|log_file| {
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(Arc::new(log_file))
                    .with_filter(filter::LevelFilter::DEBUG)
            })
    });

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
