use std::{
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
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
use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

use finance_tracker::{
    AppState, Locale, build_router, get_local_offset, graceful_shutdown, logging_middleware,
};

/// The REST API server for finance_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: PathBuf,

    /// The address to listen on.
    #[arg(long, default_value = "127.0.0.1")]
    address: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical name of the timezone used to decide what "today" is, e.g. "Europe/Moscow".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// The language for month and category type labels, "en" or "ru".
    #[arg(long, default_value_t = Locale::Russian)]
    locale: Locale,

    /// File path for the debug log.
    #[arg(long, default_value = "debug.log")]
    log_path: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logging(&args.log_path);

    if get_local_offset(&args.timezone).is_none() {
        tracing::error!("Unknown timezone \"{}\"", args.timezone);
        std::process::exit(1);
    }

    let addr = SocketAddr::new(args.address, args.port);

    let connection = Connection::open(&args.db_path).expect("Could not open the database");
    let state = AppState::new(connection, &args.timezone, args.locale)
        .expect("Could not initialize the database");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        build_router(state).layer(middleware::from_fn(logging_middleware)),
    );

    tracing::info!(
        "HTTP server listening on {addr} (timezone {}, locale {})",
        args.timezone,
        args.locale
    );
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("The server stopped unexpectedly");
}

/// Log INFO and above to stdout, or whatever `RUST_LOG` asks for, and
/// everything from DEBUG up to the file at `log_path`.
fn setup_logging(log_path: &Path) {
    let stdout_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(stdout_filter);

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

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
        // Errors are already logged where they are converted into responses.
        .on_failure(());

    router.layer(tracing_layer)
}
