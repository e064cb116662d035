use std::{
    fs::OpenOptions,
    net::SocketAddr,
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
    time::Duration,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use spendsense_rs::{
    AppState,
    aggregation::{DEFAULT_DEBT_KEYWORDS, DebtClassifier},
    api::{ApiConfig, DEFAULT_API_URL},
    build_router, graceful_shutdown, logging_middleware,
};

/// The web server for the SpendSense dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the finance API.
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// How long to wait for the finance API before giving up, in seconds.
    #[arg(long, default_value_t = 10)]
    api_timeout_secs: u64,

    /// The port to serve the dashboard from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical name of the local timezone, e.g. "Pacific/Auckland".
    ///
    /// Used to decide which month a record falls in.
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// An account name keyword that marks the account as debt. Repeat to
    /// give several. Replaces the default keywords.
    #[arg(long = "debt-keyword")]
    debt_keywords: Vec<String>,

    /// The minimum level of log messages written to stdout. `RUST_LOG`
    /// takes precedence when set.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// A file to append debug logs to.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args.log_level, args.log_file.as_ref()) {
        eprintln!("Could not set up logging: {error}");
        return ExitCode::FAILURE;
    }

    let debt_classifier = if args.debt_keywords.is_empty() {
        DebtClassifier::default()
    } else {
        DebtClassifier::new(&args.debt_keywords)
    };
    tracing::debug!(
        "debt keywords: {:?} (defaults: {:?})",
        debt_classifier.keywords(),
        DEFAULT_DEBT_KEYWORDS
    );

    let api_config = ApiConfig {
        base_url: args.api_url,
        timeout: Duration::from_secs(args.api_timeout_secs),
    };

    let state = match AppState::new(api_config, debt_classifier, &args.timezone) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not start the server: {error}");
            return ExitCode::FAILURE;
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));

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
        tracing::error!("Server stopped unexpectedly: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> Result<(), std::io::Error> {
    let stdout_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(stdout_filter);

    let debug_log = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
                    .with_filter(filter::LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    Ok(())
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
        // Errors are logged where they are turned into responses.
        .on_failure(());

    router.layer(tracing_layer)
}
