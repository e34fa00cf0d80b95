use std::{
    error::Error,
    net::{IpAddr, Ipv4Addr, SocketAddr},
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
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use sales_dashboard::{
    AppState, DEFAULT_DATASET_URL, DatasetSource, PaginationConfig, SearchConfig, build_router,
    close_db, graceful_shutdown, logging_middleware,
};

/// The JSON API server for the sales dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The address to listen on.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// Where to download the transaction dataset from when initializing.
    #[arg(long, default_value = DEFAULT_DATASET_URL)]
    dataset_url: String,

    /// Also match the search text against transaction prices.
    #[arg(long)]
    search_price: bool,

    /// The number of transactions per page when a request does not say.
    #[arg(long, default_value_t = 10)]
    default_page_size: u64,

    /// The largest page size, larger requests are lowered to it.
    #[arg(long, default_value_t = 100)]
    max_page_size: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

    let args = Args::parse();

    if args.default_page_size == 0 || args.default_page_size > args.max_page_size {
        return Err(format!(
            "--default-page-size must be between 1 and --max-page-size ({}), got {}",
            args.max_page_size, args.default_page_size
        )
        .into());
    }

    let addr = SocketAddr::new(args.host, args.port);

    let conn = Connection::open(&args.db_path)?;
    let state = AppState::new(
        conn,
        DatasetSource::new(&args.dataset_url)?,
        PaginationConfig {
            default_page_size: args.default_page_size,
            max_page_size: args.max_page_size,
            ..Default::default()
        },
        SearchConfig {
            match_price: args.search_price,
        },
    )?;
    let db_connection = state.db_connection.clone();
    tracing::info!("Dataset source: {}", state.dataset_source.url());

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    tracing::info!("Server stopped, closing database");
    close_db(db_connection)?;

    Ok(())
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().pretty())
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
        // Errors are logged by the handlers, so skip the default 5xx logging.
        .on_failure(());

    router.layer(tracing_layer)
}
