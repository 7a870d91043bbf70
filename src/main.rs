use report_board::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    repository::{ReportRepository, RepositoryState, SqliteReportRepository},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, sets up logging, prepares the report table and serves the board.
#[tokio::main]
async fn main() {
    // Configuration (fail-fast on missing production secrets).
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // RUST_LOG wins; otherwise DEBUG picks between verbose and quiet defaults.
    let default_filter = if config.debug {
        "report_board=debug,tower_http=debug,axum=trace"
    } else {
        "report_board=info,tower_http=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // Embedded store. The table is created on every start; the statement is idempotent.
    let repo = SqliteReportRepository::connect(&config.db_url)
        .await
        .expect("FATAL: Failed to open the SQLite database. Check DATABASE_URL.");
    repo.create_tables()
        .await
        .expect("FATAL: Failed to create the report table.");
    let repo = Arc::new(repo) as RepositoryState;

    let bind_addr = config.bind_addr();
    let app_state = AppState::new(repo, config).expect("FATAL: Invalid SECRET_KEY.");
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind the HTTP listener. Check HOST and PORT.");
    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
