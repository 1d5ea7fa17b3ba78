use dotenvy::dotenv;
use stock_tracker::config::{database, server};
use stock_tracker::errors::{Error, Result};
use stock_tracker::web::{self, AppState};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env first so RUST_LOG from it is honoured
    dotenv().ok();

    // 2. Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 3. Load the server configuration
    let config = server::load_app_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!("Configuration loaded.");

    // 4. Connect and ensure tables
    let database_url = database::get_database_url(config.database_url.as_deref());
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Serve
    let addr = config.socket_addr()?;
    let app = web::build_app_router(AppState::new(db), &config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Stock tracker admin listening on http://{}", addr);

    axum::serve(listener, app).await.map_err(|e| Error::Server {
        message: e.to_string(),
    })
}
