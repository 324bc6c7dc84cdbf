use farmstand::cart::CartStore;
use farmstand::config::AppConfig;
use farmstand::errors::AppError;
use farmstand::state::AppState;
use farmstand::store::PgCheckoutStore;
use farmstand::{flows, web as app_web};

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!("Starting farmstand marketplace server...");

    let app_config = match AppConfig::from_env() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load application configuration.");
            panic!("Configuration error: {}", e);
        }
    };

    let db_pool = match PgPool::connect(&app_config.database_url).await {
        Ok(pool) => {
            tracing::info!("Successfully connected to the database.");
            pool
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to the database.");
            panic!("Database connection error: {}", e);
        }
    };

    // FlowRegistry<AppError> so registry dispatch returns our AppError.
    let flow_registry = Arc::new(trellis::FlowRegistry::<AppError>::new());
    flows::register_all_flows(&flow_registry);

    let app_state = AppState {
        db_pool: db_pool.clone(),
        flows: flow_registry,
        carts: CartStore::new(app_config.cart_retention),
        checkout_store: Arc::new(PgCheckoutStore::new(db_pool)),
        config: app_config.clone(),
    };

    let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
    tracing::info!("Attempting to bind server to {}...", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(actix_data::Data::new(app_state.clone()))
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(app_web::configure_app_routes)
    })
    .bind(&server_address)?
    .run()
    .await
}
