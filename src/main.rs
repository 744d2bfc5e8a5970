use pvz_service::adapter::driven::{
    BcryptPasswordHasher, JwtTokenService, PostgresPickupPointRepository,
    PostgresProductRepository, PostgresReceptionRepository, PostgresUserRepository,
};
use pvz_service::adapter::driver::{create_router, AppState};
use pvz_service::adapter::{AppConfig, DatabaseMigration};

use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .envファイルから環境変数を読み込む
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    info!(
        host = %config.database.host,
        port = config.database.port,
        database = %config.database.database,
        "configuration loaded"
    );

    // 接続プールを作成
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.connection_string())
        .await?;
    info!("database connection pool created");

    DatabaseMigration::new(pool.clone()).run().await?;

    let state = AppState::new(
        Arc::new(PostgresPickupPointRepository::new(pool.clone())),
        Arc::new(PostgresReceptionRepository::new(pool.clone())),
        Arc::new(PostgresProductRepository::new(pool.clone())),
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(JwtTokenService::new(
            &config.auth.jwt_secret,
            config.auth.jwt_expire_hours,
        )),
        Arc::new(BcryptPasswordHasher::new(config.auth.bcrypt_cost)),
    );

    let app = create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(config.server.request_timeout))
            .layer(CorsLayer::permissive()),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "REST API server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("server stopped");
    Ok(())
}

// Ctrl-CまたはSIGTERMを待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}
