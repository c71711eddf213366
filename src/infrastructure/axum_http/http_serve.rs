use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::config::config_model::DotEnvyConfig;
use crate::infrastructure::axum_http::{default_routers, routers};
use crate::infrastructure::cache::path_cache::PathVersionCache;
use crate::infrastructure::postgres::postgres_connection::PgPoolSquad;

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let cache = Arc::new(PathVersionCache::new());

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest(
            "/api/v1/plans",
            routers::plans::routes(Arc::clone(&db_pool), Arc::clone(&cache)),
        )
        .nest(
            "/api/v1/diaries",
            routers::diaries::routes(Arc::clone(&db_pool), Arc::clone(&cache)),
        )
        .nest(
            "/api/v1/routines",
            routers::routines::routes(Arc::clone(&db_pool), Arc::clone(&cache), false),
        )
        .nest(
            "/api/v1/preset-routines",
            routers::routines::routes(Arc::clone(&db_pool), Arc::clone(&cache), true),
        )
        .nest(
            "/api/v1/nutritional-plans",
            routers::nutritional_plans::routes(Arc::clone(&db_pool), Arc::clone(&cache), false),
        )
        .nest(
            "/api/v1/preset-nutritional-plans",
            routers::nutritional_plans::routes(Arc::clone(&db_pool), Arc::clone(&cache), true),
        )
        .nest(
            "/api/v1/payments",
            routers::payments::routes(Arc::clone(&db_pool), Arc::clone(&cache)),
        )
        .nest(
            "/api/v1/invoices",
            routers::invoices::routes(Arc::clone(&db_pool), Arc::clone(&cache)),
        )
        .nest(
            "/api/v1/replication",
            routers::replication::routes(Arc::clone(&db_pool), Arc::clone(&cache)),
        )
        .nest(
            "/api/v1/assignments",
            routers::assignments::routes(Arc::clone(&db_pool), Arc::clone(&cache)),
        )
        .nest(
            "/api/v1/transactions",
            routers::transactions::routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/api/v1/notifications",
            routers::notifications::routes(Arc::clone(&db_pool)),
        )
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout)))
        .layer(RequestBodyLimitLayer::new(
            (config.server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdow_signal())
        .await?;

    Ok(())
}

async fn shutdow_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
