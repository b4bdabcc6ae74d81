use axum::ServiceExt;
use clap::Parser;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;

mod blog;
mod config;
mod error;
mod form;
mod routes;
mod state;
mod store;
mod telemetry;
mod views;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::parse();
    telemetry::init(&config)?;

    let posts = std::sync::Arc::new(store::file::FileStore::new(&config.store_path));
    let state = std::sync::Arc::new(state::State::new(posts, config.session_ttl()));

    let mut router = routes::app(state).layer(TraceLayer::new_for_http());
    if let Some(origin) = &config.cors_origin {
        let cors = CorsLayer::new()
            .allow_origin(tower_http::cors::AllowOrigin::exact(
                axum::http::HeaderValue::from_str(origin)?,
            ))
            .allow_headers(tower_http::cors::Any);
        router = router.layer(cors);
    }
    let app = NormalizePathLayer::trim_trailing_slash().layer(router);

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    tracing::info!(
        address = %config.listen,
        store = ?config.store_path,
        "serving blog admin"
    );

    axum::serve(
        listener,
        ServiceExt::<axum::extract::Request>::into_make_service(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutting down"),
        Err(err) => tracing::error!("error listening for shutdown signal: {err}"),
    }
}
