mod routes;
mod controllers;
mod services;
mod models;
mod api_docs;
mod shared_state;
mod config;
mod error;
mod logging;

use std::net::SocketAddr;
use axum::{Router, routing::get, response::Html};
use crate::routes::irradiance_routes::api_routes;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;
use crate::api_docs::ApiDoc;
use crate::shared_state::AppState;
use crate::config::Config;

use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

const CONFIG_PATH: &str = "config.json";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration
    let (config, found) = match Config::load_or_default(CONFIG_PATH) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load {}: {}", CONFIG_PATH, e);
            return Err(e.into());
        }
    };

    // 2. Logging
    logging::init_logger(&config.log_level);
    if found {
        log::info!("Configuration loaded from {}", CONFIG_PATH);
    } else {
        log::warn!("{} not found, running with built-in defaults", CONFIG_PATH);
    }
    log::info!(
        "Defaults: E={} W/m², albedo={}, ψ={}, offline={}",
        config.defaults.irradiance_w_m2,
        config.defaults.albedo,
        config.defaults.diffuse_fraction,
        config.offline_mode
    );

    // 3. Initialize shared state
    let server_port = config.server.port;
    let static_dir = config.server.static_dir.clone();
    let state = AppState::new(config)?;

    // 4. Start Axum HTTP server
    let app = Router::new()
        .nest("/api", api_routes(state.clone()))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .fallback_service(ServeDir::new(&static_dir))
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    log::info!("API Server listening on http://{}", addr);
    log::info!("Scalar UI: http://{}/scalar", addr);
    log::info!("Static front-end: {}/", static_dir);

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
