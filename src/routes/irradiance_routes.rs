use axum::{routing::{get, post}, Router};
use crate::controllers::irradiance_controller::{
    // Core model
    get_incidence, decompose, daily_curve, tilt_sweep, estimate, fit,
    // Radiation source
    get_radiation,
    // Settings, system & health
    get_offline_mode, set_offline_mode, get_system_config, health,
};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/geometry/incidence",      get(get_incidence))
        .route("/irradiance/decompose",    post(decompose))
        .route("/irradiance/daily-curve",  post(daily_curve))
        .route("/irradiance/tilt-sweep",   post(tilt_sweep))
        .route("/irradiance/estimate",     post(estimate))
        .route("/regression/fit",          post(fit))
        .route("/radiation",               get(get_radiation))
        .route("/settings/offline-mode",   get(get_offline_mode).post(set_offline_mode))
        .route("/system/config",           get(get_system_config))
        .route("/health",                  get(health))
        .with_state(state)
}
