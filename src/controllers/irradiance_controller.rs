use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

use crate::config::ModelDefaults;
use crate::error::Result;
use crate::models::irradiance::{
    check_cos_incidence, check_fraction, check_hour, check_latitude, check_tilt, DailyCurveRequest, DailyCurveResponse, DateSample, DecomposeRequest,
    EstimateRequest, EstimateResponse, FitRequest, GeoPosition, HealthStatus, IncidenceQuery, IncidenceResult,
    IrradianceComponents, IrradianceInput, OfflineModeRequest, PanelConfig, QuadraticFit, RadiationQuery,
    TiltSweepRequest, TiltSweepResponse,
};
use crate::models::radiation::RadiationEstimate;
use crate::services::solar_geometry::{self, SOLAR_NOON};
use crate::services::{irradiance_model, irradiance_service, radiation_service, regression};
use crate::shared_state::AppState;

/// GET /api/geometry/incidence
/// Solar incidence on a tilted panel
///
/// Returns declination, hour angle and the incidence cosine for the given
/// date, latitude, tilt and hour (solar noon when omitted).
#[utoipa::path(
    get,
    path = "/api/geometry/incidence",
    params(IncidenceQuery),
    responses(
        (status = 200, description = "Incidence geometry", body = IncidenceResult),
        (status = 400, description = "Invalid date or out-of-range input")
    )
)]
pub async fn get_incidence(Query(q): Query<IncidenceQuery>) -> Result<impl IntoResponse> {
    let date: DateSample = q.date.parse()?;
    let latitude = check_latitude(q.latitude)?;
    let tilt = check_tilt(q.tilt)?;
    let hour = check_hour(q.hour.unwrap_or(SOLAR_NOON))?;
    Ok(Json(solar_geometry::incidence(&date, latitude, tilt, hour)))
}

/// POST /api/irradiance/decompose
/// Split irradiance into direct, diffuse and reflected parts
#[utoipa::path(
    post,
    path = "/api/irradiance/decompose",
    request_body = DecomposeRequest,
    responses(
        (status = 200, description = "Irradiance components", body = IrradianceComponents),
        (status = 400, description = "Out-of-range input")
    )
)]
pub async fn decompose(Json(req): Json<DecomposeRequest>) -> Result<impl IntoResponse> {
    let input = IrradianceInput::new(req.irradiance_w_m2)?;
    let panel = PanelConfig::new(req.tilt, req.diffuse_fraction, req.albedo)?;
    let cos_incidence = check_cos_incidence(req.cos_incidence)?;
    Ok(Json(irradiance_model::decompose(
        input.irradiance_w_m2,
        panel.diffuse_fraction,
        panel.albedo,
        cos_incidence,
        panel.tilt_deg,
    )))
}

/// POST /api/irradiance/daily-curve
/// Hourly irradiance over a day with its quadratic approximation
#[utoipa::path(
    post,
    path = "/api/irradiance/daily-curve",
    request_body = DailyCurveRequest,
    responses(
        (status = 200, description = "24 hourly samples, fit and fitted values", body = DailyCurveResponse),
        (status = 400, description = "Invalid date or out-of-range input")
    )
)]
pub async fn daily_curve(State(state): State<AppState>, Json(req): Json<DailyCurveRequest>) -> Result<impl IntoResponse> {
    let defaults = &state.config.defaults;
    let date: DateSample = req.date.parse()?;
    let latitude = check_latitude(req.latitude)?;
    let input = IrradianceInput::new(req.irradiance_w_m2)?;
    let panel = PanelConfig::new(
        req.tilt,
        req.diffuse_fraction.unwrap_or(defaults.diffuse_fraction),
        req.albedo.unwrap_or(defaults.albedo),
    )?;
    Ok(Json(irradiance_service::daily_curve(input, &panel, latitude, &date)))
}

/// POST /api/irradiance/tilt-sweep
/// Irradiance for tilt angles 10°..80° at a fixed hour
#[utoipa::path(
    post,
    path = "/api/irradiance/tilt-sweep",
    request_body = TiltSweepRequest,
    responses(
        (status = 200, description = "71 samples, one per degree of tilt", body = TiltSweepResponse),
        (status = 400, description = "Invalid date or out-of-range input")
    )
)]
pub async fn tilt_sweep(State(state): State<AppState>, Json(req): Json<TiltSweepRequest>) -> Result<impl IntoResponse> {
    let defaults = &state.config.defaults;
    let date: DateSample = req.date.parse()?;
    let latitude = check_latitude(req.latitude)?;
    let input = IrradianceInput::new(req.irradiance_w_m2)?;
    let hour = check_hour(req.hour.unwrap_or(SOLAR_NOON))?;
    // Tilt varies across the sweep; only the fractions need checking
    let psi = check_fraction("diffuse_fraction", req.diffuse_fraction.unwrap_or(defaults.diffuse_fraction))?;
    let albedo = check_fraction("albedo", req.albedo.unwrap_or(defaults.albedo))?;
    Ok(Json(irradiance_service::tilt_sweep(input, psi, albedo, latitude, &date, hour)))
}

/// POST /api/irradiance/estimate
/// Full calculation for one panel
///
/// Noon snapshot (hour angle fixed at 0), daily curve with regression and a
/// noon tilt sweep. Missing irradiance or albedo are looked up from the
/// radiation source, or fall back to the configured defaults.
#[utoipa::path(
    post,
    path = "/api/irradiance/estimate",
    request_body = EstimateRequest,
    responses(
        (status = 200, description = "Snapshot, curves and fit", body = EstimateResponse),
        (status = 400, description = "Invalid date or out-of-range input")
    )
)]
pub async fn estimate(State(state): State<AppState>, Json(req): Json<EstimateRequest>) -> Result<impl IntoResponse> {
    let response = irradiance_service::estimate(&state.http, &state.config, state.is_offline(), &req).await?;
    Ok(Json(response))
}

/// POST /api/regression/fit
/// Least-squares parabola through arbitrary samples
///
/// Samples with y ≤ 0.1 are ignored. Too few samples or a singular system
/// answer 200 with zero coefficients and a non-FITTED status.
#[utoipa::path(
    post,
    path = "/api/regression/fit",
    request_body = FitRequest,
    responses(
        (status = 200, description = "Coefficients and fit status", body = QuadraticFit)
    )
)]
pub async fn fit(Json(req): Json<FitRequest>) -> impl IntoResponse {
    Json(regression::fit(&req.samples))
}

/// GET /api/radiation
/// Historical irradiance and albedo for a date and location
#[utoipa::path(
    get,
    path = "/api/radiation",
    params(RadiationQuery),
    responses(
        (status = 200, description = "Averaged or default radiation", body = RadiationEstimate),
        (status = 400, description = "Invalid date or position")
    )
)]
pub async fn get_radiation(State(state): State<AppState>, Query(q): Query<RadiationQuery>) -> Result<impl IntoResponse> {
    let date: DateSample = q.date.parse()?;
    let position = GeoPosition::new(q.latitude, q.longitude)?;
    let estimate = radiation_service::lookup(
        &state.http,
        &state.config.radiation_api,
        &state.config.defaults,
        state.is_offline(),
        position,
        date,
    )
    .await;
    Ok(Json(estimate))
}

/// GET /api/settings/offline-mode
#[utoipa::path(
    get,
    path = "/api/settings/offline-mode",
    responses((status = 200, description = "Current offline flag"))
)]
pub async fn get_offline_mode(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "enabled": state.is_offline() }))
}

/// POST /api/settings/offline-mode
/// While enabled the radiation source is never contacted.
#[utoipa::path(
    post,
    path = "/api/settings/offline-mode",
    request_body = OfflineModeRequest,
    responses((status = 200, description = "Offline flag updated"))
)]
pub async fn set_offline_mode(State(state): State<AppState>, Json(req): Json<OfflineModeRequest>) -> impl IntoResponse {
    state.set_offline(req.enabled);
    log::info!("[SETTINGS] Offline mode {}", if req.enabled { "enabled" } else { "disabled" });
    Json(serde_json::json!({ "enabled": req.enabled }))
}

/// GET /api/system/config
/// Defaults applied when a request or the radiation source leaves a value out
#[utoipa::path(
    get,
    path = "/api/system/config",
    responses((status = 200, description = "Configured model defaults", body = ModelDefaults))
)]
pub async fn get_system_config(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.config.defaults.clone())
}

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service health", body = HealthStatus))
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthStatus {
        status: "UP".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        offline_mode: state.is_offline(),
    })
}
