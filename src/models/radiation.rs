use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── NASA POWER daily point wire types ───────────────────────────────────────
//
// {"properties": {"parameter": {"CLRSKY_SFC_SW_DWN": {"20230621": 8.12},
//                               "ALLSKY_SRF_ALB":    {"20230621": 0.17}}}}

#[derive(Debug, Deserialize)]
pub struct PowerApiResponse {
    pub properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
pub struct PowerProperties {
    pub parameter: PowerParameters,
}

#[derive(Debug, Deserialize)]
pub struct PowerParameters {
    /// Clear-sky surface shortwave downward irradiance (kWh/m²/day)
    #[serde(rename = "CLRSKY_SFC_SW_DWN", default)]
    pub clear_sky_sw_down: HashMap<String, Option<f64>>,
    /// All-sky surface albedo
    #[serde(rename = "ALLSKY_SRF_ALB", default)]
    pub surface_albedo: HashMap<String, Option<f64>>,
}

// ─── Merged estimate handed to the irradiance model ──────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RadiationSource {
    /// Averaged from at least one successful year
    Measured,
    /// No year succeeded, or offline mode
    Default,
}

/// One successful year from the radiation API.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearSample {
    pub year: i32,
    pub radiation: f64,
    pub albedo: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RadiationEstimate {
    pub irradiance_w_m2: f64,
    pub albedo: f64,
    pub source: RadiationSource,
    pub years_requested: Vec<i32>,
    pub years_used: Vec<i32>,
}
