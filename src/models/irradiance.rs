use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{IrradianceError, Result};

// ─── Domain value types ──────────────────────────────────────────────────────

/// A calendar date that is known to exist.
///
/// Construction goes through chrono, so `30.02` or `31.04` never make it into
/// the geometry pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSample {
    date: NaiveDate,
}

impl DateSample {
    pub fn new(day: u32, month: u32, year: i32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .filter(|d| d.day() == day && d.month() == month)
            .map(|date| Self { date })
            .ok_or(IrradianceError::InvalidDate { day, month, year })
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Ordinal day counted from Jan 0 (Jan 1 → 1, Dec 31 → 365 or 366).
    pub fn day_of_year(&self) -> u32 {
        self.date.ordinal()
    }

    /// Same day and month in another year, if that year has it.
    pub fn with_year(&self, year: i32) -> Result<Self> {
        Self::new(self.day(), self.month(), year)
    }
}

impl FromStr for DateSample {
    type Err = IrradianceError;

    /// Parses `dd.mm.yyyy`.
    fn from_str(s: &str) -> Result<Self> {
        let parse_err = || IrradianceError::DateParse(s.to_string());
        let mut parts = s.trim().split('.');
        let (Some(d), Some(m), Some(y), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
            return Err(parse_err());
        };
        let day = d.parse::<u32>().map_err(|_| parse_err())?;
        let month = m.parse::<u32>().map_err(|_| parse_err())?;
        let year = y.parse::<i32>().map_err(|_| parse_err())?;
        Self::new(day, month, year)
    }
}

impl fmt::Display for DateSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}.{}", self.day(), self.month(), self.year())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPosition {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        Ok(Self {
            latitude: check_latitude(latitude)?,
            longitude: check_longitude(longitude)?,
        })
    }
}

/// Fixed panel parameters: tilt from horizontal plus the two sky/ground
/// fractions used by the view-factor terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct PanelConfig {
    pub tilt_deg: f64,
    pub diffuse_fraction: f64,
    pub albedo: f64,
}

impl PanelConfig {
    pub fn new(tilt_deg: f64, diffuse_fraction: f64, albedo: f64) -> Result<Self> {
        Ok(Self {
            tilt_deg: check_tilt(tilt_deg)?,
            diffuse_fraction: check_fraction("diffuse_fraction", diffuse_fraction)?,
            albedo: check_fraction("albedo", albedo)?,
        })
    }
}

/// Extraterrestrial or measured irradiance magnitude (W/m²).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct IrradianceInput {
    pub irradiance_w_m2: f64,
}

impl IrradianceInput {
    pub fn new(irradiance_w_m2: f64) -> Result<Self> {
        if !irradiance_w_m2.is_finite() {
            return Err(IrradianceError::NonFinite("irradiance_w_m2"));
        }
        if irradiance_w_m2 < 0.0 {
            return Err(IrradianceError::NegativeIrradiance(irradiance_w_m2));
        }
        Ok(Self { irradiance_w_m2 })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct IncidenceResult {
    /// Solar declination δ (rad)
    pub declination_rad: f64,
    /// Hour angle ω (rad), zero at solar noon
    pub hour_angle_rad: f64,
    /// Unclamped cos θ; negative when the sun is behind the panel
    pub cos_incidence: f64,
    /// θ = acos(clamp(cos θ, 0, 1)) in degrees, for display
    pub incidence_angle_deg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, ToSchema)]
pub struct IrradianceComponents {
    pub direct: f64,
    pub diffuse: f64,
    pub reflected: f64,
    pub total: f64,
}

impl IrradianceComponents {
    pub fn new(direct: f64, diffuse: f64, reflected: f64) -> Self {
        Self {
            direct,
            diffuse,
            reflected,
            total: direct + diffuse + reflected,
        }
    }
}

/// y = a·x² + b·x + c
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, ToSchema)]
pub struct RegressionCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl RegressionCoefficients {
    pub const DEGENERATE: Self = Self { a: 0.0, b: 0.0, c: 0.0 };

    pub fn evaluate(&self, x: f64) -> f64 {
        self.a * x * x + self.b * x + self.c
    }

    pub fn equation(&self) -> String {
        format!("y = {:.4}x² + {:.4}x + {:.4}", self.a, self.b, self.c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FitStatus {
    Fitted,
    /// Fewer than three samples above the threshold
    InsufficientData,
    /// Normal-equation determinant is zero
    SingularSystem,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct QuadraticFit {
    pub coefficients: RegressionCoefficients,
    pub status: FitStatus,
    /// Samples left after the threshold filter
    pub samples_used: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
}

// ─── Validation helpers ──────────────────────────────────────────────────────

pub fn check_latitude(latitude: f64) -> Result<f64> {
    if !latitude.is_finite() {
        return Err(IrradianceError::NonFinite("latitude"));
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(IrradianceError::LatitudeOutOfRange(latitude));
    }
    Ok(latitude)
}

pub fn check_longitude(longitude: f64) -> Result<f64> {
    if !longitude.is_finite() {
        return Err(IrradianceError::NonFinite("longitude"));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(IrradianceError::LongitudeOutOfRange(longitude));
    }
    Ok(longitude)
}

pub fn check_tilt(tilt_deg: f64) -> Result<f64> {
    if !tilt_deg.is_finite() {
        return Err(IrradianceError::NonFinite("tilt"));
    }
    if !(0.0..=90.0).contains(&tilt_deg) {
        return Err(IrradianceError::TiltOutOfRange(tilt_deg));
    }
    Ok(tilt_deg)
}

pub fn check_hour(hour: f64) -> Result<f64> {
    if !hour.is_finite() {
        return Err(IrradianceError::NonFinite("hour"));
    }
    if !(0.0..=24.0).contains(&hour) {
        return Err(IrradianceError::HourOutOfRange(hour));
    }
    Ok(hour)
}

pub fn check_fraction(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(IrradianceError::NonFinite(name));
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(IrradianceError::FractionOutOfRange { name, value });
    }
    Ok(value)
}

pub fn check_cos_incidence(cos_incidence: f64) -> Result<f64> {
    if !cos_incidence.is_finite() {
        return Err(IrradianceError::NonFinite("cos_incidence"));
    }
    if !(-1.0..=1.0).contains(&cos_incidence) {
        return Err(IrradianceError::CosineOutOfRange(cos_incidence));
    }
    Ok(cos_incidence)
}

// ─── REST API request types ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IncidenceQuery {
    /// Date as dd.mm.yyyy
    pub date: String,
    pub latitude: f64,
    pub tilt: f64,
    /// Hour of day, defaults to solar noon
    pub hour: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DecomposeRequest {
    pub irradiance_w_m2: f64,
    pub diffuse_fraction: f64,
    pub albedo: f64,
    pub cos_incidence: f64,
    pub tilt: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DailyCurveRequest {
    /// Date as dd.mm.yyyy
    pub date: String,
    pub latitude: f64,
    pub tilt: f64,
    pub irradiance_w_m2: f64,
    pub diffuse_fraction: Option<f64>,
    pub albedo: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TiltSweepRequest {
    /// Date as dd.mm.yyyy
    pub date: String,
    pub latitude: f64,
    pub irradiance_w_m2: f64,
    pub diffuse_fraction: Option<f64>,
    pub albedo: Option<f64>,
    /// Hour held fixed across the sweep, defaults to solar noon
    pub hour: Option<f64>,
}

/// Full calculation; missing irradiance/albedo are looked up from the
/// radiation source for the given location.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EstimateRequest {
    /// Date as dd.mm.yyyy
    pub date: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub tilt: f64,
    pub irradiance_w_m2: Option<f64>,
    pub diffuse_fraction: Option<f64>,
    pub albedo: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FitRequest {
    pub samples: Vec<SamplePoint>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RadiationQuery {
    /// Date as dd.mm.yyyy
    pub date: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OfflineModeRequest {
    pub enabled: bool,
}

// ─── REST API response types ─────────────────────────────────────────────────

/// Axis hints for the presentation layer.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChartHints {
    pub x_label: String,
    pub y_label: String,
    pub y_max: f64,
    pub y_min: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyCurveResponse {
    pub date: String,
    pub day_of_year: u32,
    pub hours: Vec<u32>,
    pub samples: Vec<IrradianceComponents>,
    pub fit: QuadraticFit,
    pub equation: String,
    /// Fitted parabola evaluated at each hour
    pub fitted: Vec<f64>,
    pub chart: ChartHints,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TiltSweepResponse {
    pub date: String,
    pub hour: f64,
    pub tilts: Vec<u32>,
    pub samples: Vec<IrradianceComponents>,
    pub chart: ChartHints,
}

/// Instantaneous values shown next to the charts.
#[derive(Debug, Serialize, ToSchema)]
pub struct Snapshot {
    pub incidence: IncidenceResult,
    pub components: IrradianceComponents,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EstimateResponse {
    pub position: GeoPosition,
    pub panel: PanelConfig,
    pub irradiance: IrradianceInput,
    /// "MEASURED", "DEFAULT" or "USER"
    pub irradiance_source: String,
    pub snapshot: Snapshot,
    pub daily_curve: DailyCurveResponse,
    pub tilt_sweep: TiltSweepResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub offline_mode: bool,
}
