use reqwest::Client;

use crate::config::Config;
use crate::error::Result;
use crate::models::irradiance::{
    check_fraction, check_tilt, ChartHints, DailyCurveResponse, DateSample, EstimateRequest, EstimateResponse, GeoPosition, IrradianceInput,
    PanelConfig, Snapshot, TiltSweepResponse,
};
use crate::models::radiation::RadiationSource;
use crate::services::irradiance_model::{self, HOURS_PER_DAY, TILT_SWEEP_DEG};
use crate::services::solar_geometry::SOLAR_NOON;
use crate::services::{radiation_service, regression};

const Y_LABEL: &str = "Irradiance on tilted panel surface (W/m²)";
/// Charts leave 20 % headroom above the input irradiance.
const CHART_HEADROOM: f64 = 1.2;
const DAILY_CHART_Y_MIN: f64 = -100.0;

/// 24-hour curve with its quadratic approximation.
pub fn daily_curve(input: IrradianceInput, panel: &PanelConfig, latitude_deg: f64, date: &DateSample) -> DailyCurveResponse {
    let e = input.irradiance_w_m2;
    let samples = irradiance_model::daily_curve(e, panel.diffuse_fraction, panel.albedo, panel.tilt_deg, latitude_deg, date);
    let totals: Vec<f64> = samples.iter().map(|s| s.total).collect();
    let fit = regression::fit_series(&totals);
    let hours: Vec<u32> = (0..HOURS_PER_DAY).collect();
    let fitted = hours.iter().map(|&h| fit.coefficients.evaluate(h as f64)).collect();

    DailyCurveResponse {
        date: date.to_string(),
        day_of_year: date.day_of_year(),
        hours,
        samples,
        equation: fit.coefficients.equation(),
        fit,
        fitted,
        chart: ChartHints {
            x_label: "Hour of day".to_string(),
            y_label: Y_LABEL.to_string(),
            y_max: e * CHART_HEADROOM,
            y_min: Some(DAILY_CHART_Y_MIN),
        },
    }
}

pub fn tilt_sweep(
    input: IrradianceInput,
    diffuse_fraction: f64,
    albedo: f64,
    latitude_deg: f64,
    date: &DateSample,
    hour: f64,
) -> TiltSweepResponse {
    let e = input.irradiance_w_m2;
    TiltSweepResponse {
        date: date.to_string(),
        hour,
        tilts: TILT_SWEEP_DEG.collect(),
        samples: irradiance_model::tilt_sweep(e, diffuse_fraction, albedo, latitude_deg, date, hour),
        chart: ChartHints {
            x_label: "Panel tilt angle (°)".to_string(),
            y_label: Y_LABEL.to_string(),
            y_max: e * CHART_HEADROOM,
            y_min: None,
        },
    }
}

/// Full calculation for one panel: noon snapshot, daily curve with fit and a
/// tilt sweep. Irradiance or albedo left out of the request are looked up
/// from the radiation source.
pub async fn estimate(client: &Client, config: &Config, offline: bool, req: &EstimateRequest) -> Result<EstimateResponse> {
    let defaults = &config.defaults;
    let date: DateSample = req.date.parse()?;
    let position = GeoPosition::new(
        req.latitude.unwrap_or(defaults.latitude),
        req.longitude.unwrap_or(defaults.longitude),
    )?;
    let tilt = check_tilt(req.tilt)?;
    let diffuse_fraction = check_fraction("diffuse_fraction", req.diffuse_fraction.unwrap_or(defaults.diffuse_fraction))?;
    if let Some(e) = req.irradiance_w_m2 {
        IrradianceInput::new(e)?;
    }
    if let Some(a) = req.albedo {
        check_fraction("albedo", a)?;
    }

    let (irradiance_w_m2, albedo, irradiance_source) = match (req.irradiance_w_m2, req.albedo) {
        (Some(e), Some(a)) => (e, a, "USER".to_string()),
        (e, a) => {
            let found =
                radiation_service::lookup(client, &config.radiation_api, defaults, offline, position, date).await;
            let source = match (e, found.source) {
                (Some(_), _) => "USER",
                (None, RadiationSource::Measured) => "MEASURED",
                (None, RadiationSource::Default) => "DEFAULT",
            };
            (e.unwrap_or(found.irradiance_w_m2), a.unwrap_or(found.albedo), source.to_string())
        }
    };

    let input = IrradianceInput::new(irradiance_w_m2)?;
    let panel = PanelConfig::new(tilt, diffuse_fraction, albedo)?;
    let e = input.irradiance_w_m2;

    let (incidence, components) = irradiance_model::snapshot(
        e,
        panel.diffuse_fraction,
        panel.albedo,
        panel.tilt_deg,
        position.latitude,
        &date,
    );
    log::info!(
        "[ESTIMATE] {} φ={:.2} B={:.1} E={:.2} → θ={:.2}° total={:.2} W/m²",
        date, position.latitude, panel.tilt_deg, e, incidence.incidence_angle_deg, components.total
    );

    Ok(EstimateResponse {
        position,
        panel,
        irradiance: input,
        irradiance_source,
        snapshot: Snapshot { incidence, components },
        daily_curve: daily_curve(input, &panel, position.latitude, &date),
        tilt_sweep: tilt_sweep(input, panel.diffuse_fraction, panel.albedo, position.latitude, &date, SOLAR_NOON),
    })
}
