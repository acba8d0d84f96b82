use futures_util::future::join_all;
use reqwest::Client;

use crate::config::{ModelDefaults, RadiationApiConfig};
use crate::error::{IrradianceError, Result};
use crate::models::irradiance::{DateSample, GeoPosition};
use crate::models::radiation::{PowerApiResponse, RadiationEstimate, RadiationSource, YearSample};

/// Daily clear-sky kWh/m² → irradiance figure used by the model.
const RADIATION_SCALE: f64 = 100.0;
/// NASA POWER marks missing values with -999.
const FILL_VALUE: f64 = -999.0;

/// Years to query for a requested date. Dates past the archive's last
/// complete year are answered from a fixed set of recent years.
pub fn candidate_years(requested_year: i32, cfg: &RadiationApiConfig) -> Vec<i32> {
    if requested_year > cfg.latest_year && !cfg.fallback_years.is_empty() {
        cfg.fallback_years.clone()
    } else {
        vec![requested_year]
    }
}

fn date_key(date: &DateSample) -> String {
    format!("{}{:02}{:02}", date.year(), date.month(), date.day())
}

pub fn power_url(cfg: &RadiationApiConfig, position: &GeoPosition, date: &DateSample) -> String {
    let key = date_key(date);
    format!(
        "{}?parameters=CLRSKY_SFC_SW_DWN,ALLSKY_SRF_ALB&start={}&end={}&latitude={:.6}&longitude={:.6}&format=JSON&community=RE",
        cfg.base_url.trim_end_matches('/'),
        key,
        key,
        position.latitude,
        position.longitude
    )
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > FILL_VALUE)
}

/// Pulls the value for `date` out of a decoded response.
pub fn extract_year(resp: &PowerApiResponse, date: &DateSample) -> Result<YearSample> {
    let key = date_key(date);
    let params = &resp.properties.parameter;
    let radiation = usable(params.clear_sky_sw_down.get(&key).copied().flatten())
        .ok_or_else(|| IrradianceError::MissingData(key.clone()))?;
    let albedo = usable(params.surface_albedo.get(&key).copied().flatten());
    Ok(YearSample { year: date.year(), radiation, albedo })
}

async fn fetch_year(client: &Client, cfg: &RadiationApiConfig, position: &GeoPosition, date: DateSample) -> Result<YearSample> {
    let url = power_url(cfg, position, &date);
    log::debug!("[RADIATION] GET {}", url);
    let resp = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json::<PowerApiResponse>()
        .await?;
    extract_year(&resp, &date)
}

/// Averages the years that succeeded. Albedo comes from the last successful
/// year; with no success at all the configured defaults are returned.
pub fn merge_years(years_requested: Vec<i32>, results: Vec<Result<YearSample>>, defaults: &ModelDefaults) -> RadiationEstimate {
    let successes: Vec<YearSample> = results
        .into_iter()
        .filter_map(|r| match r {
            Ok(sample) => Some(sample),
            Err(e) => {
                log::warn!("[RADIATION] Year skipped: {}", e);
                None
            }
        })
        .collect();

    if successes.is_empty() {
        log::warn!(
            "[RADIATION] No data for years {:?}, using defaults E={} W/m², albedo={}",
            years_requested, defaults.irradiance_w_m2, defaults.albedo
        );
        return default_estimate(years_requested, defaults);
    }

    let mean = successes.iter().map(|s| s.radiation).sum::<f64>() / successes.len() as f64;
    let albedo = successes.last().and_then(|s| s.albedo).unwrap_or(defaults.albedo);
    let estimate = RadiationEstimate {
        irradiance_w_m2: mean * RADIATION_SCALE,
        albedo,
        source: RadiationSource::Measured,
        years_requested,
        years_used: successes.iter().map(|s| s.year).collect(),
    };
    log::info!(
        "[RADIATION] Averaged {} of {} years: E={:.2} W/m², albedo={:.2}",
        estimate.years_used.len(),
        estimate.years_requested.len(),
        estimate.irradiance_w_m2,
        estimate.albedo
    );
    estimate
}

pub fn default_estimate(years_requested: Vec<i32>, defaults: &ModelDefaults) -> RadiationEstimate {
    RadiationEstimate {
        irradiance_w_m2: defaults.irradiance_w_m2,
        albedo: defaults.albedo,
        source: RadiationSource::Default,
        years_requested,
        years_used: Vec::new(),
    }
}

/// Irradiance and albedo for a date and location.
///
/// One request per candidate year runs concurrently; the results are
/// merged once all of them have finished. Never fails: any gap is filled
/// from `defaults`.
pub async fn lookup(
    client: &Client,
    cfg: &RadiationApiConfig,
    defaults: &ModelDefaults,
    offline: bool,
    position: GeoPosition,
    date: DateSample,
) -> RadiationEstimate {
    let years = candidate_years(date.year(), cfg);
    if offline {
        log::info!("[RADIATION] Offline mode, using defaults for {}", date);
        return default_estimate(years, defaults);
    }

    let requests = years.iter().filter_map(|&year| match date.with_year(year) {
        Ok(d) => Some(fetch_year(client, cfg, &position, d)),
        Err(e) => {
            log::warn!("[RADIATION] Skipping year {}: {}", year, e);
            None
        }
    });
    let results = join_all(requests).await;

    merge_years(years, results, defaults)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(year: i32, radiation: f64, albedo: Option<f64>) -> Result<YearSample> {
        Ok(YearSample { year, radiation, albedo })
    }

    #[test]
    fn test_candidate_years() {
        let cfg = RadiationApiConfig::default();
        assert_eq!(candidate_years(2025, &cfg), vec![2021, 2022, 2023]);
        assert_eq!(candidate_years(2023, &cfg), vec![2023]);
        assert_eq!(candidate_years(2010, &cfg), vec![2010]);
    }

    #[test]
    fn test_power_url() {
        let cfg = RadiationApiConfig::default();
        let pos = GeoPosition::new(48.45, 31.0).unwrap();
        let date = DateSample::new(5, 6, 2023).unwrap();
        let url = power_url(&cfg, &pos, &date);
        assert!(url.starts_with("https://power.larc.nasa.gov/api/temporal/daily/point?"));
        assert!(url.contains("start=20230605&end=20230605"));
        assert!(url.contains("latitude=48.450000&longitude=31.000000"));
        assert!(url.contains("parameters=CLRSKY_SFC_SW_DWN,ALLSKY_SRF_ALB"));
        assert!(url.ends_with("community=RE"));
    }

    #[test]
    fn test_extract_year_from_payload() {
        let json = r#"{"properties":{"parameter":{
            "CLRSKY_SFC_SW_DWN":{"20230621":8.12},
            "ALLSKY_SRF_ALB":{"20230621":-999.0}}}}"#;
        let resp: PowerApiResponse = serde_json::from_str(json).unwrap();
        let date = DateSample::new(21, 6, 2023).unwrap();
        let s = extract_year(&resp, &date).unwrap();
        assert_eq!(s.year, 2023);
        assert_eq!(s.radiation, 8.12);
        assert_eq!(s.albedo, None, "Fill value must count as missing");

        let other = DateSample::new(22, 6, 2023).unwrap();
        assert!(matches!(extract_year(&resp, &other), Err(IrradianceError::MissingData(_))));
    }

    #[test]
    fn test_merge_averages_successes() {
        let defaults = ModelDefaults::default();
        let est = merge_years(
            vec![2021, 2022, 2023],
            vec![
                sample(2021, 7.0, Some(0.15)),
                Err(IrradianceError::MissingData("20220621".into())),
                sample(2023, 8.0, Some(0.18)),
            ],
            &defaults,
        );
        assert_eq!(est.source, RadiationSource::Measured);
        assert!((est.irradiance_w_m2 - 750.0).abs() < 1e-9);
        assert_eq!(est.albedo, 0.18);
        assert_eq!(est.years_used, vec![2021, 2023]);
    }

    #[test]
    fn test_merge_albedo_from_last_success() {
        let defaults = ModelDefaults::default();
        let est = merge_years(vec![2021, 2022], vec![sample(2021, 6.0, Some(0.3)), sample(2022, 6.0, None)], &defaults);
        assert_eq!(est.albedo, defaults.albedo);
    }

    #[test]
    fn test_merge_without_success_uses_defaults() {
        let defaults = ModelDefaults::default();
        let est = merge_years(vec![2023], vec![Err(IrradianceError::MissingData("x".into()))], &defaults);
        assert_eq!(est.source, RadiationSource::Default);
        assert_eq!(est.irradiance_w_m2, 800.0);
        assert_eq!(est.albedo, 0.2);
        assert!(est.years_used.is_empty());
    }

    #[tokio::test]
    async fn test_offline_lookup_uses_defaults() {
        let client = Client::new();
        let cfg = RadiationApiConfig::default();
        let defaults = ModelDefaults::default();
        let est = lookup(
            &client,
            &cfg,
            &defaults,
            true,
            GeoPosition::new(48.0, 31.0).unwrap(),
            DateSample::new(21, 6, 2025).unwrap(),
        )
        .await;
        assert_eq!(est.source, RadiationSource::Default);
        assert_eq!(est.irradiance_w_m2, 800.0);
        assert_eq!(est.years_requested, vec![2021, 2022, 2023]);
    }

    #[tokio::test]
    async fn test_unreachable_api_falls_back() {
        let client = Client::new();
        let cfg = RadiationApiConfig {
            base_url: "http://127.0.0.1:9/power".to_string(),
            ..RadiationApiConfig::default()
        };
        let defaults = ModelDefaults::default();
        let est = lookup(
            &client,
            &cfg,
            &defaults,
            false,
            GeoPosition::new(48.0, 31.0).unwrap(),
            DateSample::new(21, 6, 2023).unwrap(),
        )
        .await;
        assert_eq!(est.source, RadiationSource::Default);
        assert_eq!(est.albedo, 0.2);
    }
}
