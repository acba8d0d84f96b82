/// ============================================================
///  Solar geometry for a fixed, equator-facing tilted panel
///
///   1. Declination    – single-harmonic Cooper approximation
///   2. Hour angle     – 15°/h from solar noon
///   3. Incidence      – cos θ on a plane tilted by B at latitude φ
///                       (the plane behaves like a horizontal one at φ − B)
///
///  No leap-year, equation-of-time or refraction corrections.
/// ============================================================

use std::f64::consts::PI;

use crate::models::irradiance::{DateSample, IncidenceResult};

// ─── Constants ───────────────────────────────────────────────
const DEG: f64 = PI / 180.0;
pub const AXIAL_TILT_DEG: f64 = 23.45;
pub const DEG_PER_HOUR: f64 = 15.0;
pub const SOLAR_NOON: f64 = 12.0;

/// Solar declination δ in radians for a 1-based day of year.
pub fn declination(day_of_year: u32) -> f64 {
    let delta_deg = AXIAL_TILT_DEG * (360.0 / 365.0 * (284.0 + day_of_year as f64) * DEG).sin();
    delta_deg * DEG
}

/// Hour angle ω in radians; negative in the morning, zero at noon.
pub fn hour_angle(hour: f64) -> f64 {
    (hour - SOLAR_NOON) * DEG_PER_HOUR * DEG
}

/// Raw (unclamped) cosine of the incidence angle.
pub fn cos_incidence(declination_rad: f64, latitude_deg: f64, tilt_deg: f64, hour_angle_rad: f64) -> f64 {
    let effective_lat = (latitude_deg - tilt_deg) * DEG;
    declination_rad.sin() * effective_lat.sin()
        + declination_rad.cos() * effective_lat.cos() * hour_angle_rad.cos()
}

pub fn incidence_at_hour_angle(
    date: &DateSample,
    latitude_deg: f64,
    tilt_deg: f64,
    hour_angle_rad: f64,
) -> IncidenceResult {
    let declination_rad = declination(date.day_of_year());
    let cos_theta = cos_incidence(declination_rad, latitude_deg, tilt_deg, hour_angle_rad);
    IncidenceResult {
        declination_rad,
        hour_angle_rad,
        cos_incidence: cos_theta,
        incidence_angle_deg: cos_theta.clamp(0.0, 1.0).acos() / DEG,
    }
}

/// Main entry point – incidence on the panel at a given hour of the day.
///
/// * `date`         – validated calendar date
/// * `latitude_deg` – geographic latitude (−90 … +90)
/// * `tilt_deg`     – panel inclination from horizontal
/// * `hour`         – local solar hour (0 … 24)
pub fn incidence(date: &DateSample, latitude_deg: f64, tilt_deg: f64, hour: f64) -> IncidenceResult {
    incidence_at_hour_angle(date, latitude_deg, tilt_deg, hour_angle(hour))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn june_21() -> DateSample {
        DateSample::new(21, 6, 2025).unwrap()
    }

    #[test]
    fn test_declination_extremes() {
        // Day 172 (June 21) sits at the northern maximum
        let summer = declination(172) / DEG;
        assert!((summer - 23.45).abs() < 0.01, "Summer declination should be ≈23.45°, got {:.3}", summer);
        // Day 355 (Dec 21) sits at the southern minimum
        let winter = declination(355) / DEG;
        assert!((winter + 23.45).abs() < 0.01, "Winter declination should be ≈−23.45°, got {:.3}", winter);
        // Day 81 is the spring equinox in this model
        assert!(declination(81).abs() < 0.01, "Equinox declination should be ≈0");
    }

    #[test]
    fn test_hour_angle() {
        assert_eq!(hour_angle(12.0), 0.0);
        assert!((hour_angle(13.0) - 15.0 * DEG).abs() < EPS);
        assert!((hour_angle(6.0) + PI / 2.0).abs() < EPS);
        assert!((hour_angle(0.0) + PI).abs() < EPS);
    }

    #[test]
    fn test_summer_noon_incidence() {
        let r = incidence(&june_21(), 48.0, 30.0, 12.0);
        // cos θ = cos(φ − B − δ) at noon
        let expected = ((48.0 - 30.0) * DEG - r.declination_rad).cos();
        assert!((r.cos_incidence - expected).abs() < EPS);
        assert!(r.cos_incidence > 0.9, "Noon incidence should be near-normal, got {:.3}", r.cos_incidence);
        assert!(r.incidence_angle_deg < 10.0, "θ should be small, got {:.2}°", r.incidence_angle_deg);
        assert_eq!(r.hour_angle_rad, 0.0);
    }

    #[test]
    fn test_midnight_is_behind_panel() {
        let r = incidence(&june_21(), 48.0, 30.0, 0.0);
        assert!(r.cos_incidence < 0.0, "Midnight cos θ must be negative, got {:.3}", r.cos_incidence);
        // Display angle is clamped at 90°
        assert!((r.incidence_angle_deg - 90.0).abs() < EPS);
    }

    #[test]
    fn test_hour_angle_symmetry() {
        let d = june_21();
        let morning = incidence(&d, 48.0, 30.0, 9.0);
        let afternoon = incidence(&d, 48.0, 30.0, 15.0);
        assert!((morning.cos_incidence - afternoon.cos_incidence).abs() < EPS);
    }

    #[test]
    fn test_snapshot_matches_noon() {
        let d = june_21();
        let snapshot = incidence_at_hour_angle(&d, 48.0, 30.0, 0.0);
        let noon = incidence(&d, 48.0, 30.0, SOLAR_NOON);
        assert_eq!(snapshot, noon);
    }
}
