/// ============================================================
///  Plane-of-array irradiance decomposition
///
///   E_dir  = E · (1 − ψ) · cos θ          (only while cos θ > 0)
///   E_dif  = E · ψ · (1 + cos B) / 2      (isotropic sky view factor)
///   E_ref  = E · a · (1 − cos B) / 2      (ground view factor)
///   E_tot  = E_dir + E_dif + E_ref
/// ============================================================

use std::f64::consts::PI;
use std::ops::RangeInclusive;

use crate::models::irradiance::{DateSample, IncidenceResult, IrradianceComponents};
use crate::services::solar_geometry;

const DEG: f64 = PI / 180.0;

pub const HOURS_PER_DAY: u32 = 24;
pub const TILT_SWEEP_DEG: RangeInclusive<u32> = 10..=80;

/// Splits `e` into direct, diffuse and reflected parts on a panel tilted by
/// `tilt_deg`. `cos_incidence` must be the unclamped cosine so a sun behind
/// the panel suppresses the beam term.
pub fn decompose(e: f64, psi: f64, albedo: f64, cos_incidence: f64, tilt_deg: f64) -> IrradianceComponents {
    let cos_tilt = (tilt_deg * DEG).cos();
    let direct = if cos_incidence > 0.0 {
        e * (1.0 - psi) * cos_incidence
    } else {
        0.0
    };
    let diffuse = e * psi * (1.0 + cos_tilt) / 2.0;
    let reflected = e * albedo * (1.0 - cos_tilt) / 2.0;
    IrradianceComponents::new(direct, diffuse, reflected)
}

/// Chart sample: a panel that does not face the sun at all collects nothing,
/// which keeps night hours at zero for the curve fit.
fn curve_sample(e: f64, psi: f64, albedo: f64, incidence: &IncidenceResult, tilt_deg: f64) -> IrradianceComponents {
    if incidence.cos_incidence <= 0.0 {
        IrradianceComponents::default()
    } else {
        decompose(e, psi, albedo, incidence.cos_incidence, tilt_deg)
    }
}

/// Instantaneous values at ω = 0, independent of the clock time.
pub fn snapshot(
    e: f64,
    psi: f64,
    albedo: f64,
    tilt_deg: f64,
    latitude_deg: f64,
    date: &DateSample,
) -> (IncidenceResult, IrradianceComponents) {
    let incidence = solar_geometry::incidence_at_hour_angle(date, latitude_deg, tilt_deg, 0.0);
    let components = decompose(e, psi, albedo, incidence.cos_incidence, tilt_deg);
    (incidence, components)
}

/// One sample per integer hour 0..=23.
pub fn daily_curve(
    e: f64,
    psi: f64,
    albedo: f64,
    tilt_deg: f64,
    latitude_deg: f64,
    date: &DateSample,
) -> Vec<IrradianceComponents> {
    (0..HOURS_PER_DAY)
        .map(|hour| {
            let incidence = solar_geometry::incidence(date, latitude_deg, tilt_deg, hour as f64);
            let sample = curve_sample(e, psi, albedo, &incidence, tilt_deg);
            #[cfg(feature = "verbose_log")]
            log::debug!(
                "[CURVE] {} h={:02} cosθ={:.4} total={:.2} W/m²",
                date, hour, incidence.cos_incidence, sample.total
            );
            sample
        })
        .collect()
}

/// One sample per integer tilt in 10..=80 degrees, hour held fixed.
pub fn tilt_sweep(
    e: f64,
    psi: f64,
    albedo: f64,
    latitude_deg: f64,
    date: &DateSample,
    hour: f64,
) -> Vec<IrradianceComponents> {
    TILT_SWEEP_DEG
        .map(|tilt| {
            let tilt_deg = tilt as f64;
            let incidence = solar_geometry::incidence(date, latitude_deg, tilt_deg, hour);
            curve_sample(e, psi, albedo, &incidence, tilt_deg)
        })
        .collect()
}
