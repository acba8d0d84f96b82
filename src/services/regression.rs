/// Least-squares parabola y = a·x² + b·x + c via the normal equations,
/// solved with Cramer's rule.
///
/// Samples at or below `MIN_IRRADIANCE` are dropped first so dark hours do
/// not drag the vertex down. Degenerate inputs yield the all-zero
/// coefficients and a logged warning instead of an error.

use crate::models::irradiance::{FitStatus, QuadraticFit, RegressionCoefficients, SamplePoint};

pub const MIN_IRRADIANCE: f64 = 0.1;
pub const MIN_SAMPLES: usize = 3;
/// |D| at or below this share of its expansion terms counts as zero.
const SINGULAR_TOLERANCE: f64 = 64.0 * f64::EPSILON;

#[derive(Debug, Default)]
struct PowerSums {
    n: f64,
    x: f64,
    x2: f64,
    x3: f64,
    x4: f64,
    y: f64,
    xy: f64,
    x2y: f64,
}

impl PowerSums {
    fn accumulate<'a>(points: impl Iterator<Item = &'a SamplePoint>) -> Self {
        points.fold(Self::default(), |mut s, p| {
            let x = p.x;
            s.n += 1.0;
            s.x += x;
            s.x2 += x * x;
            s.x3 += x * x * x;
            s.x4 += x * x * x * x;
            s.y += p.y;
            s.xy += x * p.y;
            s.x2y += x * x * p.y;
            s
        })
    }

    /// Determinant of the normal-equation matrix and the summed magnitude of
    /// the products it is built from.
    fn determinant(&self) -> (f64, f64) {
        let terms = [
            self.x4 * self.x2 * self.n,
            self.x4 * self.x * self.x,
            self.x3 * self.x3 * self.n,
            self.x3 * self.x * self.x2,
            self.x2 * self.x3 * self.x,
            self.x2 * self.x2 * self.x2,
        ];
        let d = self.x4 * (self.x2 * self.n - self.x * self.x) - self.x3 * (self.x3 * self.n - self.x * self.x2)
            + self.x2 * (self.x3 * self.x - self.x2 * self.x2);
        (d, terms.iter().map(|t| t.abs()).sum())
    }
}

pub fn fit(samples: &[SamplePoint]) -> QuadraticFit {
    let kept: Vec<&SamplePoint> = samples.iter().filter(|p| p.y > MIN_IRRADIANCE).collect();

    if kept.len() < MIN_SAMPLES {
        log::warn!(
            "[REGRESSION] Insufficient data: {} of {} samples above {} (need {})",
            kept.len(),
            samples.len(),
            MIN_IRRADIANCE,
            MIN_SAMPLES
        );
        return degenerate(FitStatus::InsufficientData, kept.len());
    }

    let s = PowerSums::accumulate(kept.iter().copied());

    let (d, scale) = s.determinant();

    // Repeated fractional abscissae leave rounding noise instead of an exact zero
    if !d.is_finite() || d.abs() <= SINGULAR_TOLERANCE * scale {
        log::warn!("[REGRESSION] Singular system (D = {}) over {} samples", d, kept.len());
        return degenerate(FitStatus::SingularSystem, kept.len());
    }

    let da = s.x2y * (s.x2 * s.n - s.x * s.x) - s.x3 * (s.xy * s.n - s.x * s.y) + s.x2 * (s.xy * s.x - s.x2 * s.y);
    let db = s.x4 * (s.xy * s.n - s.x * s.y) - s.x2y * (s.x3 * s.n - s.x * s.x2) + s.x2 * (s.x3 * s.y - s.xy * s.x2);
    let dc = s.x4 * (s.x2 * s.y - s.xy * s.x) - s.x3 * (s.x3 * s.y - s.xy * s.x2) + s.x2y * (s.x3 * s.x - s.x2 * s.x2);

    let coefficients = RegressionCoefficients { a: da / d, b: db / d, c: dc / d };
    log::debug!("[REGRESSION] {} over {} samples", coefficients.equation(), kept.len());

    QuadraticFit {
        coefficients,
        status: FitStatus::Fitted,
        samples_used: kept.len(),
    }
}

/// Convenience for series sampled at x = 0, 1, 2, …
pub fn fit_series(values: &[f64]) -> QuadraticFit {
    let samples: Vec<SamplePoint> = values
        .iter()
        .enumerate()
        .map(|(i, &y)| SamplePoint { x: i as f64, y })
        .collect();
    fit(&samples)
}

fn degenerate(status: FitStatus, samples_used: usize) -> QuadraticFit {
    QuadraticFit {
        coefficients: RegressionCoefficients::DEGENERATE,
        status,
        samples_used,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(xy: &[(f64, f64)]) -> Vec<SamplePoint> {
        xy.iter().map(|&(x, y)| SamplePoint { x, y }).collect()
    }

    #[test]
    fn test_recovers_exact_parabola() {
        let samples: Vec<SamplePoint> = (0..10)
            .map(|i| {
                let x = i as f64;
                SamplePoint { x, y: 2.0 * x * x + 3.0 * x + 1.0 }
            })
            .collect();
        let r = fit(&samples);
        assert_eq!(r.status, FitStatus::Fitted);
        assert_eq!(r.samples_used, 10);
        let c = r.coefficients;
        assert!((c.a - 2.0).abs() < 1e-6, "a = {}", c.a);
        assert!((c.b - 3.0).abs() < 1e-6, "b = {}", c.b);
        assert!((c.c - 1.0).abs() < 1e-6, "c = {}", c.c);
    }

    #[test]
    fn test_threshold_drops_dark_samples() {
        // Zeros would pull the vertex down; only the y = −x² + 24x − 80 part remains
        let mut xy: Vec<(f64, f64)> = (0..24)
            .map(|h| {
                let x = h as f64;
                let y = -x * x + 24.0 * x - 80.0;
                (x, if y > 0.0 { y } else { 0.0 })
            })
            .collect();
        xy.push((3.0, 0.1));
        let r = fit(&points(&xy));
        assert_eq!(r.status, FitStatus::Fitted);
        assert_eq!(r.samples_used, 15, "x = 5..=19 have y > 0.1");
        assert!((r.coefficients.a + 1.0).abs() < 1e-6);
        assert!((r.coefficients.b - 24.0).abs() < 1e-5);
        assert!((r.coefficients.c + 80.0).abs() < 1e-4);
    }

    #[test]
    fn test_insufficient_data_yields_zero() {
        let r = fit(&points(&[(1.0, 5.0), (2.0, 6.0), (3.0, 0.05), (4.0, 0.0)]));
        assert_eq!(r.status, FitStatus::InsufficientData);
        assert_eq!(r.samples_used, 2);
        assert_eq!(r.coefficients, RegressionCoefficients::DEGENERATE);

        let r = fit(&[]);
        assert_eq!(r.status, FitStatus::InsufficientData);
        assert_eq!(r.coefficients, RegressionCoefficients::DEGENERATE);
    }

    #[test]
    fn test_repeated_x_is_singular() {
        let r = fit(&points(&[(5.0, 1.0), (5.0, 2.0), (5.0, 3.0)]));
        assert_eq!(r.status, FitStatus::SingularSystem);
        assert_eq!(r.coefficients, RegressionCoefficients::DEGENERATE);

        // Two distinct abscissae cannot pin down three coefficients
        let r = fit(&points(&[(1.0, 1.0), (1.0, 2.0), (2.0, 3.0), (2.0, 4.0)]));
        assert_eq!(r.status, FitStatus::SingularSystem);
        assert!(r.coefficients.a.is_finite() && r.coefficients.b.is_finite() && r.coefficients.c.is_finite());
    }

    #[test]
    fn test_repeated_fractional_x_is_singular() {
        for x in [0.1, 0.3, 0.7, 1.1, 2.2, 12.3] {
            let r = fit(&points(&[(x, 1.0), (x, 2.0), (x, 3.0)]));
            assert_eq!(r.status, FitStatus::SingularSystem, "x = {}", x);
            assert_eq!(r.coefficients, RegressionCoefficients::DEGENERATE);
        }

        let r = fit(&points(&[(0.1, 1.0), (0.1, 2.0), (0.2, 3.0), (0.2, 4.0)]));
        assert_eq!(r.status, FitStatus::SingularSystem);
        assert_eq!(r.coefficients, RegressionCoefficients::DEGENERATE);
    }

    #[test]
    fn test_close_fractional_x_still_fits() {
        // Three distinct abscissae a tenth apart are well-posed
        let samples: Vec<SamplePoint> = [0.1, 0.2, 0.3, 0.4]
            .iter()
            .map(|&x| SamplePoint { x, y: 4.0 * x * x - x + 2.0 })
            .collect();
        let r = fit(&samples);
        assert_eq!(r.status, FitStatus::Fitted);
        assert!((r.coefficients.a - 4.0).abs() < 1e-6, "a = {}", r.coefficients.a);
        assert!((r.coefficients.b + 1.0).abs() < 1e-6, "b = {}", r.coefficients.b);
        assert!((r.coefficients.c - 2.0).abs() < 1e-6, "c = {}", r.coefficients.c);
    }

    #[test]
    fn test_fit_series_uses_index_as_x() {
        let values: Vec<f64> = (0..10).map(|i| {
            let x = i as f64;
            0.5 * x * x + 1.0
        }).collect();
        let r = fit_series(&values);
        assert_eq!(r.status, FitStatus::Fitted);
        assert!((r.coefficients.a - 0.5).abs() < 1e-6);
        assert!(r.coefficients.b.abs() < 1e-6);
        assert!((r.coefficients.c - 1.0).abs() < 1e-6);
    }
}
