/// Error types for the irradiance service
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IrradianceError {
    /// Day/month do not form a calendar date in the given year
    #[error("Invalid calendar date: {day:02}.{month:02}.{year}")]
    InvalidDate { day: u32, month: u32, year: i32 },

    /// Date string is not in `dd.mm.yyyy` form
    #[error("Failed to parse date '{0}', expected dd.mm.yyyy")]
    DateParse(String),

    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("Tilt {0} is outside [0, 90] degrees")]
    TiltOutOfRange(f64),

    #[error("Hour {0} is outside [0, 24]")]
    HourOutOfRange(f64),

    /// Diffuse fraction or albedo outside the unit interval
    #[error("{name} {value} is outside [0, 1]")]
    FractionOutOfRange { name: &'static str, value: f64 },

    #[error("Incidence cosine {0} is outside [-1, 1]")]
    CosineOutOfRange(f64),

    #[error("Irradiance must be non-negative, got {0} W/m²")]
    NegativeIrradiance(f64),

    #[error("Value for {0} is not a finite number")]
    NonFinite(&'static str),

    /// Upstream radiation API failed
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Upstream answered but carried no usable value
    #[error("Radiation data missing for {0}")]
    MissingData(String),

    #[error("Failed to read config: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IrradianceError>;

impl IrradianceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            IrradianceError::HttpRequest(_) | IrradianceError::MissingData(_) => StatusCode::BAD_GATEWAY,
            IrradianceError::ConfigRead(_) | IrradianceError::ConfigParse(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for IrradianceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("[HTTP] {} → {}", status, self);
        } else {
            log::debug!("[HTTP] {} → {}", status, self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let e = IrradianceError::InvalidDate { day: 30, month: 2, year: 2024 };
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(e.to_string(), "Invalid calendar date: 30.02.2024");

        let e = IrradianceError::FractionOutOfRange { name: "albedo", value: 1.5 };
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(e.to_string(), "albedo 1.5 is outside [0, 1]");
    }

    #[test]
    fn upstream_errors_map_to_bad_gateway() {
        let e = IrradianceError::MissingData("20230621".to_string());
        assert_eq!(e.status_code(), StatusCode::BAD_GATEWAY);
    }
}
