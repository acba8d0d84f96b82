use utoipa::OpenApi;
use crate::controllers::irradiance_controller;
use crate::models::{irradiance, radiation};
use crate::config;

#[derive(OpenApi)]
#[openapi(
    paths(
        irradiance_controller::get_incidence,
        irradiance_controller::decompose,
        irradiance_controller::daily_curve,
        irradiance_controller::tilt_sweep,
        irradiance_controller::estimate,
        irradiance_controller::fit,
        irradiance_controller::get_radiation,
        irradiance_controller::get_offline_mode,
        irradiance_controller::set_offline_mode,
        irradiance_controller::get_system_config,
        irradiance_controller::health
    ),
    components(
        schemas(
            irradiance::IncidenceResult,
            irradiance::IrradianceComponents,
            irradiance::RegressionCoefficients,
            irradiance::QuadraticFit,
            irradiance::FitStatus,
            irradiance::SamplePoint,
            irradiance::GeoPosition,
            irradiance::PanelConfig,
            irradiance::IrradianceInput,
            irradiance::ChartHints,
            irradiance::Snapshot,
            irradiance::DailyCurveResponse,
            irradiance::TiltSweepResponse,
            irradiance::EstimateResponse,
            irradiance::HealthStatus,
            radiation::RadiationEstimate,
            radiation::RadiationSource,
            config::ModelDefaults
        )
    ),
    tags(
        (name = "tilted-irradiance", description = "Tilted-panel irradiance model API")
    )
)]
pub struct ApiDoc;
