pub mod irradiance_model;
pub mod irradiance_service;
pub mod radiation_service;
pub mod regression;
pub mod solar_geometry;
