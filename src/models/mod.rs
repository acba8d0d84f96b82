pub mod irradiance;
pub mod radiation;
