pub mod irradiance_routes;
