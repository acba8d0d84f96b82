pub mod irradiance_controller;
