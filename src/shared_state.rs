use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use reqwest::Client;

use crate::config::Config;

/// Handler state. Holds only service plumbing; every model input travels
/// with the request.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Shared HTTP client for the radiation API
    pub http: Client,
    /// Offline mode flag — toggled at runtime via API
    pub offline_mode: Arc<AtomicBool>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.radiation_api.timeout_s))
            .build()?;
        let offline = config.offline_mode;
        Ok(Self {
            config: Arc::new(config),
            http,
            offline_mode: Arc::new(AtomicBool::new(offline)),
            started_at: Instant::now(),
        })
    }

    pub fn is_offline(&self) -> bool {
        self.offline_mode.load(Ordering::Relaxed)
    }

    pub fn set_offline(&self, value: bool) {
        self.offline_mode.store(value, Ordering::Relaxed);
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
