use std::env;
use std::error::Error;
use std::fs;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mock {
    pub username: String,
    pub password: String,
    /// Minutes between simulated history samples
    pub sample_minutes: u32,
    /// Random noise added on top of the day curves, 0 disables it
    pub jitter: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub server: Server,
    pub mock: Mock,
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let path =
            env::var("SMARTROOM_CONFIG").unwrap_or_else(|_| "configs/default.toml".to_string());
        let raw = fs::read_to_string(&path)?;

        Ok(toml::from_str(&raw)?)
    }
}
