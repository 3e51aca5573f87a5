use std::env;
use std::error::Error;
use std::fs;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Api {
    /// Backend base URL including the API prefix, no trailing slash
    pub base_url: String,
    /// Connect timeout applied to every request
    pub timeout_secs: u64,
    /// Page size for listing calls, large enough to fetch everything at once
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub api: Api,
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let path =
            env::var("SMARTROOM_CONFIG").unwrap_or_else(|_| "configs/default.toml".to_string());
        let raw = fs::read_to_string(&path)?;

        Ok(toml::from_str(&raw)?)
    }
}
