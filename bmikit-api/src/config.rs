use std::{env, fs};

use log::warn;
use serde::Deserialize;

/// Service configuration, read from a RON file. The path defaults to
/// `config.ron` and can be overridden with `BMIKIT_API_CONFIG`; an empty
/// origin list means permissive CORS.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            allowed_origins: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        let path = env::var("BMIKIT_API_CONFIG").unwrap_or_else(|_| "config.ron".to_owned());
        match fs::read_to_string(&path) {
            Ok(contents) => match ron::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Could not parse {}: {}, using defaults", path, e);
                    Config::default()
                }
            },
            Err(_) => {
                warn!("Config file {} not found, using defaults", path);
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_config() {
        let config: Config = ron::from_str(
            r#"(
                host: "0.0.0.0",
                port: 9090,
                allowed_origins: ["http://localhost:3000"],
            )"#,
        )
        .unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(config.allowed_origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = ron::from_str("(port: 9090)").unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert!(config.allowed_origins.is_empty());
    }
}
