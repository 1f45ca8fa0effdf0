use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

const DEFAULT_SESSION_STORE_PATH: &str = "./session.json";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub session_store_path: PathBuf,
    pub request_timeout: Duration,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let session_store_path = env::var("SESSION_STORE_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_STORE_PATH.to_string());

        let timeout_secs = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(_) => get_env_parse::<u64>("REQUEST_TIMEOUT_SECS")?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            api_base_url: get_env("API_BASE_URL")?,
            session_store_path: PathBuf::from(session_store_path),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}
