use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fs,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_LISTEN_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);
pub const DEFAULT_VIACEP_BASE_URL: &str = "https://viacep.com.br";
pub const DEFAULT_WEATHERAPI_BASE_URL: &str = "https://api.weatherapi.com";

pub const ENV_WEATHER_API_KEY: &str = "WEATHER_API_KEY";
pub const ENV_LISTEN_ADDR: &str = "LISTEN_ADDR";
pub const ENV_PORT: &str = "PORT";
pub const ENV_VIACEP_BASE_URL: &str = "VIACEP_BASE_URL";
pub const ENV_WEATHERAPI_BASE_URL: &str = "WEATHERAPI_BASE_URL";

/// Server configuration, stored on disk as TOML and overridable from the environment.
///
/// Example TOML:
/// ```toml
/// weather_api_key = "..."
/// listen_addr = "127.0.0.1:8080"
/// request_timeout_secs = 10
/// ```
#[derive(Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// WeatherAPI.com key. Absent means every lookup ends in "weather api key not set".
    pub weather_api_key: Option<String>,
    pub listen_addr: Option<String>,
    pub viacep_base_url: Option<String>,
    pub weatherapi_base_url: Option<String>,
    /// Outbound request timeout. Unset keeps the HTTP client's default.
    pub request_timeout_secs: Option<u64>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("weather_api_key", &self.weather_api_key.as_ref().map(|_| "<redacted>"))
            .field("listen_addr", &self.listen_addr)
            .field("viacep_base_url", &self.viacep_base_url)
            .field("weatherapi_base_url", &self.weatherapi_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Config {
    /// Load config from the platform config directory, or an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Load config from `path`, or an empty default if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "cep-weather", "cep-weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. Empty values are ignored.
    ///
    /// `PORT` replaces only the port of the listen address and wins over `LISTEN_ADDR`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = get(ENV_WEATHER_API_KEY) {
            self.weather_api_key = Some(key);
        }
        if let Some(addr) = get(ENV_LISTEN_ADDR) {
            self.listen_addr = Some(addr);
        }
        if let Some(port) = get(ENV_PORT) {
            let host = self
                .listen_addr
                .as_deref()
                .and_then(|a| a.parse::<SocketAddr>().ok())
                .map_or(DEFAULT_LISTEN_ADDR.ip(), |a| a.ip());
            self.listen_addr = Some(match host {
                IpAddr::V4(ip) => format!("{ip}:{port}"),
                IpAddr::V6(ip) => format!("[{ip}]:{port}"),
            });
        }
        if let Some(url) = get(ENV_VIACEP_BASE_URL) {
            self.viacep_base_url = Some(url);
        }
        if let Some(url) = get(ENV_WEATHERAPI_BASE_URL) {
            self.weatherapi_base_url = Some(url);
        }
    }

    /// The configured WeatherAPI key, if any. An empty key counts as missing.
    pub fn weather_api_key(&self) -> Option<&str> {
        self.weather_api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn set_weather_api_key(&mut self, api_key: String) {
        self.weather_api_key = Some(api_key);
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        match self.listen_addr.as_deref() {
            None => Ok(DEFAULT_LISTEN_ADDR),
            Some(addr) => addr
                .parse()
                .with_context(|| format!("Invalid listen address '{addr}'")),
        }
    }

    pub fn viacep_base_url(&self) -> &str {
        self.viacep_base_url.as_deref().unwrap_or(DEFAULT_VIACEP_BASE_URL)
    }

    pub fn weatherapi_base_url(&self) -> &str {
        self.weatherapi_base_url.as_deref().unwrap_or(DEFAULT_WEATHERAPI_BASE_URL)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
