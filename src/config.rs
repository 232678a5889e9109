use axum::http::HeaderValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    /// The single origin allowed to call the API cross-origin
    pub front_url: String,
    /// Maximum upload size in bytes
    pub max_upload_size: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding the SQLite catalog
    pub data_dir: String,
    /// Directory holding content-addressed images and the `default.jpg` placeholder
    pub images_dir: String,
    pub max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9000".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            images_dir: "./images".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            front_url: "http://localhost:3000".to_string(),
            max_upload_size: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or(defaults.server.bind_address);

        let data_dir = std::env::var("DATA_DIR").unwrap_or(defaults.storage.data_dir);

        let images_dir = std::env::var("IMAGES_DIR").unwrap_or(defaults.storage.images_dir);

        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.storage.max_connections);

        let front_url = std::env::var("FRONT_URL").unwrap_or(defaults.front_url);

        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_upload_size);

        let config = Config {
            server: ServerConfig { bind_address },
            storage: StorageConfig {
                data_dir,
                images_dir,
                max_connections,
            },
            front_url,
            max_upload_size,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_address.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "BIND_ADDRESS cannot be empty".to_string(),
            ));
        }

        if self.storage.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "DB_MAX_CONNECTIONS must be greater than 0".to_string(),
            ));
        }

        if self.max_upload_size == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_UPLOAD_SIZE must be greater than 0".to_string(),
            ));
        }

        if !(self.front_url.starts_with("http://") || self.front_url.starts_with("https://"))
            || HeaderValue::from_str(&self.front_url).is_err()
        {
            return Err(ConfigError::ValidationError(format!(
                "FRONT_URL must be an http(s) origin, got '{}'",
                self.front_url
            )));
        }

        if self.front_url.ends_with('/') {
            tracing::warn!(
                front_url = %self.front_url,
                "FRONT_URL ends with '/'. Browsers send origins without a trailing slash, \
                 so CORS requests will not match."
            );
        }

        Ok(())
    }

    /// Origin header value for the CORS layer.
    pub fn allowed_origin(&self) -> Result<HeaderValue, ConfigError> {
        HeaderValue::from_str(&self.front_url)
            .map_err(|e| ConfigError::ValidationError(format!("Invalid FRONT_URL: {e}")))
    }
}
