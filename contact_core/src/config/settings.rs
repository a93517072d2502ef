use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub page: PageConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests still running after this many seconds get a 408.
    pub request_timeout_seconds: u64,
    /// How long open connections may drain after a shutdown signal.
    pub shutdown_timeout_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    Sqlite,
    Rest,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Memory => write!(f, "memory"),
            BackendKind::Sqlite => write!(f, "sqlite"),
            BackendKind::Rest => write!(f, "rest"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub database_url: String,
    pub max_connections: u32,
    /// Base URL of the hosted store, without the `/rest/v1` suffix.
    pub rest_url: String,
    pub api_key: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub product_name: String,
    pub faq_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub max_age_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub enable: bool,
    pub max_requests: usize,
    pub window_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            backend: BackendConfig::default(),
            page: PageConfig::default(),
            cors: CorsConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_seconds: 30,
            shutdown_timeout_seconds: 10,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Memory,
            database_url: "sqlite:./contact.db".to_string(),
            max_connections: 5,
            rest_url: String::new(),
            api_key: String::new(),
            request_timeout_seconds: 10,
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            product_name: "EduLearn".to_string(),
            faq_url: "/faqs".to_string(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            max_age_seconds: 3600,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enable: true,
            max_requests: 60,
            window_seconds: 60,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        match self.backend.kind {
            BackendKind::Memory => {}
            BackendKind::Sqlite => {
                if self.backend.database_url.is_empty() {
                    return Err(ConfigError::Message(
                        "Database URL cannot be empty for the sqlite backend".to_string(),
                    ));
                }
                if self.backend.max_connections == 0 {
                    return Err(ConfigError::Message(
                        "Database max connections must be greater than 0".to_string(),
                    ));
                }
            }
            BackendKind::Rest => {
                if !self.backend.rest_url.starts_with("http://")
                    && !self.backend.rest_url.starts_with("https://")
                {
                    return Err(ConfigError::Message(
                        "REST backend URL must start with http:// or https://".to_string(),
                    ));
                }
                if self.backend.api_key.is_empty() {
                    return Err(ConfigError::Message(
                        "REST backend API key cannot be empty".to_string(),
                    ));
                }
            }
        }

        if self.page.faq_url.is_empty() {
            return Err(ConfigError::Message("FAQ URL cannot be empty".to_string()));
        }

        if self.rate_limit.enable && (self.rate_limit.max_requests == 0 || self.rate_limit.window_seconds == 0) {
            return Err(ConfigError::Message(
                "Rate limit requires a positive request count and window".to_string(),
            ));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
