//! Layered application configuration

pub mod settings;

pub use settings::{
    AppConfig, BackendConfig, BackendKind, CorsConfig, PageConfig, RateLimitConfig, ServerConfig,
};
