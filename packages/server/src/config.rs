use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// SeaORM connection URL, or `memory://` for the in-process store.
    pub url: String,
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.url.starts_with("memory:")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of issued bearer tokens. Default: 7.
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: i64,
    /// Reject logins from accounts that never confirmed their email. Default: true.
    #[serde(default = "default_require_verified_email")]
    pub require_verified_email: bool,
    /// Lifetime of password reset tokens. Default: 60.
    #[serde(default = "default_reset_token_ttl_minutes")]
    pub reset_token_ttl_minutes: i64,
}

fn default_token_ttl_days() -> i64 {
    7
}
fn default_require_verified_email() -> bool {
    true
}
fn default_reset_token_ttl_minutes() -> i64 {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    /// Base URL used when rendering links in outgoing mail.
    #[serde(default = "default_app_url")]
    pub app_url: String,
}

fn default_app_url() -> String {
    "http://localhost:5000".into()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            app_url: default_app_url(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "memory://")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., BLOGCOLLAB__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("BLOGCOLLAB").separator("__"))
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message("auth.jwt_secret must not be empty".into()));
        }
        if self.auth.token_ttl_days <= 0 || self.auth.reset_token_ttl_minutes <= 0 {
            return Err(ConfigError::Message(
                "auth token lifetimes must be positive".into(),
            ));
        }
        Ok(())
    }
}
