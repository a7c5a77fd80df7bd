/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default = "default_payment")]
    pub payment: PaymentSettings,

    #[serde(default = "default_email")]
    pub email: EmailSettings,

    #[serde(default = "default_orders")]
    pub orders: OrderSettings,

    #[serde(default = "default_environment")]
    pub environment: Environment,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: u64,

    #[serde(default = "default_jwt_refresh_expiration_days")]
    pub jwt_refresh_expiration_days: u64,

    #[serde(default = "default_reset_token_expiration_minutes")]
    pub reset_token_expiration_minutes: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentSettings {
    /// Base URL of the payment provider, e.g. `https://api.stripe.com`
    #[serde(default = "default_payment_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub secret_key: String,

    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailSettings {
    /// When disabled, sends are logged and dropped
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_username: String,

    #[serde(default)]
    pub smtp_password: String,

    #[serde(default = "default_from_address")]
    pub from_address: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderSettings {
    /// How long an order may sit in `pending` before the sweeper cancels it.
    /// `None` picks an environment-specific default.
    #[serde(default)]
    pub stale_after_secs: Option<i64>,

    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Cancelled orders older than this are purged entirely
    #[serde(default = "default_cancelled_retention_secs")]
    pub cancelled_retention_secs: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Development uses a short window so stale-order handling is visible
    /// while testing; production waits a full day.
    pub fn default_stale_after_secs(self) -> i64 {
        match self {
            Environment::Development => 60,
            Environment::Production => 86_400,
        }
    }
}

impl ServerConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        let mut settings = config::Config::builder();

        // Load from config file if it exists
        let config_path = PathBuf::from("config.toml");
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        }

        // Override with environment variables (prefixed with ARIA_,
        // double underscore between section and key)
        settings = settings.add_source(
            config::Environment::with_prefix("ARIA")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set ARIA_AUTH__JWT_SECRET)".to_string(),
            ));
        }

        if self.payment.base_url.is_empty() {
            return Err(ServerError::Config(
                "payment base URL is required (set ARIA_PAYMENT__BASE_URL)".to_string(),
            ));
        }

        if self.email.enabled && self.email.smtp_host.is_empty() {
            return Err(ServerError::Config(
                "SMTP host is required when email is enabled".to_string(),
            ));
        }

        if let Some(secs) = self.orders.stale_after_secs {
            if secs <= 0 {
                return Err(ServerError::Config(
                    "orders.stale_after_secs must be positive".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Effective stale-order window, falling back to the environment default.
    pub fn stale_after_secs(&self) -> i64 {
        self.orders
            .stale_after_secs
            .unwrap_or_else(|| self.environment.default_stale_after_secs())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/aria.db".to_string()
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        jwt_expiration_hours: default_jwt_expiration_hours(),
        jwt_refresh_expiration_days: default_jwt_refresh_expiration_days(),
        reset_token_expiration_minutes: default_reset_token_expiration_minutes(),
    }
}

fn default_jwt_expiration_hours() -> u64 {
    24
}

fn default_jwt_refresh_expiration_days() -> u64 {
    30
}

fn default_reset_token_expiration_minutes() -> u64 {
    15
}

fn default_payment() -> PaymentSettings {
    PaymentSettings {
        base_url: default_payment_base_url(),
        secret_key: String::new(),
        currency: default_currency(),
    }
}

fn default_payment_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_email() -> EmailSettings {
    EmailSettings {
        enabled: false,
        smtp_host: default_smtp_host(),
        smtp_port: default_smtp_port(),
        smtp_username: String::new(),
        smtp_password: String::new(),
        from_address: default_from_address(),
    }
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "Aria Store <noreply@aria.example>".to_string()
}

fn default_orders() -> OrderSettings {
    OrderSettings {
        stale_after_secs: None,
        sweep_interval_secs: default_sweep_interval_secs(),
        cancelled_retention_secs: default_cancelled_retention_secs(),
    }
}

fn default_sweep_interval_secs() -> u64 {
    30
}

fn default_cancelled_retention_secs() -> i64 {
    7 * 86_400
}

fn default_environment() -> Environment {
    Environment::Development
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            payment: default_payment(),
            email: default_email(),
            orders: default_orders(),
            environment: default_environment(),
        }
    }
}
