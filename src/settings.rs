use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Unreadable(Box<figment::Error>),
    #[error("missing required setting `{0}`")]
    Missing(&'static str),
    #[error("invalid value for `{key}`: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),
    #[error("TLS needs both `ssl_cert` and `private_key`")]
    IncompleteTls,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Unreadable(Box::new(e))
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct YookassaSettings {
    #[serde(default)]
    pub shop_id: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub idempotence_key: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    // Empty means the public API.
    #[serde(default)]
    pub api_base: String,
}

impl Default for YookassaSettings {
    fn default() -> Self {
        Self {
            shop_id: String::new(),
            secret_key: String::new(),
            idempotence_key: String::new(),
            locale: default_locale(),
            api_base: String::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub yookassa: YookassaSettings,
    #[serde(default = "default_bind_ip")]
    pub bind_ip: String,
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,
    // TLS is on only when both paths are set
    #[serde(default)]
    pub ssl_cert: String,
    #[serde(default)]
    pub private_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            yookassa: YookassaSettings::default(),
            bind_ip: default_bind_ip(),
            bind_port: default_bind_port(),
            ssl_cert: String::new(),
            private_key: String::new(),
        }
    }
}

impl Config {
    /// Load from the config file (`GATEWAY_CONFIG`, default `config.toml`) and
    /// environment variables, then validate. Environment variables override
    /// file values.
    /// Supported env keys: YOOKASSA_SHOP_ID, YOOKASSA_SECRET_KEY,
    /// YOOKASSA_IDEMPOTENCE_KEY, YOOKASSA_LOCALE, YOOKASSA_API_BASE,
    /// BIND_IP, BIND_PORT, SSL_CERT, PRIVATE_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("GATEWAY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut cfg = Self::from_file(&path)?;
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults merged with the TOML file, if it exists.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut fig = Figment::from(Serialized::defaults(Config::default()));
        if path.exists() {
            fig = fig.merge(Toml::file(path));
        }
        Ok(fig.extract()?)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("YOOKASSA_SHOP_ID") {
            self.yookassa.shop_id = v;
        }
        if let Some(v) = lookup("YOOKASSA_SECRET_KEY") {
            self.yookassa.secret_key = v;
        }
        if let Some(v) = lookup("YOOKASSA_IDEMPOTENCE_KEY") {
            self.yookassa.idempotence_key = v;
        }
        if let Some(v) = lookup("YOOKASSA_LOCALE") {
            self.yookassa.locale = v;
        }
        if let Some(v) = lookup("YOOKASSA_API_BASE") {
            self.yookassa.api_base = v;
        }
        if let Some(v) = lookup("BIND_IP") {
            self.bind_ip = v;
        }
        if let Some(v) = lookup("BIND_PORT") {
            self.bind_port = v
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "bind_port", value: v })?;
        }
        if let Some(v) = lookup("SSL_CERT") {
            self.ssl_cert = v;
        }
        if let Some(v) = lookup("PRIVATE_KEY") {
            self.private_key = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.yookassa.shop_id.is_empty() {
            return Err(ConfigError::Missing("shop_id"));
        }
        if self.yookassa.secret_key.is_empty() {
            return Err(ConfigError::Missing("secret_key"));
        }
        if self.yookassa.idempotence_key.is_empty() {
            return Err(ConfigError::Missing("idempotence_key"));
        }
        if self.ssl_cert.is_empty() != self.private_key.is_empty() {
            return Err(ConfigError::IncompleteTls);
        }
        self.bind_addr()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.bind_ip, self.bind_port);
        addr.parse().map_err(|_| ConfigError::InvalidBindAddress(addr))
    }

    /// `(cert, key)` when TLS is configured.
    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        if self.ssl_cert.is_empty() || self.private_key.is_empty() {
            None
        } else {
            Some((self.ssl_cert.as_str(), self.private_key.as_str()))
        }
    }
}

fn default_locale() -> String {
    "ru_RU".to_string()
}

fn default_bind_ip() -> String {
    "0.0.0.0".to_string()
}

fn default_bind_port() -> u16 {
    8080
}
