//! Application settings loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use super::constants::{
    DEFAULT_ADMIN_NAME, DEFAULT_ARGON2_TIME_COST, DEFAULT_BCRYPT_COST, DEFAULT_JWT_ISSUER,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SHUTDOWN_GRACE_SECONDS, DEFAULT_SMTP_FROM,
    DEFAULT_SMTP_PORT,
};
use crate::domain::AdminBootstrap;
use crate::errors::{AppError, AppResult};

/// Which password hashing algorithm new hashes use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HasherKind {
    Bcrypt,
    Argon2,
}

impl FromStr for HasherKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bcrypt" => Ok(HasherKind::Bcrypt),
            "argon2" | "argon2id" => Ok(HasherKind::Argon2),
            other => Err(AppError::config(format!(
                "PASSWORD_HASHER must be 'bcrypt' or 'argon2', got '{}'",
                other
            ))),
        }
    }
}

/// Outbound SMTP settings
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from", &self.from)
            .finish()
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub rsa_private_key_path: PathBuf,
    pub rsa_public_key_path: PathBuf,
    pub jwt_issuer: String,
    pub hasher: HasherKind,
    pub bcrypt_cost: u32,
    pub argon2_time_cost: u32,
    /// `None` when no ADMIN_EMAIL is configured
    pub admin: Option<AdminBootstrap>,
    /// `None` disables outbound email
    pub smtp: Option<SmtpSettings>,
    pub server_host: String,
    pub server_port: u16,
    pub shutdown_grace_seconds: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("rsa_private_key_path", &self.rsa_private_key_path)
            .field("rsa_public_key_path", &self.rsa_public_key_path)
            .field("jwt_issuer", &self.jwt_issuer)
            .field("hasher", &self.hasher)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("argon2_time_cost", &self.argon2_time_cost)
            .field("admin", &self.admin)
            .field("smtp", &self.smtp)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("shutdown_grace_seconds", &self.shutdown_grace_seconds)
            .finish()
    }
}

impl Config {
    /// Load configuration from `.env` and environment variables.
    ///
    /// # Errors
    /// Fails if DATABASE_URL or either RSA key path is missing, or a
    /// numeric setting does not parse.
    pub fn from_env() -> AppResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("No .env file loaded: {}", e);
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| AppError::config(format!("{} must be set", key)))
        };

        let admin = get("ADMIN_EMAIL").map(|email| AdminBootstrap {
            email,
            name: get("ADMIN_NAME").unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string()),
            password: get("ADMIN_PASSWORD"),
        });

        let smtp = match get("SMTP_HOST") {
            Some(host) => Some(SmtpSettings {
                host,
                port: parse_or("SMTP_PORT", get("SMTP_PORT"), DEFAULT_SMTP_PORT)?,
                username: get("SMTP_USERNAME"),
                password: get("SMTP_PASSWORD"),
                from: get("SMTP_FROM").unwrap_or_else(|| DEFAULT_SMTP_FROM.to_string()),
            }),
            None => None,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            rsa_private_key_path: PathBuf::from(required("RSA_PRIVATE_KEY_PATH")?),
            rsa_public_key_path: PathBuf::from(required("RSA_PUBLIC_KEY_PATH")?),
            jwt_issuer: get("JWT_ISSUER").unwrap_or_else(|| DEFAULT_JWT_ISSUER.to_string()),
            hasher: match get("PASSWORD_HASHER") {
                Some(kind) => kind.parse()?,
                None => HasherKind::Bcrypt,
            },
            bcrypt_cost: parse_or("BCRYPT_COST", get("BCRYPT_COST"), DEFAULT_BCRYPT_COST)?,
            argon2_time_cost: parse_or(
                "ARGON2_TIME_COST",
                get("ARGON2_TIME_COST"),
                DEFAULT_ARGON2_TIME_COST,
            )?,
            admin,
            smtp,
            server_host: get("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_or("SERVER_PORT", get("SERVER_PORT"), DEFAULT_SERVER_PORT)?,
            shutdown_grace_seconds: parse_or(
                "SHUTDOWN_GRACE_SECONDS",
                get("SHUTDOWN_GRACE_SECONDS"),
                DEFAULT_SHUTDOWN_GRACE_SECONDS,
            )?,
        })
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> AppResult<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("{} has an invalid value '{}'", key, raw))),
        None => Ok(default),
    }
}
