use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;

/// Token lifetime used when `JWT_TTL_MINUTES` is not set (24h).
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60 * 24;
/// Longest accepted token lifetime (one year).
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Which store backend the process wires up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
    pub storage: StorageKind,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let storage = match std::env::var("STORAGE").as_deref() {
            Ok("memory") => StorageKind::Memory,
            _ => StorageKind::Postgres,
        };
        let database_url = match storage {
            StorageKind::Postgres => std::env::var("DATABASE_URL").context("DATABASE_URL")?,
            StorageKind::Memory => std::env::var("DATABASE_URL").unwrap_or_default(),
        };

        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET")?;
        anyhow::ensure!(!secret.trim().is_empty(), "JWT_SECRET must not be empty");

        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "product-api".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "product-api-users".into()),
            ttl_minutes: parse_ttl_minutes(std::env::var("JWT_TTL_MINUTES").ok().as_deref())?,
        };

        Ok(Self {
            database_url,
            jwt,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8080),
            storage,
        })
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

fn parse_ttl_minutes(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_TOKEN_TTL_MINUTES);
    };
    let minutes: i64 = raw
        .parse()
        .with_context(|| format!("JWT_TTL_MINUTES is not a number: {raw}"))?;
    anyhow::ensure!(
        (1..=MAX_TOKEN_TTL_MINUTES).contains(&minutes),
        "JWT_TTL_MINUTES must be between 1 and {MAX_TOKEN_TTL_MINUTES}"
    );
    Ok(minutes)
}
