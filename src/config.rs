use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::FixedOffset;
use dotenvy::dotenv;
use strum_macros::{Display, EnumString};

/// Where attendance records are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum GatewayKind {
    /// JSON arrays in files under `LOCAL_STORE_DIR`.
    Local,
    /// The HTTP backend at `BACKEND_BASE_URL`.
    Remote,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub backend_base_url: String,
    pub api_prefix: String,

    pub gateway: GatewayKind,
    pub local_store_dir: PathBuf,
    /// Offset used when rendering dates and clock times.
    pub display_offset: FixedOffset,

    // Rate limiting
    pub rate_proxy_per_min: u32,

    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: var_or("SERVER_ADDR", "127.0.0.1:3000"),
            backend_base_url: var_or("BACKEND_BASE_URL", "http://localhost:8080")
                .trim_end_matches('/')
                .to_string(),
            api_prefix: var_or("API_PREFIX", "/api"),

            gateway: GatewayKind::from_str(&var_or("GATEWAY", "remote"))
                .context("GATEWAY must be `local` or `remote`")?,
            local_store_dir: PathBuf::from(var_or("LOCAL_STORE_DIR", "data")),
            display_offset: parse_offset(&var_or("DISPLAY_UTC_OFFSET", "+09:00"))?,

            rate_proxy_per_min: var_or("RATE_PROXY_PER_MIN", "600")
                .parse()
                .context("RATE_PROXY_PER_MIN must be a whole number")?,

            log_dir: var_or("LOG_DIR", "logs"),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parses `+HH:MM` / `-HH:MM`.
pub fn parse_offset(value: &str) -> Result<FixedOffset> {
    value
        .parse::<FixedOffset>()
        .ok()
        .with_context(|| format!("DISPLAY_UTC_OFFSET `{value}` is not an offset like +09:00"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gateway_kind() {
        assert_eq!(GatewayKind::from_str("local").unwrap(), GatewayKind::Local);
        assert_eq!(GatewayKind::from_str("remote").unwrap(), GatewayKind::Remote);
        assert!(GatewayKind::from_str("browser").is_err());
        assert_eq!(GatewayKind::Local.to_string(), "local");
    }

    #[test]
    fn parses_offsets() {
        assert_eq!(parse_offset("+09:00").unwrap().local_minus_utc(), 9 * 3600);
        assert_eq!(parse_offset("-05:30").unwrap().local_minus_utc(), -(5 * 3600 + 1800));
        assert!(parse_offset("JST").is_err());
    }
}
