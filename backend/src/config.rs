//! Environment-driven server configuration.

use std::{env, path::PathBuf};

use anyhow::{bail, Context, Result};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_DATABASE_PATH: &str = "./data/blog.db";

/// Server settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind, `BIND_ADDR`.
    pub bind_addr: String,
    /// TCP port, `PORT`.
    pub port: u16,
    /// SQLite file, `DATABASE_PATH`; created on first start.
    pub database_path: PathBuf,
    /// Shared secret expected in the admin auth header.
    pub admin_secret: String,
    /// Mailbox config for the contact form; the form is disabled without it.
    pub email_accounts_file: Option<PathBuf>,
}

impl AppConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through `lookup`; blank values count as unset.
    /// `ADMIN_SECRET` is required and kept verbatim.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match read("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid PORT value: {raw}"))?,
            None => DEFAULT_PORT,
        };
        let Some(admin_secret) = lookup("ADMIN_SECRET").filter(|value| !value.trim().is_empty())
        else {
            bail!("ADMIN_SECRET must be set to a non-empty value");
        };

        Ok(Self {
            bind_addr: read("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            port,
            database_path: read("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            admin_secret,
            email_accounts_file: read("EMAIL_ACCOUNTS_FILE").map(PathBuf::from),
        })
    }

    /// `bind_addr:port`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = AppConfig::from_lookup(lookup_from(&[("ADMIN_SECRET", "s3cret")]))
            .expect("config");
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
        assert_eq!(config.database_path, PathBuf::from("./data/blog.db"));
        assert_eq!(config.admin_secret, "s3cret");
        assert!(config.email_accounts_file.is_none());
    }

    #[test]
    fn secret_is_kept_verbatim() {
        let config = AppConfig::from_lookup(lookup_from(&[("ADMIN_SECRET", " admin:pw ")]))
            .expect("config");
        assert_eq!(config.admin_secret, " admin:pw ");
    }

    #[test]
    fn missing_secret_is_an_error() {
        assert!(AppConfig::from_lookup(lookup_from(&[])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("ADMIN_SECRET", "   ")])).is_err());
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[("ADMIN_SECRET", "x"), ("PORT", "http")]))
            .expect_err("bad port");
        assert!(err.to_string().contains("invalid PORT"));
    }
}
