use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use backup_health_core::Thresholds;
use serde::Deserialize;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8089";
pub const DEFAULT_BUCKET_ROOT: &str = "./bucket";

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub thresholds: ThresholdsConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Local directory mirroring the backup bucket.
    pub root: Option<String>,
    /// Key prefix holding the dated backups.
    pub prefix: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ThresholdsConfig {
    pub warning_age_hours: Option<f64>,
    pub critical_age_hours: Option<f64>,
    pub min_expected_routes: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SecurityConfig {
    pub api_token: Option<String>,
}

/// Reads the monitor's TOML file; every section is optional.
pub fn load_config(path: &Path) -> Result<Config> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read monitor config: {}", path.display()))?;
    let cfg: Config =
        toml::from_str(&raw).with_context(|| format!("parse monitor config: {}", path.display()))?;
    Ok(cfg)
}

impl Config {
    pub fn listen(&self) -> String {
        env::var("BACKUP_HEALTH_LISTEN")
            .ok()
            .or_else(|| self.server.listen.clone())
            .unwrap_or_else(|| DEFAULT_LISTEN.to_owned())
    }

    pub fn bucket_root(&self) -> String {
        env::var("BACKUP_HEALTH_BUCKET_ROOT")
            .ok()
            .or_else(|| self.storage.root.clone())
            .unwrap_or_else(|| DEFAULT_BUCKET_ROOT.to_owned())
    }

    pub fn prefix(&self) -> String {
        env::var("BACKUP_HEALTH_PREFIX")
            .ok()
            .or_else(|| self.storage.prefix.clone())
            .unwrap_or_else(|| backup_health_monitor::DEFAULT_ROOT.to_owned())
    }

    pub fn api_token(&self) -> Option<String> {
        env::var("BACKUP_HEALTH_API_TOKEN")
            .ok()
            .or_else(|| self.security.api_token.clone())
    }

    /// Base thresholds: environment, then config file, then built-in defaults.
    pub fn thresholds(&self) -> Result<Thresholds> {
        let defaults = Thresholds::default();
        let thresholds = Thresholds {
            warning_age_hours: env_parse("BACKUP_HEALTH_WARNING_AGE_HOURS")?
                .or(self.thresholds.warning_age_hours)
                .unwrap_or(defaults.warning_age_hours),
            critical_age_hours: env_parse("BACKUP_HEALTH_CRITICAL_AGE_HOURS")?
                .or(self.thresholds.critical_age_hours)
                .unwrap_or(defaults.critical_age_hours),
            min_expected_routes: env_parse("BACKUP_HEALTH_MIN_EXPECTED_ROUTES")?
                .or(self.thresholds.min_expected_routes)
                .unwrap_or(defaults.min_expected_routes),
        };
        validate_thresholds(&thresholds)?;
        Ok(thresholds)
    }
}

fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("invalid value for {name}: {raw:?}")),
        Err(_) => Ok(None),
    }
}

pub fn validate_thresholds(thresholds: &Thresholds) -> Result<()> {
    thresholds
        .validate()
        .context("invalid threshold configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_config_file() {
        let cfg: Config = toml::from_str(
            r#"
            [storage]
            root = "/srv/backups"

            [thresholds]
            warning_age_hours = 30.0
            critical_age_hours = 40.0
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.storage.root.as_deref(), Some("/srv/backups"));
        assert!(cfg.server.listen.is_none());
        assert_eq!(cfg.thresholds.warning_age_hours, Some(30.0));
        assert!(cfg.thresholds.min_expected_routes.is_none());
    }

    #[test]
    fn empty_config_is_default() {
        let cfg: Config = toml::from_str("").expect("parse");
        assert!(cfg.storage.prefix.is_none());
        assert!(cfg.security.api_token.is_none());
    }

    #[test]
    fn rejects_critical_not_above_warning() {
        let bad = Thresholds {
            warning_age_hours: 26.0,
            critical_age_hours: 26.0,
            min_expected_routes: 100,
        };
        assert!(validate_thresholds(&bad).is_err());
        assert!(validate_thresholds(&Thresholds::default()).is_ok());

        let nan = Thresholds {
            warning_age_hours: f64::NAN,
            ..Thresholds::default()
        };
        assert!(validate_thresholds(&nan).is_err());
    }

    #[test]
    fn loads_config_from_disk() {
        let tmp = tempfile::NamedTempFile::new().expect("tempfile");
        std::fs::write(tmp.path(), "[server]\nlisten = \"0.0.0.0:9000\"\n").expect("write");
        let cfg = load_config(tmp.path()).expect("load");
        assert_eq!(cfg.server.listen.as_deref(), Some("0.0.0.0:9000"));
    }
}
