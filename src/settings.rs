use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::logging::LevelStyles;
use crate::parser::{AdsTxtScan, ExtractOptions, PhoneCapture};
use crate::sheets::ColumnMap;

const CONFIG_FILE: &str = "site_contacts";
const ENV_PREFIX: &str = "CONTACTS";
// accepted as a fallback for `sheet_id`
const LEGACY_SHEET_VAR: &str = "SHEET_ID";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                  (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sheet_id: Option<String>,
    pub credentials_path: PathBuf,
    pub delay_secs: u64,
    pub user_agent: String,
    pub request_timeout_secs: Option<u64>,
    pub domain_column: usize,
    pub phone_capture: PhoneCapture,
    pub ads_txt_scan: AdsTxtScan,
    pub log_styles: LevelStyles,
    pub columns: ColumnMap,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sheet_id: None,
            credentials_path: PathBuf::from("credentials.json"),
            delay_secs: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: None,
            domain_column: 2,
            phone_capture: PhoneCapture::default(),
            ads_txt_scan: AdsTxtScan::default(),
            log_styles: LevelStyles::default(),
            columns: ColumnMap::default(),
        }
    }
}

impl Settings {
    /// `.env`, then `site_contacts.toml` (optional), then `CONTACTS_*` variables.
    pub fn load() -> Result<Self> {
        dotenv_if_present(dotenvy::dotenv().map(|_| ()))?;

        let mut builder = Config::builder();
        if let Ok(id) = std::env::var(LEGACY_SHEET_VAR) {
            builder = builder.set_default("sheet_id", id)?;
        }
        let builder = builder
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX));
        Self::from_builder(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        builder
            .build()
            .context("Failed to load settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            phone_capture: self.phone_capture,
            ads_txt_scan: self.ads_txt_scan,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// A missing `.env` is fine; one that exists but cannot be read or parsed is not.
fn dotenv_if_present(loaded: Result<(), dotenvy::Error>) -> Result<()> {
    match loaded {
        Err(e) if e.not_found() => Ok(()),
        other => other.context("Failed to load .env"),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;
    use crate::parser::Platform;

    fn from_toml(toml: &str) -> Result<Settings> {
        Settings::from_builder(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn defaults_without_sources() {
        let s = Settings::from_builder(Config::builder()).unwrap();
        assert_eq!(s.sheet_id, None);
        assert_eq!(s.credentials_path, PathBuf::from("credentials.json"));
        assert_eq!(s.delay(), Duration::from_secs(5));
        assert_eq!(s.domain_column, 2);
        assert_eq!(s.request_timeout(), None);
        assert_eq!(s.extract_options(), ExtractOptions::default());
        assert_eq!(s.columns, ColumnMap::default());
    }

    #[test]
    fn file_overrides() {
        let s = from_toml(
            r#"
            sheet_id = "abc123"
            delay_secs = 1
            request_timeout_secs = 20
            phone_capture = "whole_match"
            ads_txt_scan = "all_lines"

            [log_styles]
            error = "red.on_white"

            [columns]
            emails = [7]

            [columns.social]
            tiktok = 25
            "#,
        )
        .unwrap();
        assert_eq!(s.sheet_id.as_deref(), Some("abc123"));
        assert_eq!(s.delay(), Duration::from_secs(1));
        assert_eq!(s.request_timeout(), Some(Duration::from_secs(20)));
        assert_eq!(s.phone_capture, PhoneCapture::WholeMatch);
        assert_eq!(s.ads_txt_scan, AdsTxtScan::AllLines);
        assert_eq!(s.log_styles.error, "red.on_white");
        assert_eq!(s.log_styles.info, "green");
        assert_eq!(s.columns.emails, vec![7]);
        assert_eq!(s.columns.social.get(&Platform::Tiktok), Some(&25));
        assert_eq!(s.columns.owner_name, Some(6));
    }

    #[test]
    fn missing_dotenv_is_ignored_but_broken_one_is_not() {
        let missing = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert!(dotenv_if_present(Err(dotenvy::Error::Io(missing))).is_ok());
        assert!(dotenv_if_present(Ok(())).is_ok());

        let broken = dotenvy::Error::LineParse("SHEET_ID=\"abc".into(), 9);
        let err = dotenv_if_present(Err(broken)).unwrap_err();
        assert!(err.to_string().contains(".env"));

        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(dotenv_if_present(Err(dotenvy::Error::Io(denied))).is_err());
    }

    #[test]
    fn bad_enum_value_is_rejected() {
        assert!(from_toml(r#"phone_capture = "everything""#).is_err());
    }
}
