use std::path::PathBuf;

use crate::error::Result;
use crate::services::AppServices;
use subtrack_db::Db;

/// Where the live rate table is anchored. Stored rates are expressed
/// relative to this code.
pub const DEFAULT_RATE_BASE: &str = "USD";

pub const DEFAULT_RATE_ENDPOINT: &str = "https://api.fxratesapi.com/latest";

pub const DEFAULT_REMINDER_FROM: &str = "SubTrack <onboarding@resend.dev>";

#[derive(Clone, Debug)]
pub struct MailerConfig {
    pub api_key: Option<String>,
    pub from: String,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            from: DEFAULT_REMINDER_FROM.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RateSourceConfig {
    pub endpoint: String,
    pub base: String,
}

impl Default for RateSourceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_RATE_ENDPOINT.to_string(),
            base: DEFAULT_RATE_BASE.to_string(),
        }
    }
}

/// Paths and outbound credentials needed to run the tracker.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub mailer: MailerConfig,
    pub rates: RateSourceConfig,
}

impl AppConfig {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            mailer: MailerConfig::default(),
            rates: RateSourceConfig::default(),
        }
    }
}

/// Application state shared by frontend backends (HTTP server, tests).
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let services = AppServices::new(&config);
        Self { config, services }
    }

    pub fn setup_db(&self) -> Result<()> {
        setup_db(&self.config.db_path)
    }

    pub fn open_db(&self) -> Result<Db> {
        Ok(Db::open(&self.config.db_path)?)
    }
}

pub fn setup_db(path: &std::path::Path) -> Result<()> {
    let mut db = Db::open(path)?;
    db.migrate()?;
    Ok(())
}
