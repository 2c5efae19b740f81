pub mod app;
pub mod error;
pub mod mailer;
pub mod rate_source;
pub mod services;
pub mod startup;
pub mod util;

pub use app::{AppConfig, AppState, MailerConfig, RateSourceConfig};
pub use error::{ApiError, AppError, Result};
pub use mailer::{EmailTransport, ReminderEmail, ResendMailer};
pub use rate_source::{FetchedRates, FxRateSource, RateSource};
pub use services::AppServices;
pub use startup::{AppPaths, ensure_app_data_dir};
pub use util::time::{now_utc_iso, today_utc};
