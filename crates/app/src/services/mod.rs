mod alignment;
mod rates;
mod reminders;
mod renewal;

use std::sync::Arc;

use crate::app::AppConfig;
use crate::error::Result;
use subtrack_db::Db;

pub use alignment::AlignmentService;
pub use rates::RatesService;
pub use reminders::ReminderService;
pub use renewal::RenewalService;

type SharedConfig = Arc<AppConfig>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub renewal: RenewalService,
    pub alignment: AlignmentService,
    pub reminders: ReminderService,
    pub rates: RatesService,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Self {
        let shared = Arc::new(config.clone());
        Self {
            renewal: RenewalService::new(shared.clone()),
            alignment: AlignmentService::new(shared.clone()),
            reminders: ReminderService::new(shared.clone()),
            rates: RatesService::new(shared),
        }
    }
}

fn open_db(config: &SharedConfig) -> Result<Db> {
    Ok(Db::open(&config.db_path)?)
}
