use rand::RngCore;

use app_api::AppContext;

#[derive(Clone)]
pub struct HttpState {
    pub context: AppContext,
    pub cron_secret: String,
}

impl HttpState {
    pub fn new(context: AppContext, cron_secret: String) -> Self {
        Self {
            context,
            cron_secret,
        }
    }
}

pub fn generate_cron_secret() -> String {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|byte| format!("{:02x}", byte)).collect()
}
