use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const CONFIG_DIR_NAME: &str = "subtrack";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_PORT: u16 = 3860;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub rate_endpoint: String,
    pub rate_base: String,
    pub reminder_from: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            rate_endpoint: subtrack_app::app::DEFAULT_RATE_ENDPOINT.to_string(),
            rate_base: subtrack_app::app::DEFAULT_RATE_BASE.to_string(),
            reminder_from: subtrack_app::app::DEFAULT_REMINDER_FROM.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: ServerConfig,
    pub file: PathBuf,
    pub created: bool,
}

pub fn load_or_create() -> Result<ConfigLoad, String> {
    let dir = config_dir()?;
    fs::create_dir_all(&dir)
        .map_err(|err| format!("create config dir {}: {}", dir.display(), err))?;
    let file = dir.join(CONFIG_FILE_NAME);

    if file.exists() {
        let contents = fs::read_to_string(&file)
            .map_err(|err| format!("read config {}: {}", file.display(), err))?;
        let config: ServerConfig = toml::from_str(&contents)
            .map_err(|err| format!("parse config {}: {}", file.display(), err))?;
        return Ok(ConfigLoad {
            config,
            file,
            created: false,
        });
    }

    let config = ServerConfig::default();
    let contents =
        toml::to_string_pretty(&config).map_err(|err| format!("serialize config: {}", err))?;
    fs::write(&file, contents)
        .map_err(|err| format!("write config {}: {}", file.display(), err))?;

    Ok(ConfigLoad {
        config,
        file,
        created: true,
    })
}

pub fn resolve_data_dir() -> Result<PathBuf, String> {
    if let Some(dir) = std::env::var_os("SUBTRACK_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").map_err(|err| format!("resolve HOME: {}", err))?;
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join(CONFIG_DIR_NAME))
}

fn config_dir() -> Result<PathBuf, String> {
    let home = std::env::var("HOME").map_err(|err| format!("resolve HOME: {}", err))?;
    Ok(PathBuf::from(home).join(".config").join(CONFIG_DIR_NAME))
}
