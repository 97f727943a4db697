//! Application configuration.
//!
//! Resolution order, later wins:
//! 1. defaults derived from the data directory
//! 2. `config.yaml` in the data directory
//! 3. `WARDROBE_*` environment variables

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const DATA_DIR_ENV: &str = "WARDROBE_DATA_DIR";
pub const DATABASE_URL_ENV: &str = "WARDROBE_DATABASE_URL";
pub const BIND_ADDRESS_ENV: &str = "WARDROBE_BIND_ADDRESS";

const APP_DIR_NAME: &str = "wardrobe-tracker";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub database_url: String,
    /// Root of the private per-kind image directories
    pub images_dir: PathBuf,
    /// Root under which restore staging areas are created
    pub staging_dir: PathBuf,
    pub bind_address: String,
}

/// Optional overrides read from `config.yaml`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    database_url: Option<String>,
    images_dir: Option<PathBuf>,
    staging_dir: Option<PathBuf>,
    bind_address: Option<String>,
}

impl AppConfig {
    /// Defaults for everything kept under `data_dir`
    pub fn for_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            database_url: format!("sqlite:{}", data_dir.join("wardrobe.db").display()),
            images_dir: data_dir.join("images"),
            staging_dir: data_dir.join("restore_staging"),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            data_dir,
        }
    }

    /// Resolve the configuration from defaults, the config file and the environment
    pub fn load() -> Result<Self> {
        let env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let base_dir = env(DATA_DIR_ENV).map(PathBuf::from).unwrap_or_else(default_data_dir);
        let file = read_config_file(&base_dir.join(CONFIG_FILE_NAME))?;
        let config = Self::resolve(base_dir, file, env);

        info!("Using data directory {:?}", config.data_dir);
        Ok(config)
    }

    fn resolve(base_dir: PathBuf, file: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = env(DATA_DIR_ENV)
            .map(PathBuf::from)
            .or(file.data_dir)
            .unwrap_or(base_dir);

        let mut config = Self::for_data_dir(data_dir);
        if let Some(url) = file.database_url {
            config.database_url = url;
        }
        if let Some(dir) = file.images_dir {
            config.images_dir = dir;
        }
        if let Some(dir) = file.staging_dir {
            config.staging_dir = dir;
        }
        if let Some(address) = file.bind_address {
            config.bind_address = address;
        }

        if let Some(url) = env(DATABASE_URL_ENV) {
            config.database_url = url;
        }
        if let Some(address) = env(BIND_ADDRESS_ENV) {
            config.bind_address = address;
        }
        config
    }

    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", self.data_dir))
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.is_file() {
        debug!("No config file at {:?}", path);
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(&content).with_context(|| format!("Invalid config file {:?}", path))
}
