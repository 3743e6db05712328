use anyhow::{anyhow, Result};
use config::Config;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::database::{ensure_data_dir, DEFAULT_DATABASE_FILE};

#[derive(Debug, Clone, Serialize)]
pub struct IpteamConfig {
    /// Directory holding the range database
    pub data_dir: String,

    /// Database file name inside `data_dir`
    pub database_file: String,
}

const EMPTY_CONFIG: &str = r#"### ipteam configuration file

### directory for the range database
# data_dir = "~/.ipteam"

### database file name inside data_dir
# database_file = "ipteam-data.sqlite3"
"#;

fn home_dir() -> Result<String> {
    dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not find home directory"))?
        .to_str()
        .ok_or_else(|| anyhow!("Could not convert home directory path to string"))
        .map(|s| s.to_owned())
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &str) -> Result<String> {
    match path.strip_prefix('~') {
        Some(rest) => Ok(format!("{}{}", home_dir()?, rest)),
        None => Ok(path.to_string()),
    }
}

impl Default for IpteamConfig {
    fn default() -> Self {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());

        Self {
            data_dir: format!("{}/.ipteam", home_dir),
            database_file: DEFAULT_DATABASE_FILE.to_string(),
        }
    }
}

impl IpteamConfig {
    /// Build the configuration from a TOML file and `IPTEAM_*` environment variables
    ///
    /// Without an explicit path, `$HOME/.ipteam/ipteam.toml` is used and created
    /// from a commented template when missing.
    pub fn new(path: &Option<String>) -> Result<IpteamConfig> {
        let mut builder = Config::builder();

        let ipteam_dir = format!("{}/.ipteam", home_dir()?);

        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                std::fs::create_dir_all(ipteam_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create ipteam directory: {}", e))?;
                let p = format!("{}/ipteam.toml", ipteam_dir.as_str());
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // E.g., `IPTEAM_DATA_DIR=/srv/ipteam ipteam list` overrides the data directory
        builder = builder.add_source(config::Environment::with_prefix("IPTEAM"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_map(&config, &ipteam_dir)
    }

    fn from_map(config: &HashMap<String, String>, default_dir: &str) -> Result<IpteamConfig> {
        let data_dir = match config.get("data_dir") {
            Some(p) => expand_home(p)?,
            None => default_dir.to_string(),
        };
        ensure_data_dir(data_dir.as_str())?;

        let database_file = config
            .get("database_file")
            .filter(|f| !f.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_DATABASE_FILE.to_string());

        Ok(IpteamConfig {
            data_dir,
            database_file,
        })
    }

    /// Get the path to the SQLite database file
    pub fn sqlite_path(&self) -> String {
        let data_dir = self.data_dir.trim_end_matches('/');
        format!("{}/{}", data_dir, self.database_file)
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        [
            format!("Config File:        {}", Self::config_file_path()),
            format!("Data Directory:     {}", self.data_dir),
            format!("SQLite Path:        {}", self.sqlite_path()),
        ]
        .join("\n")
    }

    /// Get the default config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.ipteam/ipteam.toml", home_dir)
    }
}
