use serde::Deserialize;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;
use std::fs;

use crate::error::{Error, Result};

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub launcher: LauncherConfig,
    #[serde(default)]
    pub apps: Vec<AppConfig>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LauncherConfig {
    #[serde(default = "default_pinned")]
    pub pinned: Vec<String>,
}

fn default_pinned() -> Vec<String> {
    vec!["papyros-files".to_string(), "gnome-dictionary".to_string()]
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            pinned: default_pinned(),
        }
    }
}

/// Static desktop-entry metadata for one application id.
#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub id: String,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub exec: Option<String>,
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ActionConfig {
    pub id: String,
    pub name: String,
    pub exec: String,
}

pub fn default_config_path() -> PathBuf {
    match ProjectDirs::from("org", "dock", "dock") {
        Some(dirs) => dirs.config_dir().join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path(),
    };

    if !config_path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&config_path).map_err(|source| Error::Io {
        path: config_path.clone(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| Error::Config {
        path: config_path,
        source,
    })
}
