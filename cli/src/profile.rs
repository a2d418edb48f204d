use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROFILE: &str = "default";

/// Per-profile settings; unset directories fall back to the profile data dir
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Profile {
    pub db_dir: Option<String>,
    pub backup_dir: Option<String>,
    pub exchange_dir: Option<String>,
    #[serde(default)]
    pub default_tags: Vec<String>,
}

impl Profile {
    pub fn from_path(profile: &std::path::Path) -> anyhow::Result<Option<Self>> {
        if !profile.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(profile).context("Failed to read profile file")?;
        let profile: Self = toml::from_str(&contents).context("Failed to deserialize profile")?;

        Ok(Some(profile))
    }

    pub fn save(&self, profile_path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string(self).context("Failed to serialize profile")?;
        std::fs::write(profile_path, content).context("Failed to write profile")?;
        Ok(())
    }
}

/// Name stored in the `current` marker file, `default` without one
pub fn get_current_profile_name() -> anyhow::Result<String> {
    let current_file = get_current_profile_file();

    if current_file.exists() {
        let name =
            std::fs::read_to_string(&current_file).context("Failed to read current profile")?;
        Ok(name.trim().to_string())
    } else {
        Ok(DEFAULT_PROFILE.to_string())
    }
}

pub fn set_current_profile_name(name: &str) -> anyhow::Result<()> {
    let current_file = get_current_profile_file();

    if let Some(parent) = current_file.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }
    std::fs::write(&current_file, name).context("Failed to write current profile")?;

    Ok(())
}

/// XDG config directory, respecting XDG_CONFIG_HOME
fn get_config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("wool")
    } else {
        directories::ProjectDirs::from("", "", "wool")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// XDG data directory, respecting XDG_DATA_HOME
fn get_data_dir() -> PathBuf {
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data).join("wool")
    } else {
        directories::ProjectDirs::from("", "", "wool")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn get_current_profile_file() -> PathBuf {
    get_config_dir().join("current")
}

pub fn get_profile_config_path(profile_name: &str) -> PathBuf {
    get_config_dir()
        .join("profiles")
        .join(format!("{}.toml", profile_name))
}

/// Default home of a profile's stores, backups and exchange package
pub fn get_profile_data_dir(profile_name: &str) -> PathBuf {
    get_data_dir().join("profiles").join(profile_name)
}

pub fn list_profiles() -> anyhow::Result<Vec<String>> {
    let profiles_dir = get_config_dir().join("profiles");

    if !profiles_dir.exists() {
        return Ok(vec![DEFAULT_PROFILE.to_string()]);
    }

    let mut profiles = vec![];
    for entry in std::fs::read_dir(&profiles_dir).context("Failed to read profiles directory")? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml") {
            if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                profiles.push(name.to_string());
            }
        }
    }

    if !profiles.iter().any(|p| p == DEFAULT_PROFILE) {
        profiles.push(DEFAULT_PROFILE.to_string());
    }
    profiles.sort();
    Ok(profiles)
}

/// The profile named on the command line, else the current one
pub fn resolve_profile_name(arg_profile: &Option<String>) -> String {
    match arg_profile {
        Some(name) => name.clone(),
        None => get_current_profile_name().unwrap_or_else(|_| DEFAULT_PROFILE.to_string()),
    }
}
