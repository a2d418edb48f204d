use std::path::{Path, PathBuf};

use serde::Serialize;
use wool_core::NotebookConfig;

use crate::profile::{get_profile_config_path, get_profile_data_dir, Profile};

/// Settings resolved from the selected profile, printed by `wool config`
#[derive(Debug, Serialize)]
pub struct AppConfig {
    pub profile_name: String,
    pub profile_path: String,
    pub profile_exists: bool,
    pub db_dir: String,
    pub backup_dir: String,
    pub exchange_dir: String,
    pub default_tags: Vec<String>,
}

impl AppConfig {
    pub fn from_profile(profile_name: &str, profile: Option<&Profile>) -> Self {
        let data_dir = get_profile_data_dir(profile_name);
        let db_dir = profile
            .and_then(|p| p.db_dir.as_ref())
            .map(PathBuf::from)
            .unwrap_or(data_dir);
        let backup_dir = profile
            .and_then(|p| p.backup_dir.as_ref())
            .map(PathBuf::from)
            .unwrap_or_else(|| db_dir.join("backup"));
        let exchange_dir = profile
            .and_then(|p| p.exchange_dir.as_ref())
            .map(PathBuf::from)
            .unwrap_or_else(|| db_dir.join("exchange"));

        AppConfig {
            profile_name: profile_name.to_string(),
            profile_path: display(&get_profile_config_path(profile_name)),
            profile_exists: profile.is_some(),
            db_dir: display(&db_dir),
            backup_dir: display(&backup_dir),
            exchange_dir: display(&exchange_dir),
            default_tags: profile.map(|p| p.default_tags.clone()).unwrap_or_default(),
        }
    }

    pub fn notebook_config(&self) -> NotebookConfig {
        NotebookConfig {
            db_dir: PathBuf::from(&self.db_dir),
            backup_dir: PathBuf::from(&self.backup_dir),
            exchange_dir: PathBuf::from(&self.exchange_dir),
            backup_on_open: false,
        }
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
