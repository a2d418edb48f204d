use crate::{
    app_config::AppConfig,
    args::ProfileCommand,
    profile::{self, Profile, DEFAULT_PROFILE},
};

pub fn profile_cmd(subcommand: Option<ProfileCommand>) -> Result<(), anyhow::Error> {
    match subcommand.unwrap_or(ProfileCommand::Current) {
        ProfileCommand::Use { name } => {
            let config_path = profile::get_profile_config_path(&name);
            if !config_path.exists() {
                if let Some(parent) = config_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                Profile::default().save(&config_path)?;
                println!("Created new profile: {}", name);
            }

            profile::set_current_profile_name(&name)?;
            println!("Switched to profile: {}", name);
        }
        ProfileCommand::List => {
            let current = profile::get_current_profile_name()
                .unwrap_or_else(|_| DEFAULT_PROFILE.to_string());

            println!("Available profiles:");
            for name in profile::list_profiles()? {
                let marker = if name == current { "*" } else { " " };
                println!("{} {} ({})", marker, name, resolved(&name)?.db_dir);
            }
        }
        ProfileCommand::Current => {
            let current = profile::get_current_profile_name()?;
            let config = resolved(&current)?;
            println!("Current profile: {} ({})", current, config.db_dir);
            println!("  backups:  {}", config.backup_dir);
            println!("  exchange: {}", config.exchange_dir);
        }
    }

    Ok(())
}

/// Directories the profile's notebook lives in, with profile overrides applied
fn resolved(name: &str) -> anyhow::Result<AppConfig> {
    let profile = Profile::from_path(&profile::get_profile_config_path(name))?;
    Ok(AppConfig::from_profile(name, profile.as_ref()))
}
