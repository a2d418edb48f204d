#![deny(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use args::{CliArgs, Command};
use clap::{CommandFactory, Parser};
use commands::{
    config::config_cmd,
    list::{list_cmd, NameList},
    note::note_cmd,
    profile::profile_cmd,
    sync::{export_cmd, import_cmd},
    trash::trash_cmd,
    vfolder::vfolder_cmd,
};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app_config::AppConfig;
use crate::profile::{get_profile_config_path, resolve_profile_name, Profile};

mod app_config;
mod args;
mod commands;
mod db;
mod editor;
mod formatters;
mod profile;
mod utils;

#[cfg(test)]
mod test;

fn main() -> anyhow::Result<()> {
    setup_tracing();

    let args = CliArgs::parse();

    let Some(command) = args.command else {
        CliArgs::command().print_help()?;
        return Ok(());
    };

    let profile_name = resolve_profile_name(&args.config.profile);
    let profile = Profile::from_path(&get_profile_config_path(&profile_name))?;
    let config = AppConfig::from_profile(&profile_name, profile.as_ref());
    debug!(profile = %config.profile_name, db_dir = %config.db_dir, "Resolved configuration");

    run(&config, command)?;

    Ok(())
}

fn run(config: &AppConfig, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Config => config_cmd(config),
        Command::Profile { command } => profile_cmd(command),
        Command::Note(subcommand) => note_cmd(config, subcommand),
        Command::Trash(subcommand) => trash_cmd(config, subcommand),
        Command::Folders(args) => list_cmd(config, NameList::Folders, args),
        Command::Tags(args) => list_cmd(config, NameList::Tags, args),
        Command::Contexts(args) => list_cmd(config, NameList::Contexts, args),
        Command::Vfolder(subcommand) => vfolder_cmd(config, subcommand),
        Command::Export => export_cmd(config),
        Command::Import(args) => import_cmd(config, args),
    }
}

/// Logs go to stderr so stdout stays parseable
fn setup_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{crate_name}=warn,wool_core=warn",
                    crate_name = env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
