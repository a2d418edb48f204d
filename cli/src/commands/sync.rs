use wool_core::ImportMode;

use crate::{app_config::AppConfig, args::ImportArgs, db::LocalDb};

pub fn export_cmd(config: &AppConfig) -> Result<(), anyhow::Error> {
    let mut db = LocalDb::open(config)?;
    db.export()?;
    println!("Exported to {}", db.exchange_package_path().display());
    Ok(())
}

pub fn import_cmd(config: &AppConfig, args: ImportArgs) -> Result<(), anyhow::Error> {
    let mut db = LocalDb::open(config)?;
    let mode = if args.replace {
        ImportMode::Replace
    } else {
        ImportMode::Merge
    };

    match db.import(mode)? {
        Some(report) => {
            println!(
                "Imported {} new, {} updated, {} conflicted, {} trashed",
                report.imported.len(),
                report.updated.len(),
                report.conflicts.len(),
                report.trashed.len()
            );
            for (original, copy) in &report.conflicts {
                println!("Conflict on {}, local copy kept as {}", original, copy);
            }
            if !report.trash_backups.is_empty() {
                println!(
                    "Backed up {} remotely changed note(s) into the trash",
                    report.trash_backups.len()
                );
            }
        }
        None => println!(
            "Replaced local notes with {}",
            db.exchange_package_path().display()
        ),
    }

    Ok(())
}
