use crate::{app_config::AppConfig, args::VfolderCommand, db::LocalDb, formatters::NoteFormatter};

pub fn vfolder_cmd(config: &AppConfig, subcommand: VfolderCommand) -> Result<(), anyhow::Error> {
    let mut db = LocalDb::open(config)?;

    match subcommand {
        VfolderCommand::List(args) => {
            let folders = db.virtual_folders()?;
            NoteFormatter::new(args.output).print_virtual_folders(&folders)?;
        }
        VfolderCommand::Show(args) => match db.virtual_folder(&args.name)? {
            Some((notes, highlights)) => {
                NoteFormatter::new(args.output).print_notes(&notes, &highlights)?;
            }
            None => anyhow::bail!("Virtual folder not found: {}", args.name),
        },
    }

    Ok(())
}
