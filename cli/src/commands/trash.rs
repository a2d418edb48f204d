use wool_core::StoreKind;

use crate::{app_config::AppConfig, args::TrashCommand, db::LocalDb, formatters::NoteFormatter};

pub fn trash_cmd(config: &AppConfig, subcommand: TrashCommand) -> Result<(), anyhow::Error> {
    let db = LocalDb::open(config)?;

    match subcommand {
        TrashCommand::List(args) => {
            let notes = db.list_notes(
                StoreKind::Trash,
                args.folder.as_deref(),
                args.tag.as_deref(),
                args.limit,
            )?;
            NoteFormatter::new(args.output).print_notes(&notes, &[])?;
        }
        TrashCommand::Search(args) => {
            let (notes, highlights) = db.search(StoreKind::Trash, &args.query.join(" "), args.limit);
            NoteFormatter::new(args.output).print_notes(&notes, &highlights)?;
        }
    }

    Ok(())
}
