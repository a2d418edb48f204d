use crate::{app_config::AppConfig, args::ListArgs, db::LocalDb, formatters::NoteFormatter};

/// Name lists derived from the primary store
#[derive(Debug, Clone, Copy)]
pub enum NameList {
    Folders,
    Tags,
    Contexts,
}

pub fn list_cmd(config: &AppConfig, list: NameList, args: ListArgs) -> Result<(), anyhow::Error> {
    let db = LocalDb::open(config)?;

    let names = match list {
        NameList::Folders => db.folders(),
        NameList::Tags => db.tags(),
        NameList::Contexts => db.contexts(),
    };
    NoteFormatter::new(args.output).print_names(&names)?;

    Ok(())
}
