use wool_core::{
    schema::{DEFAULT_FOLDER, DEFAULT_NOTE_NAME},
    NoteInput, StoreKind,
};

use crate::{
    app_config::AppConfig,
    args::{NoteAddArgs, NoteCommand, NoteEditArgs},
    db::LocalDb,
    editor::{Editor, EditorTemplate},
    formatters::NoteFormatter,
};

pub fn note_cmd(config: &AppConfig, subcommand: NoteCommand) -> Result<(), anyhow::Error> {
    let mut db = LocalDb::open(config)?;

    match subcommand {
        NoteCommand::Add(args) => {
            let mut input = add_input(&args, &config.default_tags);
            if args.interactive {
                edit_interactively(&mut input)?;
            }

            let id = db.create_note(&input)?;
            println!("Note added successfully ({})", id);
        }
        NoteCommand::Show(args) => {
            let id = db.resolve_id(StoreKind::Notes, &args.id)?;
            NoteFormatter::new(args.output).print_note(db.get(StoreKind::Notes, &id)?)?;
        }
        NoteCommand::Edit(args) => {
            let id = db.resolve_id(StoreKind::Notes, &args.id)?;
            let mut input = NoteInput::from_note(db.get(StoreKind::Notes, &id)?);
            apply_edit_args(&mut input, &args);
            if args.interactive {
                edit_interactively(&mut input)?;
            }

            db.update_note(&id, &input)?;
            println!("Note updated ({})", id);
        }
        NoteCommand::List(args) => {
            let notes = db.list_notes(
                StoreKind::Notes,
                args.folder.as_deref(),
                args.tag.as_deref(),
                args.limit,
            )?;
            NoteFormatter::new(args.output).print_notes(&notes, &[])?;
        }
        NoteCommand::Search(args) => {
            let (notes, highlights) = db.search(StoreKind::Notes, &args.query.join(" "), args.limit);
            NoteFormatter::new(args.output).print_notes(&notes, &highlights)?;
        }
        NoteCommand::Delete(args) => {
            let ids = db.resolve_ids(StoreKind::Notes, &args.ids)?;
            db.delete_notes(&ids)?;
            println!("Moved {} note(s) to trash", ids.len());
        }
        NoteCommand::TagAdd(args) => {
            let ids = db.resolve_ids(StoreKind::Notes, &args.ids)?;
            db.add_tag(&ids, &args.tag)?;
            println!("Tagged {} note(s) with '{}'", ids.len(), args.tag);
        }
        NoteCommand::TagDel(args) => {
            let ids = db.resolve_ids(StoreKind::Notes, &args.ids)?;
            db.remove_tag(&ids, &args.tag)?;
            println!("Removed tag '{}' from {} note(s)", args.tag, ids.len());
        }
        NoteCommand::Move(args) => {
            let ids = db.resolve_ids(StoreKind::Notes, &args.ids)?;
            db.move_to_folder(&ids, &args.folder)?;
            println!("Moved {} note(s) to '{}'", ids.len(), args.folder);
        }
        NoteCommand::Dismiss(args) => {
            let ids = db.resolve_ids(StoreKind::Notes, &args.ids)?;
            db.dismiss_reminder(&ids)?;
            println!("Dismissed {} reminder(s)", ids.len());
        }
    };

    Ok(())
}

fn add_input(args: &NoteAddArgs, default_tags: &[String]) -> NoteInput {
    let mut tags = default_tags.to_vec();
    tags.extend(args.tag.iter().cloned());

    NoteInput {
        name: args
            .name
            .clone()
            .unwrap_or_else(|| DEFAULT_NOTE_NAME.to_string()),
        folder: args
            .folder
            .clone()
            .unwrap_or_else(|| DEFAULT_FOLDER.to_string()),
        tags: tags.join(","),
        body: args.content.join(" "),
        due_date: args.due.as_ref().map(|d| d.to_timestamp()).unwrap_or_default(),
        public_share_auth: String::new(),
        format: args.format.as_input().to_string(),
    }
}

fn apply_edit_args(input: &mut NoteInput, args: &NoteEditArgs) {
    if let Some(name) = &args.name {
        input.name = name.clone();
    }
    if let Some(folder) = &args.folder {
        input.folder = folder.clone();
    }
    if let Some(tags) = &args.tag {
        input.tags = tags.join(",");
    }
    if let Some(due) = &args.due {
        input.due_date = due.to_timestamp();
    }
    if let Some(format) = args.format {
        input.format = format.as_input().to_string();
    }
    if let Some(body) = &args.body {
        input.body = body.clone();
    }
}

fn edit_interactively(input: &mut NoteInput) -> anyhow::Result<()> {
    let template = EditorTemplate::from_input(input).render()?;
    Editor::new(&template).open()?.apply_to(input)
}
