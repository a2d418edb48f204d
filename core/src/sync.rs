//! Reconciles the local stores with a snapshot exported by another replica.
//!
//! Every note carries its own version and the version it had at the last
//! export. Comparing those against the remote copy classifies each note as
//! changed locally, remotely, on both sides or not at all. Conflicts keep
//! both versions; nothing is silently dropped.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::config::NotebookConfig;
use crate::error::{Error, Result};
use crate::exchange::{extract_package, write_package};
use crate::models::Note;
use crate::schema::{FILE_NOTES_DAT, FILE_NOTES_TRASH_DAT};
use crate::store::Store;
use crate::util::current_timestamp;

/// Edited locally since the last export
pub fn local_change(local: &Note) -> bool {
    local.lamport_timestamp > local.export_lamport_timestamp
}

/// The remote copy is newer than what we last exported
pub fn remote_change(local: &Note, remote: &Note) -> bool {
    local.export_lamport_timestamp < remote.lamport_timestamp
}

pub fn no_change(local: &Note, remote: &Note) -> bool {
    !local_change(local) && !remote_change(local, remote)
}

pub fn both_change(local: &Note, remote: &Note) -> bool {
    local_change(local) && remote_change(local, remote)
}

pub fn local_change_only(local: &Note, remote: &Note) -> bool {
    local_change(local) && !remote_change(local, remote)
}

pub fn remote_change_only(local: &Note, remote: &Note) -> bool {
    remote_change(local, remote) && !local_change(local)
}

/// Missing from the remote snapshot although it was part of our last export.
///
/// This can't tell "the remote deleted it" from "the remote never had it";
/// both count as deleted.
pub fn remotely_trashed(local: &Note, local_store: &Store, remote_store: &Store) -> bool {
    !remote_store.contains(&local.id)
        && local.export_lamport_timestamp == local_store.export_lamport_clock
}

/// How an import treats the local store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Reconcile note by note
    #[default]
    Merge,
    /// Discard local notes and take the remote snapshot wholesale
    Replace,
}

/// What a merge did, by note id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Local notes overwritten by a remote-only change
    pub updated: Vec<String>,
    /// `(original id, id of the preserved local copy)` for notes changed on both sides
    pub conflicts: Vec<(String, String)>,
    /// Notes new on the remote side, added locally
    pub imported: Vec<String>,
    /// Trash ids of backups made for remote notes we had trashed
    pub trash_backups: Vec<String>,
    /// Local notes moved to trash because the remote dropped them
    pub trashed: Vec<String>,
}

/// Merges `remote` into `local`, using `trash` for locally deleted notes.
///
/// Runs in three passes: ids present on both sides, then remote-only ids,
/// then local-only ids. Versions of remote notes are kept as they are.
pub fn merge_stores(local: &mut Store, trash: &mut Store, remote: &Store) -> MergeReport {
    let mut report = MergeReport::default();
    let local_ids: Vec<String> = local.ids().map(str::to_string).collect();
    let mut processed: BTreeSet<String> = BTreeSet::new();

    for remote_note in remote.iter() {
        let Some(local_note) = local.get(&remote_note.id) else {
            continue;
        };
        if remote_change_only(local_note, remote_note) {
            report.updated.push(remote_note.id.clone());
            local.add_deserialized(remote_note.clone());
        } else if both_change(local_note, remote_note) {
            let suffix = format!(
                " (conflicted local copy, conflict date {}, orig ID {})",
                current_timestamp(),
                local_note.id
            );
            let copy = local_note.renamed_copy(&suffix);
            let copy_id = local.add(copy);
            local.add_deserialized(remote_note.clone());
            report.conflicts.push((remote_note.id.clone(), copy_id));
        }
        processed.insert(remote_note.id.clone());
    }

    for remote_note in remote.iter().filter(|n| !processed.contains(&n.id)) {
        if trash.contains(&remote_note.id) {
            let suffix = format!(
                " (remote backup of locally trashed note, backup date {}, orig ID {})",
                current_timestamp(),
                remote_note.id
            );
            let backup_id = trash.add(remote_note.renamed_copy(&suffix));
            report.trash_backups.push(backup_id);
        } else {
            report.imported.push(remote_note.id.clone());
            local.add_deserialized(remote_note.clone());
        }
    }

    for id in local_ids.iter().filter(|id| !processed.contains(*id)) {
        let is_trashed = local
            .get(id)
            .is_some_and(|note| remotely_trashed(note, local, remote));
        if !is_trashed {
            continue;
        }
        if let Ok(note) = local.remove(id) {
            trash.add_deserialized(note);
            report.trashed.push(id.clone());
        }
    }

    info!(
        updated = report.updated.len(),
        conflicts = report.conflicts.len(),
        imported = report.imported.len(),
        trash_backups = report.trash_backups.len(),
        trashed = report.trashed.len(),
        "Merged remote snapshot"
    );
    report
}

/// Refuses snapshots built on data older than our last export
pub fn check_import_precondition(local: &Store, remote: &Store) -> Result<()> {
    if remote.last_import_lamport_clock < local.export_lamport_clock {
        return Err(Error::StaleImport {
            local_export_clock: local.export_lamport_clock,
            remote_last_import_clock: remote.last_import_lamport_clock,
        });
    }
    Ok(())
}

/// Writes both stores to timestamped files in the backup dir
pub fn backup_stores(
    local: &mut Store,
    trash: &mut Store,
    config: &NotebookConfig,
    suffix: Option<&str>,
) -> Result<()> {
    std::fs::create_dir_all(&config.backup_dir)?;
    local.save(Some(&config.backup_path(suffix, FILE_NOTES_DAT)))?;
    trash.save(Some(&config.backup_path(suffix, FILE_NOTES_TRASH_DAT)))?;
    info!(dir = %config.backup_dir.display(), suffix = suffix.unwrap_or(""), "Backed up stores");
    Ok(())
}

/// Imports the exchange package into the local stores.
///
/// Both stores are saved and backed up first. A stale snapshot is rejected
/// before anything in memory changes. The merged stores are left for the
/// caller to save; they are flagged so that save rewrites them in full.
pub fn import(
    local: &mut Store,
    trash: &mut Store,
    config: &NotebookConfig,
    mode: ImportMode,
) -> Result<Option<MergeReport>> {
    local.save(None)?;
    trash.save(None)?;
    backup_stores(local, trash, config, Some("imp0"))?;

    let snapshot = config.exchange_snapshot_path();
    extract_package(&config.exchange_package_path(), &snapshot)?;
    let mut remote = Store::in_memory();
    remote.load_from(&snapshot)?;
    debug!(
        notes = remote.len(),
        export_clock = remote.export_lamport_clock,
        last_import_clock = remote.last_import_lamport_clock,
        "Loaded remote snapshot"
    );

    if mode == ImportMode::Replace {
        local.clear();
        local.load_from(&snapshot)?;
        local.update_lamport_clock(remote.export_lamport_clock);
        local.last_import_lamport_clock = local.lamport_clock();
        info!(notes = local.len(), "Replaced local store with remote snapshot");
        return Ok(None);
    }

    check_import_precondition(local, &remote)?;

    local.update_lamport_clock(remote.export_lamport_clock);
    local.last_import_lamport_clock = local.lamport_clock();
    let report = merge_stores(local, trash, &remote);
    local.require_full_save();
    trash.require_full_save();

    backup_stores(local, trash, config, Some("imp1"))?;
    Ok(Some(report))
}

/// Stamps every note as exported and writes the exchange package
pub fn export(local: &mut Store, trash: &mut Store, config: &NotebookConfig) -> Result<()> {
    backup_stores(local, trash, config, None)?;

    local.export_lamport_clock = local.lamport_clock();
    let clock = local.export_lamport_clock;
    for note in local.iter_mut() {
        note.export_lamport_timestamp = clock;
    }
    local.require_full_save();

    local.save(None)?;
    trash.save(None)?;

    let snapshot = config.exchange_snapshot_path();
    local.save(Some(&snapshot))?;
    write_package(&snapshot, &config.exchange_package_path())?;

    info!(export_clock = clock, notes = local.len(), "Exported notebook");
    Ok(())
}
