//! JSON saves.
//!
//! A save is the whole [`WorldState`] as one JSON document. Older saves are
//! brought up to date by [`migrate`]: serde back-fills missing fields with
//! their defaults, and the versioned steps below repair anything a default
//! cannot express.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use crate::model::WorldState;
use crate::sim::career::wrestling::ensure_wrestling_profile;

/// Format version written by this build.
pub const SAVE_VERSION: u32 = 1;

pub fn to_json(state: &WorldState) -> serde_json::Result<String> {
    serde_json::to_string(state)
}

/// Parse and migrate a save.
pub fn from_json(json: &str) -> serde_json::Result<WorldState> {
    let mut state: WorldState = serde_json::from_str(json)?;
    migrate(&mut state);
    Ok(state)
}

pub fn write_to_path(state: &WorldState, path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, state)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

pub fn read_from_path(path: &Path) -> io::Result<WorldState> {
    let reader = BufReader::new(File::open(path)?);
    let mut state: WorldState = serde_json::from_reader(reader)?;
    migrate(&mut state);
    Ok(state)
}

/// Bring `state` up to [`SAVE_VERSION`]. Safe to call on a current save.
pub fn migrate(state: &mut WorldState) {
    if state.version > SAVE_VERSION {
        tracing::warn!(
            version = state.version,
            current = SAVE_VERSION,
            "save is newer than this build"
        );
        return;
    }
    if state.version < 1 {
        migrate_v0(state);
    }
    backfill(state);
    state.version = SAVE_VERSION;
}

/// Repairs for fields a partial save can leave at a default no live game
/// produces.
fn backfill(state: &mut WorldState) {
    let career = &mut state.career;
    if career.is_employed() && career.level == 0 {
        career.level = 1;
    }
}

/// Version 0 kept every flag in one string-keyed bag and did not persist
/// the NPC id counter.
fn migrate_v0(state: &mut WorldState) {
    let legacy = std::mem::take(&mut state.flags.story);
    for (key, value) in legacy {
        state.flags.set(&key, value);
    }

    if let Some(max_id) = state.relationships.iter().map(|n| n.id).max() {
        state.npc_ids.bump_past(max_id);
    }
    if state.wrestling_contract.is_some() {
        ensure_wrestling_profile(state);
    }
    state.stats.clamp_all();
    tracing::info!(name = %state.name, "migrated save from version 0");
}
