//! Snapshot file format and io
//!
//! A single JSON file holds the whole registry: per message id, the list of
//! role ids and the ordered emoji → role-name mapping. Every mutation
//! overwrites the file in full; recovery is a plain read. Absence of the
//! file is an empty registry, not an error.

use crate::binding::ReactionMenu;
use crate::error::PersistenceError;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use sgm_directory::MessageId;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    /// Keyed by stringified message id
    pub menus: BTreeMap<String, StoredMenu>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct StoredMenu {
    pub channel: u64,
    pub cohort: u32,
    /// Role ids, index-aligned with `emojis`
    pub roles: Vec<u64>,
    /// Trigger emoji → role name, in binding declaration order
    pub emojis: IndexMap<String, String>,
}

impl Snapshot {
    pub(crate) fn of(menus: &HashMap<MessageId, ReactionMenu>) -> Self {
        let menus = menus
            .iter()
            .map(|(message, menu)| {
                let stored = StoredMenu {
                    channel: menu.channel.0,
                    cohort: menu.cohort,
                    roles: menu.bindings.iter().map(|b| b.role.0).collect(),
                    emojis: menu
                        .bindings
                        .iter()
                        .map(|b| (b.emoji.clone(), b.role_name.clone()))
                        .collect(),
                };
                (message.to_string(), stored)
            })
            .collect();
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            menus,
        }
    }
}

/// Write the snapshot, replacing any previous one
///
/// Written to a sibling temp file first, then renamed over the target, so a
/// crash mid-write never leaves a truncated snapshot.
pub(crate) fn save(
    path: &Path,
    menus: &HashMap<MessageId, ReactionMenu>,
) -> Result<(), PersistenceError> {
    let snapshot = Snapshot::of(menus);
    let encoded = serde_json::to_string_pretty(&snapshot)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, encoded)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Read the snapshot; `None` when the file does not exist
pub(crate) fn read(path: &Path) -> Result<Option<Snapshot>, PersistenceError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&raw)?))
}
