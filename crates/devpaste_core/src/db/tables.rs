//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";

/// Canonical paste rows (`Paste`, bincode-encoded).
pub const PASTES: TableDefinition<&str, &[u8]> = TableDefinition::new("pastes");

/// Creation-order index keyed by reverse-millis then id, newest first.
pub const PASTES_BY_CREATED: TableDefinition<(u64, &str), ()> =
    TableDefinition::new("pastes_by_created");

/// Every id ever issued. Rows outlive their paste so ids are never reused.
pub const PASTE_IDS_ISSUED: TableDefinition<&str, ()> = TableDefinition::new("paste_ids_issued");
