//! Helper functions shared by paste storage operations.

use crate::{db::tables::*, error::AppError, models::paste::Paste};
use chrono::{DateTime, Utc};
use redb::ReadableTable;

pub(crate) fn reverse_timestamp_key(created_at: DateTime<Utc>) -> u64 {
    // Pre-epoch timestamps clamp to zero instead of underflowing.
    let millis = created_at.timestamp_millis().max(0) as u64;
    u64::MAX.saturating_sub(millis)
}

pub(crate) fn deserialize_paste(bytes: &[u8]) -> Result<Paste, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Load and decode a paste row inside an open write transaction.
pub(super) fn load_for_write(
    pastes: &redb::Table<&str, &[u8]>,
    id: &str,
) -> Result<Option<Paste>, AppError> {
    let Some(guard) = pastes.get(id)? else {
        return Ok(None);
    };
    let paste = deserialize_paste(guard.value())?;
    Ok(Some(paste))
}

/// Drop a paste row and its index entry. The issued-id marker stays.
pub(super) fn remove_rows(
    pastes: &mut redb::Table<&str, &[u8]>,
    by_created: &mut redb::Table<(u64, &str), ()>,
    paste: &Paste,
) -> Result<(), AppError> {
    pastes.remove(paste.id.as_str())?;
    by_created.remove((reverse_timestamp_key(paste.created_at), paste.id.as_str()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn reverse_key_orders_newest_first() {
        let older = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let newer = older + chrono::Duration::milliseconds(1);
        assert!(reverse_timestamp_key(newer) < reverse_timestamp_key(older));
    }

    #[test]
    fn reverse_key_clamps_pre_epoch_timestamps() {
        let pre_epoch = Utc.with_ymd_and_hms(1960, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(reverse_timestamp_key(pre_epoch), u64::MAX);
    }
}
