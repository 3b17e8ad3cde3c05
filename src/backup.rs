//! Backup and restore of the persisted state.
//!
//! A backup is a timestamped envelope around raw copies of the four durable
//! slots. Sections are carried as untyped JSON so a backup taken before a
//! schema change still restores byte-for-byte; each section is optional and
//! a restore only touches the slots its backup actually carries. At most
//! [`MAX_BACKUPS`] snapshots are retained, oldest evicted first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::activity::{self, tags, ActivitySource};
use crate::db::DbState;
use crate::store;

pub const BACKUP_VERSION: &str = "1.0";

/// Retained snapshot count.
pub const MAX_BACKUPS: usize = 10;

/// Raw slot copies. `None` means the slot was empty when the backup was
/// taken and is skipped on restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_history: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_logs: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub data: BackupData,
}

/// One row in the backup management list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupInfo {
    pub key: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub table_count: usize,
    pub order_count: usize,
    pub log_count: usize,
}

fn array_len(section: &Option<Value>) -> usize {
    section
        .as_ref()
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0)
}

/// Snapshot the four durable slots and log the export.
pub fn create_backup(db: &DbState, now: DateTime<Utc>) -> Result<Backup, String> {
    let data = BackupData {
        tables: store::read_slot_opt(db, store::TABLES_KEY)?,
        order_history: store::read_slot_opt(db, store::ORDER_HISTORY_KEY)?,
        activity_logs: store::read_slot_opt(db, store::ACTIVITY_LOGS_KEY)?,
        settings: store::read_slot_opt(db, store::SETTINGS_KEY)?,
    };
    let backup = Backup {
        timestamp: now,
        version: BACKUP_VERSION.to_string(),
        data,
    };
    activity::log_activity(
        db,
        ActivitySource::Backup,
        tags::EXPORT_DATA,
        None,
        json!({ "orderCount": array_len(&backup.data.order_history) }),
        now,
    )?;
    Ok(backup)
}

/// Persist a backup under `backup_<millis>` and evict beyond [`MAX_BACKUPS`].
/// Returns the storage key.
pub fn save_backup(db: &DbState, backup: &Backup) -> Result<String, String> {
    let key = format!(
        "{}{}",
        store::BACKUP_KEY_PREFIX,
        backup.timestamp.timestamp_millis()
    );
    store::write_slot(db, &key, backup)?;

    let mut keys = backup_keys(db)?;
    while keys.len() > MAX_BACKUPS {
        let oldest = keys.remove(0);
        info!(key = %oldest, "evicting oldest backup");
        store::remove_slot(db, &oldest)?;
    }
    Ok(key)
}

/// Backup slot keys, oldest first by embedded timestamp.
fn backup_keys(db: &DbState) -> Result<Vec<String>, String> {
    let mut keyed: Vec<(i64, String)> = store::keys_with_prefix(db, store::BACKUP_KEY_PREFIX)?
        .into_iter()
        .filter_map(|key| {
            key[store::BACKUP_KEY_PREFIX.len()..]
                .parse::<i64>()
                .ok()
                .map(|millis| (millis, key))
        })
        .collect();
    keyed.sort();
    Ok(keyed.into_iter().map(|(_, key)| key).collect())
}

pub fn load_backup(db: &DbState, key: &str) -> Result<Option<Backup>, String> {
    store::read_slot_opt(db, key)
}

/// Stored backups as list rows, newest first.
pub fn list_backups(db: &DbState) -> Result<Vec<BackupInfo>, String> {
    let mut infos = Vec::new();
    for key in backup_keys(db)? {
        match load_backup(db, &key)? {
            Some(backup) => infos.push(BackupInfo {
                key,
                timestamp: backup.timestamp,
                version: backup.version,
                table_count: array_len(&backup.data.tables),
                order_count: array_len(&backup.data.order_history),
                log_count: array_len(&backup.data.activity_logs),
            }),
            None => warn!(key = %key, "skipping unreadable backup slot"),
        }
    }
    infos.reverse();
    Ok(infos)
}

/// Write the backup's sections back into their slots. Sections the backup
/// does not carry leave the current slots untouched. The restore is logged.
pub fn restore_from_backup(db: &DbState, backup: &Backup, now: DateTime<Utc>) -> Result<(), String> {
    if let Some(tables) = &backup.data.tables {
        store::write_slot(db, store::TABLES_KEY, tables)?;
    }
    if let Some(history) = &backup.data.order_history {
        store::write_slot(db, store::ORDER_HISTORY_KEY, history)?;
    }
    if let Some(logs) = &backup.data.activity_logs {
        store::write_slot(db, store::ACTIVITY_LOGS_KEY, logs)?;
    }
    if let Some(settings) = &backup.data.settings {
        store::write_slot(db, store::SETTINGS_KEY, settings)?;
    }
    activity::log_activity(
        db,
        ActivitySource::Backup,
        tags::RESTORE_DATA,
        None,
        json!({ "backupTimestamp": backup.timestamp }),
        now,
    )?;
    info!(timestamp = %backup.timestamp, "state restored from backup");
    Ok(())
}

/// Pretty-printed JSON for the export file.
pub fn export_json(backup: &Backup) -> Result<String, String> {
    serde_json::to_string_pretty(backup).map_err(|e| format!("serialize backup: {e}"))
}

/// Parse an exported backup file. A malformed file is rejected here, before
/// anything touches the stored state.
pub fn import_json(raw: &str) -> Result<Backup, String> {
    serde_json::from_str(raw).map_err(|e| format!("Invalid backup file: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::LogFilter;
    use crate::db::run_migrations_for_test;
    use crate::staff::{Role, StaffProfile};
    use crate::tables::{self, TableInput};
    use chrono::Duration;
    use rusqlite::Connection;
    use std::path::PathBuf;
    use std::sync::Mutex;

    fn test_db() -> DbState {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        run_migrations_for_test(&conn);
        DbState {
            conn: Mutex::new(conn),
            db_path: PathBuf::from(":memory:"),
        }
    }

    fn anna() -> StaffProfile {
        StaffProfile {
            id: 1,
            username: "anna".into(),
            name: "Anna Santos".into(),
            role: Role::Staff,
            is_active: true,
            avatar: "👩‍💼".into(),
        }
    }

    fn seed_one_order(db: &DbState, now: DateTime<Utc>) {
        tables::load_tables(db).unwrap();
        tables::save_table(
            db,
            1,
            &TableInput {
                is_occupied: true,
                customer_name: "Mia".into(),
                beer_ordered: "Heineken".into(),
                quantity: 2,
                custom_order: String::new(),
                payment_status: tables::PaymentStatus::Unpaid,
            },
            &anna(),
            now,
        )
        .unwrap();
    }

    #[test]
    fn backup_captures_live_slots_and_skips_empty_ones() {
        let db = test_db();
        let now = Utc::now();
        seed_one_order(&db, now);

        let backup = create_backup(&db, now).unwrap();
        assert_eq!(backup.version, "1.0");
        assert_eq!(array_len(&backup.data.tables), 15);
        assert!(backup.data.activity_logs.is_some());
        assert!(backup.data.settings.is_none(), "empty slot stays absent");
        assert!(backup.data.order_history.is_none());
    }

    #[test]
    fn retention_keeps_ten_newest() {
        let db = test_db();
        let base = Utc::now();
        for i in 0..12 {
            let backup = Backup {
                timestamp: base + Duration::seconds(i),
                version: BACKUP_VERSION.into(),
                data: BackupData::default(),
            };
            save_backup(&db, &backup).unwrap();
        }

        let infos = list_backups(&db).unwrap();
        assert_eq!(infos.len(), MAX_BACKUPS);
        // Newest first; the two oldest snapshots were evicted
        assert_eq!(infos[0].timestamp.timestamp(), (base + Duration::seconds(11)).timestamp());
        assert_eq!(
            infos[MAX_BACKUPS - 1].timestamp.timestamp(),
            (base + Duration::seconds(2)).timestamp()
        );
    }

    #[test]
    fn restore_applies_only_carried_sections() {
        let db = test_db();
        let now = Utc::now();
        seed_one_order(&db, now);
        let backup = create_backup(&db, now).unwrap();

        // Wreck the roster and add a setting the backup never saw
        tables::clear_table(&db, 1).unwrap();
        store::write_slot(&db, store::SETTINGS_KEY, &json!({ "currency": "PHP" })).unwrap();

        restore_from_backup(&db, &backup, now).unwrap();

        let roster = tables::load_tables(&db).unwrap();
        assert!(roster[0].is_occupied, "roster came back from the backup");
        assert_eq!(roster[0].customer_name, "Mia");

        let settings: Value = store::read_slot(&db, store::SETTINGS_KEY).unwrap();
        assert_eq!(settings["currency"], "PHP", "uncarried section untouched");

        let restores = activity::get_logs(
            &db,
            &LogFilter {
                activity: Some(tags::RESTORE_DATA.into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(restores.len(), 1);
    }

    #[test]
    fn export_import_round_trip() {
        let db = test_db();
        let now = Utc::now();
        seed_one_order(&db, now);
        let backup = create_backup(&db, now).unwrap();

        let raw = export_json(&backup).unwrap();
        let parsed = import_json(&raw).unwrap();
        assert_eq!(parsed, backup);
    }

    #[test]
    fn malformed_import_is_rejected_before_any_write() {
        let db = test_db();
        let now = Utc::now();
        seed_one_order(&db, now);
        let before: Value = store::read_slot(&db, store::TABLES_KEY).unwrap();

        assert!(import_json("{not a backup").is_err());
        assert!(import_json(r#"{"version":"1.0"}"#).is_err(), "missing fields");

        let after: Value = store::read_slot(&db, store::TABLES_KEY).unwrap();
        assert_eq!(before, after);
    }
}
