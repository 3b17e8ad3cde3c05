//! Typed slot access over the kv_store table.
//!
//! Every persisted collection lives wholesale under one string key, the
//! key the frontend addresses it by. Reads validate the stored
//! JSON against the expected shape on load; missing or unparseable data falls
//! back to a documented default and is never surfaced as a fatal error (the
//! corrupt value is discarded on the next write).

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::db::{self, DbState};

// Persisted slot keys. One slot per collection, written wholesale.
pub const TABLES_KEY: &str = "barTables";
pub const ORDER_HISTORY_KEY: &str = "orderHistory";
pub const STAFF_USERS_KEY: &str = "staffUsers";
pub const CURRENT_USER_KEY: &str = "currentUser";
pub const ACTIVITY_LOGS_KEY: &str = "activityLogs";
pub const POOL_TABLES_KEY: &str = "poolTables";
pub const SETTINGS_KEY: &str = "barSettings";
pub const QR_ORDERS_KEY: &str = "qrOrders";
pub const TABLE_ORDERS_KEY: &str = "tableOrders";
pub const CUSTOMER_ORDERS_KEY: &str = "customerOrders";
pub const BACKUP_KEY_PREFIX: &str = "backup_";

/// Read the slot under `key`, or `T::default()` when the slot is missing or
/// holds JSON that no longer parses as `T`.
pub fn read_slot<T: DeserializeOwned + Default>(db: &DbState, key: &str) -> Result<T, String> {
    Ok(read_slot_opt(db, key)?.unwrap_or_default())
}

/// Read the slot under `key`. `None` when the slot is missing; corrupt JSON
/// is logged and treated as missing so callers can re-seed defaults.
pub fn read_slot_opt<T: DeserializeOwned>(db: &DbState, key: &str) -> Result<Option<T>, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;
    let raw = match db::get_raw(&conn, key) {
        Some(raw) => raw,
        None => return Ok(None),
    };
    match serde_json::from_str::<T>(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(key, error = %e, "discarding unparseable slot data");
            Ok(None)
        }
    }
}

/// Serialize `value` and write it under `key`, replacing the previous value.
pub fn write_slot<T: Serialize>(db: &DbState, key: &str, value: &T) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| format!("serialize {key}: {e}"))?;
    let conn = db.conn.lock().map_err(|e| e.to_string())?;
    db::set_raw(&conn, key, &raw)
}

/// Delete the slot under `key`.
pub fn remove_slot(db: &DbState, key: &str) -> Result<(), String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;
    db::remove_raw(&conn, key)
}

/// List slot keys with the given prefix, ascending.
pub fn keys_with_prefix(db: &DbState, prefix: &str) -> Result<Vec<String>, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;
    db::keys_with_prefix(&conn, prefix)
}
