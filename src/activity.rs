//! Consolidated staff activity log.
//!
//! Order, staff, session, and backup events all land in one bounded log
//! under `activityLogs`, distinguished by a structured `source` field. The
//! log retains only the newest [`MAX_LOG_ENTRIES`] entries; older entries
//! are unrecoverably dropped. It is a bounded operational trail, not a
//! full audit log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::db::DbState;
use crate::store;

/// Maximum number of retained log entries. Oldest are evicted on overflow.
pub const MAX_LOG_ENTRIES: usize = 1000;

/// Activity tags shared across the crate.
pub mod tags {
    pub const LOGIN: &str = "login";
    pub const LOGOUT: &str = "logout";
    pub const ADD_ORDER: &str = "add_order";
    pub const EDIT_ORDER: &str = "edit_order";
    pub const COMPLETE_ORDER: &str = "complete_order";
    pub const MARK_PAID: &str = "mark_paid";
    pub const EXPORT_DATA: &str = "export_data";
    pub const RESTORE_DATA: &str = "restore_data";
    pub const SESSION_TIMEOUT: &str = "session_timeout";
}

/// Which subsystem produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivitySource {
    Order,
    Staff,
    Session,
    Backup,
}

/// One appended log record. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub source: ActivitySource,
    pub activity: String,
    pub staff_id: Option<i64>,
    pub staff_name: Option<String>,
    #[serde(default)]
    pub details: Value,
}

/// Optional filters for [`get_logs`]. Empty filter returns everything.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub activity: Option<String>,
    pub staff_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Append one entry and truncate the log to the newest [`MAX_LOG_ENTRIES`].
pub fn log_activity(
    db: &DbState,
    source: ActivitySource,
    activity: &str,
    staff: Option<(i64, &str)>,
    details: Value,
    now: DateTime<Utc>,
) -> Result<LogEntry, String> {
    let entry = LogEntry {
        id: Uuid::new_v4().to_string(),
        timestamp: now,
        source,
        activity: activity.to_string(),
        staff_id: staff.map(|(id, _)| id),
        staff_name: staff.map(|(_, name)| name.to_string()),
        details,
    };

    let mut logs: Vec<LogEntry> = store::read_slot(db, store::ACTIVITY_LOGS_KEY)?;
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        let overflow = logs.len() - MAX_LOG_ENTRIES;
        logs.drain(..overflow);
    }
    store::write_slot(db, store::ACTIVITY_LOGS_KEY, &logs)?;

    Ok(entry)
}

/// Read the log, optionally filtered, in original insertion order.
pub fn get_logs(db: &DbState, filter: &LogFilter) -> Result<Vec<LogEntry>, String> {
    let logs: Vec<LogEntry> = store::read_slot(db, store::ACTIVITY_LOGS_KEY)?;
    Ok(logs
        .into_iter()
        .filter(|entry| {
            if let Some(activity) = &filter.activity {
                if &entry.activity != activity {
                    return false;
                }
            }
            if let Some(staff_id) = filter.staff_id {
                if entry.staff_id != Some(staff_id) {
                    return false;
                }
            }
            if let Some(from) = filter.from {
                if entry.timestamp < from {
                    return false;
                }
            }
            if let Some(to) = filter.to {
                if entry.timestamp > to {
                    return false;
                }
            }
            true
        })
        .collect())
}

/// Drop the entire log.
pub fn clear_logs(db: &DbState) -> Result<(), String> {
    store::remove_slot(db, store::ACTIVITY_LOGS_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{run_migrations_for_test, DbState};
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

    #[test]
    fn append_and_filter() {
        let db = test_db();
        let now = Utc::now();

        log_activity(
            &db,
            ActivitySource::Order,
            tags::ADD_ORDER,
            Some((1, "Anna Santos")),
            serde_json::json!({ "tableNumber": 3 }),
            now,
        )
        .unwrap();
        log_activity(
            &db,
            ActivitySource::Staff,
            tags::LOGIN,
            Some((2, "Jake Ramirez")),
            Value::Null,
            now + Duration::minutes(1),
        )
        .unwrap();

        let all = get_logs(&db, &LogFilter::default()).unwrap();
        assert_eq!(all.len(), 2);

        let anna_only = get_logs(
            &db,
            &LogFilter {
                staff_id: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(anna_only.len(), 1);
        assert_eq!(anna_only[0].activity, tags::ADD_ORDER);

        let logins = get_logs(
            &db,
            &LogFilter {
                activity: Some(tags::LOGIN.into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(logins.len(), 1);
        assert_eq!(logins[0].staff_name.as_deref(), Some("Jake Ramirez"));
    }

    #[test]
    fn log_is_bounded_at_1000_entries_oldest_evicted() {
        let db = test_db();
        let base = Utc::now();

        for i in 0..(MAX_LOG_ENTRIES + 1) {
            log_activity(
                &db,
                ActivitySource::Order,
                tags::EDIT_ORDER,
                None,
                serde_json::json!({ "seq": i }),
                base + Duration::seconds(i as i64),
            )
            .unwrap();
        }

        let logs = get_logs(&db, &LogFilter::default()).unwrap();
        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        // Entry 0 was the oldest and must be gone; the newest must remain.
        assert_eq!(logs[0].details["seq"], 1);
        assert_eq!(logs[MAX_LOG_ENTRIES - 1].details["seq"], MAX_LOG_ENTRIES);
    }

    #[test]
    fn date_range_filter() {
        let db = test_db();
        let base = Utc::now();
        for i in 0..5 {
            log_activity(
                &db,
                ActivitySource::Session,
                tags::SESSION_TIMEOUT,
                None,
                Value::Null,
                base + Duration::hours(i),
            )
            .unwrap();
        }

        let window = get_logs(
            &db,
            &LogFilter {
                from: Some(base + Duration::hours(1)),
                to: Some(base + Duration::hours(3)),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(window.len(), 3);
    }
}
