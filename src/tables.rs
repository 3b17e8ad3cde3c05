//! Dine-in table and order lifecycle.
//!
//! The bar has a fixed roster of 15 tables; slots are never created or
//! destroyed at runtime, only reset. Each table is either fully empty
//! (`isOccupied = false`, all order fields blank/zero) or fully populated.
//! The central mutator is [`save_table`], which classifies every save as a
//! new order, an in-place edit, or a completion; completions archive an
//! immutable [`OrderHistoryEntry`] snapshot before the live record is
//! cleared. Derived pricing (`price`, `totalCost`) is recomputed from the
//! menu catalog inside the save, overriding any caller-supplied values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::activity::{self, tags, ActivitySource};
use crate::db::DbState;
use crate::error::ValidationErrors;
use crate::menu;
use crate::staff::StaffProfile;
use crate::store;

/// Fixed roster size. Table numbers run 1..=15.
pub const TABLE_COUNT: u32 = 15;

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 20;

/// Payment state of an active order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

/// One dine-in table slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Table {
    pub id: u32,
    pub table_number: u32,
    pub customer_name: String,
    pub beer_ordered: String,
    pub custom_order: String,
    pub payment_status: PaymentStatus,
    pub time_of_order: Option<DateTime<Utc>>,
    pub time_finished: Option<DateTime<Utc>>,
    pub time_in: Option<DateTime<Utc>>,
    pub time_out: Option<DateTime<Utc>>,
    /// Milliseconds between `timeIn` and `timeOut`, once completed.
    pub duration: Option<i64>,
    pub quantity: u32,
    pub price: f64,
    pub total_cost: f64,
    pub is_occupied: bool,
    pub handled_by: Option<i64>,
    pub handled_by_name: Option<String>,
}

impl Default for Table {
    fn default() -> Self {
        Table::empty(0)
    }
}

impl Table {
    /// A table in the fully-empty state.
    pub fn empty(id: u32) -> Self {
        Table {
            id,
            table_number: id,
            customer_name: String::new(),
            beer_ordered: String::new(),
            custom_order: String::new(),
            payment_status: PaymentStatus::Unpaid,
            time_of_order: None,
            time_finished: None,
            time_in: None,
            time_out: None,
            duration: None,
            quantity: 1,
            price: 0.0,
            total_cost: 0.0,
            is_occupied: false,
            handled_by: None,
            handled_by_name: None,
        }
    }

    /// The fully-empty invariant: an unoccupied table has no order data.
    pub fn is_fully_empty(&self) -> bool {
        !self.is_occupied
            && self.customer_name.is_empty()
            && self.beer_ordered.is_empty()
            && self.total_cost == 0.0
    }
}

/// Proposed new state for one table, as submitted from the edit form.
#[derive(Debug, Clone, Default)]
pub struct TableInput {
    pub is_occupied: bool,
    pub customer_name: String,
    pub beer_ordered: String,
    pub quantity: u32,
    pub custom_order: String,
    pub payment_status: PaymentStatus,
}

/// Immutable archival record of a completed order. Created exactly once, at
/// the occupied→unoccupied transition, from the table's prior state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub table_number: u32,
    pub customer_name: String,
    pub beer_ordered: String,
    pub quantity: u32,
    pub total_cost: f64,
    pub payment_status: PaymentStatus,
    pub time_in: Option<DateTime<Utc>>,
    pub time_out: Option<DateTime<Utc>>,
    pub duration: Option<i64>,
    pub custom_order: String,
    pub handled_by: Option<i64>,
    pub handled_by_name: Option<String>,
}

/// How [`save_table`] classified the transition.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// unoccupied → occupied: timestamps stamped, `add_order` logged.
    NewOrder,
    /// occupied → occupied (or a no-op save of an empty table).
    Edited,
    /// occupied → unoccupied: snapshot archived, live record cleared.
    Completed { history_entry: OrderHistoryEntry },
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Table not found: {0}")]
    TableNotFound(u32),
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),
    #[error("{0}")]
    Storage(String),
}

// ---------------------------------------------------------------------------
// Roster persistence
// ---------------------------------------------------------------------------

/// Load the table roster, seeding 15 empty tables on first run. A stored
/// roster of the wrong size is discarded and reseeded.
pub fn load_tables(db: &DbState) -> Result<Vec<Table>, String> {
    if let Some(tables) = store::read_slot_opt::<Vec<Table>>(db, store::TABLES_KEY)? {
        if tables.len() == TABLE_COUNT as usize {
            return Ok(tables);
        }
        warn!(
            found = tables.len(),
            expected = TABLE_COUNT,
            "stored roster has wrong size, reseeding"
        );
    }
    let tables: Vec<Table> = (1..=TABLE_COUNT).map(Table::empty).collect();
    store::write_slot(db, store::TABLES_KEY, &tables)?;
    Ok(tables)
}

fn save_tables(db: &DbState, tables: &[Table]) -> Result<(), String> {
    store::write_slot(db, store::TABLES_KEY, &tables)
}

/// Load the order history, oldest first. Missing or corrupt data yields an
/// empty history.
pub fn load_order_history(db: &DbState) -> Result<Vec<OrderHistoryEntry>, String> {
    store::read_slot(db, store::ORDER_HISTORY_KEY)
}

/// Bulk-clear the archive. Staff action from the history screen.
pub fn clear_order_history(db: &DbState) -> Result<(), String> {
    store::remove_slot(db, store::ORDER_HISTORY_KEY)
}

// ---------------------------------------------------------------------------
// Save (the central mutator)
// ---------------------------------------------------------------------------

fn validate_input(input: &TableInput) -> Result<(), ValidationErrors> {
    if !input.is_occupied {
        return Ok(());
    }
    let mut errors = ValidationErrors::new();
    if input.customer_name.trim().is_empty() {
        errors.add("customerName", "Customer name is required");
    }
    if input.beer_ordered.trim().is_empty() {
        errors.add("beerOrdered", "Beer order is required");
    }
    if input.quantity < MIN_QUANTITY || input.quantity > MAX_QUANTITY {
        errors.add("quantity", "Quantity must be between 1 and 20");
    }
    errors.into_result()
}

/// Apply a proposed state to one table.
///
/// Validation failures block the save entirely (no partial update). The
/// transition is classified by comparing old and new occupancy:
///
/// - unoccupied → occupied stamps `timeIn`/`timeOfOrder` once,
/// - occupied → unoccupied stamps `timeOut`/`timeFinished`, archives an
///   [`OrderHistoryEntry`] of the prior state, then clears the live record,
/// - occupied → occupied edits in place, leaving both timestamps untouched.
///
/// Every save re-stamps `handledBy` and recomputes `price`/`totalCost` from
/// the catalog. The whole roster (and, on completion, the appended history)
/// is persisted before the activity log entry is appended.
pub fn save_table(
    db: &DbState,
    table_id: u32,
    input: &TableInput,
    staff: &StaffProfile,
    now: DateTime<Utc>,
) -> Result<SaveOutcome, SaveError> {
    validate_input(input)?;

    let mut tables = load_tables(db).map_err(SaveError::Storage)?;
    let idx = tables
        .iter()
        .position(|t| t.id == table_id)
        .ok_or(SaveError::TableNotFound(table_id))?;
    let old = tables[idx].clone();
    let was_occupied = old.is_occupied;

    if input.is_occupied {
        let table = &mut tables[idx];
        table.is_occupied = true;
        table.customer_name = input.customer_name.clone();
        table.beer_ordered = input.beer_ordered.clone();
        table.custom_order = input.custom_order.clone();
        table.quantity = input.quantity;
        table.payment_status = input.payment_status;
        // Derived pricing is never trusted from the caller.
        table.price = menu::price_by_name(&input.beer_ordered);
        table.total_cost = menu::total_cost(&input.beer_ordered, input.quantity);
        if !was_occupied {
            table.time_of_order = Some(now);
            table.time_in = Some(now);
            table.time_finished = None;
            table.time_out = None;
            table.duration = None;
        }
        table.handled_by = Some(staff.id);
        table.handled_by_name = Some(staff.name.clone());
    } else {
        tables[idx] = Table::empty(old.id);
    }

    let outcome = if !was_occupied && input.is_occupied {
        SaveOutcome::NewOrder
    } else if was_occupied && !input.is_occupied {
        let duration = old.time_in.map(|time_in| (now - time_in).num_milliseconds());
        let history_entry = OrderHistoryEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: now,
            table_number: old.table_number,
            customer_name: old.customer_name.clone(),
            beer_ordered: old.beer_ordered.clone(),
            quantity: old.quantity,
            total_cost: old.total_cost,
            payment_status: old.payment_status,
            time_in: old.time_in,
            time_out: Some(now),
            duration,
            custom_order: old.custom_order.clone(),
            handled_by: old.handled_by,
            handled_by_name: old.handled_by_name.clone(),
        };
        SaveOutcome::Completed { history_entry }
    } else {
        SaveOutcome::Edited
    };

    save_tables(db, &tables).map_err(SaveError::Storage)?;

    match &outcome {
        SaveOutcome::NewOrder => {
            activity::log_activity(
                db,
                ActivitySource::Order,
                tags::ADD_ORDER,
                Some((staff.id, &staff.name)),
                json!({
                    "tableNumber": old.table_number,
                    "customerName": input.customer_name,
                    "beerOrdered": input.beer_ordered,
                    "totalCost": tables[idx].total_cost,
                }),
                now,
            )
            .map_err(SaveError::Storage)?;
            info!(table = old.table_number, "new order opened");
        }
        SaveOutcome::Completed { history_entry } => {
            let mut history = load_order_history(db).map_err(SaveError::Storage)?;
            history.push(history_entry.clone());
            store::write_slot(db, store::ORDER_HISTORY_KEY, &history)
                .map_err(SaveError::Storage)?;

            activity::log_activity(
                db,
                ActivitySource::Order,
                tags::COMPLETE_ORDER,
                Some((staff.id, &staff.name)),
                json!({
                    "tableNumber": old.table_number,
                    "customerName": old.customer_name,
                    "duration": history_entry.duration,
                }),
                now,
            )
            .map_err(SaveError::Storage)?;
            info!(table = old.table_number, "order completed and archived");
        }
        SaveOutcome::Edited => {
            activity::log_activity(
                db,
                ActivitySource::Order,
                tags::EDIT_ORDER,
                Some((staff.id, &staff.name)),
                json!({
                    "tableNumber": old.table_number,
                    "customerName": input.customer_name,
                    "beerOrdered": input.beer_ordered,
                }),
                now,
            )
            .map_err(SaveError::Storage)?;
        }
    }

    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Point mutations
// ---------------------------------------------------------------------------

/// Set one table's payment status to paid without touching any other field.
/// Calling it twice is the same as calling it once.
pub fn mark_as_paid(
    db: &DbState,
    table_id: u32,
    staff: &StaffProfile,
    now: DateTime<Utc>,
) -> Result<(), String> {
    let mut tables = load_tables(db)?;
    let table = tables
        .iter_mut()
        .find(|t| t.id == table_id)
        .ok_or_else(|| format!("Table not found: {table_id}"))?;
    table.payment_status = PaymentStatus::Paid;
    let details = json!({
        "tableNumber": table.table_number,
        "customerName": table.customer_name,
        "totalCost": table.total_cost,
    });
    save_tables(db, &tables)?;

    activity::log_activity(
        db,
        ActivitySource::Order,
        tags::MARK_PAID,
        Some((staff.id, &staff.name)),
        details,
        now,
    )?;
    Ok(())
}

/// Force-reset a table to the fully-empty state regardless of payment
/// status. Policy: force-clear never archives — unlike the normal
/// completion path, no [`OrderHistoryEntry`] is written.
pub fn clear_table(db: &DbState, table_id: u32) -> Result<(), String> {
    let mut tables = load_tables(db)?;
    let table = tables
        .iter_mut()
        .find(|t| t.id == table_id)
        .ok_or_else(|| format!("Table not found: {table_id}"))?;
    *table = Table::empty(table.id);
    save_tables(db, &tables)
}

// ---------------------------------------------------------------------------
// Pure projections
// ---------------------------------------------------------------------------

/// Status predicate for [`filter_tables`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Occupied,
    Available,
    Unpaid,
    Paid,
}

/// Case-insensitive substring match on customer name, table number, or beer
/// name, intersected with the status predicate. Stateless; recomputed on
/// every change to the roster, query, or filter.
pub fn filter_tables(tables: &[Table], query: &str, status: StatusFilter) -> Vec<Table> {
    let needle = query.trim().to_lowercase();
    tables
        .iter()
        .filter(|t| {
            if !needle.is_empty() {
                let matches = t.customer_name.to_lowercase().contains(&needle)
                    || t.table_number.to_string().contains(&needle)
                    || t.beer_ordered.to_lowercase().contains(&needle);
                if !matches {
                    return false;
                }
            }
            match status {
                StatusFilter::All => true,
                StatusFilter::Occupied => t.is_occupied,
                StatusFilter::Available => !t.is_occupied,
                StatusFilter::Unpaid => {
                    t.is_occupied && t.payment_status == PaymentStatus::Unpaid
                }
                StatusFilter::Paid => t.is_occupied && t.payment_status == PaymentStatus::Paid,
            }
        })
        .cloned()
        .collect()
}

/// One row on the unpaid-customers notification surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnpaidCustomer {
    pub name: String,
    pub table: String,
    pub total_owed: f64,
}

/// Occupied, unpaid tables as notification rows (`"Table {n}"` labels).
/// The dashboard merges these with the pool tracker's unpaid players.
pub fn unpaid_dine_in(tables: &[Table]) -> Vec<UnpaidCustomer> {
    tables
        .iter()
        .filter(|t| t.is_occupied && t.payment_status == PaymentStatus::Unpaid)
        .map(|t| UnpaidCustomer {
            name: t.customer_name.clone(),
            table: format!("Table {}", t.table_number),
            total_owed: t.total_cost,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::LogFilter;
    use crate::db::run_migrations_for_test;
    use crate::staff::{Role, StaffProfile};
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

    fn occupied_input(name: &str, beer: &str, quantity: u32) -> TableInput {
        TableInput {
            is_occupied: true,
            customer_name: name.into(),
            beer_ordered: beer.into(),
            quantity,
            custom_order: String::new(),
            payment_status: PaymentStatus::Unpaid,
        }
    }

    #[test]
    fn roster_seeds_fifteen_empty_tables() {
        let db = test_db();
        let tables = load_tables(&db).unwrap();
        assert_eq!(tables.len(), 15);
        assert!(tables.iter().all(Table::is_fully_empty));
        assert_eq!(tables[0].id, 1);
        assert_eq!(tables[14].table_number, 15);
    }

    #[test]
    fn new_order_then_completion_scenario() {
        let db = test_db();
        load_tables(&db).unwrap();
        let t0 = Utc::now();

        // Save table 3 with Mia's Heineken order
        let outcome = save_table(&db, 3, &occupied_input("Mia", "Heineken", 2), &anna(), t0)
            .unwrap();
        assert_eq!(outcome, SaveOutcome::NewOrder);

        let tables = load_tables(&db).unwrap();
        let table3 = &tables[2];
        assert!(table3.is_occupied);
        assert_eq!(table3.price, 160.0);
        assert_eq!(table3.total_cost, 320.0);
        assert_eq!(table3.time_in, Some(t0));
        assert_eq!(table3.payment_status, PaymentStatus::Unpaid);
        assert_eq!(table3.handled_by_name.as_deref(), Some("Anna Santos"));

        // Complete the order ten minutes later
        let t1 = t0 + Duration::minutes(10);
        let outcome = save_table(
            &db,
            3,
            &TableInput {
                is_occupied: false,
                ..Default::default()
            },
            &anna(),
            t1,
        )
        .unwrap();

        let entry = match outcome {
            SaveOutcome::Completed { history_entry } => history_entry,
            other => panic!("expected completion, got {other:?}"),
        };
        assert_eq!(entry.customer_name, "Mia");
        assert_eq!(entry.total_cost, 320.0);
        assert_eq!(entry.duration, Some(Duration::minutes(10).num_milliseconds()));
        assert_eq!(entry.time_out, Some(t1));

        // The live table is back to the fully-empty invariant
        let tables = load_tables(&db).unwrap();
        assert!(tables[2].is_fully_empty());
        assert_eq!(tables[2].time_in, None);

        // And the snapshot was archived
        let history = load_order_history(&db).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0], entry);
    }

    #[test]
    fn edit_preserves_time_in_and_recomputes_totals() {
        let db = test_db();
        load_tables(&db).unwrap();
        let t0 = Utc::now();
        save_table(&db, 5, &occupied_input("Rico", "San Miguel", 1), &anna(), t0).unwrap();

        // Edit quantity and beer an hour later; a bogus total in the input
        // model is impossible by construction, but the stored totals must
        // still be derived from the catalog.
        let t1 = t0 + Duration::hours(1);
        let outcome =
            save_table(&db, 5, &occupied_input("Rico", "Red Horse", 3), &anna(), t1).unwrap();
        assert_eq!(outcome, SaveOutcome::Edited);

        let tables = load_tables(&db).unwrap();
        let table5 = &tables[4];
        assert_eq!(table5.time_in, Some(t0), "edit must not re-stamp timeIn");
        assert_eq!(table5.price, 110.0);
        assert_eq!(table5.total_cost, 330.0);
        assert!(load_order_history(&db).unwrap().is_empty());
    }

    #[test]
    fn validation_blocks_bad_saves() {
        let db = test_db();
        load_tables(&db).unwrap();
        let now = Utc::now();

        // Missing name and beer
        let err = save_table(
            &db,
            1,
            &occupied_input("  ", "", 1),
            &anna(),
            now,
        )
        .unwrap_err();
        match err {
            SaveError::Invalid(errors) => {
                assert!(errors.get("customerName").is_some());
                assert!(errors.get("beerOrdered").is_some());
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        // Quantity boundaries: 0 and 21 rejected, 1 and 20 accepted
        for (quantity, ok) in [(0, false), (1, true), (20, true), (21, false)] {
            let result = save_table(
                &db,
                1,
                &occupied_input("Mia", "Heineken", quantity),
                &anna(),
                now,
            );
            assert_eq!(result.is_ok(), ok, "quantity {quantity}");
        }

        // The table was never partially saved by the rejected inputs
        let tables = load_tables(&db).unwrap();
        assert_eq!(tables[0].quantity, 20);
    }

    #[test]
    fn unknown_table_id_is_rejected() {
        let db = test_db();
        load_tables(&db).unwrap();
        let err = save_table(
            &db,
            99,
            &occupied_input("Mia", "Heineken", 1),
            &anna(),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, SaveError::TableNotFound(99)));
    }

    #[test]
    fn mark_as_paid_is_idempotent() {
        let db = test_db();
        load_tables(&db).unwrap();
        let now = Utc::now();
        save_table(&db, 2, &occupied_input("Jo", "Guinness", 1), &anna(), now).unwrap();

        mark_as_paid(&db, 2, &anna(), now).unwrap();
        let once = load_tables(&db).unwrap();
        mark_as_paid(&db, 2, &anna(), now).unwrap();
        let twice = load_tables(&db).unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice[1].payment_status, PaymentStatus::Paid);
        assert_eq!(twice[1].customer_name, "Jo", "no other field may change");
    }

    #[test]
    fn force_clear_never_archives() {
        let db = test_db();
        load_tables(&db).unwrap();
        let now = Utc::now();
        save_table(&db, 7, &occupied_input("Ben", "Tiger Beer", 2), &anna(), now).unwrap();

        clear_table(&db, 7).unwrap();

        let tables = load_tables(&db).unwrap();
        assert!(tables[6].is_fully_empty());
        assert!(
            load_order_history(&db).unwrap().is_empty(),
            "force-clear must not write history"
        );
    }

    #[test]
    fn lifecycle_actions_are_logged() {
        let db = test_db();
        load_tables(&db).unwrap();
        let t0 = Utc::now();

        save_table(&db, 4, &occupied_input("Mia", "Heineken", 2), &anna(), t0).unwrap();
        save_table(&db, 4, &occupied_input("Mia", "Heineken", 3), &anna(), t0).unwrap();
        save_table(
            &db,
            4,
            &TableInput {
                is_occupied: false,
                ..Default::default()
            },
            &anna(),
            t0 + Duration::minutes(5),
        )
        .unwrap();

        let logs = activity::get_logs(&db, &LogFilter::default()).unwrap();
        let tags_seen: Vec<&str> = logs.iter().map(|l| l.activity.as_str()).collect();
        assert_eq!(tags_seen, vec!["add_order", "edit_order", "complete_order"]);
    }

    #[test]
    fn filtering_is_a_pure_projection() {
        let db = test_db();
        load_tables(&db).unwrap();
        let now = Utc::now();
        save_table(&db, 1, &occupied_input("Mia", "Heineken", 1), &anna(), now).unwrap();
        save_table(&db, 2, &occupied_input("Marco", "Guinness", 1), &anna(), now).unwrap();
        mark_as_paid(&db, 2, &anna(), now).unwrap();

        let tables = load_tables(&db).unwrap();

        let occupied = filter_tables(&tables, "", StatusFilter::Occupied);
        assert_eq!(occupied.len(), 2);

        let available = filter_tables(&tables, "", StatusFilter::Available);
        assert_eq!(available.len(), 13);

        let unpaid = filter_tables(&tables, "", StatusFilter::Unpaid);
        assert_eq!(unpaid.len(), 1);
        assert_eq!(unpaid[0].customer_name, "Mia");

        let paid = filter_tables(&tables, "", StatusFilter::Paid);
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].customer_name, "Marco");

        // Case-insensitive substring on name and beer; number as string
        assert_eq!(filter_tables(&tables, "mIA", StatusFilter::All).len(), 1);
        assert_eq!(filter_tables(&tables, "guinness", StatusFilter::All).len(), 1);
        let by_number = filter_tables(&tables, "12", StatusFilter::All);
        assert_eq!(by_number.len(), 1);
        assert_eq!(by_number[0].table_number, 12);

        // Query intersects with status
        assert!(filter_tables(&tables, "Mia", StatusFilter::Paid).is_empty());
    }

    #[test]
    fn unpaid_dine_in_rows_for_notifications() {
        let db = test_db();
        load_tables(&db).unwrap();
        let now = Utc::now();
        save_table(&db, 9, &occupied_input("Mia", "Heineken", 2), &anna(), now).unwrap();

        let tables = load_tables(&db).unwrap();
        let rows = unpaid_dine_in(&tables);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Mia");
        assert_eq!(rows[0].table, "Table 9");
        assert_eq!(rows[0].total_owed, 320.0);
    }
}
