//! Pool table rental tracker.
//!
//! Two pool tables, each with a roster of players accruing charges from
//! game losses and rented hours. `total` is derived state; every mutation
//! routes through [`PoolPlayer::recompute_total`] so a stored total can
//! never disagree with its inputs.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::db::DbState;
use crate::store;
use crate::tables::UnpaidCustomer;

/// Flat fee charged per lost game, in pesos.
pub const LOSS_FEE: f64 = 30.0;

/// Hourly table rate applied to new players.
pub const DEFAULT_HOURLY_RATE: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PoolPaymentStatus {
    Paid,
    #[default]
    Unpaid,
}

/// One player on a pool table's roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolPlayer {
    pub id: String,
    pub name: String,
    pub losses: u32,
    pub hours: u32,
    pub rate: f64,
    pub status: PoolPaymentStatus,
    pub total: f64,
}

impl PoolPlayer {
    pub fn new(name: &str) -> Self {
        let mut player = PoolPlayer {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            losses: 0,
            hours: 0,
            rate: DEFAULT_HOURLY_RATE,
            status: PoolPaymentStatus::Unpaid,
            total: 0.0,
        };
        player.recompute_total();
        player
    }

    /// `losses × LOSS_FEE + hours × rate`. The only place `total` is set
    /// from charge inputs.
    pub fn recompute_total(&mut self) {
        self.total = f64::from(self.losses) * LOSS_FEE + f64::from(self.hours) * self.rate;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolTable {
    pub id: u32,
    pub name: String,
    pub players: Vec<PoolPlayer>,
}

fn seeded_player(name: &str, losses: u32, hours: u32) -> PoolPlayer {
    let mut player = PoolPlayer::new(name);
    player.losses = losses;
    player.hours = hours;
    player.recompute_total();
    player
}

fn default_pool_tables() -> Vec<PoolTable> {
    vec![
        PoolTable {
            id: 1,
            name: "Pool Table 1".to_string(),
            players: vec![seeded_player("John", 2, 2)],
        },
        PoolTable {
            id: 2,
            name: "Pool Table 2".to_string(),
            players: vec![seeded_player("Anna", 1, 3)],
        },
    ]
}

/// Load the pool tables, seeding the default two-table layout on first run.
pub fn load_pool_tables(db: &DbState) -> Result<Vec<PoolTable>, String> {
    if let Some(tables) = store::read_slot_opt::<Vec<PoolTable>>(db, store::POOL_TABLES_KEY)? {
        return Ok(tables);
    }
    let tables = default_pool_tables();
    save_pool_tables(db, &tables)?;
    Ok(tables)
}

fn save_pool_tables(db: &DbState, tables: &[PoolTable]) -> Result<(), String> {
    store::write_slot(db, store::POOL_TABLES_KEY, &tables)
}

fn with_player<F>(db: &DbState, table_id: u32, player_id: &str, f: F) -> Result<(), String>
where
    F: FnOnce(&mut PoolPlayer),
{
    let mut tables = load_pool_tables(db)?;
    let table = tables
        .iter_mut()
        .find(|t| t.id == table_id)
        .ok_or_else(|| format!("Pool table not found: {table_id}"))?;
    let player = table
        .players
        .iter_mut()
        .find(|p| p.id == player_id)
        .ok_or_else(|| format!("Player not found: {player_id}"))?;
    f(player);
    save_pool_tables(db, &tables)
}

/// Record one lost game. The loss fee lands in the recomputed total.
pub fn add_loss(db: &DbState, table_id: u32, player_id: &str) -> Result<(), String> {
    with_player(db, table_id, player_id, |player| {
        player.losses += 1;
        player.recompute_total();
    })
}

/// Record one rented hour at the player's rate.
pub fn add_hour(db: &DbState, table_id: u32, player_id: &str) -> Result<(), String> {
    with_player(db, table_id, player_id, |player| {
        player.hours += 1;
        player.recompute_total();
    })
}

/// Settle a player's tab: charges are zeroed and the status flips to paid.
pub fn mark_paid(db: &DbState, table_id: u32, player_id: &str) -> Result<(), String> {
    with_player(db, table_id, player_id, |player| {
        player.losses = 0;
        player.hours = 0;
        player.status = PoolPaymentStatus::Paid;
        player.recompute_total();
    })
}

/// Flip the status back to unpaid. Charges are left untouched.
pub fn mark_unpaid(db: &DbState, table_id: u32, player_id: &str) -> Result<(), String> {
    with_player(db, table_id, player_id, |player| {
        player.status = PoolPaymentStatus::Unpaid;
    })
}

/// Reset one player: a paid player leaves the roster, an unpaid player
/// stays with zeroed charges.
pub fn reset_player(db: &DbState, table_id: u32, player_id: &str) -> Result<(), String> {
    let mut tables = load_pool_tables(db)?;
    let table = tables
        .iter_mut()
        .find(|t| t.id == table_id)
        .ok_or_else(|| format!("Pool table not found: {table_id}"))?;
    let idx = table
        .players
        .iter()
        .position(|p| p.id == player_id)
        .ok_or_else(|| format!("Player not found: {player_id}"))?;
    if table.players[idx].status == PoolPaymentStatus::Paid {
        table.players.remove(idx);
    } else {
        let player = &mut table.players[idx];
        player.losses = 0;
        player.hours = 0;
        player.status = PoolPaymentStatus::Unpaid;
        player.recompute_total();
    }
    save_pool_tables(db, &tables)
}

/// Zero every player's charges across every table in one operation.
/// Nobody leaves any roster.
pub fn reset_all(db: &DbState) -> Result<(), String> {
    let mut tables = load_pool_tables(db)?;
    for table in &mut tables {
        for player in &mut table.players {
            player.losses = 0;
            player.hours = 0;
            player.status = PoolPaymentStatus::Unpaid;
            player.recompute_total();
        }
    }
    save_pool_tables(db, &tables)
}

/// Add a player to a table's roster. Blank names are rejected; the stored
/// name is trimmed.
pub fn add_player(db: &DbState, table_id: u32, name: &str) -> Result<PoolPlayer, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Player name is required".to_string());
    }
    let mut tables = load_pool_tables(db)?;
    let table = tables
        .iter_mut()
        .find(|t| t.id == table_id)
        .ok_or_else(|| format!("Pool table not found: {table_id}"))?;
    let player = PoolPlayer::new(name);
    table.players.push(player.clone());
    save_pool_tables(db, &tables)?;
    info!(table = table_id, player = name, "pool player added");
    Ok(player)
}

/// Remove a player unconditionally, paid or not.
pub fn remove_player(db: &DbState, table_id: u32, player_id: &str) -> Result<(), String> {
    let mut tables = load_pool_tables(db)?;
    let table = tables
        .iter_mut()
        .find(|t| t.id == table_id)
        .ok_or_else(|| format!("Pool table not found: {table_id}"))?;
    let before = table.players.len();
    table.players.retain(|p| p.id != player_id);
    if table.players.len() == before {
        return Err(format!("Player not found: {player_id}"));
    }
    save_pool_tables(db, &tables)
}

/// Unpaid players with an outstanding balance, as notification rows
/// labeled with their table's name.
pub fn unpaid_customers(tables: &[PoolTable]) -> Vec<UnpaidCustomer> {
    tables
        .iter()
        .flat_map(|table| {
            table.players.iter().filter_map(|player| {
                if player.status == PoolPaymentStatus::Unpaid && player.total > 0.0 {
                    Some(UnpaidCustomer {
                        name: player.name.clone(),
                        table: table.name.clone(),
                        total_owed: player.total,
                    })
                } else {
                    None
                }
            })
        })
        .collect()
}

/// Sum of all unpaid balances across both tables.
pub fn outstanding_total(tables: &[PoolTable]) -> f64 {
    unpaid_customers(tables).iter().map(|c| c.total_owed).sum()
}
