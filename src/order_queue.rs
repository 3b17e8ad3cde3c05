//! Incoming customer order queue.
//!
//! Orders arrive through three channels persisted in separate slots: QR
//! code scans at a table, ad-hoc table orders, and walk-up customer orders.
//! Reads merge all three; a status update writes the order back to the slot
//! its shape belongs in, so an order that drifted into the wrong slot heals
//! on its next update. Unknown fields on an order are carried through
//! untouched, the queue only owns `status`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::db::DbState;
use crate::store;

/// Suggested polling cadence for queue screens.
pub const REFRESH_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Served,
    Cancelled,
}

impl OrderStatus {
    /// The next step in the fulfilment chain. Served and cancelled are
    /// terminal.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Served),
            OrderStatus::Served | OrderStatus::Cancelled => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

/// One queued order. The channels disagree on everything except `id`,
/// `customerName`, `tableNumber` and `status`; the rest rides in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrder {
    pub id: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<Value>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CustomerOrder {
    /// The slot this order's shape belongs in. Orders with a table number
    /// came from a QR scan, unless the name is a generated walk-up
    /// placeholder; orders without a table number are plain table orders.
    fn home_slot(&self) -> &'static str {
        match &self.table_number {
            Some(_) if !self.customer_name.contains("Customer") => store::QR_ORDERS_KEY,
            None => store::TABLE_ORDERS_KEY,
            Some(_) => store::CUSTOMER_ORDERS_KEY,
        }
    }
}

const QUEUE_SLOTS: [&str; 3] = [
    store::QR_ORDERS_KEY,
    store::TABLE_ORDERS_KEY,
    store::CUSTOMER_ORDERS_KEY,
];

/// All queued orders, merged QR first, then table, then walk-up.
pub fn load_order_queue(db: &DbState) -> Result<Vec<CustomerOrder>, String> {
    let mut merged = Vec::new();
    for slot in QUEUE_SLOTS {
        let mut orders: Vec<CustomerOrder> = store::read_slot(db, slot)?;
        merged.append(&mut orders);
    }
    Ok(merged)
}

/// Set one order's status, wherever it currently lives, and write it back
/// to its home slot.
pub fn update_order_status(
    db: &DbState,
    order_id: &str,
    status: OrderStatus,
) -> Result<CustomerOrder, String> {
    let mut found: Option<CustomerOrder> = None;
    for slot in QUEUE_SLOTS {
        let mut orders: Vec<CustomerOrder> = store::read_slot(db, slot)?;
        if let Some(idx) = orders.iter().position(|o| o.id == order_id) {
            let mut order = orders.remove(idx);
            store::write_slot(db, slot, &orders)?;
            order.status = status;
            found = Some(order);
            break;
        }
    }
    let order = found.ok_or_else(|| format!("Order not found: {order_id}"))?;

    let home = order.home_slot();
    let mut orders: Vec<CustomerOrder> = store::read_slot(db, home)?;
    orders.push(order.clone());
    store::write_slot(db, home, &orders)?;
    info!(order = order_id, ?status, "order status updated");
    Ok(order)
}

/// Step one order forward along the fulfilment chain. Terminal orders are
/// rejected.
pub fn advance_order(db: &DbState, order_id: &str) -> Result<CustomerOrder, String> {
    let current = load_order_queue(db)?
        .into_iter()
        .find(|o| o.id == order_id)
        .ok_or_else(|| format!("Order not found: {order_id}"))?;
    let next = current
        .status
        .next()
        .ok_or_else(|| format!("Order {order_id} is already {:?}", current.status))?;
    update_order_status(db, order_id, next)
}

/// Cancel an order from any non-terminal state.
pub fn cancel_order(db: &DbState, order_id: &str) -> Result<CustomerOrder, String> {
    let current = load_order_queue(db)?
        .into_iter()
        .find(|o| o.id == order_id)
        .ok_or_else(|| format!("Order not found: {order_id}"))?;
    if current.status.is_terminal() {
        return Err(format!("Order {order_id} is already {:?}", current.status));
    }
    update_order_status(db, order_id, OrderStatus::Cancelled)
}
