//! Dashboard analytics and sales reports.
//!
//! Everything here is a pure projection over the live roster and the order
//! history; nothing is persisted. Date partitions use the machine's local
//! calendar: "today" is the local date, the week starts on Sunday, and the
//! month window is the first of the month to the first of the next.
//! Occupied tables count as current sales alongside archived orders.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, Utc};
use serde::Serialize;

use crate::tables::{OrderHistoryEntry, Table, TABLE_COUNT};

/// One beer's aggregated sales volume.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerSales {
    pub name: String,
    pub quantity: u32,
}

/// The dashboard metric block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_tables: u32,
    pub occupied_tables: u32,
    pub available_tables: u32,
    /// Occupied tables already settled.
    pub paid_customers: u32,
    /// Occupied tables still owing.
    pub unpaid_customers: u32,
    /// Revenue from orders completed today. Archived orders only.
    pub today_sales: f64,
    /// Revenue from orders completed this week. Archived orders only.
    pub week_sales: f64,
    /// Open tabs currently on the floor.
    pub current_sales: f64,
    /// `today_sales + current_sales`.
    pub total_sales: f64,
    /// Top five beers by quantity over today's orders, current tables
    /// included. Ties keep first-seen order.
    pub top_selling_beers: Vec<BeerSales>,
    /// Mean completed-visit length, rounded to whole minutes.
    pub average_stay_minutes: i64,
    pub total_orders_today: u32,
    pub total_orders_this_week: u32,
    /// Occupied share of the roster, in percent.
    pub occupancy_rate: f64,
    /// Paid share of the occupied tables, in percent. Zero when the floor
    /// is empty.
    pub payment_rate: f64,
}

fn local_date(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.with_timezone(&Local).date_naive()
}

fn week_start(today: NaiveDate) -> NaiveDate {
    today - Days::new(u64::from(today.weekday().num_days_from_sunday()))
}

fn month_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
    let end = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    }
    .unwrap_or(today);
    (start, end)
}

fn history_in_window<'a>(
    history: &'a [OrderHistoryEntry],
    start: NaiveDate,
    end: NaiveDate,
) -> impl Iterator<Item = &'a OrderHistoryEntry> {
    history
        .iter()
        .filter(move |e| local_date(e.timestamp) >= start && local_date(e.timestamp) < end)
}

/// Beer volumes over a set of orders, first-seen order preserved, ties kept
/// stable under the descending sort.
fn beer_volumes<'a>(orders: impl Iterator<Item = (&'a str, u32)>) -> Vec<BeerSales> {
    let mut volumes: Vec<BeerSales> = Vec::new();
    for (name, quantity) in orders {
        if name.is_empty() {
            continue;
        }
        match volumes.iter_mut().find(|v| v.name == name) {
            Some(existing) => existing.quantity += quantity,
            None => volumes.push(BeerSales {
                name: name.to_string(),
                quantity,
            }),
        }
    }
    volumes.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    volumes
}

/// Compute the full dashboard block for the given moment.
pub fn compute_analytics(
    tables: &[Table],
    history: &[OrderHistoryEntry],
    now: DateTime<Utc>,
) -> Analytics {
    let today = local_date(now);
    let tomorrow = today + Days::new(1);
    let week = week_start(today);

    let occupied: Vec<&Table> = tables.iter().filter(|t| t.is_occupied).collect();
    let occupied_count = occupied.len() as u32;
    let paid_count = occupied
        .iter()
        .filter(|t| t.payment_status == crate::tables::PaymentStatus::Paid)
        .count() as u32;

    let today_orders: Vec<&OrderHistoryEntry> =
        history_in_window(history, today, tomorrow).collect();
    let week_orders: Vec<&OrderHistoryEntry> =
        history_in_window(history, week, tomorrow).collect();

    let today_sales: f64 = today_orders.iter().map(|e| e.total_cost).sum();
    let week_sales: f64 = week_orders.iter().map(|e| e.total_cost).sum();
    let current_sales: f64 = occupied.iter().map(|t| t.total_cost).sum();

    let beer_orders = today_orders
        .iter()
        .map(|e| (e.beer_ordered.as_str(), e.quantity))
        .chain(occupied.iter().map(|t| (t.beer_ordered.as_str(), t.quantity)));
    let mut top_selling_beers = beer_volumes(beer_orders);
    top_selling_beers.truncate(5);

    let stays: Vec<i64> = history.iter().filter_map(|e| e.duration).collect();
    let average_stay_minutes = if stays.is_empty() {
        0
    } else {
        let mean_ms = stays.iter().sum::<i64>() as f64 / stays.len() as f64;
        (mean_ms / 60_000.0).round() as i64
    };

    Analytics {
        total_tables: TABLE_COUNT,
        occupied_tables: occupied_count,
        available_tables: TABLE_COUNT - occupied_count,
        paid_customers: paid_count,
        unpaid_customers: occupied_count - paid_count,
        today_sales,
        week_sales,
        current_sales,
        total_sales: today_sales + current_sales,
        top_selling_beers,
        average_stay_minutes,
        total_orders_today: today_orders.len() as u32,
        total_orders_this_week: week_orders.len() as u32,
        occupancy_rate: f64::from(occupied_count) / f64::from(TABLE_COUNT) * 100.0,
        payment_rate: if occupied_count == 0 {
            0.0
        } else {
            f64::from(paid_count) / f64::from(occupied_count) * 100.0
        },
    }
}

/// Reporting window for [`generate_sales_report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Today,
    Week,
    Month,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub start_date: NaiveDate,
    /// Exclusive upper bound of the window.
    pub end_date: NaiveDate,
    pub order_count: u32,
    pub total_revenue: f64,
    pub average_order_value: f64,
}

/// Summarize orders in a local-calendar window. Occupied tables count as
/// orders of the current day, so a "today" report is never behind the floor.
pub fn generate_sales_report(
    tables: &[Table],
    history: &[OrderHistoryEntry],
    period: ReportPeriod,
    now: DateTime<Utc>,
) -> SalesReport {
    let today = local_date(now);
    let tomorrow = today + Days::new(1);
    let (start_date, end_date) = match period {
        ReportPeriod::Today => (today, tomorrow),
        ReportPeriod::Week => (week_start(today), tomorrow),
        ReportPeriod::Month => month_window(today),
    };

    let revenues: Vec<f64> = history_in_window(history, start_date, end_date)
        .map(|e| e.total_cost)
        .chain(tables.iter().filter(|t| t.is_occupied).map(|t| t.total_cost))
        .collect();

    let order_count = revenues.len() as u32;
    let total_revenue: f64 = revenues.iter().sum();
    SalesReport {
        start_date,
        end_date,
        order_count,
        total_revenue,
        average_order_value: if order_count == 0 {
            0.0
        } else {
            total_revenue / f64::from(order_count)
        },
    }
}
