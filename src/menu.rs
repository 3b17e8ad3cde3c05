//! Static beer menu catalog with pricing.
//!
//! Prices are in pesos. The catalog is fixed at compile time; the lifecycle
//! code derives `price` and `totalCost` from it on every save so persisted
//! totals can never drift from their inputs.

/// A sellable menu item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuItem {
    pub name: &'static str,
    pub price: f64,
    pub category: &'static str,
}

const fn item(name: &'static str, price: f64, category: &'static str) -> MenuItem {
    MenuItem {
        name,
        price,
        category,
    }
}

/// Individually-sold bottles.
pub const INDIVIDUAL: &[MenuItem] = &[
    item("Budweiser", 120.0, "Domestic"),
    item("Coors Light", 110.0, "Domestic"),
    item("Miller Lite", 115.0, "Domestic"),
    item("Corona Extra", 150.0, "Import"),
    item("Heineken", 160.0, "Import"),
    item("Stella Artois", 170.0, "Import"),
    item("Guinness", 180.0, "Import"),
    item("Blue Moon", 140.0, "Craft"),
    item("Samuel Adams", 155.0, "Craft"),
    item("Dos Equis", 145.0, "Import"),
    item("Modelo Especial", 135.0, "Import"),
    item("Michelob Ultra", 125.0, "Domestic"),
    item("Pabst Blue Ribbon", 100.0, "Domestic"),
    item("Yuengling", 130.0, "Domestic"),
    item("Sierra Nevada", 165.0, "Craft"),
    item("San Miguel", 120.0, "Domestic"),
    item("Red Horse", 110.0, "Domestic"),
    item("Tiger Beer", 125.0, "Import"),
];

/// Six-bottle buckets.
pub const BUCKETS: &[MenuItem] = &[
    item("Bucket of Budweiser (6 bottles)", 650.0, "Bucket"),
    item("Bucket of Coors Light (6 bottles)", 600.0, "Bucket"),
    item("Bucket of Corona (6 bottles)", 850.0, "Bucket"),
    item("Bucket of Heineken (6 bottles)", 900.0, "Bucket"),
    item("Bucket of Stella Artois (6 bottles)", 950.0, "Bucket"),
    item("Bucket of Guinness (6 bottles)", 1000.0, "Bucket"),
    item("Mixed Beer Bucket (6 bottles)", 800.0, "Bucket"),
    item("Bucket of San Miguel (6 bottles)", 650.0, "Bucket"),
    item("Bucket of Red Horse (6 bottles)", 600.0, "Bucket"),
];

/// Time-limited promos.
pub const SPECIALS: &[MenuItem] = &[
    item("Happy Hour Special", 90.0, "Special"),
    item("Weekend Special", 100.0, "Special"),
    item("Game Day Special", 95.0, "Special"),
];

/// All menu items in display order: individual, buckets, specials.
pub fn all_items() -> impl Iterator<Item = &'static MenuItem> {
    INDIVIDUAL.iter().chain(BUCKETS).chain(SPECIALS)
}

/// Unit price for an item name, 0 for anything not on the menu.
pub fn price_by_name(name: &str) -> f64 {
    all_items()
        .find(|i| i.name == name)
        .map(|i| i.price)
        .unwrap_or(0.0)
}

/// Category for an item name, "Other" for anything not on the menu.
pub fn category_by_name(name: &str) -> &'static str {
    all_items()
        .find(|i| i.name == name)
        .map(|i| i.category)
        .unwrap_or("Other")
}

/// `price × quantity` for an item name.
pub fn total_cost(name: &str, quantity: u32) -> f64 {
    price_by_name(name) * f64::from(quantity)
}
