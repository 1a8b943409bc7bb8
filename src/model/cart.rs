use serde::{Deserialize, Serialize};

use super::item::{ItemId, MenuItem};

/// One selected menu item with a snapshot of the fields the order needs.
///
/// Name, unit price, and kind are copied when the line is created so a later
/// catalog edit cannot silently change an order the customer already built.
/// Stock is deliberately not snapshotted; the checkout re-reads it on every
/// mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: ItemId,
    pub name: String,
    pub unit_price: f64,
    pub made_to_order: bool,
    pub quantity: u32,
}

impl CartLine {
    fn from_item(item: &MenuItem) -> Self {
        Self {
            item_id: item.id,
            name: item.name.clone(),
            unit_price: item.price,
            made_to_order: item.is_made_to_order(),
            quantity: 1,
        }
    }

    /// Line total, with a malformed unit price coerced to zero.
    pub fn line_total(&self) -> f64 {
        sanitize_price(self.unit_price) * f64::from(self.quantity)
    }
}

/// Prices must be finite and non-negative; anything else counts as zero.
fn sanitize_price(price: f64) -> f64 {
    if price.is_finite() && price >= 0.0 {
        price
    } else {
        0.0
    }
}

/// The cart for one checkout session.
///
/// At most one line exists per item id; adding an item already present
/// increments its line instead of creating a second one.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Quantity currently carted for `id`, zero when absent.
    pub fn quantity_of(&self, id: ItemId) -> u32 {
        self.lines
            .iter()
            .filter(|line| line.item_id == id)
            .map(|line| line.quantity)
            .sum()
    }

    /// Adds one unit of `item`, creating the line if needed. Stock checks are
    /// the caller's job; the cart only tracks the selection.
    pub fn add_one(&mut self, item: &MenuItem) {
        match self.lines.iter_mut().find(|line| line.item_id == item.id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine::from_item(item)),
        }
    }

    /// Removes the line for `id`. Removing an absent line is a no-op.
    pub fn remove(&mut self, id: ItemId) {
        self.lines.retain(|line| line.item_id != id);
    }

    /// Replaces the quantity for `id`; zero removes the line. Returns `false`
    /// when a non-zero quantity names an item the cart does not hold.
    pub fn set_quantity(&mut self, id: ItemId, quantity: u32) -> bool {
        if quantity == 0 {
            self.remove(id);
            return true;
        }
        match self.lines.iter_mut().find(|line| line.item_id == id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Splits the cart by item kind and totals every line.
    pub fn partition(&self) -> CartSummary {
        let mut in_stock = Vec::new();
        let mut made_to_order = Vec::new();
        let mut total = 0.0;
        for line in &self.lines {
            total += line.line_total();
            if line.made_to_order {
                made_to_order.push(line.clone());
            } else {
                in_stock.push(line.clone());
            }
        }
        CartSummary {
            in_stock,
            made_to_order,
            total,
        }
    }
}

/// The partitioned cart view handed back after every cart operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSummary {
    pub in_stock: Vec<CartLine>,
    pub made_to_order: Vec<CartLine>,
    pub total: f64,
}

impl CartSummary {
    pub fn is_empty(&self) -> bool {
        self.in_stock.is_empty() && self.made_to_order.is_empty()
    }
}
