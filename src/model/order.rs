use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use std::fmt::Display;

use super::cart::{CartLine, CartSummary};

/// Type-safe identifier for recorded orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Which half of a split order a pickup slot or policy applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubOrderKind {
    InStock,
    MadeToOrder,
}

impl SubOrderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubOrderKind::InStock => "in-stock",
            SubOrderKind::MadeToOrder => "made-to-order",
        }
    }
}

impl Display for SubOrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete pickup date and time chosen by the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupSlot {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl PickupSlot {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    pub fn at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

impl Display for PickupSlot {
    /// Customer-facing rendering, e.g. `Saturday, March 14 at 9:00 AM`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}",
            self.date.format("%A, %B %-d"),
            self.time.format("%-I:%M %p")
        )
    }
}

/// Customer contact fields, kept exactly as typed. Validation happens at
/// submit time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

// DTO for partial contact updates.
#[derive(Debug, Clone, Default)]
pub struct ContactUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Everything the customer fills in besides the cart itself.
#[derive(Debug, Clone, Default)]
pub struct OrderForm {
    pub contact: Contact,
    pub in_stock_pickup: Option<PickupSlot>,
    pub made_to_order_pickup: Option<PickupSlot>,
    pub instructions: Option<String>,
}

impl OrderForm {
    /// Applies a partial update; `None` fields keep what was typed so far.
    pub fn apply_contact(&mut self, update: ContactUpdate) {
        if let Some(name) = update.name {
            self.contact.name = name;
        }
        if let Some(email) = update.email {
            self.contact.email = email;
        }
        if let Some(phone) = update.phone {
            self.contact.phone = phone;
        }
    }

    /// Back to the state a fresh session starts in.
    pub fn reset(&mut self) {
        *self = OrderForm::default();
    }
}

/// The only way to pay: at the counter, when picking up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    PayAtPickup,
}

/// Marker distinguishing pre-orders from anything a future walk-in flow
/// might record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    #[default]
    PreOrder,
}

/// Immutable snapshot of a checkout at the moment the customer submitted.
///
/// Built once by the session actor and handed to the order log; nothing
/// mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedOrder {
    pub contact: Contact,
    pub in_stock_lines: Vec<CartLine>,
    pub made_to_order_lines: Vec<CartLine>,
    /// Present iff the in-stock half of the order has lines.
    pub in_stock_pickup: Option<PickupSlot>,
    /// Present iff the made-to-order half of the order has lines.
    pub made_to_order_pickup: Option<PickupSlot>,
    pub total: f64,
    pub instructions: Option<String>,
    pub payment_method: PaymentMethod,
    pub order_type: OrderType,
    /// Derived from the in-stock pickup slot when that half exists.
    pub estimated_ready: Option<NaiveDateTime>,
    pub placed_at: NaiveDateTime,
}

impl SubmittedOrder {
    /// Freezes the current cart and form. Pickup slots are carried over only
    /// for halves that actually contain lines.
    pub fn freeze(summary: CartSummary, form: &OrderForm, placed_at: NaiveDateTime) -> Self {
        let in_stock_pickup = if summary.in_stock.is_empty() {
            None
        } else {
            form.in_stock_pickup
        };
        let made_to_order_pickup = if summary.made_to_order.is_empty() {
            None
        } else {
            form.made_to_order_pickup
        };
        Self {
            contact: form.contact.clone(),
            estimated_ready: in_stock_pickup.map(|slot| slot.at()),
            in_stock_lines: summary.in_stock,
            made_to_order_lines: summary.made_to_order,
            in_stock_pickup,
            made_to_order_pickup,
            total: summary.total,
            instructions: form.instructions.clone(),
            payment_method: PaymentMethod::default(),
            order_type: OrderType::default(),
            placed_at,
        }
    }

    /// Human summary of the scheduled pickups, omitting absent halves.
    pub fn pickup_summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(slot) = self.in_stock_pickup {
            parts.push(format!("in-stock items ready {slot}"));
        }
        if let Some(slot) = self.made_to_order_pickup {
            parts.push(format!("made-to-order items ready {slot}"));
        }
        parts.join("; ")
    }
}

/// What a successful submission hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    pub order_id: OrderId,
    pub summary: String,
}
