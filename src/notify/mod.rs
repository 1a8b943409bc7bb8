//! The outbound notification seam.
//!
//! The checkout session knows what a confirmation says, never how it gets
//! delivered. [`Notifier`] is the contract; [`TracingNotifier`] is what the
//! demo binary plugs in, and tests substitute
//! [`MockNotifier`](crate::mock::MockNotifier).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::model::cart::CartLine;
use crate::model::order::{PickupSlot, SubmittedOrder};

/// Printed at the bottom of every confirmation.
pub const PAYMENT_INSTRUCTIONS: &str =
    "Payment is taken at pickup. We accept card, cash, and contactless at the counter.";

/// Rendering for a half of the order that has no pickup scheduled.
pub const NOT_APPLICABLE: &str = "Not applicable";

/// A notification delivery failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// The provider accepted the connection but refused the message.
    #[error("notification rejected: {0}")]
    Rejected(String),

    /// The provider could not be reached at all.
    #[error("notification service unavailable: {0}")]
    Unavailable(String),
}

/// Everything a confirmation template needs, already formatted.
///
/// Both the customer copy and the bakery copy are rendered from the same
/// fields; only the recipient differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateFields {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    /// One `<name> x<qty> - $<line total>` line per item, or `None`.
    pub in_stock_items: String,
    pub made_to_order_items: String,
    /// The scheduled pickup, or `Not applicable` for an absent half.
    pub in_stock_pickup: String,
    pub made_to_order_pickup: String,
    /// Combined total as currency, e.g. `$23.75`.
    pub total: String,
    pub instructions: String,
    pub payment_instructions: String,
}

impl TemplateFields {
    /// Flattens an order snapshot into the strings the templates slot in.
    pub fn from_order(order: &SubmittedOrder) -> Self {
        Self {
            customer_name: order.contact.name.clone(),
            customer_email: order.contact.email.clone(),
            customer_phone: order.contact.phone.clone(),
            in_stock_items: itemize(&order.in_stock_lines),
            made_to_order_items: itemize(&order.made_to_order_lines),
            in_stock_pickup: pickup_or_na(order.in_stock_pickup),
            made_to_order_pickup: pickup_or_na(order.made_to_order_pickup),
            total: format_currency(order.total),
            instructions: order
                .instructions
                .clone()
                .unwrap_or_else(|| "None".to_string()),
            payment_instructions: PAYMENT_INSTRUCTIONS.to_string(),
        }
    }
}

fn itemize(lines: &[CartLine]) -> String {
    if lines.is_empty() {
        return "None".to_string();
    }
    lines
        .iter()
        .map(|line| {
            format!(
                "{} x{} - {}",
                line.name,
                line.quantity,
                format_currency(line.line_total())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn pickup_or_na(slot: Option<PickupSlot>) -> String {
    match slot {
        Some(slot) => slot.to_string(),
        None => NOT_APPLICABLE.to_string(),
    }
}

/// Currency with two decimals, e.g. `$4.25`.
pub fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Sends one confirmation message to one recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, fields: &TemplateFields) -> Result<(), NotifyError>;
}

/// Demo notifier: writes the confirmation to the log instead of a mail
/// provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send(&self, recipient: &str, fields: &TemplateFields) -> Result<(), NotifyError> {
        info!(
            recipient,
            total = %fields.total,
            in_stock_pickup = %fields.in_stock_pickup,
            made_to_order_pickup = %fields.made_to_order_pickup,
            "Confirmation dispatched"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::cart::Cart;
    use crate::model::item::{ItemId, MenuItem, MenuItemSpec};
    use crate::model::order::{OrderForm, SubmittedOrder};
    use chrono::{NaiveDate, NaiveTime};

    fn sample_order() -> SubmittedOrder {
        let mut cart = Cart::default();
        let loaf = MenuItem::new(
            ItemId(1),
            MenuItemSpec::in_stock("Sourdough", 8.5, "Breads", 10),
        );
        cart.add_one(&loaf);
        cart.add_one(&loaf);

        let mut form = OrderForm::default();
        form.contact.name = "Avery Chen".to_string();
        form.contact.email = "avery@example.com".to_string();
        form.contact.phone = "555-012-3456".to_string();
        form.in_stock_pickup = Some(crate::model::order::PickupSlot::new(
            NaiveDate::from_ymd_opt(2026, 3, 12).unwrap(),
            NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
        ));

        let placed_at = NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        SubmittedOrder::freeze(cart.partition(), &form, placed_at)
    }

    #[test]
    fn items_render_one_line_per_entry() {
        let fields = TemplateFields::from_order(&sample_order());
        assert_eq!(fields.in_stock_items, "Sourdough x2 - $17.00");
    }

    #[test]
    fn absent_halves_render_placeholders() {
        let fields = TemplateFields::from_order(&sample_order());
        assert_eq!(fields.made_to_order_items, "None");
        assert_eq!(fields.made_to_order_pickup, NOT_APPLICABLE);
    }

    #[test]
    fn present_halves_render_the_scheduled_slot() {
        let fields = TemplateFields::from_order(&sample_order());
        assert_eq!(fields.in_stock_pickup, "Thursday, March 12 at 12:30 PM");
    }

    #[test]
    fn missing_instructions_render_none() {
        let fields = TemplateFields::from_order(&sample_order());
        assert_eq!(fields.instructions, "None");
        assert_eq!(fields.payment_instructions, PAYMENT_INSTRUCTIONS);
    }

    #[test]
    fn currency_always_shows_two_decimals() {
        assert_eq!(format_currency(4.25), "$4.25");
        assert_eq!(format_currency(17.0), "$17.00");
        assert_eq!(format_currency(0.0), "$0.00");
    }
}
