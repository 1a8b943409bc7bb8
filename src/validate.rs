//! Submit-time validation of the order form.
//!
//! Every rule runs and every failure is collected into one
//! [`ValidationReport`], so a caller can show each problem next to its field
//! instead of stopping at the first. Slot eligibility is not re-checked
//! here; the session enforces it when a slot is chosen (see
//! [`crate::schedule`]). At submit time only presence matters.

use regex::Regex;
use thiserror::Error;

use std::fmt::Display;

use crate::model::cart::CartSummary;
use crate::model::order::OrderForm;

/// A single failed rule, tagged with the field it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldIssue {
    #[error("name must be at least 2 characters")]
    NameTooShort,

    #[error("email address is not valid")]
    EmailInvalid,

    #[error("phone must look like 555-123-4567")]
    PhoneInvalid,

    #[error("cart is empty")]
    EmptyCart,

    #[error("pickup date and time are required for in-stock items")]
    InStockPickupMissing,

    #[error("pickup date and time are required for made-to-order items")]
    MadeToOrderPickupMissing,
}

/// All rule failures from one submit attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<FieldIssue>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    pub fn contains(&self, issue: FieldIssue) -> bool {
        self.issues.contains(&issue)
    }

    fn push(&mut self, issue: FieldIssue) {
        self.issues.push(issue);
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for issue in &self.issues {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
            first = false;
        }
        Ok(())
    }
}

/// Compiled form rules, built once per session so the regexes are not
/// recompiled on every submit.
pub struct Validator {
    email: Regex,
    phone: Regex,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            email: Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"),
            phone: Regex::new(r"^\d{3}-\d{3}-\d{4}$").expect("phone pattern compiles"),
        }
    }

    /// Runs every rule against the form and the partitioned cart.
    pub fn check(&self, form: &OrderForm, cart: &CartSummary) -> Result<(), ValidationReport> {
        let mut report = ValidationReport::default();
        if form.contact.name.trim().chars().count() < 2 {
            report.push(FieldIssue::NameTooShort);
        }
        if !self.email.is_match(&form.contact.email) {
            report.push(FieldIssue::EmailInvalid);
        }
        if !self.phone.is_match(&form.contact.phone) {
            report.push(FieldIssue::PhoneInvalid);
        }
        if cart.is_empty() {
            report.push(FieldIssue::EmptyCart);
        }
        if !cart.in_stock.is_empty() && form.in_stock_pickup.is_none() {
            report.push(FieldIssue::InStockPickupMissing);
        }
        if !cart.made_to_order.is_empty() && form.made_to_order_pickup.is_none() {
            report.push(FieldIssue::MadeToOrderPickupMissing);
        }
        if report.is_empty() {
            Ok(())
        } else {
            Err(report)
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::cart::Cart;
    use crate::model::item::{ItemId, MenuItem, MenuItemSpec};
    use crate::model::order::{ContactUpdate, PickupSlot};
    use chrono::{NaiveDate, NaiveTime};

    fn filled_form() -> OrderForm {
        let mut form = OrderForm::default();
        form.apply_contact(ContactUpdate {
            name: Some("Avery Chen".to_string()),
            email: Some("avery@example.com".to_string()),
            phone: Some("555-012-3456".to_string()),
        });
        form
    }

    fn slot() -> PickupSlot {
        PickupSlot::new(
            NaiveDate::from_ymd_opt(2026, 3, 12).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        )
    }

    fn cart_with_case_item() -> CartSummary {
        let mut cart = Cart::default();
        cart.add_one(&MenuItem::new(
            ItemId(1),
            MenuItemSpec::in_stock("Sourdough", 8.5, "Breads", 10),
        ));
        cart.partition()
    }

    fn cart_with_bespoke_item() -> CartSummary {
        let mut cart = Cart::default();
        cart.add_one(&MenuItem::new(
            ItemId(2),
            MenuItemSpec::made_to_order("Celebration Cake", 42.0, "Cakes"),
        ));
        cart.partition()
    }

    #[test]
    fn a_complete_form_passes() {
        let mut form = filled_form();
        form.in_stock_pickup = Some(slot());
        assert_eq!(Validator::new().check(&form, &cart_with_case_item()), Ok(()));
    }

    #[test]
    fn names_shorter_than_two_characters_fail_after_trimming() {
        let validator = Validator::new();
        let cart = cart_with_case_item();

        for bad in ["", " ", "A", " A "] {
            let mut form = filled_form();
            form.in_stock_pickup = Some(slot());
            form.contact.name = bad.to_string();
            let report = validator.check(&form, &cart).unwrap_err();
            assert!(report.contains(FieldIssue::NameTooShort), "name {bad:?}");
        }

        let mut form = filled_form();
        form.in_stock_pickup = Some(slot());
        form.contact.name = " Jo ".to_string();
        assert!(validator.check(&form, &cart).is_ok());
    }

    #[test]
    fn malformed_emails_fail() {
        let validator = Validator::new();
        let cart = cart_with_case_item();

        for bad in ["", "avery", "avery@", "@example.com", "a b@example.com", "avery@example"] {
            let mut form = filled_form();
            form.in_stock_pickup = Some(slot());
            form.contact.email = bad.to_string();
            let report = validator.check(&form, &cart).unwrap_err();
            assert!(report.contains(FieldIssue::EmailInvalid), "email {bad:?}");
        }
    }

    #[test]
    fn phone_must_match_the_dashed_shape_exactly() {
        let validator = Validator::new();
        let cart = cart_with_case_item();

        for bad in ["", "5550123456", "555-0123-456", "555 012 3456", "x555-012-3456"] {
            let mut form = filled_form();
            form.in_stock_pickup = Some(slot());
            form.contact.phone = bad.to_string();
            let report = validator.check(&form, &cart).unwrap_err();
            assert!(report.contains(FieldIssue::PhoneInvalid), "phone {bad:?}");
        }
    }

    #[test]
    fn an_empty_cart_cannot_be_submitted() {
        let mut form = filled_form();
        form.in_stock_pickup = Some(slot());
        let report = Validator::new()
            .check(&form, &Cart::default().partition())
            .unwrap_err();
        assert!(report.contains(FieldIssue::EmptyCart));
    }

    #[test]
    fn each_present_half_requires_its_pickup_slot() {
        let validator = Validator::new();

        let report = validator
            .check(&filled_form(), &cart_with_case_item())
            .unwrap_err();
        assert!(report.contains(FieldIssue::InStockPickupMissing));
        assert!(!report.contains(FieldIssue::MadeToOrderPickupMissing));

        let report = validator
            .check(&filled_form(), &cart_with_bespoke_item())
            .unwrap_err();
        assert!(report.contains(FieldIssue::MadeToOrderPickupMissing));
        assert!(!report.contains(FieldIssue::InStockPickupMissing));
    }

    #[test]
    fn every_failure_is_reported_at_once() {
        let report = Validator::new()
            .check(&OrderForm::default(), &Cart::default().partition())
            .unwrap_err();

        assert_eq!(report.issues().len(), 4);
        assert!(report.contains(FieldIssue::NameTooShort));
        assert!(report.contains(FieldIssue::EmailInvalid));
        assert!(report.contains(FieldIssue::PhoneInvalid));
        assert!(report.contains(FieldIssue::EmptyCart));
    }
}
