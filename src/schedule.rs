//! Pickup scheduling policy.
//!
//! Two policies exist, one per item kind, and they never mix:
//!
//! * **In-stock** items can be picked up on any weekday strictly after
//!   tomorrow, between 12:00 PM and 6:00 PM.
//! * **Made-to-order** items are baked in a single weekly batch and picked
//!   up on exactly one Saturday, between 9:00 AM and 6:00 PM. Orders placed
//!   before Wednesday 6:00 PM make the coming Saturday; later orders roll to
//!   the Saturday after.
//!
//! Both grids are half-hour steps, endpoints included. Everything here is a
//! pure function of an injected "now", so the rules are trivially testable
//! and the session actor stays in charge of what the current time is.

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use thiserror::Error;

use crate::model::order::{PickupSlot, SubOrderKind};

/// A pickup slot that violates the policy for its sub-order kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("{date} is not an eligible pickup date for {kind} items")]
    DateNotEligible { kind: SubOrderKind, date: NaiveDate },

    #[error("{time} is not an eligible pickup time for {kind} items")]
    TimeNotEligible { kind: SubOrderKind, time: NaiveTime },
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time literal")
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether `date` may be chosen for in-stock pickup: a weekday strictly
/// after tomorrow.
pub fn is_eligible_in_stock_date(now: NaiveDateTime, date: NaiveDate) -> bool {
    is_weekday(date) && date > now.date() + Days::new(1)
}

/// The first date [`is_eligible_in_stock_date`] accepts.
pub fn earliest_in_stock_date(now: NaiveDateTime) -> NaiveDate {
    let mut date = now.date() + Days::new(2);
    while !is_weekday(date) {
        date = date + Days::new(1);
    }
    date
}

fn upcoming_saturday(today: NaiveDate) -> NaiveDate {
    let today_index = today.weekday().num_days_from_monday();
    let days_ahead = (Weekday::Sat.num_days_from_monday() + 7 - today_index) % 7;
    today + Days::new(u64::from(days_ahead))
}

/// The weekly bake plan is fixed on Wednesday evening; from that point the
/// coming Saturday's batch can take no more orders.
fn past_weekly_cutoff(now: NaiveDateTime) -> bool {
    match now.weekday() {
        Weekday::Thu | Weekday::Fri | Weekday::Sat => true,
        Weekday::Wed => now.time() >= hm(18, 0),
        _ => false,
    }
}

/// The single Saturday a made-to-order item ordered now can be picked up.
pub fn made_to_order_saturday(now: NaiveDateTime) -> NaiveDate {
    let saturday = upcoming_saturday(now.date());
    if past_weekly_cutoff(now) {
        saturday + Days::new(7)
    } else {
        saturday
    }
}

/// Whether `date` may be chosen for made-to-order pickup.
pub fn is_eligible_made_to_order_date(now: NaiveDateTime, date: NaiveDate) -> bool {
    date == made_to_order_saturday(now)
}

fn half_hour_grid(open: NaiveTime, close: NaiveTime) -> Vec<NaiveTime> {
    let mut slots = Vec::new();
    let mut slot = open;
    while slot <= close {
        slots.push(slot);
        slot += Duration::minutes(30);
    }
    slots
}

/// Half-hour pickup times for in-stock items, 12:00 PM through 6:00 PM.
pub fn in_stock_slots() -> Vec<NaiveTime> {
    half_hour_grid(hm(12, 0), hm(18, 0))
}

/// Half-hour pickup times for made-to-order items, 9:00 AM through 6:00 PM.
pub fn made_to_order_slots() -> Vec<NaiveTime> {
    half_hour_grid(hm(9, 0), hm(18, 0))
}

/// Checks a chosen slot against its policy.
///
/// The session calls this when the customer picks a slot, so an ineligible
/// choice never makes it into the order form in the first place.
pub fn validate_slot(
    kind: SubOrderKind,
    now: NaiveDateTime,
    slot: PickupSlot,
) -> Result<(), ScheduleError> {
    let (date_ok, times) = match kind {
        SubOrderKind::InStock => (is_eligible_in_stock_date(now, slot.date), in_stock_slots()),
        SubOrderKind::MadeToOrder => (
            is_eligible_made_to_order_date(now, slot.date),
            made_to_order_slots(),
        ),
    };
    if !date_ok {
        return Err(ScheduleError::DateNotEligible {
            kind,
            date: slot.date,
        });
    }
    if !times.contains(&slot.time) {
        return Err(ScheduleError::TimeNotEligible {
            kind,
            time: slot.time,
        });
    }
    Ok(())
}
