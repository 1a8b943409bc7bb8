//! Error types for checkout operations.

use thiserror::Error;

use crate::model::item::ItemId;
use crate::schedule::ScheduleError;
use crate::validate::ValidationReport;

/// Errors surfaced to the customer by checkout operations.
///
/// Every variant is recoverable: the cart and form keep their last valid
/// state and the caller may try again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckoutError {
    /// The item is not on the menu.
    #[error("menu item not found: {0}")]
    UnknownItem(ItemId),

    /// The quantity change names an item the cart does not hold.
    #[error("{0} is not in the cart")]
    NotInCart(ItemId),

    /// An in-stock item with nothing left on hand.
    #[error("{name} is out of stock")]
    OutOfStock { name: String },

    /// The requested quantity exceeds what is on hand.
    #[error("only {available} of {name} available, requested {requested}")]
    InsufficientStock {
        name: String,
        requested: u32,
        available: u32,
    },

    /// The chosen pickup slot violates its scheduling policy.
    #[error(transparent)]
    Ineligible(#[from] ScheduleError),

    /// Submit-time rules found problems; the report lists them per field.
    #[error("order form invalid: {0}")]
    Invalid(ValidationReport),

    /// A submission is already in flight for this session.
    #[error("an order submission is already in progress")]
    SubmissionInFlight,

    /// A collaborator failed mid-submission; nothing was recorded and the
    /// cart is intact.
    #[error("order submission failed: {0}")]
    SubmissionFailed(String),

    /// An error occurred while communicating with the actor.
    #[error("checkout communication error: {0}")]
    ActorCommunication(String),
}
