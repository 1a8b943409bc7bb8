//! Error types for catalog operations.

use thiserror::Error;

use crate::model::item::ItemId;

/// Errors that can occur during catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The requested item is not on the menu.
    #[error("menu item not found: {0}")]
    UnknownItem(ItemId),

    /// The item names a category the menu does not carry.
    #[error("unknown menu category: {0}")]
    UnknownCategory(String),

    /// Only in-stock items carry a stock count.
    #[error("made-to-order items do not carry stock: {0}")]
    NotStocked(ItemId),

    /// An error occurred while communicating with the actor.
    #[error("catalog communication error: {0}")]
    ActorCommunication(String),
}
