//! Error types for order log operations.

use thiserror::Error;

/// Errors that can occur during order log operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderLogError {
    /// An error occurred while communicating with the actor.
    #[error("order log communication error: {0}")]
    ActorCommunication(String),
}
