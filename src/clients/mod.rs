//! Type-safe clients wrapping each actor's mailbox.
//!
//! Clients are cheap to clone; every clone talks to the same actor. Dropping
//! the last clone closes the mailbox and lets the actor drain and exit.

pub mod catalog_client;
pub mod checkout_client;
pub mod orderlog_client;

pub use catalog_client::*;
pub use checkout_client::*;
pub use orderlog_client::*;
