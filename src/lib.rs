//! # Bakehouse
//!
//! > **A pre-order checkout for a small bakery, built on message-passing actors.**
//!
//! Customers browse a menu, build a cart, schedule pickups, and submit an
//! order; the system fans out two confirmation notifications and records the
//! order. Every stateful piece lives in its own Tokio task and owns its
//! state outright, so there are no locks anywhere in the crate.
//!
//! ## 🏗️ Architecture
//!
//! ### 1. The session ([`checkout`])
//! The order builder. One actor owns the cart, the order form, and the
//! `Idle → Submitting → Idle` state machine; its mailbox serializes every
//! mutation. Stock limits are enforced against live catalog reads, never a
//! cached copy.
//!
//! ### 2. The collaborators ([`catalog`], [`orderlog`], [`notify`])
//! The menu catalog and the order log are actors with typed clients
//! ([`clients`]). Mail delivery hides behind the [`notify::Notifier`] trait
//! so production and tests plug in different transports.
//!
//! ### 3. The rules ([`schedule`], [`validate`])
//! Pure modules. Pickup eligibility (weekday lead times and the Saturday
//! bake cutoff) takes "now" as an argument; form validation collects every
//! failure into one report.
//!
//! ### 4. The orchestrator ([`lifecycle`])
//! Creates the actors, injects dependencies into their `run` loops, and
//! joins them on shutdown.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```
//!
//! The demo binary seeds a menu, builds a mixed cart, schedules both
//! pickups, and submits.
//!
//! ## 🧪 Testing
//!
//! Testing actors can be hard because they are asynchronous. The [`mock`]
//! module provides channel mocks and a scripted notifier so the session can
//! be driven in isolation; `tests/` holds the full-system flows.

pub mod catalog;
pub mod checkout;
pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod mock;
pub mod model;
pub mod notify;
pub mod orderlog;
pub mod schedule;
pub mod validate;
