//! # System Lifecycle & Observability
//!
//! Builds the actor set, wires the checkout session to its collaborators,
//! and coordinates graceful shutdown. Also owns the tracing setup: compact
//! structured logs, levels configurable via `RUST_LOG`.

use std::sync::Arc;

use chrono::Local;
use tracing::{error, info};

use crate::checkout::{self, CheckoutContext, Clock};
use crate::clients::{CatalogClient, CheckoutClient, OrderLogClient};
use crate::config::Config;
use crate::notify::Notifier;
use crate::{catalog, orderlog};

/// Initializes structured logging for the whole process.
///
/// ```bash
/// # Compact logs (default)
/// RUST_LOG=info cargo run
///
/// # Show full request dispatch with debug logs
/// RUST_LOG=debug cargo run
/// ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Don't show module paths - the actor field says who logs
        .compact()
        .init();
}

/// The running pre-order system.
///
/// `PreorderSystem` is responsible for:
/// - **Lifecycle**: starting all actors and shutting them down in order
/// - **Wiring**: the checkout session depends on the catalog, the order log,
///   and a notifier; those are injected into its `run`
///
/// # Example
///
/// ```ignore
/// let system = PreorderSystem::new(&config, Arc::new(TracingNotifier));
///
/// let id = system.catalog.add_item(spec).await?;
/// system.checkout.add_item(id).await?;
/// // ... contact, pickup slots ...
/// let confirmation = system.checkout.submit().await?;
///
/// system.shutdown().await?;
/// ```
pub struct PreorderSystem {
    /// Client for the menu catalog actor.
    pub catalog: CatalogClient,

    /// Client for the checkout session actor.
    pub checkout: CheckoutClient,

    /// Client for the order log actor.
    pub orders: OrderLogClient,

    /// Task handles for all running actors (used for graceful shutdown).
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl PreorderSystem {
    /// Creates and starts the whole system on the local wall clock.
    pub fn new(config: &Config, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_clock(config, notifier, Box::new(|| Local::now().naive_local()))
    }

    /// Like [`new`](Self::new) but with an injected clock, so tests can pin
    /// the scheduling rules to a fixed instant.
    pub fn with_clock(config: &Config, notifier: Arc<dyn Notifier>, clock: Clock) -> Self {
        // 1. Create actors (constructors take no dependencies)
        let (catalog_actor, catalog) =
            catalog::new(config.channel_capacity, config.categories.clone());
        let (orderlog_actor, orders) = orderlog::new(config.channel_capacity);
        let (checkout_actor, checkout) = checkout::new(config.channel_capacity, clock);

        // 2. Start actors with injected context. Catalog and order log stand
        // alone; the session gets clients for both plus the notifier.
        let catalog_handle = tokio::spawn(catalog_actor.run());
        let orderlog_handle = tokio::spawn(orderlog_actor.run());
        let checkout_handle = tokio::spawn(checkout_actor.run(CheckoutContext {
            catalog: catalog.clone(),
            orders: orders.clone(),
            notifier,
            mailbox: config.orders_mailbox.clone(),
        }));

        Self {
            catalog,
            checkout,
            orders,
            handles: vec![catalog_handle, orderlog_handle, checkout_handle],
        }
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Dropping the clients closes their channels; each actor drains its
    /// mailbox and exits. The checkout session finishes any in-flight
    /// submission first, and the catalog and order log outlive it because
    /// the session's context holds their clients until its loop ends.
    ///
    /// Returns an error if any actor task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.checkout);
        drop(self.catalog);
        drop(self.orders);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {e:?}"));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
