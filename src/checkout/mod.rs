//! # Checkout Session Actor
//!
//! The order builder. One actor owns the cart, the order form, and the
//! submission state machine for a browsing session; its mailbox serializes
//! every mutation, so the session needs no locks.
//!
//! # Stock Is Read Live
//! The session never caches stock. Every add and every quantity change asks
//! the catalog for the item's current numbers, so a restock between two
//! clicks is honored immediately.
//!
//! # Submission
//! `Submit` validates, freezes the order, and moves the session to
//! `Submitting`; the pipeline itself (two concurrent confirmation sends,
//! then the order log write) runs in a spawned task so the mailbox stays
//! responsive. The task posts a `Finalize` message back through the mailbox
//! and the actor, on its own thread of control, clears the session on
//! success or keeps everything on failure. A second `Submit` while one is in
//! flight is refused.

pub mod error;
mod submit;

pub use error::CheckoutError;

use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::clients::{CatalogClient, CheckoutClient, OrderLogClient};
use crate::model::cart::{Cart, CartSummary};
use crate::model::item::{ItemId, MenuItem};
use crate::model::order::{
    Confirmation, ContactUpdate, OrderForm, PickupSlot, SubOrderKind, SubmittedOrder,
};
use crate::notify::Notifier;
use crate::schedule;
use crate::validate::Validator;

/// Type alias for the one-shot response channel used by the session actor.
pub type CheckoutResponse<T> = oneshot::Sender<Result<T, CheckoutError>>;

/// Source of "now" for the scheduling rules. Production injects the local
/// clock; tests pin it to fixed instants.
pub type Clock = Box<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// The session's runtime dependencies, injected into
/// [`run`](CheckoutActor::run) rather than the constructor so wiring can
/// happen after every actor has been created.
#[derive(Clone)]
pub struct CheckoutContext {
    pub catalog: CatalogClient,
    pub orders: OrderLogClient,
    pub notifier: Arc<dyn Notifier>,
    /// The bakery's operational mailbox; every order is announced here too.
    pub mailbox: String,
}

/// Requests understood by the checkout session actor.
#[derive(Debug)]
pub enum CheckoutRequest {
    AddItem {
        id: ItemId,
        respond_to: CheckoutResponse<CartSummary>,
    },
    RemoveItem {
        id: ItemId,
        respond_to: CheckoutResponse<CartSummary>,
    },
    SetQuantity {
        id: ItemId,
        quantity: u32,
        respond_to: CheckoutResponse<CartSummary>,
    },
    Partition {
        respond_to: CheckoutResponse<CartSummary>,
    },
    SetContact {
        update: ContactUpdate,
        respond_to: CheckoutResponse<()>,
    },
    SetInstructions {
        text: Option<String>,
        respond_to: CheckoutResponse<()>,
    },
    SetPickup {
        kind: SubOrderKind,
        slot: PickupSlot,
        respond_to: CheckoutResponse<()>,
    },
    Submit {
        respond_to: CheckoutResponse<Confirmation>,
    },
    /// Internal: the outcome of the spawned submission task. Never sent by
    /// clients.
    Finalize {
        outcome: Result<Confirmation, CheckoutError>,
        respond_to: CheckoutResponse<Confirmation>,
    },
}

/// Submission state machine. `Submitting` admits everything except another
/// `Submit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Submitting,
}

/// The server half of the session: owns all mutable checkout state and the
/// receiver end of the mailbox.
pub struct CheckoutActor {
    receiver: mpsc::Receiver<CheckoutRequest>,
    /// Handed to the submission task so it can post `Finalize` back. Weak,
    /// so an idle actor still shuts down when the last client drops.
    self_sender: mpsc::WeakSender<CheckoutRequest>,
    cart: Cart,
    form: OrderForm,
    phase: Phase,
    validator: Validator,
    clock: Clock,
}

/// Creates the session actor and its client.
pub fn new(buffer_size: usize, clock: Clock) -> (CheckoutActor, CheckoutClient) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let actor = CheckoutActor {
        receiver,
        self_sender: sender.downgrade(),
        cart: Cart::default(),
        form: OrderForm::default(),
        phase: Phase::Idle,
        validator: Validator::new(),
        clock,
    };
    (actor, CheckoutClient::new(sender))
}

impl CheckoutActor {
    /// Runs the actor's event loop until every client is dropped and any
    /// in-flight submission has finalized.
    pub async fn run(mut self, context: CheckoutContext) {
        info!(actor = "checkout", "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CheckoutRequest::AddItem { id, respond_to } => {
                    let result = self.add_item(&context, id).await;
                    let _ = respond_to.send(result);
                }
                CheckoutRequest::RemoveItem { id, respond_to } => {
                    debug!(%id, "RemoveItem");
                    self.cart.remove(id);
                    let _ = respond_to.send(Ok(self.cart.partition()));
                }
                CheckoutRequest::SetQuantity {
                    id,
                    quantity,
                    respond_to,
                } => {
                    let result = self.set_quantity(&context, id, quantity).await;
                    let _ = respond_to.send(result);
                }
                CheckoutRequest::Partition { respond_to } => {
                    debug!(lines = self.cart.lines().len(), "Partition");
                    let _ = respond_to.send(Ok(self.cart.partition()));
                }
                CheckoutRequest::SetContact { update, respond_to } => {
                    debug!("SetContact");
                    self.form.apply_contact(update);
                    let _ = respond_to.send(Ok(()));
                }
                CheckoutRequest::SetInstructions { text, respond_to } => {
                    debug!("SetInstructions");
                    self.form.instructions = text
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty());
                    let _ = respond_to.send(Ok(()));
                }
                CheckoutRequest::SetPickup {
                    kind,
                    slot,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.set_pickup(kind, slot));
                }
                CheckoutRequest::Submit { respond_to } => {
                    self.submit(&context, respond_to);
                }
                CheckoutRequest::Finalize {
                    outcome,
                    respond_to,
                } => {
                    self.finalize(outcome, respond_to);
                }
            }
        }

        info!(actor = "checkout", "Shutdown");
    }

    async fn lookup(
        &self,
        context: &CheckoutContext,
        id: ItemId,
    ) -> Result<MenuItem, CheckoutError> {
        let item = context
            .catalog
            .get(id)
            .await
            .map_err(|e| CheckoutError::ActorCommunication(e.to_string()))?;
        item.ok_or(CheckoutError::UnknownItem(id))
    }

    /// One more unit of `id`, subject to the catalog's current stock.
    async fn add_item(
        &mut self,
        context: &CheckoutContext,
        id: ItemId,
    ) -> Result<CartSummary, CheckoutError> {
        debug!(%id, "AddItem");
        let item = self.lookup(context, id).await?;
        if let Some(stock) = item.stock() {
            if stock == 0 {
                warn!(%id, "AddItem failed: out of stock");
                return Err(CheckoutError::OutOfStock { name: item.name });
            }
            let requested = self.cart.quantity_of(id) + 1;
            if requested > stock {
                warn!(%id, requested, available = stock, "AddItem failed: insufficient stock");
                return Err(CheckoutError::InsufficientStock {
                    name: item.name,
                    requested,
                    available: stock,
                });
            }
        }
        self.cart.add_one(&item);
        info!(%id, quantity = self.cart.quantity_of(id), "Item added to cart");
        Ok(self.cart.partition())
    }

    /// Replaces the carted quantity for `id`; zero behaves like a removal.
    async fn set_quantity(
        &mut self,
        context: &CheckoutContext,
        id: ItemId,
        quantity: u32,
    ) -> Result<CartSummary, CheckoutError> {
        debug!(%id, quantity, "SetQuantity");
        if quantity == 0 {
            self.cart.remove(id);
            return Ok(self.cart.partition());
        }
        let item = self.lookup(context, id).await?;
        if let Some(stock) = item.stock() {
            if quantity > stock {
                warn!(%id, requested = quantity, available = stock, "SetQuantity failed: insufficient stock");
                return Err(CheckoutError::InsufficientStock {
                    name: item.name,
                    requested: quantity,
                    available: stock,
                });
            }
        }
        if !self.cart.set_quantity(id, quantity) {
            return Err(CheckoutError::NotInCart(id));
        }
        info!(%id, quantity, "Quantity updated");
        Ok(self.cart.partition())
    }

    fn set_pickup(&mut self, kind: SubOrderKind, slot: PickupSlot) -> Result<(), CheckoutError> {
        let now = (self.clock)();
        if let Err(e) = schedule::validate_slot(kind, now, slot) {
            warn!(%kind, %slot, error = %e, "SetPickup failed");
            return Err(e.into());
        }
        match kind {
            SubOrderKind::InStock => self.form.in_stock_pickup = Some(slot),
            SubOrderKind::MadeToOrder => self.form.made_to_order_pickup = Some(slot),
        }
        info!(%kind, %slot, "Pickup scheduled");
        Ok(())
    }

    /// Validates the session and, if everything holds, freezes the order and
    /// spawns the submission pipeline. The reply channel travels with the
    /// task and comes back inside `Finalize`.
    fn submit(&mut self, context: &CheckoutContext, respond_to: CheckoutResponse<Confirmation>) {
        if self.phase == Phase::Submitting {
            warn!("Submit refused: already in progress");
            let _ = respond_to.send(Err(CheckoutError::SubmissionInFlight));
            return;
        }

        let summary = self.cart.partition();
        if let Err(report) = self.validator.check(&self.form, &summary) {
            warn!(issues = report.issues().len(), "Submit failed validation");
            let _ = respond_to.send(Err(CheckoutError::Invalid(report)));
            return;
        }

        // Reachable only if the caller dropped its client right after
        // sending Submit; there is then nobody to finalize for.
        let Some(mailbox) = self.self_sender.upgrade() else {
            let _ = respond_to.send(Err(CheckoutError::ActorCommunication(
                "checkout mailbox is closing".to_string(),
            )));
            return;
        };

        let order = SubmittedOrder::freeze(summary, &self.form, (self.clock)());
        self.phase = Phase::Submitting;
        info!(total = order.total, "Submission started");

        let task_context = context.clone();
        tokio::spawn(async move {
            let outcome = submit::run_submission(&task_context, order).await;
            if mailbox
                .send(CheckoutRequest::Finalize {
                    outcome,
                    respond_to,
                })
                .await
                .is_err()
            {
                warn!("Checkout mailbox closed before submission could finalize");
            }
        });
    }

    /// Runs on the actor's own thread of control once the pipeline is done,
    /// so session state changes stay serialized with everything else.
    fn finalize(
        &mut self,
        outcome: Result<Confirmation, CheckoutError>,
        respond_to: CheckoutResponse<Confirmation>,
    ) {
        self.phase = Phase::Idle;
        match outcome {
            Ok(confirmation) => {
                self.cart.clear();
                self.form.reset();
                info!(order_id = %confirmation.order_id, "Submission confirmed, session reset");
                let _ = respond_to.send(Ok(confirmation));
            }
            Err(e) => {
                warn!(error = %e, "Submission failed, cart and form preserved");
                let _ = respond_to.send(Err(e));
            }
        }
    }
}
