//! # Checkout Client
//!
//! High-level API for driving one checkout session: cart mutations, form
//! fields, pickup scheduling, and the final submit.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::checkout::{CheckoutError, CheckoutRequest};
use crate::model::cart::CartSummary;
use crate::model::item::ItemId;
use crate::model::order::{Confirmation, ContactUpdate, PickupSlot, SubOrderKind};

/// Client for interacting with the checkout session actor.
#[derive(Clone)]
pub struct CheckoutClient {
    sender: mpsc::Sender<CheckoutRequest>,
}

impl CheckoutClient {
    pub(crate) fn new(sender: mpsc::Sender<CheckoutRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T, CheckoutError>>) -> CheckoutRequest,
    ) -> Result<T, CheckoutError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(make(send))
            .await
            .map_err(|_| CheckoutError::ActorCommunication("checkout actor closed".to_string()))?;
        recv.await.map_err(|_| {
            CheckoutError::ActorCommunication("checkout actor dropped the response".to_string())
        })?
    }

    /// Add one unit of `id` to the cart; returns the updated partitioned
    /// view.
    #[instrument(skip(self))]
    pub async fn add_item(&self, id: ItemId) -> Result<CartSummary, CheckoutError> {
        debug!("Sending request");
        self.request(|respond_to| CheckoutRequest::AddItem { id, respond_to })
            .await
    }

    /// Remove the whole line for `id`. Absent lines are tolerated.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, id: ItemId) -> Result<CartSummary, CheckoutError> {
        debug!("Sending request");
        self.request(|respond_to| CheckoutRequest::RemoveItem { id, respond_to })
            .await
    }

    /// Replace the quantity for `id`; zero removes the line.
    #[instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        id: ItemId,
        quantity: u32,
    ) -> Result<CartSummary, CheckoutError> {
        debug!("Sending request");
        self.request(|respond_to| CheckoutRequest::SetQuantity {
            id,
            quantity,
            respond_to,
        })
        .await
    }

    /// The current partitioned cart view.
    #[instrument(skip(self))]
    pub async fn partition(&self) -> Result<CartSummary, CheckoutError> {
        debug!("Sending request");
        self.request(|respond_to| CheckoutRequest::Partition { respond_to })
            .await
    }

    /// Update any subset of the contact fields.
    #[instrument(skip(self, update))]
    pub async fn set_contact(&self, update: ContactUpdate) -> Result<(), CheckoutError> {
        debug!("Sending request");
        self.request(|respond_to| CheckoutRequest::SetContact { update, respond_to })
            .await
    }

    /// Set or clear the special instructions. Blank text clears.
    #[instrument(skip(self, text))]
    pub async fn set_instructions(&self, text: Option<String>) -> Result<(), CheckoutError> {
        debug!("Sending request");
        self.request(|respond_to| CheckoutRequest::SetInstructions { text, respond_to })
            .await
    }

    /// Choose a pickup slot for one half of the order. Rejected outright if
    /// the slot violates its policy.
    #[instrument(skip(self))]
    pub async fn set_pickup(
        &self,
        kind: SubOrderKind,
        slot: PickupSlot,
    ) -> Result<(), CheckoutError> {
        debug!("Sending request");
        self.request(|respond_to| CheckoutRequest::SetPickup {
            kind,
            slot,
            respond_to,
        })
        .await
    }

    /// Submit the order. Resolves once the whole pipeline has finished, for
    /// better or worse.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> Result<Confirmation, CheckoutError> {
        debug!("Sending request");
        self.request(|respond_to| CheckoutRequest::Submit { respond_to })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::order::OrderId;

    fn raw_channel() -> (CheckoutClient, mpsc::Receiver<CheckoutRequest>) {
        let (sender, receiver) = mpsc::channel(10);
        (CheckoutClient::new(sender), receiver)
    }

    #[tokio::test]
    async fn submit_resolves_with_the_actors_reply() {
        let (client, mut receiver) = raw_channel();

        let task = tokio::spawn(async move { client.submit().await });

        let Some(CheckoutRequest::Submit { respond_to }) = receiver.recv().await else {
            panic!("expected a Submit request");
        };
        respond_to
            .send(Ok(Confirmation {
                order_id: OrderId(1),
                summary: "in-stock items ready Thursday, March 12 at 12:00 PM".to_string(),
            }))
            .unwrap();

        let confirmation = task.await.unwrap().unwrap();
        assert_eq!(confirmation.order_id, OrderId(1));
    }

    #[tokio::test]
    async fn a_closed_mailbox_surfaces_as_a_communication_error() {
        let (client, receiver) = raw_channel();
        drop(receiver);

        let result = client.add_item(ItemId(1)).await;
        assert!(matches!(result, Err(CheckoutError::ActorCommunication(_))));
    }
}
