//! # Order Log Actor
//!
//! The system of record for submitted orders. The checkout session hands an
//! order over only after both confirmation sends succeed, so everything
//! recorded here was already announced to the customer and the bakery.

pub mod error;

pub use error::OrderLogError;

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::clients::OrderLogClient;
use crate::model::order::{OrderId, SubmittedOrder};

/// Type alias for the one-shot response channel used by the order log actor.
pub type OrderLogResponse<T> = oneshot::Sender<Result<T, OrderLogError>>;

/// Requests understood by the order log actor.
#[derive(Debug)]
pub enum OrderLogRequest {
    /// Record a snapshot; replies with the assigned id.
    Record {
        order: SubmittedOrder,
        respond_to: OrderLogResponse<OrderId>,
    },
    /// Snapshot of one recorded order.
    Get {
        id: OrderId,
        respond_to: OrderLogResponse<Option<SubmittedOrder>>,
    },
    /// How many orders have been recorded so far.
    Recorded { respond_to: OrderLogResponse<usize> },
}

/// The server half of the order log: owns the records and the receiver end
/// of the mailbox.
pub struct OrderLogActor {
    receiver: mpsc::Receiver<OrderLogRequest>,
    orders: HashMap<OrderId, SubmittedOrder>,
    next_id: u32,
}

/// Creates the order log actor and its client.
pub fn new(buffer_size: usize) -> (OrderLogActor, OrderLogClient) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let actor = OrderLogActor {
        receiver,
        orders: HashMap::new(),
        next_id: 1,
    };
    (actor, OrderLogClient::new(sender))
}

impl OrderLogActor {
    /// Runs the actor's event loop, processing messages until the channel
    /// closes.
    pub async fn run(mut self) {
        info!(actor = "order_log", "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                OrderLogRequest::Record { order, respond_to } => {
                    let id = OrderId(self.next_id);
                    self.next_id += 1;
                    info!(%id, total = order.total, size = self.orders.len() + 1, "Order recorded");
                    self.orders.insert(id, order);
                    let _ = respond_to.send(Ok(id));
                }
                OrderLogRequest::Get { id, respond_to } => {
                    let order = self.orders.get(&id).cloned();
                    debug!(%id, found = order.is_some(), "Get");
                    let _ = respond_to.send(Ok(order));
                }
                OrderLogRequest::Recorded { respond_to } => {
                    debug!(size = self.orders.len(), "Recorded");
                    let _ = respond_to.send(Ok(self.orders.len()));
                }
            }
        }

        info!(actor = "order_log", size = self.orders.len(), "Shutdown");
    }
}
