//! # Order Log Client
//!
//! High-level API for talking to the order log actor.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::model::order::{OrderId, SubmittedOrder};
use crate::orderlog::{OrderLogError, OrderLogRequest};

/// Client for interacting with the order log actor.
#[derive(Clone)]
pub struct OrderLogClient {
    sender: mpsc::Sender<OrderLogRequest>,
}

impl OrderLogClient {
    pub(crate) fn new(sender: mpsc::Sender<OrderLogRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T, OrderLogError>>) -> OrderLogRequest,
    ) -> Result<T, OrderLogError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(make(send))
            .await
            .map_err(|_| OrderLogError::ActorCommunication("order log actor closed".to_string()))?;
        recv.await.map_err(|_| {
            OrderLogError::ActorCommunication("order log actor dropped the response".to_string())
        })?
    }

    /// Record a submitted order; returns its assigned id.
    #[instrument(skip(self, order), fields(total = order.total))]
    pub async fn record(&self, order: SubmittedOrder) -> Result<OrderId, OrderLogError> {
        debug!("Sending request");
        self.request(|respond_to| OrderLogRequest::Record { order, respond_to })
            .await
    }

    /// Snapshot of one recorded order, `None` if the id is unknown.
    #[instrument(skip(self))]
    pub async fn get(&self, id: OrderId) -> Result<Option<SubmittedOrder>, OrderLogError> {
        debug!("Sending request");
        self.request(|respond_to| OrderLogRequest::Get { id, respond_to })
            .await
    }

    /// How many orders have been recorded so far.
    #[instrument(skip(self))]
    pub async fn recorded(&self) -> Result<usize, OrderLogError> {
        debug!("Sending request");
        self.request(|respond_to| OrderLogRequest::Recorded { respond_to })
            .await
    }
}
