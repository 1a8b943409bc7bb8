//! # Mock Collaborators & Testing Guide
//!
//! Scripted stand-ins for the checkout session's collaborators, so the
//! session actor can be tested in isolation.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | Channel mock / [`MockNotifier`] | Real actor |
//! |---------|---------------------------------|------------|
//! | **Speed** | Instant (in-memory) | Fast (but involves tokio spawn) |
//! | **Determinism** | 100% deterministic | Subject to scheduler |
//! | **Error injection** | Easy (answer with `Err`, fail a recipient) | Hard (requires specific state) |
//! | **Use case** | Testing the session's orchestration | Testing the whole system |
//!
//! The channel mocks hand back the real typed client plus the raw mailbox
//! receiver. The test plays the actor's role: spawn the client call, assert
//! on the request that arrives, and answer through its oneshot. See
//! `tests/submission_test.rs` for the full pattern.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot, Semaphore};

use crate::catalog::{CatalogError, CatalogRequest};
use crate::clients::{CatalogClient, OrderLogClient};
use crate::model::item::{ItemId, MenuItem};
use crate::model::order::{OrderId, SubmittedOrder};
use crate::notify::{Notifier, NotifyError, TemplateFields};
use crate::orderlog::{OrderLogError, OrderLogRequest};

/// Creates a catalog client and a receiver for asserting its requests.
pub fn catalog_channel(
    buffer_size: usize,
) -> (CatalogClient, mpsc::Receiver<CatalogRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CatalogClient::new(sender), receiver)
}

/// Creates an order log client and a receiver for asserting its requests.
pub fn orderlog_channel(
    buffer_size: usize,
) -> (OrderLogClient, mpsc::Receiver<OrderLogRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (OrderLogClient::new(sender), receiver)
}

/// Helper to verify that the next catalog message is a Get request.
pub async fn expect_get(
    receiver: &mut mpsc::Receiver<CatalogRequest>,
) -> Option<(
    ItemId,
    oneshot::Sender<Result<Option<MenuItem>, CatalogError>>,
)> {
    match receiver.recv().await {
        Some(CatalogRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next order log message is a Record request.
pub async fn expect_record(
    receiver: &mut mpsc::Receiver<OrderLogRequest>,
) -> Option<(
    SubmittedOrder,
    oneshot::Sender<Result<OrderId, OrderLogError>>,
)> {
    match receiver.recv().await {
        Some(OrderLogRequest::Record { order, respond_to }) => Some((order, respond_to)),
        _ => None,
    }
}

/// One recorded send attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub recipient: String,
    pub fields: TemplateFields,
}

/// A scripted [`Notifier`]: records every attempt, fails for chosen
/// recipients, and can hold sends open behind a zero-permit semaphore.
///
/// The attempt is recorded before the gate and before the failure check, so
/// a test can observe that a send was started even while it is held or after
/// it was refused.
#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<SentMessage>>,
    failing: Mutex<HashSet<String>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send to `recipient` fails with a scripted rejection until
    /// [`recover_recipient`](Self::recover_recipient) is called.
    pub fn fail_recipient(&self, recipient: impl Into<String>) {
        self.failing.lock().unwrap().insert(recipient.into());
    }

    /// Lets a previously failing recipient succeed again.
    pub fn recover_recipient(&self, recipient: &str) {
        self.failing.lock().unwrap().remove(recipient);
    }

    /// Makes every send wait for a permit. Release held sends with
    /// `add_permits` on the returned semaphore, one permit per send.
    pub fn hold_sends(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Every attempt so far, in the order they started.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, recipient: &str, fields: &TemplateFields) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(SentMessage {
            recipient: recipient.to_string(),
            fields: fields.clone(),
        });

        // Clone the gate out so the lock is not held across the await.
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| NotifyError::Unavailable("gate closed".to_string()))?;
            permit.forget();
        }

        if self.failing.lock().unwrap().contains(recipient) {
            return Err(NotifyError::Rejected(format!(
                "scripted failure for {recipient}"
            )));
        }
        Ok(())
    }
}
