//! # Catalog Client
//!
//! High-level API for talking to the catalog actor: seeding items, reading
//! snapshots, browsing the menu, and restocking.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::catalog::{CatalogError, CatalogRequest};
use crate::model::item::{ItemId, Menu, MenuItem, MenuItemSpec};

/// Client for interacting with the catalog actor.
#[derive(Clone)]
pub struct CatalogClient {
    sender: mpsc::Sender<CatalogRequest>,
}

impl CatalogClient {
    pub(crate) fn new(sender: mpsc::Sender<CatalogRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T, CatalogError>>) -> CatalogRequest,
    ) -> Result<T, CatalogError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(make(send))
            .await
            .map_err(|_| CatalogError::ActorCommunication("catalog actor closed".to_string()))?;
        recv.await.map_err(|_| {
            CatalogError::ActorCommunication("catalog actor dropped the response".to_string())
        })?
    }

    /// Seed a new menu item; returns its assigned id.
    #[instrument(skip(self, spec), fields(name = %spec.name))]
    pub async fn add_item(&self, spec: MenuItemSpec) -> Result<ItemId, CatalogError> {
        debug!("Sending request");
        self.request(|respond_to| CatalogRequest::AddItem { spec, respond_to })
            .await
    }

    /// Snapshot of one item, `None` if the id is not on the menu.
    #[instrument(skip(self))]
    pub async fn get(&self, id: ItemId) -> Result<Option<MenuItem>, CatalogError> {
        debug!("Sending request");
        self.request(|respond_to| CatalogRequest::Get { id, respond_to })
            .await
    }

    /// The full browsing view.
    #[instrument(skip(self))]
    pub async fn menu(&self) -> Result<Menu, CatalogError> {
        debug!("Sending request");
        self.request(|respond_to| CatalogRequest::Menu { respond_to })
            .await
    }

    /// Replace the on-hand count for an in-stock item.
    #[instrument(skip(self))]
    pub async fn set_stock(&self, id: ItemId, stock: u32) -> Result<MenuItem, CatalogError> {
        debug!("Sending request");
        self.request(|respond_to| CatalogRequest::SetStock {
            id,
            stock,
            respond_to,
        })
        .await
    }
}
