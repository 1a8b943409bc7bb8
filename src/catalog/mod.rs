//! # Menu Catalog Actor
//!
//! Owns the menu: the curated category order and every [`MenuItem`], keyed
//! by id. The checkout session reads item snapshots from here on every cart
//! mutation so stock checks always see current numbers; operators seed and
//! restock through the same mailbox.
//!
//! # Concurrency Model
//! One actor owns all menu state and processes its mailbox sequentially, so
//! a restock can never race a stock check. No locks involved.

pub mod error;

pub use error::CatalogError;

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::clients::CatalogClient;
use crate::model::item::{Availability, ItemId, Menu, MenuItem, MenuItemSpec};

/// Type alias for the one-shot response channel used by the catalog actor.
pub type CatalogResponse<T> = oneshot::Sender<Result<T, CatalogError>>;

/// Requests understood by the catalog actor.
#[derive(Debug)]
pub enum CatalogRequest {
    /// Seed a new item. Fails if the category is not on the menu.
    AddItem {
        spec: MenuItemSpec,
        respond_to: CatalogResponse<ItemId>,
    },
    /// Snapshot of one item.
    Get {
        id: ItemId,
        respond_to: CatalogResponse<Option<MenuItem>>,
    },
    /// The full browsing view.
    Menu { respond_to: CatalogResponse<Menu> },
    /// Operator restock; replies with the updated item.
    SetStock {
        id: ItemId,
        stock: u32,
        respond_to: CatalogResponse<MenuItem>,
    },
}

/// The server half of the catalog: owns the state and the receiver end of
/// the mailbox.
pub struct CatalogActor {
    receiver: mpsc::Receiver<CatalogRequest>,
    categories: Vec<String>,
    items: HashMap<ItemId, MenuItem>,
    /// Ids in seeding order, so the menu lists items the way the operator
    /// entered them.
    listing: Vec<ItemId>,
    next_id: u32,
}

/// Creates the catalog actor and its client.
pub fn new(buffer_size: usize, categories: Vec<String>) -> (CatalogActor, CatalogClient) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let actor = CatalogActor {
        receiver,
        categories,
        items: HashMap::new(),
        listing: Vec::new(),
        next_id: 1,
    };
    (actor, CatalogClient::new(sender))
}

impl CatalogActor {
    /// Runs the actor's event loop, processing messages until the channel
    /// closes.
    pub async fn run(mut self) {
        info!(actor = "catalog", categories = self.categories.len(), "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CatalogRequest::AddItem { spec, respond_to } => {
                    debug!(name = %spec.name, category = %spec.category, "AddItem");
                    let _ = respond_to.send(self.add_item(spec));
                }
                CatalogRequest::Get { id, respond_to } => {
                    let item = self.items.get(&id).cloned();
                    debug!(%id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                CatalogRequest::Menu { respond_to } => {
                    debug!(items = self.listing.len(), "Menu");
                    let _ = respond_to.send(Ok(self.menu()));
                }
                CatalogRequest::SetStock {
                    id,
                    stock,
                    respond_to,
                } => {
                    debug!(%id, stock, "SetStock");
                    let _ = respond_to.send(self.set_stock(id, stock));
                }
            }
        }

        info!(actor = "catalog", size = self.items.len(), "Shutdown");
    }

    fn add_item(&mut self, spec: MenuItemSpec) -> Result<ItemId, CatalogError> {
        if !self.categories.iter().any(|c| c == &spec.category) {
            warn!(category = %spec.category, "AddItem failed");
            return Err(CatalogError::UnknownCategory(spec.category));
        }
        let id = ItemId(self.next_id);
        self.next_id += 1;
        let item = MenuItem::new(id, spec);
        info!(%id, name = %item.name, size = self.items.len() + 1, "Item added");
        self.items.insert(id, item);
        self.listing.push(id);
        Ok(id)
    }

    fn menu(&self) -> Menu {
        let items = self
            .listing
            .iter()
            .filter_map(|id| self.items.get(id).cloned())
            .collect();
        Menu {
            categories: self.categories.clone(),
            items,
        }
    }

    fn set_stock(&mut self, id: ItemId, stock: u32) -> Result<MenuItem, CatalogError> {
        let Some(item) = self.items.get_mut(&id) else {
            warn!(%id, "Not found");
            return Err(CatalogError::UnknownItem(id));
        };
        match &mut item.availability {
            Availability::InStock { stock: on_hand } => {
                *on_hand = stock;
                info!(%id, stock, "Stock updated");
                Ok(item.clone())
            }
            Availability::MadeToOrder => {
                warn!(%id, "SetStock failed");
                Err(CatalogError::NotStocked(id))
            }
        }
    }
}
