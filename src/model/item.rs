use serde::{Deserialize, Serialize};

use std::fmt::Display;

/// Type-safe identifier for menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl From<u32> for ItemId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item_{}", self.0)
    }
}

/// How an item is fulfilled, which decides the pickup policy that applies
/// to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    /// Baked ahead and sold from the case, limited by what is on hand.
    InStock { stock: u32 },
    /// Baked per order in the weekend batch. No stock limit.
    MadeToOrder,
}

impl Availability {
    pub fn is_made_to_order(&self) -> bool {
        matches!(self, Availability::MadeToOrder)
    }

    /// Units on hand, `None` for made-to-order items.
    pub fn stock(&self) -> Option<u32> {
        match self {
            Availability::InStock { stock } => Some(*stock),
            Availability::MadeToOrder => None,
        }
    }
}

/// Dietary attributes shown on the menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietaryFlags {
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
}

/// Allergen attributes shown on the menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergenFlags {
    pub nuts: bool,
    pub dairy: bool,
    pub eggs: bool,
    pub soy: bool,
}

/// One entry on the bakery's menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: ItemId,
    pub name: String,
    /// Unit price in dollars. Well-formed catalog data keeps this finite and
    /// non-negative; cart totals coerce anything else to zero.
    pub price: f64,
    pub category: String,
    pub availability: Availability,
    pub dietary: DietaryFlags,
    pub allergens: AllergenFlags,
}

impl MenuItem {
    /// Creates a new menu item.
    ///
    /// # Arguments
    /// * `id` - Unique identifier (set by the catalog actor)
    /// * `spec` - Everything else, as seeded by the operator
    pub fn new(id: ItemId, spec: MenuItemSpec) -> Self {
        Self {
            id,
            name: spec.name,
            price: spec.price,
            category: spec.category,
            availability: spec.availability,
            dietary: spec.dietary,
            allergens: spec.allergens,
        }
    }

    pub fn is_made_to_order(&self) -> bool {
        self.availability.is_made_to_order()
    }

    pub fn stock(&self) -> Option<u32> {
        self.availability.stock()
    }
}

/// DTO for seeding a new item into the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemSpec {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub availability: Availability,
    #[serde(default)]
    pub dietary: DietaryFlags,
    #[serde(default)]
    pub allergens: AllergenFlags,
}

impl MenuItemSpec {
    /// Spec for a case item sold from on-hand stock.
    pub fn in_stock(
        name: impl Into<String>,
        price: f64,
        category: impl Into<String>,
        stock: u32,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            category: category.into(),
            availability: Availability::InStock { stock },
            dietary: DietaryFlags::default(),
            allergens: AllergenFlags::default(),
        }
    }

    /// Spec for an item baked per order in the weekend batch.
    pub fn made_to_order(name: impl Into<String>, price: f64, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            category: category.into(),
            availability: Availability::MadeToOrder,
            dietary: DietaryFlags::default(),
            allergens: AllergenFlags::default(),
        }
    }

    pub fn with_dietary(mut self, dietary: DietaryFlags) -> Self {
        self.dietary = dietary;
        self
    }

    pub fn with_allergens(mut self, allergens: AllergenFlags) -> Self {
        self.allergens = allergens;
        self
    }
}

/// The browsing view served by the catalog: the curated category order plus
/// every item in seeding order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    pub categories: Vec<String>,
    pub items: Vec<MenuItem>,
}
