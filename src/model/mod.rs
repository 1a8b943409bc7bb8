//! Pure data structures shared across the actors: menu items, the cart, and
//! order snapshots.

pub mod item;
pub mod cart;
pub mod order;

pub use item::*;
pub use cart::*;
pub use order::*;
