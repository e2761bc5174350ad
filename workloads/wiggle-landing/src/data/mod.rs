//! Product data: prices, the size catalog, orders and the wishlist.

mod catalog;
mod money;
mod order;

pub use catalog::*;
pub use money::*;
pub use order::*;
