//! Domain types shared by the decision core and its host adapter.

pub mod bar;
pub mod order;
pub mod portfolio;

pub use bar::Bar;
pub use order::{OrderIntent, OrderSide, OrderTag};
pub use portfolio::{Holding, PortfolioSnapshot};

/// Symbol type alias
pub type Symbol = String;
