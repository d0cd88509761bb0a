//! Trading domain types
//!
//! Stocks, operations (a single record tagged buy/sell) and the portfolio of
//! holdings a conversation owns.

pub mod operation;
pub mod portfolio;
pub mod stock;

pub use operation::{Operation, OperationKind, OperationStatus};
pub use portfolio::{Holding, Portfolio};
pub use stock::{Market, Stock};
