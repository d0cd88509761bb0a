//! Portfolio persistence
//!
//! Portfolios are stored whole, one record per conversation key. A missing
//! record is reported as [`TradeError::NotFound`](crate::error::TradeError::NotFound)
//! so callers can start from an empty portfolio.

mod json_file;
mod locks;
mod memory;
pub mod record;

pub use json_file::JsonFileStore;
pub use locks::ConversationLocks;
pub use memory::InMemoryStore;
pub use record::{HoldingRecord, PortfolioRecord};

use crate::error::Result;
use crate::model::Portfolio;
use async_trait::async_trait;

/// Keyed storage of portfolios
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    /// Load the portfolio stored under `key`
    async fn load(&self, key: &str) -> Result<Portfolio>;

    /// Replace the record stored under `key`
    async fn save(&self, key: &str, portfolio: &Portfolio) -> Result<()>;

    /// Load, or an empty portfolio when nothing is stored yet
    async fn load_or_default(&self, key: &str) -> Result<Portfolio> {
        match self.load(key).await {
            Ok(portfolio) => Ok(portfolio),
            Err(e) if e.is_not_found() => Ok(Portfolio::new()),
            Err(e) => Err(e),
        }
    }
}
