use super::{PortfolioRecord, PortfolioStore};
use crate::error::{Result, TradeError};
use crate::model::Portfolio;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local store, lost on exit
///
/// Keeps records rather than portfolios so a load behaves like a file load:
/// session-only data such as the order history does not survive a save.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<String, PortfolioRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record directly
    pub async fn insert(&self, key: impl Into<String>, record: PortfolioRecord) {
        self.records.write().await.insert(key.into(), record);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl PortfolioStore for InMemoryStore {
    async fn load(&self, key: &str) -> Result<Portfolio> {
        let record = self
            .records
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| TradeError::NotFound(key.to_string()))?;
        record.into_portfolio()
    }

    async fn save(&self, key: &str, portfolio: &Portfolio) -> Result<()> {
        self.records
            .write()
            .await
            .insert(key.to_string(), PortfolioRecord::from(portfolio));
        Ok(())
    }
}
