//! Transaction manager.

use serde_json::Value;

use super::{encode_id, RecordManager};
use crate::error::RtError;
use crate::models::{Page, Pagination, RecordType, SearchTerm};
use crate::rt_client::RtClient;

/// Ticket transactions: read-only, plus their attachments.
#[derive(Clone, Copy)]
pub struct TransactionManager<'a> {
    records: RecordManager<'a>,
}

impl<'a> TransactionManager<'a> {
    pub(crate) fn new(client: &'a RtClient) -> Self {
        Self {
            records: RecordManager::new(client, RecordType::Transaction),
        }
    }

    /// The generic view; only `get` and `search` are supported.
    pub fn records(&self) -> RecordManager<'a> {
        self.records
    }

    /// Fetches a transaction.
    pub async fn get(&self, id: &str) -> Result<Value, RtError> {
        self.records.get(id).await
    }

    /// Searches transactions.
    pub async fn search(&self, terms: &[SearchTerm], pagination: Pagination) -> Result<Page<Value>, RtError> {
        self.records.search(terms, pagination).await
    }

    /// Lists the attachments of a transaction.
    pub async fn get_attachments(
        &self,
        id: &str,
        pagination: Pagination,
    ) -> Result<Page<Value>, RtError> {
        pagination.validate()?;
        let path = format!("transaction/{}/attachments", encode_id(id, "transaction id")?);
        let value = self
            .records
            .client()
            .get_with_query(&path, &pagination.to_query())
            .await?;
        Ok(serde_json::from_value(value)?)
    }
}
