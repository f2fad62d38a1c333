//! Custom field manager with name lookups cached on the client.

use serde_json::Value;

use super::RecordManager;
use crate::error::RtError;
use crate::models::{Page, Pagination, RecordRef, RecordType, SearchTerm};
use crate::rt_client::RtClient;

/// Custom fields: read-only, plus name to id resolution.
#[derive(Clone, Copy)]
pub struct CustomFieldManager<'a> {
    records: RecordManager<'a>,
}

impl<'a> CustomFieldManager<'a> {
    pub(crate) fn new(client: &'a RtClient) -> Self {
        Self {
            records: RecordManager::new(client, RecordType::CustomField),
        }
    }

    /// The generic view; only `get` and `search` are supported.
    pub fn records(&self) -> RecordManager<'a> {
        self.records
    }

    /// Fetches a custom field definition.
    pub async fn get(&self, id: &str) -> Result<Value, RtError> {
        self.records.get(id).await
    }

    /// Searches custom fields.
    pub async fn search(&self, terms: &[SearchTerm], pagination: Pagination) -> Result<Page<Value>, RtError> {
        self.records.search(terms, pagination).await
    }

    /// Finds the custom field called `name`.
    ///
    /// A found field is remembered for the lifetime of the client and later
    /// calls do not contact RT. Misses are not remembered, so a field created
    /// afterwards is still found.
    pub async fn get_id(&self, name: &str) -> Result<Option<RecordRef>, RtError> {
        let client = self.records.client();
        if let Some(field) = client.cached_custom_field(name) {
            tracing::trace!(name = %name, id = %field.id, "Custom field id from cache");
            return Ok(Some(field));
        }

        let page = self
            .search(
                &[SearchTerm::eq("Name", name)],
                Pagination::new().with_per_page(1),
            )
            .await?;

        if page.count == 0 {
            tracing::debug!(name = %name, "Custom field not found");
            return Ok(None);
        }
        let Some(first) = page.items.into_iter().next() else {
            return Ok(None);
        };
        let field: RecordRef = serde_json::from_value(first)?;
        Ok(Some(client.remember_custom_field(name, field)))
    }
}
