//! Attachment manager.

use serde_json::Value;

use super::{encode_id, RecordManager};
use crate::error::RtError;
use crate::models::{Page, Pagination, RecordRef, RecordType, SearchTerm};
use crate::rt_client::RtClient;

/// Transaction attachments: read-only, plus download links.
#[derive(Clone, Copy)]
pub struct AttachmentManager<'a> {
    records: RecordManager<'a>,
}

impl<'a> AttachmentManager<'a> {
    pub(crate) fn new(client: &'a RtClient) -> Self {
        Self {
            records: RecordManager::new(client, RecordType::Attachment),
        }
    }

    /// The generic view; only `get` and `search` are supported.
    pub fn records(&self) -> RecordManager<'a> {
        self.records
    }

    /// Fetches an attachment's metadata and content.
    pub async fn get(&self, id: &str) -> Result<Value, RtError> {
        self.records.get(id).await
    }

    /// Searches attachments.
    pub async fn search(&self, terms: &[SearchTerm], pagination: Pagination) -> Result<Page<Value>, RtError> {
        self.records.search(terms, pagination).await
    }

    /// Returns the web UI download link for an attachment.
    ///
    /// Without `ticket_id`, the ticket is found through the attachment's
    /// transaction, which costs two extra requests.
    pub async fn file_url(&self, attachment_id: &str, ticket_id: Option<&str>) -> Result<String, RtError> {
        let attachment = encode_id(attachment_id, "attachment id")?;

        let ticket = match ticket_id {
            Some(id) => encode_id(id, "ticket id")?,
            None => {
                let data = self.get(attachment_id).await?;
                let transaction = link(&data, "TransactionId")?;
                let transaction_data = self.records.client().transaction().get(&transaction.id).await?;
                encode_id(&link(&transaction_data, "Object")?.id, "ticket id")?
            }
        };

        Ok(format!(
            "{}Ticket/Attachment/{}/{}",
            self.records.client().base_url(),
            ticket,
            attachment
        ))
    }
}

/// Reads the record link stored under `field`.
fn link(data: &Value, field: &str) -> Result<RecordRef, RtError> {
    let value = data
        .get(field)
        .cloned()
        .ok_or_else(|| RtError::validation(format!("response has no {} link", field)))?;
    Ok(serde_json::from_value(value)?)
}
