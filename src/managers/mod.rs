//! Record managers: typed views over an [`RtClient`] per record type.
//!
//! Every record type gets the same seven operations through
//! [`RecordManager`]. Operations the RT API does not offer for a type fail
//! with [`RtError::Unsupported`] before any request is sent. Types with
//! extra actions have their own manager wrapping a `RecordManager`.
//!
//! Managers borrow the client and hold no state of their own, so getting
//! one is free:
//!
//! ```ignore
//! let queues = client.queue().search(&[SearchTerm::like("Name", "Support")], Pagination::new()).await?;
//! client.ticket().reply("42", &ReplyInput::new("On it"), &[]).await?;
//! ```

mod attachment;
mod custom_field;
mod ticket;
mod transaction;

pub use attachment::AttachmentManager;
pub use custom_field::CustomFieldManager;
pub use ticket::TicketManager;
pub use transaction::TransactionManager;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::RtError;
use crate::models::{Attachment, Operation, Outcome, Page, Pagination, RecordType, SearchTerm};
use crate::rt_client::RtClient;

/// Record attributes as sent to REST 2.0, e.g. `{"Subject": "...", "Queue": "General"}`.
pub type Fields = Map<String, Value>;

/// The shared create/get/get_all/update/delete/search/history surface.
#[derive(Clone, Copy)]
pub struct RecordManager<'a> {
    client: &'a RtClient,
    record_type: RecordType,
}

impl<'a> RecordManager<'a> {
    pub(crate) fn new(client: &'a RtClient, record_type: RecordType) -> Self {
        Self {
            client,
            record_type,
        }
    }

    /// The record type this manager addresses.
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub(crate) fn client(&self) -> &'a RtClient {
        self.client
    }

    /// Builds `<type>/<id>`, percent-encoding the id.
    ///
    /// Ids are usually numeric, but users and queues may be addressed by name.
    pub(crate) fn record_path(&self, id: &str) -> Result<String, RtError> {
        Ok(format!("{}/{}", self.record_type, encode_id(id, "record id")?))
    }

    /// Creates a record.
    ///
    /// With attachments the record is created through REST 1.0 at
    /// `<type>/new`.
    pub async fn create(&self, attrs: &Fields, attachments: &[Attachment]) -> Result<Outcome, RtError> {
        self.record_type.ensure_supported(Operation::Create)?;

        if attachments.is_empty() {
            let value = self.client.post(self.record_type.as_str(), attrs).await?;
            return Ok(Outcome::Json(value));
        }

        let mut content = legacy_fields(attrs);
        content
            .entry("id".to_string())
            .or_insert_with(|| format!("{}/new", self.record_type));
        let path = format!("{}/new", self.record_type);
        let response = self.client.post_v1(&path, content, attachments).await?;
        Ok(Outcome::Legacy(response))
    }

    /// Fetches one record.
    pub async fn get(&self, id: &str) -> Result<Value, RtError> {
        self.record_type.ensure_supported(Operation::Get)?;
        let path = self.record_path(id)?;
        self.client.get(&path).await
    }

    /// Lists every record of this type, one page at a time.
    pub async fn get_all(&self, pagination: Pagination) -> Result<Page<Value>, RtError> {
        self.record_type.ensure_supported(Operation::GetAll)?;
        pagination.validate()?;
        let path = format!("{}/all", self.record_type.collection());
        let value = self
            .client
            .get_with_query(&path, &pagination.to_query())
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Updates a record.
    ///
    /// With attachments the update goes through REST 1.0 at
    /// `<type>/<id>/edit`.
    pub async fn update(
        &self,
        id: &str,
        attrs: &Fields,
        attachments: &[Attachment],
    ) -> Result<Outcome, RtError> {
        if attachments.is_empty() {
            return Ok(Outcome::Json(self.put_fields(id, attrs).await?));
        }

        self.record_type.ensure_supported(Operation::Update)?;
        let path = format!("{}/edit", self.record_path(id)?);
        let response = self
            .client
            .post_v1(&path, legacy_fields(attrs), attachments)
            .await?;
        Ok(Outcome::Legacy(response))
    }

    /// REST 2.0 update without attachments.
    pub(crate) async fn put_fields(&self, id: &str, attrs: &Fields) -> Result<Value, RtError> {
        self.record_type.ensure_supported(Operation::Update)?;
        let path = self.record_path(id)?;
        self.client.put(&path, attrs).await
    }

    /// Deletes a record. RT disables rather than removes most record types.
    pub async fn delete(&self, id: &str) -> Result<Value, RtError> {
        self.record_type.ensure_supported(Operation::Delete)?;
        let path = self.record_path(id)?;
        self.client.delete(&path).await
    }

    /// Searches records with REST 2.0 search terms.
    ///
    /// Tickets are searched with TicketSQL built from the terms, since
    /// posting to the ticket collection creates a ticket.
    pub async fn search(
        &self,
        terms: &[SearchTerm],
        pagination: Pagination,
    ) -> Result<Page<Value>, RtError> {
        self.record_type.ensure_supported(Operation::Search)?;
        pagination.validate()?;

        if self.record_type == RecordType::Ticket {
            let query = ticket::terms_to_ticket_sql(terms);
            return TicketManager::new(self.client)
                .search(&crate::models::TicketQuery::sql(query), pagination)
                .await;
        }

        let value = self
            .client
            .post_with_query(&self.record_type.collection(), &pagination.to_query(), terms)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetches the transaction history of a record.
    pub async fn history(&self, id: &str, pagination: Pagination) -> Result<Page<Value>, RtError> {
        self.record_type.ensure_supported(Operation::History)?;
        pagination.validate()?;
        let path = format!("{}/history", self.record_path(id)?);
        let value = self
            .client
            .get_with_query(&path, &pagination.to_query())
            .await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Rejects blank ids and percent-encodes the rest for use as a path segment.
pub(crate) fn encode_id(id: &str, field_name: &str) -> Result<String, RtError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(RtError::validation(format!("{} must not be empty", field_name)));
    }
    Ok(urlencoding::encode(id).into_owned())
}

/// Flattens JSON attributes into REST 1.0 `Key: Value` fields.
///
/// Strings are sent as-is, nulls are skipped and anything else is sent as
/// its JSON text.
pub(crate) fn legacy_fields(attrs: &Fields) -> IndexMap<String, String> {
    attrs
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), value)
        })
        .collect()
}

impl RtClient {
    /// The generic manager for any record type.
    pub fn records(&self, record_type: RecordType) -> RecordManager<'_> {
        RecordManager::new(self, record_type)
    }

    /// Tickets.
    pub fn ticket(&self) -> TicketManager<'_> {
        TicketManager::new(self)
    }

    /// Queues.
    pub fn queue(&self) -> RecordManager<'_> {
        self.records(RecordType::Queue)
    }

    /// Asset catalogs.
    pub fn catalog(&self) -> RecordManager<'_> {
        self.records(RecordType::Catalog)
    }

    /// Assets.
    pub fn asset(&self) -> RecordManager<'_> {
        self.records(RecordType::Asset)
    }

    /// Users.
    pub fn user(&self) -> RecordManager<'_> {
        self.records(RecordType::User)
    }

    /// Groups (get and search only).
    pub fn group(&self) -> RecordManager<'_> {
        self.records(RecordType::Group)
    }

    /// Custom roles (get and search only).
    pub fn custom_role(&self) -> RecordManager<'_> {
        self.records(RecordType::CustomRole)
    }

    /// Transactions.
    pub fn transaction(&self) -> TransactionManager<'_> {
        TransactionManager::new(self)
    }

    /// Attachments.
    pub fn attachment(&self) -> AttachmentManager<'_> {
        AttachmentManager::new(self)
    }

    /// Custom fields.
    pub fn custom_field(&self) -> CustomFieldManager<'_> {
        CustomFieldManager::new(self)
    }
}
