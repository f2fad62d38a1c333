//! Ticket manager: CRUD plus correspondence, comments and status changes.

use indexmap::IndexMap;
use serde_json::{json, Value};

use super::{encode_id, Fields, RecordManager};
use crate::error::RtError;
use crate::models::{
    Attachment, Outcome, Page, Pagination, RecordType, ReplyInput, SearchTerm, TicketQuery,
    TicketStatus,
};
use crate::rt_client::RtClient;

/// Tickets: everything but `get_all`, searched with TicketSQL.
#[derive(Clone, Copy)]
pub struct TicketManager<'a> {
    records: RecordManager<'a>,
}

impl<'a> TicketManager<'a> {
    pub(crate) fn new(client: &'a RtClient) -> Self {
        Self {
            records: RecordManager::new(client, RecordType::Ticket),
        }
    }

    /// The generic view, for code written against any record type.
    pub fn records(&self) -> RecordManager<'a> {
        self.records
    }

    /// Creates a ticket; with attachments through REST 1.0.
    pub async fn create(&self, attrs: &Fields, attachments: &[Attachment]) -> Result<Outcome, RtError> {
        self.records.create(attrs, attachments).await
    }

    /// Fetches a ticket.
    pub async fn get(&self, id: &str) -> Result<Value, RtError> {
        self.records.get(id).await
    }

    /// Updates a ticket; with attachments through REST 1.0.
    pub async fn update(
        &self,
        id: &str,
        attrs: &Fields,
        attachments: &[Attachment],
    ) -> Result<Outcome, RtError> {
        self.records.update(id, attrs, attachments).await
    }

    /// Deletes a ticket (sets its status to deleted).
    pub async fn delete(&self, id: &str) -> Result<Value, RtError> {
        self.records.delete(id).await
    }

    /// Fetches a ticket's transaction history.
    pub async fn history(&self, id: &str, pagination: Pagination) -> Result<Page<Value>, RtError> {
        self.records.history(id, pagination).await
    }

    /// Searches tickets with TicketSQL or simple search.
    ///
    /// ```ignore
    /// let query = TicketQuery::sql(r#"(Status = "new" OR Status = "open") AND Queue = "General""#);
    /// let page = client.ticket().search(&query, Pagination::new()).await?;
    /// ```
    pub async fn search(&self, query: &TicketQuery, pagination: Pagination) -> Result<Page<Value>, RtError> {
        pagination.validate()?;
        let params = [
            ("query", query.query.clone()),
            ("simple", if query.simple { "1" } else { "0" }.to_string()),
            ("page", pagination.page.to_string()),
            ("per_page", pagination.per_page.to_string()),
        ];
        let value = self
            .records
            .client()
            .get_with_query(&RecordType::Ticket.collection(), &params)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Creates several tickets in one request.
    pub async fn bulk_create(&self, tickets: &[Fields]) -> Result<Value, RtError> {
        self.records.client().post("tickets/bulk", tickets).await
    }

    /// Updates several tickets in one request; each entry carries its `id`.
    pub async fn bulk_update(&self, tickets: &[Fields]) -> Result<Value, RtError> {
        self.records.client().put("tickets/bulk", tickets).await
    }

    /// Replies to a ticket, mailing its correspondents.
    ///
    /// Replies with attachments go through REST 1.0.
    pub async fn reply(
        &self,
        id: &str,
        reply: &ReplyInput,
        attachments: &[Attachment],
    ) -> Result<Outcome, RtError> {
        let ticket_id = encode_id(id, "ticket id")?;

        if attachments.is_empty() {
            let mut body = Fields::new();
            body.insert("Action".to_string(), json!("Correspond"));
            body.insert("ContentType".to_string(), json!("text/plain"));
            if let Value::Object(reply) = serde_json::to_value(reply)? {
                body.extend(reply);
            }
            let path = format!("ticket/{}/correspond", ticket_id);
            return Ok(Outcome::Json(self.records.client().post(&path, &body).await?));
        }

        let mut content = IndexMap::new();
        content.insert("id".to_string(), id.trim().to_string());
        content.insert("Action".to_string(), "correspond".to_string());
        for (key, value) in [
            ("Subject", &reply.subject),
            ("Cc", &reply.cc),
            ("Bcc", &reply.bcc),
        ] {
            if let Some(value) = value {
                content.insert(key.to_string(), value.clone());
            }
        }
        content.insert("Text".to_string(), reply.content.clone());

        let path = format!("ticket/{}/comment", ticket_id);
        let response = self.records.client().post_v1(&path, content, attachments).await?;
        Ok(Outcome::Legacy(response))
    }

    /// Adds an internal comment to a ticket.
    ///
    /// Comments with attachments go through REST 1.0.
    pub async fn comment(
        &self,
        id: &str,
        text: &str,
        attachments: &[Attachment],
    ) -> Result<Outcome, RtError> {
        let ticket_id = encode_id(id, "ticket id")?;
        let path = format!("ticket/{}/comment", ticket_id);

        if attachments.is_empty() {
            return Ok(Outcome::Json(self.records.client().post_text(&path, text).await?));
        }

        let mut content = IndexMap::new();
        content.insert("id".to_string(), id.trim().to_string());
        content.insert("Action".to_string(), "comment".to_string());
        content.insert("Text".to_string(), text.to_string());

        let response = self.records.client().post_v1(&path, content, attachments).await?;
        Ok(Outcome::Legacy(response))
    }

    /// Resolves a ticket.
    pub async fn close(&self, id: &str) -> Result<Value, RtError> {
        self.change_status(id, TicketStatus::Resolved).await
    }

    /// Sets a ticket back to open.
    pub async fn reopen(&self, id: &str) -> Result<Value, RtError> {
        self.change_status(id, TicketStatus::Open).await
    }

    /// Moves a ticket to `status`.
    pub async fn change_status(&self, id: &str, status: TicketStatus) -> Result<Value, RtError> {
        tracing::debug!(ticket_id = %id, status = %status, "Changing ticket status");
        let mut attrs = Fields::new();
        attrs.insert("Status".to_string(), Value::String(status.as_str().to_string()));
        self.records.put_fields(id, &attrs).await
    }

    /// Moves a ticket to the status called `status`.
    ///
    /// # Errors
    ///
    /// Returns `RtError::InvalidStatus` without contacting RT if the name is
    /// not a known status.
    pub async fn change_status_by_name(&self, id: &str, status: &str) -> Result<Value, RtError> {
        let status: TicketStatus = status.parse()?;
        self.change_status(id, status).await
    }
}

/// Builds a TicketSQL query that ANDs the terms together.
///
/// An empty term list matches every ticket.
pub(crate) fn terms_to_ticket_sql(terms: &[SearchTerm]) -> String {
    if terms.is_empty() {
        return "id > 0".to_string();
    }
    terms
        .iter()
        .map(|term| {
            let operator = term.operator.as_deref().unwrap_or("=");
            let value = match &term.value {
                Value::String(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
                other => other.to_string(),
            };
            format!("{} {} {}", term.field, operator, value)
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}
