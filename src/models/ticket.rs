//! Ticket models: statuses, replies and TicketSQL queries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RtError;

/// A ticket status from RT's default lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// Freshly created.
    New,
    /// Being worked on.
    Open,
    /// Waiting on something outside RT.
    Stalled,
    /// Done.
    Resolved,
    /// Closed without resolution.
    Rejected,
    /// Deleted.
    Deleted,
}

impl TicketStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [TicketStatus; 6] = [
        TicketStatus::New,
        TicketStatus::Open,
        TicketStatus::Stalled,
        TicketStatus::Resolved,
        TicketStatus::Rejected,
        TicketStatus::Deleted,
    ];

    /// The status name RT expects.
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::New => "new",
            TicketStatus::Open => "open",
            TicketStatus::Stalled => "stalled",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Rejected => "rejected",
            TicketStatus::Deleted => "deleted",
        }
    }

    /// Returns true for resolved, rejected and deleted.
    pub fn is_closed(self) -> bool {
        matches!(
            self,
            TicketStatus::Resolved | TicketStatus::Rejected | TicketStatus::Deleted
        )
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = RtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        TicketStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == name)
            .ok_or_else(|| RtError::InvalidStatus(s.to_string()))
    }
}

/// A reply sent to a ticket's correspondents.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReplyInput {
    /// Subject of the outgoing mail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Reply body.
    pub content: String,

    /// Extra Cc recipients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,

    /// Extra Bcc recipients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcc: Option<String>,
}

impl ReplyInput {
    /// Creates a reply with the given body.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Sets the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the Cc recipients.
    pub fn with_cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = Some(cc.into());
        self
    }

    /// Sets the Bcc recipients.
    pub fn with_bcc(mut self, bcc: impl Into<String>) -> Self {
        self.bcc = Some(bcc.into());
        self
    }
}

/// A ticket search in TicketSQL or RT's simple search syntax.
///
/// ```ignore
/// let query = TicketQuery::sql(r#"(Status = "new" OR Status = "open") AND Queue = "General""#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketQuery {
    /// The query text.
    pub query: String,

    /// Interpret `query` as simple search instead of TicketSQL.
    pub simple: bool,
}

impl TicketQuery {
    /// Creates a TicketSQL query.
    pub fn sql(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            simple: false,
        }
    }

    /// Creates a simple search query, e.g. `printer fire`.
    pub fn simple(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            simple: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("Open".parse::<TicketStatus>().unwrap(), TicketStatus::Open);
        assert_eq!(
            " resolved ".parse::<TicketStatus>().unwrap(),
            TicketStatus::Resolved
        );
        assert!(matches!(
            "blocked".parse::<TicketStatus>(),
            Err(RtError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_closed_statuses() {
        let closed: Vec<TicketStatus> = TicketStatus::ALL
            .into_iter()
            .filter(|s| s.is_closed())
            .collect();
        assert_eq!(
            closed,
            vec![
                TicketStatus::Resolved,
                TicketStatus::Rejected,
                TicketStatus::Deleted
            ]
        );
    }

    #[test]
    fn test_reply_serializes_pascal_case() {
        let reply = ReplyInput::new("Fixed").with_subject("Re: printer").with_cc("a@example.com");
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["Content"], "Fixed");
        assert_eq!(value["Subject"], "Re: printer");
        assert_eq!(value["Cc"], "a@example.com");
        assert!(value.get("Bcc").is_none());
    }
}
