//! Record types and the operations each one supports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RtError;

/// Every record type the client can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    /// Tickets, with their own search syntax and actions.
    Ticket,
    /// Queues.
    Queue,
    /// Asset catalogs.
    Catalog,
    /// Assets.
    Asset,
    /// Users.
    User,
    /// Groups.
    Group,
    /// Custom roles.
    #[serde(rename = "customrole")]
    CustomRole,
    /// Ticket transactions.
    Transaction,
    /// Transaction attachments.
    Attachment,
    /// Custom fields.
    #[serde(rename = "customfield")]
    CustomField,
}

/// The shared operations of a record manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create a record.
    Create,
    /// Fetch one record.
    Get,
    /// List every record, paginated.
    GetAll,
    /// Update a record.
    Update,
    /// Delete (disable) a record.
    Delete,
    /// Search records.
    Search,
    /// Fetch a record's transaction history.
    History,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "Create",
            Operation::Get => "Get",
            Operation::GetAll => "Get All",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
            Operation::Search => "Search",
            Operation::History => "History",
        };
        f.write_str(name)
    }
}

impl RecordType {
    /// All record types, in declaration order.
    pub const ALL: [RecordType; 10] = [
        RecordType::Ticket,
        RecordType::Queue,
        RecordType::Catalog,
        RecordType::Asset,
        RecordType::User,
        RecordType::Group,
        RecordType::CustomRole,
        RecordType::Transaction,
        RecordType::Attachment,
        RecordType::CustomField,
    ];

    /// The singular path segment used by REST 2.0 (`ticket`, `customfield`...).
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Ticket => "ticket",
            RecordType::Queue => "queue",
            RecordType::Catalog => "catalog",
            RecordType::Asset => "asset",
            RecordType::User => "user",
            RecordType::Group => "group",
            RecordType::CustomRole => "customrole",
            RecordType::Transaction => "transaction",
            RecordType::Attachment => "attachment",
            RecordType::CustomField => "customfield",
        }
    }

    /// The collection path segment (`tickets`, `customfields`...).
    pub fn collection(self) -> String {
        format!("{}s", self.as_str())
    }

    /// Returns true if the RT API allows `operation` on this record type.
    ///
    /// Queues, catalogs, assets and users support everything. Tickets support
    /// everything except listing all records. The remaining types can only
    /// be fetched and searched.
    pub fn supports(self, operation: Operation) -> bool {
        match self {
            RecordType::Queue | RecordType::Catalog | RecordType::Asset | RecordType::User => true,
            RecordType::Ticket => operation != Operation::GetAll,
            RecordType::Group
            | RecordType::CustomRole
            | RecordType::Transaction
            | RecordType::Attachment
            | RecordType::CustomField => matches!(operation, Operation::Get | Operation::Search),
        }
    }

    /// Returns `Unsupported` if the RT API does not allow `operation`.
    pub fn ensure_supported(self, operation: Operation) -> Result<(), RtError> {
        if self.supports(operation) {
            Ok(())
        } else {
            Err(RtError::unsupported(operation, self))
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = RtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        RecordType::ALL
            .into_iter()
            .find(|t| t.as_str() == name)
            .ok_or_else(|| RtError::InvalidRecordType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_round_trips_names() {
        for record_type in RecordType::ALL {
            assert_eq!(record_type.as_str().parse::<RecordType>().unwrap(), record_type);
        }
        assert_eq!("Queue".parse::<RecordType>().unwrap(), RecordType::Queue);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "widget".parse::<RecordType>().unwrap_err();
        assert!(matches!(err, RtError::InvalidRecordType(ref name) if name == "widget"));
    }

    #[test]
    fn test_full_records_support_everything() {
        for operation in [
            Operation::Create,
            Operation::Get,
            Operation::GetAll,
            Operation::Update,
            Operation::Delete,
            Operation::Search,
            Operation::History,
        ] {
            assert!(RecordType::Asset.supports(operation));
        }
    }

    #[test]
    fn test_ticket_has_no_get_all() {
        assert!(!RecordType::Ticket.supports(Operation::GetAll));
        assert!(RecordType::Ticket.supports(Operation::History));
    }

    #[test]
    fn test_limited_records_only_get_and_search() {
        assert!(RecordType::Group.supports(Operation::Get));
        assert!(RecordType::Group.supports(Operation::Search));
        assert!(!RecordType::Group.supports(Operation::Create));
        let err = RecordType::CustomRole
            .ensure_supported(Operation::History)
            .unwrap_err();
        assert!(matches!(
            err,
            RtError::Unsupported {
                operation: Operation::History,
                record_type: RecordType::CustomRole
            }
        ));
    }

    #[test]
    fn test_collection_path() {
        assert_eq!(RecordType::CustomField.collection(), "customfields");
    }
}
