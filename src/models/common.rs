//! Common types shared across RT API models.
//!
//! This module defines pagination, search terms, paginated result pages,
//! record links and write outcomes used by several record managers.

use serde::{Deserialize, Serialize};

use crate::error::RtError;
use crate::legacy::LegacyResponse;

/// Largest page size RT accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters for list, search and history operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,

    /// Number of results per page.
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

impl Pagination {
    /// Creates the default pagination: first page, 20 results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page number.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the number of results per page.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Checks the bounds RT enforces.
    ///
    /// # Errors
    ///
    /// Returns `RtError::Validation` if `page` is 0 or `per_page` is outside `1..=100`.
    pub fn validate(&self) -> Result<(), RtError> {
        if self.page == 0 {
            return Err(RtError::validation("page must be at least 1"));
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(RtError::validation(format!(
                "per_page must be between 1 and {}, got {}",
                MAX_PER_PAGE, self.per_page
            )));
        }
        Ok(())
    }

    /// Returns the `page`/`per_page` query pairs.
    pub fn to_query(&self) -> [(&'static str, String); 2] {
        [
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ]
    }
}

/// A single REST 2.0 search condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchTerm {
    /// The field to filter on, e.g. `Name`.
    pub field: String,

    /// Comparison operator such as `LIKE` or `>`; RT defaults to `=`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,

    /// The value to compare against.
    pub value: serde_json::Value,
}

impl SearchTerm {
    /// Creates an equality condition.
    pub fn eq(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            field: field.into(),
            operator: None,
            value: value.into(),
        }
    }

    /// Creates a `LIKE` condition for partial matching.
    pub fn like(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: Some("LIKE".to_string()),
            value: serde_json::Value::String(value.into()),
        }
    }

    /// Creates a condition with an explicit operator.
    pub fn with_operator(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: Some(operator.into()),
            value: value.into(),
        }
    }
}

/// A page of results from a REST 2.0 collection endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page<T> {
    /// Number of items on this page.
    #[serde(default)]
    pub count: u32,

    /// 1-based page number.
    #[serde(default)]
    pub page: u32,

    /// Requested page size.
    #[serde(default)]
    pub per_page: u32,

    /// Total matching records, when RT computed it.
    #[serde(default)]
    pub total: Option<u32>,

    /// Total number of pages, when RT computed it.
    #[serde(default)]
    pub pages: Option<u32>,

    /// The records on this page.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Returns true if more pages follow this one.
    ///
    /// Without a page total, a full page is assumed to have a successor.
    pub fn has_more(&self) -> bool {
        match self.pages {
            Some(pages) => self.page < pages,
            None => self.count > 0 && self.count >= self.per_page,
        }
    }
}

/// A link to another record, as embedded in REST 2.0 responses.
///
/// RT uses numeric ids for most types and names for some (users, queues),
/// so the id is always kept as a string.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecordRef {
    /// Record type name, e.g. `ticket`.
    #[serde(rename = "type", default)]
    pub record_type: Option<String>,

    /// Record id.
    #[serde(deserialize_with = "deserialize_string_or_int")]
    pub id: String,

    /// Absolute REST 2.0 URL of the record.
    #[serde(rename = "_url", default)]
    pub url: Option<String>,
}

/// Deserializes a value that can be either a string or an integer into a String.
fn deserialize_string_or_int<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct StringOrIntVisitor;

    impl<'de> Visitor<'de> for StringOrIntVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or an integer")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(StringOrIntVisitor)
}

/// System information from the `rt` endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SystemInfo {
    /// RT version string, e.g. `5.0.3`.
    #[serde(rename = "Version")]
    pub version: String,

    /// Installed plugin names.
    #[serde(rename = "Plugins", default)]
    pub plugins: Vec<String>,
}

/// Result of a write that may go through either API version.
///
/// REST 2.0 answers with JSON; writes carrying attachments go through
/// REST 1.0 and answer with a decoded legacy body.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// REST 2.0 JSON response.
    Json(serde_json::Value),
    /// REST 1.0 text response.
    Legacy(LegacyResponse),
}

impl Outcome {
    /// Returns the server's confirmation messages.
    ///
    /// REST 2.0 write endpoints answer with an array of strings; REST 1.0
    /// carries them as `# ` comment lines.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Outcome::Json(serde_json::Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            Outcome::Json(_) => Vec::new(),
            Outcome::Legacy(response) => {
                response.messages().into_iter().map(str::to_string).collect()
            }
        }
    }
}
