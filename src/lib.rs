//! # rt-rest
//!
//! A client library for the REST 1.0 and 2.0 APIs of Request Tracker (RT).
//!
//! ## Features
//!
//! - **Sessions**: password login through the web form, or RT::Authen::Token tokens
//! - **Records**: create, get, list, update, delete, search and history for
//!   tickets, queues, catalogs, assets, users, groups, custom roles,
//!   transactions, attachments and custom fields
//! - **Tickets**: replies, comments, status changes, TicketSQL search, bulk writes
//! - **Attachments**: writes carrying files go through REST 1.0 multipart uploads
//! - **Legacy parser**: decodes REST 1.0 text responses into ordered records
//!
//! ## Architecture
//!
//! - [`config`] - Configuration from environment variables or code
//! - [`error`] - Error type with secret sanitization
//! - [`rt_client`] - Authenticated HTTP session and generic verbs
//! - [`managers`] - Typed record managers per record type
//! - [`legacy`] - REST 1.0 response parser
//! - [`models`] - Record types, pagination, pages and ticket inputs
//!
//! Operations a record type does not support fail with
//! [`RtError::Unsupported`](error::RtError::Unsupported) before any request
//! is made.
//!
//! ## Configuration
//!
//! [`Config::from_env`](config::Config::from_env) reads:
//!
//! - `RT_BASE_URL`: Base URL of the RT instance
//! - `RT_AUTH_TOKEN`, or `RT_USERNAME` and `RT_PASSWORD`
//!
//! Optional: `RT_AUTH_ENDPOINT`, `RT_API_ENDPOINT`, `RT_ACCEPT_INVALID_CERTS`,
//! `RT_TIMEOUT_SECS`, and `RUST_LOG` for the binary.
//!
//! ## Example
//!
//! ```ignore
//! use rt_rest::config::Config;
//! use rt_rest::models::{Pagination, RecordRef, TicketQuery, TicketStatus};
//! use rt_rest::rt_client::RtClient;
//!
//! async fn example() -> Result<(), rt_rest::error::RtError> {
//!     let config = Config::from_env()?;
//!     let client = RtClient::connect(&config).await?;
//!
//!     let query = TicketQuery::sql(r#"Queue = "General" AND Status = "new""#);
//!     let page = client.ticket().search(&query, Pagination::new()).await?;
//!     for item in page.items {
//!         let ticket: RecordRef = serde_json::from_value(item)?;
//!         client.ticket().change_status(&ticket.id, TicketStatus::Open).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! Parsing a REST 1.0 body directly:
//!
//! ```
//! let records = rt_rest::legacy::parse("RT/4.4.3 200 Ok\n\nid: ticket/1\nSubject: Hello\n");
//! assert_eq!(records[0]["Subject"], "Hello");
//! assert_eq!(rt_rest::legacy::parse_status_code("RT/4.4.3 200 Ok\n"), Some(200));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod legacy;
pub mod managers;
pub mod models;
pub mod rt_client;
