//! Data models for the RT REST API.
//!
//! This module contains record type and capability definitions, pagination
//! and search parameters, paginated result pages, ticket-specific inputs and
//! attachment files.

mod attachment;
mod common;
mod record;
mod ticket;

pub use attachment::*;
pub use common::*;
pub use record::*;
pub use ticket::*;
