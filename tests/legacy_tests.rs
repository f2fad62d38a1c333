//! Decoding of complete REST 1.0 bodies as RT 4 produces them.

use pretty_assertions::assert_eq;
use tokio_test::{assert_err, assert_ok};

use rt_rest::error::RtError;
use rt_rest::legacy::{self, LegacyResponse};

const TICKET_SHOW: &str = "RT/4.4.3 200 Ok

id: ticket/42
Queue: General
Owner: Nobody
Subject: Printer on floor 3 jams
Status: open
Requestors: alice@example.com,
            bob@example.com
CF.{Severity}: high
";

const HISTORY_LONG: &str = "RT/4.4.3 200 Ok

# 2/2 (id/101/total)

id: 100
Ticket: 42
Type: Create
Content: Paper keeps jamming.
         Tried reloading the tray.

--

id: 101
Ticket: 42
Type: Correspond
Content: Technician is on the way.
";

#[test]
fn ticket_show_keeps_field_order_and_folded_values() {
    let records = legacy::parse(TICKET_SHOW);
    assert_eq!(records.len(), 1);

    let ticket = &records[0];
    let keys: Vec<&str> = ticket.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["id", "Queue", "Owner", "Subject", "Status", "Requestors", "CF.{Severity}"]
    );
    assert_eq!(ticket["Requestors"], "alice@example.com,\nbob@example.com");
    assert_eq!(ticket["CF.{Severity}"], "high");
    assert_eq!(legacy::parse_status_code(TICKET_SHOW), Some(200));
}

#[test]
fn long_history_splits_into_transactions() {
    let records = legacy::parse(HISTORY_LONG);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["Type"], "Create");
    assert_eq!(
        records[0]["Content"],
        "Paper keeps jamming.\nTried reloading the tray."
    );
    assert_eq!(records[1]["id"], "101");
    assert!(records.iter().all(|r| !r.contains_key("# 2/2 (id/101/total)")));
}

#[test]
fn successful_write_reports_comment_messages() {
    let response = LegacyResponse::from_body(200, "RT/4.4.3 200 Ok\n\n# Ticket 43 created.\n".to_string());
    let response = assert_ok!(response.into_result());
    assert_eq!(response.messages(), vec!["Ticket 43 created."]);
}

#[test]
fn failed_write_maps_status_line_to_errors() {
    let denied = LegacyResponse::from_body(200, "RT/4.4.3 401 Credentials required\n".to_string());
    assert!(matches!(assert_err!(denied.into_result()), RtError::Authentication));

    let missing = LegacyResponse::from_body(200, "RT/4.4.3 404 Not Found\n\n# Ticket 9999 does not exist.\n".to_string());
    assert!(matches!(assert_err!(missing.into_result()), RtError::NotFound { .. }));

    let invalid = LegacyResponse::from_body(200, "RT/4.4.3 409 Syntax Error\n\n# Queue: no value\n".to_string());
    match assert_err!(invalid.into_result()) {
        RtError::RtApi { code, message } => {
            assert_eq!(code, 409);
            assert_eq!(message, "Syntax Error");
        }
        other => panic!("expected RtApi, got {:?}", other),
    }
}

#[test]
fn encoded_content_parses_back() {
    let mut fields = indexmap::IndexMap::new();
    fields.insert("id".to_string(), "ticket/new".to_string());
    fields.insert("Queue".to_string(), "General".to_string());
    fields.insert("Text".to_string(), "line one\nline two".to_string());

    let records = legacy::parse(&legacy::encode_content(&fields));
    assert_eq!(records, vec![fields]);
}
