//! Parser for REST 1.0 responses.
//!
//! REST 1.0 answers with an RFC 5322-like text body: a status line such as
//! `RT/4.4.3 200 Ok`, then one or more sections separated by lines starting
//! with `--`. Each section holds `Key: Value` fields, `# ` comments, and
//! continuation lines that begin with whitespace.
//!
//! ```text
//! RT/4.4.3 200 Ok
//!
//! id: ticket/1
//! Subject: Printer on fire
//! Text: first line
//!       second line
//! --
//! id: ticket/2
//! Subject: Coffee machine
//! ```
//!
//! [`parse`] turns such a body into one ordered [`Record`] per section and
//! [`parse_status_code`] extracts the numeric status from the first line.
//! Both are pure functions and never fail on malformed input.
//!
//! Two inputs have no meaningful interpretation and are dropped rather than
//! rejected:
//!
//! - a whitespace-led continuation line before any other line of its section;
//! - a colon-less line in a section that has not yet seen a `Key: Value` line.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RtError;

/// One decoded section: field names to values, in source order.
pub type Record = IndexMap<String, String>;

/// Status line, e.g. `RT/4.4.3 200 Ok`.
static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9._-]*/\S+\s+\d+(?:\s.*)?$").expect("valid header pattern")
});

/// Comment line, e.g. `# Ticket 12 created.`
static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^#\s+.+").expect("valid comment pattern"));

/// Parses a raw REST 1.0 body into one record per section.
///
/// With no `--` delimiter the whole body is a single section, so the result
/// always holds at least one record. Text before the first delimiter only
/// counts as a section when it holds something besides blank, status and
/// comment lines.
pub fn parse(body: &str) -> Vec<Record> {
    split_sections(body)
        .iter()
        .map(|section| decode(&logical_lines(section)))
        .collect()
}

/// Extracts the status code from the first line of `body`.
///
/// Returns `None` when the body is empty or the second space-separated token
/// of the first line is not a number in `0..=65535`. RT status codes are
/// three-digit HTTP-style codes, so a negative or larger token is treated as
/// unreadable rather than as a status.
pub fn parse_status_code(body: &str) -> Option<u16> {
    let first = body.lines().next()?;
    first.split(' ').nth(1)?.parse().ok()
}

/// Returns the reason text that follows the status code on the first line.
pub fn status_reason(body: &str) -> Option<&str> {
    let first = body.lines().next()?;
    first
        .splitn(3, ' ')
        .nth(2)
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
}

/// Serializes fields into the REST 1.0 request form.
///
/// Each field becomes a `Key: Value` line; embedded newlines are indented so
/// the server reads them as continuation lines.
pub fn encode_content(fields: &IndexMap<String, String>) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}: {}\n", key, value.replace('\n', "\n  ")))
        .collect()
}

fn split_sections(body: &str) -> Vec<Vec<&str>> {
    let mut sections = Vec::new();
    let mut current = Vec::new();

    for line in body.lines() {
        if line.starts_with("--") {
            sections.push(std::mem::take(&mut current));
        } else {
            current.push(line);
        }
    }
    let delimited = !sections.is_empty();
    sections.push(current);

    if delimited && !sections[0].iter().any(|line| is_content(line)) {
        sections.remove(0);
    }
    sections
}

fn is_content(line: &str) -> bool {
    !line.trim().is_empty() && !HEADER.is_match(line) && !COMMENT.is_match(line)
}

/// Folds continuation lines into the line they continue.
///
/// Only empty lines are skipped. A line of nothing but whitespace is an
/// indented empty line of a folded value and keeps its line break.
fn logical_lines(section: &[&str]) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for line in section {
        if line.is_empty() || HEADER.is_match(line) {
            continue;
        }
        if line.starts_with(char::is_whitespace) {
            match lines.last_mut() {
                Some(last) => {
                    last.push('\n');
                    last.push_str(line.trim_start());
                }
                None => tracing::trace!(line = %line, "dropping continuation with nothing to continue"),
            }
        } else {
            lines.push((*line).to_string());
        }
    }

    lines
}

fn decode(lines: &[String]) -> Record {
    let mut record = Record::new();
    let mut key: Option<String> = None;

    for line in lines {
        if COMMENT.is_match(line) {
            continue;
        }
        match line.split_once(':') {
            Some((name, value)) => {
                let name = name.trim().to_string();
                record.insert(name.clone(), value.trim_matches(' ').to_string());
                key = Some(name);
            }
            None => match key.as_ref().and_then(|k| record.get_mut(k)) {
                Some(value) => value.push_str(line.trim_matches(' ')),
                None => tracing::trace!(line = %line, "dropping value line before any field"),
            },
        }
    }

    record
}

/// A decoded REST 1.0 response.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyResponse {
    /// HTTP status of the response.
    pub http_status: u16,

    /// Status from the RT status line, if it could be read.
    pub rt_status: Option<u16>,

    /// One record per section.
    pub records: Vec<Record>,

    /// The raw body.
    pub text: String,
}

impl LegacyResponse {
    /// Decodes a raw body received with `http_status`.
    pub fn from_body(http_status: u16, text: String) -> Self {
        Self {
            http_status,
            rt_status: parse_status_code(&text),
            records: parse(&text),
            text,
        }
    }

    /// Returns the text of every `# ` comment line, e.g. `Ticket 12 created.`
    pub fn messages(&self) -> Vec<&str> {
        self.text
            .lines()
            .filter(|line| COMMENT.is_match(line))
            .map(|line| line.trim_start_matches('#').trim())
            .collect()
    }

    /// Fails when the RT status line reports an error.
    ///
    /// A missing status line is not treated as a failure.
    pub fn into_result(self) -> Result<Self, RtError> {
        match self.rt_status {
            Some(401) => Err(RtError::Authentication),
            Some(404) => Err(RtError::not_found(
                self.messages().first().copied().unwrap_or("record"),
            )),
            Some(code) if code >= 400 => {
                let reason = status_reason(&self.text).unwrap_or("unknown error");
                Err(RtError::rt_api(code, reason))
            }
            _ => Ok(self),
        }
    }
}
