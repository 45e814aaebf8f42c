//! Raw interaction records and merged conversations.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// One raw interaction unit as stored in the silver layer. Immutable once
/// loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    /// Entity (client) the message belongs to.
    pub client_id: String,
    /// Project attribution, when the source carries one.
    #[serde(default)]
    pub project: Option<String>,
    /// Who wrote the message (e.g. `client`, `bot`).
    pub sender: String,
    pub sent_at: DateTime<Utc>,
    pub text: String,
}

/// The merged chronological conversation of one client.
///
/// Invariants: belongs to exactly one client and at most one project; the
/// full text preserves the original message order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    pub client_id: String,
    pub project: Option<String>,
    /// Timestamp of the earliest message.
    pub started_at: DateTime<Utc>,
    /// Sender-tagged full text, one `SENDER: message` line per message.
    pub text: String,
}

/// Calendar-month key (`YYYY-MM`) used for monthly windowing and output keys.
#[must_use]
pub fn month_key(ts: DateTime<Utc>) -> String {
    format!("{:04}-{:02}", ts.year(), ts.month())
}
