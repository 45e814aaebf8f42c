//! Turn merging and conversation assembly.
//!
//! Records are sorted by `(client_id, sent_at)` and folded into one
//! sender-tagged conversation per client, preserving chronological order.
//! Messages whose text is blank or a single character carry no signal and
//! are dropped before merging.

use std::collections::BTreeSet;

use faro_core::{Conversation, Record, month_key};

/// Merge raw records into one conversation per client.
///
/// The result is sorted by `client_id`. A client's project and start
/// timestamp come from its earliest record carrying them.
#[must_use]
pub fn merge_conversations(records: &[Record]) -> Vec<Conversation> {
    let mut usable: Vec<&Record> = records.iter().filter(|r| has_signal(r)).collect();
    usable.sort_by(|a, b| {
        a.client_id
            .cmp(&b.client_id)
            .then_with(|| a.sent_at.cmp(&b.sent_at))
    });

    let mut conversations: Vec<Conversation> = Vec::new();
    for record in usable {
        match conversations.last_mut() {
            Some(current) if current.client_id == record.client_id => {
                current.text.push('\n');
                current.text.push_str(&turn_line(record));
                if current.project.is_none() {
                    current.project = named_project(record);
                }
            }
            _ => conversations.push(Conversation {
                client_id: record.client_id.clone(),
                project: named_project(record),
                started_at: record.sent_at,
                text: turn_line(record),
            }),
        }
    }
    conversations
}

/// Keep only records from the `keep` most recent calendar months present in
/// the data, relative to the newest record.
#[must_use]
pub fn filter_recent_months(records: Vec<Record>, keep: u32) -> Vec<Record> {
    let months: BTreeSet<String> = records.iter().map(|r| month_key(r.sent_at)).collect();
    let recent: BTreeSet<String> = months.into_iter().rev().take(keep as usize).collect();
    records
        .into_iter()
        .filter(|r| recent.contains(&month_key(r.sent_at)))
        .collect()
}

fn has_signal(record: &Record) -> bool {
    record.text.trim().chars().count() > 1
}

fn turn_line(record: &Record) -> String {
    format!("{}: {}", record.sender.to_uppercase(), record.text.trim())
}

/// Placeholder values some upstream systems store instead of a real
/// project name.
const PROJECT_SENTINELS: &[&str] = &["sin proyecto", "none", "null", "nan"];

fn named_project(record: &Record) -> Option<String> {
    record.project.clone().filter(|name| {
        let trimmed = name.trim();
        !trimmed.is_empty() && !PROJECT_SENTINELS.contains(&trimmed.to_lowercase().as_str())
    })
}
