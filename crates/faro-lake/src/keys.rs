//! Deterministic output-key derivation.
//!
//! The same (source, scope) pair always maps to the same key, so reruns
//! overwrite their previous document instead of accumulating copies. Only
//! fatal records carry a timestamp in the key.

use chrono::{DateTime, Utc};

/// Replace runs of characters unsafe in object keys with a single `_`.
#[must_use]
pub fn sanitize_segment(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_underscore = false;

    for ch in input.to_lowercase().chars() {
        let keep = ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' || ch == '_';
        if keep {
            out.push(ch);
            prev_underscore = false;
        } else if !prev_underscore {
            out.push('_');
            prev_underscore = true;
        }
    }

    let sanitized = out.trim_matches('_');
    if sanitized.is_empty() {
        return "_".to_string();
    }

    let mut capped = sanitized.to_string();
    if capped.len() > 128 {
        capped.truncate(128);
    }
    capped
}

/// Key of the global insight document for one data source.
#[must_use]
pub fn insights_key(source: &str) -> String {
    format!("insights/{}/insights.json", sanitize_segment(source))
}

/// Key of the trend document for one calendar month (`YYYY-MM`).
#[must_use]
pub fn trends_key(source: &str, month: &str) -> String {
    format!("trends/{}/trends_{month}.json", sanitize_segment(source))
}

/// Key of the per-project insight document.
#[must_use]
pub fn project_insights_key(source: &str, project: &str) -> String {
    format!(
        "projects/{}/{}/insights.json",
        sanitize_segment(source),
        sanitize_segment(project)
    )
}

/// Key of a fatal-error record. Carries the scope label and a timestamp so
/// records from different sub-pipeline instances never overwrite each
/// other, even when written within the same millisecond.
#[must_use]
pub fn fatal_key(source: &str, scope: &str, at: DateTime<Utc>) -> String {
    format!(
        "errors/{}/fatal_{}_{}.json",
        sanitize_segment(source),
        sanitize_segment(scope),
        at.format("%Y%m%dT%H%M%S%3fZ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn sanitize_collapses_unsafe_runs() {
        assert_eq!(sanitize_segment("Valle Verde / Etapa 2"), "valle_verde_etapa_2");
        assert_eq!(sanitize_segment("ok-name_1.2"), "ok-name_1.2");
        assert_eq!(sanitize_segment("///"), "_");
    }

    #[test]
    fn document_keys_are_idempotent() {
        assert_eq!(insights_key("subsidio"), insights_key("subsidio"));
        assert_eq!(insights_key("subsidio"), "insights/subsidio/insights.json");
        assert_eq!(
            trends_key("subsidio", "2025-03"),
            "trends/subsidio/trends_2025-03.json"
        );
        assert_eq!(
            project_insights_key("subsidio", "Valle Verde"),
            "projects/subsidio/valle_verde/insights.json"
        );
    }

    #[test]
    fn fatal_key_carries_scope_and_compact_timestamp() {
        let at = Utc.with_ymd_and_hms(2025, 3, 9, 12, 30, 45).unwrap();
        assert_eq!(
            fatal_key("subsidio", "global", at),
            "errors/subsidio/fatal_global_20250309T123045000Z.json"
        );
        assert_eq!(
            fatal_key("subsidio", "monthly:2025-03", at),
            "errors/subsidio/fatal_monthly_2025-03_20250309T123045000Z.json"
        );
    }

    #[test]
    fn same_instant_different_scopes_never_collide() {
        let at = Utc.with_ymd_and_hms(2025, 3, 9, 12, 30, 45).unwrap();
        assert_ne!(
            fatal_key("subsidio", "monthly:2025-01", at),
            fatal_key("subsidio", "monthly:2025-02", at)
        );
    }
}
