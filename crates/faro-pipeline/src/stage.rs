//! The stage set and routing table of the orchestration engine.
//!
//! Routing is an explicit function over (disposition, attempts, budget)
//! rather than a graph library, so the retry and terminal logic is auditable
//! and testable on its own. `attempts` counts model invocations already
//! made; the total per sub-pipeline instance never exceeds
//! `max_retries + 1`.

/// One node of the workflow for a single data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Preprocess,
    Summarize,
    BuildRequest,
    CallModel,
    ParseAndValidate,
    Retry,
    PersistSuccess,
    PersistFatal,
}

impl Stage {
    /// Stable name used in logs and fatal records.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Preprocess => "preprocess",
            Self::Summarize => "summarize",
            Self::BuildRequest => "build_request",
            Self::CallModel => "call_model",
            Self::ParseAndValidate => "parse_and_validate",
            Self::Retry => "retry",
            Self::PersistSuccess => "persist_success",
            Self::PersistFatal => "persist_fatal",
        }
    }
}

/// Classification of one model attempt after parsing and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptDisposition {
    /// Document parsed and every required field conformed.
    Accepted,
    /// Worth another attempt: transient gateway failure, recoverable parse
    /// failure, or a deficiency report.
    Retryable,
    /// Retrying cannot help: fatal gateway failure or unrecoverable parse.
    Terminal,
}

/// The routing rule evaluated after `ParseAndValidate`.
#[must_use]
pub const fn route_after_validation(
    disposition: AttemptDisposition,
    attempts: u32,
    max_retries: u32,
) -> Stage {
    match disposition {
        AttemptDisposition::Accepted => Stage::PersistSuccess,
        AttemptDisposition::Terminal => Stage::PersistFatal,
        AttemptDisposition::Retryable => {
            if attempts <= max_retries {
                Stage::Retry
            } else {
                Stage::PersistFatal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(AttemptDisposition::Accepted, 1, Stage::PersistSuccess)]
    #[case(AttemptDisposition::Accepted, 4, Stage::PersistSuccess)]
    #[case(AttemptDisposition::Terminal, 1, Stage::PersistFatal)]
    #[case(AttemptDisposition::Retryable, 1, Stage::Retry)]
    #[case(AttemptDisposition::Retryable, 3, Stage::Retry)]
    #[case(AttemptDisposition::Retryable, 4, Stage::PersistFatal)]
    fn routing_table(
        #[case] disposition: AttemptDisposition,
        #[case] attempts: u32,
        #[case] expected: Stage,
    ) {
        assert_eq!(route_after_validation(disposition, attempts, 3), expected);
    }

    #[test]
    fn any_outcome_sequence_terminates_within_budget() {
        // Worst case: every attempt is retryable.
        let max_retries = 3;
        let mut attempts = 0;
        loop {
            attempts += 1;
            match route_after_validation(AttemptDisposition::Retryable, attempts, max_retries) {
                Stage::Retry => {}
                Stage::PersistFatal => break,
                other => panic!("unexpected stage {other:?}"),
            }
            assert!(attempts <= max_retries + 1);
        }
        assert_eq!(attempts, max_retries + 1);
    }

    #[test]
    fn zero_budget_means_single_attempt() {
        assert_eq!(
            route_after_validation(AttemptDisposition::Retryable, 1, 0),
            Stage::PersistFatal
        );
    }
}
