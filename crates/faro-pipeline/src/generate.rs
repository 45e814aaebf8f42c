//! The validated generation sub-cycle for one sub-pipeline instance.
//!
//! One instance covers one (data source, scope) pair and owns its attempt
//! counter. Every path terminates: the loop ends with a validated document
//! or a terminal error within `max_retries + 1` model invocations.

use serde_json::Value;
use tracing::{debug, warn};

use faro_core::{InsightScope, PipelineError, ReportKind};
use faro_model::gateway::{ModelGateway, ModelRequest};
use faro_model::validator::ValidationResult;
use faro_model::{parse_document, prompts, validate};

use crate::stage::{AttemptDisposition, Stage, route_after_validation};

/// Terminal result of one generation instance.
#[derive(Debug)]
pub struct GenerationReport {
    pub scope: InsightScope,
    /// Model invocations spent, successful or not.
    pub attempts: u32,
    pub outcome: Result<Value, PipelineError>,
}

enum Evaluation {
    Accepted(Value),
    Retryable(PipelineError, ValidationResult),
    Terminal(PipelineError),
}

/// Drive the model until the document for `scope` validates or the retry
/// budget is spent.
pub async fn run_generation<G: ModelGateway>(
    gateway: &G,
    model_id: &str,
    scope: InsightScope,
    kind: ReportKind,
    structured_input: &str,
    max_retries: u32,
) -> GenerationReport {
    let mut attempts = 0u32;
    let mut deficiencies: Option<ValidationResult> = None;

    loop {
        attempts += 1;
        let prompt =
            prompts::build_generation_prompt(&scope, kind, structured_input, deficiencies.as_ref());
        let evaluation =
            evaluate_attempt(gateway, model_id, &scope, kind, ModelRequest::generation(prompt))
                .await;

        match evaluation {
            Evaluation::Accepted(document) => {
                debug!(scope = %scope.stage_label(), attempts, "document accepted");
                return GenerationReport {
                    scope,
                    attempts,
                    outcome: Ok(document),
                };
            }
            Evaluation::Terminal(error) => {
                return GenerationReport {
                    scope,
                    attempts,
                    outcome: Err(error),
                };
            }
            Evaluation::Retryable(error, report) => {
                match route_after_validation(AttemptDisposition::Retryable, attempts, max_retries)
                {
                    Stage::Retry => {
                        warn!(scope = %scope.stage_label(), attempts, %error, "attempt rejected, retrying");
                        // An empty report means no answer was validated
                        // (transient gateway or parse failure); the retry
                        // form would have nothing to itemize, so keep the
                        // last meaningful deficiency list, if any.
                        if !report.is_valid() {
                            deficiencies = Some(report);
                        }
                    }
                    _ => {
                        return GenerationReport {
                            scope,
                            attempts,
                            outcome: Err(PipelineError::RetriesExhausted {
                                attempts,
                                reason: error.to_string(),
                            }),
                        };
                    }
                }
            }
        }
    }
}

async fn evaluate_attempt<G: ModelGateway>(
    gateway: &G,
    model_id: &str,
    scope: &InsightScope,
    kind: ReportKind,
    request: ModelRequest,
) -> Evaluation {
    let raw = match gateway.invoke(&request, model_id).await {
        Ok(raw) => raw,
        Err(error) if error.is_transient() => {
            return Evaluation::Retryable(
                PipelineError::GatewayTransient(error.to_string()),
                ValidationResult::default(),
            );
        }
        Err(error) => return Evaluation::Terminal(PipelineError::GatewayFatal(error.to_string())),
    };

    let document = match parse_document(&raw) {
        Ok(document) => document,
        Err(failure) if failure.unrecoverable => {
            return Evaluation::Terminal(PipelineError::Parse(failure.diagnostic));
        }
        Err(failure) => {
            return Evaluation::Retryable(
                PipelineError::Parse(failure.diagnostic),
                ValidationResult::default(),
            );
        }
    };

    let report = validate(&document, &scope.required_fields(kind));
    if report.is_valid() {
        Evaluation::Accepted(document)
    } else {
        Evaluation::Retryable(
            PipelineError::Validation {
                missing: report.missing.clone(),
                malformed: report.malformed.clone(),
            },
            report,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faro_model::error::GatewayError;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Mutex;

    struct ScriptedGateway {
        replies: Mutex<Vec<Result<String, GatewayError>>>,
        calls: Mutex<u32>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGateway {
        fn new(replies: Vec<Result<String, GatewayError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                calls: Mutex::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    impl ModelGateway for ScriptedGateway {
        async fn invoke(
            &self,
            request: &ModelRequest,
            _model_id: &str,
        ) -> Result<String, GatewayError> {
            *self.calls.lock().unwrap() += 1;
            self.prompts.lock().unwrap().push(request.prompt.clone());
            self.replies.lock().unwrap().remove(0)
        }
    }

    fn complete_global_doc() -> Value {
        let mut doc = serde_json::Map::new();
        for spec in InsightScope::Global.required_fields(ReportKind::Standard) {
            doc.insert(spec.path, json!("filled"));
        }
        Value::Object(doc)
    }

    #[tokio::test]
    async fn missing_key_then_complete_takes_two_invocations() {
        let mut incomplete = complete_global_doc();
        incomplete
            .as_object_mut()
            .unwrap()
            .remove("funnel_analysis");
        let gateway = ScriptedGateway::new(vec![
            Ok(incomplete.to_string()),
            Ok(complete_global_doc().to_string()),
        ]);

        let report =
            run_generation(&gateway, "main-model", InsightScope::Global, ReportKind::Standard, "{}", 3).await;

        assert_eq!(gateway.calls(), 2);
        assert_eq!(report.attempts, 2);
        assert!(report.outcome.is_ok());
        // The second prompt must itemize the deficiency.
        let prompts = gateway.prompts.lock().unwrap();
        assert!(prompts[1].contains("- funnel_analysis\n"));
        assert!(!prompts[0].contains("MISSING"));
    }

    #[tokio::test]
    async fn garbage_on_every_attempt_exhausts_the_budget() {
        let max_retries = 3;
        let gateway = ScriptedGateway::new(vec![
            Ok("no json here".into()),
            Ok("still nothing".into()),
            Ok("nope".into()),
            Ok("and again".into()),
        ]);

        let report =
            run_generation(&gateway, "main-model", InsightScope::Global, ReportKind::Standard, "{}", max_retries).await;

        assert_eq!(gateway.calls(), max_retries + 1);
        assert_eq!(report.attempts, max_retries + 1);
        match report.outcome {
            Err(PipelineError::RetriesExhausted { attempts, .. }) => {
                assert_eq!(attempts, max_retries + 1);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fatal_gateway_error_short_circuits() {
        let gateway = ScriptedGateway::new(vec![Err(GatewayError::Fatal("401".into()))]);

        let report =
            run_generation(&gateway, "main-model", InsightScope::Global, ReportKind::Standard, "{}", 3).await;

        assert_eq!(gateway.calls(), 1);
        assert!(matches!(
            report.outcome,
            Err(PipelineError::GatewayFatal(_))
        ));
    }

    #[tokio::test]
    async fn transient_errors_share_the_attempt_budget() {
        let gateway = ScriptedGateway::new(vec![
            Err(GatewayError::Transient("timeout".into())),
            Ok(complete_global_doc().to_string()),
        ]);

        let report =
            run_generation(&gateway, "main-model", InsightScope::Global, ReportKind::Standard, "{}", 3).await;

        assert_eq!(report.attempts, 2);
        assert!(report.outcome.is_ok());
    }

    #[tokio::test]
    async fn empty_response_is_terminal_without_retry() {
        let gateway = ScriptedGateway::new(vec![Ok(String::new())]);

        let report =
            run_generation(&gateway, "main-model", InsightScope::Global, ReportKind::Standard, "{}", 3).await;

        assert_eq!(gateway.calls(), 1);
        assert!(matches!(report.outcome, Err(PipelineError::Parse(_))));
    }

    #[tokio::test]
    async fn wrong_project_name_is_rejected_and_retried() {
        let mut wrong_name = complete_global_doc();
        wrong_name["general_summary"] = json!({"project_name": "otro proyecto"});
        let mut right_name = complete_global_doc();
        right_name["general_summary"] = json!({"project_name": "valle verde"});
        let gateway = ScriptedGateway::new(vec![
            Ok(wrong_name.to_string()),
            Ok(right_name.to_string()),
        ]);

        let report = run_generation(
            &gateway,
            "main-model",
            InsightScope::Project("valle verde".into()),
            ReportKind::Standard,
            "{}",
            3,
        )
        .await;

        assert_eq!(gateway.calls(), 2);
        assert!(report.outcome.is_ok());
        // The mismatch must surface as a named deficiency in the retry.
        let prompts = gateway.prompts.lock().unwrap();
        assert!(prompts[1].contains("- general_summary.project_name\n"));
    }

    #[tokio::test]
    async fn transient_failure_keeps_the_plain_prompt() {
        let gateway = ScriptedGateway::new(vec![
            Err(GatewayError::Transient("timeout".into())),
            Ok(complete_global_doc().to_string()),
        ]);

        let report =
            run_generation(&gateway, "main-model", InsightScope::Global, ReportKind::Standard, "{}", 3).await;

        assert!(report.outcome.is_ok());
        // No answer existed yet, so the second attempt repeats the first
        // prompt instead of claiming a previous answer was invalid.
        let prompts = gateway.prompts.lock().unwrap();
        assert_eq!(prompts[0], prompts[1]);
    }

    #[tokio::test]
    async fn project_scope_requires_the_nested_name() {
        let mut doc = complete_global_doc();
        doc["general_summary"] = json!({"project_name": "valle verde", "headline": "ok"});
        let gateway = ScriptedGateway::new(vec![Ok(doc.to_string())]);

        let report = run_generation(
            &gateway,
            "main-model",
            InsightScope::Project("valle verde".into()),
            ReportKind::Standard,
            "{}",
            3,
        )
        .await;

        assert!(report.outcome.is_ok());
    }
}
