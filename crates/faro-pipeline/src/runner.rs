//! Full workflow for one data source: load, preprocess, summarize, then the
//! global, monthly, and per-project generation instances.
//!
//! Nothing here raises out of a run. Every sub-pipeline instance ends with
//! either a persisted document or a persisted fatal record, and the run
//! report tallies both so the command surface can decide the exit code.

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use faro_aggregate::{AggregateMetrics, SPANISH_STOPWORDS, Window, compute_metrics, dominant_terms};
use faro_config::{ModelConfig, PipelineConfig};
use faro_core::{
    Conversation, FatalErrorRecord, InsightScope, PipelineError, ReportKind, Summary, month_key,
};
use faro_lake::{InsightSink, RecordSource, fatal_key, insights_key, project_insights_key, trends_key};
use faro_model::gateway::ModelGateway;

use crate::generate::run_generation;
use crate::preprocess::{filter_recent_months, merge_conversations};
use crate::stage::Stage;
use crate::summarize::summarize_conversations;

/// What one data source's run produced.
#[derive(Debug, Default)]
pub struct RunReport {
    pub source: String,
    pub records: usize,
    pub conversations: usize,
    pub summaries: usize,
    pub summarization_failures: usize,
    /// Persisted insight documents across global, monthly, and per-project
    /// instances.
    pub successes: u32,
    /// Persisted fatal records.
    pub fatals: u32,
}

impl RunReport {
    /// A source that produced nothing but fatal records.
    #[must_use]
    pub const fn is_all_fatal(&self) -> bool {
        self.successes == 0 && self.fatals > 0
    }
}

/// Shared collaborators for one run.
pub struct Runner<'a, S, G, K>
where
    S: RecordSource,
    G: ModelGateway,
    K: InsightSink,
{
    pub records: &'a S,
    pub gateway: &'a G,
    pub sink: &'a K,
    pub model: &'a ModelConfig,
    pub pipeline: &'a PipelineConfig,
}

impl<S, G, K> Runner<'_, S, G, K>
where
    S: RecordSource,
    G: ModelGateway,
    K: InsightSink,
{
    /// Run the complete workflow for one configured data source.
    pub async fn run_source(&self, source: &str, prefix: &str) -> RunReport {
        let mut report = RunReport {
            source: source.to_string(),
            ..RunReport::default()
        };

        let records = match self.load(prefix).await {
            Ok(records) => records,
            Err(error) => {
                self.persist_fatal(&mut report, "global", Stage::Load, &error, 0, json!({}))
                    .await;
                return report;
            }
        };
        report.records = records.len();

        let records = match self.pipeline.recent_months {
            Some(keep) => filter_recent_months(records, keep),
            None => records,
        };

        let conversations = merge_conversations(&records);
        report.conversations = conversations.len();
        if conversations.is_empty() {
            let error = PipelineError::Preprocess("no usable conversations in source".into());
            self.persist_fatal(&mut report, "global", Stage::Preprocess, &error, 0, json!({}))
                .await;
            return report;
        }
        info!(source, records = report.records, conversations = report.conversations, "preprocessed");

        let outcome = summarize_conversations(
            self.gateway,
            &self.model.compress_model,
            &conversations,
            self.pipeline.workers,
            self.pipeline.max_retries,
        )
        .await;
        report.summaries = outcome.summaries.len();
        report.summarization_failures = outcome.failures.len();
        if outcome.summaries.is_empty() {
            let error = PipelineError::Preprocess("every conversation failed to summarize".into());
            let context = json!({"failed": outcome.failures.len()});
            self.persist_fatal(&mut report, "global", Stage::Summarize, &error, 0, context)
                .await;
            return report;
        }
        let summaries = outcome.summaries;
        let kind = ReportKind::for_source(source);

        self.run_scope(
            &mut report,
            InsightScope::Global,
            kind,
            &Window::All,
            &summaries,
            &conversations,
            &insights_key(source),
        )
        .await;

        for month in distinct_months(&summaries) {
            self.run_scope(
                &mut report,
                InsightScope::Monthly(month.clone()),
                kind,
                &Window::Month(month.clone()),
                &summaries,
                &conversations,
                &trends_key(source, &month),
            )
            .await;
        }

        for project in distinct_projects(&summaries) {
            self.run_scope(
                &mut report,
                InsightScope::Project(project.clone()),
                kind,
                &Window::Project(project.clone()),
                &summaries,
                &conversations,
                &project_insights_key(source, &project),
            )
            .await;
        }

        info!(
            source,
            successes = report.successes,
            fatals = report.fatals,
            "source run complete"
        );
        report
    }

    async fn load(&self, prefix: &str) -> Result<Vec<faro_core::Record>, PipelineError> {
        let timeout = Duration::from_secs(self.pipeline.download_timeout_secs);
        match tokio::time::timeout(timeout, self.records.list_and_load(prefix)).await {
            Ok(Ok(records)) => Ok(records),
            Ok(Err(error)) => Err(PipelineError::Load(error.to_string())),
            Err(_) => Err(PipelineError::Load(format!(
                "download timed out after {}s",
                self.pipeline.download_timeout_secs
            ))),
        }
    }

    /// One sub-pipeline instance: windowed aggregation, generation with its
    /// own attempt counter, persistence of the result.
    async fn run_scope(
        &self,
        report: &mut RunReport,
        scope: InsightScope,
        kind: ReportKind,
        window: &Window,
        summaries: &[Summary],
        conversations: &[Conversation],
        output_key: &str,
    ) {
        let mut metrics = compute_metrics(summaries, window);
        if metrics.insufficient_data {
            warn!(source = %report.source, scope = %scope.stage_label(), "window has no data, skipping generation");
            return;
        }
        let texts = window_texts(conversations, window);
        metrics.dominant_terms = dominant_terms(&texts, SPANISH_STOPWORDS, self.pipeline.top_terms);

        let structured_input = match metrics_json(&metrics) {
            Ok(input) => input,
            Err(error) => {
                let scope_label = scope.stage_label();
                self.persist_fatal(report, &scope_label, Stage::BuildRequest, &error, 0, json!({}))
                    .await;
                return;
            }
        };

        let generation = run_generation(
            self.gateway,
            &self.model.main_model,
            scope,
            kind,
            &structured_input,
            self.pipeline.max_retries,
        )
        .await;

        match generation.outcome {
            Ok(document) => {
                self.persist_document(report, &generation.scope, output_key, &document)
                    .await;
            }
            Err(error) => {
                let context = json!({"output_key": output_key});
                self.persist_fatal(
                    report,
                    &generation.scope.stage_label(),
                    Stage::ParseAndValidate,
                    &error,
                    generation.attempts,
                    context,
                )
                .await;
            }
        }
    }

    async fn persist_document(
        &self,
        report: &mut RunReport,
        scope: &InsightScope,
        key: &str,
        document: &serde_json::Value,
    ) {
        let body = match serde_json::to_vec_pretty(document) {
            Ok(body) => body,
            Err(error) => {
                let error = PipelineError::Persistence {
                    key: key.to_string(),
                    reason: error.to_string(),
                };
                self.persist_fatal(report, &scope.stage_label(), Stage::PersistSuccess, &error, 0, json!({}))
                    .await;
                return;
            }
        };
        match self.sink.write(key, &body).await {
            Ok(()) => {
                report.successes += 1;
            }
            Err(error) => {
                let error = PipelineError::Persistence {
                    key: key.to_string(),
                    reason: error.to_string(),
                };
                self.persist_fatal(report, &scope.stage_label(), Stage::PersistSuccess, &error, 0, json!({}))
                    .await;
            }
        }
    }

    /// Write a fatal record to the error prefix. A failure here is logged
    /// and tallied; it must not abort the remaining instances.
    async fn persist_fatal(
        &self,
        report: &mut RunReport,
        scope_label: &str,
        stage: Stage,
        error: &PipelineError,
        attempts: u32,
        context: serde_json::Value,
    ) {
        warn!(source = %report.source, scope = scope_label, stage = stage.label(), %error, "sub-pipeline terminated fatally");
        report.fatals += 1;

        let record = FatalErrorRecord::new(
            &report.source,
            scope_label,
            stage.label(),
            error,
            attempts,
            context,
        );
        let key = fatal_key(&report.source, scope_label, Utc::now());
        match serde_json::to_vec_pretty(&record) {
            Ok(body) => {
                if let Err(write_error) = self.sink.write(&key, &body).await {
                    warn!(key, %write_error, "failed to persist fatal record");
                }
            }
            Err(encode_error) => warn!(key, %encode_error, "failed to encode fatal record"),
        }
    }
}

fn metrics_json(metrics: &AggregateMetrics) -> Result<String, PipelineError> {
    serde_json::to_string(metrics)
        .map_err(|error| PipelineError::Preprocess(format!("metrics serialization: {error}")))
}

fn distinct_months(summaries: &[Summary]) -> Vec<String> {
    let months: BTreeSet<String> = summaries.iter().map(|s| month_key(s.started_at)).collect();
    months.into_iter().collect()
}

fn distinct_projects(summaries: &[Summary]) -> Vec<String> {
    let projects: BTreeSet<String> = summaries
        .iter()
        .filter_map(|s| s.project.clone())
        .filter(|name| !name.trim().is_empty())
        .collect();
    projects.into_iter().collect()
}

fn window_texts<'c>(conversations: &'c [Conversation], window: &Window) -> Vec<&'c str> {
    conversations
        .iter()
        .filter(|conversation| match window {
            Window::All => true,
            Window::Month(month) => &month_key(conversation.started_at) == month,
            Window::Project(project) => {
                conversation.project.as_deref() == Some(project.as_str())
            }
        })
        .map(|conversation| conversation.text.as_str())
        .collect()
}
