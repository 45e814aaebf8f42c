//! Concurrent per-conversation summarization fan-out.
//!
//! Conversations are compressed through a bounded worker pool. A single
//! conversation's failure never aborts sibling work: it is logged, counted,
//! and excluded from the summary set. The surviving set is sorted by
//! `client_id`, so completion order does not leak into aggregation.

use futures::StreamExt;
use tracing::{info, warn};

use faro_core::{Conversation, PipelineError, Summary};
use faro_model::compress::compress_with_validation;
use faro_model::gateway::ModelGateway;

/// The summarize node's result: surviving summaries plus absorbed failures.
#[derive(Debug)]
pub struct SummarizeOutcome {
    pub summaries: Vec<Summary>,
    pub failures: Vec<PipelineError>,
}

/// Compress every conversation, at most `workers` concurrently.
pub async fn summarize_conversations<G: ModelGateway>(
    gateway: &G,
    model_id: &str,
    conversations: &[Conversation],
    workers: usize,
    max_retries: u32,
) -> SummarizeOutcome {
    let results: Vec<Result<Summary, PipelineError>> =
        futures::stream::iter(conversations.iter().map(|conversation| async move {
            match compress_with_validation(gateway, model_id, &conversation.text, max_retries)
                .await
            {
                Ok(fields) => Ok(Summary {
                    client_id: conversation.client_id.clone(),
                    project: conversation.project.clone(),
                    started_at: conversation.started_at,
                    fields,
                }),
                Err(error) => Err(PipelineError::Summarization {
                    client_id: conversation.client_id.clone(),
                    reason: error.to_string(),
                }),
            }
        }))
        .buffer_unordered(workers.max(1))
        .collect()
        .await;

    let mut summaries = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(summary) => summaries.push(summary),
            Err(error) => {
                warn!(%error, "conversation excluded from summary set");
                failures.push(error);
            }
        }
    }
    summaries.sort_by(|a, b| a.client_id.cmp(&b.client_id));

    info!(
        summarized = summaries.len(),
        failed = failures.len(),
        "summarization complete"
    );
    SummarizeOutcome {
        summaries,
        failures,
    }
}
