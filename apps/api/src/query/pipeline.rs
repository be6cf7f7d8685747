//! Query pipeline: orchestrates one question end to end.
//!
//! Flow: classify → generate_sql → validate_sql → execute → summarize.
//!
//! Stages run strictly in sequence; the whole run sits under one watchdog
//! timeout. `respond` is the fail-soft boundary: errors are logged there and
//! collapse to `Outcome::Failed`, nothing propagates past it.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::llm_client::{LlmError, TextGenerator};
use crate::query::classifier::{classify, SearchContext};
use crate::query::executor::{ExecutionError, QueryExecutor};
use crate::query::schema::SCHEMA;
use crate::query::sql_builder::generate_sql;
use crate::query::summarizer::summarize;
use crate::query::tabular::TabularResult;
use crate::query::validator::{validate_sql, SqlRejection};
use crate::query::GenerationSettings;

/// Input that ends a session instead of asking a question.
pub const QUIT_SENTINEL: &str = "quit";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("generated SQL rejected: {0}")]
    Rejected(#[from] SqlRejection),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("pipeline timed out after {0:?}")]
    Timeout(Duration),
}

/// What the caller wants back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnswerMode {
    /// Rows plus a narrative summary.
    #[default]
    Summary,
    /// Rows only; the summarization call is skipped.
    Rows,
}

#[derive(Debug, Clone)]
pub struct Answer {
    pub context: SearchContext,
    pub sql: String,
    pub rows: TabularResult,
    pub summary: Option<String>,
}

#[derive(Debug)]
pub enum Outcome {
    /// Blank input or the quit sentinel; no capability was called.
    Skipped,
    Answered(Answer),
    Failed,
}

pub struct QueryPipeline {
    generator: Arc<dyn TextGenerator>,
    executor: Arc<dyn QueryExecutor>,
    settings: GenerationSettings,
    timeout: Duration,
}

impl QueryPipeline {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        executor: Arc<dyn QueryExecutor>,
        settings: GenerationSettings,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            executor,
            settings,
            timeout,
        }
    }

    pub fn is_skippable(query: &str) -> bool {
        let query = query.trim();
        query.is_empty() || query.eq_ignore_ascii_case(QUIT_SENTINEL)
    }

    /// Returns the summary, `Some("")` for skipped input, `None` on any failure.
    pub async fn process(&self, query: &str) -> Option<String> {
        match self.respond(query, AnswerMode::Summary).await {
            Outcome::Skipped => Some(String::new()),
            Outcome::Answered(answer) => answer.summary,
            Outcome::Failed => None,
        }
    }

    pub async fn respond(&self, query: &str, mode: AnswerMode) -> Outcome {
        if Self::is_skippable(query) {
            return Outcome::Skipped;
        }

        match self.run(query, mode).await {
            Ok(answer) => Outcome::Answered(answer),
            Err(e) => {
                error!("Query processing failed: {e}");
                Outcome::Failed
            }
        }
    }

    /// Runs every stage under the watchdog timeout, propagating the first error.
    pub async fn run(&self, query: &str, mode: AnswerMode) -> Result<Answer, PipelineError> {
        tokio::time::timeout(self.timeout, self.run_stages(query, mode))
            .await
            .map_err(|_| PipelineError::Timeout(self.timeout))?
    }

    async fn run_stages(&self, query: &str, mode: AnswerMode) -> Result<Answer, PipelineError> {
        let context = classify(query);
        info!(context = context.as_str(), "Processing query: {query}");

        let sql = generate_sql(self.generator.as_ref(), &self.settings, query, context).await?;
        info!("Generated SQL query: {sql}");

        if let Err(rejection) = validate_sql(&sql, &SCHEMA) {
            warn!("Rejected generated SQL ({rejection}): {sql}");
            return Err(rejection.into());
        }

        let rows = self.executor.execute(&sql).await?;
        info!("Query returned {} rows", rows.len());

        let summary = match mode {
            AnswerMode::Summary => Some(
                summarize(self.generator.as_ref(), &self.settings, query, &rows).await?,
            ),
            AnswerMode::Rows => None,
        };

        Ok(Answer {
            context,
            sql,
            rows,
            summary,
        })
    }
}
