//! Deterministic capability stubs shared by the query tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm_client::{GenerationRequest, LlmError, TextGenerator};
use crate::query::executor::{ExecutionError, QueryExecutor};
use crate::query::tabular::TabularResult;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Replays scripted responses in order and records every request.
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: request.system.to_string(),
            prompt: request.prompt.to_string(),
            model: request.model.to_string(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

/// What a `StubExecutor` answers with.
pub enum StubOutcome {
    Rows(TabularResult),
    Fail(String),
    Hang,
}

/// Returns a fixed outcome for any SQL and records what it was asked to run.
pub struct StubExecutor {
    outcome: StubOutcome,
    seen: Mutex<Vec<String>>,
}

impl StubExecutor {
    pub fn new(outcome: StubOutcome) -> Self {
        Self {
            outcome,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryExecutor for StubExecutor {
    async fn execute(&self, sql: &str) -> Result<TabularResult, ExecutionError> {
        self.seen.lock().unwrap().push(sql.to_string());
        match &self.outcome {
            StubOutcome::Rows(result) => Ok(result.clone()),
            StubOutcome::Fail(message) => Err(ExecutionError::Store(message.clone())),
            StubOutcome::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(TabularResult::default())
            }
        }
    }
}
