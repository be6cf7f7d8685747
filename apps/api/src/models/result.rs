use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::query::classifier::SearchContext;
use crate::query::pipeline::{Answer, Outcome};

pub const NO_RESULT_SENTINEL: &str = "No result available";

/// What a caller gets back for one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPayload {
    Rows(Vec<Map<String, Value>>),
    Text(String),
    NoResult,
}

impl ResultPayload {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Skipped => ResultPayload::Text(String::new()),
            Outcome::Answered(Answer {
                summary: Some(summary),
                ..
            }) => ResultPayload::Text(summary.clone()),
            Outcome::Answered(answer) => ResultPayload::Rows(answer.rows.records()),
            Outcome::Failed => ResultPayload::NoResult,
        }
    }

    /// Rows as an array of objects, text as a string, otherwise the sentinel string.
    pub fn to_json(&self) -> Value {
        match self {
            ResultPayload::Rows(records) => json!(records),
            ResultPayload::Text(text) => Value::String(text.clone()),
            ResultPayload::NoResult => Value::String(NO_RESULT_SENTINEL.to_string()),
        }
    }
}

impl Serialize for ResultPayload {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredResult {
    pub request_id: Uuid,
    pub query: String,
    pub context: Option<SearchContext>,
    pub sql: Option<String>,
    pub payload: ResultPayload,
    pub created_at: DateTime<Utc>,
}

impl StoredResult {
    pub fn new(query: &str, outcome: &Outcome) -> Self {
        let answer = match outcome {
            Outcome::Answered(answer) => Some(answer),
            _ => None,
        };

        Self {
            request_id: Uuid::new_v4(),
            query: query.to_string(),
            context: answer.map(|a| a.context),
            sql: answer.map(|a| a.sql.clone()),
            payload: ResultPayload::from_outcome(outcome),
            created_at: Utc::now(),
        }
    }
}
