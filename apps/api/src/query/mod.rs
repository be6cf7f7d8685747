// Natural-language query pipeline.
// Implements: tagging, context classification, SQL prompt building, SQL
// validation, execution, summarization, and the orchestration around them.
// All generation calls go through the `TextGenerator` trait in llm_client.

pub mod classifier;
pub mod executor;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod schema;
pub mod sql_builder;
pub mod summarizer;
pub mod tabular;
pub mod tagger;
pub mod validator;

#[cfg(test)]
pub mod test_support;

use crate::config::{Config, DEFAULT_LLM_MODEL};

/// Sampling knobs for the two generation calls.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: u32,
    /// Low: SQL should be as deterministic as possible.
    pub sql_temperature: f32,
    /// Higher: summaries favour fluency.
    pub summary_temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_LLM_MODEL.to_string(),
            max_tokens: 300,
            sql_temperature: 0.1,
            summary_temperature: 0.3,
        }
    }
}

impl GenerationSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.llm_model.clone(),
            max_tokens: config.llm_max_tokens,
            sql_temperature: config.sql_temperature,
            summary_temperature: config.summary_temperature,
        }
    }
}
