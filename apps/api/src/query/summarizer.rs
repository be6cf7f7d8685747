//! Result Summarizer: second generation call, turning rows into prose.
//! Empty results are sent as-is; the model phrases the "nothing found" answer.

use crate::llm_client::prompts::PLAIN_LANGUAGE_SYSTEM;
use crate::llm_client::{GenerationRequest, LlmError, TextGenerator};
use crate::query::prompts::SUMMARY_PROMPT_TEMPLATE;
use crate::query::tabular::TabularResult;
use crate::query::GenerationSettings;

pub fn build_summary_prompt(query: &str, result: &TabularResult) -> String {
    SUMMARY_PROMPT_TEMPLATE
        .replace("{result}", &result.to_text_table())
        .replace("{query}", query)
}

pub async fn summarize(
    generator: &dyn TextGenerator,
    settings: &GenerationSettings,
    query: &str,
    result: &TabularResult,
) -> Result<String, LlmError> {
    let prompt = build_summary_prompt(query, result);

    let summary = generator
        .generate(GenerationRequest {
            system: PLAIN_LANGUAGE_SYSTEM,
            prompt: &prompt,
            model: &settings.model,
            temperature: settings.summary_temperature,
            max_tokens: settings.max_tokens,
        })
        .await?;

    Ok(summary.trim().to_string())
}
