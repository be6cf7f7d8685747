//! SQL Prompt Builder: turns a query plus its context into a generation
//! instruction and returns the generator's SQL text.

use tracing::debug;

use crate::llm_client::prompts::SQL_ONLY_SYSTEM;
use crate::llm_client::{strip_code_fences, GenerationRequest, LlmError, TextGenerator};
use crate::query::classifier::SearchContext;
use crate::query::prompts::{
    BOTH_DIRECTIVE, COMPANY_DIRECTIVE, EVENT_DIRECTIVE, SQL_PROMPT_TEMPLATE, UNKNOWN_DIRECTIVE,
};
use crate::query::schema::{COMPANY_TABLE, EVENT_TABLE, SCHEMA};
use crate::query::GenerationSettings;

fn context_directive(context: SearchContext) -> &'static str {
    match context {
        SearchContext::Event => EVENT_DIRECTIVE,
        SearchContext::Company => COMPANY_DIRECTIVE,
        SearchContext::Both => BOTH_DIRECTIVE,
        SearchContext::Unknown => UNKNOWN_DIRECTIVE,
    }
}

/// Builds the full SQL generation instruction.
pub fn build_sql_prompt(query: &str, context: SearchContext) -> String {
    // The LIKE example names a table the context is allowed to search.
    let example_table = match (context.searches_events(), context.searches_companies()) {
        (true, false) => EVENT_TABLE,
        _ => COMPANY_TABLE,
    };

    SQL_PROMPT_TEMPLATE
        .replace("{tables}", &SCHEMA.describe_tables())
        .replace("{joins}", &SCHEMA.describe_joins())
        .replace("{columns}", &SCHEMA.describe_columns())
        .replace("{example_table}", example_table)
        .replace("{context}", context.as_str())
        .replace("{context_directive}", context_directive(context))
        .replace("{query}", query)
}

/// Asks the generator for SQL answering `query` under `context`.
pub async fn generate_sql(
    generator: &dyn TextGenerator,
    settings: &GenerationSettings,
    query: &str,
    context: SearchContext,
) -> Result<String, LlmError> {
    let prompt = build_sql_prompt(query, context);

    let raw = generator
        .generate(GenerationRequest {
            system: SQL_ONLY_SYSTEM,
            prompt: &prompt,
            model: &settings.model,
            temperature: settings.sql_temperature,
            max_tokens: settings.max_tokens,
        })
        .await?;

    let sql = strip_code_fences(&raw).to_string();
    if sql.is_empty() {
        return Err(LlmError::EmptyContent);
    }

    debug!(context = context.as_str(), "Generated SQL: {sql}");
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LLM_MODEL;
    use crate::query::test_support::ScriptedGenerator;

    #[test]
    fn test_prompt_contains_query_and_context() {
        let prompt = build_sql_prompt("oil companies", SearchContext::Company);
        assert!(prompt.contains("Natural language query: oil companies"));
        assert!(prompt.contains("determined to be: company"));
    }

    #[test]
    fn test_prompt_carries_schema_and_joins() {
        let prompt = build_sql_prompt("anything", SearchContext::Unknown);
        assert!(prompt.contains("people contains following columns:"));
        assert!(prompt.contains("'event_url' column"));
        assert!(prompt.contains("'homepage_base_url' column"));
        assert!(!prompt.contains('{'), "unsubstituted placeholder in prompt");
    }

    #[test]
    fn test_employee_count_guidance_uses_range_columns() {
        let prompt = build_sql_prompt("companies with more than 1000 employees", SearchContext::Company);
        assert!(prompt.contains("WHERE employee_range_upper > 1000"));
        assert!(prompt.contains("employee_range_lower >= 50"));
        assert!(prompt.contains("'revenue_millions' column"));
    }

    #[test]
    fn test_event_context_forbids_company_terms() {
        let prompt = build_sql_prompt("finance events", SearchContext::Event);
        assert!(prompt.contains(EVENT_DIRECTIVE));
        assert!(!prompt.contains(COMPANY_DIRECTIVE));
        assert!(prompt.contains("LOWER(event_info.similar_terms)"));
    }

    #[test]
    fn test_both_context_intersects() {
        let prompt = build_sql_prompt("oil companies and cybersec events", SearchContext::Both);
        assert!(prompt.contains("INTERSECT"));
        assert!(!prompt.contains("Use UNION"));
    }

    #[test]
    fn test_unknown_context_unions() {
        let prompt = build_sql_prompt("tech startups", SearchContext::Unknown);
        assert!(prompt.contains("Use UNION"));
        assert!(!prompt.contains("INTERSECT"));
    }

    #[tokio::test]
    async fn test_generate_sql_uses_low_temperature_and_strips_fences() {
        let generator = ScriptedGenerator::new(vec![Ok(
            "```sql\nSELECT company_name FROM companies;\n```".to_string()
        )]);
        let settings = GenerationSettings::default();

        let sql = generate_sql(&generator, &settings, "oil companies", SearchContext::Company)
            .await
            .unwrap();

        assert_eq!(sql, "SELECT company_name FROM companies;");
        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert!((calls[0].temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(calls[0].max_tokens, 300);
        assert_eq!(calls[0].model, DEFAULT_LLM_MODEL);
        assert_eq!(calls[0].system, SQL_ONLY_SYSTEM);
        assert!(calls[0].prompt.contains("oil companies"));
    }

    #[tokio::test]
    async fn test_generate_sql_propagates_generation_error() {
        let generator = ScriptedGenerator::new(vec![Err(LlmError::Api {
            status: 429,
            message: "rate limited".to_string(),
        })]);

        let err = generate_sql(
            &generator,
            &GenerationSettings::default(),
            "oil companies",
            SearchContext::Company,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, LlmError::Api { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_generate_sql_rejects_blank_output() {
        let generator = ScriptedGenerator::new(vec![Ok("```\n```".to_string())]);
        let err = generate_sql(
            &generator,
            &GenerationSettings::default(),
            "q",
            SearchContext::Unknown,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }
}
