// Shared prompt constants.
// Each pipeline stage that calls the generator keeps its own templates in
// query/prompts.rs. This file holds cross-cutting fragments.

/// System instruction for the SQL generation call.
pub const SQL_ONLY_SYSTEM: &str = "You are an AI assistant that generates SQL queries \
    based on natural language inputs. Strictly follow the context instructions to determine \
    which tables and columns to search. \
    Respond with the SQL query only. \
    Do NOT use markdown code fences. \
    Do NOT include explanations.";

/// System instruction for the summarization call.
pub const PLAIN_LANGUAGE_SYSTEM: &str = "You are an AI assistant that summarizes SQL query \
    results in a clear, non-technical manner for end users.";
