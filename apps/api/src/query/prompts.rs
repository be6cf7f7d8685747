// Prompt templates for the SQL generation and summarization calls.
// Placeholders are substituted with `str::replace`.

pub const SQL_PROMPT_TEMPLATE: &str = r#"You are given an SQL database with the following schema:
{tables}

Given the following natural language query, generate ONLY an appropriate SQLite-compatible SQL query without any additional explanation. Do not print anything other than the query itself.

{joins}

{columns}

IMPORTANT COLUMN RULES:
1. When searching for companies based on employee count, use the employee_range_lower and employee_range_upper columns. For example:
   - To find companies with more than 1000 employees, use: WHERE employee_range_upper > 1000
   - To find companies with 50-200 employees, use: WHERE employee_range_lower >= 50 AND employee_range_upper <= 200
2. The 'company_revenue' column is free text. Revenue is standardized in millions in the 'revenue_millions' column.
3. When searching for companies based on revenue, use the 'revenue_millions' column.

IMPORTANT: When searching for relevant information, prioritize the 'similar_terms' column in the event_info and companies tables:
1. Ignore any delimiters in the 'similar_terms' column. Treat the entire column as a single text field.
2. Use case-insensitive partial matching for each relevant keyword from the query.
3. Search for keywords anywhere within the 'similar_terms' column, not just at the beginning or end of terms.
4. Include variations and related terms of the keywords in your search.
5. Use the LIKE operator with wildcards and combine keyword variants with OR. For example:
   WHERE LOWER({example_table}.similar_terms) LIKE '%keyword1%'
     OR LOWER({example_table}.similar_terms) LIKE '%keyword2%'
     OR LOWER({example_table}.similar_terms) LIKE '%related_term%'
6. Only use direct column comparisons if there's no relevant match in the 'similar_terms' column.

CONTEXT INSTRUCTIONS:
The context of the query has been analyzed and determined to be: {context}
{context_directive}

Natural language query: {query}

SQL query:"#;

pub const EVENT_DIRECTIVE: &str = "- Search only in the similar_terms column of the event_info table.\n\
    - DO NOT search the similar_terms column of the companies table.";

pub const COMPANY_DIRECTIVE: &str = "- Search only in the similar_terms column of the companies table.\n\
    - DO NOT search the similar_terms column of the event_info table.";

pub const BOTH_DIRECTIVE: &str = "- Search the similar_terms columns of both the event_info and companies tables.\n\
    - Use INTERSECT to keep only results matched in both similar_terms columns.";

pub const UNKNOWN_DIRECTIVE: &str = "- Search the similar_terms columns of both the event_info and companies tables.\n\
    - Use UNION to combine results matched in either similar_terms column.";

pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Summarize the following SQL query result for an end user. Provide a clear, concise explanation of the data without technical jargon. Focus on the key insights and important information revealed by the query.

User question: {query}

Query Result:
{result}

Your summary should:
1. Highlight the main findings or insights from the data
2. Be easy for a non-technical user to understand
3. Be concise but include all relevant information

Summary:"#;
