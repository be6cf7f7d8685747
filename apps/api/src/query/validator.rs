//! Allow-list check for generated SQL.
//!
//! Accepted: exactly one read-only query (SELECT, set operations, CTEs) whose
//! relations are schema tables or CTEs it defines, and whose `table.column`
//! references name real columns when qualified by a schema table name.
//! Unqualified or alias-qualified columns are left to the store.

use std::collections::HashSet;
use std::ops::ControlFlow;

use sqlparser::ast::{
    visit_expressions, visit_relations, Expr, ObjectName, Query, Statement, Visit, Visitor,
};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;
use thiserror::Error;

use crate::query::schema::SchemaDescriptor;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SqlRejection {
    #[error("generated SQL could not be parsed: {0}")]
    Parse(String),

    #[error("generated SQL contains no statement")]
    Empty,

    #[error("generated SQL contains {0} statements; exactly one is allowed")]
    MultipleStatements(usize),

    #[error("only read-only queries are allowed")]
    NotReadOnly,

    #[error("unknown table '{0}'")]
    UnknownTable(String),

    #[error("unknown column '{table}.{column}'")]
    UnknownColumn { table: String, column: String },
}

/// Collects every CTE name defined anywhere in a statement.
#[derive(Default)]
struct CteNames(HashSet<String>);

impl Visitor for CteNames {
    type Break = ();

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        if let Some(with) = &query.with {
            for cte in &with.cte_tables {
                self.0.insert(cte.alias.name.value.to_lowercase());
            }
        }
        ControlFlow::Continue(())
    }
}

/// Last segment of a (possibly schema-qualified, possibly quoted) relation name.
fn relation_name(name: &ObjectName) -> String {
    let rendered = name.to_string();
    let last = rendered.rsplit('.').next().unwrap_or(&rendered);
    unquote(last)
}

fn unquote(ident: &str) -> String {
    ident
        .trim_matches(|c| matches!(c, '"' | '`' | '[' | ']'))
        .to_lowercase()
}

pub fn validate_sql(sql: &str, schema: &SchemaDescriptor) -> Result<(), SqlRejection> {
    let statements =
        Parser::parse_sql(&SQLiteDialect {}, sql).map_err(|e| SqlRejection::Parse(e.to_string()))?;

    let statement = match statements.as_slice() {
        [] => return Err(SqlRejection::Empty),
        [one] => one,
        many => return Err(SqlRejection::MultipleStatements(many.len())),
    };

    if !matches!(statement, Statement::Query(_)) {
        return Err(SqlRejection::NotReadOnly);
    }

    let mut ctes = CteNames::default();
    let _ = statement.visit(&mut ctes);
    let ctes = ctes.0;

    if let ControlFlow::Break(rejection) = visit_relations(statement, |name| {
        let table = relation_name(name);
        if schema.table(&table).is_some() || ctes.contains(&table) {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(SqlRejection::UnknownTable(table))
        }
    }) {
        return Err(rejection);
    }

    if let ControlFlow::Break(rejection) = visit_expressions(statement, |expr| {
        let Expr::CompoundIdentifier(parts) = expr else {
            return ControlFlow::Continue(());
        };
        let [qualifier, column] = parts.as_slice() else {
            return ControlFlow::Continue(());
        };
        let table_name = qualifier.value.to_lowercase();
        match schema.table(&table_name) {
            Some(table) if !table.has_column(&column.value) => {
                ControlFlow::Break(SqlRejection::UnknownColumn {
                    table: table_name,
                    column: column.value.clone(),
                })
            }
            _ => ControlFlow::Continue(()),
        }
    }) {
        return Err(rejection);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::schema::SCHEMA;

    fn check(sql: &str) -> Result<(), SqlRejection> {
        validate_sql(sql, &SCHEMA)
    }

    #[test]
    fn test_accepts_similar_terms_search() {
        check(
            "SELECT company_name FROM companies \
             WHERE LOWER(companies.similar_terms) LIKE '%oil%' \
                OR LOWER(companies.similar_terms) LIKE '%petroleum%';",
        )
        .unwrap();
    }

    #[test]
    fn test_accepts_joins_across_all_tables() {
        check(
            "SELECT p.first_name, c.company_name, e.event_name \
             FROM event_info e \
             JOIN companies c ON e.event_url = c.event_url \
             JOIN people p ON c.homepage_base_url = p.homepage_base_url \
             WHERE c.employee_range_upper > 1000",
        )
        .unwrap();
    }

    #[test]
    fn test_accepts_intersect_and_union() {
        check(
            "SELECT event_url FROM event_info WHERE LOWER(event_info.similar_terms) LIKE '%cyber%' \
             INTERSECT \
             SELECT event_url FROM companies WHERE LOWER(companies.similar_terms) LIKE '%oil%'",
        )
        .unwrap();
        check(
            "SELECT event_url FROM event_info WHERE LOWER(similar_terms) LIKE '%ai%' \
             UNION \
             SELECT event_url FROM companies WHERE LOWER(similar_terms) LIKE '%ai%'",
        )
        .unwrap();
    }

    #[test]
    fn test_accepts_cte_references() {
        check(
            "WITH big AS (SELECT * FROM companies WHERE employee_range_upper > 1000) \
             SELECT company_name FROM big",
        )
        .unwrap();
    }

    #[test]
    fn test_rejects_writes() {
        assert_eq!(check("DELETE FROM companies"), Err(SqlRejection::NotReadOnly));
        assert_eq!(check("DROP TABLE people"), Err(SqlRejection::NotReadOnly));
        assert_eq!(
            check("UPDATE companies SET revenue_millions = 0"),
            Err(SqlRejection::NotReadOnly)
        );
    }

    #[test]
    fn test_rejects_multiple_statements() {
        assert_eq!(
            check("SELECT 1 FROM people; DELETE FROM people"),
            Err(SqlRejection::MultipleStatements(2))
        );
    }

    #[test]
    fn test_rejects_unknown_table() {
        assert_eq!(
            check("SELECT * FROM sqlite_master"),
            Err(SqlRejection::UnknownTable("sqlite_master".to_string()))
        );
    }

    #[test]
    fn test_rejects_unknown_qualified_column() {
        assert_eq!(
            check("SELECT companies.employee_count FROM companies"),
            Err(SqlRejection::UnknownColumn {
                table: "companies".to_string(),
                column: "employee_count".to_string(),
            })
        );
    }

    #[test]
    fn test_alias_qualified_columns_are_not_checked() {
        check("SELECT x.whatever FROM companies x").unwrap();
    }

    #[test]
    fn test_rejects_prose_and_empty_input() {
        assert!(matches!(
            check("Here is your query: SELECT * FROM companies"),
            Err(SqlRejection::Parse(_))
        ));
        assert_eq!(check(""), Err(SqlRejection::Empty));
    }

    #[test]
    fn test_quoted_table_names() {
        check("SELECT \"event_name\" FROM \"event_info\"").unwrap();
    }
}
