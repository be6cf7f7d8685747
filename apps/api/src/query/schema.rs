//! Static description of the three tables the generator may query.

pub struct ColumnDescriptor {
    pub name: &'static str,
    pub description: Option<&'static str>,
}

pub struct TableDescriptor {
    pub name: &'static str,
    pub columns: &'static [ColumnDescriptor],
}

/// Two tables joinable on a shared column.
pub struct JoinKey {
    pub left: &'static str,
    pub right: &'static str,
    pub column: &'static str,
    pub meaning: &'static str,
}

pub struct SchemaDescriptor {
    pub tables: &'static [TableDescriptor],
    pub joins: &'static [JoinKey],
}

const fn col(name: &'static str) -> ColumnDescriptor {
    ColumnDescriptor {
        name,
        description: None,
    }
}

const fn described(name: &'static str, description: &'static str) -> ColumnDescriptor {
    ColumnDescriptor {
        name,
        description: Some(description),
    }
}

pub const EVENT_TABLE: &str = "event_info";
pub const COMPANY_TABLE: &str = "companies";
pub const PEOPLE_TABLE: &str = "people";
pub const SIMILAR_TERMS: &str = "similar_terms";

pub static SCHEMA: SchemaDescriptor = SchemaDescriptor {
    tables: &[
        TableDescriptor {
            name: EVENT_TABLE,
            columns: &[
                described("event_logo_url", "A URL to the event's logo image"),
                described("event_name", "Official name of the event"),
                described("event_start_date", "Date when the event begins"),
                described("event_end_date", "Date when the event concludes"),
                described("event_venue", "Specific location where the event is held"),
                described("event_country", "Country where the event takes place"),
                described(
                    "event_description",
                    "A detailed summary of the event's purpose and content",
                ),
                described("event_url", "The official website link for the event"),
                described(
                    SIMILAR_TERMS,
                    "Keywords or phrases related to the event for search purposes",
                ),
            ],
        },
        TableDescriptor {
            name: COMPANY_TABLE,
            columns: &[
                col("company_logo_url"),
                col("company_logo_text"),
                col("company_name"),
                col("relation_to_event"),
                col("event_url"),
                described(
                    "company_revenue",
                    "Free-text revenue; use revenue_millions for filtering",
                ),
                described("employee_range_lower", "Lower bound of the employee count"),
                described("employee_range_upper", "Upper bound of the employee count"),
                col("company_phone"),
                col("company_founding_year"),
                col("company_address"),
                col("company_overview"),
                col("homepage_url"),
                col("linkedin_company_url"),
                col("homepage_base_url"),
                col("company_logo_url_on_event_page"),
                col("company_logo_match_flag"),
                described(
                    SIMILAR_TERMS,
                    "Keywords or phrases related to the company's industry for search purposes",
                ),
                described("revenue_millions", "Company revenue standardized in millions"),
            ],
        },
        TableDescriptor {
            name: PEOPLE_TABLE,
            columns: &[
                described("first_name", "The person's given name"),
                described("middle_name", "The person's middle name (if applicable)"),
                described("last_name", "The person's family name or surname"),
                col("job_title"),
                described("person_city", "The city where the person is located"),
                described("person_state", "The state or region where the person resides"),
                described("person_country", "The country where the person is based"),
                described("email", "The person's email address"),
                described(
                    "homepage_base_url",
                    "The root domain of the person's employer's website",
                ),
                described(
                    "duration_in_current_job",
                    "How long they've been in their current role",
                ),
                described(
                    "duration_in_current_company",
                    "How long they've been with their current employer",
                ),
            ],
        },
    ],
    joins: &[
        JoinKey {
            left: EVENT_TABLE,
            right: COMPANY_TABLE,
            column: "event_url",
            meaning: "Each event_url corresponds to a unique event",
        },
        JoinKey {
            left: COMPANY_TABLE,
            right: PEOPLE_TABLE,
            column: "homepage_base_url",
            meaning: "Each homepage_base_url can be interpreted as a unique company",
        },
    ],
};

impl SchemaDescriptor {
    pub fn table(&self, name: &str) -> Option<&TableDescriptor> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Renders the "<table> contains following columns: ..." block.
    pub fn describe_tables(&self) -> String {
        self.tables
            .iter()
            .map(|t| {
                let columns: Vec<&str> = t.columns.iter().map(|c| c.name).collect();
                format!("{} contains following columns: {}", t.name, columns.join(","))
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Renders numbered per-column descriptions for every table that has any.
    pub fn describe_columns(&self) -> String {
        let mut out = String::new();
        for table in self.tables {
            let described: Vec<_> = table
                .columns
                .iter()
                .filter_map(|c| c.description.map(|d| (c.name, d)))
                .collect();
            if described.is_empty() {
                continue;
            }
            out.push_str(&format!("{} details:\n", table.name));
            for (i, (name, description)) in described.iter().enumerate() {
                out.push_str(&format!("{}. {}: {}\n", i + 1, name, description));
            }
        }
        out.trim_end().to_string()
    }

    /// Renders the join-key rules.
    pub fn describe_joins(&self) -> String {
        self.joins
            .iter()
            .map(|j| {
                format!(
                    "{} and {} data can be merged using the '{}' column. {}.",
                    j.left, j.right, j.column, j.meaning
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TableDescriptor {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookup_is_case_insensitive() {
        assert!(SCHEMA.table("Companies").is_some());
        assert!(SCHEMA.table("users").is_none());
    }

    #[test]
    fn test_both_searchable_tables_have_similar_terms() {
        assert!(SCHEMA.table(EVENT_TABLE).unwrap().has_column(SIMILAR_TERMS));
        assert!(SCHEMA.table(COMPANY_TABLE).unwrap().has_column(SIMILAR_TERMS));
        assert!(!SCHEMA.table(PEOPLE_TABLE).unwrap().has_column(SIMILAR_TERMS));
    }

    #[test]
    fn test_join_columns_exist_on_both_sides() {
        for join in SCHEMA.joins {
            assert!(SCHEMA.table(join.left).unwrap().has_column(join.column));
            assert!(SCHEMA.table(join.right).unwrap().has_column(join.column));
        }
    }

    #[test]
    fn test_describe_tables_lists_every_column() {
        let text = SCHEMA.describe_tables();
        assert!(text.contains("event_info contains following columns: event_logo_url,event_name"));
        assert!(text.contains("employee_range_upper"));
        assert!(text.contains("duration_in_current_company"));
    }

    #[test]
    fn test_describe_columns_skips_undescribed() {
        let text = SCHEMA.describe_columns();
        assert!(text.contains("1. event_logo_url: A URL to the event's logo image"));
        assert!(!text.contains("company_phone"));
    }

    #[test]
    fn test_describe_joins() {
        let text = SCHEMA.describe_joins();
        assert!(text.contains("event_info and companies data can be merged using the 'event_url' column"));
        assert!(text.contains("'homepage_base_url'"));
    }
}
