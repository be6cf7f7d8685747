//! Context Classifier: decides which tables' `similar_terms` columns a query
//! should search.
//!
//! An indicator noun only counts when something qualifies it: an adjective
//! child, or a child attached as `compound` / `amod`. "oil companies" sets the
//! company flag, a bare "find events" sets nothing.
//!
//! KNOWN LIMITATION: bare mentions ("events in Berlin") classify as `unknown`.
//! The gating is kept as-is pending a product decision.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::query::tagger::{tag, Dep, Pos, TaggedSentence};

pub const EVENT_INDICATORS: &[&str] = &[
    "event",
    "conference",
    "seminar",
    "workshop",
    "meetup",
    "exhibition",
    "trade show",
    "symposium",
];

pub const COMPANY_INDICATORS: &[&str] = &[
    "company",
    "business",
    "corporation",
    "firm",
    "enterprise",
    "organization",
    "industry",
];

/// Which tables a query is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchContext {
    Event,
    Company,
    Both,
    Unknown,
}

impl SearchContext {
    pub fn from_flags(event: bool, company: bool) -> Self {
        match (event, company) {
            (true, true) => SearchContext::Both,
            (true, false) => SearchContext::Event,
            (false, true) => SearchContext::Company,
            (false, false) => SearchContext::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchContext::Event => "event",
            SearchContext::Company => "company",
            SearchContext::Both => "both",
            SearchContext::Unknown => "unknown",
        }
    }

    /// Whether `event_info.similar_terms` may be searched.
    pub fn searches_events(&self) -> bool {
        !matches!(self, SearchContext::Company)
    }

    /// Whether `companies.similar_terms` may be searched.
    pub fn searches_companies(&self) -> bool {
        !matches!(self, SearchContext::Event)
    }
}

impl fmt::Display for SearchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a raw query.
pub fn classify(query: &str) -> SearchContext {
    classify_tagged(&tag(query))
}

/// Classifies an already-tagged query.
pub fn classify_tagged(sentence: &TaggedSentence) -> SearchContext {
    let mut event_context = false;
    let mut company_context = false;

    for (idx, token) in sentence.tokens().iter().enumerate() {
        let is_event = EVENT_INDICATORS.contains(&token.lemma.as_str());
        let is_company = COMPANY_INDICATORS.contains(&token.lemma.as_str());
        if !is_event && !is_company {
            continue;
        }

        let modifiers: Vec<&str> = sentence
            .children(idx)
            .filter(|c| c.pos == Pos::Adj || matches!(c.dep, Dep::Compound | Dep::Amod))
            .map(|c| c.text.as_str())
            .collect();

        if modifiers.is_empty() {
            continue;
        }

        if is_event {
            event_context = true;
            debug!("Event context set: '{}' modified by {:?}", token.text, modifiers);
        }
        if is_company {
            company_context = true;
            debug!("Company context set: '{}' modified by {:?}", token.text, modifiers);
        }
    }

    let context = SearchContext::from_flags(event_context, company_context);
    debug!(
        event_context,
        company_context,
        context = context.as_str(),
        "Query context classified"
    );
    context
}
