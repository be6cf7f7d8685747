//! Lightweight English tagger for short search queries.
//!
//! Produces a `TaggedSentence`: one `Token` per word with its lemma, a coarse
//! part of speech and, for nominal modifiers, the head it attaches to. Enough
//! structure for the context classifier; not a general-purpose parser.
//!
//! Attachment rules:
//! - every maximal run of ADJ/NOUN/PROPN tokens is headed by its last noun;
//!   earlier run tokens attach as `amod` (ADJ) or `compound` (NOUN/PROPN),
//!   adjectives after the head attach as `amod`
//! - a number directly before a nominal run attaches to its head as `nummod`;
//!   adjectives directly before that number attach to the same head as `amod`
//! - a noun-less run starting with a comparative ("more", "greater", ...) that
//!   follows `<noun> with|having` attaches to that noun as `amod`

use serde::Serialize;

/// Coarse part of speech (Universal Dependencies naming).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Pos {
    Noun,
    Propn,
    Adj,
    Verb,
    Adv,
    Adp,
    Det,
    Num,
    Cconj,
    Pron,
    Part,
    Punct,
}

/// Relation of a token to its head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dep {
    Amod,
    Compound,
    Nummod,
    /// Not attached to any head.
    Root,
}

#[derive(Debug, Clone, Serialize)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    pub pos: Pos,
    pub head: Option<usize>,
    pub dep: Dep,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TaggedSentence {
    tokens: Vec<Token>,
}

impl TaggedSentence {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens attached directly to the token at `idx`.
    pub fn children(&self, idx: usize) -> impl Iterator<Item = &Token> + '_ {
        self.tokens.iter().filter(move |t| t.head == Some(idx))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lexicons
// ────────────────────────────────────────────────────────────────────────────

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "all", "any", "some", "every", "each", "this", "that", "these", "those",
    "no", "another", "either", "neither", "both",
];

const ADPOSITIONS: &[&str] = &[
    "in", "on", "at", "with", "of", "for", "from", "by", "about", "near", "over", "under",
    "between", "during", "than", "into", "across", "within", "after", "before", "since", "per",
    "around", "above", "below", "like", "among", "through", "without", "having",
];

const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor", "&"];

const PRONOUNS: &[&str] = &[
    "i", "me", "you", "we", "they", "it", "them", "us", "my", "our", "their", "its", "your",
    "who", "what", "which", "where", "when", "whose", "whom", "how", "there",
];

const PARTICLES: &[&str] = &["to", "'s"];

const ADVERBS: &[&str] = &[
    "only", "also", "very", "not", "just", "currently", "recently", "soon", "least", "most",
    "almost", "nearly", "approximately", "roughly", "exactly", "too", "then", "now",
];

const VERBS: &[&str] = &[
    "find", "show", "list", "get", "give", "tell", "search", "display", "is", "are", "was",
    "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "can", "could",
    "will", "would", "should", "may", "might", "held", "hosted", "located", "based", "attend",
    "attending", "organized", "organised", "want", "need", "see", "look", "fetch", "return",
    "count", "happening", "happen", "host", "hold", "take", "taking", "work", "working",
    "employ", "employing", "include", "including", "sponsor", "sponsored", "sponsoring",
    "exhibit", "exhibiting", "participate", "participating", "founded", "make", "makes",
    "operate", "operating", "going", "retrieve", "name", "named", "identify", "compare",
];

/// Comparatives that qualify a noun when they follow it ("companies greater than 1000").
const COMPARATIVES: &[&str] = &[
    "more", "less", "fewer", "greater", "larger", "bigger", "smaller", "higher", "lower",
];

const ADJECTIVES: &[&str] = &[
    "new", "old", "big", "small", "large", "huge", "top", "best", "major", "minor", "upcoming",
    "recent", "annual", "international", "global", "local", "public", "private", "virtual",
    "online", "hybrid", "free", "open", "early", "late", "next", "last", "past", "future",
    "leading", "emerging", "established", "young", "senior", "junior", "high", "low", "green",
    "renewable", "digital", "medical", "financial", "european", "american", "asian", "african",
    "many", "several", "various", "other", "same", "different", "similar", "famous",
    "popular", "key", "biggest", "largest", "smallest", "oldest", "newest",
];

/// Words whose suffix looks adjectival but which are nouns.
const NOUN_EXCEPTIONS: &[&str] = &[
    "festival", "hospital", "capital", "portal", "rental", "music", "logic", "clinic",
    "arrival", "proposal", "material", "individual", "professional", "summit", "retail",
    "terminal", "journal", "signal", "topic", "metric", "analytic", "fabric", "plastic",
];

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "al", "ic", "ive", "ous", "ful", "less", "able", "ible", "ese", "ish", "ary",
];

const NUMBER_WORDS: &[&str] = &[
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "hundred",
    "thousand", "million", "billion",
];

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("symposia", "symposium"),
    ("series", "series"),
    ("news", "news"),
    ("data", "data"),
];

/// Multi-word expressions merged into one token: (first, second, lemma).
const MULTI_WORD: &[(&str, &str, &str)] = &[("trade", "show", "trade show")];

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Tokenizes, lemmatizes, tags and attaches modifiers for `text`.
pub fn tag(text: &str) -> TaggedSentence {
    let words = merge_multi_word(tokenize(text));

    let mut tokens: Vec<Token> = words
        .into_iter()
        .enumerate()
        .map(|(idx, word)| word.into_token(idx))
        .collect();

    retag_participles(&mut tokens);
    attach_modifiers(&mut tokens);

    TaggedSentence { tokens }
}

// ────────────────────────────────────────────────────────────────────────────
// Tokenization
// ────────────────────────────────────────────────────────────────────────────

fn tokenize(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        let next = chars.get(i + 1).copied();
        let in_word = c.is_alphanumeric()
            || ((c == '\'' || c == '-') && !current.is_empty() && next.is_some_and(char::is_alphanumeric))
            || ((c == ',' || c == '.')
                && current.chars().all(|ch| ch.is_ascii_digit() || ch == ',' || ch == '.')
                && !current.is_empty()
                && next.is_some_and(|n| n.is_ascii_digit()));

        if in_word {
            current.push(c);
            continue;
        }

        if !current.is_empty() {
            push_word(&mut tokens, std::mem::take(&mut current));
        }
        if !c.is_whitespace() {
            tokens.push(c.to_string());
        }
    }

    if !current.is_empty() {
        push_word(&mut tokens, current);
    }

    tokens
}

/// Splits a possessive `'s` off its word.
fn push_word(tokens: &mut Vec<String>, word: String) {
    match word.strip_suffix("'s") {
        Some(base) if !base.is_empty() => {
            tokens.push(base.to_string());
            tokens.push("'s".to_string());
        }
        _ => tokens.push(word),
    }
}

/// A word before tagging, possibly merged from several surface tokens.
struct Word {
    text: String,
    lemma: Option<&'static str>,
}

impl Word {
    fn into_token(self, idx: usize) -> Token {
        let lower = self.text.to_lowercase();

        if let Some(lemma) = self.lemma {
            return Token {
                text: self.text,
                lemma: lemma.to_string(),
                pos: Pos::Noun,
                head: None,
                dep: Dep::Root,
            };
        }

        let pos = coarse_pos(&self.text, &lower, idx);
        let lemma = match pos {
            Pos::Noun | Pos::Propn => lemmatize_noun(&lower),
            _ => lower,
        };

        Token {
            text: self.text,
            lemma,
            pos,
            head: None,
            dep: Dep::Root,
        }
    }
}

fn merge_multi_word(raw: Vec<String>) -> Vec<Word> {
    let mut words = Vec::with_capacity(raw.len());
    let mut iter = raw.into_iter().peekable();

    while let Some(text) = iter.next() {
        let lower = text.to_lowercase();
        let merged = MULTI_WORD.iter().find(|(first, second, _)| {
            lower == *first
                && iter
                    .peek()
                    .is_some_and(|next| lemmatize_noun(&next.to_lowercase()) == *second)
        });

        match merged {
            Some((_, _, lemma)) => {
                let second = iter.next().unwrap_or_default();
                words.push(Word {
                    text: format!("{text} {second}"),
                    lemma: Some(*lemma),
                });
            }
            None => words.push(Word { text, lemma: None }),
        }
    }

    words
}

// ────────────────────────────────────────────────────────────────────────────
// Tagging
// ────────────────────────────────────────────────────────────────────────────

fn coarse_pos(text: &str, lower: &str, idx: usize) -> Pos {
    if is_number(lower) || NUMBER_WORDS.contains(&lower) {
        return Pos::Num;
    }
    if !lower.chars().any(char::is_alphanumeric) {
        return Pos::Punct;
    }
    if DETERMINERS.contains(&lower) {
        return Pos::Det;
    }
    if ADPOSITIONS.contains(&lower) {
        return Pos::Adp;
    }
    if CONJUNCTIONS.contains(&lower) {
        return Pos::Cconj;
    }
    if PRONOUNS.contains(&lower) {
        return Pos::Pron;
    }
    if PARTICLES.contains(&lower) {
        return Pos::Part;
    }
    if ADVERBS.contains(&lower) {
        return Pos::Adv;
    }
    if VERBS.contains(&lower) {
        return Pos::Verb;
    }
    if ADJECTIVES.contains(&lower) || COMPARATIVES.contains(&lower) {
        return Pos::Adj;
    }
    if NOUN_EXCEPTIONS.contains(&lower) || NOUN_EXCEPTIONS.contains(&lemmatize_noun(lower).as_str())
    {
        return Pos::Noun;
    }
    if lower.len() > 4 && ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return Pos::Adj;
    }
    if lower.len() > 4 && lower.ends_with("ly") {
        return Pos::Adv;
    }
    if lower.len() > 4 && (lower.ends_with("ing") || lower.ends_with("ed")) {
        return Pos::Verb;
    }
    if idx > 0 && text.chars().next().is_some_and(char::is_uppercase) {
        return Pos::Propn;
    }
    Pos::Noun
}

fn is_number(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit())
        && word
            .chars()
            .all(|c| c.is_ascii_digit() || c == ',' || c == '.')
}

/// Reduces a plural noun to its singular form.
pub fn lemmatize_noun(word: &str) -> String {
    if let Some((_, lemma)) = IRREGULAR_PLURALS.iter().find(|(plural, _)| *plural == word) {
        return lemma.to_string();
    }

    let len = word.len();
    if len > 4 && word.ends_with("ies") {
        format!("{}y", &word[..len - 3])
    } else if word.ends_with("sses")
        || word.ends_with("xes")
        || word.ends_with("ches")
        || word.ends_with("shes")
    {
        word[..len - 2].to_string()
    } else if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        word.to_string()
    } else if len > 3 && word.ends_with('s') {
        word[..len - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Unknown `-ing`/`-ed` words between a determiner/adjective/preposition and a
/// noun act as adjectives ("the leading companies").
fn retag_participles(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        if tokens[i].pos != Pos::Verb || VERBS.contains(&tokens[i].lemma.as_str()) {
            continue;
        }
        let next_is_nominal = tokens
            .get(i + 1)
            .is_some_and(|t| matches!(t.pos, Pos::Noun | Pos::Propn | Pos::Adj));
        let prev_allows = i == 0
            || matches!(
                tokens[i - 1].pos,
                Pos::Det | Pos::Adj | Pos::Adp | Pos::Cconj | Pos::Punct
            );
        if next_is_nominal && prev_allows {
            tokens[i].pos = Pos::Adj;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Attachment
// ────────────────────────────────────────────────────────────────────────────

fn is_nominal(pos: Pos) -> bool {
    matches!(pos, Pos::Noun | Pos::Propn | Pos::Adj)
}

fn attach(tokens: &mut [Token], child: usize, head: usize, dep: Dep) {
    tokens[child].head = Some(head);
    tokens[child].dep = dep;
}

fn attach_modifiers(tokens: &mut [Token]) {
    let n = tokens.len();
    let mut i = 0;

    while i < n {
        if !is_nominal(tokens[i].pos) {
            i += 1;
            continue;
        }

        let start = i;
        while i < n && is_nominal(tokens[i].pos) {
            i += 1;
        }
        let end = i;

        let head = run_head(tokens, start, end);

        match head {
            Some(h) => {
                for j in start..end {
                    if j == h {
                        continue;
                    }
                    let dep = if tokens[j].pos == Pos::Adj {
                        Dep::Amod
                    } else {
                        Dep::Compound
                    };
                    attach(tokens, j, h, dep);
                }
                if start > 0 && tokens[start - 1].pos == Pos::Num {
                    attach(tokens, start - 1, h, Dep::Nummod);
                }
            }
            None => {
                let qualifies_previous_noun = start >= 2
                    && COMPARATIVES.contains(&tokens[start].lemma.as_str())
                    && matches!(tokens[start - 1].lemma.as_str(), "with" | "having")
                    && matches!(tokens[start - 2].pos, Pos::Noun | Pos::Propn);
                if qualifies_previous_noun {
                    attach(tokens, start, start - 2, Dep::Amod);
                    continue;
                }

                // "top 10 companies": the adjectives skip over the number.
                if end + 1 < n && tokens[end].pos == Pos::Num && is_nominal(tokens[end + 1].pos) {
                    let next_end = (end + 1..n)
                        .find(|&j| !is_nominal(tokens[j].pos))
                        .unwrap_or(n);
                    if let Some(h) = run_head(tokens, end + 1, next_end) {
                        for j in start..end {
                            attach(tokens, j, h, Dep::Amod);
                        }
                    }
                }
            }
        }
    }
}

/// Last noun or proper noun in `tokens[start..end]`.
fn run_head(tokens: &[Token], start: usize, end: usize) -> Option<usize> {
    (start..end)
        .rev()
        .find(|&j| matches!(tokens[j].pos, Pos::Noun | Pos::Propn))
}
