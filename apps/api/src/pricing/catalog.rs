//! Flat-fee reference table matching.
//!
//! Text is normalized (lowercase, accents folded) and tokenized; Spanish stopwords
//! and tokens shorter than three characters are dropped.
//!
//! Ranking of candidate entries:
//! 1. exact normalized name match
//! 2. keyword overlap count (name tokens + entry keywords)
//! 3. most recently added entry (later in the table)
//!
//! An entry only qualifies when the service mentions at least
//! `min_overlap` of the entry's name tokens.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One row of the reference table: a named service and its market fee range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatFeeEntry {
    #[serde(rename = "nombre")]
    pub name: String,
    /// Extra terms that also count as overlap (not part of the qualifying share).
    #[serde(default, rename = "palabrasClave")]
    pub keywords: Vec<String>,
    #[serde(rename = "minimo")]
    pub minimum: f64,
    #[serde(rename = "maximo")]
    pub maximum: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogMatch<'a> {
    pub entry: &'a FlatFeeEntry,
    pub exact: bool,
    /// Every token of the entry's name appears in the text.
    pub covers_name: bool,
    pub overlap: usize,
}

const STOPWORDS: &[&str] = &[
    "de", "del", "la", "las", "el", "los", "y", "e", "o", "en", "para", "por", "con", "un",
    "una", "unos", "unas", "al", "a", "que", "se", "su", "sus",
];

/// Lowercases and folds Spanish accents so "Constitución" == "constitucion".
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            other => other,
        })
        .collect()
}

/// Significant tokens of a text.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    normalize(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 3 && !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// Normalized whole-phrase containment, used for keyword term lists.
pub fn mentions(haystack: &str, term: &str) -> bool {
    let term = normalize(term);
    !term.trim().is_empty() && normalize(haystack).contains(term.trim())
}

fn collapse_whitespace(text: &str) -> String {
    normalize(text).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Finds the reference entry closest to `text`, if any qualifies.
pub fn closest_match<'a>(
    catalog: &'a [FlatFeeEntry],
    text: &str,
    min_overlap: f64,
) -> Option<CatalogMatch<'a>> {
    let wanted = collapse_whitespace(text);
    let tokens = tokenize(text);
    let mut best: Option<CatalogMatch<'a>> = None;

    for entry in catalog {
        let exact = collapse_whitespace(&entry.name) == wanted;

        let name_tokens = tokenize(&entry.name);
        if name_tokens.is_empty() {
            continue;
        }
        let name_hits = name_tokens.intersection(&tokens).count();
        let share = name_hits as f64 / name_tokens.len() as f64;
        if !exact && (name_hits == 0 || share < min_overlap) {
            continue;
        }

        let keyword_tokens: BTreeSet<String> =
            entry.keywords.iter().flat_map(|k| tokenize(k)).collect();
        let keyword_hits = keyword_tokens
            .difference(&name_tokens)
            .filter(|t| tokens.contains(*t))
            .count();

        let candidate = CatalogMatch {
            entry,
            exact,
            covers_name: name_hits == name_tokens.len(),
            overlap: name_hits + keyword_hits,
        };

        // `>=` lets later entries win ties.
        let better = match &best {
            None => true,
            Some(current) => {
                (candidate.exact, candidate.overlap) >= (current.exact, current.overlap)
            }
        };
        if better {
            best = Some(candidate);
        }
    }

    best
}
