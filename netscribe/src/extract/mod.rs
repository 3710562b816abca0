//! Extraction pipeline: text in, rows out.
//!
//! A [`PatternMatcher`] turns one text into rows of `field -> value`. The
//! pipeline runs it over every input, concatenates the rows in input order
//! and optionally merges rows that share a key field.

mod textfsm;

use std::collections::HashMap;

use indexmap::IndexMap;
use log::debug;

pub use textfsm::TextFsmMatcher;

use crate::error::{ExtractionError, Result, TemplateError};
use crate::template::ExtractionTemplate;

/// One matcher record. Field names are lower-case.
pub type Row = HashMap<String, String>;

/// Table-driven text parser.
pub trait PatternMatcher: Send + Sync {
    /// Parse `text` with an expanded template.
    fn parse(&self, template: &ExtractionTemplate, text: &str) -> std::result::Result<Vec<Row>, TemplateError>;
}

/// Pipeline options.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Merge rows sharing this field's value.
    pub flatten_key: Option<String>,

    /// Split each input on this term before matching, keeping the term at
    /// the start of every chunk.
    pub split_term: Option<String>,
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flatten_key(mut self, key: impl Into<String>) -> Self {
        self.flatten_key = Some(key.into());
        self
    }

    pub fn split_term(mut self, term: impl Into<String>) -> Self {
        self.split_term = Some(term.into());
        self
    }
}

/// Run `matcher` over `inputs` and post-process the rows.
pub fn extract<M, S>(
    matcher: &M,
    template: &ExtractionTemplate,
    inputs: &[S],
    options: &ExtractOptions,
) -> Result<Vec<Row>>
where
    M: PatternMatcher + ?Sized,
    S: AsRef<str>,
{
    if inputs.iter().all(|input| input.as_ref().trim().is_empty()) {
        return Err(ExtractionError::EmptyInput.into());
    }

    let mut rows = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        match options.split_term.as_deref() {
            Some(term) => {
                for chunk in split_on_term(input, term) {
                    rows.extend(parse_lowercase(matcher, template, &chunk)?);
                }
            }
            None => rows.extend(parse_lowercase(matcher, template, input)?),
        }
    }
    debug!(
        "template '{}' produced {} row(s) from {} input(s)",
        template.name,
        rows.len(),
        inputs.len()
    );

    match options.flatten_key.as_deref() {
        Some(key) => Ok(flatten(key, rows)?),
        None => Ok(rows),
    }
}

fn parse_lowercase<M: PatternMatcher + ?Sized>(
    matcher: &M,
    template: &ExtractionTemplate,
    text: &str,
) -> Result<Vec<Row>> {
    let rows = matcher.parse(template, text)?;
    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect())
        .collect())
}

/// Split `text` into blocks that each start with `term`.
///
/// Text before the first occurrence is dropped.
pub fn split_on_term(text: &str, term: &str) -> Vec<String> {
    if term.is_empty() {
        return vec![text.to_string()];
    }
    text.split(term)
        .skip(1)
        .map(|chunk| format!("{term}{chunk}").trim().to_string())
        .collect()
}

/// Merge rows that share the value of `key`.
///
/// Rows keep first-seen order. Non-empty values of later rows overwrite
/// earlier ones; empty values are dropped.
pub fn flatten(key: &str, rows: Vec<Row>) -> std::result::Result<Vec<Row>, ExtractionError> {
    let mut merged: IndexMap<String, Row> = IndexMap::new();
    for row in rows {
        let id = row
            .get(key)
            .cloned()
            .ok_or_else(|| ExtractionError::MissingKey {
                key: key.to_string(),
            })?;

        let entry = merged.entry(id).or_default();
        entry.extend(row.into_iter().filter(|(_, value)| !value.is_empty()));
    }
    Ok(merged.into_values().collect())
}
