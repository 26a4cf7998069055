//! Model candidate resolution
//!
//! A step names at most one catalog model, but the provider may have that
//! model rate limited or retired at call time. Resolution therefore yields
//! an ordered list of provider identifiers to try, most preferred first.

use std::collections::HashSet;

use crate::domain::DomainError;

/// Static preference table, one ordered list per modality.
///
/// Only constructible through `new` or `free_tier`, so both lists are
/// always non-empty and duplicate-free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTable {
    vision: Vec<String>,
    text: Vec<String>,
}

impl CandidateTable {
    /// Build a table; both lists must be non-empty with distinct entries
    pub fn new(vision: Vec<String>, text: Vec<String>) -> Result<Self, DomainError> {
        validate_list("vision", &vision)?;
        validate_list("text", &text)?;

        Ok(Self { vision, text })
    }

    /// Free-tier OpenRouter preference table
    pub fn free_tier() -> Self {
        Self {
            vision: to_owned(&[
                "google/gemma-3-27b-it:free",
                "google/gemma-3-12b-it:free",
                "nvidia/nemotron-nano-12b-v2-vl:free",
                "mistralai/mistral-small-3.1-24b-instruct:free",
                "google/gemma-3-4b-it:free",
            ]),
            text: to_owned(&[
                "meta-llama/llama-3.3-70b-instruct:free",
                "deepseek/deepseek-r1-0528:free",
                "nousresearch/hermes-3-llama-3.1-405b:free",
                "qwen/qwen3-4b:free",
                "google/gemma-3-27b-it:free",
            ]),
        }
    }

    pub fn vision(&self) -> &[String] {
        &self.vision
    }

    pub fn text(&self) -> &[String] {
        &self.text
    }

    pub fn for_modality(&self, needs_image: bool) -> &[String] {
        if needs_image { &self.vision } else { &self.text }
    }
}

impl Default for CandidateTable {
    fn default() -> Self {
        Self::free_tier()
    }
}

fn to_owned(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

fn validate_list(name: &str, ids: &[String]) -> Result<(), DomainError> {
    if ids.is_empty() {
        return Err(DomainError::configuration(format!(
            "{} candidate list must not be empty",
            name
        )));
    }

    if let Some(blank) = ids.iter().find(|id| id.trim().is_empty()) {
        return Err(DomainError::configuration(format!(
            "{} candidate list contains a blank identifier '{}'",
            name, blank
        )));
    }

    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(DomainError::configuration(format!(
                "{} candidate list contains '{}' more than once",
                name, id
            )));
        }
    }

    Ok(())
}

/// How candidates are chosen for a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateStrategy {
    /// Ignore the catalog model and walk the preference table
    Table(CandidateTable),
    /// Call exactly the catalog model's provider identifier
    Direct,
}

/// Resolves a step's modality into the ordered candidate list
#[derive(Debug, Clone)]
pub struct ModelCandidateResolver {
    strategy: CandidateStrategy,
}

impl ModelCandidateResolver {
    pub fn new(strategy: CandidateStrategy) -> Self {
        Self { strategy }
    }

    pub fn table(table: CandidateTable) -> Self {
        Self::new(CandidateStrategy::Table(table))
    }

    pub fn direct() -> Self {
        Self::new(CandidateStrategy::Direct)
    }

    pub fn strategy(&self) -> &CandidateStrategy {
        &self.strategy
    }

    /// Ordered, non-empty, duplicate-free candidates for one step
    pub fn resolve(&self, needs_image: bool, provider_model_id: &str) -> Vec<String> {
        match &self.strategy {
            CandidateStrategy::Table(table) => table.for_modality(needs_image).to_vec(),
            CandidateStrategy::Direct => vec![provider_model_id.to_string()],
        }
    }
}

impl Default for ModelCandidateResolver {
    fn default() -> Self {
        Self::table(CandidateTable::default())
    }
}
