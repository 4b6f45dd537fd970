// src/keywords/mod.rs
//! Deterministic keyword extraction and matching. Pure string
//! processing, no I/O.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub mod extractor;
pub mod matcher;
pub mod synonyms;

pub use extractor::{KeywordExtractor, ProximityClassifier, Requirement, RequirementClassifier};
pub use matcher::{KeywordAnalysis, KeywordMatcher, MatchResult, PartialMatch};
pub use synonyms::SynonymTable;

/// Keywords extracted from job-description text.
///
/// The required/preferred split is a best-effort proximity heuristic; a
/// skill appears in exactly one of the two sets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobKeywordSet {
    pub required_skills: BTreeSet<String>,
    pub preferred_skills: BTreeSet<String>,
    pub soft_skills: BTreeSet<String>,
    pub education_terms: BTreeSet<String>,
    pub years_required: Option<u32>,
}

impl JobKeywordSet {
    /// All technical skills, required first.
    pub fn all_skills(&self) -> impl Iterator<Item = &String> {
        self.required_skills
            .iter()
            .chain(self.preferred_skills.iter())
    }

    pub fn skill_count(&self) -> usize {
        self.required_skills.len() + self.preferred_skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skill_count() == 0
            && self.soft_skills.is_empty()
            && self.education_terms.is_empty()
            && self.years_required.is_none()
    }
}
