// src/keywords/extractor.rs
//! Pulls a normalized set of domain keywords out of free text.

use super::JobKeywordSet;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

/// Words dropped during tokenization.
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "is", "are", "was", "were", "be", "been", "being",
    "have", "has", "had", "do", "does", "did", "will", "would", "could", "should", "may", "might",
    "must", "shall", "can", "need", "to", "of", "in", "for", "on", "with", "at", "by", "from",
    "as", "into", "through", "during", "before", "after", "above", "below", "between", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not", "only", "own",
    "same", "so", "than", "too", "very", "just", "also", "now", "etc", "we", "you", "your", "our",
    "their", "its", "his", "her", "this", "that", "these", "those", "i", "me", "my", "myself",
    "he", "she", "it", "they", "them", "what", "which", "who", "whom", "if", "while", "about",
    "against", "any", "both", "either", "neither", "because", "until", "unless", "since",
    "although",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkillCategory {
    Technical,
    Soft,
    Education,
}

/// Curated domain lexicon. Patterns run over the original text (not just
/// tokens) so multi-word and symbol-bearing terms survive; each pattern is
/// compiled case-insensitive.
const LEXICON: &[(&str, &str, SkillCategory)] = &[
    ("javascript", r"\bjavascript\b", SkillCategory::Technical),
    ("typescript", r"\btypescript\b", SkillCategory::Technical),
    ("python", r"\bpython\b", SkillCategory::Technical),
    ("java", r"\bjava\b", SkillCategory::Technical),
    ("c++", r"c\+\+", SkillCategory::Technical),
    ("c#", r"c#", SkillCategory::Technical),
    ("react native", r"\breact\s?native\b", SkillCategory::Technical),
    ("react", r"\breact(?:\.?js)?\b", SkillCategory::Technical),
    ("angular", r"\bangular(?:js)?\b", SkillCategory::Technical),
    ("vue", r"\bvue(?:\.?js)?\b", SkillCategory::Technical),
    ("node.js", r"\bnode\.?js\b", SkillCategory::Technical),
    ("express", r"\bexpress(?:\.?js)?\b", SkillCategory::Technical),
    ("next.js", r"\bnext\.?js\b", SkillCategory::Technical),
    ("aws", r"\baws\b|\bamazon web services\b", SkillCategory::Technical),
    ("azure", r"\bazure\b", SkillCategory::Technical),
    ("gcp", r"\bgcp\b|\bgoogle cloud\b", SkillCategory::Technical),
    ("docker", r"\bdocker\b", SkillCategory::Technical),
    ("kubernetes", r"\bkubernetes\b|\bk8s\b", SkillCategory::Technical),
    ("sql", r"\bsql\b", SkillCategory::Technical),
    ("nosql", r"\bnosql\b", SkillCategory::Technical),
    ("mongodb", r"\bmongo(?:db)?\b", SkillCategory::Technical),
    ("postgresql", r"\bpostgres(?:ql)?\b", SkillCategory::Technical),
    ("mysql", r"\bmysql\b", SkillCategory::Technical),
    ("redis", r"\bredis\b", SkillCategory::Technical),
    ("git", r"\bgit\b", SkillCategory::Technical),
    ("github", r"\bgithub\b", SkillCategory::Technical),
    ("gitlab", r"\bgitlab\b", SkillCategory::Technical),
    ("ci/cd", r"\bci/cd\b", SkillCategory::Technical),
    ("devops", r"\bdevops\b", SkillCategory::Technical),
    ("agile", r"\bagile\b", SkillCategory::Technical),
    ("scrum", r"\bscrum\b", SkillCategory::Technical),
    ("rest api", r"\brest\s?apis?\b", SkillCategory::Technical),
    ("graphql", r"\bgraphql\b", SkillCategory::Technical),
    ("microservices", r"\bmicro\s?-?services\b", SkillCategory::Technical),
    (
        "machine learning",
        r"\bmachine\s?learning\b|\bml\b",
        SkillCategory::Technical,
    ),
    (
        "deep learning",
        r"\bdeep\s?learning\b",
        SkillCategory::Technical,
    ),
    ("html", r"\bhtml\b", SkillCategory::Technical),
    ("css", r"\bcss\b", SkillCategory::Technical),
    ("sass", r"\bsass\b", SkillCategory::Technical),
    ("tailwind", r"\btailwind(?:\s?css)?\b", SkillCategory::Technical),
    ("bootstrap", r"\bbootstrap\b", SkillCategory::Technical),
    ("flutter", r"\bflutter\b", SkillCategory::Technical),
    ("swift", r"\bswift\b", SkillCategory::Technical),
    ("kotlin", r"\bkotlin\b", SkillCategory::Technical),
    (
        "data analysis",
        r"\bdata\s?analysis\b",
        SkillCategory::Technical,
    ),
    (
        "data science",
        r"\bdata\s?scien(?:ce|tist)\b",
        SkillCategory::Technical,
    ),
    (
        "business intelligence",
        r"\bbusiness\s?intelligence\b",
        SkillCategory::Technical,
    ),
    ("excel", r"\bexcel\b", SkillCategory::Technical),
    ("powerpoint", r"\bpowerpoint\b", SkillCategory::Technical),
    ("tableau", r"\btableau\b", SkillCategory::Technical),
    ("power bi", r"\bpower\s?bi\b", SkillCategory::Technical),
    (
        "project management",
        r"\bproject\s?management\b",
        SkillCategory::Soft,
    ),
    ("leadership", r"\bleadership\b", SkillCategory::Soft),
    ("communication", r"\bcommunication\b", SkillCategory::Soft),
    (
        "problem solving",
        r"\bproblem[\s-]?solving\b",
        SkillCategory::Soft,
    ),
    ("teamwork", r"\bteam\s?work\b", SkillCategory::Soft),
    ("analytical", r"\banalytical\b", SkillCategory::Soft),
    ("collaboration", r"\bcollaboration\b", SkillCategory::Soft),
    ("bachelor", r"\bbachelor'?s?\b", SkillCategory::Education),
    ("master", r"\bmaster'?s?\b", SkillCategory::Education),
    ("phd", r"\bphd\b|\bdoctorate\b", SkillCategory::Education),
    ("degree", r"\bdegree\b", SkillCategory::Education),
    (
        "certification",
        r"\bcertifications?\b|\bcertified\b",
        SkillCategory::Education,
    ),
];

/// Whether a skill mention reads as required or preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Preferred,
}

/// Best-effort classifier deciding the required/preferred split for a
/// skill mention. Swappable so a better classifier can replace the
/// proximity heuristic without touching the matcher.
pub trait RequirementClassifier: Send + Sync {
    /// `position` is the byte offset of the skill mention in the
    /// lowercased job text.
    fn classify(&self, job_text: &str, position: usize) -> Requirement;
}

/// Classifies by distance to the nearest indicator word: a
/// required-indicator at least as close as any preferred-indicator (or no
/// preferred-indicator in the text at all) means required.
#[derive(Debug, Clone)]
pub struct ProximityClassifier {
    required_indicators: Vec<&'static str>,
    preferred_indicators: Vec<&'static str>,
}

impl Default for ProximityClassifier {
    fn default() -> Self {
        Self {
            required_indicators: vec!["required", "must have", "must-have", "mandatory", "essential"],
            preferred_indicators: vec![
                "preferred",
                "nice to have",
                "nice-to-have",
                "bonus",
                "a plus",
            ],
        }
    }
}

impl ProximityClassifier {
    fn nearest_distance(text: &str, position: usize, indicators: &[&str]) -> Option<usize> {
        indicators
            .iter()
            .flat_map(|indicator| text.match_indices(indicator).map(|(idx, _)| idx))
            .map(|idx| idx.abs_diff(position))
            .min()
    }
}

impl RequirementClassifier for ProximityClassifier {
    fn classify(&self, job_text: &str, position: usize) -> Requirement {
        let required = Self::nearest_distance(job_text, position, &self.required_indicators);
        let preferred = Self::nearest_distance(job_text, position, &self.preferred_indicators);

        match (required, preferred) {
            (_, None) => Requirement::Required,
            (None, Some(_)) => Requirement::Preferred,
            (Some(req), Some(pref)) => {
                if req <= pref {
                    Requirement::Required
                } else {
                    Requirement::Preferred
                }
            }
        }
    }
}

pub struct KeywordExtractor {
    stop_words: HashSet<&'static str>,
    lexicon: Vec<(Regex, &'static str, SkillCategory)>,
    years_pattern: Regex,
    classifier: Box<dyn RequirementClassifier>,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(Box::new(ProximityClassifier::default()))
    }
}

impl KeywordExtractor {
    pub fn new(classifier: Box<dyn RequirementClassifier>) -> Self {
        let lexicon = LEXICON
            .iter()
            .map(|(canonical, pattern, category)| {
                let regex = Regex::new(&format!("(?i){}", pattern))
                    .expect("invalid lexicon pattern");
                (regex, *canonical, *category)
            })
            .collect();

        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
            lexicon,
            years_pattern: Regex::new(r"(\d+)\s*\+?\s*years?").expect("invalid years pattern"),
            classifier,
        }
    }

    /// Extract the keyword set from job-description text. Empty input
    /// yields empty sets; there are no failure modes.
    pub fn extract(&self, text: &str) -> JobKeywordSet {
        if text.trim().is_empty() {
            return JobKeywordSet::default();
        }

        let lower = text.to_lowercase();
        let tokens = self.tokenize(&lower);
        let mut keywords = JobKeywordSet::default();

        for (regex, canonical, category) in &self.lexicon {
            let Some(found) = regex.find(&lower) else {
                continue;
            };
            // Purely alphanumeric matches must also survive tokenization,
            // so a lexicon hit never resurrects a stop-listed or
            // sub-length token.
            let matched = found.as_str();
            if matched.chars().all(char::is_alphanumeric) && !tokens.contains(matched) {
                continue;
            }

            match category {
                SkillCategory::Technical => {
                    match self.classifier.classify(&lower, found.start()) {
                        Requirement::Required => {
                            keywords.required_skills.insert(canonical.to_string());
                        }
                        Requirement::Preferred => {
                            keywords.preferred_skills.insert(canonical.to_string());
                        }
                    }
                }
                SkillCategory::Soft => {
                    keywords.soft_skills.insert(canonical.to_string());
                }
                SkillCategory::Education => {
                    keywords.education_terms.insert(canonical.to_string());
                }
            }
        }

        keywords.years_required = self.extract_years(&lower);
        keywords
    }

    /// Normalize and split text into candidate tokens: lowercase, strip
    /// punctuation except `+`, `#` and `.`, drop short and stop-listed
    /// tokens.
    pub fn tokenize(&self, text: &str) -> BTreeSet<String> {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || matches!(c, '+' | '#' | '.') {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        normalized
            .split_whitespace()
            .map(|token| token.trim_matches('.'))
            .filter(|token| token.len() >= 2 && !self.stop_words.contains(token))
            .map(str::to_string)
            .collect()
    }

    /// First "N years" style requirement in the text, if any.
    pub fn extract_years(&self, text: &str) -> Option<u32> {
        self.years_pattern
            .captures(text)
            .and_then(|caps| caps[1].parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_required_and_preferred_skills() {
        let extractor = KeywordExtractor::default();
        let keywords =
            extractor.extract("5+ years React, Node.js required. AWS preferred.");

        assert!(keywords.required_skills.contains("react"));
        assert!(keywords.required_skills.contains("node.js"));
        assert!(keywords.preferred_skills.contains("aws"));
        assert_eq!(keywords.years_required, Some(5));
    }

    #[test]
    fn test_skill_appears_in_exactly_one_bucket() {
        let extractor = KeywordExtractor::default();
        let keywords = extractor
            .extract("Python required. Python is a plus for data work. Docker preferred.");

        for skill in &keywords.required_skills {
            assert!(!keywords.preferred_skills.contains(skill));
        }
    }

    #[test]
    fn test_no_indicators_defaults_to_required() {
        let extractor = KeywordExtractor::default();
        let keywords = extractor.extract("We use TypeScript and GraphQL daily.");

        assert!(keywords.required_skills.contains("typescript"));
        assert!(keywords.required_skills.contains("graphql"));
        assert!(keywords.preferred_skills.is_empty());
    }

    #[test]
    fn test_symbol_bearing_terms_survive() {
        let extractor = KeywordExtractor::default();
        let keywords = extractor.extract("Looking for C++ and C# engineers with CI/CD background");

        assert!(keywords.required_skills.contains("c++"));
        assert!(keywords.required_skills.contains("c#"));
        assert!(keywords.required_skills.contains("ci/cd"));
    }

    #[test]
    fn test_soft_skills_and_education_terms() {
        let extractor = KeywordExtractor::default();
        let keywords = extractor
            .extract("Strong communication and problem-solving. Bachelor's degree required.");

        assert!(keywords.soft_skills.contains("communication"));
        assert!(keywords.soft_skills.contains("problem solving"));
        assert!(keywords.education_terms.contains("bachelor"));
        assert!(keywords.education_terms.contains("degree"));
    }

    #[test]
    fn test_empty_input_yields_empty_sets() {
        let extractor = KeywordExtractor::default();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("   \n\t ").is_empty());
    }

    #[test]
    fn test_plain_sentence_yields_no_skills() {
        let extractor = KeywordExtractor::default();
        let keywords = extractor.extract("We are a friendly company in a nice town.");
        assert_eq!(keywords.skill_count(), 0);
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        let extractor = KeywordExtractor::default();
        let tokens = extractor.tokenize("The quick C developer, and the node.js fan!");

        assert!(tokens.contains("quick"));
        assert!(tokens.contains("node.js"));
        assert!(!tokens.contains("the"));
        assert!(!tokens.contains("and"));
        // single char dropped
        assert!(!tokens.contains("c"));
    }

    #[test]
    fn test_years_pattern_variants() {
        let extractor = KeywordExtractor::default();
        assert_eq!(extractor.extract_years("requires 5+ years of react"), Some(5));
        assert_eq!(extractor.extract_years("3 years experience"), Some(3));
        assert_eq!(extractor.extract_years("no requirement here"), None);
    }

    #[test]
    fn test_reactjs_spelling_maps_to_react() {
        let extractor = KeywordExtractor::default();
        let keywords = extractor.extract("ReactJS required");
        assert!(keywords.required_skills.contains("react"));
    }
}
