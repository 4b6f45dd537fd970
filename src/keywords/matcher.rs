// src/keywords/matcher.rs
//! Compares job-description keywords against resume text.

use super::{JobKeywordSet, KeywordExtractor, SynonymTable};
use crate::analysis::AspectScore;
use crate::config::ScoringConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MAX_GROUPED_TECH: usize = 5;
const MAX_GROUPED_SOFT: usize = 3;
const MAX_STRENGTH_CALLOUTS: usize = 3;
const MAX_WEAKNESS_CALLOUTS: usize = 4;

/// Core-stack terms used when grouping matched/missing skills into a
/// single narrative statement; skills outside this subset get individual
/// call-outs instead.
const CORE_STACK: &[&str] = &[
    "javascript",
    "typescript",
    "python",
    "java",
    "react",
    "angular",
    "vue",
    "node.js",
    "express",
    "sql",
    "mongodb",
    "aws",
    "docker",
    "kubernetes",
];

const ASPECT_TECH_TERMS: &[&str] = &[
    "javascript", "python", "java", "react", "node", "sql", "aws", "docker", "api", "database",
    "cloud", "web", "mobile", "software", "development",
];

const ASPECT_EXPERIENCE_TERMS: &[&str] = &[
    "years", "experience", "worked", "developed", "managed", "led", "built", "created",
    "implemented",
];

const ASPECT_EDUCATION_TERMS: &[&str] = &[
    "degree", "bachelor", "master", "phd", "university", "college", "certification", "certified",
];

/// A skill found only through a known synonym or spelling variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialMatch {
    pub skill: String,
    pub related_terms_found: Vec<String>,
}

/// Output of comparing a [`JobKeywordSet`] against resume text. The
/// three buckets partition the required+preferred skill set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchResult {
    pub exact_matches: Vec<String>,
    pub partial_matches: Vec<PartialMatch>,
    pub missing_skills: Vec<String>,
    pub experience_years_found: u32,
    pub experience_requirement_met: bool,
}

impl MatchResult {
    pub fn matched_count(&self) -> usize {
        self.exact_matches.len() + self.partial_matches.len()
    }

    /// Exact and partial skill names, in bucket order.
    pub fn matched_skills(&self) -> Vec<String> {
        self.exact_matches
            .iter()
            .cloned()
            .chain(self.partial_matches.iter().map(|p| p.skill.clone()))
            .collect()
    }
}

/// Full keyword-side analysis: the raw match result plus the scores and
/// narrative derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    pub keywords: JobKeywordSet,
    pub result: MatchResult,
    pub match_percentage: u8,
    pub weighted_score: u8,
    pub matched_soft_skills: Vec<String>,
    pub aspects: BTreeMap<String, AspectScore>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

pub struct KeywordMatcher {
    extractor: KeywordExtractor,
    synonyms: SynonymTable,
    config: ScoringConfig,
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(
            KeywordExtractor::default(),
            SynonymTable::default(),
            ScoringConfig::default(),
        )
    }
}

impl KeywordMatcher {
    pub fn new(extractor: KeywordExtractor, synonyms: SynonymTable, config: ScoringConfig) -> Self {
        Self {
            extractor,
            synonyms,
            config,
        }
    }

    /// Match a job description against resume text. Pure string
    /// processing; never fails for well-formed input.
    pub fn match_documents(&self, job_text: &str, resume_text: &str) -> KeywordAnalysis {
        let keywords = self.extractor.extract(job_text);
        let job_lower = job_text.to_lowercase();
        let resume_lower = resume_text.to_lowercase();

        let mut exact_matches = Vec::new();
        let mut partial_matches = Vec::new();
        let mut missing_skills = Vec::new();

        for skill in keywords.all_skills() {
            if term_present(&resume_lower, skill) {
                exact_matches.push(skill.clone());
                continue;
            }

            let related: Vec<String> = self
                .synonyms
                .variants_for(skill)
                .iter()
                .filter(|variant| term_present(&resume_lower, variant.as_str()))
                .cloned()
                .collect();

            if related.is_empty() {
                missing_skills.push(skill.clone());
            } else {
                partial_matches.push(PartialMatch {
                    skill: skill.clone(),
                    related_terms_found: related,
                });
            }
        }

        let experience_years_found = self.extractor.extract_years(&resume_lower).unwrap_or(0);
        let experience_requirement_met = keywords
            .years_required
            .map_or(true, |required| experience_years_found >= required);

        let result = MatchResult {
            exact_matches,
            partial_matches,
            missing_skills,
            experience_years_found,
            experience_requirement_met,
        };

        let total = keywords.skill_count();
        let match_percentage = if total == 0 {
            0
        } else {
            ((result.matched_count() as f64 / total as f64) * 100.0).round() as u8
        };

        let weighted_score = self.weighted_score(&result, &keywords);

        let matched_soft_skills: Vec<String> = keywords
            .soft_skills
            .iter()
            .filter(|skill| {
                let skill = skill.as_str();
                term_present(&resume_lower, skill)
                    || self
                        .synonyms
                        .variants_for(skill)
                        .iter()
                        .any(|variant| term_present(&resume_lower, variant.as_str()))
            })
            .cloned()
            .collect();

        let strengths = self.build_strengths(&result, &keywords, &matched_soft_skills);
        let weaknesses = self.build_weaknesses(&result, &keywords, &matched_soft_skills);
        let aspects = self.build_aspects(&job_lower, &resume_lower);

        KeywordAnalysis {
            keywords,
            result,
            match_percentage,
            weighted_score,
            matched_soft_skills,
            aspects,
            strengths,
            weaknesses,
        }
    }

    /// Additive scoring formula: baseline 50, points per exact and
    /// partial match, penalty per missing required skill, clamped to
    /// [0, 100], then adjusted by the experience multiplier.
    fn weighted_score(&self, result: &MatchResult, keywords: &JobKeywordSet) -> u8 {
        let points = &self.config.keywords;
        let missing_required = result
            .missing_skills
            .iter()
            .filter(|skill| keywords.required_skills.contains(*skill))
            .count();

        let raw = 50.0
            + points.exact_match_points * result.exact_matches.len() as f64
            + points.partial_match_points * result.partial_matches.len() as f64
            - points.missing_required_penalty * missing_required as f64;

        let multiplier = match keywords.years_required {
            None => 1.0,
            Some(required) => {
                let found = result.experience_years_found as f64;
                let required = required as f64;
                if found < required {
                    self.config.experience.less_than_required
                } else if found >= required * 1.5 {
                    self.config.experience.exceeds_requirement
                } else {
                    self.config.experience.meets_requirement
                }
            }
        };

        (raw.clamp(0.0, 100.0) * multiplier).clamp(0.0, 100.0).round() as u8
    }

    fn build_strengths(
        &self,
        result: &MatchResult,
        keywords: &JobKeywordSet,
        matched_soft: &[String],
    ) -> Vec<String> {
        let matched = result.matched_skills();
        let mut strengths = Vec::new();

        let core: Vec<&String> = matched
            .iter()
            .filter(|skill| CORE_STACK.contains(&skill.as_str()))
            .collect();
        if !core.is_empty() {
            let listed: Vec<&str> = core
                .iter()
                .take(MAX_GROUPED_TECH)
                .map(|s| s.as_str())
                .collect();
            strengths.push(format!(
                "Strong technical skills matching: {}",
                listed.join(", ")
            ));
        }

        if !matched_soft.is_empty() {
            let listed: Vec<&str> = matched_soft
                .iter()
                .take(MAX_GROUPED_SOFT)
                .map(|s| s.as_str())
                .collect();
            strengths.push(format!("Demonstrates key soft skills: {}", listed.join(", ")));
        }

        if keywords.years_required.is_some() && result.experience_requirement_met {
            strengths.push("Relevant experience level matching job requirements".to_string());
        }

        let matched_count = result.matched_count();
        if matched_count >= 15 {
            strengths.push(format!(
                "Excellent keyword coverage ({} matches)",
                matched_count
            ));
        } else if matched_count >= 10 {
            strengths.push("Good keyword alignment with job description".to_string());
        }

        for skill in matched.iter().take(MAX_STRENGTH_CALLOUTS) {
            let already_cited = strengths
                .iter()
                .any(|statement| statement.to_lowercase().contains(&skill.to_lowercase()));
            if !already_cited {
                strengths.push(format!("CV includes required skill: {}", skill));
            }
        }

        if strengths.is_empty() {
            strengths.push("Some relevant keywords found in CV".to_string());
        }
        strengths
    }

    fn build_weaknesses(
        &self,
        result: &MatchResult,
        keywords: &JobKeywordSet,
        matched_soft: &[String],
    ) -> Vec<String> {
        let mut weaknesses = Vec::new();

        let core_missing: Vec<&String> = result
            .missing_skills
            .iter()
            .filter(|skill| CORE_STACK.contains(&skill.as_str()))
            .collect();
        if !core_missing.is_empty() {
            let listed: Vec<&str> = core_missing
                .iter()
                .take(MAX_GROUPED_TECH)
                .map(|s| s.as_str())
                .collect();
            weaknesses.push(format!("Missing technical skills: {}", listed.join(", ")));
        }

        let missing_soft: Vec<&str> = keywords
            .soft_skills
            .iter()
            .filter(|skill| !matched_soft.contains(*skill))
            .map(|s| s.as_str())
            .take(MAX_GROUPED_SOFT)
            .collect();
        if !missing_soft.is_empty() {
            weaknesses.push(format!("Missing soft skills: {}", missing_soft.join(", ")));
        }

        let missing_count = result.missing_skills.len();
        if missing_count >= 15 {
            weaknesses.push(format!(
                "Significant keyword gaps ({} missing keywords)",
                missing_count
            ));
        } else if missing_count >= 8 {
            weaknesses.push("Multiple missing keywords from job requirements".to_string());
        }

        let missing_required = result
            .missing_skills
            .iter()
            .filter(|skill| keywords.required_skills.contains(*skill))
            .count();
        if missing_required >= 4 {
            weaknesses.push(format!(
                "CV is missing {} of {} required skills",
                missing_required,
                keywords.required_skills.len()
            ));
        }

        for skill in result.missing_skills.iter().take(MAX_WEAKNESS_CALLOUTS) {
            let already_cited = weaknesses
                .iter()
                .any(|statement| statement.to_lowercase().contains(&skill.to_lowercase()));
            if !already_cited {
                weaknesses.push(format!("CV missing required keyword: {}", skill));
            }
        }

        if weaknesses.is_empty() {
            weaknesses
                .push("Some job requirements not explicitly mentioned in CV".to_string());
        }
        weaknesses
    }

    /// Keyword-side aspect scores. The semantic analyzer produces richer
    /// versions of the same aspects and overwrites these on merge.
    fn build_aspects(&self, job_lower: &str, resume_lower: &str) -> BTreeMap<String, AspectScore> {
        let mut aspects = BTreeMap::new();

        let job_tech: Vec<&&str> = ASPECT_TECH_TERMS
            .iter()
            .filter(|term| job_lower.contains(**term))
            .collect();
        let tech_score = if job_tech.is_empty() {
            50
        } else {
            let overlap = job_tech
                .iter()
                .filter(|term| resume_lower.contains(***term))
                .count();
            ((overlap as f64 / job_tech.len() as f64) * 100.0).round().min(100.0) as u8
        };
        let tech_feedback = if tech_score >= 70 {
            "Strong technical skill alignment"
        } else if tech_score >= 40 {
            "Moderate technical match - some gaps exist"
        } else {
            "Significant technical skill gaps"
        };
        aspects.insert(
            "technical_skills".to_string(),
            AspectScore {
                score: tech_score,
                feedback: tech_feedback.to_string(),
            },
        );

        let experience_hits = ASPECT_EXPERIENCE_TERMS
            .iter()
            .filter(|term| resume_lower.contains(**term))
            .count();
        let experience_score = (experience_hits * 12).min(100) as u8;
        let experience_feedback = if experience_score >= 70 {
            "CV demonstrates substantial relevant experience"
        } else if experience_score >= 40 {
            "Some experience shown but could be more detailed"
        } else {
            "Limited experience demonstrated"
        };
        aspects.insert(
            "experience".to_string(),
            AspectScore {
                score: experience_score,
                feedback: experience_feedback.to_string(),
            },
        );

        let education_hits = ASPECT_EDUCATION_TERMS
            .iter()
            .filter(|term| resume_lower.contains(**term))
            .count();
        let education_score = (education_hits * 15).min(100) as u8;
        let education_feedback = if education_score >= 60 {
            "Education requirements appear to be met"
        } else {
            "Consider highlighting relevant education or certifications"
        };
        aspects.insert(
            "education".to_string(),
            AspectScore {
                score: education_score,
                feedback: education_feedback.to_string(),
            },
        );

        aspects
    }
}

/// Case-insensitive whole-term presence check. Both arguments must
/// already be lowercased; a hit requires non-alphanumeric (or absent)
/// neighbors so "react" never matches inside "reactjs".
pub(crate) fn term_present(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }

    for (idx, _) in haystack.match_indices(term) {
        let before_ok = haystack[..idx]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after = idx + term.len();
        let after_ok = haystack[after..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn matcher() -> KeywordMatcher {
        KeywordMatcher::default()
    }

    #[test]
    fn test_term_present_respects_boundaries() {
        assert!(term_present("built with react and go", "react"));
        assert!(!term_present("built with reactjs", "react"));
        assert!(term_present("uses node.js heavily", "node.js"));
        assert!(term_present("knows c++ well", "c++"));
    }

    #[test]
    fn test_synonym_scenario_react_vs_reactjs() {
        let analysis = matcher().match_documents(
            "5+ years React, Node.js required. AWS preferred.",
            "3 years of ReactJS development",
        );

        assert!(analysis.result.exact_matches.is_empty());
        let partial: Vec<&str> = analysis
            .result
            .partial_matches
            .iter()
            .map(|p| p.skill.as_str())
            .collect();
        assert_eq!(partial, ["react"]);
        assert!(analysis.result.partial_matches[0]
            .related_terms_found
            .contains(&"reactjs".to_string()));

        assert!(analysis
            .result
            .missing_skills
            .contains(&"node.js".to_string()));
        assert!(analysis.result.missing_skills.contains(&"aws".to_string()));

        assert_eq!(analysis.result.experience_years_found, 3);
        assert!(!analysis.result.experience_requirement_met);
    }

    #[test]
    fn test_buckets_partition_the_skill_set() {
        let analysis = matcher().match_documents(
            "Python, Docker and Kubernetes required. GraphQL preferred.",
            "Python developer using k8s in production",
        );

        let mut seen = BTreeSet::new();
        for skill in analysis
            .result
            .exact_matches
            .iter()
            .chain(analysis.result.partial_matches.iter().map(|p| &p.skill))
            .chain(analysis.result.missing_skills.iter())
        {
            assert!(seen.insert(skill.clone()), "{} in two buckets", skill);
        }

        let expected: BTreeSet<String> = analysis.keywords.all_skills().cloned().collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_zero_keywords_means_zero_percentage() {
        let analysis = matcher().match_documents(
            "We are a friendly company in a nice town.",
            "Experienced engineer with many skills",
        );

        assert_eq!(analysis.keywords.skill_count(), 0);
        assert_eq!(analysis.match_percentage, 0);
    }

    #[test]
    fn test_match_percentage_rounding() {
        // 1 matched of 3 skills = 33%
        let analysis = matcher().match_documents(
            "React, Node.js and AWS required",
            "I have used React in production",
        );

        assert_eq!(analysis.keywords.skill_count(), 3);
        assert_eq!(analysis.result.matched_count(), 1);
        assert_eq!(analysis.match_percentage, 33);
    }

    #[test]
    fn test_narratives_never_empty() {
        let analysis = matcher().match_documents("plain text without skills", "another plain text");
        assert!(!analysis.strengths.is_empty());
        assert!(!analysis.weaknesses.is_empty());

        let full_match = matcher().match_documents("React required", "React expert");
        assert!(!full_match.strengths.is_empty());
        assert!(!full_match.weaknesses.is_empty());
    }

    #[test]
    fn test_weighted_score_applies_experience_penalty() {
        // One exact match, no missing required, requirement not met:
        // (50 + 10) * 0.6 = 36
        let analysis = matcher().match_documents(
            "5+ years of React required",
            "2 years of React work",
        );
        assert_eq!(analysis.weighted_score, 36);
    }

    #[test]
    fn test_weighted_score_exceeding_experience_bonus() {
        // (50 + 10) * 1.2 = 72 when found >= 1.5x required
        let analysis = matcher().match_documents(
            "2 years of React required",
            "6 years of React work",
        );
        assert_eq!(analysis.weighted_score, 72);
    }

    #[test]
    fn test_weighted_score_clamped() {
        let analysis = matcher().match_documents(
            "React, Angular, Vue, Python, Java, Docker, Kubernetes, SQL, AWS, GCP required",
            "React Angular Vue Python Java Docker Kubernetes SQL AWS GCP expert",
        );
        assert!(analysis.weighted_score <= 100);
    }

    #[test]
    fn test_missing_required_red_flag() {
        let analysis = matcher().match_documents(
            "Python, Java, Docker, Kubernetes and Redis required",
            "I write excellent cover letters",
        );

        assert!(analysis
            .weaknesses
            .iter()
            .any(|w| w.contains("required skills")));
    }

    #[test]
    fn test_experience_trivially_met_without_requirement() {
        let analysis = matcher().match_documents("React required", "React developer");
        assert!(analysis.result.experience_requirement_met);
        assert_eq!(analysis.result.experience_years_found, 0);
    }

    #[test]
    fn test_keyword_aspects_present() {
        let analysis = matcher().match_documents(
            "Python and SQL required for web development",
            "Python developer, 4 years experience, bachelor degree",
        );

        assert!(analysis.aspects.contains_key("technical_skills"));
        assert!(analysis.aspects.contains_key("experience"));
        assert!(analysis.aspects.contains_key("education"));
        for aspect in analysis.aspects.values() {
            assert!(aspect.score <= 100);
        }
    }
}
