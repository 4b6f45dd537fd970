// src/scoring.rs
//! Merges the keyword signal and the semantic signal into one final
//! scored result. Pure functions, no I/O, deterministic for identical
//! inputs.

use crate::analysis::{AnalysisResult, AspectScore};
use crate::config::ScoringConfig;
use crate::keywords::KeywordAnalysis;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

const MAX_NARRATIVE_ITEMS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationLevel {
    #[serde(rename = "Excellent Match")]
    Excellent,
    #[serde(rename = "Good Match")]
    Good,
    #[serde(rename = "Moderate Match")]
    Moderate,
    #[serde(rename = "Low Match")]
    Low,
    #[serde(rename = "Poor Match")]
    Poor,
    #[serde(rename = "Invalid Document")]
    InvalidDocument,
}

impl std::fmt::Display for RecommendationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Excellent => "Excellent Match",
            Self::Good => "Good Match",
            Self::Moderate => "Moderate Match",
            Self::Low => "Low Match",
            Self::Poor => "Poor Match",
            Self::InvalidDocument => "Invalid Document",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub level: RecommendationLevel,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keyword_score: u8,
    pub ai_score: u8,
}

/// Merged output of one analysis request. Constructed fresh per request,
/// never persisted, immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalResult {
    pub final_score: u8,
    pub breakdown: ScoreBreakdown,
    pub aspects: BTreeMap<String, AspectScore>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendation: Recommendation,
    pub summary: String,
}

pub struct ScoreCalculator {
    config: ScoringConfig,
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl ScoreCalculator {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Merge the keyword analysis with the semantic analysis result.
    pub fn calculate(&self, keyword: &KeywordAnalysis, analysis: &AnalysisResult) -> FinalResult {
        if analysis.is_fake {
            return self.invalid_document(analysis);
        }

        let ai_score = self.effective_ai_score(analysis);
        let combined = keyword.match_percentage as f64 * self.config.scoring.keyword_weight
            + ai_score as f64 * self.config.scoring.ai_weight;
        let final_score = combined.round().clamp(0.0, 100.0) as u8;

        // Keyword aspects first; semantic aspects overwrite on collision.
        let mut aspects = keyword.aspects.clone();
        aspects.extend(
            analysis
                .aspects
                .iter()
                .map(|(name, aspect)| (name.clone(), aspect.clone())),
        );

        let strengths = merge_narratives(
            &keyword.strengths,
            &analysis.strengths,
            "No specific strengths identified",
        );
        let weaknesses = merge_narratives(
            &keyword.weaknesses,
            &analysis.weaknesses,
            "No specific weaknesses identified",
        );

        let summary = if analysis.summary.trim().is_empty() {
            format!(
                "Based on comprehensive analysis, the CV shows {}% alignment with the job requirements.",
                final_score
            )
        } else {
            analysis.summary.clone()
        };

        FinalResult {
            final_score,
            breakdown: ScoreBreakdown {
                keyword_score: keyword.match_percentage,
                ai_score,
            },
            aspects,
            strengths,
            weaknesses,
            recommendation: self.recommend(final_score),
            summary,
        }
    }

    /// Keyword-only mode: the additive weighted score is the final score
    /// and the semantic half of the breakdown is zeroed.
    pub fn calculate_keyword_only(&self, keyword: &KeywordAnalysis) -> FinalResult {
        let final_score = keyword.weighted_score;

        FinalResult {
            final_score,
            breakdown: ScoreBreakdown {
                keyword_score: keyword.weighted_score,
                ai_score: 0,
            },
            aspects: keyword.aspects.clone(),
            strengths: merge_narratives(&keyword.strengths, &[], "No specific strengths identified"),
            weaknesses: merge_narratives(
                &keyword.weaknesses,
                &[],
                "No specific weaknesses identified",
            ),
            recommendation: self.recommend(final_score),
            summary: format!(
                "Based on keyword analysis, the CV shows {}% alignment with the job requirements.",
                final_score
            ),
        }
    }

    /// Semantic-only mode: the keyword half of the breakdown is zeroed.
    pub fn calculate_semantic_only(&self, analysis: &AnalysisResult) -> FinalResult {
        if analysis.is_fake {
            return self.invalid_document(analysis);
        }

        let final_score = self.effective_ai_score(analysis);

        let summary = if analysis.summary.trim().is_empty() {
            format!(
                "Based on semantic analysis, the CV shows {}% alignment with the job requirements.",
                final_score
            )
        } else {
            analysis.summary.clone()
        };

        FinalResult {
            final_score,
            breakdown: ScoreBreakdown {
                keyword_score: 0,
                ai_score: final_score,
            },
            aspects: analysis.aspects.clone(),
            strengths: merge_narratives(&analysis.strengths, &[], "No specific strengths identified"),
            weaknesses: merge_narratives(
                &analysis.weaknesses,
                &[],
                "No specific weaknesses identified",
            ),
            recommendation: self.recommend(final_score),
            summary,
        }
    }

    /// The analyzer's own overall score when it provided one; otherwise
    /// derived from the per-aspect scores using the configured aspect
    /// weights, renormalized over the aspects actually present.
    fn effective_ai_score(&self, analysis: &AnalysisResult) -> u8 {
        if analysis.overall_score > 0 || analysis.aspects.is_empty() {
            return analysis.overall_score;
        }

        let get = |name: &str| analysis.aspects.get(name).map(|a| a.score as f64);
        let skills = match (get("technical_skills"), get("soft_skills")) {
            (Some(technical), Some(soft)) => Some((technical + soft) / 2.0),
            (Some(technical), None) => Some(technical),
            (None, Some(soft)) => Some(soft),
            (None, None) => None,
        };

        let weights = &self.config.aspects;
        let components = [
            (weights.skills_match, skills),
            (weights.experience_quality, get("experience")),
            (weights.education_fit, get("education")),
            (weights.career_growth, get("achievements")),
        ];

        let (sum, total) = components
            .iter()
            .fold((0.0, 0.0), |(sum, total), (weight, score)| match score {
                Some(score) => (sum + weight * score, total + weight),
                None => (sum, total),
            });

        if total > 0.0 {
            (sum / total).round().clamp(0.0, 100.0) as u8
        } else {
            0
        }
    }

    fn invalid_document(&self, analysis: &AnalysisResult) -> FinalResult {
        FinalResult {
            final_score: 0,
            breakdown: ScoreBreakdown {
                keyword_score: 0,
                ai_score: 0,
            },
            aspects: analysis.aspects.clone(),
            strengths: vec!["No analysis performed - invalid document".to_string()],
            weaknesses: vec!["No analysis performed - invalid document".to_string()],
            recommendation: Recommendation {
                level: RecommendationLevel::InvalidDocument,
                message: "The submitted document could not be analyzed. Please provide a \
                          genuine CV and job description."
                    .to_string(),
            },
            summary: analysis.summary.clone(),
        }
    }

    fn recommend(&self, score: u8) -> Recommendation {
        let thresholds = &self.config.thresholds;
        let (level, message) = if score >= thresholds.excellent {
            (
                RecommendationLevel::Excellent,
                "Your CV is an excellent match for this position. You have a strong chance \
                 of getting an interview.",
            )
        } else if score >= thresholds.good {
            (
                RecommendationLevel::Good,
                "Your CV shows good alignment with the job requirements. Consider \
                 highlighting relevant skills more prominently.",
            )
        } else if score >= thresholds.moderate {
            (
                RecommendationLevel::Moderate,
                "Your CV has some relevant qualifications but could be improved to better \
                 match the job requirements.",
            )
        } else if score >= thresholds.low {
            (
                RecommendationLevel::Low,
                "Your CV shows limited alignment with the job requirements. Consider \
                 significant improvements or targeting a different role.",
            )
        } else {
            (
                RecommendationLevel::Poor,
                "Your CV does not align well with this job. Consider focusing on roles that \
                 better match your experience.",
            )
        };

        Recommendation {
            level,
            message: message.to_string(),
        }
    }
}

/// Union of both sources, primary items first, deduplicated by exact
/// string equality and capped. Never returns an empty list.
fn merge_narratives(primary: &[String], secondary: &[String], placeholder: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for item in primary.iter().chain(secondary.iter()) {
        if seen.insert(item.as_str()) {
            merged.push(item.clone());
        }
    }

    merged.truncate(MAX_NARRATIVE_ITEMS);
    if merged.is_empty() {
        merged.push(placeholder.to_string());
    }
    merged
}
