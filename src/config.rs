// src/config.rs
//! Static scoring weight tables, loaded once at startup.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Top-level split between the deterministic keyword signal and the
/// semantic-analysis signal. Must sum to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalWeights {
    pub keyword_weight: f64,
    pub ai_weight: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            keyword_weight: 0.3,
            ai_weight: 0.7,
        }
    }
}

/// Per-aspect weights. Advisory when the analyzer returns its own
/// pre-weighted overall score. Must sum to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspectWeights {
    pub skills_match: f64,
    pub experience_quality: f64,
    pub education_fit: f64,
    pub career_growth: f64,
}

impl Default for AspectWeights {
    fn default() -> Self {
        Self {
            skills_match: 0.35,
            experience_quality: 0.30,
            education_fit: 0.15,
            career_growth: 0.20,
        }
    }
}

/// Point deltas for the additive keyword-scoring formula: baseline 50,
/// plus per exact match, plus per partial match, minus per missing
/// required skill, clamped to [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordPoints {
    pub exact_match_points: f64,
    pub partial_match_points: f64,
    pub missing_required_penalty: f64,
}

impl Default for KeywordPoints {
    fn default() -> Self {
        Self {
            exact_match_points: 10.0,
            partial_match_points: 5.0,
            missing_required_penalty: 8.0,
        }
    }
}

/// Multipliers applied to the additive keyword score based on how the
/// candidate's years of experience compare to the job requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceMultipliers {
    pub less_than_required: f64,
    pub meets_requirement: f64,
    pub exceeds_requirement: f64,
}

impl Default for ExperienceMultipliers {
    fn default() -> Self {
        Self {
            less_than_required: 0.6,
            meets_requirement: 1.0,
            exceeds_requirement: 1.2,
        }
    }
}

/// Final-score cutoffs for the recommendation tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreThresholds {
    pub excellent: u8,
    pub good: u8,
    pub moderate: u8,
    pub low: u8,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            excellent: 80,
            good: 65,
            moderate: 45,
            low: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub scoring: SignalWeights,
    #[serde(default)]
    pub aspects: AspectWeights,
    #[serde(default)]
    pub keywords: KeywordPoints,
    #[serde(default)]
    pub experience: ExperienceMultipliers,
    #[serde(default)]
    pub thresholds: ScoreThresholds,
}

impl ScoringConfig {
    /// Load weights from a YAML file and validate the sum invariants.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config: ScoringConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Check the sum-to-1 invariants on both weight groups.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let signal_sum = self.scoring.keyword_weight + self.scoring.ai_weight;
        if (signal_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum {
                group: "scoring",
                sum: signal_sum,
            });
        }

        let aspect_sum = self.aspects.skills_match
            + self.aspects.experience_quality
            + self.aspects.education_fit
            + self.aspects.career_growth;
        if (aspect_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum {
                group: "aspects",
                sum: aspect_sum,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_are_valid() {
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn test_signal_weights_must_sum_to_one() {
        let mut config = ScoringConfig::default();
        config.scoring.keyword_weight = 0.5;
        config.scoring.ai_weight = 0.7;

        match config.validate() {
            Err(ConfigError::WeightSum { group, sum }) => {
                assert_eq!(group, "scoring");
                assert!((sum - 1.2).abs() < 1e-9);
            }
            other => panic!("expected WeightSum error, got {:?}", other),
        }
    }

    #[test]
    fn test_aspect_weights_must_sum_to_one() {
        let mut config = ScoringConfig::default();
        config.aspects.career_growth = 0.5;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::WeightSum {
                group: "aspects",
                ..
            })
        ));
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let config: ScoringConfig =
            serde_yaml::from_str("scoring:\n  keyword_weight: 0.6\n  ai_weight: 0.4\n").unwrap();

        assert!((config.scoring.keyword_weight - 0.6).abs() < 1e-9);
        assert_eq!(config.thresholds.excellent, 80);
        assert!(config.validate().is_ok());
    }
}
