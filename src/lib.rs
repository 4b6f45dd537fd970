//! Hybrid CV / job-description match scoring.
//!
//! A deterministic keyword signal and an external semantic-analysis
//! signal run independently over the same (job text, resume text) pair;
//! the score calculator merges both into one final score with a
//! human-readable recommendation.

pub mod analysis;
pub mod config;
pub mod error;
pub mod extract;
pub mod keywords;
pub mod optimize;
pub mod pipeline;
pub mod scoring;

pub use analysis::{
    AnalysisResult, AspectScore, CompletionService, DisabledAnalyzer, SemanticAnalyzer,
    SemanticClient,
};
pub use config::ScoringConfig;
pub use error::{AnalysisError, ConfigError, ExtractionError, OptimizeError};
pub use extract::{PlainTextExtractor, TextExtractor};
pub use keywords::{
    JobKeywordSet, KeywordAnalysis, KeywordExtractor, KeywordMatcher, MatchResult, SynonymTable,
};
pub use optimize::{OptimizationAdvisor, RewriteLevel, RewriteOutcome};
pub use pipeline::{AnalysisMode, MatchPipeline, MatchReport};
pub use scoring::{FinalResult, Recommendation, RecommendationLevel, ScoreCalculator};
