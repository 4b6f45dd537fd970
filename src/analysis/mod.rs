// src/analysis/mod.rs
//! Semantic-analysis collaborator: result types, the remote client and
//! the plausibility pre-filter.

use crate::error::AnalysisError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod client;
pub mod validator;

pub use client::SemanticClient;
pub use validator::{DocumentValidator, Validity};

/// Score and feedback for one named analysis aspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectScore {
    pub score: u8,
    pub feedback: String,
}

/// Aspect names the analyzer is asked to score.
pub const ANALYSIS_ASPECTS: &[&str] = &[
    "technical_skills",
    "experience",
    "education",
    "soft_skills",
    "achievements",
];

/// Structured output of the semantic analysis service.
///
/// `is_fake` means the input failed the plausibility check; that is a
/// classified outcome, not a failure of the analysis pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall_score: u8,
    pub aspects: BTreeMap<String, AspectScore>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub summary: String,
    pub detailed_assessment: Option<String>,
    pub is_fake: bool,
    pub fake_reason: Option<String>,
}

impl AnalysisResult {
    fn uniform_aspects(score: u8, feedback: &str) -> BTreeMap<String, AspectScore> {
        ANALYSIS_ASPECTS
            .iter()
            .map(|name| {
                (
                    name.to_string(),
                    AspectScore {
                        score,
                        feedback: feedback.to_string(),
                    },
                )
            })
            .collect()
    }

    /// Neutral baseline used when the semantic service failed but the
    /// keyword path succeeded; the request still produces a displayable
    /// result.
    pub fn unavailable() -> Self {
        Self {
            overall_score: 50,
            aspects: Self::uniform_aspects(50, "Analysis unavailable"),
            strengths: vec!["Semantic analysis unavailable - keyword results only".to_string()],
            weaknesses: vec!["Semantic analysis unavailable - keyword results only".to_string()],
            summary: "Semantic analysis was unavailable for this request.".to_string(),
            detailed_assessment: None,
            is_fake: false,
            fake_reason: None,
        }
    }

    /// Result for input that failed the plausibility pre-filter.
    pub fn rejected(reason: &str, message: &str) -> Self {
        Self {
            overall_score: 0,
            aspects: Self::uniform_aspects(0, "Unable to analyze - invalid document"),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            summary: message.to_string(),
            detailed_assessment: Some(message.to_string()),
            is_fake: true,
            fake_reason: Some(reason.to_string()),
        }
    }
}

/// Boundary to the external semantic analysis. Behind a trait so the
/// pipeline can be unit-tested against mocks.
#[async_trait]
pub trait SemanticAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        job_text: &str,
        resume_text: &str,
    ) -> Result<AnalysisResult, AnalysisError>;
}

#[async_trait]
impl<T: SemanticAnalyzer + ?Sized> SemanticAnalyzer for &T {
    async fn analyze(
        &self,
        job_text: &str,
        resume_text: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        (**self).analyze(job_text, resume_text).await
    }
}

/// Generic completion boundary used by the rewrite flow.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn send_completion(&self, context: &str, content: &str)
        -> Result<String, AnalysisError>;
}

/// Stand-in analyzer for keyword-only deployments; every call reports
/// that no analyzer is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAnalyzer;

#[async_trait]
impl SemanticAnalyzer for DisabledAnalyzer {
    async fn analyze(
        &self,
        _job_text: &str,
        _resume_text: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        Err(AnalysisError::NotConfigured)
    }
}
