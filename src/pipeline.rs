// src/pipeline.rs
//! Orchestrates one analysis request: the keyword path and the semantic
//! path run concurrently, the calculator merges both.

use crate::analysis::{AnalysisResult, SemanticAnalyzer};
use crate::error::AnalysisError;
use crate::keywords::KeywordMatcher;
use crate::scoring::{FinalResult, ScoreCalculator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Keyword and semantic paths merged (default).
    Combined,
    /// Deterministic keyword path only.
    KeywordOnly,
    /// Semantic analysis only.
    SemanticOnly,
}

/// One finished analysis request. The id and timestamp are attached
/// here, never by the pure calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub mode: AnalysisMode,
    pub result: FinalResult,
}

/// Analysis pipeline with constructor-injected collaborators. Stateless
/// across requests; the only process-wide state is the read-only weight
/// configuration inside the matcher and calculator.
pub struct MatchPipeline<A: SemanticAnalyzer> {
    matcher: KeywordMatcher,
    analyzer: A,
    calculator: ScoreCalculator,
    semantic_timeout: Duration,
}

impl<A: SemanticAnalyzer> MatchPipeline<A> {
    pub fn new(matcher: KeywordMatcher, analyzer: A, calculator: ScoreCalculator) -> Self {
        Self {
            matcher,
            analyzer,
            calculator,
            semantic_timeout: Duration::from_secs(crate::analysis::client::ANALYSIS_TIMEOUT_SECS),
        }
    }

    pub fn with_semantic_timeout(mut self, timeout: Duration) -> Self {
        self.semantic_timeout = timeout;
        self
    }

    /// Run one analysis. In combined mode a semantic failure degrades to
    /// the neutral baseline instead of failing the request; in
    /// semantic-only mode the failure propagates.
    pub async fn analyze(
        &self,
        job_text: &str,
        resume_text: &str,
        mode: AnalysisMode,
    ) -> Result<MatchReport, AnalysisError> {
        let result = match mode {
            AnalysisMode::KeywordOnly => {
                let keyword = self.matcher.match_documents(job_text, resume_text);
                self.calculator.calculate_keyword_only(&keyword)
            }
            AnalysisMode::SemanticOnly => {
                let analysis = self.run_semantic(job_text, resume_text).await?;
                self.calculator.calculate_semantic_only(&analysis)
            }
            AnalysisMode::Combined => {
                let (keyword, semantic) = tokio::join!(
                    async { self.matcher.match_documents(job_text, resume_text) },
                    self.run_semantic(job_text, resume_text),
                );

                let analysis = match semantic {
                    Ok(analysis) => analysis,
                    Err(err) => {
                        warn!(
                            "Semantic analysis failed, returning keyword-based result with \
                             neutral baseline: {}",
                            err
                        );
                        AnalysisResult::unavailable()
                    }
                };

                self.calculator.calculate(&keyword, &analysis)
            }
        };

        let report = MatchReport {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            mode,
            result,
        };

        info!(
            "Analysis {} finished with final score {}",
            report.id, report.result.final_score
        );
        Ok(report)
    }

    async fn run_semantic(
        &self,
        job_text: &str,
        resume_text: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        match tokio::time::timeout(
            self.semantic_timeout,
            self.analyzer.analyze(job_text, resume_text),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(AnalysisError::Timeout(self.semantic_timeout.as_secs())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DisabledAnalyzer;
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    struct StaticAnalyzer {
        score: u8,
    }

    #[async_trait]
    impl SemanticAnalyzer for StaticAnalyzer {
        async fn analyze(
            &self,
            _job_text: &str,
            _resume_text: &str,
        ) -> Result<AnalysisResult, AnalysisError> {
            Ok(AnalysisResult {
                overall_score: self.score,
                aspects: BTreeMap::new(),
                strengths: vec!["Clear delivery record".to_string()],
                weaknesses: vec!["Sparse education section".to_string()],
                summary: String::new(),
                detailed_assessment: None,
                is_fake: false,
                fake_reason: None,
            })
        }
    }

    struct FailingAnalyzer;

    #[async_trait]
    impl SemanticAnalyzer for FailingAnalyzer {
        async fn analyze(
            &self,
            _job_text: &str,
            _resume_text: &str,
        ) -> Result<AnalysisResult, AnalysisError> {
            Err(AnalysisError::Service("boom".to_string()))
        }
    }

    struct HangingAnalyzer;

    #[async_trait]
    impl SemanticAnalyzer for HangingAnalyzer {
        async fn analyze(
            &self,
            _job_text: &str,
            _resume_text: &str,
        ) -> Result<AnalysisResult, AnalysisError> {
            tokio::time::sleep(Duration::from_secs(600)).await;
            unreachable!("sleep outlives every test timeout")
        }
    }

    fn pipeline<A: SemanticAnalyzer>(analyzer: A) -> MatchPipeline<A> {
        MatchPipeline::new(
            KeywordMatcher::default(),
            analyzer,
            ScoreCalculator::default(),
        )
    }

    #[tokio::test]
    async fn test_combined_mode_merges_both_signals() {
        let report = pipeline(StaticAnalyzer { score: 60 })
            .analyze("React required", "React expert for years", AnalysisMode::Combined)
            .await
            .unwrap();

        assert_eq!(report.mode, AnalysisMode::Combined);
        assert_eq!(report.result.breakdown.ai_score, 60);
        assert_eq!(report.result.breakdown.keyword_score, 100);
        // 100 * 0.3 + 60 * 0.7 = 72
        assert_eq!(report.result.final_score, 72);
    }

    #[tokio::test]
    async fn test_combined_mode_degrades_on_service_failure() {
        let report = pipeline(FailingAnalyzer)
            .analyze("React required", "React expert", AnalysisMode::Combined)
            .await
            .unwrap();

        // neutral baseline instead of a failed request
        assert_eq!(report.result.breakdown.ai_score, 50);
        assert!(report
            .result
            .strengths
            .iter()
            .any(|s| s.contains("unavailable")));
    }

    #[tokio::test]
    async fn test_combined_mode_degrades_on_timeout() {
        let report = pipeline(HangingAnalyzer)
            .with_semantic_timeout(Duration::from_millis(20))
            .analyze("React required", "React expert", AnalysisMode::Combined)
            .await
            .unwrap();

        assert_eq!(report.result.breakdown.ai_score, 50);
    }

    #[tokio::test]
    async fn test_semantic_only_timeout_propagates() {
        let err = pipeline(HangingAnalyzer)
            .with_semantic_timeout(Duration::from_millis(20))
            .analyze("React required", "React expert", AnalysisMode::SemanticOnly)
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_keyword_only_mode_never_touches_analyzer() {
        let report = pipeline(DisabledAnalyzer)
            .analyze("React required", "React expert", AnalysisMode::KeywordOnly)
            .await
            .unwrap();

        assert_eq!(report.result.breakdown.ai_score, 0);
        assert!(report.result.final_score > 0);
    }

    #[tokio::test]
    async fn test_semantic_only_propagates_service_error() {
        let err = pipeline(FailingAnalyzer)
            .analyze("React required", "React expert", AnalysisMode::SemanticOnly)
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Service(_)));
    }
}
