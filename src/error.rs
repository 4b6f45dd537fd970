// src/error.rs
use thiserror::Error;

/// Failures from the document text extractor.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file format: {0}. Supported formats: txt, text, md")]
    UnsupportedFormat(String),
    #[error("Document contains no extractable text")]
    EmptyDocument,
}

/// Failures from the semantic analysis service.
///
/// A fake/implausible document is NOT an error: it comes back as a
/// classified `AnalysisResult` with `is_fake` set.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Semantic analysis timed out after {0} seconds")]
    Timeout(u64),
    #[error("Semantic analysis request failed: {0}")]
    Transport(String),
    #[error("Semantic analysis returned malformed output: {0}")]
    MalformedResponse(String),
    #[error("Semantic analysis service error: {0}")]
    Service(String),
    #[error("No semantic analyzer configured for this request")]
    NotConfigured,
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AnalysisError::Timeout(crate::analysis::client::ANALYSIS_TIMEOUT_SECS)
        } else {
            AnalysisError::Transport(err.to_string())
        }
    }
}

/// Scoring configuration problems. Raised once at load time, fatal at
/// startup, never at request time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("{group} weights sum to {sum}, expected 1.0")]
    WeightSum { group: &'static str, sum: f64 },
}

/// Failures from the CV rewrite flow.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("Rewrite introduced entities not present in the original CV: {}", .0.join(", "))]
    FabricatedEntity(Vec<String>),
    #[error("Rewrite service returned malformed output: {0}")]
    MalformedResponse(String),
    #[error(transparent)]
    Service(#[from] AnalysisError),
}
