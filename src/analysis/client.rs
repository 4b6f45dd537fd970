// src/analysis/client.rs
use super::validator::{DocumentValidator, Validity};
use super::{AnalysisResult, AspectScore, CompletionService, SemanticAnalyzer};
use crate::error::AnalysisError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use tracing::{error, info, warn};

/// Upper bound on one semantic-analysis call. The service call either
/// completes or fails fast; there are no automatic retries.
pub const ANALYSIS_TIMEOUT_SECS: u64 = 55;

#[derive(Debug, Clone, Serialize)]
struct SemanticMessage {
    context: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct SemanticRequest {
    messages: Vec<SemanticMessage>,
}

#[derive(Debug, Clone, Deserialize)]
struct SemanticResponse {
    message: String,
}

/// Raw analysis shape as returned by the service. Parsed defensively:
/// every field is optional and scores are clamped afterwards.
#[derive(Debug, Default, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    overall_score: f64,
    #[serde(default)]
    aspects: BTreeMap<String, RawAspect>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    detailed_assessment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAspect {
    #[serde(default)]
    score: f64,
    #[serde(default)]
    feedback: String,
}

pub struct SemanticClient {
    client: Client,
    api_key: String,
    base_url: String,
    validator: DocumentValidator,
}

impl SemanticClient {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("SEMANTIC_API_KEY")
            .context("SEMANTIC_API_KEY environment variable not set")?;

        let base_url =
            env::var("SEMANTIC_API_URL").unwrap_or_else(|_| "https://api0.ai".to_string());

        Self::new(base_url, api_key)
    }

    pub fn new(base_url: String, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(ANALYSIS_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url,
            validator: DocumentValidator::default(),
        })
    }

    fn build_analysis_prompt(job_text: &str, resume_text: &str) -> String {
        format!(
            r#"You are an expert CV and resume analyzer.

TASK: Analyze this CV against the job description.

JOB DESCRIPTION:
{}

CV:
{}

Provide JSON only:
{{
  "overall_score": <0-100>,
  "aspects": {{
    "technical_skills": {{"score": <0-100>, "feedback": "<specific feedback>"}},
    "experience": {{"score": <0-100>, "feedback": "<specific feedback>"}},
    "education": {{"score": <0-100>, "feedback": "<specific feedback>"}},
    "soft_skills": {{"score": <0-100>, "feedback": "<specific feedback>"}},
    "achievements": {{"score": <0-100>, "feedback": "<specific feedback>"}}
  }},
  "strengths": ["<strength 1>", "<strength 2>", "<strength 3>"],
  "weaknesses": ["<weakness 1>", "<weakness 2>", "<weakness 3>"],
  "summary": "<2-3 sentence honest summary>",
  "detailed_assessment": "<detailed paragraph explaining the overall fit>"
}}

RULES:
1. Be honest, do not inflate scores
2. Compare directly against the job description requirements
3. Strengths must list specific skills or experience that match the job description
4. Weaknesses must list specific requirements that are missing or weak
5. Always provide at least 3 strengths and 3 weaknesses
6. Be specific to this CV and job description, no generic feedback"#,
            job_text, resume_text
        )
    }

    fn parse_analysis(reply: &str) -> Result<AnalysisResult, AnalysisError> {
        let json = extract_json_object(reply).ok_or_else(|| {
            AnalysisError::MalformedResponse("no JSON object found in service reply".to_string())
        })?;

        let raw: RawAnalysis = serde_json::from_str(json)
            .map_err(|err| AnalysisError::MalformedResponse(err.to_string()))?;

        let aspects = raw
            .aspects
            .into_iter()
            .map(|(name, aspect)| {
                (
                    name,
                    AspectScore {
                        score: clamp_score(aspect.score),
                        feedback: aspect.feedback,
                    },
                )
            })
            .collect();

        let mut result = AnalysisResult {
            overall_score: clamp_score(raw.overall_score),
            aspects,
            strengths: raw.strengths,
            weaknesses: raw.weaknesses,
            summary: raw.summary,
            detailed_assessment: raw.detailed_assessment,
            is_fake: false,
            fake_reason: None,
        };

        if result.strengths.is_empty() {
            result
                .strengths
                .push("Unable to identify specific strengths".to_string());
        }
        if result.weaknesses.is_empty() {
            result
                .weaknesses
                .push("Unable to identify specific weaknesses".to_string());
        }

        Ok(result)
    }
}

#[async_trait]
impl CompletionService for SemanticClient {
    async fn send_completion(
        &self,
        context: &str,
        content: &str,
    ) -> Result<String, AnalysisError> {
        let request = SemanticRequest {
            messages: vec![SemanticMessage {
                context: context.to_string(),
                content: content.to_string(),
            }],
        };

        info!("Sending request to semantic API: {}", context);

        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Semantic API error {}: {}", status, error_text);
            return Err(AnalysisError::Service(format!(
                "semantic API returned {}: {}",
                status, error_text
            )));
        }

        let semantic_response: SemanticResponse = response
            .json()
            .await
            .map_err(|err| AnalysisError::MalformedResponse(err.to_string()))?;

        info!("Received response from semantic API");
        Ok(semantic_response.message)
    }
}

#[async_trait]
impl SemanticAnalyzer for SemanticClient {
    async fn analyze(
        &self,
        job_text: &str,
        resume_text: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        // Plausibility pre-filter: garbage input never reaches the network.
        if let Validity::Rejected { reason, message } = self.validator.check(resume_text, job_text)
        {
            warn!("Document rejected before analysis: {}", reason);
            return Ok(AnalysisResult::rejected(reason, message));
        }

        let prompt = Self::build_analysis_prompt(job_text, resume_text);
        let reply = self.send_completion("CV Match Analysis", &prompt).await?;
        Self::parse_analysis(&reply)
    }
}

fn clamp_score(score: f64) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}

/// First balanced JSON object in `text`, tolerating prose around it.
pub(crate) fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_object_with_surrounding_prose() {
        let reply = r#"Here is the analysis you asked for: {"overall_score": 72} hope it helps"#;
        assert_eq!(extract_json_object(reply), Some(r#"{"overall_score": 72}"#));
    }

    #[test]
    fn test_extract_json_object_nested_and_strings() {
        let reply = r#"{"aspects": {"experience": {"feedback": "uses {braces} and \"quotes\""}}}"#;
        assert_eq!(extract_json_object(reply), Some(reply));
    }

    #[test]
    fn test_extract_json_object_absent() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("unbalanced { brace"), None);
    }

    #[test]
    fn test_parse_analysis_clamps_and_backfills() {
        let reply = r#"{
            "overall_score": 140,
            "aspects": {"experience": {"score": -3, "feedback": "thin"}},
            "summary": "Decent fit."
        }"#;

        let result = SemanticClient::parse_analysis(reply).unwrap();
        assert_eq!(result.overall_score, 100);
        assert_eq!(result.aspects["experience"].score, 0);
        assert_eq!(
            result.strengths,
            ["Unable to identify specific strengths".to_string()]
        );
        assert_eq!(
            result.weaknesses,
            ["Unable to identify specific weaknesses".to_string()]
        );
        assert!(!result.is_fake);
    }

    #[test]
    fn test_parse_analysis_rejects_non_json() {
        assert!(matches!(
            SemanticClient::parse_analysis("the service is down"),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let result = SemanticClient::parse_analysis("{}").unwrap();
        assert_eq!(result.overall_score, 0);
        assert!(result.aspects.is_empty());
        assert!(result.summary.is_empty());
    }

    #[test]
    fn test_aspect_names_cover_prompt_contract() {
        // The prompt asks for exactly these aspect names; keep in sync.
        assert_eq!(
            crate::analysis::ANALYSIS_ASPECTS,
            &[
                "technical_skills",
                "experience",
                "education",
                "soft_skills",
                "achievements"
            ]
        );
    }
}
