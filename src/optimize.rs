// src/optimize.rs
//! CV rewrite advisor. Builds the rewrite directive for the semantic
//! service and structurally enforces the truthfulness contract on the
//! reply: the rewritten CV may not name employers, institutions, degrees
//! or certifications absent from the original.

use crate::analysis::client::extract_json_object;
use crate::analysis::CompletionService;
use crate::error::OptimizeError;
use crate::scoring::FinalResult;
use serde::{Deserialize, Serialize};
use tracing::info;

const MAX_JOB_EXCERPT_CHARS: usize = 3000;
const MAX_RESUME_EXCERPT_CHARS: usize = 4000;
const AGGRESSIVE_SCORE_CAP: u8 = 85;
const MAX_CITED_WEAKNESSES: usize = 3;

/// The two rewrite levels differ only in constraint strictness, not in
/// mechanism; both forbid fabricated employers, titles or credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewriteLevel {
    Honest,
    Aggressive,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillGroups {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub duration: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
}

/// Structured rewritten CV returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewrittenCv {
    pub contact_info: ContactInfo,
    pub summary: String,
    #[serde(default)]
    pub skills: SkillGroups,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteOutcome {
    pub rewritten_cv: RewrittenCv,
    #[serde(default)]
    pub changes: Vec<String>,
    #[serde(default)]
    pub expected_score: u8,
    #[serde(default)]
    pub keywords_added: Vec<String>,
    #[serde(default)]
    pub honest_assessment: String,
}

pub struct OptimizationAdvisor {
    level: RewriteLevel,
}

impl OptimizationAdvisor {
    pub fn new(level: RewriteLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> RewriteLevel {
        self.level
    }

    /// Request a rewrite from the completion service and verify the
    /// truthfulness contract on the parsed reply.
    pub async fn request_rewrite<C: CompletionService>(
        &self,
        service: &C,
        job_text: &str,
        resume_text: &str,
        current: &FinalResult,
    ) -> Result<RewriteOutcome, OptimizeError> {
        let directive = self.build_directive(job_text, resume_text, current);

        info!("Requesting {:?} CV rewrite", self.level);
        let reply = service.send_completion("CV Rewrite", &directive).await?;

        let mut outcome = parse_rewrite(&reply)?;
        if self.level == RewriteLevel::Aggressive {
            outcome.expected_score = outcome.expected_score.min(AGGRESSIVE_SCORE_CAP);
        }

        verify_rewrite(resume_text, &outcome.rewritten_cv)?;
        Ok(outcome)
    }

    /// Rewrite instruction handed to the semantic service. The two
    /// levels share the whole directive apart from the rules block.
    pub fn build_directive(
        &self,
        job_text: &str,
        resume_text: &str,
        current: &FinalResult,
    ) -> String {
        let rules = match self.level {
            RewriteLevel::Honest => {
                "STRICT RULES FOR HONEST REWRITING:\n\
                 - Do not fabricate any experience, skills, or achievements\n\
                 - Do not add skills the candidate has not demonstrated\n\
                 - Do not exaggerate years of experience or seniority\n\
                 - Only reword and reorganize existing information\n\
                 - Use job description keywords only where they genuinely match the candidate's background"
            }
            RewriteLevel::Aggressive => {
                "RULES FOR AGGRESSIVE REWRITING:\n\
                 - Emphasize and expand on existing experience heavily\n\
                 - Use strong action verbs and impactful language\n\
                 - Add job description keywords wherever the candidate has any related experience\n\
                 - Frame existing experience in the most impressive way possible\n\
                 - Never fabricate employers, titles, or credentials"
            }
        };

        let weaknesses: Vec<&str> = current
            .weaknesses
            .iter()
            .take(MAX_CITED_WEAKNESSES)
            .map(String::as_str)
            .collect();

        format!(
            r#"You are an expert CV writer. Rewrite this CV to better match the job description.

{rules}

CONSTRAINTS THAT ALWAYS APPLY:
- Keep the name, contact details, company names, institution names, degrees and employment dates exactly as in the original
- Keep the format simple, clean and ATS-friendly
- Reorder content so the most relevant experience comes first

CURRENT ANALYSIS:
- Score: {score}%
- Weaknesses identified: {weaknesses}

JOB DESCRIPTION:
{job}

ORIGINAL CV:
{resume}

Return only valid JSON:
{{
  "rewritten_cv": {{
    "contact_info": {{"name": "...", "email": "...", "phone": "...", "location": "...", "linkedin": "...", "github": "..."}},
    "summary": "<professional summary aligned with the job description>",
    "skills": {{"technical": ["..."], "soft": ["..."]}},
    "experience": [{{"title": "...", "company": "...", "location": "...", "duration": "...", "achievements": ["..."]}}],
    "education": [{{"degree": "...", "institution": "...", "year": "...", "details": "..."}}],
    "projects": [{{"name": "...", "description": "...", "technologies": ["..."]}}],
    "certifications": ["..."]
  }},
  "changes": ["<specific change>", "<specific change>", "<specific change>"],
  "expected_score": <realistic expected score, do not inflate>,
  "keywords_added": ["<keyword genuinely applicable>"],
  "honest_assessment": "<1-2 sentences about the realistic fit>"
}}"#,
            rules = rules,
            score = current.final_score,
            weaknesses = weaknesses.join("; "),
            job = truncate_chars(job_text, MAX_JOB_EXCERPT_CHARS),
            resume = truncate_chars(resume_text, MAX_RESUME_EXCERPT_CHARS),
        )
    }
}

/// Parse the service reply, tolerating prose around the JSON object.
fn parse_rewrite(reply: &str) -> Result<RewriteOutcome, OptimizeError> {
    let json = extract_json_object(reply).ok_or_else(|| {
        OptimizeError::MalformedResponse("no JSON object found in rewrite reply".to_string())
    })?;

    serde_json::from_str(json).map_err(|err| OptimizeError::MalformedResponse(err.to_string()))
}

/// Enforce the truthfulness contract structurally: every employer,
/// institution, degree and certification named in the rewrite must be
/// present in the original resume text.
pub fn verify_rewrite(
    original_resume: &str,
    rewritten: &RewrittenCv,
) -> Result<(), OptimizeError> {
    let original = normalize_for_lookup(original_resume);
    let mut fabricated = Vec::new();

    let mut check = |entity: &str| {
        let needle = normalize_for_lookup(entity);
        if !needle.is_empty() && !original.contains(&needle) {
            fabricated.push(entity.to_string());
        }
    };

    for entry in &rewritten.experience {
        check(&entry.company);
    }
    for entry in &rewritten.education {
        check(&entry.institution);
        check(&entry.degree);
    }
    for certification in &rewritten.certifications {
        check(certification);
    }

    if fabricated.is_empty() {
        Ok(())
    } else {
        Err(OptimizeError::FabricatedEntity(fabricated))
    }
}

fn normalize_for_lookup(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
