// src/analysis/validator.rs
//! Plausibility pre-filter for submitted documents.
//!
//! Runs before any network call so obviously fabricated or garbage input
//! never reaches the semantic service. Each rule yields a stable reason
//! code; the first failing rule wins.

use regex::Regex;

const MIN_CV_LENGTH: usize = 100;
const MIN_JD_LENGTH: usize = 50;
const MAX_CHAR_RUN: usize = 10;
const MIN_VOCABULARY_HITS: usize = 2;

/// Vocabulary a genuine CV is expected to touch.
const CV_VOCABULARY: &[&str] = &[
    "experience",
    "education",
    "skills",
    "work",
    "job",
    "company",
    "university",
    "college",
    "degree",
    "project",
    "team",
    "manage",
    "develop",
    "create",
    "lead",
    "responsible",
    "year",
    "month",
    "resume",
    "cv",
    "professional",
    "summary",
    "objective",
    "contact",
    "email",
    "phone",
];

/// Vocabulary a genuine job description is expected to touch.
const JD_VOCABULARY: &[&str] = &[
    "position",
    "role",
    "responsibility",
    "requirement",
    "qualification",
    "experience",
    "skill",
    "team",
    "company",
    "work",
    "candidate",
    "apply",
    "job",
    "salary",
    "benefit",
    "looking",
    "hire",
    "opportunity",
    "description",
    "duties",
];

/// Outcome of the pre-filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Rejected {
        reason: &'static str,
        message: &'static str,
    },
}

pub struct DocumentValidator {
    gibberish: Regex,
    story: Regex,
}

impl Default for DocumentValidator {
    fn default() -> Self {
        Self {
            gibberish: Regex::new(
                r"(?i)^[a-z]{20,}$|asdf|qwerty|lorem ipsum|test123|abc123|zzzzz|xxxxx|aaaaaa|jjjjj",
            )
            .expect("invalid gibberish pattern"),
            story: Regex::new(r"(?i)once upon a time|the end\b|chapter \d|verse \d|\bchorus\b|\blyrics\b")
                .expect("invalid story pattern"),
        }
    }
}

impl DocumentValidator {
    pub fn check(&self, resume_text: &str, job_text: &str) -> Validity {
        if resume_text.len() < MIN_CV_LENGTH {
            return Validity::Rejected {
                reason: "cv_too_short",
                message:
                    "The CV text is too short to analyze. Please provide a complete CV document.",
            };
        }

        if job_text.len() < MIN_JD_LENGTH {
            return Validity::Rejected {
                reason: "jd_too_short",
                message:
                    "The job description is too short to analyze. Please paste the full job posting.",
            };
        }

        if self.gibberish.is_match(resume_text) || self.gibberish.is_match(job_text) {
            return Validity::Rejected {
                reason: "gibberish",
                message:
                    "The submitted text looks like keyboard input rather than a real document. Please provide a genuine CV and job description.",
            };
        }

        if has_long_char_run(resume_text, MAX_CHAR_RUN) || has_long_char_run(job_text, MAX_CHAR_RUN)
        {
            return Validity::Rejected {
                reason: "repeated_chars",
                message:
                    "The submitted text contains long runs of repeated characters and cannot be analyzed. Please provide a genuine document.",
            };
        }

        let resume_lower = resume_text.to_lowercase();
        if vocabulary_hits(&resume_lower, CV_VOCABULARY) < MIN_VOCABULARY_HITS {
            return Validity::Rejected {
                reason: "not_a_cv",
                message:
                    "The uploaded document does not look like a CV. Please upload an actual CV or resume.",
            };
        }

        let job_lower = job_text.to_lowercase();
        if vocabulary_hits(&job_lower, JD_VOCABULARY) < MIN_VOCABULARY_HITS {
            return Validity::Rejected {
                reason: "not_a_jd",
                message:
                    "The provided text does not look like a job description. Please paste an actual job posting.",
            };
        }

        if self.story.is_match(resume_text) || self.story.is_match(job_text) {
            return Validity::Rejected {
                reason: "story_content",
                message:
                    "The submitted text looks like narrative content rather than a CV or job posting. Please provide real documents.",
            };
        }

        Validity::Valid
    }
}

fn vocabulary_hits(text_lower: &str, vocabulary: &[&str]) -> usize {
    vocabulary
        .iter()
        .filter(|word| text_lower.contains(*word))
        .count()
}

/// True when any character repeats more than `max_run` times in a row.
fn has_long_char_run(text: &str, max_run: usize) -> bool {
    let mut run = 0usize;
    let mut previous = None;

    for c in text.chars() {
        if Some(c) == previous {
            run += 1;
            if run > max_run {
                return true;
            }
        } else {
            previous = Some(c);
            run = 1;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_cv() -> &'static str {
        "Professional summary: software engineer with 5 years of experience. \
         Worked at a product company leading a team, responsible for projects. \
         Education: university degree in computer science. Contact: email and phone."
    }

    fn valid_jd() -> &'static str {
        "We are hiring for a senior engineer position. Requirements: 3 years of \
         experience, strong skills, team work. The role includes many responsibilities."
    }

    fn rejected_reason(validity: Validity) -> &'static str {
        match validity {
            Validity::Rejected { reason, .. } => reason,
            Validity::Valid => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_valid_documents_pass() {
        let validator = DocumentValidator::default();
        assert_eq!(validator.check(valid_cv(), valid_jd()), Validity::Valid);
    }

    #[test]
    fn test_short_cv_rejected() {
        let validator = DocumentValidator::default();
        let validity = validator.check("too short", valid_jd());
        assert_eq!(rejected_reason(validity), "cv_too_short");
    }

    #[test]
    fn test_short_jd_rejected() {
        let validator = DocumentValidator::default();
        let validity = validator.check(valid_cv(), "tiny");
        assert_eq!(rejected_reason(validity), "jd_too_short");
    }

    #[test]
    fn test_gibberish_rejected() {
        let validator = DocumentValidator::default();
        let cv = format!("{} asdfghjkl", valid_cv());
        let validity = validator.check(&cv, valid_jd());
        assert_eq!(rejected_reason(validity), "gibberish");
    }

    #[test]
    fn test_repeated_characters_rejected() {
        let validator = DocumentValidator::default();
        let cv = format!("{} hmmmmmmmmmmmmm", valid_cv());
        let validity = validator.check(&cv, valid_jd());
        assert_eq!(rejected_reason(validity), "repeated_chars");
    }

    #[test]
    fn test_unrelated_document_rejected() {
        let validator = DocumentValidator::default();
        let shopping_list = "Bananas, flour, two liters of milk, dark chocolate, olive oil, \
             tomatoes, fresh basil leaves, a large bag of rice and some oat cookies for later.";
        let validity = validator.check(shopping_list, valid_jd());
        assert_eq!(rejected_reason(validity), "not_a_cv");
    }

    #[test]
    fn test_story_content_rejected() {
        let validator = DocumentValidator::default();
        let cv = format!("Once upon a time {}", valid_cv());
        let validity = validator.check(&cv, valid_jd());
        assert_eq!(rejected_reason(validity), "story_content");
    }

    #[test]
    fn test_long_char_run_detection() {
        assert!(has_long_char_run("aaaaaaaaaaaa", 10));
        assert!(!has_long_char_run("abcabcabc", 10));
        assert!(!has_long_char_run("", 10));
    }
}
