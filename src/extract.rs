// src/extract.rs
//! Document text extraction boundary.
//!
//! The scoring pipeline consumes extracted plain text. Only plain-text
//! formats are handled here; PDF/DOCX conversion belongs to an external
//! service.

use crate::error::ExtractionError;

pub trait TextExtractor: Send + Sync {
    /// Extract plain text from raw file bytes with a declared extension.
    fn extract(&self, bytes: &[u8], extension: &str) -> Result<String, ExtractionError>;
}

#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8], extension: &str) -> Result<String, ExtractionError> {
        let ext = extension.trim_start_matches('.').to_lowercase();
        match ext.as_str() {
            "txt" | "text" | "md" => {
                let raw = String::from_utf8_lossy(bytes);
                let cleaned = clean_text(&raw);
                if cleaned.is_empty() {
                    return Err(ExtractionError::EmptyDocument);
                }
                Ok(cleaned)
            }
            other => Err(ExtractionError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Collapse runs of whitespace and strip control characters so downstream
/// substring matching sees a single normalized line of text.
pub fn clean_text(text: &str) -> String {
    let stripped: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_text() {
        let extractor = PlainTextExtractor;
        let text = extractor
            .extract(b"Senior  Rust\tdeveloper\n5 years", "txt")
            .unwrap();
        assert_eq!(text, "Senior Rust developer 5 years");
    }

    #[test]
    fn test_extension_with_leading_dot_and_case() {
        let extractor = PlainTextExtractor;
        assert!(extractor.extract(b"some resume text", ".TXT").is_ok());
    }

    #[test]
    fn test_unsupported_format() {
        let extractor = PlainTextExtractor;
        assert!(matches!(
            extractor.extract(b"%PDF-1.4", "pdf"),
            Err(ExtractionError::UnsupportedFormat(ext)) if ext == "pdf"
        ));
    }

    #[test]
    fn test_blank_document_rejected() {
        let extractor = PlainTextExtractor;
        assert!(matches!(
            extractor.extract(b"  \n\t  ", "txt"),
            Err(ExtractionError::EmptyDocument)
        ));
    }

    #[test]
    fn test_clean_text_strips_control_characters() {
        assert_eq!(clean_text("a\x00b\r\nc"), "a b c");
    }
}
