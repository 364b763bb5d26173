//! Text-extraction seam.
//!
//! Turning a document into text is done by an external extractor. The core only depends on
//! its output contract: a non-empty sequence of lines, or an explicit failure.

use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The extractor produced no text, e.g. for an image-only document.
    #[error("no extractable text for {0}")]
    NoExtractableText(String),
    /// The extractor's output could not be read.
    #[error("extracted text for {source_name} could not be read: {error}")]
    Unreadable {
        source_name: String,
        #[source]
        error: std::io::Error,
    },
}

/// Extracted document text, normalised line by line.
///
/// Never cached or persisted by the core; it lives for one document's processing only.
#[derive(Clone, PartialEq, Eq)]
pub struct ExtractedText {
    lines: Vec<String>,
}

impl ExtractedText {
    /// Normalises raw extractor output.
    ///
    /// Line breaks are kept; inside each line runs of whitespace collapse to one space and the
    /// ends are trimmed. Returns `None` when no line has any content.
    pub fn from_raw(raw: &str) -> Option<Self> {
        let lines: Vec<String> = raw
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect();

        if lines.iter().all(|line| line.is_empty()) {
            return None;
        }

        Some(Self { lines })
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

// Document text is patient data; keep it out of debug output.
impl std::fmt::Debug for ExtractedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractedText")
            .field("line_count", &self.lines.len())
            .finish()
    }
}

/// Source of document text.
pub trait TextExtractor {
    fn extract(&self, source: &Path) -> Result<ExtractedText, ExtractionError>;
}

/// Reads the text an upstream extractor left next to the document as `<stem>.<extension>`.
#[derive(Debug, Clone)]
pub struct SidecarTextExtractor {
    extension: String,
}

impl SidecarTextExtractor {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    pub fn sidecar_path(&self, source: &Path) -> std::path::PathBuf {
        source.with_extension(&self.extension)
    }
}

impl TextExtractor for SidecarTextExtractor {
    fn extract(&self, source: &Path) -> Result<ExtractedText, ExtractionError> {
        let source_name = source_name(source);
        let sidecar = self.sidecar_path(source);

        tracing::debug!(source = %source_name, "reading extracted text");

        let raw = std::fs::read_to_string(&sidecar).map_err(|error| ExtractionError::Unreadable {
            source_name: source_name.clone(),
            error,
        })?;

        let text = ExtractedText::from_raw(&raw)
            .ok_or_else(|| ExtractionError::NoExtractableText(source_name.clone()))?;

        tracing::debug!(source = %source_name, lines = text.line_count(), "extraction complete");
        Ok(text)
    }
}

/// File name of `source` for logs and error messages.
pub(crate) fn source_name(source: &Path) -> String {
    source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_from_raw_normalises_whitespace() {
        let text = ExtractedText::from_raw("  Chart \n\n  Test   Patient  1\t\nDecember 18,  2025").unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Chart", "", "Test Patient 1", "December 18, 2025"]);
    }

    #[test]
    fn test_from_raw_blank_is_none() {
        assert!(ExtractedText::from_raw("").is_none());
        assert!(ExtractedText::from_raw("  \n\t\n ").is_none());
    }

    #[test]
    fn test_debug_hides_content() {
        let text = ExtractedText::from_raw("Chart\nAnna Nogales Ramirez").unwrap();
        let debug = format!("{:?}", text);
        assert!(!debug.contains("Anna"));
        assert!(debug.contains("line_count: 2"));
    }

    #[test]
    fn test_sidecar_reads_text_next_to_document() {
        let temp = TempDir::new().unwrap();
        let pdf = temp.path().join("HealthStre_Chart_1_TP_20251218_88209-2.pdf");
        fs::write(&pdf, b"%PDF-1.4").unwrap();
        fs::write(temp.path().join("HealthStre_Chart_1_TP_20251218_88209-2.txt"), "Chart\nTest Patient 1\n").unwrap();

        let extractor = SidecarTextExtractor::new("txt");
        let text = extractor.extract(&pdf).unwrap();
        assert_eq!(text.line_count(), 2);
    }

    #[test]
    fn test_sidecar_missing_is_unreadable() {
        let temp = TempDir::new().unwrap();
        let pdf = temp.path().join("scan.pdf");

        let result = SidecarTextExtractor::new("txt").extract(&pdf);
        match result {
            Err(ExtractionError::Unreadable { source_name, .. }) => assert_eq!(source_name, "scan.pdf"),
            other => panic!("expected Unreadable, got {:?}", other),
        }
    }

    #[test]
    fn test_sidecar_blank_is_no_extractable_text() {
        let temp = TempDir::new().unwrap();
        let pdf = temp.path().join("scan.pdf");
        fs::write(temp.path().join("scan.txt"), "\n \n").unwrap();

        let result = SidecarTextExtractor::new("txt").extract(&pdf);
        assert!(matches!(result, Err(ExtractionError::NoExtractableText(name)) if name == "scan.pdf"));
    }
}
