//! Input validation utilities.
//!
//! Guards applied to configuration values and synthesised names before they reach the
//! filesystem.

use crate::constants::INVALID_FILENAME_CHARS;
use crate::{PipelineError, PipelineResult};

/// Validates the anchor marker used by the field locator.
///
/// The marker is compared against whole trimmed lines, so it must be a single non-blank line
/// without surrounding whitespace.
///
/// # Errors
///
/// Returns `PipelineError::InvalidInput` if the marker is blank, padded or multi-line.
pub fn validate_anchor_marker(marker: &str) -> PipelineResult<()> {
    if marker.trim().is_empty() {
        return Err(PipelineError::InvalidInput(
            "anchor marker cannot be empty".into(),
        ));
    }

    if marker.trim() != marker {
        return Err(PipelineError::InvalidInput(
            "anchor marker must not have leading or trailing whitespace".into(),
        ));
    }

    if marker.contains(['\n', '\r']) {
        return Err(PipelineError::InvalidInput(
            "anchor marker must be a single line".into(),
        ));
    }

    Ok(())
}

/// Validates the sidecar text extension (without the leading dot).
///
/// # Errors
///
/// Returns `PipelineError::InvalidInput` if the extension is empty or is not plain ASCII
/// alphanumerics.
pub fn validate_text_extension(extension: &str) -> PipelineResult<()> {
    const MAX_EXTENSION_LEN: usize = 16;

    if extension.is_empty() {
        return Err(PipelineError::InvalidInput(
            "text extension cannot be empty".into(),
        ));
    }

    if extension.len() > MAX_EXTENSION_LEN {
        return Err(PipelineError::InvalidInput(format!(
            "text extension exceeds maximum length of {} characters",
            MAX_EXTENSION_LEN
        )));
    }

    if !extension.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(PipelineError::InvalidInput(
            "text extension must be ASCII alphanumeric (no leading dot)".into(),
        ));
    }

    Ok(())
}

/// Removes characters that are invalid in file names on common platforms.
///
/// Everything else, including capitalisation, spacing, hyphens, apostrophes and non-ASCII
/// letters, passes through unchanged.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| !INVALID_FILENAME_CHARS.contains(c) && !c.is_control())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_marker() {
        assert!(validate_anchor_marker("Chart").is_ok());
        assert!(validate_anchor_marker("Patient Chart").is_ok());
        assert!(validate_anchor_marker("").is_err());
        assert!(validate_anchor_marker(" Chart").is_err());
        assert!(validate_anchor_marker("Chart\nName").is_err());
    }

    #[test]
    fn test_text_extension() {
        assert!(validate_text_extension("txt").is_ok());
        assert!(validate_text_extension(".txt").is_err());
        assert!(validate_text_extension("").is_err());
        assert!(validate_text_extension("t/x").is_err());
    }

    #[test]
    fn test_sanitize_removes_reserved_characters() {
        assert_eq!(
            sanitize_filename("O'Neil/Smith, Ana: 121825 PT Note?.pdf"),
            "O'NeilSmith, Ana 121825 PT Note.pdf"
        );
    }

    #[test]
    fn test_sanitize_keeps_ordinary_names_verbatim() {
        let name = "Nogales Ramirez, Anna-María 121825 PT Note.pdf";
        assert_eq!(sanitize_filename(name), name);
    }
}
