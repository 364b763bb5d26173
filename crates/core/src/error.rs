use crate::extractor::ExtractionError;
use crate::synth::SynthesisError;
use chartname_files::FilesError;

/// Fatal, per-document failures.
///
/// None of these messages carry a patient name or raw date text: extraction errors name the
/// source file, placement errors name the destination directory or a fingerprint.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("text extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("filename synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),
    #[error("document placement failed: {0}")]
    Files(#[from] FilesError),

    #[error("invalid correction: {0}")]
    InvalidCorrection(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to create destination directory: {0}")]
    DestinationDirCreation(std::io::Error),
    #[error("failed to read directory: {0}")]
    DirectoryRead(std::io::Error),
    #[error("failed to read config file: {0}")]
    ConfigRead(std::io::Error),
    #[error("failed to parse config YAML: {0}")]
    ConfigParse(serde_yaml::Error),
    #[error("failed to write review queue: {0}")]
    ManifestWrite(std::io::Error),
    #[error("failed to read review queue: {0}")]
    ManifestRead(std::io::Error),
    #[error("failed to serialize review queue: {0}")]
    ManifestSerialization(serde_yaml::Error),
    #[error("failed to deserialize review queue: {0}")]
    ManifestDeserialization(serde_yaml::Error),
}

impl PipelineError {
    /// Taxonomy label reported per file in logs and batch reports.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineError::Extraction(_) => "ExtractionFailure",
            PipelineError::Synthesis(_) => "SynthesisInvariantViolation",
            PipelineError::Files(e) => e.label(),
            PipelineError::InvalidCorrection(_) => "InvalidCorrection",
            PipelineError::InvalidInput(_) => "InvalidInput",
            PipelineError::DestinationDirCreation(_) => "DestinationDirCreation",
            PipelineError::DirectoryRead(_) => "DirectoryRead",
            PipelineError::ConfigRead(_) | PipelineError::ConfigParse(_) => "Config",
            PipelineError::ManifestWrite(_)
            | PipelineError::ManifestRead(_)
            | PipelineError::ManifestSerialization(_)
            | PipelineError::ManifestDeserialization(_) => "ReviewQueue",
        }
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_follow_taxonomy() {
        let err = PipelineError::from(ExtractionError::NoExtractableText("scan.pdf".into()));
        assert_eq!(err.label(), "ExtractionFailure");

        let err = PipelineError::from(FilesError::CollisionExhausted {
            fingerprint: "0123abcd".into(),
        });
        assert_eq!(err.label(), "CollisionExhausted");

        let err = PipelineError::from(SynthesisError::ReviewPending);
        assert_eq!(err.label(), "SynthesisInvariantViolation");
    }
}
