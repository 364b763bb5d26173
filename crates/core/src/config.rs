//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the pipeline. Library
//! code never reads environment variables; the binaries do that and hand the raw values to the
//! `*_from_env_value` helpers below.

use crate::constants::{DEFAULT_ANCHOR_MARKER, DEFAULT_TEXT_EXTENSION};
use crate::format::OutputFormat;
use crate::validation::{validate_anchor_marker, validate_text_extension};
use crate::{PipelineError, PipelineResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    output_dir: Option<PathBuf>,
    format: OutputFormat,
    anchor_marker: String,
    text_extension: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            format: OutputFormat::default(),
            anchor_marker: DEFAULT_ANCHOR_MARKER.to_owned(),
            text_extension: DEFAULT_TEXT_EXTENSION.to_owned(),
        }
    }
}

/// On-disk shape of the optional YAML config file. Every key may be omitted.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    output_dir: Option<PathBuf>,
    format: Option<OutputFormat>,
    anchor_marker: Option<String>,
    text_extension: Option<String>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `output_dir` of `None` renames documents in place, next to their source.
    pub fn new(
        output_dir: Option<PathBuf>,
        format: OutputFormat,
        anchor_marker: String,
        text_extension: String,
    ) -> PipelineResult<Self> {
        validate_anchor_marker(&anchor_marker)?;
        validate_text_extension(&text_extension)?;

        Ok(Self {
            output_dir,
            format,
            anchor_marker,
            text_extension,
        })
    }

    /// Load a YAML config file, filling omitted keys with defaults.
    pub fn from_yaml_file(path: &Path) -> PipelineResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(PipelineError::ConfigRead)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> PipelineResult<Self> {
        let file: ConfigFile = if contents.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(contents).map_err(PipelineError::ConfigParse)?
        };

        let defaults = Self::default();
        Self::new(
            file.output_dir,
            file.format.unwrap_or(defaults.format),
            file.anchor_marker.unwrap_or(defaults.anchor_marker),
            file.text_extension.unwrap_or(defaults.text_extension),
        )
    }

    /// Copy of this config with a different output format.
    pub fn with_format(&self, format: OutputFormat) -> Self {
        Self {
            format,
            ..self.clone()
        }
    }

    /// Copy of this config with a different output directory.
    pub fn with_output_dir(&self, output_dir: Option<PathBuf>) -> Self {
        Self {
            output_dir,
            ..self.clone()
        }
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn anchor_marker(&self) -> &str {
        &self.anchor_marker
    }

    pub fn text_extension(&self) -> &str {
        &self.text_extension
    }

    /// Directory a document ends up in: the output folder, or the source's own folder.
    pub fn destination_dir_for(&self, source: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => source
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Startup values that take precedence over the config file. `None` leaves the file's value.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub output_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub anchor_marker: Option<String>,
}

impl CoreConfig {
    /// Resolve the effective config: defaults, then the optional YAML file, then overrides.
    pub fn resolve(config_file: Option<&Path>, overrides: ConfigOverrides) -> PipelineResult<Self> {
        let base = match config_file {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };

        Self::new(
            overrides.output_dir.or(base.output_dir),
            overrides.format.unwrap_or(base.format),
            overrides.anchor_marker.unwrap_or(base.anchor_marker),
            base.text_extension,
        )
    }
}

/// Parse the output format from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default format.
pub fn format_from_env_value(value: Option<String>) -> PipelineResult<OutputFormat> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value
        .map(|v| v.parse::<OutputFormat>())
        .transpose()
        .map_err(|e| PipelineError::InvalidInput(e.to_string()))?;

    Ok(parsed.unwrap_or_default())
}

/// Parse an optional directory value; blank means "not configured".
pub fn dir_from_env_value(value: Option<String>) -> Option<PathBuf> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
