//! Pipeline configuration.
//!
//! Configuration is read from TOML. Every field has a default, so an empty
//! file yields a production-mode pipeline with no stages:
//!
//! ```toml
//! mode = "strict"
//! workers = 4
//! document_timeout_secs = 120
//! strict_references = false
//! correct_edt_on_save = true
//! stages = ["country_mentions", "edt_correction"]
//! country_names = ["France", "Kenya", "United States"]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serifxml_xml::LoadOptions;
use thiserror::Error;

/// How the pipeline reacts to a stage whose structural preconditions fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
	/// The failure is fatal for the document.
	Strict,
	/// The failure is logged and the document passes through unchanged.
	#[default]
	Production,
}

/// Settings for building and running a [`Pipeline`](crate::Pipeline).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
	/// Error policy for structural precondition failures.
	pub mode: Mode,
	/// Maximum number of documents processed concurrently.
	pub workers: usize,
	/// Per-document processing budget; `0` disables the timeout.
	pub document_timeout_secs: u64,
	/// Reject references to absent ids when loading.
	pub strict_references: bool,
	/// Recompute EDT offsets from the original text before saving.
	pub correct_edt_on_save: bool,
	/// Stage names, in execution order.
	pub stages: Vec<String>,
	/// Country names for the gazetteer in [`StageContext`](crate::StageContext).
	pub country_names: Vec<String>,
}

impl Default for PipelineConfig {
	fn default() -> Self {
		Self {
			mode: Mode::Production,
			workers: 4,
			document_timeout_secs: 300,
			strict_references: false,
			correct_edt_on_save: false,
			stages: Vec::new(),
			country_names: Vec::new(),
		}
	}
}

/// Errors reading or parsing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The configuration file could not be read.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path of the file.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The configuration is not valid TOML for [`PipelineConfig`].
	#[error("failed to parse pipeline config: {0}")]
	Parse(#[from] toml::de::Error),

	/// A value is out of range.
	#[error("invalid value for {field}: {reason}")]
	Invalid {
		/// Field name.
		field: &'static str,
		/// Why the value was rejected.
		reason: &'static str,
	},
}

impl PipelineConfig {
	/// Parses configuration from TOML text.
	pub fn parse(input: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(input)?;
		if config.workers == 0 {
			return Err(ConfigError::Invalid {
				field: "workers",
				reason: "must be at least 1",
			});
		}
		Ok(config)
	}

	/// Reads and parses a configuration file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::parse(&input)?;
		tracing::debug!(path = %path.display(), stages = config.stages.len(), mode = ?config.mode, "pipeline.config.load");
		Ok(config)
	}

	/// Returns the per-document timeout, if any.
	pub fn document_timeout(&self) -> Option<Duration> {
		(self.document_timeout_secs > 0).then(|| Duration::from_secs(self.document_timeout_secs))
	}

	/// Returns the options documents are loaded with.
	pub fn load_options(&self) -> LoadOptions {
		LoadOptions {
			strict_references: self.strict_references,
		}
	}
}
