//! Pipeline error types.

use serifxml_theory::validate::PreconditionError;
use serifxml_xml::SerifXmlError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::stage::StageError;

/// Errors raised while assembling or running a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
	/// A configured stage name has no registered factory.
	#[error("unknown stage {0:?}")]
	UnknownStage(String),

	/// Configuration could not be loaded.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// A stage's structural precondition failed in strict mode.
	#[error("stage {stage}: {source}")]
	Precondition {
		/// Name of the stage.
		stage: String,
		/// The failed check.
		source: PreconditionError,
	},

	/// A stage failed for a reason no mode recovers from.
	#[error("stage {stage} failed: {source}")]
	Stage {
		/// Name of the stage.
		stage: String,
		/// The stage's error.
		source: StageError,
	},

	/// Loading or saving a document failed.
	#[error(transparent)]
	Xml(#[from] SerifXmlError),

	/// A worker task panicked or was cancelled.
	#[error("document worker failed: {0}")]
	Worker(String),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
