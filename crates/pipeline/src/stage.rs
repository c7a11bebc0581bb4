//! The seam between the pipeline and annotation stages.

use serifxml_theory::validate::PreconditionError;
use serifxml_theory::{Document, GraphError};
use thiserror::Error;

use crate::context::StageContext;

/// Errors a stage reports.
#[derive(Debug, Error)]
pub enum StageError {
	/// Required upstream structure is missing.
	#[error(transparent)]
	Precondition(#[from] PreconditionError),

	/// The graph rejected an operation.
	#[error(transparent)]
	Graph(#[from] GraphError),

	/// An external collaborator failed.
	#[error("{0}")]
	Failed(String),
}

impl StageError {
	/// Returns the precondition failure the pipeline may recover from.
	///
	/// Missing required values surface through [`PreconditionError::Graph`]
	/// but are graph errors, and so never recoverable.
	pub fn recoverable(&self) -> Option<&PreconditionError> {
		match self {
			StageError::Precondition(PreconditionError::Graph(_)) => None,
			StageError::Precondition(e) => Some(e),
			_ => None,
		}
	}
}

/// One annotation step over documents.
///
/// Stages mutate documents only through the graph API and check their
/// structural preconditions before mutating, so a failed check leaves the
/// document untouched.
pub trait Stage: Send + Sync {
	/// Registry name of the stage.
	fn name(&self) -> &str;

	/// Processes one document.
	fn process_document(&self, ctx: &StageContext, doc: &mut Document) -> Result<(), StageError>;

	/// Processes a batch; the default runs documents one at a time.
	fn process_documents(&self, ctx: &StageContext, docs: &mut [Document]) -> Result<(), StageError> {
		for doc in docs {
			self.process_document(ctx, doc)?;
		}
		Ok(())
	}

	/// Reloads model state between corpora.
	fn reload_model(&mut self) -> Result<(), StageError> {
		Ok(())
	}
}
