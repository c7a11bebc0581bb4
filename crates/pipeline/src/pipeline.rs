//! Sequential stage execution over one document.
//!
//! # Error policy
//!
//! A stage whose structural precondition fails is handled by [`Mode`]:
//! strict mode returns [`PipelineError::Precondition`]; production mode logs a
//! warning and restores the document to its state before the first stage,
//! reporting [`Outcome::PassedThrough`]. Every other stage error is returned
//! as [`PipelineError::Stage`] in both modes.

use serifxml_theory::Document;
use serifxml_theory::validate::PreconditionError;

use crate::config::{Mode, PipelineConfig};
use crate::context::StageContext;
use crate::error::{PipelineError, Result};
use crate::registry::StageRegistry;
use crate::stage::Stage;


/// How a document left [`Pipeline::run_document`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
	/// Every stage ran.
	Processed,
	/// A precondition failed in production mode; the document is unchanged.
	PassedThrough {
		/// Stage whose precondition failed.
		stage: String,
		/// The failed check.
		reason: PreconditionError,
	},
}

/// An ordered list of stages sharing one [`StageContext`].
pub struct Pipeline {
	config: PipelineConfig,
	context: StageContext,
	stages: Vec<Box<dyn Stage>>,
}

impl core::fmt::Debug for Pipeline {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Pipeline")
			.field("mode", &self.config.mode)
			.field("stages", &self.stage_names().collect::<Vec<_>>())
			.finish()
	}
}

impl Pipeline {
	/// Assembles the configured stages from `registry`.
	///
	/// The context is built once here and shared by every document.
	pub fn from_config(config: PipelineConfig, registry: &StageRegistry) -> Result<Self> {
		let context = StageContext::from_config(&config);
		let stages = config
			.stages
			.iter()
			.map(|name| registry.create(name, &context).ok_or_else(|| PipelineError::UnknownStage(name.clone())))
			.collect::<Result<Vec<_>>>()?;
		tracing::info!(stages = stages.len(), mode = ?config.mode, "pipeline.build");
		Ok(Self { config, context, stages })
	}

	/// Assembles a pipeline from explicit stage instances.
	pub fn with_stages(config: PipelineConfig, stages: Vec<Box<dyn Stage>>) -> Self {
		let context = StageContext::from_config(&config);
		Self { config, context, stages }
	}

	pub fn config(&self) -> &PipelineConfig {
		&self.config
	}

	pub fn context(&self) -> &StageContext {
		&self.context
	}

	/// Returns stage names in execution order.
	pub fn stage_names(&self) -> impl Iterator<Item = &str> + '_ {
		self.stages.iter().map(|s| s.name())
	}

	/// Runs every stage over `doc` in order.
	pub fn run_document(&self, doc: &mut Document) -> Result<Outcome> {
		let snapshot = (self.config.mode == Mode::Production).then(|| doc.clone());
		for stage in &self.stages {
			let Err(error) = stage.process_document(&self.context, doc) else {
				continue;
			};
			let name = stage.name().to_owned();
			let Some(reason) = error.recoverable().cloned() else {
				return Err(PipelineError::Stage { stage: name, source: error });
			};
			let Some(snapshot) = snapshot else {
				return Err(PipelineError::Precondition { stage: name, source: reason });
			};
			tracing::warn!(stage = %name, docid = ?doc.docid(), error = %reason, "pipeline.passthrough");
			*doc = snapshot;
			return Ok(Outcome::PassedThrough { stage: name, reason });
		}
		Ok(Outcome::Processed)
	}

	/// Runs every stage over a batch through [`Stage::process_documents`].
	///
	/// Batches have no pass-through: any stage error is returned.
	pub fn run_batch(&self, docs: &mut [Document]) -> Result<()> {
		for stage in &self.stages {
			let Err(error) = stage.process_documents(&self.context, docs) else {
				continue;
			};
			let name = stage.name().to_owned();
			return Err(match error.recoverable().cloned() {
				Some(reason) => PipelineError::Precondition { stage: name, source: reason },
				None => PipelineError::Stage { stage: name, source: error },
			});
		}
		Ok(())
	}

	/// Asks every stage to reload its model.
	pub fn reload_models(&mut self) -> Result<()> {
		for stage in &mut self.stages {
			stage.reload_model().map_err(|source| PipelineError::Stage {
				stage: stage.name().to_owned(),
				source,
			})?;
		}
		Ok(())
	}
}
