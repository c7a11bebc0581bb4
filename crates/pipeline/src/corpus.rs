//! Concurrent processing of independent documents.
//!
//! Each document is loaded and processed on a blocking worker with its own
//! graph, then saved once processing has finished within the timeout. Nothing
//! is shared between documents except the read-only [`Pipeline`]. A semaphore
//! bounds how many documents are in flight.
//!
//! # Invariants
//!
//! - A document that fails or exceeds its timeout is never written.
//!   - Tested by: `tests/corpus.rs::test_timed_out_document_is_not_saved`
//! - One document's failure does not affect its siblings.
//!   - Tested by: `tests/corpus.rs::test_failures_are_isolated`

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serifxml_theory::Document;
use serifxml_theory::edt::correct_edt_offsets;
use tokio::sync::Semaphore;

use crate::error::{PipelineError, Result};
use crate::pipeline::{Outcome, Pipeline};

/// One document to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusJob {
	/// SerifXML file to load.
	pub input: PathBuf,
	/// Where the processed document is saved.
	pub output: PathBuf,
}

impl CorpusJob {
	pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
		Self {
			input: input.into(),
			output: output.into(),
		}
	}
}

/// What happened to one document.
#[derive(Debug)]
pub enum DocumentStatus {
	/// The document was written to its output path.
	Saved(Outcome),
	/// Processing exceeded the configured timeout; nothing was written.
	TimedOut,
	/// Loading, processing or saving failed; nothing was written.
	Failed(PipelineError),
}

/// Per-document result of [`process_corpus`].
#[derive(Debug)]
pub struct DocumentReport {
	pub input: PathBuf,
	pub output: PathBuf,
	pub status: DocumentStatus,
	pub elapsed: Duration,
}

impl DocumentReport {
	/// Returns true if the document was written.
	pub fn is_saved(&self) -> bool {
		matches!(self.status, DocumentStatus::Saved(_))
	}
}

/// Processes every job and returns one report per job, in job order.
///
/// Must be called within a tokio runtime. A timed-out worker keeps running
/// to completion in the background, but its result is discarded.
pub async fn process_corpus(pipeline: Arc<Pipeline>, jobs: Vec<CorpusJob>) -> Vec<DocumentReport> {
	let limit = Arc::new(Semaphore::new(pipeline.config().workers.max(1)));
	tracing::info!(documents = jobs.len(), workers = pipeline.config().workers, "pipeline.corpus.start");

	let handles: Vec<_> = jobs
		.into_iter()
		.map(|job| {
			let pipeline = Arc::clone(&pipeline);
			let limit = Arc::clone(&limit);
			let paths = (job.input.clone(), job.output.clone());
			let handle = tokio::spawn(async move {
				// The semaphore is never closed.
				let _permit = limit.acquire_owned().await.ok();
				run_job(pipeline, job).await
			});
			(handle, paths)
		})
		.collect();

	let mut reports = Vec::with_capacity(handles.len());
	for (handle, (input, output)) in handles {
		let report = handle.await.unwrap_or_else(|e| DocumentReport {
			input,
			output,
			status: DocumentStatus::Failed(PipelineError::Worker(e.to_string())),
			elapsed: Duration::ZERO,
		});
		reports.push(report);
	}

	let saved = reports.iter().filter(|r| r.is_saved()).count();
	tracing::info!(saved, skipped = reports.len() - saved, "pipeline.corpus.finish");
	reports
}

async fn run_job(pipeline: Arc<Pipeline>, job: CorpusJob) -> DocumentReport {
	let started = Instant::now();
	let status = match process(&pipeline, &job).await {
		Ok(outcome) => DocumentStatus::Saved(outcome),
		Err(Failure::TimedOut) => DocumentStatus::TimedOut,
		Err(Failure::Error(e)) => DocumentStatus::Failed(e),
	};
	let elapsed = started.elapsed();
	match &status {
		DocumentStatus::Saved(outcome) => {
			tracing::debug!(input = %job.input.display(), ?outcome, ?elapsed, "pipeline.corpus.saved");
		}
		DocumentStatus::TimedOut => {
			tracing::warn!(input = %job.input.display(), ?elapsed, "pipeline.corpus.timeout");
		}
		DocumentStatus::Failed(error) => {
			tracing::warn!(input = %job.input.display(), %error, "pipeline.corpus.failed");
		}
	}
	DocumentReport {
		input: job.input,
		output: job.output,
		status,
		elapsed,
	}
}

enum Failure {
	TimedOut,
	Error(PipelineError),
}

impl From<PipelineError> for Failure {
	fn from(error: PipelineError) -> Self {
		Failure::Error(error)
	}
}

async fn process(pipeline: &Arc<Pipeline>, job: &CorpusJob) -> std::result::Result<Outcome, Failure> {
	let worker = {
		let pipeline = Arc::clone(pipeline);
		let input = job.input.clone();
		tokio::task::spawn_blocking(move || prepare(&pipeline, input))
	};
	let joined = match pipeline.config().document_timeout() {
		Some(limit) => tokio::time::timeout(limit, worker).await.map_err(|_| Failure::TimedOut)?,
		None => worker.await,
	};
	let (doc, outcome) = joined.map_err(|e| PipelineError::Worker(e.to_string()))??;

	let output = job.output.clone();
	tokio::task::spawn_blocking(move || serifxml_xml::save(&doc, &output))
		.await
		.map_err(|e| PipelineError::Worker(e.to_string()))?
		.map_err(PipelineError::from)?;
	Ok(outcome)
}

/// Loads and processes one document.
fn prepare(pipeline: &Pipeline, input: PathBuf) -> Result<(Document, Outcome)> {
	let config = pipeline.config();
	let mut doc = serifxml_xml::load(&input, &config.load_options())?;
	let outcome = pipeline.run_document(&mut doc)?;
	if config.correct_edt_on_save && outcome == Outcome::Processed {
		correct_edt_offsets(&mut doc);
	}
	Ok((doc, outcome))
}
