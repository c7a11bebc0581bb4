//! Stage seam and corpus runner for SerifXML documents.
//!
//! A [`Pipeline`] runs [`Stage`]s in order over one [`Document`], applying the
//! strict or production error policy of its [`PipelineConfig`].
//! [`process_corpus`] runs a pipeline over many independent documents
//! concurrently, saving each only if it completed.
//!
//! [`Document`]: serifxml_theory::Document

pub mod config;
pub mod context;
pub mod corpus;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod stage;
pub mod stages;

pub use config::{ConfigError, Mode, PipelineConfig};
pub use context::{CountryGazetteer, StageContext};
pub use corpus::{CorpusJob, DocumentReport, DocumentStatus, process_corpus};
pub use error::{PipelineError, Result};
pub use pipeline::{Outcome, Pipeline};
pub use registry::{StageFactory, StageRegistry};
pub use stage::{Stage, StageError};
