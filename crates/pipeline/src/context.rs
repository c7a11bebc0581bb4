//! Shared read-only state handed to every stage.

use rustc_hash::FxHashSet;

use crate::config::PipelineConfig;

/// Case-insensitive lookup of country names.
#[derive(Debug, Clone, Default)]
pub struct CountryGazetteer {
	names: FxHashSet<String>,
}

impl CountryGazetteer {
	/// Builds the gazetteer from a list of names.
	pub fn new<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let names = names.into_iter().map(|n| normalize(n.as_ref())).filter(|n| !n.is_empty()).collect();
		Self { names }
	}

	/// Returns true if `name` is a known country.
	pub fn contains(&self, name: &str) -> bool {
		self.names.contains(&normalize(name))
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}
}

/// Lowercases and collapses internal whitespace.
fn normalize(name: &str) -> String {
	name.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>().join(" ")
}

/// Context built once per pipeline and shared by all stages and documents.
#[derive(Debug, Clone, Default)]
pub struct StageContext {
	countries: CountryGazetteer,
}

impl StageContext {
	/// Builds the context from configuration.
	pub fn from_config(config: &PipelineConfig) -> Self {
		let countries = CountryGazetteer::new(&config.country_names);
		tracing::debug!(countries = countries.len(), "pipeline.context.init");
		Self { countries }
	}

	/// Returns the country-name gazetteer.
	pub fn countries(&self) -> &CountryGazetteer {
		&self.countries
	}
}
