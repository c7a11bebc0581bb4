//! Name to factory table for stages.

use rustc_hash::FxHashMap;

use crate::context::StageContext;
use crate::stage::Stage;
use crate::stages::{CountryMentions, EdtCorrection, TokenOrderCheck};

/// Builds a stage instance for a pipeline.
pub type StageFactory = Box<dyn Fn(&StageContext) -> Box<dyn Stage> + Send + Sync>;

/// Explicit table of the stages a pipeline can be assembled from.
pub struct StageRegistry {
	factories: FxHashMap<String, StageFactory>,
}

impl Default for StageRegistry {
	fn default() -> Self {
		Self::with_builtins()
	}
}

impl core::fmt::Debug for StageRegistry {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("StageRegistry").field("stages", &self.names()).finish()
	}
}

impl StageRegistry {
	/// Creates a registry with no stages.
	pub fn empty() -> Self {
		Self {
			factories: FxHashMap::default(),
		}
	}

	/// Creates a registry holding the graph-only stages of this crate.
	pub fn with_builtins() -> Self {
		let mut registry = Self::empty();
		registry.register(EdtCorrection::NAME, |_| Box::new(EdtCorrection));
		registry.register(CountryMentions::NAME, |_| Box::new(CountryMentions));
		registry.register(TokenOrderCheck::NAME, |_| Box::new(TokenOrderCheck));
		registry
	}

	/// Registers a factory, replacing any previous one under `name`.
	///
	/// Returns true if a factory was replaced.
	pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> bool
	where
		F: Fn(&StageContext) -> Box<dyn Stage> + Send + Sync + 'static,
	{
		let name = name.into();
		let replaced = self.factories.insert(name.clone(), Box::new(factory)).is_some();
		if replaced {
			tracing::debug!(stage = %name, "pipeline.registry.replaced");
		}
		replaced
	}

	/// Instantiates the stage registered under `name`.
	pub fn create(&self, name: &str, ctx: &StageContext) -> Option<Box<dyn Stage>> {
		self.factories.get(name).map(|factory| factory(ctx))
	}

	/// Returns true if `name` is registered.
	pub fn contains(&self, name: &str) -> bool {
		self.factories.contains_key(name)
	}

	/// Returns registered names in sorted order.
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_builtins_are_registered() {
		let registry = StageRegistry::with_builtins();
		assert_eq!(registry.names(), ["country_mentions", "edt_correction", "token_order"]);
		let stage = registry.create("edt_correction", &StageContext::default()).expect("registered");
		assert_eq!(stage.name(), "edt_correction");
		assert!(registry.create("tokenizer", &StageContext::default()).is_none());
	}

	#[test]
	fn test_register_replaces() {
		let mut registry = StageRegistry::empty();
		assert!(!registry.register("order", |_| Box::new(TokenOrderCheck)));
		assert!(registry.register("order", |_| Box::new(EdtCorrection)));
		let stage = registry.create("order", &StageContext::default()).expect("registered");
		assert_eq!(stage.name(), EdtCorrection::NAME);
	}
}
