use crate::{
	classify::{normalize_content_type, Classifier},
	config::Config,
	error::Result,
	inline::rewrite_inline,
	matcher::IgnoreMatcher,
	minifier::Minifier,
	resource::{Filter, Resource},
	store::{Cache, InMemoryStore},
};
use std::sync::Arc;
use tracing::instrument;

/// Which filter a resource was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
	/// The whole resource is a script.
	Whole,
	/// Only `<script>` blocks inside the resource are minified.
	Inline,
}

/// Minifies JavaScript resources and inline scripts in HTML-like resources.
#[derive(Debug)]
pub struct MinifyJavascript {
	config: Config,
	matcher: IgnoreMatcher,
	classifier: Classifier,
	minifier: Minifier,
	inline_cache: InMemoryStore<String, String>,
}

impl MinifyJavascript {
	pub fn new(config: Config) -> Result<Arc<Self>> {
		let matcher = IgnoreMatcher::new(config.ignore.clone())?;
		let classifier = Classifier::new(
			config.content_types.clone(),
			config.inline_content_types.clone(),
		);
		let minifier = Minifier::new(config.compressor.clone());

		Ok(Arc::new(Self {
			config,
			matcher,
			classifier,
			minifier,
			inline_cache: InMemoryStore::new(),
		}))
	}

	/// The strategy that applies to a resource, if any. Inline rewriting wins
	/// over whole-content minification when both could apply.
	#[instrument(level = "trace", skip(self))]
	pub fn strategy(&self, content_type: Option<&str>, destination_path: &str) -> Option<Strategy> {
		let content_type = content_type.map(normalize_content_type);

		if self.config.inline && self.classifier.is_inline_host(content_type) {
			Some(Strategy::Inline)
		} else if self.classifier.is_direct_js(content_type) && !self.matcher.ignore(destination_path) {
			Some(Strategy::Whole)
		} else {
			None
		}
	}

	/// Adds a minification filter to every resource that needs one and returns
	/// how many resources were annotated.
	///
	/// Filters are appended, so running this twice over the same resources
	/// registers every filter twice.
	#[instrument(level = "debug", skip_all, fields(resources = resources.len()))]
	pub fn manipulate_resource_list(self: &Arc<Self>, resources: &mut [Resource]) -> usize {
		let mut annotated = 0;

		for resource in resources.iter_mut() {
			let Some(strategy) =
				self.strategy(resource.content_type.as_deref(), &resource.destination_path)
			else {
				continue;
			};

			tracing::debug!(path = %resource.destination_path, ?strategy, "registering filter");
			resource.filters.push(self.filter(strategy, &resource.destination_path));
			annotated += 1;
		}

		tracing::info!(annotated, "annotated resources");
		annotated
	}

	fn filter(self: &Arc<Self>, strategy: Strategy, path: &str) -> Filter {
		let this = self.clone();
		let path = path.to_string();

		match strategy {
			Strategy::Whole => Arc::new(move |content: &str| this.minify(content, Some(path.as_str()))),
			Strategy::Inline => {
				Arc::new(move |content: &str| this.minify_inline(content, Some(path.as_str())))
			}
		}
	}

	/// Minifies a whole script. Scripts the compressor rejects come back as is.
	#[inline]
	pub fn minify(&self, content: &str, path: Option<&str>) -> Result<String> {
		self.minifier.minify(content, path)
	}

	/// Minifies the JavaScript `<script>` blocks of an HTML-like document.
	#[instrument(level = "debug", skip(self, content), fields(len = content.len()))]
	pub fn minify_inline(&self, content: &str, path: Option<&str>) -> Result<String> {
		self.inline_cache.get_or_try_insert_with(&content.to_string(), || {
			rewrite_inline(content, |script| self.minifier.minify(script, path))
		})
	}
}
