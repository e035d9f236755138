use crate::store::{Cache, InMemoryStore};
use std::collections::BTreeSet;
use tracing::instrument;

/// Strips parameters such as `; charset=utf-8` from a content type.
#[inline]
pub fn normalize_content_type(content_type: &str) -> &str {
	match content_type.find(';') {
		Some(index) => &content_type[..index],
		None => content_type,
	}
}

/// Decides which minification strategy, if any, applies to a content type.
#[derive(Debug)]
pub struct Classifier {
	content_types: BTreeSet<String>,
	inline_content_types: BTreeSet<String>,
	direct_cache: InMemoryStore<String, bool>,
	inline_cache: InMemoryStore<String, bool>,
}

impl Classifier {
	pub fn new(content_types: BTreeSet<String>, inline_content_types: BTreeSet<String>) -> Self {
		Self {
			content_types,
			inline_content_types,
			direct_cache: InMemoryStore::new(),
			inline_cache: InMemoryStore::new(),
		}
	}

	/// Whether the whole resource is JavaScript.
	#[instrument(level = "trace", skip(self))]
	pub fn is_direct_js(&self, content_type: Option<&str>) -> bool {
		let Some(content_type) = content_type else {
			return false;
		};
		self.direct_cache.get_or_insert_with(&content_type.to_string(), || {
			self.content_types.contains(content_type)
		})
	}

	/// Whether the resource may carry inline `<script>` blocks.
	#[instrument(level = "trace", skip(self))]
	pub fn is_inline_host(&self, content_type: Option<&str>) -> bool {
		let Some(content_type) = content_type else {
			return false;
		};
		self.inline_cache.get_or_insert_with(&content_type.to_string(), || {
			self.inline_content_types.contains(content_type)
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn classifier() -> Classifier {
		Classifier::new(
			["application/javascript".to_string()].into(),
			["text/html".to_string(), "text/php".to_string()].into(),
		)
	}

	#[test]
	fn strips_parameters() {
		assert_eq!(normalize_content_type("text/html; charset=utf-8"), "text/html");
		assert_eq!(normalize_content_type("application/javascript"), "application/javascript");
		assert_eq!(normalize_content_type(";"), "");
	}

	#[test]
	fn direct_js() {
		let classifier = classifier();
		assert!(classifier.is_direct_js(Some("application/javascript")));
		assert!(!classifier.is_direct_js(Some("text/html")));
		assert!(!classifier.is_direct_js(Some("Application/JavaScript")));
		assert!(!classifier.is_direct_js(None));
	}

	#[test]
	fn inline_hosts() {
		let classifier = classifier();
		assert!(classifier.is_inline_host(Some("text/html")));
		assert!(classifier.is_inline_host(Some("text/php")));
		assert!(!classifier.is_inline_host(Some("text/css")));
		assert!(!classifier.is_inline_host(None));
	}

	#[test]
	fn lookups_are_memoized_per_predicate() {
		let classifier = classifier();
		classifier.is_direct_js(Some("text/html"));
		classifier.is_direct_js(Some("text/html"));
		classifier.is_inline_host(Some("text/html"));
		assert_eq!(classifier.direct_cache.len(), 1);
		assert_eq!(classifier.inline_cache.len(), 1);
	}
}
