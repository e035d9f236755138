use crate::error::Result;
use std::{fmt, sync::Arc};
use tracing::instrument;

/// A transformation applied to a resource's rendered content.
pub type Filter = Arc<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// A generated file as seen by the minifier.
#[derive(Clone)]
pub struct Resource {
	/// May carry parameters, e.g. `text/html; charset=utf-8`.
	pub content_type: Option<String>,
	/// Path relative to the build output directory.
	pub destination_path: String,
	pub filters: Vec<Filter>,
}

impl fmt::Debug for Resource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Resource")
			.field("content_type", &self.content_type)
			.field("destination_path", &self.destination_path)
			.field("filters", &self.filters.len())
			.finish()
	}
}

impl Resource {
	pub fn new<P: Into<String>>(content_type: Option<&str>, destination_path: P) -> Self {
		Self {
			content_type: content_type.map(String::from),
			destination_path: destination_path.into(),
			filters: vec![],
		}
	}

	/// Runs every filter over `content`, in the order they were added.
	#[instrument(level = "debug", skip(self, content), fields(path = %self.destination_path))]
	pub fn render(&self, content: &str) -> Result<String> {
		self.filters
			.iter()
			.try_fold(content.to_string(), |content, filter| filter(&content))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn filters_apply_in_order() {
		let mut resource = Resource::new(Some("text/plain"), "a.txt");
		resource
			.filters
			.push(Arc::new(|content: &str| -> Result<String> { Ok(format!("{content}b")) }));
		resource
			.filters
			.push(Arc::new(|content: &str| -> Result<String> { Ok(content.to_uppercase()) }));
		assert_eq!(resource.render("a").unwrap(), "AB");
	}

	#[test]
	fn no_filters_is_identity() {
		let resource = Resource::new(None, "a.bin");
		assert_eq!(resource.render("raw").unwrap(), "raw");
	}

	#[test]
	fn first_error_wins() {
		let mut resource = Resource::new(None, "a.js");
		resource
			.filters
			.push(Arc::new(|_: &str| -> Result<String> { Err(crate::err!(Validation("broken"))) }));
		resource
			.filters
			.push(Arc::new(|_: &str| -> Result<String> { panic!("not reached") }));
		assert!(resource.render("x").is_err());
	}
}
