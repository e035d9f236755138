use crate::{
	compressor::{CompressError, Compressor},
	error::{Error, Result},
	store::{Cache, InMemoryStore},
};
use std::sync::Arc;
use tracing::instrument;

/// Wraps a [`Compressor`], memoizing its output per input and keeping the
/// original script when the compressor rejects it.
#[derive(Debug)]
pub struct Minifier {
	compressor: Arc<dyn Compressor>,
	cache: InMemoryStore<String, String>,
}

impl Minifier {
	pub fn new(compressor: Arc<dyn Compressor>) -> Self {
		Self {
			compressor,
			cache: InMemoryStore::new(),
		}
	}

	/// `path` only shows up in diagnostics.
	#[instrument(level = "trace", skip(self, content), fields(len = content.len()))]
	pub fn minify(&self, content: &str, path: Option<&str>) -> Result<String> {
		self.cache
			.get_or_try_insert_with(&content.to_string(), || {
				match self.compressor.compress(content) {
					Ok(compressed) => Ok(compressed),
					Err(CompressError::Rejected(message)) => {
						tracing::warn!(
							path = path.unwrap_or("<unknown>"),
							%message,
							"Couldn't compress JavaScript, keeping the original"
						);
						Ok(content.to_string())
					}
					Err(CompressError::Fault(message)) => Err(Error::Compressor {
						path: path.unwrap_or("<unknown>").to_string(),
						message,
					}),
				}
			})
	}

	pub fn cached(&self) -> usize {
		self.cache.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::compressor::MinifyJs;
	use std::sync::atomic::{AtomicUsize, Ordering};

	fn counting<F>(calls: Arc<AtomicUsize>, f: F) -> Arc<dyn Compressor>
	where
		F: Fn(&str) -> std::result::Result<String, CompressError> + Send + Sync + 'static,
	{
		Arc::new(move |content: &str| {
			calls.fetch_add(1, Ordering::SeqCst);
			f(content)
		})
	}

	#[test]
	fn compresses_once_per_input() {
		let calls = Arc::new(AtomicUsize::new(0));
		let minifier = Minifier::new(counting(calls.clone(), |content| {
			Ok(content.replace(' ', ""))
		}));

		let first = minifier.minify("var a = 1;", None).unwrap();
		let second = minifier.minify("var a = 1;", None).unwrap();
		assert_eq!(first, "vara=1;");
		assert_eq!(first, second);
		assert_eq!(calls.load(Ordering::SeqCst), 1);

		minifier.minify("var b = 2;", None).unwrap();
		assert_eq!(calls.load(Ordering::SeqCst), 2);
		assert_eq!(minifier.cached(), 2);
	}

	#[test]
	fn rejected_input_is_returned_unchanged_and_cached() {
		let calls = Arc::new(AtomicUsize::new(0));
		let minifier = Minifier::new(counting(calls.clone(), |_| {
			Err(CompressError::Rejected("Unexpected token".into()))
		}));

		let broken = "function ( {";
		assert_eq!(minifier.minify(broken, Some("js/broken.js")).unwrap(), broken);
		assert_eq!(minifier.minify(broken, Some("js/broken.js")).unwrap(), broken);
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn faults_propagate_and_are_not_cached() {
		let calls = Arc::new(AtomicUsize::new(0));
		let minifier = Minifier::new(counting(calls.clone(), |_| {
			Err(CompressError::Fault("runtime unavailable".into()))
		}));

		let error = minifier.minify("var a;", Some("app.js")).unwrap_err();
		assert!(matches!(
			&error,
			Error::Compressor { path, message } if path == "app.js" && message == "runtime unavailable"
		));
		assert!(minifier.minify("var a;", None).is_err());
		assert_eq!(calls.load(Ordering::SeqCst), 2);
		assert_eq!(minifier.cached(), 0);
	}

	#[test]
	fn minify_js_syntax_errors_keep_the_script() {
		let minifier = Minifier::new(Arc::new(MinifyJs::default()));
		assert_eq!(minifier.minify("function (", Some("js/broken.js")).unwrap(), "function (");
		assert_eq!(minifier.cached(), 1);
	}
}
