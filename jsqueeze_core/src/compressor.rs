use minify_js::{minify, Session, TopLevelMode};
use std::{
	fmt,
	panic::{catch_unwind, AssertUnwindSafe},
	sync::Arc,
};
use tracing::instrument;

pub const DEFAULT_COMPRESSOR: &str = "minify-js";
pub const IDENTITY_COMPRESSOR: &str = "identity";

/// Failure reported by a [`Compressor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressError {
	/// The compressor could not make sense of the script, e.g. a syntax error.
	/// Recoverable: the original script is kept.
	Rejected(String),
	/// Anything else. Aborts the transformation.
	Fault(String),
}

impl fmt::Display for CompressError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Rejected(message) => write!(f, "script rejected: {message}"),
			Self::Fault(message) => write!(f, "compressor fault: {message}"),
		}
	}
}

impl std::error::Error for CompressError {}

pub trait Compressor: Send + Sync {
	fn compress(&self, content: &str) -> Result<String, CompressError>;
}

impl<F> Compressor for F
where
	F: Fn(&str) -> Result<String, CompressError> + Send + Sync,
{
	#[inline]
	fn compress(&self, content: &str) -> Result<String, CompressError> {
		self(content)
	}
}

impl fmt::Debug for dyn Compressor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Compressor")
	}
}

/// Minifies scripts with the `minify-js` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinifyJs {
	pub top_level_mode: Mode,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	#[default]
	Global,
	Module,
}

impl Compressor for MinifyJs {
	#[instrument(level = "trace", skip_all, fields(len = content.len()))]
	fn compress(&self, content: &str) -> Result<String, CompressError> {
		let top_level_mode = match self.top_level_mode {
			Mode::Global => TopLevelMode::Global,
			Mode::Module => TopLevelMode::Module,
		};

		// minify-js asserts on some inputs instead of returning an error.
		let result = catch_unwind(AssertUnwindSafe(|| {
			let session = Session::new();
			let mut out = Vec::new();
			let outcome = minify(&session, top_level_mode, content.as_bytes(), &mut out)
				.map_err(|error| format!("{error:?}"));
			outcome.map(|_| out)
		}));

		match result {
			Ok(Ok(out)) => {
				String::from_utf8(out).map_err(|error| CompressError::Fault(error.to_string()))
			}
			Ok(Err(message)) => Err(CompressError::Rejected(message)),
			Err(_) => Err(CompressError::Fault("minify-js panicked".into())),
		}
	}
}

/// Returns its input. Handy for dry runs and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl Compressor for Identity {
	#[inline]
	fn compress(&self, content: &str) -> Result<String, CompressError> {
		Ok(content.to_string())
	}
}

/// Looks up one of the built in compressors by name.
pub fn named(name: &str) -> Option<Arc<dyn Compressor>> {
	match name {
		DEFAULT_COMPRESSOR => Some(Arc::new(MinifyJs::default())),
		"minify-js-module" => Some(Arc::new(MinifyJs {
			top_level_mode: Mode::Module,
		})),
		IDENTITY_COMPRESSOR => Some(Arc::new(Identity)),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn closures_are_compressors() {
		let upper = |content: &str| Ok::<_, CompressError>(content.to_uppercase());
		assert_eq!(upper.compress("abc"), Ok("ABC".to_string()));
	}

	#[test]
	fn named_lookup() {
		assert!(named("minify-js").is_some());
		assert!(named("minify-js-module").is_some());
		assert_eq!(
			named("identity").unwrap().compress("var a = 1;"),
			Ok("var a = 1;".to_string())
		);
		assert!(named("uglifier").is_none());
	}

	#[test]
	fn minify_js_shrinks_script() {
		let input = "var   first_value   =   1 ;\n\n  var second_value = first_value + 2;";
		let out = MinifyJs::default().compress(input).unwrap();
		assert!(out.len() < input.len());
	}

	#[test]
	fn minify_js_rejects_broken_script() {
		let result = MinifyJs::default().compress("function (");
		assert!(matches!(result, Err(CompressError::Rejected(_))), "{result:?}");
	}
}
