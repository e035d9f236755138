use crate::{
	compressor::{self, Compressor, DEFAULT_COMPRESSOR},
	err,
	error::{Error, Result},
	matcher::IgnoreRule,
};
use serde_derive::Deserialize;
use std::{collections::BTreeSet, fmt, sync::Arc};

pub const DEFAULT_CONTENT_TYPES: [&str; 1] = ["application/javascript"];
pub const DEFAULT_INLINE_CONTENT_TYPES: [&str; 2] = ["text/html", "text/php"];

/// Raw options, as read from a config file.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Options {
	/// Minify inline `<script>` blocks in HTML-like resources.
	pub inline: Option<bool>,
	#[serde(default)]
	pub ignore: Vec<IgnoreSpec>,
	/// Name of a built in compressor.
	pub compressor: Option<String>,
	pub content_types: Option<BTreeSet<String>>,
	pub inline_content_types: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IgnoreSpec {
	Glob(String),
	Regex { regex: String },
}

impl TryFrom<&IgnoreSpec> for IgnoreRule {
	type Error = Error;

	fn try_from(spec: &IgnoreSpec) -> Result<Self> {
		match spec {
			IgnoreSpec::Glob(pattern) => IgnoreRule::path(pattern),
			IgnoreSpec::Regex { regex } => IgnoreRule::regex(regex),
		}
	}
}

type CompressorFactory = Box<dyn FnOnce() -> Result<Arc<dyn Compressor>> + Send>;

/// The different shapes a compressor can be handed over in. Resolved into a
/// single [`Compressor`] when the [`Config`] is built.
#[derive(Default)]
pub enum CompressorOption {
	#[default]
	Default,
	Named(String),
	Instance(Arc<dyn Compressor>),
	/// Called once to build the compressor.
	Factory(CompressorFactory),
}

impl fmt::Debug for CompressorOption {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Default => f.write_str("Default"),
			Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
			Self::Instance(_) => f.write_str("Instance"),
			Self::Factory(_) => f.write_str("Factory"),
		}
	}
}

impl CompressorOption {
	pub fn factory<F>(f: F) -> Self
	where
		F: FnOnce() -> Result<Arc<dyn Compressor>> + Send + 'static,
	{
		Self::Factory(Box::new(f))
	}

	fn resolve(self) -> Result<Arc<dyn Compressor>> {
		match self {
			Self::Default => Self::Named(DEFAULT_COMPRESSOR.into()).resolve(),
			Self::Named(name) => compressor::named(&name)
				.ok_or_else(|| err!(Validation(format!("unknown compressor {name:?}")))),
			Self::Instance(compressor) => Ok(compressor),
			Self::Factory(factory) => factory(),
		}
	}
}

impl From<Option<String>> for CompressorOption {
	fn from(name: Option<String>) -> Self {
		name.map(Self::Named).unwrap_or_default()
	}
}

/// Resolved, immutable configuration.
#[derive(Debug, Clone)]
pub struct Config {
	pub inline: bool,
	/// User supplied rules. The already-minified rule is added by the matcher.
	pub ignore: Vec<IgnoreRule>,
	pub compressor: Arc<dyn Compressor>,
	pub content_types: BTreeSet<String>,
	pub inline_content_types: BTreeSet<String>,
}

impl Config {
	/// Builds a config from raw options, with `compressor` taking precedence over
	/// the compressor named in `options`.
	pub fn build(options: Options, compressor: CompressorOption) -> Result<Self> {
		let compressor = match compressor {
			CompressorOption::Default => CompressorOption::from(options.compressor),
			compressor => compressor,
		};

		let ignore = options
			.ignore
			.iter()
			.map(IgnoreRule::try_from)
			.collect::<Result<Vec<_>>>()?;

		Ok(Self {
			inline: options.inline.unwrap_or(false),
			ignore,
			compressor: compressor.resolve()?,
			content_types: options
				.content_types
				.unwrap_or_else(|| DEFAULT_CONTENT_TYPES.map(String::from).into()),
			inline_content_types: options
				.inline_content_types
				.unwrap_or_else(|| DEFAULT_INLINE_CONTENT_TYPES.map(String::from).into()),
		})
	}
}

impl TryFrom<Options> for Config {
	type Error = Error;

	fn try_from(options: Options) -> Result<Self> {
		Self::build(options, CompressorOption::Default)
	}
}
