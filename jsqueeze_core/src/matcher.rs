use crate::{
	error::Result,
	map_err,
	store::{Cache, InMemoryStore},
};
use globset::{Glob, GlobMatcher};
use regex::Regex;
use tracing::instrument;

/// Matches file names that have already been minified, e.g. `vendor.min.js`.
pub const ALREADY_MINIFIED_PATTERN: &str = r"\.min\.";

#[derive(Clone, Debug)]
pub enum IgnoreRule {
	/// Compared with the whole path.
	Literal(String),
	/// Shell style glob matched against the whole path. `*` crosses `/`.
	Glob(GlobMatcher),
	/// Searched anywhere in the path.
	Regex(Regex),
}

impl IgnoreRule {
	/// A plain path rule: a glob when it contains `*`, otherwise the exact path.
	pub fn path(pattern: &str) -> Result<Self> {
		if pattern.contains('*') {
			Self::glob(pattern)
		} else {
			Ok(Self::Literal(pattern.to_string()))
		}
	}

	pub fn glob(pattern: &str) -> Result<Self> {
		let glob = map_err!(
			Glob::new(pattern),
			Glob(format!("invalid ignore glob {pattern:?}")),
		)?;
		Ok(Self::Glob(glob.compile_matcher()))
	}

	pub fn regex(pattern: &str) -> Result<Self> {
		let regex = map_err!(
			Regex::new(pattern),
			RegexError(format!("invalid ignore regex {pattern:?}")),
		)?;
		Ok(Self::Regex(regex))
	}

	#[inline]
	pub fn is_match(&self, path: &str) -> bool {
		match self {
			Self::Literal(literal) => literal == path,
			Self::Glob(glob) => glob.is_match(path),
			Self::Regex(regex) => regex.is_match(path),
		}
	}
}

#[derive(Debug)]
pub struct IgnoreMatcher {
	rules: Vec<IgnoreRule>,
	cache: InMemoryStore<String, bool>,
}

impl IgnoreMatcher {
	/// `rules` are the user supplied rules; the already-minified rule is always
	/// appended.
	pub fn new(mut rules: Vec<IgnoreRule>) -> Result<Self> {
		rules.push(IgnoreRule::regex(ALREADY_MINIFIED_PATTERN)?);
		Ok(Self {
			rules,
			cache: InMemoryStore::new(),
		})
	}

	/// Whether `path` should be left alone.
	#[instrument(level = "trace", skip(self))]
	pub fn ignore(&self, path: &str) -> bool {
		self.cache.get_or_insert_with(&path.to_string(), || {
			self.rules.iter().any(|rule| rule.is_match(path))
		})
	}
}
