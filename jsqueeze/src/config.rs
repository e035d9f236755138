use jsqueeze_core::config::{Config as MinifyConfig, Options as MinifyOptions};
use miette::{Context, IntoDiagnostic};
use serde_derive::Deserialize;
use std::{
	env,
	path::{Path, PathBuf},
};

pub const DEFAULT_CONFIG_FILE: &str = "jsqueeze.toml";
pub const DEFAULT_OUT_DIR: &str = "./build";
pub const OUT_DIR_ENV: &str = "JSQUEEZE_OUT_DIR";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
	pub out_dir: Option<PathBuf>,
	#[serde(default)]
	pub minify_javascript: MinifyOptions,
}

#[derive(Debug)]
pub struct SiteConfig {
	pub out_dir: PathBuf,
	pub minify: MinifyConfig,
}

impl Config {
	/// Reads `path`, or the default config file when `path` is `None`. Only a
	/// missing default file falls back to the defaults.
	pub fn load(path: Option<&Path>) -> miette::Result<Self> {
		let file = path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));

		match std::fs::read_to_string(file) {
			Err(error) if path.is_none() && error.kind() == std::io::ErrorKind::NotFound => {
				tracing::debug!("no {DEFAULT_CONFIG_FILE}, using defaults");
				Ok(Self::default())
			}
			Err(error) => Err(error)
				.into_diagnostic()
				.wrap_err(format!("Failed to read config file {}", file.display())),
			Ok(raw) => Self::parse(&raw)
				.wrap_err(format!("Failed to parse config file {}", file.display())),
		}
	}

	pub fn parse(raw: &str) -> miette::Result<Self> {
		toml::from_str(raw).into_diagnostic()
	}

	/// Resolves the config. `out_dir` overrides the configured output dir.
	pub fn resolve(self, out_dir: Option<PathBuf>) -> miette::Result<SiteConfig> {
		let out_dir = out_dir
			.or(self.out_dir)
			.or_else(|| env::var_os(OUT_DIR_ENV).map(PathBuf::from))
			.unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));

		let out_dir = out_dir
			.canonicalize()
			.into_diagnostic()
			.wrap_err(format!("Failed to canonicalize {}", out_dir.display()))?;

		let minify = MinifyConfig::try_from(self.minify_javascript)
			.into_diagnostic()
			.wrap_err("Invalid minify_javascript options")?;

		Ok(SiteConfig { out_dir, minify })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_full_config() {
		let config = Config::parse(
			r#"
			out_dir = "public"

			[minify_javascript]
			inline = true
			ignore = ["vendor/*", { regex = "\\.bundle\\." }]
			compressor = "identity"
			inline_content_types = ["text/html"]
			"#,
		)
		.unwrap();

		assert_eq!(config.out_dir, Some(PathBuf::from("public")));
		assert_eq!(config.minify_javascript.inline, Some(true));
		assert_eq!(config.minify_javascript.ignore.len(), 2);
	}

	#[test]
	fn empty_config_uses_defaults() {
		let config = Config::parse("").unwrap();
		assert!(config.out_dir.is_none());
		assert!(config.minify_javascript.inline.is_none());
		assert!(config.minify_javascript.ignore.is_empty());
	}

	#[test]
	fn explicit_missing_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		assert!(Config::load(Some(dir.path().join("missing.toml").as_path())).is_err());
	}

	#[test]
	fn resolves_against_an_existing_dir() {
		let dir = tempfile::tempdir().unwrap();
		let site = Config::default()
			.resolve(Some(dir.path().to_path_buf()))
			.unwrap();
		assert_eq!(site.out_dir, dir.path().canonicalize().unwrap());
		assert!(!site.minify.inline);
	}

	#[test]
	fn invalid_options_fail_to_resolve() {
		let dir = tempfile::tempdir().unwrap();
		let config = Config::parse(
			r#"
			[minify_javascript]
			ignore = [{ regex = "(" }]
			"#,
		)
		.unwrap();
		assert!(config.resolve(Some(dir.path().to_path_buf())).is_err());
	}
}
