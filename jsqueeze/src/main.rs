use clap::{Parser, Subcommand};
use config::Config;
use dotenvy::dotenv;
use jsqueeze_core::MinifyJavascript;
use miette::{Context, IntoDiagnostic};
use std::{io, path::PathBuf};
use tracing::Level;
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter, Registry};

mod config;
mod site;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
	/// Config file
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Verbose logs
	#[arg(short, long)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Clone, Debug, Subcommand, PartialEq, Eq)]
enum Command {
	/// Minify the JavaScript of a generated site in place
	Minify {
		/// Generated site to minify, overrides the config file
		#[arg(short, long)]
		out_dir: Option<PathBuf>,

		/// Report what would change without writing anything
		#[arg(long)]
		dry_run: bool,
	},
	/// Validate the config file and print the resolved options
	CheckConfig,
}

impl Command {
	async fn exec(&self, config: Config) -> miette::Result<()> {
		match self {
			Self::Minify { out_dir, dry_run } => {
				let site = config.resolve(out_dir.clone())?;
				let extension = MinifyJavascript::new(site.minify).into_diagnostic()?;

				let summary = site::minify_site(&site.out_dir, extension, *dry_run).await?;
				println!(
					"{} files, {} annotated, {} {}",
					summary.files,
					summary.annotated,
					summary.rewritten,
					if *dry_run { "to rewrite" } else { "rewritten" },
				);
			}
			Self::CheckConfig => {
				let site = config.resolve(None)?;
				println!("{site:#?}");
			}
		}

		Ok(())
	}
}

fn main() -> miette::Result<()> {
	dotenv().ok();

	let cli = Cli::parse();
	init_tracing(cli.verbose)?;

	let config = Config::load(cli.config.as_deref())?;

	let runtime = tokio::runtime::Builder::new_current_thread()
		.enable_all()
		.build()
		.into_diagnostic()
		.wrap_err("Failed to start runtime")?;

	runtime.block_on(cli.command.exec(config))
}

fn init_tracing(verbose: bool) -> miette::Result<()> {
	let env_filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new("jsqueeze=info,jsqueeze_core=info"));
	let tracing_subscriber = Registry::default().with(env_filter);

	let max_level = if verbose { Level::TRACE } else { Level::WARN };
	let fmt_layer = tracing_subscriber::fmt::layer()
		.with_writer(io::stderr.with_max_level(max_level))
		.with_span_events(FmtSpan::CLOSE);

	tracing::subscriber::set_global_default(tracing_subscriber.with(fmt_layer))
		.into_diagnostic()
		.wrap_err("Failed to install tracing subscriber")
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn cli_is_well_formed() {
		Cli::command().debug_assert();
	}

	#[test]
	fn parses_minify_flags() {
		let cli = Cli::try_parse_from(["jsqueeze", "-v", "minify", "--out-dir", "public", "--dry-run"])
			.unwrap();
		assert!(cli.verbose);
		assert_eq!(
			cli.command,
			Command::Minify {
				out_dir: Some(PathBuf::from("public")),
				dry_run: true,
			}
		);
	}
}
