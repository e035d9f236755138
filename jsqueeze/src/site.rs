use jsqueeze_core::{utils::path_to_content_type, MinifyJavascript, Resource};
use miette::{Context, IntoDiagnostic};
use std::{
	fs,
	io::ErrorKind,
	path::{Path, PathBuf},
	sync::Arc,
};
use tokio::task::JoinSet;
use tracing::instrument;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
	pub files: usize,
	pub annotated: usize,
	pub rewritten: usize,
}

/// Minifies the JavaScript of an already generated site in place.
#[instrument(skip(extension))]
pub async fn minify_site(
	out_dir: &Path,
	extension: Arc<MinifyJavascript>,
	dry_run: bool,
) -> miette::Result<Summary> {
	let mut resources = collect_resources(out_dir)?;
	let annotated = extension.manipulate_resource_list(&mut resources);

	let mut summary = Summary {
		files: resources.len(),
		annotated,
		rewritten: 0,
	};

	let mut join_set = JoinSet::new();
	for resource in resources.iter().filter(|r| !r.filters.is_empty()) {
		let path = out_dir.join(&resource.destination_path);

		let content = match tokio::fs::read_to_string(&path).await {
			Ok(content) => content,
			Err(error) if error.kind() == ErrorKind::InvalidData => {
				tracing::warn!(path = %resource.destination_path, "not valid UTF-8, skipping");
				continue;
			}
			Err(error) => {
				return Err(error)
					.into_diagnostic()
					.wrap_err(format!("Failed to read {}", path.display()))
			}
		};

		let rendered = resource
			.render(&content)
			.into_diagnostic()
			.wrap_err(format!("Failed to minify {}", resource.destination_path))?;

		if rendered == content {
			continue;
		}

		summary.rewritten += 1;
		if dry_run {
			tracing::info!(path = %resource.destination_path, "would rewrite");
		} else {
			join_set.spawn(write_file(path, rendered));
		}
	}

	await_joinset(join_set).await?;

	Ok(summary)
}

/// One resource per file under `out_dir`, in path order.
#[instrument(level = "debug")]
pub fn collect_resources(out_dir: &Path) -> miette::Result<Vec<Resource>> {
	let mut resources = vec![];

	recursive_process(out_dir, &mut |file| {
		let destination_path = file
			.strip_prefix(out_dir)
			.into_diagnostic()
			.wrap_err(format!("Failed to strip prefix from {}", file.display()))?;

		resources.push(Resource::new(
			path_to_content_type(destination_path).as_deref(),
			destination_path.to_string_lossy(),
		));
		Ok(())
	})?;

	resources.sort_by(|a, b| a.destination_path.cmp(&b.destination_path));
	Ok(resources)
}

fn recursive_process<F>(path: &Path, f: &mut F) -> miette::Result<()>
where
	F: FnMut(&Path) -> miette::Result<()>,
{
	if path.is_dir() {
		for entry in fs::read_dir(path)
			.into_diagnostic()
			.wrap_err(format!("Failed to read dir {}", path.display()))?
		{
			let entry = entry.into_diagnostic().wrap_err("Dir entry failed")?;
			recursive_process(&entry.path(), f)?;
		}
	} else {
		f(path)?;
	}
	Ok(())
}

#[instrument(level = "debug", skip(content))]
async fn write_file(path: PathBuf, content: String) -> miette::Result<()> {
	tokio::fs::write(&path, content)
		.await
		.into_diagnostic()
		.wrap_err(format!("Failed to write {}", path.display()))
}

#[inline]
async fn await_joinset(mut join_set: JoinSet<miette::Result<()>>) -> miette::Result<()> {
	while let Some(result) = join_set.join_next().await {
		result.into_diagnostic()??;
	}

	Ok(())
}
