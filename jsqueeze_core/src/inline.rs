//! Finds inline `<script>` blocks in HTML-like documents.
//!
//! This is a heuristic scan, not an HTML parser. A block is an opening
//! `<script ...>` tag, an optional `//<!--` or `//<![CDATA[` guard line, the
//! script body and an optional `//-->` or `//]]>` guard before `</script>`.
//! Guards and tags are kept verbatim; only the body is ever rewritten.

use crate::error::Result;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;
use tracing::instrument;

static INLINE_SCRIPT: Lazy<Regex> = Lazy::new(|| {
	Regex::new(concat!(
		r"(?s)",
		r"(<script[^>]*>(?-u:\s)*(?://(?:<!--|<!\[CDATA\[)\n)?)",
		r"(.*?)",
		r"((?:(?:\n(?-u:\s)*)?//(?:-->|\]\]>))?(?-u:\s)*</script>)",
	))
	.expect("inline script pattern is valid")
});

/// One `<script>` block found by [`scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptMatch<'a> {
	/// Byte range of the whole block in the scanned document.
	pub range: Range<usize>,
	/// Opening tag, leading whitespace and guard opener.
	pub prefix: &'a str,
	pub body: &'a str,
	/// Guard closer, trailing whitespace and closing tag.
	pub suffix: &'a str,
	/// False when the tag declares a type other than `text/javascript`.
	pub eligible: bool,
}

impl<'a> ScriptMatch<'a> {
	fn from_captures(captures: Captures<'a>) -> Option<Self> {
		let whole = captures.get(0)?;
		let prefix = captures.get(1)?.as_str();
		let body = captures.get(2)?.as_str();
		let suffix = captures.get(3)?.as_str();

		Some(Self {
			range: whole.range(),
			prefix,
			body,
			suffix,
			eligible: is_javascript_tag(prefix),
		})
	}
}

/// Untyped tags and tags typed `text/javascript` hold JavaScript; anything
/// else (e.g. `text/html` client side templates) is left alone.
#[inline]
pub fn is_javascript_tag(prefix: &str) -> bool {
	!prefix.contains("type=") || prefix.contains("text/javascript")
}

/// All script blocks in `html`, in document order and non-overlapping.
pub fn scan(html: &str) -> Vec<ScriptMatch<'_>> {
	INLINE_SCRIPT
		.captures_iter(html)
		.filter_map(ScriptMatch::from_captures)
		.collect()
}

/// Returns `html` with the body of every eligible script block passed through
/// `minify`. Everything outside those bodies is copied as is.
#[instrument(level = "debug", skip_all, fields(len = html.len()))]
pub fn rewrite_inline<F>(html: &str, mut minify: F) -> Result<String>
where
	F: FnMut(&str) -> Result<String>,
{
	let mut out = String::with_capacity(html.len());
	let mut last = 0;

	for script in scan(html) {
		if !script.eligible {
			continue;
		}

		out.push_str(&html[last..script.range.start]);
		out.push_str(script.prefix);
		out.push_str(&minify(script.body)?);
		out.push_str(script.suffix);
		last = script.range.end;
	}

	out.push_str(&html[last..]);
	Ok(out)
}
