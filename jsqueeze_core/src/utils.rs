use std::{ffi::OsStr, path::Path};

const JAVASCRIPT_EXTENSIONS: [&str; 3] = ["js", "mjs", "cjs"];

/// Content types that get a `charset=utf-8` parameter, the way a web server
/// would send them.
const TEXT_MIME_TYPES: [&str; 4] = ["text/html", "text/php", "text/css", "text/plain"];

#[inline]
pub fn is_javascript_ext<P: AsRef<Path>>(path: P) -> bool {
	path.as_ref()
		.extension()
		.and_then(OsStr::to_str)
		.map(|ext| JAVASCRIPT_EXTENSIONS.contains(&ext))
		.unwrap_or(false)
}

#[inline]
pub fn is_php_ext<P: AsRef<Path>>(path: P) -> bool {
	path.as_ref().extension() == Some(OsStr::new("php"))
}

/// Guesses the content type of a generated file from its extension.
pub fn path_to_content_type<P: AsRef<Path>>(path: P) -> Option<String> {
	let mime = if is_javascript_ext(&path) {
		// Pinned, mime databases disagree between application/ and text/.
		"application/javascript"
	} else if is_php_ext(&path) {
		"text/php"
	} else {
		mime_guess::from_path(&path).first_raw()?
	};

	if TEXT_MIME_TYPES.contains(&mime) {
		Some(format!("{mime}; charset=utf-8"))
	} else {
		Some(mime.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn guesses_content_types() {
		assert_eq!(
			path_to_content_type("js/app.js").as_deref(),
			Some("application/javascript")
		);
		assert_eq!(
			path_to_content_type("lib/app.mjs").as_deref(),
			Some("application/javascript")
		);
		assert_eq!(
			path_to_content_type("index.html").as_deref(),
			Some("text/html; charset=utf-8")
		);
		assert_eq!(
			path_to_content_type("contact.php").as_deref(),
			Some("text/php; charset=utf-8")
		);
		assert_eq!(path_to_content_type("img/logo.png").as_deref(), Some("image/png"));
		assert_eq!(path_to_content_type("LICENSE"), None);
	}
}
