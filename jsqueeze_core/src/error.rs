use globset::Error as GlobError;
use regex::Error as RegexError;
use std::result::Result as StdResult;
use thiserror::Error;

pub type Result<T> = StdResult<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
	#[error("{message}")]
	RegexError { message: String, source: RegexError },
	#[error("{message}")]
	Glob { message: String, source: GlobError },
	#[error("{0}")]
	Validation(String),
	/// A compressor failure that is not a rejection of the input script.
	#[error("compressor fault while minifying {path}: {message}")]
	Compressor { path: String, message: String },
}

#[macro_export]
macro_rules! map_err {
	(
		@map_err_core
		$expr:expr,
		$variant:ident $msg:literal
	) => {
		$expr.map_err(
			#[inline]
			|error| $crate::error::Error::$variant {
				message: $msg.into(),
				source: error,
			}
		)
	};
	(
		@map_err_core
		$expr:expr,
		$variant:ident $msg:expr
	) => {
		$expr.map_err(
			#[inline]
			|error| $crate::error::Error::$variant {
				message: $msg,
				source: error,
			}
		)
	};
	(
		@map_err_core
		$expr:expr,
		$variant:ident
	) => {
		$expr.map_err(
			#[inline]
			|error| $crate::error::Error::$variant {
				message: "".into(),
				source: error,
			}
		)
	};
	(
		$expr:expr,
		$variant:ident$(($msg:literal))?$(,)?
	) => {
		$crate::map_err!(
			@map_err_core
			$expr,
			$variant $($msg)?
		)
	};
	(
		$expr:expr,
		$variant:ident$(($msg:expr))?$(,)?
	) => {
		$crate::map_err!(
			@map_err_core
			$expr,
			$variant $($msg)?
		)
	};
}

#[macro_export]
macro_rules! err {
	($variant:ident($msg:literal)) => {
		$crate::error::Error::$variant($msg.into())
	};
	($variant:ident($msg:expr)) => {
		$crate::error::Error::$variant($msg)
	};
}
