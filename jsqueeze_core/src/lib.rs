//! Build time JavaScript minification for generated sites.
//!
//! [`extension::MinifyJavascript`] looks at a list of [`resource::Resource`]s
//! and registers a filter on the ones holding JavaScript: whole scripts, or the
//! inline `<script>` blocks of HTML-like documents. The host runs those filters
//! when it renders each resource.

pub mod classify;
pub mod compressor;
pub mod config;
pub mod error;
pub mod extension;
pub mod inline;
pub mod matcher;
pub mod minifier;
pub mod resource;
pub mod store;
pub mod utils;

pub use config::{CompressorOption, Config, Options};
pub use extension::{MinifyJavascript, Strategy};
pub use resource::{Filter, Resource};
