//! Reading, nesting resolution and printing of CSS text.
//!
//! ## Submodules
//!
//! - [`parser`]: structural parser for entry stylesheets and variant templates
//! - [`flatten`]: resolves `&` nesting and hoists conditional at-rules
//! - [`printer`]: pretty and minified serialization
//! - [`escape`]: CSS identifier escaping for generated class selectors
//! - [`functions`]: `--alpha()`, `--spacing()`, `--theme()` and `theme()` in values

pub mod escape;
pub mod flatten;
pub mod functions;
pub mod parser;
pub mod printer;

pub use escape::{escape_class_name, unescape};
pub use flatten::{flatten, resolve_selector};
pub use parser::parse_stylesheet;
pub use printer::{PrintOptions, to_css};
