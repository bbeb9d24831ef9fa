//! # windcraft
//!
//! A utility-first CSS compiler. Give it an entry stylesheet and the class
//! names your sources use; it returns the CSS for exactly those classes.
//!
//! The work is split across two crates, both re-exported here:
//!
//! - [`classname`]: the class-name grammar (`md:hover:bg-red-500/50`)
//! - [`wcss`]: themes, utilities, variants, directives and CSS output
//!
//! ```rust
//! use windcraft::{compile, CompileOptions};
//!
//! let css = "@theme reference { --color-brand: #0088cc; } @tailwind utilities;";
//! let compiler = futures::executor::block_on(compile(css, ".", CompileOptions::new().minify(true)))
//!     .expect("valid stylesheet");
//!
//! let candidates = windcraft::candidates("<a class=\"text-brand underline\">");
//! assert!(compiler.build(candidates).contains(".underline{text-decoration-line:underline}"));
//! ```

pub mod error;
mod log_init;

pub use classname;
pub use wcss;

pub use error::{Result, WindcraftError};
pub use log_init::init_logger;
pub use wcss::{CompileOptions, Compiler, Glob, WcssError, compile};

/// Splits text into candidate tokens.
///
/// Tokens are separated by whitespace, quotes, backticks and `<>=`. This is
/// deliberately loose: anything that is not a class simply produces no CSS.
///
/// ```
/// let found: Vec<_> = windcraft::candidates(r#"<div class="flex md:hover:mt-[10px]">"#).collect();
/// assert_eq!(found, ["div", "class", "flex", "md:hover:mt-[10px]"]);
/// ```
pub fn candidates(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '<' | '>' | '='))
        .filter(|token| !token.is_empty())
}
