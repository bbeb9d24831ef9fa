//! Error types for compiling an entry stylesheet.
//!
//! Only configuration problems are errors. Class names that do not match
//! anything are dropped during `build` and never surface here.

use thiserror::Error;

/// Boxed error returned by module loaders.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while compiling an entry stylesheet.
///
/// # Examples
///
/// ```rust
/// use wcss::{compile, CompileOptions, WcssError};
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let result = runtime.block_on(compile("@utility -bad { color: red; }", "/", CompileOptions::default()));
/// assert!(matches!(result, Err(WcssError::InvalidUtilityName { .. })));
/// ```
#[derive(Error, Debug)]
pub enum WcssError {
    /// The entry stylesheet could not be parsed.
    #[error("CSS syntax error: {0}")]
    InvalidSyntax(String),

    /// A utility was registered under a name outside the utility grammar.
    #[error("`{source_name}` defines an invalid utility name `{name}`. Utilities should be alphanumeric and start with a lowercase letter.")]
    InvalidUtilityName { source_name: String, name: String },

    /// `addUtilities` received a selector that is not a single class.
    #[error("`addUtilities({{ '{0}' : … }})` defines an invalid utility selector. Utilities must be a single class name and start with a lowercase letter, eg. `.scrollbar-none`.")]
    InvalidUtilitySelector(String),

    /// A variant was registered under an invalid name.
    #[error("`{0}` is not a valid variant name. Variants should be alphanumeric and start with a lowercase letter.")]
    InvalidVariantName(String),

    /// A variant body could not be understood.
    #[error("invalid variant `{name}`: {reason}")]
    InvalidVariant { name: String, reason: String },

    /// `@apply` closed a dependency loop.
    #[error("You cannot `@apply` the `{candidate}` utility here because it creates a circular dependency.")]
    CircularApply { candidate: String },

    /// `@apply` named something that compiles to nothing.
    #[error("Cannot apply unknown utility class: {candidate}")]
    UnknownApply { candidate: String },

    /// A lazy theme value depends on itself.
    #[error("circular theme reference while resolving `{path}`")]
    CircularTheme { path: String },

    /// A directive was used with missing or malformed parameters.
    #[error("invalid `@{directive}`: {reason}")]
    InvalidDirective { directive: String, reason: String },

    /// The module loader failed for a `@plugin` or `@config` target.
    #[error("failed to load module `{id}`")]
    Loader {
        id: String,
        #[source]
        source: BoxError,
    },
}

pub type Result<T> = std::result::Result<T, WcssError>;
