//! # WCSS - Utility CSS Engine
//!
//! Compiles utility class names such as `md:hover:bg-red-500/50` into plain
//! CSS, driven by an entry stylesheet that declares design tokens, custom
//! utilities, custom variants and plugins.
//!
//! - **Compile**: read the entry stylesheet once with [`compile`]
//! - **Build**: turn any set of candidates into CSS with [`Compiler::build`]
//! - **Extend**: register utilities and variants from Rust through the
//!   plugin API in [`compat`]
//!
//! ## Quick Start
//!
//! ```rust
//! use wcss::{compile, CompileOptions};
//!
//! let css = r#"
//!     @theme reference { --spacing-4: 1rem; }
//!     @tailwind utilities;
//! "#;
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let compiler = runtime
//!     .block_on(compile(css, "/", CompileOptions::new().minify(true)))
//!     .expect("valid stylesheet");
//!
//! assert_eq!(
//!     compiler.build(["mt-4", "flex"]),
//!     ".mt-4{margin-top:var(--spacing-4,1rem)}.flex{display:flex}"
//! );
//! ```
//!
//! ## Supported Directives
//!
//! - `@theme [reference|inline|default] { --token: value; }`
//! - `@utility name { … }` and `@utility name-* { prop: --value(…); }`
//! - `@custom-variant name (selector);` and `@custom-variant name { … @slot; }`
//! - `@variant name { … }` inside rules
//! - `@apply candidate …;`
//! - `@plugin "id" { options }` and `@config "id";`
//! - `@source "glob";`
//! - `@tailwind base;` and `@tailwind utilities;`
//!
//! ## Ordering
//!
//! Output is sorted so later rules win where it matters: utilities without
//! variants first, then by variant registration order. Within one variant
//! set, shorthand properties come before the longhands they cover, so
//! `m-4 mt-2` keeps `margin-top` from `mt-2`.
//!
//! ## Modules
//!
//! - [`compiler`]: the [`compile`] entry point and [`Compiler`]
//! - [`design_system`]: theme plus utility and variant registries
//! - [`utilities`], [`variants`]: the registries and built-in definitions
//! - [`theme`]: the token store and legacy configuration lookups
//! - [`compat`]: the plugin API and configuration objects
//! - [`css`]: stylesheet parsing, flattening and printing
//! - [`error`]: error types for compile failures

pub mod apply;
pub mod ast;
pub mod compat;
pub mod compile;
pub mod compiler;
pub mod css;
mod directives;
pub mod design_system;
pub mod error;
pub mod loader;
pub mod property;
pub mod sort;
pub mod theme;
pub mod utilities;
pub mod value;
pub mod variants;

pub use compiler::{CompileOptions, Compiler, Glob, compile};
pub use design_system::DesignSystem;
pub use error::{Result, WcssError};
pub use loader::{LoadedModule, Module, ModuleLoader, ModuleMap};
