//! # classname - Utility class-name grammar
//!
//! Splits utility class names such as `md:hover:-mt-4` or
//! `bg-[color:var(--brand)]/50` into structured [`Candidate`]s.
//!
//! The grammar is:
//!
//! ```text
//! (<variant>:)* (!)? (-)? <root> (-<value> | -[<arbitrary>] | -(<--var>))? (/<modifier>)? (!)?
//! ```
//!
//! - **Variants** are split on every `:` that is not inside brackets, parentheses
//!   or quotes. Leftmost is outermost.
//! - **Modifiers** follow the last top-level `/`.
//! - **Arbitrary values** (`[...]`) may carry a `type:` hint and are never re-split.
//!   Underscores decode to spaces.
//!
//! Which split of `bg-red-500` is correct depends on what is registered, so
//! [`parse_candidate`] takes a [`Registry`] and returns every interpretation it
//! confirms. [`split_candidate`] is the registry-free structural pass.
//!
//! ## Quick Start
//!
//! ```rust
//! use classname::{parse_candidate, CandidateKind, Registry, Variant, VariantKind};
//!
//! struct Names;
//!
//! impl Registry for Names {
//!     fn has_static_utility(&self, name: &str) -> bool { name == "flex" }
//!     fn has_functional_utility(&self, root: &str) -> bool { root == "bg" }
//!     fn variant_kind(&self, root: &str) -> Option<VariantKind> {
//!         (root == "hover").then_some(VariantKind::Static)
//!     }
//!     fn compounds_with(&self, _: &str, _: &Variant) -> bool { false }
//! }
//!
//! let candidates = parse_candidate("hover:bg-red-500/50", &Names);
//! assert_eq!(candidates.len(), 1);
//! assert!(matches!(
//!     &candidates[0].kind,
//!     CandidateKind::Functional { root, .. } if root == "bg"
//! ));
//!
//! // Invalid or unknown names are dropped, never reported as errors.
//! assert!(parse_candidate("focus:flex", &Names).is_empty());
//! ```

pub mod candidate;
pub mod decode;
pub mod error;
pub mod registry;
pub mod segment;
pub mod variant;

pub use candidate::{
    Candidate, CandidateKind, CandidateValue, Modifier, RawCandidate, parse_candidate,
    split_candidate,
};
pub use decode::{decode_arbitrary_value, is_valid_arbitrary};
pub use error::CandidateError;
pub use registry::{Registry, VariantKind};
pub use segment::segment;
pub use variant::{Variant, VariantValue, find_roots, parse_variant};
