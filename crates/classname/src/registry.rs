//! The lookup surface candidate parsing needs from the utility and variant
//! registries.

use crate::variant::Variant;

/// How a registered variant consumes the text after its root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariantKind {
    /// `hover`: no value, no modifier.
    Static,
    /// `min-[40rem]`, `aria-checked`: optional value and modifier.
    Functional,
    /// `group-hover`: the value is itself a variant.
    Compound,
}

/// Answers "is this name registered?" for the parser.
///
/// Root discovery is ambiguous by nature (`bg-red-500` could be the root
/// `bg-red` with value `500`), so the parser asks the registry about every
/// candidate split and keeps all the interpretations it confirms.
pub trait Registry {
    fn has_static_utility(&self, name: &str) -> bool;

    fn has_functional_utility(&self, root: &str) -> bool;

    fn variant_kind(&self, root: &str) -> Option<VariantKind>;

    /// Whether the compound variant `parent` may wrap `child`.
    fn compounds_with(&self, parent: &str, child: &Variant) -> bool;
}
