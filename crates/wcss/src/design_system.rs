//! The registries a compiled stylesheet builds against.

use classname::{Candidate, Registry, Variant, VariantKind};

use crate::ast::AstNode;
use crate::css::functions::{contains_function, substitute_functions};
use crate::theme::{ResolvedTheme, Theme, ThemeLookup};
use crate::utilities::{self, Utilities};
use crate::variants::{self, Variants};

/// Tokens, utilities and variants.
///
/// Built once by [`compile`](crate::compile) and only read afterwards, so a
/// single design system can serve any number of concurrent builds.
pub struct DesignSystem {
    pub theme: Theme,
    pub utilities: Utilities,
    pub variants: Variants,
    legacy: Option<ResolvedTheme>,
}

impl DesignSystem {
    /// A design system with the built-in utilities and variants.
    pub fn new(theme: Theme) -> Self {
        let mut utilities = Utilities::new();
        utilities::builtin::register(&mut utilities);

        let mut variants = Variants::new();
        variants::builtin::register(&mut variants, &theme);

        log::debug!(
            "design system ready: {} utility roots, {} variants, {} theme tokens",
            utilities.names().count(),
            variants.names().count(),
            theme.entries().count()
        );

        Self {
            theme,
            utilities,
            variants,
            legacy: None,
        }
    }

    /// A design system with nothing registered.
    pub fn empty(theme: Theme) -> Self {
        Self {
            theme,
            utilities: Utilities::new(),
            variants: Variants::new(),
            legacy: None,
        }
    }

    /// Keeps the frozen legacy configuration around for `theme()` calls in
    /// generated CSS.
    pub(crate) fn set_legacy_theme(&mut self, legacy: ResolvedTheme) {
        self.legacy = Some(legacy);
    }

    /// Every interpretation of `raw` this design system recognizes.
    pub fn parse_candidate(&self, raw: &str) -> Vec<Candidate> {
        classname::parse_candidate(raw, self)
    }

    pub fn parse_variant(&self, raw: &str) -> Option<Variant> {
        classname::parse_variant(raw, self)
    }

    /// Resolves `theme()`, `--theme()`, `--spacing()` and `--alpha()` in
    /// generated nodes.
    pub fn resolve_functions(&self, nodes: &mut [AstNode]) {
        let mut found = false;
        crate::ast::walk(nodes, &mut |node| {
            found |= match node {
                AstNode::Declaration(d) => contains_function(&d.value),
                AstNode::AtRule(a) => contains_function(&a.params),
                _ => false,
            };
        });
        if !found {
            return;
        }

        let legacy = self.legacy.as_ref().map(|legacy| legacy as &dyn ThemeLookup);
        substitute_functions(nodes, &self.theme, legacy);
    }
}

impl Registry for DesignSystem {
    fn has_static_utility(&self, name: &str) -> bool {
        self.utilities.has_static(name)
    }

    fn has_functional_utility(&self, root: &str) -> bool {
        self.utilities.has_functional(root)
    }

    fn variant_kind(&self, root: &str) -> Option<VariantKind> {
        self.variants.kind(root)
    }

    fn compounds_with(&self, parent: &str, child: &Variant) -> bool {
        self.variants.compounds_with(parent, child)
    }
}

impl std::fmt::Debug for DesignSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignSystem")
            .field("theme", &self.theme)
            .field("utilities", &self.utilities)
            .finish_non_exhaustive()
    }
}
