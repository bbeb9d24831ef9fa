//! `@apply` resolution.
//!
//! `@apply hover:flex p-4;` is replaced by what the listed candidates
//! compile to, keeping variant nesting relative to the enclosing rule.
//! Utilities may apply other utilities; a candidate that ends up applying
//! itself is reported as [`WcssError::CircularApply`].

use crate::ast::{AstNode, splice};
use crate::compile::compile_nodes;
use crate::design_system::DesignSystem;
use crate::error::{Result, WcssError};

/// Replaces every `@apply` rule in `nodes`. `stack` holds the candidates
/// already being applied.
pub fn substitute_at_apply(
    nodes: &mut Vec<AstNode>,
    ds: &DesignSystem,
    stack: &mut Vec<String>,
) -> Result<()> {
    let mut error = None;
    splice(nodes, &mut |node| {
        if error.is_some() {
            return None;
        }
        let AstNode::AtRule(at) = node else {
            return None;
        };
        if at.name != "apply" {
            return None;
        }
        match expand(&at.params, ds, stack) {
            Ok(nodes) => Some(nodes),
            Err(e) => {
                error = Some(e);
                Some(Vec::new())
            }
        }
    });
    match error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// The candidates named by an `@apply` prelude.
pub fn apply_targets(params: &str) -> impl Iterator<Item = &str> {
    params.split_whitespace()
}

fn expand(params: &str, ds: &DesignSystem, stack: &mut Vec<String>) -> Result<Vec<AstNode>> {
    let mut output = Vec::new();

    for raw in apply_targets(params) {
        if stack.iter().any(|entry| entry == raw) {
            return Err(WcssError::CircularApply {
                candidate: raw.to_string(),
            });
        }

        let candidates = ds.parse_candidate(raw);
        let mut compiled = Vec::new();
        stack.push(raw.to_string());
        for candidate in &candidates {
            if let Some(node) = compile_nodes(ds, candidate, stack)? {
                compiled.push(node);
            }
        }
        stack.pop();

        if compiled.is_empty() {
            return Err(WcssError::UnknownApply {
                candidate: raw.to_string(),
            });
        }
        for node in compiled {
            if let AstNode::Rule(rule) = node {
                output.extend(rule.nodes);
            }
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{decl, rule, statement};
    use crate::theme::Theme;

    #[test]
    fn test_apply_keeps_variant_nesting() {
        let ds = DesignSystem::new(Theme::new());
        let mut nodes = vec![rule(".btn", vec![statement("apply", "flex hover:italic")])];
        substitute_at_apply(&mut nodes, &ds, &mut Vec::new()).unwrap();
        assert_eq!(
            nodes,
            vec![rule(
                ".btn",
                vec![
                    decl("display", "flex"),
                    rule("&:hover", vec![rule("@media (hover: hover)", vec![decl("font-style", "italic")])]),
                ]
            )]
        );
    }

    #[test]
    fn test_unknown_candidate_is_an_error() {
        let ds = DesignSystem::new(Theme::new());
        let mut nodes = vec![rule(".btn", vec![statement("apply", "not-a-utility")])];
        let error = substitute_at_apply(&mut nodes, &ds, &mut Vec::new()).unwrap_err();
        assert_eq!(error.to_string(), "Cannot apply unknown utility class: not-a-utility");
    }

    #[test]
    fn test_self_application_is_circular() {
        let mut ds = DesignSystem::empty(Theme::new());
        ds.utilities.static_utility("loop", vec![statement("apply", "hover:loop")]);
        ds.variants.static_selectors("hover", &["&:hover"]);
        let mut nodes = vec![rule(".a", vec![statement("apply", "hover:loop")])];
        let error = substitute_at_apply(&mut nodes, &ds, &mut Vec::new()).unwrap_err();
        assert!(matches!(error, WcssError::CircularApply { candidate } if candidate == "hover:loop"));
    }
}
