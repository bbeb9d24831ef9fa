//! Nested rule flattening.
//!
//! Utilities and variants build nested trees:
//!
//! ```css
//! .md\:hover\:flex {
//!     @media (width >= 48rem) {
//!         &:hover { display: flex; }
//!     }
//! }
//! ```
//!
//! which flatten to:
//!
//! ```css
//! @media (width >= 48rem) {
//!     .md\:hover\:flex:hover { display: flex; }
//! }
//! ```
//!
//! ## Flattening Rules
//!
//! - `&` is replaced by the parent selector (`:is(a, b)` when the parent is a list)
//! - A nested selector without `&` is a descendant of the parent
//! - Conditional at-rules (`@media`, `@supports`, `@container`, `@layer`, …) are
//!   hoisted above the rule and keep their own nesting
//! - Declarations directly inside a hoisted at-rule are wrapped in the parent rule
//! - Declarations are kept in source order; a nested rule between two groups of
//!   declarations splits the parent into two rules

use classname::segment;

use crate::ast::{AstNode, AtRule, Rule};

const CONDITIONAL_AT_RULES: &[&str] = &[
    "media",
    "supports",
    "container",
    "layer",
    "starting-style",
    "scope",
    "document",
];

/// Flattens nested rules into a tree with only at-rule nesting left.
pub fn flatten(nodes: Vec<AstNode>) -> Vec<AstNode> {
    flatten_nodes(nodes, None)
}

fn flatten_nodes(nodes: Vec<AstNode>, parent: Option<&str>) -> Vec<AstNode> {
    let mut output = Vec::new();
    let mut pending = Vec::new();

    for node in nodes {
        match node {
            AstNode::Declaration(_) | AstNode::Comment(_) => pending.push(node),
            AstNode::Rule(rule) => {
                flush(&mut pending, parent, &mut output);
                let selector = match parent {
                    Some(parent) => resolve_selector(parent, &rule.selector),
                    None => rule.selector,
                };
                output.extend(flatten_nodes(rule.nodes, Some(&selector)));
            }
            AstNode::AtRule(at) => {
                flush(&mut pending, parent, &mut output);
                output.push(AstNode::AtRule(flatten_at_rule(at, parent)));
            }
        }
    }

    flush(&mut pending, parent, &mut output);
    output
}

fn flatten_at_rule(at: AtRule, parent: Option<&str>) -> AtRule {
    if !at.block {
        return at;
    }

    let nodes = if CONDITIONAL_AT_RULES.contains(&at.name.as_str()) {
        flatten_nodes(at.nodes, parent)
    } else if matches!(at.name.as_str(), "keyframes" | "font-face" | "property" | "page") {
        at.nodes
    } else {
        flatten_nodes(at.nodes, None)
    };

    AtRule { nodes, ..at }
}

fn flush(pending: &mut Vec<AstNode>, parent: Option<&str>, output: &mut Vec<AstNode>) {
    if pending.is_empty() {
        return;
    }
    let nodes = std::mem::take(pending);
    match parent {
        Some(selector) => output.push(AstNode::Rule(Rule {
            selector: selector.to_string(),
            nodes,
        })),
        None => output.extend(nodes),
    }
}

/// Combines a parent selector (list) with a nested child selector (list).
///
/// # Examples
///
/// ```
/// use wcss::css::resolve_selector;
///
/// assert_eq!(resolve_selector(".a", "&:hover, &:focus"), ".a:hover, .a:focus");
/// assert_eq!(resolve_selector(".a, .b", "&:hover"), ":is(.a, .b):hover");
/// assert_eq!(resolve_selector(".a", "> img"), ".a > img");
/// assert_eq!(resolve_selector(".a", "span"), ".a span");
/// ```
pub fn resolve_selector(parent: &str, child: &str) -> String {
    let parents: Vec<&str> = segment(parent, ',').into_iter().map(str::trim).collect();
    let parent_ref = if parents.len() > 1 {
        format!(":is({})", parents.join(", "))
    } else {
        parent.trim().to_string()
    };

    segment(child, ',')
        .into_iter()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| {
            if has_nesting_selector(c) {
                replace_nesting_selector(c, &parent_ref)
            } else {
                format!("{parent_ref} {c}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn has_nesting_selector(selector: &str) -> bool {
    let mut escaped = false;
    for c in selector.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '&' => return true,
            _ => {}
        }
    }
    false
}

fn replace_nesting_selector(selector: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(selector.len() + replacement.len());
    let mut escaped = false;
    for c in selector.chars() {
        if escaped {
            escaped = false;
            out.push(c);
            continue;
        }
        match c {
            '\\' => {
                escaped = true;
                out.push(c);
            }
            '&' => out.push_str(replacement),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{at_rule, decl, rule};

    #[test]
    fn test_at_rules_are_hoisted_above_rules() {
        let nodes = vec![rule(
            ".x",
            vec![at_rule(
                "media",
                "(hover: hover)",
                vec![rule("&:hover", vec![decl("color", "red")])],
            )],
        )];
        assert_eq!(
            flatten(nodes),
            vec![at_rule(
                "media",
                "(hover: hover)",
                vec![rule(".x:hover", vec![decl("color", "red")])]
            )]
        );
    }

    #[test]
    fn test_declarations_inside_at_rule_wrap_parent() {
        let nodes = vec![rule(
            ".x",
            vec![
                decl("display", "flex"),
                at_rule("media", "print", vec![decl("display", "none")]),
            ],
        )];
        assert_eq!(
            flatten(nodes),
            vec![
                rule(".x", vec![decl("display", "flex")]),
                at_rule("media", "print", vec![rule(".x", vec![decl("display", "none")])]),
            ]
        );
    }

    #[test]
    fn test_escaped_ampersand_is_not_replaced() {
        assert_eq!(resolve_selector(".p", r".\&x &"), r".\&x .p");
    }

    #[test]
    fn test_keyframes_children_are_untouched() {
        let nodes = vec![at_rule(
            "keyframes",
            "spin",
            vec![rule("to", vec![decl("rotate", "360deg")])],
        )];
        assert_eq!(flatten(nodes.clone()), nodes);
    }
}
