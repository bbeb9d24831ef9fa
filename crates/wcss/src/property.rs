//! `@property` registrations for internal custom properties.
//!
//! Utilities such as `translate-x-4` write to `--tw-translate-x` and read
//! `--tw-translate-y`, which must have a usable initial value even when no
//! utility set it. Each property is registered once per build with an
//! `@property` rule. A reset layer carries the same initial values for engines
//! that do not honor `@property` initial values, guarded by a feature query
//! that only matches those engines.

use std::collections::HashSet;

use crate::ast::{AstNode, at_rule, decl, rule};

/// Matches engines without `@property` initial-value support.
const LEGACY_ENGINE_QUERY: &str = "(((-webkit-hyphens: none)) and (not (margin-trim: inline))) or ((-moz-orient: inline) and (not (color: rgb(from red r g b))))";

/// Builds an `@property` rule. Utilities include these in their output and
/// the build pulls them out.
///
/// ```
/// use wcss::property::property;
/// use wcss::css::{to_css, PrintOptions};
///
/// let css = to_css(&[property("--tw-translate-x", Some("0"), None)], &PrintOptions::minified());
/// assert_eq!(css, r#"@property --tw-translate-x{syntax:"*";inherits:false;initial-value:0}"#);
/// ```
pub fn property(name: &str, initial: Option<&str>, syntax: Option<&str>) -> AstNode {
    let mut nodes = vec![
        decl("syntax", format!("\"{}\"", syntax.unwrap_or("*"))),
        decl("inherits", "false"),
    ];
    if let Some(initial) = initial {
        nodes.push(decl("initial-value", initial));
    }
    at_rule("property", name, nodes)
}

/// Collects the `@property` rules seen during a build, first one wins.
#[derive(Debug, Default)]
pub struct Properties {
    seen: HashSet<String>,
    rules: Vec<AstNode>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves every `@property` rule out of `nodes`, at any depth.
    pub fn extract(&mut self, nodes: &mut Vec<AstNode>) {
        let mut kept = Vec::with_capacity(nodes.len());
        for mut node in nodes.drain(..) {
            if let AstNode::AtRule(at) = &node {
                if at.name == "property" {
                    let name = at.params.trim().to_string();
                    if self.seen.insert(name) {
                        self.rules.push(node);
                    }
                    continue;
                }
            }
            if let Some(children) = node.children_mut() {
                self.extract(children);
            }
            kept.push(node);
        }
        *nodes = kept;
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The reset layer followed by the `@property` rules.
    pub fn into_nodes(self) -> Vec<AstNode> {
        if self.rules.is_empty() {
            return Vec::new();
        }

        let resets: Vec<AstNode> = self
            .rules
            .iter()
            .filter_map(|node| {
                let AstNode::AtRule(at) = node else {
                    return None;
                };
                let initial = at
                    .nodes
                    .iter()
                    .filter_map(AstNode::as_declaration)
                    .find(|d| d.property == "initial-value")
                    .map(|d| d.value.clone())
                    .unwrap_or_else(|| "initial".to_string());
                Some(decl(at.params.trim(), initial))
            })
            .collect();

        let mut out = vec![at_rule(
            "supports",
            LEGACY_ENGINE_QUERY,
            vec![at_rule(
                "layer",
                "base",
                vec![rule("*, ::before, ::after, ::backdrop", resets)],
            )],
        )];
        out.extend(self.rules);
        out
    }
}
