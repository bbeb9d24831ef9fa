//! The CSS tree shared by the entry stylesheet, utility bodies and output.
//!
//! Nesting is kept as written: a variant wraps a rule's children in `&:hover`
//! rules or in at-rules, and [`flatten`](crate::css::flatten) resolves the
//! nesting only when the final stylesheet is printed.

/// A property/value pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

/// A style rule: `selector { nodes }`.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub selector: String,
    pub nodes: Vec<AstNode>,
}

/// An at-rule: `@name params { nodes }` or, without a block, `@name params;`.
#[derive(Clone, Debug, PartialEq)]
pub struct AtRule {
    /// The name without the leading `@`.
    pub name: String,
    pub params: String,
    pub nodes: Vec<AstNode>,
    pub block: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AstNode {
    Rule(Rule),
    AtRule(AtRule),
    Declaration(Declaration),
    Comment(String),
}

/// Builds a declaration node.
pub fn decl(property: impl Into<String>, value: impl Into<String>) -> AstNode {
    AstNode::Declaration(Declaration {
        property: property.into(),
        value: value.into(),
        important: false,
    })
}

/// Builds a rule node, or an at-rule node when `selector` starts with `@`.
pub fn rule(selector: impl Into<String>, nodes: Vec<AstNode>) -> AstNode {
    let selector = selector.into();
    match selector.strip_prefix('@') {
        Some(at) => {
            let (name, params) = match at.find(|c: char| c.is_whitespace() || c == '(') {
                Some(idx) => (&at[..idx], at[idx..].trim()),
                None => (at, ""),
            };
            at_rule(name, params, nodes)
        }
        None => AstNode::Rule(Rule { selector, nodes }),
    }
}

/// Builds an at-rule node with a block.
pub fn at_rule(name: impl Into<String>, params: impl Into<String>, nodes: Vec<AstNode>) -> AstNode {
    AstNode::AtRule(AtRule {
        name: name.into(),
        params: params.into(),
        nodes,
        block: true,
    })
}

/// Builds a block-less at-rule: `@slot;`, `@apply flex;`.
pub fn statement(name: impl Into<String>, params: impl Into<String>) -> AstNode {
    AstNode::AtRule(AtRule {
        name: name.into(),
        params: params.into(),
        nodes: Vec::new(),
        block: false,
    })
}

impl AstNode {
    pub fn as_declaration(&self) -> Option<&Declaration> {
        match self {
            AstNode::Declaration(d) => Some(d),
            _ => None,
        }
    }

    /// Child nodes of rules and at-rules.
    pub fn children(&self) -> Option<&Vec<AstNode>> {
        match self {
            AstNode::Rule(r) => Some(&r.nodes),
            AstNode::AtRule(a) => Some(&a.nodes),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<AstNode>> {
        match self {
            AstNode::Rule(r) => Some(&mut r.nodes),
            AstNode::AtRule(a) => Some(&mut a.nodes),
            _ => None,
        }
    }

    pub fn is_at_rule(&self, name: &str) -> bool {
        matches!(self, AstNode::AtRule(a) if a.name == name)
    }
}

/// Visits every node depth-first, parents before children.
pub fn walk(nodes: &[AstNode], visit: &mut impl FnMut(&AstNode)) {
    for node in nodes {
        visit(node);
        if let Some(children) = node.children() {
            walk(children, visit);
        }
    }
}

/// Mutable depth-first walk, parents before children.
pub fn walk_mut(nodes: &mut [AstNode], visit: &mut impl FnMut(&mut AstNode)) {
    for node in nodes.iter_mut() {
        visit(node);
        if let Some(children) = node.children_mut() {
            walk_mut(children, visit);
        }
    }
}

/// Replaces each node for which `replace` returns `Some` with the returned
/// nodes, recursing into everything else.
pub fn splice(nodes: &mut Vec<AstNode>, replace: &mut impl FnMut(&AstNode) -> Option<Vec<AstNode>>) {
    let mut i = 0;
    while i < nodes.len() {
        match replace(&nodes[i]) {
            Some(replacement) => {
                let len = replacement.len();
                nodes.splice(i..=i, replacement);
                i += len;
            }
            None => {
                if let Some(children) = nodes[i].children_mut() {
                    splice(children, replace);
                }
                i += 1;
            }
        }
    }
}

/// Sets `!important` on every declaration in the tree.
pub fn mark_important(nodes: &mut [AstNode]) {
    walk_mut(nodes, &mut |node| {
        if let AstNode::Declaration(d) = node {
            d.important = true;
        }
    });
}

/// Replaces every `@slot` at-rule with `content`.
///
/// A declaration whose value is the literal text `@slot` is left alone.
pub fn substitute_slot(nodes: &mut Vec<AstNode>, content: &[AstNode]) {
    splice(nodes, &mut |node| {
        node.is_at_rule("slot").then(|| content.to_vec())
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_helper_parses_at_rules() {
        assert_eq!(
            rule("@media (hover: hover)", vec![]),
            at_rule("media", "(hover: hover)", vec![])
        );
        assert_eq!(rule("@starting-style", vec![]), at_rule("starting-style", "", vec![]));
    }

    #[test]
    fn test_substitute_slot_keeps_declaration_values() {
        let mut nodes = vec![
            decl("--custom", "@slot"),
            rule("&:hover", vec![statement("slot", "")]),
        ];
        substitute_slot(&mut nodes, &[decl("color", "red")]);
        assert_eq!(
            nodes,
            vec![
                decl("--custom", "@slot"),
                rule("&:hover", vec![decl("color", "red")]),
            ]
        );
    }
}
