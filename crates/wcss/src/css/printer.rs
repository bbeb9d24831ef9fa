//! CSS serialization.
//!
//! Rules and at-rule blocks without any printable content are skipped, so a
//! build that matched nothing prints an empty string.

use crate::ast::{AstNode, AtRule, Declaration};

/// Output formatting options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrintOptions {
    /// Drop all insignificant whitespace.
    pub minify: bool,
}

impl PrintOptions {
    pub fn minified() -> Self {
        Self { minify: true }
    }
}

/// Serializes nodes to CSS text.
///
/// # Examples
///
/// ```
/// use wcss::ast::{decl, rule};
/// use wcss::css::{to_css, PrintOptions};
///
/// let nodes = vec![rule(".a", vec![decl("color", "red")])];
/// assert_eq!(to_css(&nodes, &PrintOptions::default()), ".a {\n  color: red;\n}\n");
/// assert_eq!(to_css(&nodes, &PrintOptions::minified()), ".a{color:red}");
/// ```
pub fn to_css(nodes: &[AstNode], options: &PrintOptions) -> String {
    let mut out = String::new();
    for node in nodes {
        print_node(node, 0, options, &mut out);
    }
    out
}

fn print_node(node: &AstNode, depth: usize, options: &PrintOptions, out: &mut String) {
    if !has_content(node) {
        return;
    }

    let indent = if options.minify {
        String::new()
    } else {
        "  ".repeat(depth)
    };

    match node {
        AstNode::Declaration(d) => {
            if options.minify {
                if !out.is_empty() && !out.ends_with('{') && !out.ends_with('}') {
                    out.push(';');
                }
                print_declaration(d, options, out);
            } else {
                out.push_str(&indent);
                print_declaration(d, options, out);
                out.push_str(";\n");
            }
        }
        AstNode::Comment(text) => {
            if !options.minify {
                out.push_str(&indent);
                out.push_str(&format!("/*{text} */\n"));
            }
        }
        AstNode::Rule(r) => {
            if options.minify {
                out.push_str(r.selector.trim());
                out.push('{');
                for child in &r.nodes {
                    print_node(child, depth + 1, options, out);
                }
                out.push('}');
            } else {
                out.push_str(&format!("{indent}{} {{\n", r.selector.trim()));
                for child in &r.nodes {
                    print_node(child, depth + 1, options, out);
                }
                out.push_str(&format!("{indent}}}\n"));
            }
        }
        AstNode::AtRule(a) => print_at_rule(a, depth, &indent, options, out),
    }
}

fn print_at_rule(a: &AtRule, depth: usize, indent: &str, options: &PrintOptions, out: &mut String) {
    let head = if a.params.is_empty() {
        format!("@{}", a.name)
    } else {
        format!("@{} {}", a.name, a.params)
    };

    if !a.block {
        if options.minify {
            out.push_str(&head);
            out.push(';');
        } else {
            out.push_str(&format!("{indent}{head};\n"));
        }
        return;
    }

    if options.minify {
        out.push_str(&head);
        out.push('{');
        for child in &a.nodes {
            print_node(child, depth + 1, options, out);
        }
        out.push('}');
    } else {
        out.push_str(&format!("{indent}{head} {{\n"));
        for child in &a.nodes {
            print_node(child, depth + 1, options, out);
        }
        out.push_str(&format!("{indent}}}\n"));
    }
}

fn print_declaration(d: &Declaration, options: &PrintOptions, out: &mut String) {
    if options.minify {
        out.push_str(&d.property);
        out.push(':');
        out.push_str(&minify_value(&d.value));
        if d.important {
            out.push_str("!important");
        }
    } else {
        out.push_str(&d.property);
        out.push_str(": ");
        out.push_str(&d.value);
        if d.important {
            out.push_str(" !important");
        }
    }
}

/// Whether printing `node` emits anything.
fn has_content(node: &AstNode) -> bool {
    match node {
        AstNode::Declaration(_) | AstNode::Comment(_) => true,
        AstNode::Rule(r) => r.nodes.iter().any(has_content),
        AstNode::AtRule(a) => !a.block || a.nodes.iter().any(has_content) || keeps_empty_block(a),
    }
}

fn keeps_empty_block(a: &AtRule) -> bool {
    matches!(a.name.as_str(), "font-face" | "property" | "page")
}

/// Drops whitespace after commas and around the value, outside of strings.
fn minify_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut quote: Option<char> = None;
    let mut chars = value.trim().chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            ',' => {
                while out.ends_with(' ') {
                    out.pop();
                }
                out.push(',');
                while chars.peek().is_some_and(|n| n.is_whitespace()) {
                    chars.next();
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{at_rule, decl, rule, statement};

    #[test]
    fn test_minified_declarations_are_separated() {
        let nodes = vec![
            at_rule(
                "media",
                "(width >= 40rem)",
                vec![rule(".a", vec![decl("color", "red"), decl("margin", "var(--m, 1px)")])],
            ),
            statement("layer", "base"),
        ];
        assert_eq!(
            to_css(&nodes, &PrintOptions::minified()),
            "@media (width >= 40rem){.a{color:red;margin:var(--m,1px)}}@layer base;"
        );
    }

    #[test]
    fn test_empty_blocks_are_skipped() {
        let nodes = vec![
            at_rule("layer", "utilities", vec![rule(".a", vec![])]),
            rule(".b", vec![decl("color", "red")]),
        ];
        assert_eq!(to_css(&nodes, &PrintOptions::default()), ".b {\n  color: red;\n}\n");
    }

    #[test]
    fn test_strings_keep_their_spaces() {
        assert_eq!(minify_value("'a, b', c"), "'a, b',c");
    }
}
