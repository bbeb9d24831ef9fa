//! Structural parser for entry stylesheets.
//!
//! This is not a full CSS parser. It understands just enough to pass author
//! CSS through untouched while exposing the directives the compiler acts on:
//! rules, at-rules (with or without a block), declarations and nesting.
//! Values and selectors are kept as raw text.
//!
//! Comments are dropped, except `/*! … */` license comments which are kept
//! as [`AstNode::Comment`].

use nom::{
    IResult,
    character::complete::{char, multispace0},
    combinator::opt,
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{delimited, preceded},
};

use crate::ast::{AstNode, AtRule, Declaration, Rule};
use crate::error::{Result, WcssError};

/// Parses CSS source into a list of nodes.
///
/// # Examples
///
/// ```rust
/// use wcss::css::parse_stylesheet;
/// use wcss::ast::AstNode;
///
/// let nodes = parse_stylesheet("@theme { --color-red: red; } .a { &:hover { color: red } }").unwrap();
/// assert_eq!(nodes.len(), 2);
/// assert!(matches!(&nodes[0], AstNode::AtRule(at) if at.name == "theme"));
/// ```
pub fn parse_stylesheet(source: &str) -> Result<Vec<AstNode>> {
    let source = strip_comments(source);

    let (remaining, nodes) =
        parse_nodes(&source).map_err(|e| WcssError::InvalidSyntax(e.to_string()))?;

    if !remaining.trim().is_empty() {
        return Err(WcssError::InvalidSyntax(format!(
            "Unexpected tokens at end of stylesheet: {}",
            remaining.trim()
        )));
    }

    Ok(nodes)
}

/// Parses a sequence of sibling nodes, stopping before a closing `}`.
fn parse_nodes(input: &str) -> IResult<&str, Vec<AstNode>> {
    let (input, nodes) = many0(parse_node)(input)?;
    let (input, _) = skip_empty_statements(input)?;
    Ok((input, nodes.into_iter().flatten().collect()))
}

fn skip_empty_statements(input: &str) -> IResult<&str, ()> {
    let mut input = input;
    loop {
        let (rest, _) = multispace0(input)?;
        match rest.strip_prefix(';') {
            Some(after) => input = after,
            None => return Ok((rest, ())),
        }
    }
}

/// Parses one node. Stray `;` produce `None`.
fn parse_node(input: &str) -> IResult<&str, Option<AstNode>> {
    let (input, _) = multispace0(input)?;

    if let Some(rest) = input.strip_prefix(';') {
        return Ok((rest, None));
    }
    if input.is_empty() || input.starts_with('}') {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Eof)));
    }
    if let Some(rest) = input.strip_prefix("/*!") {
        let end = rest.find("*/").unwrap_or(rest.len());
        let body = format!("!{}", rest[..end].trim_end());
        let rest = rest.get(end + 2..).unwrap_or("");
        return Ok((rest, Some(AstNode::Comment(body))));
    }

    let (after_prelude, (prelude, terminator)) = take_prelude(input)?;
    let prelude = prelude.trim();

    if let Some(at) = prelude.strip_prefix('@') {
        let (name, params) = split_at_rule(at);
        return match terminator {
            Some('{') => {
                let (rest, nodes) = parse_block(after_prelude)?;
                Ok((
                    rest,
                    Some(AstNode::AtRule(AtRule {
                        name,
                        params,
                        nodes,
                        block: true,
                    })),
                ))
            }
            _ => {
                let (rest, _) = opt(char(';'))(after_prelude)?;
                Ok((
                    rest,
                    Some(AstNode::AtRule(AtRule {
                        name,
                        params,
                        nodes: Vec::new(),
                        block: false,
                    })),
                ))
            }
        };
    }

    if terminator == Some('{') && !prelude.starts_with("--") {
        let (rest, nodes) = parse_block(after_prelude)?;
        return Ok((
            rest,
            Some(AstNode::Rule(Rule {
                selector: normalize_whitespace(prelude),
                nodes,
            })),
        ));
    }

    // Declarations. Custom properties may hold `{}` blocks in their value.
    let (rest, text) = take_declaration(input)?;
    let Some((property, value)) = text.split_once(':') else {
        return Err(nom::Err::Failure(Error::new(input, ErrorKind::Char)));
    };
    let (value, important) = split_important(value.trim());
    let (rest, _) = opt(char(';'))(rest)?;

    Ok((
        rest,
        Some(AstNode::Declaration(Declaration {
            property: property.trim().to_string(),
            value: value.to_string(),
            important,
        })),
    ))
}

fn parse_block(input: &str) -> IResult<&str, Vec<AstNode>> {
    delimited(char('{'), parse_nodes, preceded(multispace0, char('}')))(input)
}

fn split_at_rule(at: &str) -> (String, String) {
    match at.find(|c: char| c.is_whitespace() || c == '(' || c == '"' || c == '\'') {
        Some(idx) => (at[..idx].to_string(), normalize_whitespace(at[idx..].trim())),
        None => (at.to_string(), String::new()),
    }
}

fn split_important(value: &str) -> (&str, bool) {
    match value.strip_suffix("!important") {
        Some(rest) => (rest.trim_end(), true),
        None => (value, false),
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Consumes text up to the first top-level `{`, `;` or `}` and reports which
/// one stopped it (`None` at end of input). The terminator is not consumed.
fn take_prelude(input: &str) -> IResult<&str, (&str, Option<char>)> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = input.char_indices();

    while let Some((idx, c)) = chars.next() {
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\\' => {
                chars.next();
            }
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            '{' | ';' | '}' if depth == 0 => return Ok((&input[idx..], (&input[..idx], Some(c)))),
            _ => {}
        }
    }

    Ok(("", (input, None)))
}

/// Consumes a declaration up to its top-level `;` or closing `}`, allowing
/// balanced braces inside the value.
fn take_declaration(input: &str) -> IResult<&str, &str> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = input.char_indices();

    while let Some((idx, c)) = chars.next() {
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\\' => {
                chars.next();
            }
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ';' | '}' if depth == 0 => return Ok((&input[idx..], &input[..idx])),
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    Ok(("", input))
}

/// Removes `/* … */` comments outside of strings, keeping `/*! … */`.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let keep = chars.peek() == Some(&'!');
                if keep {
                    out.push_str("/*");
                }
                let mut prev = '\0';
                for inner in chars.by_ref() {
                    if keep {
                        out.push(inner);
                    }
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
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
    fn test_declarations_and_nested_rules() {
        let nodes = parse_stylesheet(".a { color: red; &:hover { color: blue !important } }").unwrap();
        let important = Declaration {
            property: "color".into(),
            value: "blue".into(),
            important: true,
        };
        assert_eq!(
            nodes,
            vec![rule(
                ".a",
                vec![
                    decl("color", "red"),
                    rule("&:hover", vec![AstNode::Declaration(important)]),
                ]
            )]
        );
    }

    #[test]
    fn test_statements_and_blocks() {
        let nodes = parse_stylesheet(
            r#"@import "tailwindcss"; @layer utilities { @tailwind utilities; } @plugin "./p.js";"#,
        )
        .unwrap();
        assert_eq!(
            nodes,
            vec![
                statement("import", "\"tailwindcss\""),
                at_rule("layer", "utilities", vec![statement("tailwind", "utilities")]),
                statement("plugin", "\"./p.js\""),
            ]
        );
    }

    #[test]
    fn test_slot_without_semicolon() {
        let nodes = parse_stylesheet("@media (x) { &:x {@slot} }").unwrap();
        assert_eq!(
            nodes,
            vec![at_rule("media", "(x)", vec![rule("&:x", vec![statement("slot", "")])])]
        );
    }

    #[test]
    fn test_custom_property_with_braces() {
        let nodes = parse_stylesheet(":root { --x: { a: b }; --y: 1px }").unwrap();
        assert_eq!(
            nodes,
            vec![rule(":root", vec![decl("--x", "{ a: b }"), decl("--y", "1px")])]
        );
    }

    #[test]
    fn test_comments_are_removed() {
        let nodes = parse_stylesheet("/* hi */ .a { /* x */ color: red; } /*! keep */").unwrap();
        assert_eq!(
            nodes,
            vec![rule(".a", vec![decl("color", "red")]), AstNode::Comment("! keep".into())]
        );
    }

    #[test]
    fn test_unclosed_block_is_an_error() {
        assert!(parse_stylesheet(".a { color: red;").is_err());
    }
}
