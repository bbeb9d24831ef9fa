//! Variant prefixes: the `hover:` / `group-focus:` / `min-[40rem]:` part of a
//! class name.

use crate::decode::{decode_arbitrary_value, is_valid_arbitrary};
use crate::registry::{Registry, VariantKind};
use crate::segment::segment;
use crate::candidate::{Modifier, parse_modifier};

/// The value of a functional variant such as `data-[state=open]` or `min-md`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VariantValue {
    /// A bare value looked up in the variant's value table: `aria-checked`.
    Named(String),
    /// A bracketed value used verbatim: `data-[state=open]`.
    Arbitrary(String),
}

impl VariantValue {
    pub fn as_str(&self) -> &str {
        match self {
            VariantValue::Named(v) | VariantValue::Arbitrary(v) => v,
        }
    }

    pub fn is_arbitrary(&self) -> bool {
        matches!(self, VariantValue::Arbitrary(_))
    }
}

/// One parsed variant from a candidate's variant stack.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    /// An inline selector or at-rule: `[&>*]`, `[@media(print)]`.
    Arbitrary { selector: String, relative: bool },
    /// A named variant without parameters: `hover`.
    Static { root: String },
    /// A parameterized variant: `min-[40rem]`, `aria-checked`, `supports-grid`.
    Functional {
        root: String,
        value: Option<VariantValue>,
        modifier: Option<Modifier>,
    },
    /// A variant wrapping another variant: `group-hover`, `not-first`.
    Compound {
        root: String,
        modifier: Option<Modifier>,
        variant: Box<Variant>,
    },
}

impl Variant {
    /// The registered name this variant dispatches to, if any.
    pub fn root(&self) -> Option<&str> {
        match self {
            Variant::Arbitrary { .. } => None,
            Variant::Static { root }
            | Variant::Functional { root, .. }
            | Variant::Compound { root, .. } => Some(root),
        }
    }

    pub fn modifier(&self) -> Option<&Modifier> {
        match self {
            Variant::Functional { modifier, .. } | Variant::Compound { modifier, .. } => {
                modifier.as_ref()
            }
            _ => None,
        }
    }

    pub fn is_arbitrary(&self) -> bool {
        matches!(self, Variant::Arbitrary { .. })
    }
}

/// Parses a single variant segment (without the trailing `:`).
///
/// Returns `None` when the text does not name a registered variant or is
/// malformed.
pub fn parse_variant(input: &str, registry: &impl Registry) -> Option<Variant> {
    if input.starts_with('[') && input.ends_with(']') {
        return parse_arbitrary_variant(&input[1..input.len() - 1]);
    }

    let parts = segment(input, '/');
    let (without_modifier, modifier) = match parts.as_slice() {
        [base] => (*base, None),
        [base, modifier] => (*base, Some(parse_modifier(modifier)?)),
        _ => return None,
    };

    for (root, value) in find_roots(without_modifier, |root| {
        registry.variant_kind(root).is_some()
    }) {
        let Some(kind) = registry.variant_kind(root) else {
            continue;
        };

        match kind {
            VariantKind::Static => {
                if value.is_some() || modifier.is_some() {
                    continue;
                }
                return Some(Variant::Static {
                    root: root.to_string(),
                });
            }
            VariantKind::Functional => {
                let value = match value {
                    None => None,
                    Some(value) => Some(parse_variant_value(value)?),
                };
                return Some(Variant::Functional {
                    root: root.to_string(),
                    value,
                    modifier,
                });
            }
            VariantKind::Compound => {
                let inner = parse_variant(value?, registry)?;
                if !registry.compounds_with(root, &inner) {
                    return None;
                }
                return Some(Variant::Compound {
                    root: root.to_string(),
                    modifier,
                    variant: Box::new(inner),
                });
            }
        }
    }

    None
}

fn parse_arbitrary_variant(inner: &str) -> Option<Variant> {
    if inner.starts_with('@') && inner.contains('&') {
        return None;
    }
    if !is_valid_arbitrary(inner) {
        return None;
    }

    let selector = decode_arbitrary_value(inner);
    let selector = selector.trim();
    if selector.is_empty() {
        return None;
    }

    let relative = selector.starts_with(['>', '+', '~']);
    let selector = if !relative && !selector.starts_with('@') && !selector.contains('&') {
        format!("&:is({selector})")
    } else {
        selector.to_string()
    };

    Some(Variant::Arbitrary { selector, relative })
}

fn parse_variant_value(value: &str) -> Option<VariantValue> {
    if value.starts_with('[') && value.ends_with(']') {
        let inner = &value[1..value.len() - 1];
        if !is_valid_arbitrary(inner) {
            return None;
        }
        return Some(VariantValue::Arbitrary(decode_arbitrary_value(inner)));
    }
    if value.starts_with('(') && value.ends_with(')') {
        let inner = &value[1..value.len() - 1];
        if !inner.starts_with("--") || !is_valid_arbitrary(inner) {
            return None;
        }
        return Some(VariantValue::Arbitrary(format!(
            "var({})",
            decode_arbitrary_value(inner)
        )));
    }
    if value.is_empty() || value.contains(['[', ']', '(', ')']) {
        return None;
    }
    Some(VariantValue::Named(value.to_string()))
}

/// Yields every `(root, value)` split of `input` whose root `exists`:
/// the whole input first, then every `-` from right to left.
///
/// An `@` prefix (container-style variants like `@md`) is tried last.
pub fn find_roots<'a>(
    input: &'a str,
    exists: impl Fn(&str) -> bool,
) -> Vec<(&'a str, Option<&'a str>)> {
    let mut roots = Vec::new();

    if exists(input) {
        roots.push((input, None));
    }

    // Arbitrary values may contain dashes; only split before the bracket.
    let searchable = match input.find(['[', '(']) {
        Some(idx) => &input[..idx],
        None => input,
    };

    let mut end = searchable.len();
    while let Some(idx) = searchable[..end].rfind('-') {
        if idx == 0 {
            break;
        }
        let root = &input[..idx];
        let value = &input[idx + 1..];
        if exists(root) {
            if value.is_empty() {
                break;
            }
            roots.push((root, Some(value)));
        }
        end = idx;
    }

    if input.len() > 1 && input.starts_with('@') && exists("@") {
        roots.push(("@", Some(&input[1..])));
    }

    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_roots_longest_first() {
        let roots = find_roots("group-peer-hover", |r| r == "group" || r == "group-peer");
        assert_eq!(
            roots,
            vec![("group-peer", Some("hover")), ("group", Some("peer-hover"))]
        );
    }

    #[test]
    fn test_find_roots_does_not_split_inside_brackets() {
        let roots = find_roots("data-[a-b]", |r| r == "data" || r == "data-[a");
        assert_eq!(roots, vec![("data", Some("[a-b]"))]);
    }

    #[test]
    fn test_arbitrary_variant_wraps_without_ampersand() {
        assert_eq!(
            parse_arbitrary_variant(".dark_&"),
            Some(Variant::Arbitrary {
                selector: ".dark &".into(),
                relative: false
            })
        );
        assert_eq!(
            parse_arbitrary_variant("[open]"),
            Some(Variant::Arbitrary {
                selector: "&:is([open])".into(),
                relative: false
            })
        );
        assert_eq!(
            parse_arbitrary_variant(">img"),
            Some(Variant::Arbitrary {
                selector: ">img".into(),
                relative: true
            })
        );
        assert_eq!(parse_arbitrary_variant("@media&"), None);
    }
}
