//! The built-in variant set. Registration order here is cascade order.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use classname::{Variant, VariantValue, segment};

use crate::ast::{AstNode, AtRule, at_rule, decl, rule};
use crate::css::escape_class_name;
use crate::property::property;
use crate::theme::Theme;

use super::{Compounds, Variants, wrap_list};

const PSEUDO_ELEMENTS: &[(&str, &[&str])] = &[
    ("first-letter", &["&::first-letter"]),
    ("first-line", &["&::first-line"]),
    ("marker", &["& *::marker", "&::marker"]),
    ("selection", &["& *::selection", "&::selection"]),
    ("file", &["&::file-selector-button"]),
    ("placeholder", &["&::placeholder"]),
    ("backdrop", &["&::backdrop"]),
];

const PSEUDO_CLASSES: &[(&str, &str)] = &[
    ("first", "&:first-child"),
    ("last", "&:last-child"),
    ("only", "&:only-child"),
    ("odd", "&:nth-child(odd)"),
    ("even", "&:nth-child(even)"),
    ("first-of-type", "&:first-of-type"),
    ("last-of-type", "&:last-of-type"),
    ("only-of-type", "&:only-of-type"),
    ("visited", "&:visited"),
    ("target", "&:target"),
    ("open", "&:is([open], :popover-open, :open)"),
    ("default", "&:default"),
    ("checked", "&:checked"),
    ("indeterminate", "&:indeterminate"),
    ("placeholder-shown", "&:placeholder-shown"),
    ("autofill", "&:autofill"),
    ("optional", "&:optional"),
    ("required", "&:required"),
    ("valid", "&:valid"),
    ("invalid", "&:invalid"),
    ("in-range", "&:in-range"),
    ("out-of-range", "&:out-of-range"),
    ("read-only", "&:read-only"),
    ("empty", "&:empty"),
    ("focus-within", "&:focus-within"),
];

const INTERACTIVE: &[(&str, &str)] = &[
    ("focus", "&:focus"),
    ("focus-visible", "&:focus-visible"),
    ("active", "&:active"),
    ("enabled", "&:enabled"),
    ("disabled", "&:disabled"),
];

const MEDIA: &[(&str, &str)] = &[
    ("motion-safe", "@media (prefers-reduced-motion: no-preference)"),
    ("motion-reduce", "@media (prefers-reduced-motion: reduce)"),
    ("contrast-more", "@media (prefers-contrast: more)"),
    ("contrast-less", "@media (prefers-contrast: less)"),
];

/// Registers every built-in variant. Breakpoint names come from the
/// `--breakpoint` namespace of `theme`.
pub fn register(variants: &mut Variants, theme: &Theme) {
    variants.static_selectors_with("*", &[":is(& > *)"], Compounds::NEVER);

    variants.compound(
        "not",
        Compounds::STYLE_RULES | Compounds::AT_RULES,
        negate,
        Compounds::STYLE_RULES | Compounds::AT_RULES,
    );
    variants.compound("group", Compounds::STYLE_RULES, relational("group", "*"), Compounds::STYLE_RULES);
    variants.compound("peer", Compounds::STYLE_RULES, relational("peer", "~ *"), Compounds::STYLE_RULES);

    for (name, selectors) in PSEUDO_ELEMENTS {
        variants.static_selectors(name, selectors);
    }
    for name in ["before", "after"] {
        let selector = format!("&::{name}");
        variants.static_variant(
            name,
            move |node| {
                let body = std::mem::take(node.children_mut()?);
                let mut nodes = vec![
                    property("--tw-content", Some("\"\""), None),
                    decl("content", "var(--tw-content)"),
                ];
                nodes.extend(body);
                *node.children_mut()? = vec![rule(selector.as_str(), nodes)];
                Some(())
            },
            Compounds::NEVER,
        );
    }

    for (name, selector) in PSEUDO_CLASSES {
        variants.static_selectors(name, &[*selector]);
    }
    variants.static_variant(
        "hover",
        |node| {
            let body = std::mem::take(node.children_mut()?);
            *node.children_mut()? = vec![rule(
                "&:hover",
                vec![at_rule("media", "(hover: hover)", body)],
            )];
            Some(())
        },
        Compounds::STYLE_RULES,
    );
    for (name, selector) in INTERACTIVE {
        variants.static_selectors(name, &[*selector]);
    }

    variants.compound(
        "in",
        Compounds::STYLE_RULES,
        |node, _| {
            let AstNode::Rule(r) = node else { return None };
            r.selector = format!(":where({}) &", r.selector.replace('&', "*"));
            Some(())
        },
        Compounds::STYLE_RULES,
    );
    variants.compound(
        "has",
        Compounds::STYLE_RULES,
        |node, _| {
            let AstNode::Rule(r) = node else { return None };
            r.selector = format!("&:has({})", r.selector.replace('&', "*"));
            Some(())
        },
        Compounds::STYLE_RULES,
    );

    variants.functional(
        "aria",
        |node, variant| {
            let (value, arbitrary) = plain_value(variant)?;
            let selector = if arbitrary {
                format!("&[aria-{}]", quote_attribute_value(value))
            } else {
                format!("&[aria-{value}=\"true\"]")
            };
            wrap(node, &selector)
        },
        Compounds::STYLE_RULES,
    );
    variants.functional(
        "data",
        |node, variant| {
            let (value, arbitrary) = plain_value(variant)?;
            let value = if arbitrary {
                quote_attribute_value(value)
            } else {
                value.to_string()
            };
            wrap(node, &format!("&[data-{value}]"))
        },
        Compounds::STYLE_RULES,
    );
    variants.functional(
        "supports",
        |node, variant| {
            let (value, _) = plain_value(variant)?;
            wrap(node, &format!("@supports {}", supports_query(value)))
        },
        Compounds::AT_RULES,
    );

    for (name, query) in MEDIA {
        variants.static_selectors(name, &[*query]);
    }

    let breakpoints: HashMap<String, String> = theme
        .namespace("--breakpoint")
        .into_iter()
        .filter_map(|(key, entry)| Some((key?.to_string(), entry.value.clone())))
        .collect();
    let breakpoints = Arc::new(breakpoints);

    let lookup = Arc::clone(&breakpoints);
    variants.group(
        Some(Arc::new(move |a: &Variant, z: &Variant| {
            compare_breakpoints(
                breakpoint_value(a, &lookup).as_deref(),
                breakpoint_value(z, &lookup).as_deref(),
            )
            .reverse()
        })),
        |variants| {
            let lookup = Arc::clone(&breakpoints);
            variants.functional(
                "max",
                move |node, variant| {
                    if variant.modifier().is_some() {
                        return None;
                    }
                    let value = breakpoint_value(variant, &lookup)?;
                    wrap(node, &format!("@media (width < {value})"))
                },
                Compounds::AT_RULES,
            );
        },
    );

    let lookup = Arc::clone(&breakpoints);
    variants.group(
        Some(Arc::new(move |a: &Variant, z: &Variant| {
            compare_breakpoints(
                breakpoint_value(a, &lookup).as_deref(),
                breakpoint_value(z, &lookup).as_deref(),
            )
        })),
        |variants| {
            let mut named: Vec<(&String, &String)> = breakpoints.iter().collect();
            named.sort();
            for (name, value) in named {
                let query = format!("@media (width >= {value})");
                variants.static_selectors_with(name, &[query.as_str()], Compounds::AT_RULES);
            }
            let lookup = Arc::clone(&breakpoints);
            variants.functional(
                "min",
                move |node, variant| {
                    if variant.modifier().is_some() {
                        return None;
                    }
                    let value = breakpoint_value(variant, &lookup)?;
                    wrap(node, &format!("@media (width >= {value})"))
                },
                Compounds::AT_RULES,
            );
        },
    );

    variants.static_selectors("portrait", &["@media (orientation: portrait)"]);
    variants.static_selectors("landscape", &["@media (orientation: landscape)"]);
    variants.static_selectors("ltr", &["&:where(:dir(ltr), [dir=\"ltr\"], [dir=\"ltr\"] *)"]);
    variants.static_selectors("rtl", &["&:where(:dir(rtl), [dir=\"rtl\"], [dir=\"rtl\"] *)"]);
    variants.static_selectors("dark", &["@media (prefers-color-scheme: dark)"]);
    variants.static_selectors_with("starting", &["@starting-style"], Compounds::NEVER);
    variants.static_selectors("print", &["@media print"]);
    variants.static_selectors("forced-colors", &["@media (forced-colors: active)"]);
}

/// Nests the node's body in one selector or at-rule.
fn wrap(node: &mut AstNode, selector: &str) -> Option<()> {
    let body = std::mem::take(node.children_mut()?);
    *node.children_mut()? = vec![rule(selector, body)];
    Some(())
}

/// The value of a functional variant that takes no modifier.
fn plain_value(variant: &Variant) -> Option<(&str, bool)> {
    match variant {
        Variant::Functional {
            value: Some(value),
            modifier: None,
            ..
        } => Some((value.as_str(), value.is_arbitrary())),
        _ => None,
    }
}

/// `group-hover`, `peer-focus/name`.
fn relational(
    name: &'static str,
    combinator: &'static str,
) -> impl Fn(&mut AstNode, &Variant) -> Option<()> + Send + Sync + 'static {
    move |node, variant| {
        let AstNode::Rule(r) = node else { return None };
        let class = match variant.modifier() {
            Some(modifier) => escape_class_name(&format!("{name}/{}", modifier.value())),
            None => name.to_string(),
        };
        let selector = r.selector.replace('&', &format!(":where(.{class})"));
        r.selector = format!("&:is({} {combinator})", wrap_list(&selector));
        Some(())
    }
}

/// `not-hover`: negates each selector and at-rule the wrapped variant
/// produced. Only a single chain of wrappers can be negated.
fn negate(node: &mut AstNode, variant: &Variant) -> Option<()> {
    if let Variant::Compound {
        modifier, variant, ..
    } = variant
    {
        if modifier.is_some() || matches!(**variant, Variant::Arbitrary { relative: true, .. }) {
            return None;
        }
    }

    let mut chain = Vec::new();
    let mut current: &AstNode = node;
    loop {
        chain.push(current);
        match current.children()?.as_slice() {
            [] => break,
            [only] => current = only,
            _ => return None,
        }
    }

    let style_rules = chain.iter().filter(|n| matches!(n, AstNode::Rule(_))).count();
    if style_rules > 1 || chain.len() - style_rules > 1 {
        return None;
    }

    let mut at_rules = Vec::new();
    let mut selectors = Vec::new();
    for link in chain {
        match link {
            AstNode::AtRule(at) => at_rules.push(negate_at_rule(at)?),
            AstNode::Rule(r) => selectors.push(rule(negate_selector(&r.selector)?, Vec::new())),
            _ => return None,
        }
    }
    at_rules.extend(selectors);

    *node = if at_rules.len() == 1 {
        at_rules.remove(0)
    } else {
        rule("&", at_rules)
    };
    Some(())
}

fn negate_selector(selector: &str) -> Option<String> {
    if selector.contains("::") {
        return None;
    }
    let selectors: Vec<String> = segment(selector, ',')
        .into_iter()
        .map(|s| s.trim().replace('&', "*"))
        .collect();
    Some(format!("&:not({})", selectors.join(", ")))
}

fn negate_at_rule(at: &AtRule) -> Option<AstNode> {
    if !matches!(at.name.as_str(), "media" | "supports" | "container") {
        return None;
    }
    let conditions = segment(&at.params, ',');
    let [condition] = conditions.as_slice() else {
        return None;
    };
    let condition = condition.trim();
    let parts = segment(condition, ' ');

    let negated = if parts.first() == Some(&"not") {
        parts[1..].join(" ")
    } else if at.name == "container" && !condition.starts_with('(') {
        if parts.get(1) == Some(&"not") {
            format!("{} {}", parts[0], parts[2..].join(" "))
        } else {
            format!("{} not {}", parts[0], parts[1..].join(" "))
        }
    } else {
        format!("not {condition}")
    };

    Some(at_rule(at.name.as_str(), negated, Vec::new()))
}

/// `state=open` → `state="open"`; already quoted values are kept.
fn quote_attribute_value(value: &str) -> String {
    let Some(idx) = value.find('=') else {
        return value.to_string();
    };
    let (name, rest) = value.split_at(idx + 1);
    let rest = rest.trim();
    let (unquoted, flag) = match rest.rsplit_once(' ') {
        Some((v, f)) if matches!(f, "i" | "s") => (v.trim(), Some(f)),
        _ => (rest, None),
    };
    if unquoted.starts_with(['"', '\'']) {
        return value.to_string();
    }
    match flag {
        Some(flag) => format!("{name}\"{unquoted}\" {flag}"),
        None => format!("{name}\"{unquoted}\""),
    }
}

/// `grid` → `(grid: var(--tw))`, `display:grid` → `(display:grid)`, and
/// queries such as `selector(:has(a))` pass through.
fn supports_query(value: &str) -> String {
    let is_function = value
        .find('(')
        .is_some_and(|idx| value[..idx].trim().chars().all(|c| c.is_alphanumeric() || c == '-'))
        && !value.starts_with('(');
    if is_function {
        return value.to_string();
    }
    let value = if value.contains(':') {
        value.to_string()
    } else {
        format!("{value}: var(--tw)")
    };
    if value.starts_with('(') && value.ends_with(')') {
        value
    } else {
        format!("({value})")
    }
}

fn breakpoint_value(variant: &Variant, breakpoints: &HashMap<String, String>) -> Option<String> {
    match variant {
        Variant::Static { root } => breakpoints.get(root).cloned(),
        Variant::Functional {
            value: Some(VariantValue::Named(name)),
            ..
        } => breakpoints.get(name).cloned(),
        Variant::Functional {
            value: Some(VariantValue::Arbitrary(value)),
            ..
        } => Some(value.clone()),
        _ => None,
    }
}

fn split_dimension(value: &str) -> Option<(f64, &str)> {
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .unwrap_or(value.len());
    let number = value[..end].parse().ok()?;
    Some((number, &value[end..]))
}

/// Ascending by size. Values in different units are grouped by unit, and
/// values that are not plain dimensions sort last.
fn compare_breakpoints(a: Option<&str>, z: Option<&str>) -> Ordering {
    let (a, z) = match (a, z) {
        (None, None) => return Ordering::Equal,
        (None, _) => return Ordering::Less,
        (_, None) => return Ordering::Greater,
        (Some(a), Some(z)) => (a, z),
    };
    if a == z {
        return Ordering::Equal;
    }
    match (split_dimension(a), split_dimension(z)) {
        (Some((a_num, a_unit)), Some((z_num, z_unit))) => a_unit
            .cmp(z_unit)
            .then_with(|| a_num.partial_cmp(&z_num).unwrap_or(Ordering::Equal)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(z),
    }
}
