//! CSS functions resolved by the compiler.
//!
//! | Function | Result |
//! |---|---|
//! | `--alpha(red / 50%)` | `color-mix(in srgb, red 50%, transparent)` |
//! | `--spacing(4)` | `calc(var(--spacing, 0.25rem) * 4)` |
//! | `--theme(--color-red-500)` | `var(--color-red-500)` |
//! | `--theme(--color-red-500 inline)` | the raw token value |
//! | `theme(colors.red.500 / 50%)` | a legacy configuration lookup |
//!
//! Calls that cannot be resolved are left in place.

use classname::segment;

use crate::ast::{AstNode, walk_mut};
use crate::theme::{ConfigValue, Theme, ThemeLookup};
use crate::value::with_alpha;

const FUNCTIONS: &[&str] = &["--alpha", "--spacing", "--theme", "theme"];

/// Resolves CSS functions in every declaration value and at-rule prelude.
pub fn substitute_functions(nodes: &mut [AstNode], theme: &Theme, legacy: Option<&dyn ThemeLookup>) {
    walk_mut(nodes, &mut |node| match node {
        AstNode::Declaration(d) => {
            if contains_function(&d.value) {
                d.value = substitute_value(&d.value, theme, legacy);
            }
        }
        AstNode::AtRule(a) => {
            if a.name != "apply" && contains_function(&a.params) {
                a.params = substitute_value(&a.params, theme, legacy);
            }
        }
        _ => {}
    });
}

/// Cheap pre-check before scanning a value.
pub fn contains_function(value: &str) -> bool {
    value.contains("theme(") || value.contains("--alpha(") || value.contains("--spacing(")
}

/// Resolves the CSS functions in a single value.
///
/// ```
/// use wcss::css::functions::substitute_value;
/// use wcss::theme::{Theme, ThemeOptions};
///
/// let mut theme = Theme::new();
/// theme.add("--spacing", "0.25rem", ThemeOptions::NONE);
/// assert_eq!(
///     substitute_value("--spacing(4)", &theme, None),
///     "calc(var(--spacing, 0.25rem) * 4)"
/// );
/// ```
pub fn substitute_value(value: &str, theme: &Theme, legacy: Option<&dyn ThemeLookup>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some((start, name)) = find_call(rest) {
        let args_start = start + name.len() + 1;
        let Some(len) = closing_paren(&rest[args_start..]) else {
            break;
        };
        let args = substitute_value(&rest[args_start..args_start + len], theme, legacy);
        let call_end = args_start + len + 1;

        out.push_str(&rest[..start]);
        match evaluate(name, &args, theme, legacy) {
            Some(resolved) => out.push_str(&resolved),
            None => {
                out.push_str(name);
                out.push('(');
                out.push_str(&args);
                out.push(')');
            }
        }
        rest = &rest[call_end..];
    }

    out.push_str(rest);
    out
}

/// Finds the next known function call: the name must not be preceded by an
/// identifier character.
fn find_call(value: &str) -> Option<(usize, &'static str)> {
    let bytes = value.as_bytes();
    let mut best: Option<(usize, &'static str)> = None;

    for name in FUNCTIONS {
        let pattern = format!("{name}(");
        let mut from = 0;
        while let Some(found) = value[from..].find(&pattern) {
            let idx = from + found;
            let boundary = idx == 0 || {
                let prev = bytes[idx - 1];
                !(prev.is_ascii_alphanumeric() || prev == b'-' || prev == b'_')
            };
            if boundary {
                if best.is_none_or(|(at, _)| idx < at) {
                    best = Some((idx, name));
                }
                break;
            }
            from = idx + pattern.len();
        }
    }

    best
}

/// Replaces every `name(...)` call in `value` with `eval(args)`. Returns
/// `None` as soon as one call cannot be evaluated.
pub(crate) fn replace_calls(
    value: &str,
    name: &str,
    eval: &mut impl FnMut(&str) -> Option<String>,
) -> Option<String> {
    let pattern = format!("{name}(");
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find(&pattern) {
        let args_start = start + pattern.len();
        let len = closing_paren(&rest[args_start..])?;
        out.push_str(&rest[..start]);
        out.push_str(&eval(&rest[args_start..args_start + len])?);
        rest = &rest[args_start + len + 1..];
    }

    out.push_str(rest);
    Some(out)
}

/// Length of the text before the `)` matching an already-consumed `(`.
fn closing_paren(input: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (c, quote) {
            ('\\', _) => escaped = true,
            (q, Some(open)) if q == open => quote = None,
            (_, Some(_)) => {}
            ('"' | '\'', None) => quote = Some(c),
            ('(', None) => depth += 1,
            (')', None) if depth == 0 => return Some(idx),
            (')', None) => depth -= 1,
            _ => {}
        }
    }
    None
}

fn evaluate(name: &str, args: &str, theme: &Theme, legacy: Option<&dyn ThemeLookup>) -> Option<String> {
    match name {
        "--alpha" => alpha(args),
        "--spacing" => spacing(args, theme),
        "--theme" => theme_token(args, theme),
        "theme" => legacy_theme(args, theme, legacy),
        _ => None,
    }
}

fn alpha(args: &str) -> Option<String> {
    let parts = segment(args, '/');
    let [color, alpha] = parts.as_slice() else {
        log::debug!("`--alpha({args})` expects a color and an alpha value");
        return None;
    };
    Some(with_alpha(color.trim(), alpha.trim()))
}

fn spacing(args: &str, theme: &Theme) -> Option<String> {
    let value = args.trim();
    if value.is_empty() {
        return None;
    }
    let multiplier = theme.resolve(None, &["--spacing"])?;
    Some(format!("calc({multiplier} * {value})"))
}

fn theme_token(args: &str, theme: &Theme) -> Option<String> {
    let parts = segment(args, ',');
    let (path, fallback) = split_fallback(&parts);

    let mut words = path.split_whitespace();
    let key = words.next()?;
    let inline = words.any(|word| word == "inline");
    if !key.starts_with("--") {
        return None;
    }

    match theme.get(key) {
        Some(entry) if inline => Some(entry.value.clone()),
        Some(_) => Some(match fallback {
            Some(fallback) => format!("var({key}, {fallback})"),
            None => format!("var({key})"),
        }),
        None => fallback,
    }
}

fn legacy_theme(args: &str, theme: &Theme, legacy: Option<&dyn ThemeLookup>) -> Option<String> {
    let parts = segment(args, ',');
    let (path, fallback) = split_fallback(&parts);
    let path = unquote(&path);

    let value = if path.starts_with("--") {
        theme
            .get(path)
            .map(|entry| ConfigValue::Str(entry.value.clone()))
    } else {
        legacy.and_then(|lookup| lookup.theme(path))
    };

    match value {
        Some(ConfigValue::Str(value)) => Some(value),
        Some(ConfigValue::List(items)) => {
            let parts: Vec<&str> = items.iter().filter_map(ConfigValue::as_str).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Some(ConfigValue::Map(map)) => map
            .get("DEFAULT")
            .and_then(ConfigValue::as_str)
            .map(str::to_string)
            .or(fallback),
        Some(_) => {
            log::warn!("`theme({path})` does not resolve to a CSS value");
            fallback
        }
        None => fallback,
    }
}

fn split_fallback(parts: &[&str]) -> (String, Option<String>) {
    let path = parts.first().map(|p| p.trim().to_string()).unwrap_or_default();
    let fallback = (parts.len() > 1).then(|| {
        parts[1..]
            .iter()
            .map(|p| p.trim())
            .collect::<Vec<_>>()
            .join(", ")
    });
    (path, fallback)
}

fn unquote(value: &str) -> &str {
    let trimmed = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::decl;
    use crate::theme::{ConfigMap, LegacyTheme, ThemeOptions};

    fn theme() -> Theme {
        let mut theme = Theme::new();
        theme.add("--spacing", "0.25rem", ThemeOptions::NONE);
        theme.add("--color-red-500", "#ef4444", ThemeOptions::NONE);
        theme
    }

    #[test]
    fn test_alpha() {
        assert_eq!(
            substitute_value("--alpha(var(--color-red-500) / 50%)", &theme(), None),
            "color-mix(in srgb, var(--color-red-500) 50%, transparent)"
        );
    }

    #[test]
    fn test_theme_token() {
        let theme = theme();
        assert_eq!(substitute_value("--theme(--color-red-500)", &theme, None), "var(--color-red-500)");
        assert_eq!(substitute_value("--theme(--color-red-500 inline)", &theme, None), "#ef4444");
        assert_eq!(substitute_value("--theme(--color-blue, blue)", &theme, None), "blue");
        assert_eq!(substitute_value("--theme(--missing)", &theme, None), "--theme(--missing)");
    }

    #[test]
    fn test_legacy_theme_paths() {
        let mut legacy = LegacyTheme::new(theme());
        legacy.add_config(
            &ConfigMap::new().with("spacing", ConfigMap::new().with("18", "4.5rem")),
            &ConfigMap::new(),
        );
        let theme = theme();
        assert_eq!(
            substitute_value("1px solid theme(colors.red.500)", &theme, Some(&legacy)),
            "1px solid #ef4444"
        );
        assert_eq!(substitute_value("theme('spacing.18')", &theme, Some(&legacy)), "4.5rem");
        assert_eq!(substitute_value("theme(--spacing)", &theme, None), "0.25rem");
        assert_eq!(substitute_value("theme(spacing.99, 1px)", &theme, Some(&legacy)), "1px");
    }

    #[test]
    fn test_nested_calls_and_boundaries() {
        let theme = theme();
        assert_eq!(
            substitute_value("--alpha(--theme(--color-red-500 inline) / 25%)", &theme, None),
            "color-mix(in srgb, #ef4444 25%, transparent)"
        );
        assert_eq!(substitute_value("my-theme(x)", &theme, None), "my-theme(x)");
    }

    #[test]
    fn test_replace_calls() {
        let replaced = replace_calls("calc(--value(integer) * 1px)", "--value", &mut |args| {
            (args == "integer").then(|| "4".to_string())
        });
        assert_eq!(replaced.as_deref(), Some("calc(4 * 1px)"));
        assert_eq!(replace_calls("--value(x)", "--value", &mut |_| None), None);
    }

    #[test]
    fn test_substitute_in_tree() {
        let mut nodes = vec![decl("padding", "--spacing(2)")];
        substitute_functions(&mut nodes, &theme(), None);
        assert_eq!(nodes, vec![decl("padding", "calc(var(--spacing, 0.25rem) * 2)")]);
    }
}
