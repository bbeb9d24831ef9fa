//! Classification of CSS values.
//!
//! Functional utilities accept arbitrary values of one or more data types.
//! `text-[12px]` is a font size while `text-[#0088cc]` is a color; the type
//! is inferred from the value unless the candidate spells it out with a
//! hint such as `text-[length:var(--x)]`.

pub mod color;

pub use color::{is_color, with_alpha};

use crate::theme::legacy::{is_integer, is_number};

/// A CSS value type a utility may accept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    Color,
    Length,
    Percentage,
    Ratio,
    Number,
    Integer,
    Url,
    Position,
    BgSize,
    LineWidth,
    Image,
    FamilyName,
    GenericName,
    AbsoluteSize,
    RelativeSize,
    Angle,
    Vector,
    /// Anything; only ever chosen through an explicit hint or as a fallback.
    Any,
}

impl DataType {
    /// Parses a type hint, `length` in `[length:var(--x)]`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "color" => DataType::Color,
            "length" => DataType::Length,
            "percentage" => DataType::Percentage,
            "ratio" => DataType::Ratio,
            "number" => DataType::Number,
            "integer" => DataType::Integer,
            "url" => DataType::Url,
            "position" => DataType::Position,
            "bg-size" => DataType::BgSize,
            "line-width" => DataType::LineWidth,
            "image" => DataType::Image,
            "family-name" => DataType::FamilyName,
            "generic-name" => DataType::GenericName,
            "absolute-size" => DataType::AbsoluteSize,
            "relative-size" => DataType::RelativeSize,
            "angle" => DataType::Angle,
            "vector" => DataType::Vector,
            "any" | "*" => DataType::Any,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataType::Color => "color",
            DataType::Length => "length",
            DataType::Percentage => "percentage",
            DataType::Ratio => "ratio",
            DataType::Number => "number",
            DataType::Integer => "integer",
            DataType::Url => "url",
            DataType::Position => "position",
            DataType::BgSize => "bg-size",
            DataType::LineWidth => "line-width",
            DataType::Image => "image",
            DataType::FamilyName => "family-name",
            DataType::GenericName => "generic-name",
            DataType::AbsoluteSize => "absolute-size",
            DataType::RelativeSize => "relative-size",
            DataType::Angle => "angle",
            DataType::Vector => "vector",
            DataType::Any => "any",
        }
    }

    pub(crate) fn matches(&self, value: &str) -> bool {
        match self {
            DataType::Color => is_color(value),
            DataType::Length => is_length(value),
            DataType::Percentage => is_percentage(value),
            DataType::Ratio => is_ratio(value),
            DataType::Number => is_signed(value, is_number) || has_math_fn(value),
            DataType::Integer => is_signed(value, is_integer) || has_math_fn(value),
            DataType::Url => value.starts_with("url("),
            DataType::Position => is_position(value),
            DataType::BgSize => is_bg_size(value),
            DataType::LineWidth => {
                matches!(value, "thin" | "medium" | "thick") || is_length(value)
            }
            DataType::Image => is_image(value),
            DataType::FamilyName => is_family_name(value),
            DataType::GenericName => GENERIC_NAMES.contains(&value),
            DataType::AbsoluteSize => ABSOLUTE_SIZES.contains(&value),
            DataType::RelativeSize => matches!(value, "larger" | "smaller"),
            DataType::Angle => has_unit(value, ANGLE_UNITS),
            DataType::Vector => {
                let parts: Vec<_> = value.split_whitespace().collect();
                parts.len() == 3 && parts.iter().all(|p| is_signed(p, is_number))
            }
            DataType::Any => false,
        }
    }
}

/// Picks the first of `types` that `value` satisfies.
///
/// A lone `var(…)` could be anything, so it never infers a type.
///
/// ```
/// use wcss::value::{infer_data_type, DataType};
///
/// let types = [DataType::Length, DataType::Color];
/// assert_eq!(infer_data_type("12px", &types), Some(DataType::Length));
/// assert_eq!(infer_data_type("#0088cc", &types), Some(DataType::Color));
/// assert_eq!(infer_data_type("var(--x)", &types), None);
/// ```
pub fn infer_data_type(value: &str, types: &[DataType]) -> Option<DataType> {
    if value.starts_with("var(") {
        return None;
    }
    types.iter().copied().find(|t| t.matches(value))
}

/// Negates a value, literally for plain numbers and percentages.
///
/// ```
/// use wcss::value::with_negative;
///
/// assert_eq!(with_negative("4"), "-4");
/// assert_eq!(with_negative("50%"), "-50%");
/// assert_eq!(with_negative("var(--spacing-4, 1rem)"), "calc(var(--spacing-4, 1rem) * -1)");
/// ```
pub fn with_negative(value: &str) -> String {
    match value.strip_prefix('-') {
        Some(positive) if is_numeric_literal(positive) => positive.to_string(),
        _ if is_numeric_literal(value) => format!("-{value}"),
        _ => format!("calc({value} * -1)"),
    }
}

fn is_numeric_literal(value: &str) -> bool {
    is_number(value.strip_suffix('%').unwrap_or(value))
}

const LENGTH_UNITS: &[&str] = &[
    "cm", "mm", "Q", "in", "pc", "pt", "px", "em", "ex", "ch", "rem", "lh", "rlh", "vw", "vh",
    "vmin", "vmax", "vb", "vi", "svw", "svh", "lvw", "lvh", "dvw", "dvh", "cqw", "cqh", "cqi",
    "cqb", "cqmin", "cqmax",
];

const ANGLE_UNITS: &[&str] = &["deg", "rad", "grad", "turn"];

const MATH_FNS: &[&str] = &[
    "calc(", "min(", "max(", "clamp(", "round(", "mod(", "rem(", "sin(", "cos(", "tan(", "asin(",
    "acos(", "atan(", "atan2(", "pow(", "sqrt(", "hypot(", "log(", "exp(", "abs(", "sign(",
];

const GENERIC_NAMES: &[&str] = &[
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
    "ui-serif",
    "ui-sans-serif",
    "ui-monospace",
    "ui-rounded",
    "math",
    "emoji",
    "fangsong",
];

const ABSOLUTE_SIZES: &[&str] = &[
    "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "xxx-large",
];

pub(crate) fn has_math_fn(value: &str) -> bool {
    MATH_FNS.iter().any(|f| value.contains(f))
}

fn is_signed(value: &str, check: fn(&str) -> bool) -> bool {
    check(value.strip_prefix('-').unwrap_or(value))
}

fn has_unit(value: &str, units: &[&str]) -> bool {
    let value = value.strip_prefix('-').unwrap_or(value);
    let split = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    is_number(number) && units.contains(&unit)
}

fn is_length(value: &str) -> bool {
    value == "0" || has_unit(value, LENGTH_UNITS) || has_math_fn(value)
}

fn is_percentage(value: &str) -> bool {
    value
        .strip_suffix('%')
        .is_some_and(|n| is_signed(n, is_number))
        || has_math_fn(value)
}

fn is_ratio(value: &str) -> bool {
    value
        .split_once('/')
        .is_some_and(|(a, b)| is_number(a.trim()) && is_number(b.trim()))
}

fn is_position(value: &str) -> bool {
    value.split_whitespace().all(|part| {
        matches!(part, "center" | "top" | "right" | "bottom" | "left")
            || is_length(part)
            || is_percentage(part)
    })
}

fn is_bg_size(value: &str) -> bool {
    value.split(',').all(|layer| {
        let layer = layer.trim();
        matches!(layer, "cover" | "contain")
            || layer
                .split_whitespace()
                .all(|part| part == "auto" || is_length(part) || is_percentage(part))
    })
}

fn is_image(value: &str) -> bool {
    value.split(',').any(|layer| {
        let layer = layer.trim();
        layer.starts_with("url(")
            || layer.starts_with("image(")
            || layer.starts_with("image-set(")
            || layer.starts_with("cross-fade(")
            || layer.starts_with("element(")
            || layer
                .split_once('(')
                .is_some_and(|(name, _)| name.ends_with("-gradient"))
    })
}

fn is_family_name(value: &str) -> bool {
    let mut count = 0;
    for part in value.split(',') {
        let part = part.trim();
        let quoted = part.len() >= 2
            && ((part.starts_with('"') && part.ends_with('"'))
                || (part.starts_with('\'') && part.ends_with('\'')));
        let ident = !part.is_empty()
            && !part.starts_with(|c: char| c.is_ascii_digit())
            && part
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == ' ');
        if !(quoted || ident) {
            return false;
        }
        count += 1;
    }
    count > 1 || value.starts_with(['"', '\''])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_type_wins() {
        let types = [DataType::Percentage, DataType::Number];
        assert_eq!(infer_data_type("50%", &types), Some(DataType::Percentage));
        assert_eq!(infer_data_type("0.5", &types), Some(DataType::Number));
        assert_eq!(infer_data_type("calc(1 + 1)", &types), Some(DataType::Percentage));
    }

    #[test]
    fn test_lengths() {
        for value in ["0", "12px", "-1.5rem", ".5em", "100dvh", "min(1px, 2px)"] {
            assert_eq!(infer_data_type(value, &[DataType::Length]), Some(DataType::Length), "{value}");
        }
        for value in ["12", "12pz", "red"] {
            assert_eq!(infer_data_type(value, &[DataType::Length]), None, "{value}");
        }
    }

    #[test]
    fn test_font_families() {
        let types = [DataType::FamilyName, DataType::GenericName];
        assert_eq!(infer_data_type("'Inter', sans-serif", &types), Some(DataType::FamilyName));
        assert_eq!(infer_data_type("ui-monospace", &types), Some(DataType::GenericName));
        assert_eq!(infer_data_type("bold", &types), None);
    }

    #[test]
    fn test_images() {
        assert!(DataType::Image.matches("linear-gradient(red, blue)"));
        assert!(DataType::Image.matches("url(/a.png)"));
        assert!(!DataType::Image.matches("red"));
    }

    #[test]
    fn test_negative_of_negative() {
        assert_eq!(with_negative("-4"), "4");
        assert_eq!(with_negative("1px"), "calc(1px * -1)");
    }

    #[test]
    fn test_percentages_negate_literally() {
        assert_eq!(with_negative("100%"), "-100%");
        assert_eq!(with_negative("-12.5%"), "12.5%");
        assert_eq!(with_negative("calc(1/2 * 100%)"), "calc(calc(1/2 * 100%) * -1)");
    }

    #[test]
    fn test_hints() {
        assert_eq!(DataType::from_name("bg-size"), Some(DataType::BgSize));
        assert_eq!(DataType::from_name("nope"), None);
        assert_eq!(DataType::LineWidth.name(), "line-width");
    }
}
