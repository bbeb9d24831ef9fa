//! Static tables for the legacy configuration format.
//!
//! Legacy theme keys are camelCase (`borderRadius`, `transitionDuration`) and
//! map onto one or more token namespaces. Some keys also accept bare numbers
//! that are formatted on the fly: `transitionDuration` turns `316` into
//! `316ms`.

use phf::phf_map;

/// Formatting rule for bare numeric values of a legacy theme key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BareValue {
    /// Non-negative integers, used as-is: `z-index`, `order`, `columns`.
    Integer,
    /// Non-negative numbers, used as-is: `stroke-width`.
    Number,
    /// Numbers with a unit appended: `316` → `316ms`.
    Suffix(&'static str),
    /// A fraction taken from the candidate: `aspect-2/5` → `2/5`.
    Ratio,
    /// `3` → `repeat(3, minmax(0, 1fr))`.
    GridRepeat,
}

impl BareValue {
    /// Formats a bare candidate value, or returns `None` if it does not fit.
    ///
    /// ```
    /// use wcss::theme::BareValue;
    ///
    /// assert_eq!(BareValue::Suffix("ms").format("316", None).as_deref(), Some("316ms"));
    /// assert_eq!(BareValue::Ratio.format("2", Some("2/5")).as_deref(), Some("2/5"));
    /// assert_eq!(BareValue::Integer.format("1.5", None), None);
    /// ```
    pub fn format(&self, value: &str, fraction: Option<&str>) -> Option<String> {
        match self {
            BareValue::Integer => is_integer(value).then(|| value.to_string()),
            BareValue::Number => is_number(value).then(|| value.to_string()),
            BareValue::Suffix(unit) => is_number(value).then(|| format!("{value}{unit}")),
            BareValue::Ratio => {
                let fraction = fraction?;
                let (num, den) = fraction.split_once('/')?;
                (is_integer(num) && is_integer(den)).then(|| format!("{num}/{den}"))
            }
            BareValue::GridRepeat => {
                is_integer(value).then(|| format!("repeat({value}, minmax(0, 1fr))"))
            }
        }
    }

    /// Whether formatting consumed the candidate's modifier (fractions).
    pub fn consumes_modifier(&self) -> bool {
        matches!(self, BareValue::Ratio)
    }
}

pub(crate) fn is_integer(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

pub(crate) fn is_number(value: &str) -> bool {
    let mut parts = value.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    match parts.next() {
        Some(frac) => {
            (whole.is_empty() || is_integer(whole)) && is_integer(frac)
        }
        None => is_integer(whole),
    }
}

/// Legacy keys that accept bare values.
pub static BARE_VALUES: phf::Map<&'static str, BareValue> = phf_map! {
    "aspectRatio" => BareValue::Ratio,
    "backdropBrightness" => BareValue::Suffix("%"),
    "backdropContrast" => BareValue::Suffix("%"),
    "backdropGrayscale" => BareValue::Suffix("%"),
    "backdropHueRotate" => BareValue::Suffix("deg"),
    "backdropInvert" => BareValue::Suffix("%"),
    "backdropOpacity" => BareValue::Suffix("%"),
    "backdropSaturate" => BareValue::Suffix("%"),
    "backdropSepia" => BareValue::Suffix("%"),
    "borderWidth" => BareValue::Suffix("px"),
    "brightness" => BareValue::Suffix("%"),
    "columns" => BareValue::Integer,
    "contrast" => BareValue::Suffix("%"),
    "divideWidth" => BareValue::Suffix("px"),
    "flexGrow" => BareValue::Integer,
    "flexShrink" => BareValue::Integer,
    "gradientColorStopPositions" => BareValue::Suffix("%"),
    "grayscale" => BareValue::Suffix("%"),
    "gridRowEnd" => BareValue::Integer,
    "gridRowStart" => BareValue::Integer,
    "gridColumnEnd" => BareValue::Integer,
    "gridColumnStart" => BareValue::Integer,
    "gridTemplateColumns" => BareValue::GridRepeat,
    "gridTemplateRows" => BareValue::GridRepeat,
    "hueRotate" => BareValue::Suffix("deg"),
    "invert" => BareValue::Suffix("%"),
    "lineClamp" => BareValue::Integer,
    "opacity" => BareValue::Suffix("%"),
    "order" => BareValue::Integer,
    "outlineOffset" => BareValue::Suffix("px"),
    "outlineWidth" => BareValue::Suffix("px"),
    "ringOffsetWidth" => BareValue::Suffix("px"),
    "ringWidth" => BareValue::Suffix("px"),
    "rotate" => BareValue::Suffix("deg"),
    "saturate" => BareValue::Suffix("%"),
    "scale" => BareValue::Suffix("%"),
    "sepia" => BareValue::Suffix("%"),
    "skew" => BareValue::Suffix("deg"),
    "strokeWidth" => BareValue::Number,
    "textDecorationThickness" => BareValue::Suffix("px"),
    "textUnderlineOffset" => BareValue::Suffix("px"),
    "transitionDelay" => BareValue::Suffix("ms"),
    "transitionDuration" => BareValue::Suffix("ms"),
    "zIndex" => BareValue::Integer,
};

/// Legacy keys whose default value is the full `colors` palette.
pub static COLOR_KEYS: &[&str] = &[
    "accentColor",
    "backgroundColor",
    "borderColor",
    "boxShadowColor",
    "caretColor",
    "divideColor",
    "fill",
    "gradientColorStops",
    "outlineColor",
    "placeholderColor",
    "ringColor",
    "ringOffsetColor",
    "stroke",
    "textColor",
    "textDecorationColor",
];

/// Token namespaces consulted for a legacy key, most specific first.
static NAMESPACES: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "colors" => &["--color"],
    "color" => &["--color"],
    "accentColor" => &["--accent-color", "--color"],
    "backgroundColor" => &["--background-color", "--color"],
    "borderColor" => &["--border-color", "--color"],
    "caretColor" => &["--caret-color", "--color"],
    "fill" => &["--fill", "--color"],
    "outlineColor" => &["--outline-color", "--color"],
    "ringColor" => &["--ring-color", "--color"],
    "stroke" => &["--stroke", "--color"],
    "textColor" => &["--text-color", "--color"],
    "textDecorationColor" => &["--text-decoration-color", "--color"],
    "animation" => &["--animation", "--animate"],
    "aspectRatio" => &["--aspect-ratio", "--aspect"],
    "borderRadius" => &["--radius"],
    "boxShadow" => &["--shadow"],
    "containers" => &["--container"],
    "fontFamily" => &["--font", "--font-family"],
    "fontSize" => &["--text"],
    "fontWeight" => &["--font-weight"],
    "letterSpacing" => &["--tracking"],
    "lineHeight" => &["--leading"],
    "maxWidth" => &["--max-width", "--container"],
    "screens" => &["--breakpoint"],
    "spacing" => &["--spacing"],
    "transitionTimingFunction" => &["--transition-timing-function", "--ease"],
};

/// Returns the token namespaces a legacy key reads from. Unlisted keys map to
/// their kebab-case form: `transitionDuration` → `--transition-duration`.
pub fn namespaces_for(key: &str) -> Vec<String> {
    match NAMESPACES.get(key) {
        Some(namespaces) => namespaces.iter().map(|ns| ns.to_string()).collect(),
        None => vec![format!("--{}", kebab_case(key))],
    }
}

/// `backgroundColor` → `background-color`.
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_aliases() {
        assert_eq!(namespaces_for("colors"), vec!["--color"]);
        assert_eq!(
            namespaces_for("backgroundColor"),
            vec!["--background-color", "--color"]
        );
        assert_eq!(namespaces_for("transitionDuration"), vec!["--transition-duration"]);
    }

    #[test]
    fn test_bare_formats() {
        assert_eq!(
            BARE_VALUES["gridTemplateColumns"].format("1", None).as_deref(),
            Some("repeat(1, minmax(0, 1fr))")
        );
        assert_eq!(BARE_VALUES["opacity"].format("1", None).as_deref(), Some("1%"));
        assert_eq!(BARE_VALUES["zIndex"].format("-1", None), None);
    }
}
