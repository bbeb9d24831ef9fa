//! Color detection and opacity mixing.

use phf::{phf_set, Set};

use crate::theme::legacy::is_number;

static NAMED_COLORS: Set<&'static str> = phf_set! {
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue",
    "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
    "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon",
    "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise",
    "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick",
    "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod",
    "gray", "green", "greenyellow", "grey", "honeydew", "hotpink", "indianred", "indigo",
    "ivory", "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon", "lightblue",
    "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey",
    "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
    "lightslategrey", "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta",
    "maroon", "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple",
    "mediumseagreen", "mediumslateblue", "mediumspringgreen", "mediumturquoise",
    "mediumvioletred", "midnightblue", "mintcream", "mistyrose", "moccasin", "navajowhite",
    "navy", "oldlace", "olive", "olivedrab", "orange", "orangered", "orchid", "palegoldenrod",
    "palegreen", "paleturquoise", "palevioletred", "papayawhip", "peachpuff", "peru", "pink",
    "plum", "powderblue", "purple", "rebeccapurple", "red", "rosybrown", "royalblue",
    "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell", "sienna", "silver",
    "skyblue", "slateblue", "slategray", "slategrey", "snow", "springgreen", "steelblue", "tan",
    "teal", "thistle", "tomato", "turquoise", "violet", "wheat", "white", "whitesmoke",
    "yellow", "yellowgreen",
    "transparent", "currentcolor",
    "canvas", "canvastext", "linktext", "visitedtext", "activetext", "buttonface",
    "buttontext", "buttonborder", "field", "fieldtext", "highlight", "highlighttext",
    "selecteditem", "selecteditemtext", "mark", "marktext", "graytext", "accentcolor",
    "accentcolortext",
};

const COLOR_FNS: &[&str] = &[
    "rgb", "rgba", "hsl", "hsla", "hwb", "lab", "lch", "oklab", "oklch", "color", "color-mix",
    "light-dark",
];

/// Whether `value` is a CSS color.
///
/// ```
/// use wcss::value::is_color;
///
/// assert!(is_color("#0088cc"));
/// assert!(is_color("rebeccapurple"));
/// assert!(is_color("oklch(0.7 0.1 200)"));
/// assert!(!is_color("12px"));
/// ```
pub fn is_color(value: &str) -> bool {
    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    if let Some((name, _)) = value.split_once('(') {
        return value.ends_with(')') && COLOR_FNS.contains(&name.to_ascii_lowercase().as_str());
    }
    NAMED_COLORS.contains(value.to_ascii_lowercase().as_str())
}

/// Applies an opacity to a color with `color-mix()`.
///
/// Numbers are fractions (`0.5` → `50%`), percentages are used as-is and
/// anything else is scaled with `calc()`. Full opacity returns the color
/// untouched.
///
/// ```
/// use wcss::value::with_alpha;
///
/// assert_eq!(with_alpha("red", "50%"), "color-mix(in srgb, red 50%, transparent)");
/// assert_eq!(with_alpha("red", "0.25"), "color-mix(in srgb, red 25%, transparent)");
/// assert_eq!(with_alpha("red", "100%"), "red");
/// ```
pub fn with_alpha(color: &str, alpha: &str) -> String {
    let alpha = alpha.trim();

    let alpha = if is_number(alpha) {
        match alpha.parse::<f64>() {
            Ok(n) => format!("{}%", format_number(n * 100.0)),
            Err(_) => return color.to_string(),
        }
    } else if alpha.ends_with('%') && is_number(&alpha[..alpha.len() - 1]) {
        alpha.to_string()
    } else {
        format!("calc({alpha} * 100%)")
    };

    if alpha == "100%" {
        return color.to_string();
    }

    format!("color-mix(in srgb, {color} {alpha}, transparent)")
}

/// Formats a float without float noise: `7.000000000000001` → `7`.
fn format_number(n: f64) -> String {
    let rounded = (n * 1e6).round() / 1e6;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_lengths() {
        assert!(is_color("#fff"));
        assert!(is_color("#ffff"));
        assert!(!is_color("#fffff"));
        assert!(!is_color("#ggg"));
    }

    #[test]
    fn test_system_and_keyword_colors() {
        assert!(is_color("currentColor"));
        assert!(is_color("transparent"));
        assert!(is_color("Canvas"));
        assert!(!is_color("var(--x)"));
    }

    #[test]
    fn test_alpha_forms() {
        assert_eq!(with_alpha("red", "1"), "red");
        assert_eq!(with_alpha("red", "0.07"), "color-mix(in srgb, red 7%, transparent)");
        assert_eq!(
            with_alpha("var(--color-red-500)", "var(--opacity-half)"),
            "color-mix(in srgb, var(--color-red-500) calc(var(--opacity-half) * 100%), transparent)"
        );
    }
}
