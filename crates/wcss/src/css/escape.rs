//! CSS identifier escaping.
//!
//! Generated selectors are `.` followed by the escaped class name, using the
//! CSSOM `CSS.escape()` algorithm so that `mt-[10px]` becomes `mt-\[10px\]`.
//! [`unescape`] reverses it.

/// Escapes `name` for use as a CSS identifier.
///
/// # Examples
///
/// ```
/// use wcss::css::escape_class_name;
///
/// assert_eq!(escape_class_name("mt-[10px]"), r"mt-\[10px\]");
/// assert_eq!(escape_class_name("hover:w-1/2"), r"hover\:w-1\/2");
/// assert_eq!(escape_class_name("2xl:flex"), r"\32 xl\:flex");
/// ```
pub fn escape_class_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 8);

    for (i, &c) in chars.iter().enumerate() {
        if c == '\0' {
            out.push('\u{FFFD}');
            continue;
        }

        let code = c as u32;
        let leading_digit = c.is_ascii_digit() && (i == 0 || (i == 1 && chars[0] == '-'));
        if (0x01..=0x1f).contains(&code) || code == 0x7f || leading_digit {
            out.push_str(&format!("\\{code:x} "));
            continue;
        }

        if i == 0 && c == '-' && chars.len() == 1 {
            out.push_str("\\-");
            continue;
        }

        if code >= 0x80 || c == '-' || c == '_' || c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }

    out
}

/// Reverses [`escape_class_name`].
///
/// ```
/// use wcss::css::{escape_class_name, unescape};
///
/// let raw = "md:[&>*]:bg-red-500/50";
/// assert_eq!(unescape(&escape_class_name(raw)), raw);
/// ```
pub fn unescape(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let mut hex = String::new();
        while hex.len() < 6 {
            match chars.peek() {
                Some(h) if h.is_ascii_hexdigit() => {
                    hex.push(*h);
                    chars.next();
                }
                _ => break,
            }
        }

        if hex.is_empty() {
            if let Some(next) = chars.next() {
                out.push(next);
            }
            continue;
        }

        if chars.peek() == Some(&' ') {
            chars.next();
        }
        let decoded = u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or('\u{FFFD}');
        out.push(decoded);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape_class_name("w-1.5"), r"w-1\.5");
        assert_eq!(escape_class_name("w-[50%]"), r"w-\[50\%\]");
        assert_eq!(escape_class_name("-mt-4"), "-mt-4");
        assert_eq!(escape_class_name("-"), r"\-");
        assert_eq!(escape_class_name("-2"), r"-\32 ");
    }

    #[test]
    fn test_unescape_hex_sequences() {
        assert_eq!(unescape(r"\32 xl\:flex"), "2xl:flex");
        assert_eq!(unescape(r"a\!"), "a!");
    }
}
