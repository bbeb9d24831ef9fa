//! Arbitrary value decoding.
//!
//! Class names cannot contain spaces, so arbitrary values spell them as
//! underscores: `grid-cols-[1fr_auto]`. Decoding turns those back into
//! whitespace, keeps literal underscores where they are meaningful (inside
//! `url()` and custom property names), and normalizes math expressions
//! so `calc(100%-1rem)` becomes `calc(100% - 1rem)`.

const MATH_FUNCTIONS: &[&str] = &[
    "calc", "min", "max", "clamp", "mod", "rem", "sin", "cos", "tan", "asin", "acos", "atan",
    "atan2", "pow", "sqrt", "hypot", "log", "exp", "round",
];

/// Decodes the text between the brackets of an arbitrary value.
///
/// # Examples
///
/// ```
/// use classname::decode_arbitrary_value;
///
/// assert_eq!(decode_arbitrary_value("1fr_auto"), "1fr auto");
/// assert_eq!(decode_arbitrary_value(r"a\_b"), "a_b");
/// assert_eq!(decode_arbitrary_value("url(/a_b.png)"), "url(/a_b.png)");
/// assert_eq!(decode_arbitrary_value("calc(100%-1rem)"), "calc(100% - 1rem)");
/// ```
pub fn decode_arbitrary_value(input: &str) -> String {
    let decoded = convert_underscores(input);
    if decoded.contains('(') {
        space_math_operators(&decoded)
    } else {
        decoded
    }
}

fn convert_underscores(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut functions: Vec<String> = Vec::new();
    let mut word = String::new();
    let mut in_custom_property = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'_') => {
                chars.next();
                output.push('_');
                word.push('_');
            }
            '(' => {
                functions.push(std::mem::take(&mut word).to_ascii_lowercase());
                in_custom_property = false;
                output.push(c);
            }
            ')' => {
                functions.pop();
                word.clear();
                in_custom_property = false;
                output.push(c);
            }
            '_' => {
                let inside_url = functions.last().is_some_and(|f| f == "url");
                if inside_url || in_custom_property {
                    output.push('_');
                    word.push('_');
                } else {
                    output.push(' ');
                    word.clear();
                    in_custom_property = false;
                }
            }
            '-' if word.is_empty() && chars.peek() == Some(&'-') => {
                in_custom_property = true;
                output.push(c);
                word.push(c);
            }
            ',' | ' ' => {
                word.clear();
                in_custom_property = false;
                output.push(c);
            }
            _ => {
                output.push(c);
                word.push(c);
            }
        }
    }

    output
}

fn space_math_operators(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut output = String::with_capacity(input.len() + 8);
    let mut functions: Vec<String> = Vec::new();
    let mut word = String::new();
    let mut quote: Option<char> = None;

    for (i, &c) in chars.iter().enumerate() {
        if let Some(q) = quote {
            output.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }

        let in_math = functions
            .last()
            .is_some_and(|f| MATH_FUNCTIONS.contains(&f.as_str()) || f.is_empty());

        match c {
            '"' | '\'' => {
                quote = Some(c);
                output.push(c);
            }
            '(' => {
                functions.push(std::mem::take(&mut word).to_ascii_lowercase());
                output.push(c);
            }
            ')' => {
                functions.pop();
                word.clear();
                output.push(c);
            }
            '*' | '/' | '+' if in_math => {
                push_operator(&mut output, c);
                word.clear();
            }
            '-' if in_math && is_binary_minus(&chars, i) => {
                push_operator(&mut output, c);
                word.clear();
            }
            ' ' | ',' => {
                word.clear();
                output.push(c);
            }
            _ => {
                word.push(c);
                output.push(c);
            }
        }
    }

    output
}

fn push_operator(output: &mut String, op: char) {
    while output.ends_with(' ') {
        output.pop();
    }
    output.push(' ');
    output.push(op);
    output.push(' ');
}

/// A `-` is a subtraction when it follows an operand and precedes another one.
fn is_binary_minus(chars: &[char], i: usize) -> bool {
    let prev = chars[..i].iter().rev().find(|c| **c != ' ');
    let next = chars.get(i + 1);

    let after_operand = match prev {
        Some(p) => p.is_ascii_digit() || *p == '%' || *p == ')' || p.is_ascii_alphabetic(),
        None => false,
    };
    let before_operand = match next {
        Some(n) => n.is_ascii_digit() || *n == '(' || *n == '.' || *n == 'v' || *n == ' ',
        None => false,
    };

    // `--foo` custom properties and `e-3` exponents are not subtractions.
    let part_of_ident = prev == Some(&'-') || next == Some(&'-');
    after_operand && before_operand && !part_of_ident && !is_exponent(chars, i)
}

fn is_exponent(chars: &[char], i: usize) -> bool {
    i >= 2
        && matches!(chars[i - 1], 'e' | 'E')
        && chars[i - 2].is_ascii_digit()
        && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit())
}

/// Checks that an arbitrary value can be emitted inside a declaration
/// without breaking out of it.
pub fn is_valid_arbitrary(input: &str) -> bool {
    if input.trim().is_empty() {
        return false;
    }
    if crate::segment::check_balanced(input).is_err() {
        return false;
    }

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
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
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => return false,
            _ => {}
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_property_names_keep_underscores() {
        assert_eq!(decode_arbitrary_value("var(--my_color)"), "var(--my_color)");
        assert_eq!(
            decode_arbitrary_value("var(--a_b,_red)"),
            "var(--a_b, red)"
        );
    }

    #[test]
    fn test_math_spacing() {
        assert_eq!(
            decode_arbitrary_value("calc(var(--a)*2)"),
            "calc(var(--a) * 2)"
        );
        assert_eq!(
            decode_arbitrary_value("min(100%,calc(10px+2rem))"),
            "min(100%,calc(10px + 2rem))"
        );
        assert_eq!(decode_arbitrary_value("calc(-1*2px)"), "calc(-1 * 2px)");
    }

    #[test]
    fn test_invalid_arbitrary() {
        assert!(!is_valid_arbitrary("red;color:blue"));
        assert!(!is_valid_arbitrary("   "));
        assert!(is_valid_arbitrary("'a;b'"));
        assert!(is_valid_arbitrary("url(a;b)"));
    }
}
