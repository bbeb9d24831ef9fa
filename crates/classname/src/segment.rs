//! Top-level splitting that respects brackets, quotes and escapes.
//!
//! Both class names (`hover:bg-[url(a:b)]`) and CSS fragments (`a, :is(b, c)`)
//! need to be split on a separator without looking inside nested groups.

use crate::error::CandidateError;

/// Splits `input` on every `separator` that is not nested inside `()`, `[]`,
/// `{}` or a quoted string, and is not escaped with a backslash.
///
/// # Examples
///
/// ```
/// use classname::segment;
///
/// assert_eq!(segment("hover:bg-[a:b]", ':'), vec!["hover", "bg-[a:b]"]);
/// assert_eq!(segment("a, :is(b, c)", ','), vec!["a", " :is(b, c)"]);
/// ```
pub fn segment(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut stack: Vec<char> = Vec::new();
    let mut start = 0;
    let mut chars = input.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' | '\'' if stack.last() == Some(&c) => {
                stack.pop();
            }
            _ if matches!(stack.last(), Some('"') | Some('\'')) => {}
            '"' | '\'' => stack.push(c),
            '(' => stack.push(')'),
            '[' => stack.push(']'),
            '{' => stack.push('}'),
            ')' | ']' | '}' if stack.last() == Some(&c) => {
                stack.pop();
            }
            _ if c == separator && stack.is_empty() => {
                parts.push(&input[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }

    parts.push(&input[start..]);
    parts
}

/// Returns the byte index of the last top-level `separator`, if any.
pub fn rfind_top_level(input: &str, separator: char) -> Option<usize> {
    let parts = segment(input, separator);
    if parts.len() < 2 {
        return None;
    }
    let last = parts[parts.len() - 1];
    Some(input.len() - last.len() - separator.len_utf8())
}

/// Verifies that every bracket and quote in `input` is closed in order.
pub fn check_balanced(input: &str) -> Result<(), CandidateError> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut chars = input.char_indices();

    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' | '\'' if stack.last().map(|(d, _)| *d) == Some(c) => {
                stack.pop();
            }
            _ if matches!(stack.last(), Some(('"', _)) | Some(('\'', _))) => {}
            '"' | '\'' => stack.push((c, idx)),
            '(' => stack.push((')', idx)),
            '[' => stack.push((']', idx)),
            '{' => stack.push(('}', idx)),
            ')' | ']' | '}' => match stack.pop() {
                Some((expected, _)) if expected == c => {}
                _ => {
                    return Err(CandidateError::Unbalanced {
                        delimiter: c,
                        position: idx,
                    });
                }
            },
            _ => {}
        }
    }

    match stack.pop() {
        Some((delimiter, position)) => Err(CandidateError::Unbalanced {
            delimiter,
            position,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_ignores_nested_separators() {
        assert_eq!(
            segment("[&:hover]:bg-[url(x:y)]", ':'),
            vec!["[&:hover]", "bg-[url(x:y)]"]
        );
    }

    #[test]
    fn test_segment_respects_escapes_and_quotes() {
        assert_eq!(segment(r"a\:b:c", ':'), vec![r"a\:b", "c"]);
        assert_eq!(segment("content-['a:b']:x", ':'), vec!["content-['a:b']", "x"]);
    }

    #[test]
    fn test_rfind_top_level() {
        assert_eq!(rfind_top_level("bg-red-500/50", '/'), Some(10));
        assert_eq!(rfind_top_level("bg-[a/b]", '/'), None);
    }

    #[test]
    fn test_check_balanced() {
        assert!(check_balanced("bg-[calc(1px+2px)]").is_ok());
        assert_eq!(
            check_balanced("bg-[a)]"),
            Err(CandidateError::Unbalanced {
                delimiter: ')',
                position: 5
            })
        );
        assert!(check_balanced("bg-[a").is_err());
    }
}
