//! Utility candidates: one class name, fully split into variants, root,
//! value and modifier.

use smallvec::SmallVec;

use crate::decode::{decode_arbitrary_value, is_valid_arbitrary};
use crate::error::CandidateError;
use crate::registry::Registry;
use crate::segment::{check_balanced, rfind_top_level, segment};
use crate::variant::{Variant, find_roots, parse_variant};

/// The `/…` suffix of a candidate or variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    /// `bg-red-500/50`
    Named(String),
    /// `bg-red-500/[0.3]` or `bg-red-500/(--alpha)`
    Arbitrary(String),
}

impl Modifier {
    pub fn value(&self) -> &str {
        match self {
            Modifier::Named(v) | Modifier::Arbitrary(v) => v,
        }
    }

    pub fn is_arbitrary(&self) -> bool {
        matches!(self, Modifier::Arbitrary(_))
    }
}

/// The value part of a functional candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CandidateValue {
    /// A name or number looked up in a values table. `fraction` is set when
    /// the candidate also had a named modifier, so `w-1/2` can match `1/2`.
    Bare {
        value: String,
        fraction: Option<String>,
    },
    /// Bracketed text used verbatim, with an optional `type:` hint.
    Arbitrary {
        value: String,
        data_type: Option<String>,
    },
}

impl CandidateValue {
    pub fn as_str(&self) -> &str {
        match self {
            CandidateValue::Bare { value, .. } | CandidateValue::Arbitrary { value, .. } => value,
        }
    }

    pub fn is_arbitrary(&self) -> bool {
        matches!(self, CandidateValue::Arbitrary { .. })
    }
}

/// What the base of a candidate refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CandidateKind {
    /// A fixed utility name: `flex`, `sr-only`.
    Static { root: String },
    /// A root plus optional value and modifier: `bg-red-500/50`, `m-[3px]`.
    Functional {
        root: String,
        value: Option<CandidateValue>,
        modifier: Option<Modifier>,
    },
    /// An inline declaration: `[mask-type:luminance]`.
    ArbitraryProperty {
        property: String,
        value: String,
        modifier: Option<Modifier>,
    },
}

/// A parsed class name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// The class name exactly as written.
    pub raw: String,
    pub kind: CandidateKind,
    /// Left to right as written, so `variants[0]` is the outermost wrapper.
    pub variants: SmallVec<[Variant; 2]>,
    pub negative: bool,
    pub important: bool,
}

impl Candidate {
    pub fn root(&self) -> Option<&str> {
        match &self.kind {
            CandidateKind::Static { root } | CandidateKind::Functional { root, .. } => Some(root),
            CandidateKind::ArbitraryProperty { .. } => None,
        }
    }

    pub fn value(&self) -> Option<&CandidateValue> {
        match &self.kind {
            CandidateKind::Functional { value, .. } => value.as_ref(),
            _ => None,
        }
    }

    pub fn modifier(&self) -> Option<&Modifier> {
        match &self.kind {
            CandidateKind::Functional { modifier, .. }
            | CandidateKind::ArbitraryProperty { modifier, .. } => modifier.as_ref(),
            CandidateKind::Static { .. } => None,
        }
    }
}

/// The structural split of a class name, before any registry lookups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawCandidate<'a> {
    pub variants: SmallVec<[&'a str; 4]>,
    /// The utility part with the modifier, negative sign and `!` removed.
    pub base: &'a str,
    /// The utility part with only `!` removed; static names are matched
    /// against this.
    pub full_base: &'a str,
    pub modifier: Option<&'a str>,
    pub negative: bool,
    pub important: bool,
}

/// Splits a class name into variant segments, base, modifier and flags.
///
/// This is a pure function: it never consults a registry and accepts
/// anything that is structurally well formed.
///
/// # Examples
///
/// ```
/// use classname::split_candidate;
///
/// let raw = split_candidate("md:hover:-mt-[calc(1px_+_2px)]/50").unwrap();
/// assert_eq!(raw.variants.as_slice(), &["md", "hover"]);
/// assert_eq!(raw.base, "mt-[calc(1px_+_2px)]");
/// assert_eq!(raw.modifier, Some("50"));
/// assert!(raw.negative);
/// ```
pub fn split_candidate(input: &str) -> Result<RawCandidate<'_>, CandidateError> {
    if input.trim().is_empty() {
        return Err(CandidateError::Empty);
    }
    check_balanced(input)?;

    let mut segments = segment(input, ':');
    if segments.iter().any(|s| s.is_empty()) {
        return Err(CandidateError::EmptySegment(input.to_string()));
    }
    if segments.iter().any(|s| has_top_level_whitespace(s)) {
        return Err(CandidateError::Whitespace(input.to_string()));
    }

    let mut base = segments.pop().unwrap_or_default();
    let variants: SmallVec<[&str; 4]> = segments.into_iter().collect();

    let mut important = false;
    if let Some(stripped) = base.strip_suffix('!') {
        base = stripped;
        important = true;
    } else if let Some(stripped) = base.strip_prefix('!') {
        base = stripped;
        important = true;
    }
    if base.is_empty() {
        return Err(CandidateError::EmptySegment(input.to_string()));
    }
    let full_base = base;

    let mut modifier = None;
    if let Some(idx) = rfind_top_level(base, '/') {
        let suffix = &base[idx + 1..];
        if suffix.is_empty() {
            return Err(CandidateError::EmptyModifier(input.to_string()));
        }
        modifier = Some(suffix);
        base = &base[..idx];
    }

    let mut negative = false;
    if base.len() > 1 && base.starts_with('-') && !base.starts_with("--") {
        negative = true;
        base = &base[1..];
    }

    if base.is_empty() {
        return Err(CandidateError::EmptySegment(input.to_string()));
    }

    Ok(RawCandidate {
        variants,
        base,
        full_base,
        modifier,
        negative,
        important,
    })
}

fn has_top_level_whitespace(segment: &str) -> bool {
    let mut depth = 0usize;
    for c in segment.chars() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => return true,
            _ => {}
        }
    }
    false
}

/// Parses a `/…` modifier suffix.
pub(crate) fn parse_modifier(modifier: &str) -> Option<Modifier> {
    if modifier.starts_with('[') && modifier.ends_with(']') {
        let inner = &modifier[1..modifier.len() - 1];
        if !is_valid_arbitrary(inner) {
            return None;
        }
        return Some(Modifier::Arbitrary(decode_arbitrary_value(inner)));
    }

    if modifier.starts_with('(') && modifier.ends_with(')') {
        let inner = &modifier[1..modifier.len() - 1];
        if !inner.starts_with("--") || !is_valid_arbitrary(inner) {
            return None;
        }
        return Some(Modifier::Arbitrary(format!(
            "var({})",
            decode_arbitrary_value(inner)
        )));
    }

    if is_named_value(modifier) {
        Some(Modifier::Named(modifier.to_string()))
    } else {
        None
    }
}

fn is_named_value(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '%'))
}

/// Parses a class name into every candidate the registry can confirm.
///
/// Most class names produce zero or one candidate. A name like `foo-bar` can
/// yield both a static candidate and a functional `foo` candidate with value
/// `bar` when both are registered; the matcher compiles all of them.
pub fn parse_candidate(input: &str, registry: &impl Registry) -> Vec<Candidate> {
    let Ok(raw) = split_candidate(input) else {
        return Vec::new();
    };

    let mut variants: SmallVec<[Variant; 2]> = SmallVec::new();
    for text in &raw.variants {
        match parse_variant(text, registry) {
            Some(variant) => variants.push(variant),
            None => return Vec::new(),
        }
    }

    let make = |kind: CandidateKind, negative: bool| Candidate {
        raw: input.to_string(),
        kind,
        variants: variants.clone(),
        negative,
        important: raw.important,
    };

    // [property:value]
    if raw.full_base.starts_with('[') {
        return parse_arbitrary_property(&raw)
            .map(|kind| vec![make(kind, false)])
            .unwrap_or_default();
    }

    let mut candidates = Vec::new();

    if !raw.full_base.contains('[') && registry.has_static_utility(raw.full_base) {
        candidates.push(make(
            CandidateKind::Static {
                root: raw.full_base.to_string(),
            },
            false,
        ));
    }

    let modifier = match raw.modifier {
        Some(text) => match parse_modifier(text) {
            Some(modifier) => Some(modifier),
            None => return candidates,
        },
        None => None,
    };

    let base = raw.base;
    let roots: Vec<(&str, Option<&str>)> = if base.ends_with(']') || base.ends_with(')') {
        let open = if base.ends_with(']') { "-[" } else { "-(" };
        match base.find(open) {
            Some(idx) if registry.has_functional_utility(&base[..idx]) => {
                vec![(&base[..idx], Some(&base[idx + 1..]))]
            }
            _ => Vec::new(),
        }
    } else {
        find_roots(base, |root| registry.has_functional_utility(root))
    };

    for (root, value) in roots {
        let value = match value {
            None => None,
            Some(text) => match parse_candidate_value(text, raw.modifier, modifier.as_ref()) {
                Some(value) => Some(value),
                None => continue,
            },
        };

        candidates.push(make(
            CandidateKind::Functional {
                root: root.to_string(),
                value,
                modifier: modifier.clone(),
            },
            raw.negative,
        ));
    }

    candidates
}

fn parse_arbitrary_property(raw: &RawCandidate<'_>) -> Option<CandidateKind> {
    if raw.negative || !raw.base.ends_with(']') {
        return None;
    }
    let inner = &raw.base[1..raw.base.len() - 1];
    let colon = inner.find(':')?;
    let property = &inner[..colon];
    let value = &inner[colon + 1..];

    let valid_property = !property.is_empty()
        && property
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_property || !is_valid_arbitrary(value) {
        return None;
    }

    let modifier = match raw.modifier {
        Some(text) => Some(parse_modifier(text)?),
        None => None,
    };

    Some(CandidateKind::ArbitraryProperty {
        property: property.to_string(),
        value: decode_arbitrary_value(value),
        modifier,
    })
}

fn parse_candidate_value(
    text: &str,
    raw_modifier: Option<&str>,
    modifier: Option<&Modifier>,
) -> Option<CandidateValue> {
    if text.starts_with('[') && text.ends_with(']') {
        let mut inner = &text[1..text.len() - 1];
        if !is_valid_arbitrary(inner) {
            return None;
        }

        let mut data_type = None;
        let hint_len = inner
            .find(|c: char| !(c == '-' || c.is_ascii_lowercase()))
            .unwrap_or(inner.len());
        if hint_len > 0 && inner[hint_len..].starts_with(':') {
            data_type = Some(inner[..hint_len].to_string());
            inner = &inner[hint_len + 1..];
        }

        if inner.trim().is_empty() {
            return None;
        }
        return Some(CandidateValue::Arbitrary {
            value: decode_arbitrary_value(inner),
            data_type,
        });
    }

    if text.starts_with('(') && text.ends_with(')') {
        let mut inner = &text[1..text.len() - 1];
        let mut data_type = None;
        if let Some((hint, rest)) = inner.split_once(':') {
            if !hint.is_empty() && hint.chars().all(|c| c == '-' || c.is_ascii_lowercase()) {
                data_type = Some(hint.to_string());
                inner = rest;
            }
        }
        if !inner.starts_with("--") || !is_valid_arbitrary(inner) {
            return None;
        }
        return Some(CandidateValue::Arbitrary {
            value: format!("var({})", decode_arbitrary_value(inner)),
            data_type,
        });
    }

    if !is_named_value(text) {
        return None;
    }

    let fraction = match (raw_modifier, modifier) {
        (Some(m), Some(Modifier::Named(_))) => Some(format!("{text}/{m}")),
        _ => None,
    };
    Some(CandidateValue::Bare {
        value: text.to_string(),
        fraction,
    })
}
