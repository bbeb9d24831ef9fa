//! Output rule ordering.
//!
//! Rules are ordered by the variants they use, then by the position of their
//! properties in [`PROPERTY_ORDER`]. Shorthands come before the longhands
//! they cover, so `m-4` sorts before `mx-4`, which sorts before `mb-4`,
//! wherever the classes appear in the source.

use std::cmp::Ordering;
use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::ast::AstNode;

/// Cascade order of the properties utilities generate.
pub static PROPERTY_ORDER: &[&str] = &[
    "container-type",
    "pointer-events",
    "visibility",
    "position",
    "inset",
    "inset-inline",
    "inset-block",
    "inset-inline-start",
    "inset-inline-end",
    "top",
    "right",
    "bottom",
    "left",
    "isolation",
    "z-index",
    "order",
    "grid-column",
    "grid-column-start",
    "grid-column-end",
    "grid-row",
    "grid-row-start",
    "grid-row-end",
    "float",
    "clear",
    "margin",
    "margin-inline",
    "margin-block",
    "margin-inline-start",
    "margin-inline-end",
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
    "box-sizing",
    "display",
    "field-sizing",
    "aspect-ratio",
    "height",
    "max-height",
    "min-height",
    "width",
    "max-width",
    "min-width",
    "flex",
    "flex-shrink",
    "flex-grow",
    "flex-basis",
    "table-layout",
    "caption-side",
    "border-collapse",
    "border-spacing",
    "transform-origin",
    "translate",
    "--tw-translate-x",
    "--tw-translate-y",
    "--tw-translate-z",
    "scale",
    "--tw-scale-x",
    "--tw-scale-y",
    "--tw-scale-z",
    "rotate",
    "--tw-rotate-x",
    "--tw-rotate-y",
    "--tw-rotate-z",
    "--tw-skew-x",
    "--tw-skew-y",
    "transform",
    "animation",
    "cursor",
    "touch-action",
    "resize",
    "user-select",
    "scroll-snap-type",
    "scroll-snap-align",
    "scroll-snap-stop",
    "scroll-margin",
    "scroll-padding",
    "list-style-position",
    "list-style-type",
    "list-style-image",
    "appearance",
    "columns",
    "break-before",
    "break-inside",
    "break-after",
    "grid-auto-columns",
    "grid-template-columns",
    "grid-auto-flow",
    "grid-auto-rows",
    "grid-template-rows",
    "flex-direction",
    "flex-wrap",
    "place-content",
    "place-items",
    "align-content",
    "align-items",
    "justify-content",
    "justify-items",
    "gap",
    "column-gap",
    "row-gap",
    "place-self",
    "align-self",
    "justify-self",
    "overflow",
    "overflow-x",
    "overflow-y",
    "overscroll-behavior",
    "overscroll-behavior-x",
    "overscroll-behavior-y",
    "scroll-behavior",
    "border-radius",
    "border-start-start-radius",
    "border-start-end-radius",
    "border-end-end-radius",
    "border-end-start-radius",
    "border-top-left-radius",
    "border-top-right-radius",
    "border-bottom-right-radius",
    "border-bottom-left-radius",
    "border-width",
    "border-inline-width",
    "border-block-width",
    "border-inline-start-width",
    "border-inline-end-width",
    "border-top-width",
    "border-right-width",
    "border-bottom-width",
    "border-left-width",
    "border-style",
    "border-inline-style",
    "border-block-style",
    "border-inline-start-style",
    "border-inline-end-style",
    "border-top-style",
    "border-right-style",
    "border-bottom-style",
    "border-left-style",
    "border-color",
    "border-inline-color",
    "border-block-color",
    "border-inline-start-color",
    "border-inline-end-color",
    "border-top-color",
    "border-right-color",
    "border-bottom-color",
    "border-left-color",
    "background-color",
    "background-image",
    "box-decoration-break",
    "background-size",
    "background-attachment",
    "background-clip",
    "background-position",
    "background-repeat",
    "background-origin",
    "fill",
    "stroke",
    "stroke-width",
    "object-fit",
    "object-position",
    "padding",
    "padding-inline",
    "padding-block",
    "padding-inline-start",
    "padding-inline-end",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    "text-align",
    "text-indent",
    "vertical-align",
    "font-family",
    "font-size",
    "line-height",
    "font-weight",
    "letter-spacing",
    "text-wrap",
    "overflow-wrap",
    "word-break",
    "text-overflow",
    "hyphens",
    "white-space",
    "color",
    "text-transform",
    "font-style",
    "font-stretch",
    "font-variant-numeric",
    "text-decoration-line",
    "text-decoration-color",
    "text-decoration-style",
    "text-decoration-thickness",
    "text-underline-offset",
    "-webkit-font-smoothing",
    "placeholder-color",
    "caret-color",
    "accent-color",
    "color-scheme",
    "opacity",
    "background-blend-mode",
    "mix-blend-mode",
    "box-shadow",
    "--tw-shadow",
    "--tw-shadow-color",
    "--tw-ring-shadow",
    "--tw-ring-color",
    "--tw-inset-shadow",
    "--tw-inset-shadow-color",
    "--tw-inset-ring-shadow",
    "--tw-inset-ring-color",
    "--tw-ring-offset-width",
    "--tw-ring-offset-color",
    "outline",
    "outline-style",
    "outline-width",
    "outline-offset",
    "outline-color",
    "filter",
    "backdrop-filter",
    "transition-property",
    "transition-behavior",
    "transition-delay",
    "transition-duration",
    "transition-timing-function",
    "will-change",
    "contain",
    "content",
    "forced-color-adjust",
];

static PROPERTY_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    PROPERTY_ORDER
        .iter()
        .enumerate()
        .map(|(idx, property)| (*property, idx))
        .collect()
});

/// The sorted, distinct property-order indices used by a rule, plus its
/// total declaration count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertySort {
    pub order: Vec<usize>,
    pub count: usize,
}

impl PropertySort {
    pub fn of(nodes: &[AstNode]) -> Self {
        let mut order = Vec::new();
        let mut count = 0;
        let mut queue: std::collections::VecDeque<&AstNode> = nodes.iter().collect();

        while let Some(node) = queue.pop_front() {
            match node {
                AstNode::Declaration(d) => {
                    count += 1;
                    if let Some(&idx) = PROPERTY_INDEX.get(d.property.as_str()) {
                        if !order.contains(&idx) {
                            order.push(idx);
                        }
                    }
                }
                AstNode::Rule(r) => queue.extend(r.nodes.iter()),
                AstNode::AtRule(a) if a.name != "property" => queue.extend(a.nodes.iter()),
                AstNode::AtRule(_) => {}
                AstNode::Comment(_) => {}
            }
        }

        order.sort_unstable();
        Self { order, count }
    }

    /// Lowest differing property first, then more declarations first.
    pub fn compare(&self, other: &Self) -> Ordering {
        let offset = self
            .order
            .iter()
            .zip(&other.order)
            .take_while(|(a, z)| a == z)
            .count();
        let a = self.order.get(offset).copied().unwrap_or(usize::MAX);
        let z = other.order.get(offset).copied().unwrap_or(usize::MAX);
        a.cmp(&z).then_with(|| other.count.cmp(&self.count))
    }
}

/// Compares class names with digit runs compared as numbers. A leading
/// negative sign is ignored, and positive names sort before negative ones.
///
/// ```
/// use std::cmp::Ordering;
/// use wcss::sort::compare_candidates;
///
/// assert_eq!(compare_candidates("mt-2", "mt-10"), Ordering::Less);
/// assert_eq!(compare_candidates("mt-4", "-mt-4"), Ordering::Less);
/// assert_eq!(compare_candidates("-mt-4", "mt-[10px]"), Ordering::Less);
/// ```
pub fn compare_candidates(a: &str, z: &str) -> Ordering {
    let (a_unsigned, a_negative) = unsigned(a);
    let (z_unsigned, z_negative) = unsigned(z);
    natural(&a_unsigned, &z_unsigned).then(a_negative.cmp(&z_negative))
}

fn unsigned(raw: &str) -> (String, bool) {
    let base_len = classname::segment(raw, ':').last().map_or(0, |base| base.len());
    let start = raw.len() - base_len;
    let base = &raw[start..];
    let (bang, rest) = match base.strip_prefix('!') {
        Some(rest) => ("!", rest),
        None => ("", base),
    };
    match rest.strip_prefix('-') {
        Some(rest) => (format!("{}{bang}{rest}", &raw[..start]), true),
        None => (raw.to_string(), false),
    }
}

fn natural(a: &str, z: &str) -> Ordering {
    let a = a.as_bytes();
    let z = z.as_bytes();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < z.len() {
        if a[i].is_ascii_digit() && z[j].is_ascii_digit() {
            let a_end = i + a[i..].iter().take_while(|c| c.is_ascii_digit()).count();
            let z_end = j + z[j..].iter().take_while(|c| c.is_ascii_digit()).count();
            let a_num = &a[i..a_end];
            let z_num = &z[j..z_end];
            let a_trimmed = trim_zeros(a_num);
            let z_trimmed = trim_zeros(z_num);
            let ordering = a_trimmed
                .len()
                .cmp(&z_trimmed.len())
                .then_with(|| a_trimmed.cmp(z_trimmed))
                .then_with(|| a_num.cmp(z_num));
            if ordering != Ordering::Equal {
                return ordering;
            }
            i = a_end;
            j = z_end;
            continue;
        }
        if a[i] != z[j] {
            return a[i].cmp(&z[j]);
        }
        i += 1;
        j += 1;
    }

    (a.len() - i).cmp(&(z.len() - j))
}

fn trim_zeros(digits: &[u8]) -> &[u8] {
    let start = digits.iter().take_while(|c| **c == b'0').count();
    &digits[start.min(digits.len().saturating_sub(1))..]
}
