//! CSS written as nested key/value objects, the shape plugins hand to
//! `addUtilities`, `addBase` and `matchUtilities`.
//!
//! ```
//! use wcss::compat::CssObject;
//! use wcss::ast::{decl, rule};
//!
//! let object = CssObject::new()
//!     .with("WebkitLineClamp", "3")
//!     .with("&:hover", CssObject::new().with("color", "red"));
//! assert_eq!(
//!     object.to_ast(),
//!     vec![
//!         decl("-webkit-line-clamp", "3"),
//!         rule("&:hover", vec![decl("color", "red")]),
//!     ]
//! );
//! ```

use crate::ast::{AstNode, decl, rule, statement};
use crate::theme::legacy::kebab_case;

/// A value in a [`CssObject`].
#[derive(Clone, Debug, PartialEq)]
pub enum CssValue {
    /// Skipped entirely.
    Null,
    Str(String),
    /// Emits one declaration, or one nested rule, per item.
    List(Vec<CssValue>),
    Object(CssObject),
}

/// An ordered CSS object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CssObject {
    entries: Vec<(String, CssValue)>,
}

impl CssObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<CssValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Appends an entry. Keys may repeat.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CssValue>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CssValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts the object to CSS nodes.
    ///
    /// - camelCase properties become kebab-case; custom properties are kept
    /// - `"@slot"` as the value of a selector key becomes a slot rule
    /// - `@`-prefixed keys with string values become block-less at-rules
    /// - nested objects become nested rules or at-rules
    pub fn to_ast(&self) -> Vec<AstNode> {
        let mut nodes = Vec::new();
        for (key, value) in &self.entries {
            push_entry(key, value, &mut nodes);
        }
        nodes
    }
}

fn push_entry(key: &str, value: &CssValue, nodes: &mut Vec<AstNode>) {
    match value {
        CssValue::Null => {}
        CssValue::Str(value) => {
            if !key.starts_with("--") && value == "@slot" {
                nodes.push(rule(key, vec![statement("slot", "")]));
            } else if let Some(name) = key.strip_prefix('@') {
                nodes.push(statement(name, value.as_str()));
            } else {
                nodes.push(decl(property_name(key), value.as_str()));
            }
        }
        CssValue::List(items) => {
            for item in items {
                push_entry(key, item, nodes);
            }
        }
        CssValue::Object(object) => nodes.push(rule(key, object.to_ast())),
    }
}

fn property_name(key: &str) -> String {
    if key.starts_with("--") {
        key.to_string()
    } else {
        kebab_case(key)
    }
}

impl From<&str> for CssValue {
    fn from(value: &str) -> Self {
        CssValue::Str(value.to_string())
    }
}

impl From<String> for CssValue {
    fn from(value: String) -> Self {
        CssValue::Str(value)
    }
}

impl From<CssObject> for CssValue {
    fn from(value: CssObject) -> Self {
        CssValue::Object(value)
    }
}

impl<T: Into<CssValue>> From<Vec<T>> for CssValue {
    fn from(values: Vec<T>) -> Self {
        CssValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<CssValue>> From<Option<T>> for CssValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CssValue::Null, Into::into)
    }
}

impl<K: Into<String>, V: Into<CssValue>> FromIterator<(K, V)> for CssObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::at_rule;

    #[test]
    fn test_fallback_lists_repeat_declarations() {
        let object = CssObject::new().with("display", vec!["-webkit-box", "flex"]);
        assert_eq!(
            object.to_ast(),
            vec![decl("display", "-webkit-box"), decl("display", "flex")]
        );
    }

    #[test]
    fn test_custom_properties_keep_case() {
        let object = CssObject::new().with("--tw-myValue", "1");
        assert_eq!(object.to_ast(), vec![decl("--tw-myValue", "1")]);
    }

    #[test]
    fn test_slots_and_at_rules() {
        let object = CssObject::new()
            .with("&:hover", "@slot")
            .with("@apply", "flex")
            .with("@media (min-width: 10px)", CssObject::new().with("color", "red"));
        assert_eq!(
            object.to_ast(),
            vec![
                rule("&:hover", vec![statement("slot", "")]),
                statement("apply", "flex"),
                at_rule("media", "(min-width: 10px)", vec![decl("color", "red")]),
            ]
        );
    }

    #[test]
    fn test_null_values_are_skipped() {
        let object = CssObject::new().with("color", None::<&str>).with("opacity", "1");
        assert_eq!(object.to_ast(), vec![decl("opacity", "1")]);
    }
}
