//! The legacy configuration tree.
//!
//! Plugins and config modules describe theme values as nested maps of
//! strings, where any value may instead be a function of the rest of the
//! theme. [`ConfigValue::Lazy`] holds such a function; the
//! [`LegacyTheme`](super::LegacyTheme) resolver evaluates it on first access.

use std::fmt;
use std::sync::Arc;

use super::legacy::BareValue;

/// Read access to the theme, handed to lazy config values.
pub trait ThemeLookup {
    /// Looks up a dotted path such as `colors.red.500` or `spacing`.
    fn theme(&self, path: &str) -> Option<ConfigValue>;
}

/// A config value computed from other theme values.
pub type ThemeFn = Arc<dyn Fn(&dyn ThemeLookup) -> ConfigValue + Send + Sync>;

/// A node of the configuration tree.
#[derive(Clone)]
pub enum ConfigValue {
    /// An explicit `null`. Distinct from a missing key.
    Null,
    Str(String),
    List(Vec<ConfigValue>),
    Map(ConfigMap),
    Lazy(ThemeFn),
}

impl ConfigValue {
    /// Wraps a closure as a lazy value.
    ///
    /// ```
    /// use wcss::theme::ConfigValue;
    ///
    /// let accent = ConfigValue::lazy(|theme| theme.theme("colors").unwrap_or(ConfigValue::Null));
    /// assert!(matches!(accent, ConfigValue::Lazy(_)));
    /// ```
    pub fn lazy(f: impl Fn(&dyn ThemeLookup) -> ConfigValue + Send + Sync + 'static) -> Self {
        ConfigValue::Lazy(Arc::new(f))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }
}

impl fmt::Debug for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => write!(f, "Null"),
            ConfigValue::Str(s) => write!(f, "{s:?}"),
            ConfigValue::List(items) => f.debug_list().entries(items).finish(),
            ConfigValue::Map(map) => map.fmt(f),
            ConfigValue::Lazy(_) => write!(f, "Lazy(..)"),
        }
    }
}

impl PartialEq for ConfigValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ConfigValue::Null, ConfigValue::Null) => true,
            (ConfigValue::Str(a), ConfigValue::Str(b)) => a == b,
            (ConfigValue::List(a), ConfigValue::List(b)) => a == b,
            (ConfigValue::Map(a), ConfigValue::Map(b)) => a == b,
            (ConfigValue::Lazy(a), ConfigValue::Lazy(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Str(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Str(s)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(map: ConfigMap) -> Self {
        ConfigValue::Map(map)
    }
}

/// An insertion-ordered string-keyed map.
///
/// Maps produced for bare-value-enabled legacy keys carry the [`BareValue`]
/// rule, and keep it when spread into another key's value.
#[derive(Clone, Default, PartialEq)]
pub struct ConfigMap {
    entries: Vec<(String, ConfigValue)>,
    pub bare: Option<BareValue>,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    ///
    /// ```
    /// use wcss::theme::ConfigMap;
    ///
    /// let map = ConfigMap::new().with("slow", "800ms").with("fast", "100ms");
    /// assert_eq!(map.get("slow").and_then(|v| v.as_str()), Some("800ms"));
    /// ```
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces `key`, keeping its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deep-merges `other` into `self`: nested maps merge, anything else is
    /// replaced. The bare-value rule is kept from either side.
    pub fn merge(&mut self, other: &ConfigMap) {
        for (key, value) in &other.entries {
            let merged = match (self.get(key), value) {
                (Some(ConfigValue::Map(existing)), ConfigValue::Map(incoming)) => {
                    let mut existing = existing.clone();
                    existing.merge(incoming);
                    ConfigValue::Map(existing)
                }
                _ => value.clone(),
            };
            self.insert(key.clone(), merged);
        }
        if self.bare.is_none() {
            self.bare = other.bare;
        }
    }

    /// Flattens nested maps into `parent-child` keys, with `DEFAULT` children
    /// taking the parent key: `{ red: { DEFAULT, 500 } }` → `red`, `red-500`.
    pub fn flatten(&self) -> Vec<(String, ConfigValue)> {
        let mut out = Vec::new();
        for (key, value) in &self.entries {
            match value {
                ConfigValue::Map(nested) => {
                    for (child, child_value) in nested.flatten() {
                        let flat = if child == "DEFAULT" {
                            key.clone()
                        } else {
                            format!("{key}-{child}")
                        };
                        out.push((flat, child_value));
                    }
                }
                _ => out.push((key.clone(), value.clone())),
            }
        }
        out
    }
}

impl fmt::Debug for ConfigMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ConfigMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
