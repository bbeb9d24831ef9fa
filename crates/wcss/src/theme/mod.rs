//! Design tokens declared in `@theme` blocks.
//!
//! Tokens are custom properties grouped into namespaces by prefix:
//! `--color-red-500` lives in the `--color` namespace under the key `red-500`.
//! Utilities resolve bare candidate values by probing their namespaces in
//! order, so `bg-red-500` tries `--background-color-red-500` and then
//! `--color-red-500`.
//!
//! ## Submodules
//!
//! - [`config`]: the legacy configuration tree (`ConfigValue`)
//! - [`legacy`]: legacy key aliases and bare-value formats
//! - [`resolver`]: dotted-path `theme()` lookups over tokens and configuration

pub mod config;
pub mod legacy;
pub mod resolver;

use std::collections::HashMap;

use bitflags::bitflags;

use crate::ast::AstNode;

pub use config::{ConfigMap, ConfigValue, ThemeFn, ThemeLookup};
pub use legacy::BareValue;
pub use resolver::{LegacyTheme, ResolvedTheme};

bitflags! {
    /// How a token was declared: `@theme reference inline { … }`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ThemeOptions: u8 {
        const NONE = 0;
        /// Utilities use the raw value instead of `var(--token, value)`.
        const INLINE = 1 << 0;
        /// Usable by utilities but never emitted to `:root`.
        const REFERENCE = 1 << 1;
        /// Overridable by any later non-default declaration.
        const DEFAULT = 1 << 2;
    }
}

impl ThemeOptions {
    /// Parses the parameters of an `@theme` at-rule.
    pub fn from_params(params: &str) -> Self {
        let mut options = ThemeOptions::NONE;
        for word in params.split_whitespace() {
            match word {
                "inline" => options |= ThemeOptions::INLINE,
                "reference" => options |= ThemeOptions::REFERENCE,
                "default" => options |= ThemeOptions::DEFAULT,
                _ => {}
            }
        }
        options
    }
}

/// One declared token.
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeEntry {
    pub value: String,
    pub options: ThemeOptions,
}

/// The token store.
#[derive(Clone, Debug, Default)]
pub struct Theme {
    entries: Vec<(String, ThemeEntry)>,
    index: HashMap<String, usize>,
    keyframes: Vec<AstNode>,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a token. `--namespace-*: initial` clears a namespace and
    /// `--*: initial` clears everything.
    ///
    /// # Examples
    ///
    /// ```
    /// use wcss::theme::{Theme, ThemeOptions};
    ///
    /// let mut theme = Theme::new();
    /// theme.add("--color-red-500", "#ef4444", ThemeOptions::NONE);
    /// theme.add("--color-*", "initial", ThemeOptions::NONE);
    /// assert!(theme.get("--color-red-500").is_none());
    /// ```
    pub fn add(&mut self, key: &str, value: &str, options: ThemeOptions) {
        let key = normalize_key(key);

        if value.trim() == "initial" {
            if key == "--*" {
                self.clear();
                return;
            }
            if let Some(namespace) = key.strip_suffix("-*") {
                self.clear_namespace(namespace);
                return;
            }
            self.remove(&key);
            return;
        }

        let entry = ThemeEntry {
            value: value.trim().to_string(),
            options,
        };

        match self.index.get(&key) {
            Some(&idx) => {
                let existing = &self.entries[idx].1;
                if options.contains(ThemeOptions::DEFAULT)
                    && !existing.options.contains(ThemeOptions::DEFAULT)
                {
                    return;
                }
                self.entries[idx].1 = entry;
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, entry));
            }
        }
    }

    pub fn add_keyframes(&mut self, keyframes: AstNode) {
        self.keyframes.push(keyframes);
    }

    pub fn keyframes(&self) -> &[AstNode] {
        &self.keyframes
    }

    pub fn get(&self, key: &str) -> Option<&ThemeEntry> {
        self.index
            .get(&normalize_key(key))
            .map(|&idx| &self.entries[idx].1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(&normalize_key(key))
    }

    /// All tokens in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ThemeEntry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    /// Keys directly inside `namespace`, in declaration order. The bare
    /// namespace token itself is reported as `None`. Nested sub-properties
    /// such as `--text-xl--line-height` are skipped.
    pub fn namespace(&self, namespace: &str) -> Vec<(Option<&str>, &ThemeEntry)> {
        let prefix = format!("{namespace}-");
        self.entries
            .iter()
            .filter_map(|(key, entry)| {
                if key == namespace {
                    return Some((None, entry));
                }
                let suffix = key.strip_prefix(&prefix)?;
                if suffix.is_empty() || suffix.contains("--") {
                    return None;
                }
                Some((Some(suffix), entry))
            })
            .collect()
    }

    /// Finds the token key for a candidate value in the first namespace that
    /// has it. `None` looks up the bare namespace token.
    pub fn resolve_key(&self, value: Option<&str>, namespaces: &[&str]) -> Option<String> {
        namespaces.iter().find_map(|namespace| {
            let key = match value {
                Some(value) => format!("{namespace}-{}", value.replace('.', "_")),
                None => namespace.to_string(),
            };
            self.index.contains_key(&key).then_some(key)
        })
    }

    /// Resolves a candidate value to `var(--token, value)`, or to the raw
    /// value for `inline` tokens.
    ///
    /// ```
    /// use wcss::theme::{Theme, ThemeOptions};
    ///
    /// let mut theme = Theme::new();
    /// theme.add("--spacing-4", "1rem", ThemeOptions::NONE);
    /// assert_eq!(
    ///     theme.resolve(Some("4"), &["--spacing"]).as_deref(),
    ///     Some("var(--spacing-4, 1rem)")
    /// );
    /// ```
    pub fn resolve(&self, value: Option<&str>, namespaces: &[&str]) -> Option<String> {
        let key = self.resolve_key(value, namespaces)?;
        let entry = self.get(&key)?;
        Some(self.reference(&key, entry))
    }

    /// Resolves a candidate value to the token's raw value.
    pub fn resolve_value(&self, value: Option<&str>, namespaces: &[&str]) -> Option<String> {
        let key = self.resolve_key(value, namespaces)?;
        self.get(&key).map(|entry| entry.value.clone())
    }

    /// Resolves a token plus its nested sub-properties, e.g. `--text-xl` with
    /// `--text-xl--line-height`.
    pub fn resolve_with(
        &self,
        value: Option<&str>,
        namespaces: &[&str],
        nested: &[&str],
    ) -> Option<(String, Vec<(String, String)>)> {
        let key = self.resolve_key(value, namespaces)?;
        let entry = self.get(&key)?;
        let extra = nested
            .iter()
            .filter_map(|suffix| {
                let nested_key = format!("{key}{suffix}");
                self.get(&nested_key)
                    .map(|nested_entry| (suffix.to_string(), self.reference(&nested_key, nested_entry)))
            })
            .collect();
        Some((self.reference(&key, entry), extra))
    }

    fn reference(&self, key: &str, entry: &ThemeEntry) -> String {
        if entry.options.contains(ThemeOptions::INLINE) {
            entry.value.clone()
        } else {
            format!("var({key}, {})", entry.value)
        }
    }

    /// Tokens that belong in the `:root` rule.
    pub fn emitted(&self) -> impl Iterator<Item = (&str, &ThemeEntry)> {
        self.entries()
            .filter(|(_, entry)| !entry.options.contains(ThemeOptions::REFERENCE))
    }

    fn remove(&mut self, key: &str) {
        self.entries.retain(|(k, _)| k != key);
        self.reindex();
    }

    fn clear_namespace(&mut self, namespace: &str) {
        let prefix = format!("{namespace}-");
        self.entries
            .retain(|(k, _)| k != namespace && !k.starts_with(&prefix));
        self.reindex();
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(idx, (key, _))| (key.clone(), idx))
            .collect();
    }
}

/// `--spacing-1\.5` and `--spacing-1.5` are both stored as `--spacing-1_5`.
fn normalize_key(key: &str) -> String {
    key.trim().replace("\\.", ".").replace('.', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tokens_do_not_override() {
        let mut theme = Theme::new();
        theme.add("--color-red", "red", ThemeOptions::NONE);
        theme.add("--color-red", "crimson", ThemeOptions::DEFAULT);
        assert_eq!(theme.get("--color-red").map(|e| e.value.as_str()), Some("red"));

        theme.add("--color-blue", "navy", ThemeOptions::DEFAULT);
        theme.add("--color-blue", "blue", ThemeOptions::NONE);
        assert_eq!(theme.get("--color-blue").map(|e| e.value.as_str()), Some("blue"));
    }

    #[test]
    fn test_namespace_search_order() {
        let mut theme = Theme::new();
        theme.add("--color-red-500", "#ef4444", ThemeOptions::NONE);
        theme.add("--background-color-red-500", "pink", ThemeOptions::INLINE);
        assert_eq!(
            theme.resolve(Some("red-500"), &["--background-color", "--color"]),
            Some("pink".into())
        );
        assert_eq!(
            theme.resolve(Some("red-500"), &["--color"]),
            Some("var(--color-red-500, #ef4444)".into())
        );
    }

    #[test]
    fn test_dotted_keys() {
        let mut theme = Theme::new();
        theme.add(r"--spacing-1\.5", "0.375rem", ThemeOptions::NONE);
        assert_eq!(
            theme.resolve_value(Some("1.5"), &["--spacing"]),
            Some("0.375rem".into())
        );
    }

    #[test]
    fn test_namespace_skips_nested_keys() {
        let mut theme = Theme::new();
        theme.add("--text", "1rem", ThemeOptions::NONE);
        theme.add("--text-xl", "1.25rem", ThemeOptions::NONE);
        theme.add("--text-xl--line-height", "1.75rem", ThemeOptions::NONE);
        let keys: Vec<_> = theme.namespace("--text").into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![None, Some("xl")]);

        let (size, nested) = theme
            .resolve_with(Some("xl"), &["--text"], &["--line-height"])
            .unwrap();
        assert_eq!(size, "var(--text-xl, 1.25rem)");
        assert_eq!(
            nested,
            vec![("--line-height".to_string(), "var(--text-xl--line-height, 1.75rem)".to_string())]
        );
    }
}
