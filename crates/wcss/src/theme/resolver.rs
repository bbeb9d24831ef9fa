//! Dotted-path theme lookups for plugins and the `theme()` CSS function.
//!
//! The resolver merges three sources, highest precedence first:
//!
//! 1. Tokens declared in CSS (`@theme { --color-red-500: … }`)
//! 2. `theme.extend` sections of loaded configs, deep-merged in load order
//! 3. `theme` sections of loaded configs, over a built-in compat default
//!
//! Values may be lazy functions of other theme values. Each top-level key is
//! computed on first access and memoized; a key that (transitively) depends
//! on itself is reported as [`WcssError::CircularTheme`] instead of recursing
//! forever.
//!
//! Once compilation is done the resolver is [frozen](LegacyTheme::freeze)
//! into a [`ResolvedTheme`]: every key evaluated up front, nothing left to
//! memoize, so builds can read it concurrently.

use std::cell::RefCell;
use std::collections::HashMap;

use classname::segment;

use super::Theme;
use super::config::{ConfigMap, ConfigValue, ThemeLookup};
use super::legacy::{BARE_VALUES, COLOR_KEYS, namespaces_for};
use crate::error::WcssError;
use crate::value::color::with_alpha;

/// The legacy theme view used while plugins run.
pub struct LegacyTheme {
    tokens: Theme,
    keys: Vec<String>,
    base: HashMap<String, ConfigValue>,
    extend: HashMap<String, Vec<ConfigValue>>,
    cache: RefCell<HashMap<String, Option<ConfigValue>>>,
    resolving: RefCell<Vec<String>>,
    error: RefCell<Option<WcssError>>,
}

impl LegacyTheme {
    /// Creates a resolver over `tokens` seeded with the compat defaults.
    pub fn new(tokens: Theme) -> Self {
        let mut theme = Self {
            tokens,
            keys: Vec::new(),
            base: HashMap::new(),
            extend: HashMap::new(),
            cache: RefCell::new(HashMap::new()),
            resolving: RefCell::new(Vec::new()),
            error: RefCell::new(None),
        };

        theme.set_base("colors", ConfigValue::Map(ConfigMap::new()));
        for key in COLOR_KEYS {
            theme.set_base(
                key,
                ConfigValue::lazy(|t| t.theme("colors").unwrap_or(ConfigValue::Null)),
            );
        }
        for (key, bare) in BARE_VALUES.entries() {
            let mut map = ConfigMap::new();
            map.bare = Some(*bare);
            theme.set_base(key, ConfigValue::Map(map));
        }

        theme
    }

    fn set_base(&mut self, key: &str, value: ConfigValue) {
        if !self.keys.iter().any(|k| k == key) {
            self.keys.push(key.to_string());
        }
        self.base.insert(key.to_string(), value);
    }

    /// Layers a config's `theme` and `theme.extend` sections on top.
    pub fn add_config(&mut self, theme: &ConfigMap, extend: &ConfigMap) {
        for (key, value) in theme.iter() {
            if key == "extend" {
                continue;
            }
            self.set_base(key, value.clone());
        }
        for (key, value) in extend.iter() {
            if !self.keys.iter().any(|k| k == key) {
                self.keys.push(key.to_string());
            }
            self.extend
                .entry(key.to_string())
                .or_default()
                .push(value.clone());
        }
        self.cache.borrow_mut().clear();
    }

    pub fn tokens(&self) -> &Theme {
        &self.tokens
    }

    /// Returns the first error recorded during lookups, if any.
    pub fn take_error(&self) -> Option<WcssError> {
        self.error.borrow_mut().take()
    }

    /// Looks up `path`, optionally followed by an opacity: `colors.red.500 / 50%`.
    pub fn lookup(&self, path: &str) -> Option<ConfigValue> {
        self.lookup_path(path)
    }

    /// Like [`lookup`](Self::lookup) with a fallback for missing paths.
    pub fn lookup_or(&self, path: &str, default: Option<ConfigValue>) -> Option<ConfigValue> {
        self.lookup(path).or(default)
    }

    /// Evaluates every key into an immutable [`ResolvedTheme`]. Cycles found
    /// here are logged; the keys involved resolve to nothing.
    pub fn freeze(&self) -> ResolvedTheme {
        let values = self
            .keys
            .iter()
            .filter_map(|key| Some((key.clone(), self.resolve_key(key)?)))
            .collect();
        if let Some(error) = self.take_error() {
            log::warn!("{error}");
        }
        ResolvedTheme {
            tokens: self.tokens.clone(),
            values,
        }
    }

    /// Evaluates lazy values, recursively.
    fn realize(&self, value: &ConfigValue) -> ConfigValue {
        match value {
            ConfigValue::Lazy(f) => {
                let computed = f(self);
                self.realize(&computed)
            }
            ConfigValue::Map(map) => {
                let mut out: ConfigMap = map
                    .iter()
                    .map(|(k, v)| (k.to_string(), self.realize(v)))
                    .collect();
                out.bare = map.bare;
                ConfigValue::Map(out)
            }
            ConfigValue::List(items) => {
                ConfigValue::List(items.iter().map(|v| self.realize(v)).collect())
            }
            other => other.clone(),
        }
    }

    /// Every top-level key known to the configuration, in first-seen order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

/// A frozen legacy theme: CSS tokens plus every configuration key, fully
/// evaluated.
#[derive(Clone, Default)]
pub struct ResolvedTheme {
    tokens: Theme,
    values: HashMap<String, ConfigValue>,
}

impl ResolvedTheme {
    pub fn lookup(&self, path: &str) -> Option<ConfigValue> {
        self.lookup_path(path)
    }
}

impl ThemeLookup for ResolvedTheme {
    fn theme(&self, path: &str) -> Option<ConfigValue> {
        self.lookup(path)
    }
}

impl KeyedLookup for ResolvedTheme {
    fn css_tokens(&self) -> &Theme {
        &self.tokens
    }

    fn resolve_key(&self, key: &str) -> Option<ConfigValue> {
        self.values.get(key).cloned()
    }
}

/// Path lookup over CSS tokens and top-level configuration keys.
trait KeyedLookup {
    fn css_tokens(&self) -> &Theme;

    fn resolve_key(&self, key: &str) -> Option<ConfigValue>;

    fn lookup_path(&self, path: &str) -> Option<ConfigValue> {
        let path = path.trim();
        if let Some(value) = self.lookup_segments(&to_key_path(path)) {
            return Some(value);
        }

        let parts = segment(path, '/');
        if parts.len() < 2 {
            return None;
        }
        let alpha = parts[parts.len() - 1].trim();
        let base = path[..path.len() - parts[parts.len() - 1].len() - 1].trim();
        let color = self.lookup_segments(&to_key_path(base))?;
        let color = color.as_str()?;
        Some(ConfigValue::Str(with_alpha(color, alpha)))
    }

    fn lookup_segments(&self, segments: &[String]) -> Option<ConfigValue> {
        let (key, rest) = segments.split_first()?;

        if let Some(value) = self.lookup_tokens(key, rest) {
            return Some(value);
        }

        let mut value = self.resolve_key(key)?;
        for (i, segment) in rest.iter().enumerate() {
            let ConfigValue::Map(map) = &value else {
                return None;
            };
            value = match map.get(segment) {
                Some(next) => next.clone(),
                None => {
                    let joined = rest[i..].join("-");
                    return map
                        .get(&joined)
                        .cloned()
                        .or_else(|| {
                            map.flatten()
                                .into_iter()
                                .find(|(k, _)| *k == joined)
                                .map(|(_, v)| v)
                        });
                }
            };
        }
        Some(value)
    }

    /// CSS tokens for `key.rest…`. A token with the exact key wins, then any
    /// tokens nested under it.
    fn lookup_tokens(&self, key: &str, rest: &[String]) -> Option<ConfigValue> {
        let namespaces = namespaces_for(key);

        if rest.is_empty() {
            let mut css = ConfigMap::new();
            for namespace in namespaces.iter().rev() {
                for (suffix, entry) in self.css_tokens().namespace(namespace) {
                    css.insert(suffix.unwrap_or("DEFAULT"), entry.value.as_str());
                }
            }
            if css.is_empty() {
                return None;
            }
            let mut merged = match self.resolve_key(key) {
                Some(ConfigValue::Map(legacy)) => legacy,
                _ => ConfigMap::new(),
            };
            merged.merge(&css);
            if let Some(bare) = BARE_VALUES.get(key) {
                merged.bare = Some(*bare);
            }
            return Some(ConfigValue::Map(merged));
        }

        let explicit_default = rest.last().is_some_and(|s| s == "DEFAULT");
        let path: Vec<&str> = rest
            .iter()
            .map(String::as_str)
            .filter(|s| *s != "DEFAULT")
            .collect();
        let joined = path.join("-").replace('.', "_");

        for namespace in &namespaces {
            let token = if joined.is_empty() {
                namespace.clone()
            } else {
                format!("{namespace}-{joined}")
            };
            if let Some(entry) = self.css_tokens().get(&token) {
                return Some(ConfigValue::Str(entry.value.clone()));
            }
            if explicit_default {
                continue;
            }

            let prefix = format!("{token}-");
            let nested: ConfigMap = self
                .css_tokens()
                .entries()
                .filter_map(|(k, entry)| {
                    let suffix = k.strip_prefix(&prefix)?;
                    (!suffix.is_empty() && !suffix.contains("--"))
                        .then(|| (suffix.to_string(), entry.value.clone()))
                })
                .collect();
            if !nested.is_empty() {
                return Some(ConfigValue::Map(nested));
            }
        }

        None
    }
}

impl KeyedLookup for LegacyTheme {
    fn css_tokens(&self) -> &Theme {
        &self.tokens
    }

    /// Resolves a top-level key through base and extend layers, memoized.
    fn resolve_key(&self, key: &str) -> Option<ConfigValue> {
        if let Some(cached) = self.cache.borrow().get(key) {
            return cached.clone();
        }

        if self.resolving.borrow().iter().any(|k| k == key) {
            log::warn!("circular theme reference while resolving `{key}`");
            let mut error = self.error.borrow_mut();
            if error.is_none() {
                *error = Some(WcssError::CircularTheme {
                    path: key.to_string(),
                });
            }
            return None;
        }

        self.resolving.borrow_mut().push(key.to_string());

        let mut result = self.base.get(key).map(|value| self.realize(value));
        if let Some(layers) = self.extend.get(key) {
            for layer in layers {
                let layer = self.realize(layer);
                result = Some(match (result, layer) {
                    (Some(ConfigValue::Map(mut base)), ConfigValue::Map(extension)) => {
                        base.merge(&extension);
                        ConfigValue::Map(base)
                    }
                    (_, layer) => layer,
                });
            }
        }

        if let (Some(ConfigValue::Map(map)), Some(bare)) = (result.as_mut(), BARE_VALUES.get(key)) {
            map.bare.get_or_insert(*bare);
        }

        self.resolving.borrow_mut().pop();
        self.cache
            .borrow_mut()
            .insert(key.to_string(), result.clone());
        result
    }
}

impl ThemeLookup for LegacyTheme {
    fn theme(&self, path: &str) -> Option<ConfigValue> {
        self.lookup(path)
    }
}

/// Splits `colors.red.500` or `spacing[1.5]` into path segments.
fn to_key_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '.' => segments.push(std::mem::take(&mut current)),
            '[' => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                let inner: String = chars.by_ref().take_while(|c| *c != ']').collect();
                segments.push(inner);
                if chars.clone().next() == Some('.') {
                    chars.next();
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments.retain(|s| !s.is_empty());
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeOptions;

    fn tokens(entries: &[(&str, &str)]) -> Theme {
        let mut theme = Theme::new();
        for (k, v) in entries {
            theme.add(k, v, ThemeOptions::NONE);
        }
        theme
    }

    #[test]
    fn test_key_paths() {
        assert_eq!(to_key_path("colors.red.500"), vec!["colors", "red", "500"]);
        assert_eq!(to_key_path("spacing[1.5]"), vec!["spacing", "1.5"]);
        assert_eq!(to_key_path("a[b].c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_css_tokens_win_over_config() {
        let mut theme = LegacyTheme::new(tokens(&[("--color-red-500", "#ef4444")]));
        theme.add_config(
            &ConfigMap::new().with("colors", ConfigMap::new().with("red-500", "crimson")),
            &ConfigMap::new(),
        );
        assert_eq!(theme.lookup("colors.red.500"), Some("#ef4444".into()));
        assert_eq!(theme.lookup("backgroundColor.red.500"), Some("#ef4444".into()));
    }

    #[test]
    fn test_default_of_suffixed_namespace_is_missing() {
        let theme = LegacyTheme::new(tokens(&[
            ("--transition-timing-function-in", "cubic-bezier(0.4, 0, 1, 1)"),
            ("--transition-timing-function-out", "cubic-bezier(0, 0, 0.2, 1)"),
        ]));
        assert_eq!(theme.lookup("transitionTimingFunction.DEFAULT"), None);
        assert_eq!(
            theme.lookup_or("transitionTimingFunction.DEFAULT", Some("ease".into())),
            Some("ease".into())
        );
    }

    #[test]
    fn test_opacity_suffix() {
        let theme = LegacyTheme::new(tokens(&[("--color-red-500", "#ef4444")]));
        assert_eq!(
            theme.lookup("colors.red.500 / 50%"),
            Some("color-mix(in srgb, #ef4444 50%, transparent)".into())
        );
        assert_eq!(
            theme.lookup("colors.red.500 / var(--opacity)"),
            Some("color-mix(in srgb, #ef4444 calc(var(--opacity) * 100%), transparent)".into())
        );
    }

    #[test]
    fn test_lazy_values_resolve_in_any_order() {
        let mut theme = LegacyTheme::new(Theme::new());
        theme.add_config(
            &ConfigMap::new(),
            &ConfigMap::new()
                .with(
                    "animationDelay",
                    ConfigValue::lazy(|t| t.theme("animationDuration").unwrap_or(ConfigValue::Null)),
                )
                .with(
                    "animationDuration",
                    ConfigValue::lazy(|t| t.theme("transitionDuration").unwrap_or(ConfigValue::Null)),
                )
                .with("transitionDuration", ConfigMap::new().with("slow", "800ms")),
        );

        let delay = theme.lookup("animationDelay").unwrap();
        let map = delay.as_map().unwrap();
        assert_eq!(map.get("slow"), Some(&"800ms".into()));
        assert!(map.bare.is_some());
    }

    #[test]
    fn test_frozen_theme_answers_like_the_resolver() {
        let mut theme = LegacyTheme::new(tokens(&[("--color-red-500", "#ef4444")]));
        theme.add_config(
            &ConfigMap::new().with("spacing", ConfigMap::new().with("gutter", "2rem")),
            &ConfigMap::new().with(
                "inset",
                ConfigValue::lazy(|t| t.theme("spacing").unwrap_or(ConfigValue::Null)),
            ),
        );
        let frozen = theme.freeze();

        for path in [
            "colors.red.500",
            "colors.red.500 / 50%",
            "spacing.gutter",
            "inset.gutter",
            "spacing.missing",
        ] {
            assert_eq!(frozen.lookup(path), theme.lookup(path), "{path}");
        }
        assert_eq!(frozen.lookup("inset.gutter"), Some("2rem".into()));
    }

    #[test]
    fn test_freeze_drops_cyclic_keys() {
        let mut theme = LegacyTheme::new(Theme::new());
        theme.add_config(
            &ConfigMap::new()
                .with("a", ConfigValue::lazy(|t| t.theme("b").unwrap_or(ConfigValue::Null)))
                .with("b", ConfigValue::lazy(|t| t.theme("a").unwrap_or(ConfigValue::Null)))
                .with("c", "1"),
            &ConfigMap::new(),
        );
        let frozen = theme.freeze();
        assert_eq!(frozen.lookup("c"), Some("1".into()));
        assert!(theme.take_error().is_none());
    }

    #[test]
    fn test_cycles_are_reported() {
        let mut theme = LegacyTheme::new(Theme::new());
        theme.add_config(
            &ConfigMap::new()
                .with("a", ConfigValue::lazy(|t| t.theme("b").unwrap_or(ConfigValue::Null)))
                .with("b", ConfigValue::lazy(|t| t.theme("a").unwrap_or(ConfigValue::Null))),
            &ConfigMap::new(),
        );
        let _ = theme.lookup("a");
        assert!(matches!(theme.take_error(), Some(WcssError::CircularTheme { .. })));
    }
}
