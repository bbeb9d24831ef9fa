//! Legacy configuration and plugin support.
//!
//! Configs and plugins arrive through `@config` and `@plugin` directives.
//! They are applied in two steps:
//!
//! 1. Before the design system is built, every config's `theme` and
//!    `theme.extend` are layered into a [`LegacyTheme`], and the keys they
//!    define become `inline reference` tokens, so `colors.brand` makes
//!    `bg-brand` work and `screens.tablet` adds a `tablet:` breakpoint.
//! 2. Afterwards plugins run against the [`PluginApi`], in directive order.
//!
//! ## Submodules
//!
//! - [`config`]: `UserConfig`, `Plugin` and `DarkMode`
//! - [`css_object`]: CSS described as nested key/value objects
//! - [`plugin_api`]: `addUtilities`, `matchUtilities`, `addVariant`, …

pub mod config;
pub mod css_object;
pub mod plugin_api;

pub use config::{DarkMode, Plugin, PluginFactory, PluginFn, UserConfig};
pub use css_object::{CssObject, CssValue};
pub use plugin_api::{
    MatchUtilitiesOptions, MatchUtilityFn, MatchVariantFn, MatchVariantOptions, PluginApi,
    VariantBody, VariantSortFn, VariantSortValue,
};

use crate::ast::AstNode;
use crate::compiler::Glob;
use crate::design_system::DesignSystem;
use crate::error::Result;
use crate::theme::legacy::{kebab_case, namespaces_for};
use crate::theme::{ConfigValue, LegacyTheme, Theme, ThemeOptions};

/// A plugin or config loaded for one directive.
#[derive(Clone, Debug)]
pub(crate) struct LoadedSource {
    /// The id named in the directive.
    pub id: String,
    /// Directory the module was loaded from.
    pub base: String,
    pub kind: SourceKind,
}

#[derive(Clone, Debug)]
pub(crate) enum SourceKind {
    Plugin(Plugin),
    Config(UserConfig),
}

impl LoadedSource {
    /// The configs this source contributes, its own first.
    fn configs(&self) -> Vec<&UserConfig> {
        let mut configs = Vec::new();
        match &self.kind {
            SourceKind::Plugin(plugin) => configs.extend(plugin.config.as_ref()),
            SourceKind::Config(config) => {
                configs.push(config);
                configs.extend(config.plugins.iter().filter_map(|p| p.config.as_ref()));
            }
        }
        configs
    }

    fn plugins(&self) -> Vec<&Plugin> {
        match &self.kind {
            SourceKind::Plugin(plugin) => vec![plugin],
            SourceKind::Config(config) => config.plugins.iter().collect(),
        }
    }
}

/// Layers every config into a legacy theme and copies the keys they define
/// into `theme`.
pub(crate) fn build_legacy_theme(theme: &mut Theme, sources: &[LoadedSource]) -> LegacyTheme {
    let mut legacy = LegacyTheme::new(theme.clone());
    let mut keys: Vec<String> = Vec::new();

    for config in sources.iter().flat_map(LoadedSource::configs) {
        legacy.add_config(&config.theme, &config.extend);
        for key in config.theme.keys().chain(config.extend.keys()) {
            if key != "extend" && !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
    }

    for key in &keys {
        let Some(namespace) = namespaces_for(key).into_iter().next() else {
            continue;
        };
        match legacy.lookup(key) {
            Some(ConfigValue::Map(map)) => {
                for (flat, value) in map.flatten() {
                    let token = if flat == "DEFAULT" {
                        namespace.clone()
                    } else {
                        format!("{namespace}-{flat}")
                    };
                    add_config_token(theme, &token, &value);
                }
            }
            Some(value) => add_config_token(theme, &namespace, &value),
            None => {}
        }
    }

    if !keys.is_empty() {
        log::debug!("applied {} legacy theme keys", keys.len());
    }
    legacy
}

/// CSS-declared tokens always win over config values.
fn add_config_token(theme: &mut Theme, token: &str, value: &ConfigValue) {
    if theme.contains(token) {
        return;
    }
    let options = ThemeOptions::INLINE | ThemeOptions::REFERENCE;

    match value {
        ConfigValue::Str(value) => theme.add(token, value, options),
        ConfigValue::List(items) => match items.as_slice() {
            // fontSize: [size, { lineHeight, letterSpacing }] or [size, lineHeight]
            [ConfigValue::Str(size), ConfigValue::Map(extra)] => {
                theme.add(token, size, options);
                for (key, value) in extra.iter() {
                    if let Some(value) = value.as_str() {
                        theme.add(&format!("{token}--{}", kebab_case(key)), value, options);
                    }
                }
            }
            [ConfigValue::Str(size), ConfigValue::Str(line_height)] if !token.starts_with("--font") => {
                theme.add(token, size, options);
                theme.add(&format!("{token}--line-height"), line_height, options);
            }
            items => {
                let parts: Vec<&str> = items.iter().filter_map(ConfigValue::as_str).collect();
                if !parts.is_empty() {
                    theme.add(token, &parts.join(", "), options);
                }
            }
        },
        _ => {}
    }
}

/// Runs plugins, registers dark mode and collects `content` globs. Returns
/// the `addBase` output of each source.
pub(crate) fn register(
    ds: &mut DesignSystem,
    legacy: &LegacyTheme,
    sources: &[LoadedSource],
    globs: &mut Vec<Glob>,
) -> Result<Vec<Vec<AstNode>>> {
    let mut bases = Vec::with_capacity(sources.len());

    for source in sources {
        let mut base = Vec::new();
        for plugin in source.plugins() {
            let mut api = PluginApi::new(ds, legacy, &mut base, &source.id);
            (plugin.handler)(&mut api)?;
        }
        log::debug!("ran plugins from `{}`", source.id);
        bases.push(base);

        for config in source.configs() {
            globs.extend(config.content.iter().map(|pattern| Glob {
                origin: source.base.clone(),
                pattern: pattern.clone(),
            }));
        }
    }

    let dark_mode = sources
        .iter()
        .flat_map(LoadedSource::configs)
        .filter_map(|config| config.dark_mode.as_ref())
        .last();
    if let Some(mode) = dark_mode {
        register_dark_mode(ds, mode);
    }

    if legacy.take_error().is_some() {
        log::warn!("plugins referenced a circular theme value; it resolved to nothing");
    }
    Ok(bases)
}

fn register_dark_mode(ds: &mut DesignSystem, mode: &DarkMode) {
    match mode {
        DarkMode::Media => {}
        DarkMode::Selector(selector) => {
            let selector = selector.as_deref().unwrap_or(".dark");
            let template = format!("&:where({selector}, {selector} *)");
            ds.variants.static_selectors("dark", &[template.as_str()]);
        }
        DarkMode::Variant(templates) => {
            let template = templates
                .iter()
                .map(|t| plugin_api::parse_template(t))
                .collect();
            ds.variants.from_ast("dark", template);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ConfigMap;

    fn config_source(config: UserConfig) -> LoadedSource {
        LoadedSource {
            id: "./tailwind.config.js".into(),
            base: "/project".into(),
            kind: SourceKind::Config(config),
        }
    }

    #[test]
    fn test_config_keys_become_reference_tokens() {
        let mut theme = Theme::new();
        theme.add("--color-brand", "purple", ThemeOptions::NONE);
        let config = UserConfig::new().extend(
            ConfigMap::new()
                .with(
                    "colors",
                    ConfigMap::new()
                        .with("brand", "red")
                        .with("ocean", ConfigMap::new().with("DEFAULT", "#0af").with("deep", "#036")),
                )
                .with(
                    "fontSize",
                    ConfigMap::new().with(
                        "huge",
                        ConfigValue::List(vec!["5rem".into(), ConfigMap::new().with("lineHeight", "1").into()]),
                    ),
                ),
        );
        build_legacy_theme(&mut theme, &[config_source(config)]);

        assert_eq!(theme.get("--color-brand").map(|e| e.value.as_str()), Some("purple"));
        assert_eq!(theme.get("--color-ocean").map(|e| e.value.as_str()), Some("#0af"));
        assert_eq!(theme.get("--color-ocean-deep").map(|e| e.value.as_str()), Some("#036"));
        assert_eq!(theme.get("--text-huge--line-height").map(|e| e.value.as_str()), Some("1"));
        let options = theme.get("--text-huge").map(|e| e.options);
        assert_eq!(options, Some(ThemeOptions::INLINE | ThemeOptions::REFERENCE));
    }

    #[test]
    fn test_selector_dark_mode() {
        let mut ds = DesignSystem::new(Theme::new());
        let legacy = LegacyTheme::new(Theme::new());
        let mut globs = Vec::new();
        let sources = [config_source(
            UserConfig::new()
                .dark_mode(DarkMode::Selector(None))
                .content("./src/**/*.html"),
        )];
        register(&mut ds, &legacy, &sources, &mut globs).unwrap();

        assert_eq!(
            globs,
            vec![Glob {
                origin: "/project".into(),
                pattern: "./src/**/*.html".into(),
            }]
        );
        let mut node = crate::ast::rule("&", vec![crate::ast::decl("color", "white")]);
        let dark = ds.parse_variant("dark").unwrap();
        ds.variants.apply(&mut node, &dark, 0).unwrap();
        assert_eq!(
            node,
            crate::ast::rule(
                "&",
                vec![crate::ast::rule(
                    "&:where(.dark, .dark *)",
                    vec![crate::ast::decl("color", "white")]
                )]
            )
        );
    }
}
