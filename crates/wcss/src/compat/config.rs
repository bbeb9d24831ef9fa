//! Legacy configuration modules and plugins.

use std::fmt;
use std::sync::Arc;

use super::plugin_api::PluginApi;
use crate::error::Result;
use crate::theme::ConfigMap;

/// The function a plugin module exports.
pub type PluginFn = Arc<dyn Fn(&mut PluginApi<'_>) -> Result<()> + Send + Sync>;

/// Builds a plugin from the options given in an `@plugin "id" { … }` block.
pub type PluginFactory = Arc<dyn Fn(&ConfigMap) -> Plugin + Send + Sync>;

/// A plugin: a registration function plus an optional config it brings
/// along.
#[derive(Clone)]
pub struct Plugin {
    pub handler: PluginFn,
    pub config: Option<UserConfig>,
}

impl Plugin {
    pub fn new(handler: impl Fn(&mut PluginApi<'_>) -> Result<()> + Send + Sync + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
            config: None,
        }
    }

    pub fn with_config(mut self, config: UserConfig) -> Self {
        self.config = Some(config);
        self
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// How the `dark` variant is triggered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DarkMode {
    /// `@media (prefers-color-scheme: dark)`.
    #[default]
    Media,
    /// `&:where(<selector>, <selector> *)`, `.dark` unless given.
    Selector(Option<String>),
    /// Explicit variant templates such as `&:is(.dark *)`.
    Variant(Vec<String>),
}

/// A legacy configuration module.
#[derive(Clone, Debug, Default)]
pub struct UserConfig {
    /// Replaces the matching top-level theme keys.
    pub theme: ConfigMap,
    /// Deep-merged into the theme.
    pub extend: ConfigMap,
    pub plugins: Vec<Plugin>,
    /// Source globs, reported through [`Compiler::globs`](crate::Compiler::globs).
    pub content: Vec<String>,
    pub dark_mode: Option<DarkMode>,
}

impl UserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn theme(mut self, theme: ConfigMap) -> Self {
        self.theme = theme;
        self
    }

    pub fn extend(mut self, extend: ConfigMap) -> Self {
        self.extend = extend;
        self
    }

    pub fn plugin(mut self, plugin: Plugin) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn content(mut self, pattern: impl Into<String>) -> Self {
        self.content.push(pattern.into());
        self
    }

    pub fn dark_mode(mut self, mode: DarkMode) -> Self {
        self.dark_mode = Some(mode);
        self
    }
}
