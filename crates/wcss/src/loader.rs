//! Loading `@plugin` and `@config` targets.
//!
//! The compiler never touches the file system. Whatever `@plugin "…"` or
//! `@config "…"` names is handed to a [`ModuleLoader`] supplied by the
//! caller, and only awaited while compiling.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;

use crate::compat::{Plugin, PluginFactory, UserConfig};
use crate::error::BoxError;

/// What a module exports.
#[derive(Clone)]
pub enum Module {
    Plugin(Plugin),
    /// A plugin configured from an `@plugin "id" { … }` block.
    PluginWithOptions(PluginFactory),
    Config(UserConfig),
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Module::Plugin(plugin) => f.debug_tuple("Plugin").field(plugin).finish(),
            Module::PluginWithOptions(_) => f.write_str("PluginWithOptions(..)"),
            Module::Config(config) => f.debug_tuple("Config").field(config).finish(),
        }
    }
}

/// A loaded module plus the directory it was resolved from, used as the
/// origin of any globs it contributes.
#[derive(Clone, Debug)]
pub struct LoadedModule {
    pub module: Module,
    pub base: String,
}

/// Resolves module ids relative to a base directory.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    async fn load_module(&self, id: &str, base: &str) -> Result<LoadedModule, BoxError>;
}

/// A loader serving modules registered up front.
///
/// ```
/// use wcss::compat::UserConfig;
/// use wcss::loader::{Module, ModuleMap};
///
/// let loader = ModuleMap::new().with("./config.js", Module::Config(UserConfig::new()));
/// assert!(loader.contains("./config.js"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ModuleMap {
    modules: HashMap<String, Module>,
}

impl ModuleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<String>, module: Module) -> Self {
        self.modules.insert(id.into(), module);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, module: Module) {
        self.modules.insert(id.into(), module);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }
}

#[async_trait]
impl ModuleLoader for ModuleMap {
    async fn load_module(&self, id: &str, base: &str) -> Result<LoadedModule, BoxError> {
        let module = self
            .modules
            .get(id)
            .cloned()
            .ok_or_else(|| format!("module `{id}` not found"))?;
        Ok(LoadedModule {
            module,
            base: base.to_string(),
        })
    }
}
