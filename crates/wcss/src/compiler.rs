//! The compile entry point.
//!
//! [`compile`] reads an entry stylesheet once and returns a [`Compiler`]
//! holding the resulting design system. [`Compiler::build`] can then be
//! called any number of times with the candidates found in source files;
//! each call returns a complete stylesheet.
//!
//! ## Build pipeline
//!
//! ```text
//! candidates ─► dedupe ─► parse ─► compile ─► sort ─► insert at marker
//!                                                          │
//!                     CSS ◄─ print ◄─ flatten ◄─ @property ◄─ functions
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use classname::Candidate;

use crate::ast::{AstNode, splice};
use crate::compat;
use crate::compile::compile_candidate;
use crate::css::{PrintOptions, flatten, parse_stylesheet, to_css};
use crate::design_system::DesignSystem;
use crate::directives::{self, is_tailwind};
use crate::error::{Result, WcssError};
use crate::loader::ModuleLoader;
use crate::property::Properties;
use crate::sort::{PropertySort, compare_candidates};

/// A source glob from `@source` or a config's `content`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glob {
    /// Directory the pattern is relative to.
    pub origin: String,
    pub pattern: String,
}

#[derive(Clone, Default)]
pub struct CompileOptions {
    /// Resolves `@plugin` and `@config` ids. Stylesheets that name a module
    /// fail to compile without one.
    pub loader: Option<Arc<dyn ModuleLoader>>,
    pub print: PrintOptions,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loader(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    pub fn minify(mut self, minify: bool) -> Self {
        self.print = if minify {
            PrintOptions::minified()
        } else {
            PrintOptions::default()
        };
        self
    }
}

impl fmt::Debug for CompileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileOptions")
            .field("loader", &self.loader.is_some())
            .field("print", &self.print)
            .finish()
    }
}

/// Compiles an entry stylesheet.
///
/// `base` is the directory `css` was read from. It is handed to the module
/// loader and recorded as the origin of `@source` globs.
///
/// # Errors
///
/// Fails on unparsable CSS, invalid directives, `@apply` cycles and unknown
/// candidates in author CSS, and modules the loader cannot provide.
pub async fn compile(css: &str, base: &str, options: CompileOptions) -> Result<Compiler> {
    let ast = parse_stylesheet(css)?;
    let mut found = directives::collect(ast, base)?;

    let mut sources = Vec::with_capacity(found.sources.len());
    for directive in &found.sources {
        let Some(loader) = options.loader.as_ref() else {
            return Err(WcssError::Loader {
                id: directive.id.clone(),
                source: "no module loader was provided".into(),
            });
        };
        let loaded = loader
            .load_module(&directive.id, base)
            .await
            .map_err(|source| WcssError::Loader {
                id: directive.id.clone(),
                source,
            })?;
        log::debug!("loaded `{}` from {}", directive.id, loaded.base);
        sources.push(directives::into_source(directive, loaded.module, loaded.base)?);
    }

    let legacy = compat::build_legacy_theme(&mut found.theme, &sources);
    let mut ds = DesignSystem::new(std::mem::take(&mut found.theme));

    directives::register_variants(&mut ds, &found.variants)?;
    let bases = compat::register(&mut ds, &legacy, &sources, &mut found.globs)?;
    directives::register_utilities(&mut ds, std::mem::take(&mut found.utilities))?;

    let template = directives::finish(&ds, &legacy, found.nodes, bases)?;
    ds.set_legacy_theme(legacy.freeze());

    log::info!(
        "compiled stylesheet: {} template nodes, {} globs",
        template.len(),
        found.globs.len()
    );

    Ok(Compiler {
        ds,
        template,
        globs: found.globs,
        print: options.print,
    })
}

/// A compiled stylesheet, ready to generate CSS for candidates.
pub struct Compiler {
    ds: DesignSystem,
    template: Vec<AstNode>,
    globs: Vec<Glob>,
    print: PrintOptions,
}

struct Entry {
    candidate: Candidate,
    node: AstNode,
    properties: PropertySort,
}

impl Compiler {
    /// Generates the stylesheet for `candidates`.
    ///
    /// Duplicates are ignored and candidates that match nothing are skipped,
    /// so the output depends only on the set of candidates given.
    pub fn build<I, S>(&self, candidates: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = candidates
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        let mut utilities = Some(self.compile_sorted(&unique));
        let mut nodes = self.template.clone();
        splice(&mut nodes, &mut |node| {
            is_tailwind(node, "utilities").then(|| utilities.take().unwrap_or_default())
        });

        self.ds.resolve_functions(&mut nodes);

        let mut properties = Properties::new();
        properties.extract(&mut nodes);
        nodes.extend(properties.into_nodes());

        to_css(&flatten(nodes), &self.print)
    }

    fn compile_sorted(&self, raw: &BTreeSet<String>) -> Vec<AstNode> {
        let mut entries = Vec::new();
        for raw in raw {
            let candidates = self.ds.parse_candidate(raw);
            if candidates.is_empty() {
                log::trace!("`{raw}` is not a candidate");
            }
            for candidate in candidates {
                let Some(node) = compile_candidate(&self.ds, &candidate) else {
                    log::trace!("`{raw}` produced no output");
                    continue;
                };
                let properties = PropertySort::of(std::slice::from_ref(&node));
                entries.push(Entry {
                    candidate,
                    node,
                    properties,
                });
            }
        }

        let indices = self
            .ds
            .variants
            .order_indices(entries.iter().flat_map(|e| e.candidate.variants.iter()));

        let mut keyed: Vec<(Vec<usize>, Entry)> = entries
            .into_iter()
            .map(|entry| {
                let mut key: Vec<usize> = entry
                    .candidate
                    .variants
                    .iter()
                    .filter_map(|v| indices.get(v).copied())
                    .collect();
                key.sort_unstable_by(|a, b| b.cmp(a));
                key.dedup();
                (key, entry)
            })
            .collect();

        keyed.sort_by(|(a_key, a), (z_key, z)| {
            a_key
                .cmp(z_key)
                .then_with(|| a.properties.compare(&z.properties))
                .then_with(|| compare_candidates(&a.candidate.raw, &z.candidate.raw))
        });

        keyed.into_iter().map(|(_, entry)| entry.node).collect()
    }

    /// Globs from `@source` directives and config `content` entries.
    pub fn globs(&self) -> &[Glob] {
        &self.globs
    }

    pub fn design_system(&self) -> &DesignSystem {
        &self.ds
    }
}

impl fmt::Debug for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiler")
            .field("template", &self.template.len())
            .field("globs", &self.globs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_compiler_is_send_sync() {
        assert_send_sync::<Compiler>();
    }

    #[tokio::test]
    async fn test_empty_input() {
        let compiler = compile("@tailwind utilities;", "", CompileOptions::new())
            .await
            .unwrap();
        assert_eq!(compiler.build(Vec::<String>::new()), "");
        assert_eq!(compiler.build(["not-a-utility", ""]), "");
    }

    #[tokio::test]
    async fn test_missing_loader() {
        let err = compile(r#"@plugin "forms";"#, "", CompileOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, WcssError::Loader { id, .. } if id == "forms"));
    }

    #[tokio::test]
    async fn test_duplicates_are_ignored() {
        let compiler = compile("@tailwind utilities;", "", CompileOptions::new().minify(true))
            .await
            .unwrap();
        assert_eq!(compiler.build(["flex", "flex", " flex "]), ".flex{display:flex}");
    }
}
