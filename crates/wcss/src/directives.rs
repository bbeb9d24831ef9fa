//! Directives in the entry stylesheet.
//!
//! Compilation reads the stylesheet in two passes. [`collect`] pulls every
//! directive out of the top level: tokens from `@theme`, `@utility` and
//! `@custom-variant` definitions, the modules named by `@plugin` and
//! `@config`, and `@source` globs. What remains is author CSS plus a few
//! markers. Once the design system is built, [`finish`] turns those markers
//! into the output template: the `:root` token rule, `@layer base` blocks
//! for plugin base styles, and the `@tailwind utilities` insertion point.

use std::collections::HashMap;
use std::sync::Arc;

use classname::{Candidate, CandidateValue, Modifier, segment};

use crate::apply::{apply_targets, substitute_at_apply};
use crate::ast::{AstNode, AtRule, Declaration, at_rule, decl, rule, splice, statement, walk};
use crate::compat::plugin_api::{has_slot, parse_template};
use crate::compiler::Glob;
use crate::css::functions::{replace_calls, substitute_functions};
use crate::design_system::DesignSystem;
use crate::error::{Result, WcssError};
use crate::theme::legacy::{is_integer, is_number};
use crate::theme::{ConfigMap, ConfigValue, LegacyTheme, Theme, ThemeOptions};
use crate::utilities::{Outcome, UtilityFn, is_valid_utility_name};
use crate::value::DataType;
use crate::variants::is_valid_variant_name;

/// Everything [`collect`] found in a stylesheet.
#[derive(Debug, Default)]
pub(crate) struct Directives {
    pub theme: Theme,
    /// Author CSS with `@theme`, `@plugin`, `@config` and `@tailwind`
    /// markers left in place.
    pub nodes: Vec<AstNode>,
    pub utilities: Vec<CustomUtility>,
    pub variants: Vec<CustomVariant>,
    pub sources: Vec<SourceDirective>,
    pub globs: Vec<Glob>,
}

#[derive(Clone, Debug)]
pub(crate) struct CustomUtility {
    /// `tab-4` or `tab-*`.
    pub name: String,
    pub body: Vec<AstNode>,
}

impl CustomUtility {
    fn functional_root(&self) -> Option<&str> {
        self.name.strip_suffix("-*")
    }
}

#[derive(Clone, Debug)]
pub(crate) enum CustomVariant {
    /// `@custom-variant name (&:hover, &:focus);`
    Selectors { name: String, selectors: Vec<String> },
    /// `@custom-variant name { &:hover { @slot; } }`
    Block { name: String, body: Vec<AstNode> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SourceKind {
    Plugin,
    Config,
}

impl SourceKind {
    fn directive(self) -> &'static str {
        match self {
            SourceKind::Plugin => "plugin",
            SourceKind::Config => "config",
        }
    }
}

/// An `@plugin "id" { options }` or `@config "id"` directive.
#[derive(Clone, Debug)]
pub(crate) struct SourceDirective {
    pub kind: SourceKind,
    pub id: String,
    pub options: Option<ConfigMap>,
}

/// Splits directives out of the top level of `ast`.
pub(crate) fn collect(ast: Vec<AstNode>, base: &str) -> Result<Directives> {
    let mut directives = Directives::default();
    let mut seen_theme = false;

    for node in ast {
        let AstNode::AtRule(at) = node else {
            directives.nodes.push(node);
            continue;
        };

        match at.name.as_str() {
            "theme" => {
                read_theme(&mut directives.theme, at)?;
                if !seen_theme {
                    seen_theme = true;
                    directives.nodes.push(statement("theme", ""));
                }
            }
            "utility" => directives.utilities.push(read_utility(at)?),
            "custom-variant" | "variant" => directives.variants.push(read_variant(at)?),
            "plugin" | "config" => {
                let kind = if at.name == "plugin" {
                    SourceKind::Plugin
                } else {
                    SourceKind::Config
                };
                let id = unquote(&at.params).to_string();
                if id.is_empty() {
                    return Err(WcssError::InvalidDirective {
                        directive: at.name.clone(),
                        reason: "expected a module id".to_string(),
                    });
                }
                let options = if at.block { Some(read_options(&at)?) } else { None };
                directives.nodes.push(statement(at.name.as_str(), id.as_str()));
                directives.sources.push(SourceDirective { kind, id, options });
            }
            "source" => directives.globs.push(Glob {
                origin: base.to_string(),
                pattern: unquote(&at.params).to_string(),
            }),
            _ => directives.nodes.push(AstNode::AtRule(at)),
        }
    }

    log::debug!(
        "collected {} utilities, {} variants, {} modules",
        directives.utilities.len(),
        directives.variants.len(),
        directives.sources.len()
    );
    Ok(directives)
}

fn read_theme(theme: &mut Theme, at: AtRule) -> Result<()> {
    let options = ThemeOptions::from_params(&at.params);
    for child in at.nodes {
        match child {
            AstNode::Declaration(d) if d.property.starts_with("--") => {
                theme.add(&d.property, &d.value, options);
            }
            AstNode::AtRule(keyframes) if keyframes.name == "keyframes" => {
                theme.add_keyframes(AstNode::AtRule(keyframes));
            }
            AstNode::Comment(_) => {}
            _ => {
                return Err(WcssError::InvalidDirective {
                    directive: "theme".to_string(),
                    reason: "`@theme` blocks may only contain custom properties or `@keyframes`"
                        .to_string(),
                });
            }
        }
    }
    Ok(())
}

fn read_utility(at: AtRule) -> Result<CustomUtility> {
    let name = at.params.trim().to_string();
    let root = name.strip_suffix("-*").unwrap_or(&name);
    if !is_valid_utility_name(root) {
        return Err(WcssError::InvalidUtilityName {
            source_name: "@utility".to_string(),
            name,
        });
    }
    if at.nodes.is_empty() {
        return Err(WcssError::InvalidDirective {
            directive: "utility".to_string(),
            reason: format!("`@utility {name}` is empty"),
        });
    }
    Ok(CustomUtility {
        name,
        body: at.nodes,
    })
}

fn read_variant(at: AtRule) -> Result<CustomVariant> {
    let params = at.params.trim();
    let split = params
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(params.len());
    let (name, rest) = (params[..split].to_string(), params[split..].trim());

    if !is_valid_variant_name(&name) {
        return Err(WcssError::InvalidVariantName(name));
    }

    if rest.is_empty() && at.block && !at.nodes.is_empty() {
        if !has_slot(&at.nodes) {
            return Err(WcssError::InvalidVariant {
                name,
                reason: "the variant body has no `@slot`".to_string(),
            });
        }
        return Ok(CustomVariant::Block {
            name,
            body: at.nodes,
        });
    }

    match rest.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        Some(inner) if at.nodes.is_empty() => {
            let selectors: Vec<String> = segment(inner, ',')
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if selectors.is_empty() {
                return Err(WcssError::InvalidVariant {
                    name,
                    reason: "the selector list is empty".to_string(),
                });
            }
            Ok(CustomVariant::Selectors { name, selectors })
        }
        _ => Err(WcssError::InvalidVariant {
            name,
            reason: "expected `(selector, …)` or a block containing `@slot`".to_string(),
        }),
    }
}

/// Reads `@plugin "id" { key: value; }` options. Comma-separated values
/// become lists.
fn read_options(at: &AtRule) -> Result<ConfigMap> {
    let mut options = ConfigMap::new();
    for child in &at.nodes {
        let Some(d) = child.as_declaration() else {
            return Err(WcssError::InvalidDirective {
                directive: at.name.clone(),
                reason: "options may only contain declarations".to_string(),
            });
        };
        let parts = segment(&d.value, ',');
        let value = if parts.len() > 1 {
            ConfigValue::List(parts.into_iter().map(|p| unquote(p).into()).collect())
        } else {
            unquote(&d.value).into()
        };
        options.insert(d.property.as_str(), value);
    }
    Ok(options)
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(quote).and_then(|v| v.strip_suffix(quote)) {
            return inner;
        }
    }
    value
}

// ============================================================================
// Registration
// ============================================================================

/// Registers `@custom-variant` definitions in order.
pub(crate) fn register_variants(ds: &mut DesignSystem, variants: &[CustomVariant]) -> Result<()> {
    for variant in variants {
        match variant {
            CustomVariant::Selectors { name, selectors } => {
                if selectors.iter().all(|s| !s.contains('{') && !s.starts_with('@')) {
                    let selectors: Vec<&str> = selectors.iter().map(String::as_str).collect();
                    ds.variants.static_selectors(name, &selectors);
                } else {
                    let template = selectors.iter().map(|s| parse_template(s)).collect();
                    ds.variants.from_ast(name, template);
                }
                log::debug!("custom variant `{name}`");
            }
            CustomVariant::Block { name, body } => {
                let mut body = body.clone();
                substitute_variants(&mut body, ds)?;
                ds.variants.from_ast(name, body);
                log::debug!("custom variant `{name}` (block)");
            }
        }
    }
    Ok(())
}

/// Registers `@utility` definitions. Functional ones first, so static
/// bodies can apply them; static bodies are then registered dependencies
/// first.
pub(crate) fn register_utilities(ds: &mut DesignSystem, utilities: Vec<CustomUtility>) -> Result<()> {
    let mut statics = Vec::new();
    for mut utility in utilities {
        substitute_variants(&mut utility.body, ds)?;
        match utility.functional_root() {
            Some(root) => {
                let root = root.to_string();
                ds.utilities.functional(&root, value_utility(utility.body));
                log::debug!("functional utility `{root}-*`");
            }
            None => statics.push(utility),
        }
    }

    let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, utility) in statics.iter().enumerate() {
        by_name.entry(utility.name.as_str()).or_default().push(idx);
    }

    let mut registry = StaticRegistry {
        utilities: &statics,
        by_name: &by_name,
        done: vec![false; statics.len()],
        stack: Vec::new(),
    };
    for idx in 0..statics.len() {
        registry.visit(ds, idx)?;
    }
    Ok(())
}

struct StaticRegistry<'a> {
    utilities: &'a [CustomUtility],
    by_name: &'a HashMap<&'a str, Vec<usize>>,
    done: Vec<bool>,
    stack: Vec<usize>,
}

impl StaticRegistry<'_> {
    fn visit(&mut self, ds: &mut DesignSystem, idx: usize) -> Result<()> {
        if self.done[idx] {
            return Ok(());
        }
        let (utilities, by_name) = (self.utilities, self.by_name);
        let utility = &utilities[idx];
        self.stack.push(idx);

        for raw in applied_candidates(&utility.body) {
            let Some(deps) = by_name.get(base_name(&raw)) else {
                continue;
            };
            for &dep in deps {
                if self.stack.contains(&dep) {
                    return Err(WcssError::CircularApply { candidate: raw });
                }
                self.visit(ds, dep)?;
            }
        }

        self.stack.pop();
        let mut body = utility.body.clone();
        substitute_at_apply(&mut body, ds, &mut vec![utility.name.clone()])?;
        ds.utilities.static_utility(&utility.name, body);
        self.done[idx] = true;
        log::debug!("static utility `{}`", utility.name);
        Ok(())
    }
}

fn applied_candidates(nodes: &[AstNode]) -> Vec<String> {
    let mut found = Vec::new();
    walk(nodes, &mut |node| {
        if let AstNode::AtRule(at) = node
            && at.name == "apply"
        {
            found.extend(apply_targets(&at.params).map(str::to_string));
        }
    });
    found
}

/// `hover:-foo!` → `foo`.
fn base_name(raw: &str) -> &str {
    let base = segment(raw, ':').last().copied().unwrap_or(raw);
    let base = base.trim_start_matches('!').trim_end_matches('!');
    base.strip_prefix('-').unwrap_or(base)
}

// ============================================================================
// Functional @utility
// ============================================================================

/// A value or modifier as seen by `--value()` and `--modifier()`.
#[derive(Clone, Copy)]
enum Input<'a> {
    Bare {
        value: &'a str,
        fraction: Option<&'a str>,
    },
    Arbitrary {
        value: &'a str,
        hint: Option<&'a str>,
    },
}

impl<'a> Input<'a> {
    fn from_value(value: &'a CandidateValue) -> Self {
        match value {
            CandidateValue::Bare { value, fraction } => Input::Bare {
                value,
                fraction: fraction.as_deref(),
            },
            CandidateValue::Arbitrary { value, data_type } => Input::Arbitrary {
                value,
                hint: data_type.as_deref(),
            },
        }
    }

    fn from_modifier(modifier: &'a Modifier) -> Self {
        match modifier {
            Modifier::Named(value) => Input::Bare {
                value,
                fraction: None,
            },
            Modifier::Arbitrary(value) => Input::Arbitrary { value, hint: None },
        }
    }
}

/// What one `--value(…)` argument list resolved to.
struct Resolved {
    value: String,
    /// The `ratio` type consumed the candidate's modifier.
    used_fraction: bool,
}

fn value_utility(body: Vec<AstNode>) -> UtilityFn {
    Arc::new(move |candidate: &Candidate, theme: &Theme| {
        if candidate.negative {
            return Outcome::Rejected;
        }
        let Some(value) = candidate.value() else {
            return Outcome::Rejected;
        };
        let value = Input::from_value(value);
        let modifier = candidate.modifier().map(Input::from_modifier);

        let mut used_value = false;
        let mut used_modifier = false;
        let mut nodes = body.clone();

        retain_declarations(&mut nodes, &mut |d| {
            if d.value.contains("--value(") {
                let mut used_fraction = false;
                let replaced = replace_calls(&d.value, "--value", &mut |args| {
                    let resolved = resolve_args(args, value, theme)?;
                    used_fraction |= resolved.used_fraction;
                    Some(resolved.value)
                });
                let Some(replaced) = replaced else {
                    return false;
                };
                d.value = replaced;
                used_value = true;
                used_modifier |= used_fraction;
            }
            if d.value.contains("--modifier(") {
                let Some(modifier) = modifier else {
                    return false;
                };
                let replaced = replace_calls(&d.value, "--modifier", &mut |args| {
                    resolve_args(args, modifier, theme).map(|r| r.value)
                });
                let Some(replaced) = replaced else {
                    return false;
                };
                d.value = replaced;
                used_modifier = true;
            }
            true
        });

        if !used_value || (modifier.is_some() && !used_modifier) {
            return Outcome::Rejected;
        }
        Outcome::Nodes(nodes)
    })
}

fn retain_declarations(nodes: &mut Vec<AstNode>, keep: &mut impl FnMut(&mut Declaration) -> bool) {
    nodes.retain_mut(|node| match node {
        AstNode::Declaration(d) => keep(d),
        other => {
            if let Some(children) = other.children_mut() {
                retain_declarations(children, keep);
            }
            true
        }
    });
}

/// Tries each argument of `--value(a, b, …)` in order.
fn resolve_args(args: &str, input: Input<'_>, theme: &Theme) -> Option<Resolved> {
    segment(args, ',')
        .into_iter()
        .map(str::trim)
        .find_map(|arg| resolve_arg(arg, input, theme))
}

fn resolve_arg(arg: &str, input: Input<'_>, theme: &Theme) -> Option<Resolved> {
    let plain = |value: &str| {
        Some(Resolved {
            value: value.to_string(),
            used_fraction: false,
        })
    };

    match input {
        Input::Bare { value, fraction } => {
            if let Some(namespace) = arg.strip_suffix("-*").filter(|a| a.starts_with("--")) {
                return theme.resolve(Some(value), &[namespace]).and_then(|v| plain(&v));
            }
            match arg {
                "integer" if is_integer(value) => plain(value),
                "number" if is_number(value) => plain(value),
                "percentage" if value.strip_suffix('%').is_some_and(is_number) => plain(value),
                "ratio" => {
                    let fraction = fraction?;
                    let (numerator, denominator) = fraction.split_once('/')?;
                    (is_integer(numerator.trim()) && is_integer(denominator.trim())).then(|| {
                        Resolved {
                            value: fraction.to_string(),
                            used_fraction: true,
                        }
                    })
                }
                _ => {
                    let literal = unquote(arg);
                    (literal.len() < arg.len() && literal == value).then(|| Resolved {
                        value: literal.to_string(),
                        used_fraction: false,
                    })
                }
            }
        }
        Input::Arbitrary { value, hint } => {
            let ty = arg.strip_prefix('[')?.strip_suffix(']')?;
            if ty == "*" {
                return plain(value);
            }
            let ty = DataType::from_name(ty)?;
            let accepted = match hint {
                Some(hint) => DataType::from_name(hint) == Some(ty),
                None => ty.matches(value),
            };
            accepted.then(|| plain(value)).flatten()
        }
    }
}

// ============================================================================
// Template
// ============================================================================

/// Applies nested `@variant name { … }` blocks.
pub(crate) fn substitute_variants(nodes: &mut Vec<AstNode>, ds: &DesignSystem) -> Result<()> {
    let mut error = None;
    splice(nodes, &mut |node| {
        if error.is_some() {
            return None;
        }
        let AstNode::AtRule(at) = node else {
            return None;
        };
        if at.name != "variant" || !at.block {
            return None;
        }
        match apply_variant(at, ds) {
            Ok(node) => Some(vec![node]),
            Err(e) => {
                error = Some(e);
                Some(Vec::new())
            }
        }
    });
    match error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn apply_variant(at: &AtRule, ds: &DesignSystem) -> Result<AstNode> {
    let name = at.params.trim();
    let unknown = || WcssError::InvalidVariant {
        name: name.to_string(),
        reason: "unknown variant".to_string(),
    };

    let variant = ds.parse_variant(name).ok_or_else(unknown)?;
    let mut body = at.nodes.clone();
    substitute_variants(&mut body, ds)?;

    let mut node = rule("&", body);
    ds.variants.apply(&mut node, &variant, 0).ok_or_else(unknown)?;
    Ok(node)
}

/// Builds the output template from the collected author CSS. `bases` holds
/// the `addBase` output of each `@plugin`/`@config` directive in order.
pub(crate) fn finish(
    ds: &DesignSystem,
    legacy: &LegacyTheme,
    nodes: Vec<AstNode>,
    bases: Vec<Vec<AstNode>>,
) -> Result<Vec<AstNode>> {
    let base_marker = nodes.iter().any(|node| is_tailwind(node, "base"));
    let mut all_base: Vec<AstNode> = if base_marker {
        bases.iter().flatten().cloned().collect()
    } else {
        Vec::new()
    };
    let mut bases = bases.into_iter();
    let mut template = Vec::with_capacity(nodes.len());

    for node in nodes {
        match &node {
            AstNode::AtRule(at) if at.name == "theme" && !at.block => {
                let tokens: Vec<AstNode> = ds
                    .theme
                    .emitted()
                    .map(|(key, entry)| decl(key, entry.value.as_str()))
                    .collect();
                if !tokens.is_empty() {
                    template.push(rule(":root", tokens));
                }
                template.extend(ds.theme.keyframes().iter().cloned());
            }
            AstNode::AtRule(at) if (at.name == "plugin" || at.name == "config") && !at.block => {
                let base = bases.next().unwrap_or_default();
                if !base_marker && !base.is_empty() {
                    template.push(at_rule("layer", "base", base));
                }
            }
            AstNode::AtRule(at) if at.name == "tailwind" => match at.params.trim() {
                "base" => {
                    if !all_base.is_empty() {
                        template.push(at_rule("layer", "base", std::mem::take(&mut all_base)));
                    }
                }
                "utilities" => template.push(node),
                other => log::debug!("ignoring `@tailwind {other}`"),
            },
            _ => {
                let mut nodes = vec![node];
                substitute_variants(&mut nodes, ds)?;
                substitute_at_apply(&mut nodes, ds, &mut Vec::new())?;
                substitute_functions(&mut nodes, &ds.theme, Some(legacy));
                template.extend(nodes);
            }
        }
    }

    if let Some(error) = legacy.take_error() {
        return Err(error);
    }
    Ok(template)
}

pub(crate) fn is_tailwind(node: &AstNode, params: &str) -> bool {
    matches!(node, AstNode::AtRule(at) if at.name == "tailwind" && at.params.trim() == params)
}

/// Turns a loaded module into something the compat layer can run.
pub(crate) fn into_source(
    directive: &SourceDirective,
    module: crate::loader::Module,
    base: String,
) -> Result<crate::compat::LoadedSource> {
    use crate::compat::SourceKind as Kind;
    use crate::loader::Module;

    let mismatch = |expected: &str| WcssError::InvalidDirective {
        directive: directive.kind.directive().to_string(),
        reason: format!("`{}` does not export a {expected}", directive.id),
    };

    let kind = match (directive.kind, module) {
        (SourceKind::Plugin, Module::Plugin(plugin)) => {
            if directive.options.is_some() {
                return Err(WcssError::InvalidDirective {
                    directive: "plugin".to_string(),
                    reason: format!("`{}` does not accept options", directive.id),
                });
            }
            Kind::Plugin(plugin)
        }
        (SourceKind::Plugin, Module::PluginWithOptions(factory)) => {
            let options = directive.options.clone().unwrap_or_default();
            Kind::Plugin(factory(&options))
        }
        (SourceKind::Plugin, Module::Config(_)) => return Err(mismatch("plugin")),
        (SourceKind::Config, Module::Config(config)) => Kind::Config(config),
        (SourceKind::Config, _) => return Err(mismatch("config")),
    };

    Ok(crate::compat::LoadedSource {
        id: directive.id.clone(),
        base,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::parse_stylesheet;

    fn collected(css: &str) -> Directives {
        collect(parse_stylesheet(css).unwrap(), "/project").unwrap()
    }

    #[test]
    fn test_collect_splits_directives() {
        let directives = collected(
            r#"
            @theme { --color-red: red; }
            @utility tab-* { tab-size: --value(integer); }
            @custom-variant hocus (&:hover, &:focus);
            @source "./src/**/*.rs";
            @plugin "forms";
            .btn { color: red; }
            @tailwind utilities;
            "#,
        );

        assert!(directives.theme.contains("--color-red"));
        assert_eq!(directives.utilities.len(), 1);
        assert_eq!(directives.variants.len(), 1);
        assert_eq!(directives.sources[0].id, "forms");
        assert_eq!(
            directives.globs,
            vec![Glob {
                origin: "/project".to_string(),
                pattern: "./src/**/*.rs".to_string(),
            }]
        );
        // theme marker, plugin marker, .btn, @tailwind
        assert_eq!(directives.nodes.len(), 4);
    }

    #[test]
    fn test_theme_rejects_rules() {
        let ast = parse_stylesheet("@theme { .a { color: red; } }").unwrap();
        assert!(matches!(
            collect(ast, ""),
            Err(WcssError::InvalidDirective { directive, .. }) if directive == "theme"
        ));
    }

    #[test]
    fn test_invalid_names() {
        let ast = parse_stylesheet("@utility -bad { color: red; }").unwrap();
        assert!(matches!(collect(ast, ""), Err(WcssError::InvalidUtilityName { .. })));

        let ast = parse_stylesheet("@custom-variant Bad (&:hover);").unwrap();
        assert!(matches!(collect(ast, ""), Err(WcssError::InvalidVariantName(_))));
    }

    #[test]
    fn test_variant_forms() {
        let directives = collected(
            "@custom-variant any-hover (@media (any-hover: hover) { &:hover });
             @custom-variant hocus { &:hover, &:focus { @slot; } }",
        );
        assert!(matches!(
            &directives.variants[0],
            CustomVariant::Selectors { selectors, .. } if selectors.len() == 1
        ));
        assert!(matches!(&directives.variants[1], CustomVariant::Block { name, .. } if name == "hocus"));
    }

    #[test]
    fn test_block_variant_needs_slot() {
        let ast = parse_stylesheet("@custom-variant x { &:hover { color: red; } }").unwrap();
        assert!(matches!(collect(ast, ""), Err(WcssError::InvalidVariant { .. })));
    }

    #[test]
    fn test_plugin_options() {
        let directives = collected(r#"@plugin "typography" { class: "prose"; sizes: sm, lg; }"#);
        let options = directives.sources[0].options.as_ref().unwrap();
        assert_eq!(options.get("class").and_then(ConfigValue::as_str), Some("prose"));
        assert!(matches!(options.get("sizes"), Some(ConfigValue::List(items)) if items.len() == 2));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("hover:-foo!"), "foo");
        assert_eq!(base_name("md:[&>*]:bar"), "bar");
        assert_eq!(base_name("baz"), "baz");
    }

    #[test]
    fn test_resolve_arg() {
        let mut theme = Theme::new();
        theme.add("--tab-size-github", "8", ThemeOptions::NONE);

        let bare = Input::Bare {
            value: "4",
            fraction: None,
        };
        assert_eq!(resolve_arg("integer", bare, &theme).map(|r| r.value).as_deref(), Some("4"));
        assert!(resolve_arg("percentage", bare, &theme).is_none());

        let named = Input::Bare {
            value: "github",
            fraction: None,
        };
        assert_eq!(
            resolve_arg("--tab-size-*", named, &theme).map(|r| r.value).as_deref(),
            Some("var(--tab-size-github, 8)")
        );
        assert_eq!(
            resolve_arg("'github'", named, &theme).map(|r| r.value).as_deref(),
            Some("github")
        );

        let ratio = Input::Bare {
            value: "16",
            fraction: Some("16/9"),
        };
        let resolved = resolve_arg("ratio", ratio, &theme).unwrap();
        assert_eq!(resolved.value, "16/9");
        assert!(resolved.used_fraction);

        let arbitrary = Input::Arbitrary {
            value: "3px",
            hint: None,
        };
        assert!(resolve_arg("[length]", arbitrary, &theme).is_some());
        assert!(resolve_arg("[color]", arbitrary, &theme).is_none());
        assert!(resolve_arg("[*]", arbitrary, &theme).is_some());
    }
}
