//! The registration surface handed to plugins.
//!
//! ```
//! use wcss::compat::{CssObject, MatchUtilitiesOptions, Plugin};
//! use wcss::value::DataType;
//!
//! let plugin = Plugin::new(|api| {
//!     api.add_utilities(CssObject::new().with(
//!         ".scrollbar-none",
//!         CssObject::new().with("scrollbarWidth", "none"),
//!     ))?;
//!     let values = api.theme_map("tabSize");
//!     api.match_utility(
//!         "tab",
//!         |value, _| CssObject::new().with("tabSize", value),
//!         MatchUtilitiesOptions::new(&[DataType::Integer]).values(values),
//!     )?;
//!     api.add_variant("hocus", vec!["&:hover", "&:focus"])
//! });
//! # let _ = plugin;
//! ```

use std::cmp::Ordering;
use std::sync::Arc;

use classname::{Variant, VariantValue, segment};

use super::css_object::{CssObject, CssValue};
use crate::ast::{AstNode, rule, statement, substitute_slot, walk};
use crate::css::unescape;
use crate::design_system::DesignSystem;
use crate::error::{Result, WcssError};
use crate::theme::{ConfigMap, ConfigValue, LegacyTheme};
use crate::utilities::{ModifierPolicy, ValueSpec, is_valid_utility_name};
use crate::value::DataType;
use crate::variants::{
    CompareFn, Compounds, compounds_for_selectors, is_valid_variant_name, join_selector_rules,
};

/// Turns a resolved value and modifier into CSS.
pub type MatchUtilityFn = Arc<dyn Fn(&str, Option<&str>) -> CssObject + Send + Sync>;

/// Produces variant templates for a value and modifier. Templates are
/// selectors (`&:nth-child(3)`) or at-rules with a `{ }` placeholder.
pub type MatchVariantFn = Arc<dyn Fn(Option<&str>, Option<&str>) -> Vec<String> + Send + Sync>;

/// What a `matchVariant` comparator sees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantSortValue<'a> {
    pub value: &'a str,
    pub modifier: Option<&'a str>,
}

pub type VariantSortFn =
    Arc<dyn Fn(&VariantSortValue<'_>, &VariantSortValue<'_>) -> Ordering + Send + Sync>;

#[derive(Clone, Debug)]
pub struct MatchUtilitiesOptions {
    pub types: Vec<DataType>,
    pub values: ConfigMap,
    pub supports_negative_values: bool,
    pub modifiers: ModifierPolicy,
}

impl Default for MatchUtilitiesOptions {
    fn default() -> Self {
        Self::new(&[DataType::Any])
    }
}

impl MatchUtilitiesOptions {
    pub fn new(types: &[DataType]) -> Self {
        Self {
            types: types.to_vec(),
            values: ConfigMap::new(),
            supports_negative_values: false,
            modifiers: ModifierPolicy::None,
        }
    }

    pub fn values(mut self, values: ConfigMap) -> Self {
        self.values = values;
        self
    }

    pub fn negative(mut self) -> Self {
        self.supports_negative_values = true;
        self
    }

    pub fn modifiers(mut self, modifiers: ModifierPolicy) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Clone, Default)]
pub struct MatchVariantOptions {
    /// Named values in order. A `DEFAULT` entry may map to `None`, which
    /// still lets the bare variant name apply.
    pub values: Vec<(String, Option<String>)>,
    pub sort: Option<VariantSortFn>,
}

impl MatchVariantOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, key: impl Into<String>, value: Option<&str>) -> Self {
        self.values.push((key.into(), value.map(str::to_string)));
        self
    }

    pub fn sort(
        mut self,
        sort: impl Fn(&VariantSortValue<'_>, &VariantSortValue<'_>) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.sort = Some(Arc::new(sort));
        self
    }
}

/// The body of an `addVariant` call.
#[derive(Clone, Debug, PartialEq)]
pub enum VariantBody {
    /// Selector or at-rule templates, `@slot` implied.
    Selectors(Vec<String>),
    /// A CSS object with explicit `@slot` values.
    Object(CssObject),
}

impl From<&str> for VariantBody {
    fn from(selector: &str) -> Self {
        VariantBody::Selectors(vec![selector.to_string()])
    }
}

impl From<Vec<&str>> for VariantBody {
    fn from(selectors: Vec<&str>) -> Self {
        VariantBody::Selectors(selectors.into_iter().map(str::to_string).collect())
    }
}

impl From<CssObject> for VariantBody {
    fn from(object: CssObject) -> Self {
        VariantBody::Object(object)
    }
}

/// Passed to each plugin while the stylesheet compiles.
pub struct PluginApi<'a> {
    ds: &'a mut DesignSystem,
    theme: &'a LegacyTheme,
    base: &'a mut Vec<AstNode>,
    source: &'a str,
}

impl<'a> PluginApi<'a> {
    pub(crate) fn new(
        ds: &'a mut DesignSystem,
        theme: &'a LegacyTheme,
        base: &'a mut Vec<AstNode>,
        source: &'a str,
    ) -> Self {
        Self {
            ds,
            theme,
            base,
            source,
        }
    }

    /// Adds global styles, emitted in `@layer base`.
    pub fn add_base(&mut self, css: CssObject) {
        self.base.extend(css.to_ast());
    }

    /// Registers static utilities. Each key is a selector list whose entries
    /// are a single class, optionally followed by pseudo-classes.
    pub fn add_utilities(&mut self, utilities: CssObject) -> Result<()> {
        for (key, value) in utilities.iter() {
            let body = match value {
                CssValue::Object(object) => object.to_ast(),
                CssValue::List(items) => items
                    .iter()
                    .filter_map(|item| match item {
                        CssValue::Object(object) => Some(object.to_ast()),
                        _ => None,
                    })
                    .flatten()
                    .collect(),
                _ => return Err(WcssError::InvalidUtilitySelector(key.to_string())),
            };

            for selector in segment(key, ',') {
                let (name, suffix) = split_utility_selector(selector.trim())
                    .ok_or_else(|| WcssError::InvalidUtilitySelector(key.to_string()))?;
                if !is_valid_utility_name(&name) {
                    return Err(WcssError::InvalidUtilityName {
                        source_name: self.source.to_string(),
                        name,
                    });
                }

                let nodes = if suffix.is_empty() {
                    body.clone()
                } else {
                    vec![rule(format!("&{suffix}"), body.clone())]
                };
                log::debug!("{}: static utility `{name}`", self.source);
                self.ds.utilities.static_utility(&name, nodes);
            }
        }
        Ok(())
    }

    /// Same as [`add_utilities`](Self::add_utilities).
    pub fn add_components(&mut self, components: CssObject) -> Result<()> {
        self.add_utilities(components)
    }

    /// Registers one functional utility.
    pub fn match_utility(
        &mut self,
        name: &str,
        handler: impl Fn(&str, Option<&str>) -> CssObject + Send + Sync + 'static,
        options: MatchUtilitiesOptions,
    ) -> Result<()> {
        self.match_utilities(vec![(name, Arc::new(handler) as MatchUtilityFn)], options)
    }

    /// Registers functional utilities sharing one set of options.
    pub fn match_utilities(
        &mut self,
        utilities: Vec<(&str, MatchUtilityFn)>,
        options: MatchUtilitiesOptions,
    ) -> Result<()> {
        let mut table: ConfigMap = options.values.flatten().into_iter().collect();
        table.bare = options.values.bare;

        for (name, handler) in utilities {
            if !is_valid_utility_name(name) {
                return Err(WcssError::InvalidUtilityName {
                    source_name: self.source.to_string(),
                    name: name.to_string(),
                });
            }

            let mut spec = ValueSpec::new(&options.types)
                .table(table.clone())
                .modifiers(options.modifiers.clone());
            if options.supports_negative_values {
                spec = spec.negative();
            }

            log::debug!("{}: functional utility `{name}-*`", self.source);
            self.ds.utilities.with_value(name, spec, move |resolved| {
                handler(&resolved.value, resolved.modifier.as_deref()).to_ast()
            });
        }
        Ok(())
    }

    /// Registers a static variant from selector templates or a CSS object.
    pub fn add_variant(&mut self, name: &str, body: impl Into<VariantBody>) -> Result<()> {
        if !is_valid_variant_name(name) {
            return Err(WcssError::InvalidVariantName(name.to_string()));
        }

        match body.into() {
            VariantBody::Selectors(selectors) => {
                if selectors.iter().all(|s| !s.contains('{') && !s.starts_with('@')) {
                    let selectors: Vec<&str> = selectors.iter().map(String::as_str).collect();
                    self.ds.variants.static_selectors(name, &selectors);
                } else {
                    let template = selectors.iter().map(|s| parse_template(s)).collect();
                    self.ds.variants.from_ast(name, template);
                }
            }
            VariantBody::Object(object) => {
                let template = object.to_ast();
                if !has_slot(&template) {
                    return Err(WcssError::InvalidVariant {
                        name: name.to_string(),
                        reason: "the variant body has no `@slot`".to_string(),
                    });
                }
                self.ds.variants.from_ast(name, template);
            }
        }
        log::debug!("{}: variant `{name}`", self.source);
        Ok(())
    }

    /// Registers a functional variant, `name-<value>` and `name-[<value>]`.
    pub fn match_variant(
        &mut self,
        name: &str,
        templates: impl Fn(Option<&str>, Option<&str>) -> Vec<String> + Send + Sync + 'static,
        options: MatchVariantOptions,
    ) -> Result<()> {
        if !is_valid_variant_name(name) {
            return Err(WcssError::InvalidVariantName(name.to_string()));
        }

        let templates: MatchVariantFn = Arc::new(templates);
        let values = Arc::new(options.values);

        let compounds = match values.first() {
            Some((_, value)) => {
                let sample = templates(value.as_deref(), None);
                let sample: Vec<&str> = sample.iter().map(String::as_str).collect();
                compounds_for_selectors(&sample)
            }
            None => Compounds::STYLE_RULES,
        };

        let compare = variant_comparator(Arc::clone(&values), options.sort);
        let apply_values = Arc::clone(&values);
        self.ds.variants.group(Some(compare), move |variants| {
            variants.functional(
                name,
                move |node, variant| {
                    let Variant::Functional { value, modifier, .. } = variant else {
                        return None;
                    };
                    let selected = match value {
                        None => lookup(&apply_values, "DEFAULT")?.clone(),
                        Some(VariantValue::Arbitrary(value)) => Some(value.clone()),
                        Some(VariantValue::Named(value)) => {
                            Some(lookup(&apply_values, value)?.clone()?)
                        }
                    };
                    let modifier = modifier.as_ref().map(|m| m.value());

                    let body = std::mem::take(node.children_mut()?);
                    let mut wrapped = join_selector_rules(
                        templates(selected.as_deref(), modifier)
                            .iter()
                            .map(|template| parse_template(template))
                            .collect(),
                    );
                    if wrapped.is_empty() {
                        return None;
                    }
                    substitute_slot(&mut wrapped, &body);
                    *node.children_mut()? = wrapped;
                    Some(())
                },
                compounds,
            );
        });
        log::debug!("{}: functional variant `{name}-*`", self.source);
        Ok(())
    }

    /// Reads the legacy theme: `theme("colors.red.500")`.
    pub fn theme(&self, path: &str) -> Option<ConfigValue> {
        self.theme.lookup(path)
    }

    pub fn theme_or(&self, path: &str, default: impl Into<ConfigValue>) -> ConfigValue {
        self.theme.lookup(path).unwrap_or_else(|| default.into())
    }

    /// A theme section as a table, or an empty table.
    pub fn theme_map(&self, path: &str) -> ConfigMap {
        match self.theme.lookup(path) {
            Some(ConfigValue::Map(map)) => map,
            _ => ConfigMap::new(),
        }
    }

    /// Class name prefixing is not supported; names are returned unchanged.
    pub fn prefix(&self, name: &str) -> String {
        name.to_string()
    }
}

fn lookup<'v>(values: &'v [(String, Option<String>)], key: &str) -> Option<&'v Option<String>> {
    values.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

fn variant_comparator(
    values: Arc<Vec<(String, Option<String>)>>,
    sort: Option<VariantSortFn>,
) -> CompareFn {
    Arc::new(move |a, z| {
        let key = |variant: &Variant| match variant {
            Variant::Functional { value, modifier, .. } => Some((
                value.as_ref().map_or("DEFAULT", VariantValue::as_str).to_string(),
                value.as_ref().is_some_and(VariantValue::is_arbitrary),
                modifier.as_ref().map(|m| m.value().to_string()),
            )),
            _ => None,
        };
        let (Some((a_key, a_arbitrary, a_modifier)), Some((z_key, z_arbitrary, z_modifier))) =
            (key(a), key(z))
        else {
            return Ordering::Equal;
        };

        let resolve = |key: &str, arbitrary: bool| {
            if arbitrary {
                return key.to_string();
            }
            lookup(&values, key)
                .and_then(|v| v.clone())
                .unwrap_or_else(|| key.to_string())
        };
        let a_value = resolve(&a_key, a_arbitrary);
        let z_value = resolve(&z_key, z_arbitrary);

        if let Some(sort) = &sort {
            return sort(
                &VariantSortValue {
                    value: &a_value,
                    modifier: a_modifier.as_deref(),
                },
                &VariantSortValue {
                    value: &z_value,
                    modifier: z_modifier.as_deref(),
                },
            );
        }

        let position = |key: &str, arbitrary: bool| {
            if arbitrary {
                return values.len();
            }
            values
                .iter()
                .position(|(k, _)| k == key)
                .unwrap_or(values.len())
        };
        position(&a_key, a_arbitrary)
            .cmp(&position(&z_key, z_arbitrary))
            .then_with(|| a_value.cmp(&z_value))
    })
}

/// `.name`, `.name:hover` or `.name::placeholder`: returns the unescaped
/// class name and the pseudo suffix.
fn split_utility_selector(selector: &str) -> Option<(String, &str)> {
    let rest = selector.strip_prefix('.')?;
    let mut end = rest.len();
    let mut escaped = false;
    for (idx, c) in rest.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            ':' => {
                end = idx;
                break;
            }
            c if c.is_alphanumeric() || c == '-' || c == '_' => {}
            _ => return None,
        }
    }
    let name = unescape(&rest[..end]);
    (!name.is_empty()).then_some((name, &rest[end..]))
}

/// `&:hover` → `&:hover { @slot }`; `@media print { &:hover }` nests.
pub(crate) fn parse_template(template: &str) -> AstNode {
    let template = template.trim();
    let Some(open) = template.find('{') else {
        return rule(template, vec![statement("slot", "")]);
    };
    let close = template
        .rfind('}')
        .filter(|close| *close > open)
        .unwrap_or(template.len());
    let outer = template[..open].trim();
    let inner = template[open + 1..close].trim();
    let children = if inner.is_empty() {
        vec![statement("slot", "")]
    } else {
        vec![parse_template(inner)]
    };
    rule(outer, children)
}

pub(crate) fn has_slot(nodes: &[AstNode]) -> bool {
    let mut found = false;
    walk(nodes, &mut |node| found |= node.is_at_rule("slot"));
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::at_rule;

    #[test]
    fn test_split_utility_selector() {
        assert_eq!(split_utility_selector(".foo"), Some(("foo".to_string(), "")));
        assert_eq!(
            split_utility_selector(".foo::placeholder"),
            Some(("foo".to_string(), "::placeholder"))
        );
        assert_eq!(split_utility_selector(r".w-1\/2"), Some(("w-1/2".to_string(), "")));
        assert_eq!(split_utility_selector(".foo > *"), None);
        assert_eq!(split_utility_selector("#foo"), None);
    }

    #[test]
    fn test_parse_template() {
        assert_eq!(parse_template("&:hover"), rule("&:hover", vec![statement("slot", "")]));
        assert_eq!(
            parse_template("@media print { &:hover }"),
            at_rule("media", "print", vec![rule("&:hover", vec![statement("slot", "")])])
        );
        assert_eq!(
            parse_template("@supports (display: grid) {}"),
            at_rule("supports", "(display: grid)", vec![statement("slot", "")])
        );
    }
}
