//! The variant registry.
//!
//! A variant wraps a utility's body: `hover:` nests it in `&:hover`, `md:` in
//! `@media (width >= 48rem)`. Variants are applied to a rule whose selector is
//! `&`, innermost first, so `a:b:util` ends up with `a` outside `b`.
//!
//! Registration order is cascade order. Variants registered inside a
//! [`group`](Variants::group) share one order slot and are ranked among
//! themselves by the group's comparator (breakpoints compare by size).

pub mod builtin;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use bitflags::bitflags;
use classname::{Variant, VariantKind, VariantValue, segment};

use crate::ast::{AstNode, at_rule, rule, substitute_slot, walk};

bitflags! {
    /// What a variant produces, and so what a compound variant may wrap.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Compounds: u8 {
        const NEVER = 0;
        const AT_RULES = 1 << 0;
        const STYLE_RULES = 1 << 1;
    }
}

/// Mutates the `&` rule (or a compound's wrapper node). `None` means the
/// variant cannot apply and the candidate produces nothing.
pub type ApplyFn = Arc<dyn Fn(&mut AstNode, &Variant) -> Option<()> + Send + Sync>;

pub type CompareFn = Arc<dyn Fn(&Variant, &Variant) -> Ordering + Send + Sync>;

#[derive(Clone)]
pub struct VariantDef {
    pub kind: VariantKind,
    pub compounds: Compounds,
    /// For compound variants: what the wrapped variant must produce.
    pub compounds_with: Compounds,
    pub order: usize,
    apply: ApplyFn,
}

impl std::fmt::Debug for VariantDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantDef")
            .field("kind", &self.kind)
            .field("compounds", &self.compounds)
            .field("compounds_with", &self.compounds_with)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Default)]
pub struct Variants {
    defs: HashMap<String, VariantDef>,
    compare_fns: HashMap<usize, CompareFn>,
    last_order: usize,
    group_order: Option<usize>,
}

impl Variants {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_order(&self) -> usize {
        self.group_order.unwrap_or(self.last_order + 1)
    }

    fn set(
        &mut self,
        name: &str,
        kind: VariantKind,
        apply: ApplyFn,
        compounds: Compounds,
        compounds_with: Compounds,
    ) {
        if let Some(existing) = self.defs.get_mut(name) {
            existing.kind = kind;
            existing.apply = apply;
            existing.compounds = compounds;
            existing.compounds_with = compounds_with;
            return;
        }

        let order = self.next_order();
        self.last_order = self.last_order.max(order);
        self.defs.insert(
            name.to_string(),
            VariantDef {
                kind,
                compounds,
                compounds_with,
                order,
                apply,
            },
        );
    }

    /// Registers a static variant with a custom apply function.
    pub fn static_variant(
        &mut self,
        name: &str,
        apply: impl Fn(&mut AstNode) -> Option<()> + Send + Sync + 'static,
        compounds: Compounds,
    ) {
        self.set(
            name,
            VariantKind::Static,
            Arc::new(move |node, _| apply(node)),
            compounds,
            Compounds::NEVER,
        );
    }

    /// Registers a static variant that nests the body in each of `selectors`.
    /// Selectors starting with `@` become at-rules.
    pub fn static_selectors(&mut self, name: &str, selectors: &[&str]) {
        let compounds = compounds_for_selectors(selectors);
        self.static_selectors_with(name, selectors, compounds);
    }

    pub fn static_selectors_with(&mut self, name: &str, selectors: &[&str], compounds: Compounds) {
        let selectors: Vec<String> = selectors.iter().map(|s| s.to_string()).collect();
        self.static_variant(
            name,
            move |node| {
                let body = std::mem::take(node.children_mut()?);
                *node.children_mut()? = join_selector_rules(
                    selectors
                        .iter()
                        .map(|selector| rule(selector.as_str(), body.clone()))
                        .collect(),
                );
                Some(())
            },
            compounds,
        );
    }

    /// Registers a static variant from a CSS body containing `@slot`.
    pub fn from_ast(&mut self, name: &str, template: Vec<AstNode>) {
        let mut selectors = Vec::new();
        walk(&template, &mut |node| match node {
            AstNode::Rule(r) => selectors.push(r.selector.clone()),
            AstNode::AtRule(a) if a.name != "slot" => {
                selectors.push(format!("@{} {}", a.name, a.params));
            }
            _ => {}
        });
        let selectors: Vec<&str> = selectors.iter().map(String::as_str).collect();
        let compounds = compounds_for_selectors(&selectors);
        let template = join_selector_rules(template);

        self.static_variant(
            name,
            move |node| {
                let body = std::mem::take(node.children_mut()?);
                let mut wrapped = template.clone();
                substitute_slot(&mut wrapped, &body);
                *node.children_mut()? = wrapped;
                Some(())
            },
            compounds,
        );
    }

    pub fn functional(
        &mut self,
        name: &str,
        apply: impl Fn(&mut AstNode, &Variant) -> Option<()> + Send + Sync + 'static,
        compounds: Compounds,
    ) {
        self.set(
            name,
            VariantKind::Functional,
            Arc::new(apply),
            compounds,
            Compounds::NEVER,
        );
    }

    pub fn compound(
        &mut self,
        name: &str,
        compounds_with: Compounds,
        apply: impl Fn(&mut AstNode, &Variant) -> Option<()> + Send + Sync + 'static,
        compounds: Compounds,
    ) {
        self.set(
            name,
            VariantKind::Compound,
            Arc::new(apply),
            compounds,
            compounds_with,
        );
    }

    /// Registers everything `f` registers under one shared order, ranked
    /// among itself by `compare`.
    pub fn group(&mut self, compare: Option<CompareFn>, f: impl FnOnce(&mut Self)) {
        let order = self.next_order();
        self.group_order = Some(order);
        if let Some(compare) = compare {
            self.compare_fns.insert(order, compare);
        }
        f(self);
        self.group_order = None;
    }

    /// Registers everything `f` registers into the order slot of the
    /// existing variant `existing`, so it is ranked by that group's
    /// comparator. Falls back to a fresh slot when `existing` is unknown.
    pub fn in_group_of(&mut self, existing: &str, f: impl FnOnce(&mut Self)) {
        self.group_order = self.defs.get(existing).map(|def| def.order);
        f(self);
        self.group_order = None;
    }

    pub fn get(&self, name: &str) -> Option<&VariantDef> {
        self.defs.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    pub fn kind(&self, name: &str) -> Option<VariantKind> {
        self.defs.get(name).map(|def| def.kind)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.defs.keys().map(String::as_str)
    }

    /// Whether the compound variant `parent` can wrap `child`.
    pub fn compounds_with(&self, parent: &str, child: &Variant) -> bool {
        let Some(parent) = self.defs.get(parent) else {
            return false;
        };
        if parent.kind != VariantKind::Compound || parent.compounds_with.is_empty() {
            return false;
        }

        let child = match child {
            Variant::Arbitrary { selector, .. } => compounds_for_selectors(&[selector.as_str()]),
            other => match other.root().and_then(|root| self.defs.get(root)) {
                Some(def) => def.compounds,
                None => return false,
            },
        };
        !child.is_empty() && parent.compounds_with.intersects(child)
    }

    /// Applies `variant` to `node`, a rule or a compound's wrapper.
    pub fn apply(&self, node: &mut AstNode, variant: &Variant, depth: usize) -> Option<()> {
        match variant {
            Variant::Arbitrary { selector, relative } => {
                if *relative && depth == 0 {
                    return None;
                }
                let body = std::mem::take(node.children_mut()?);
                *node.children_mut()? = vec![rule(selector.as_str(), body)];
                Some(())
            }
            Variant::Compound {
                root,
                variant: inner,
                ..
            } => {
                let def = self.defs.get(root)?;

                let mut isolated = at_rule("slot", "", Vec::new());
                self.apply(&mut isolated, inner, depth + 1)?;
                let mut wrappers = std::mem::take(isolated.children_mut()?);

                if root == "not" && wrappers.len() > 1 {
                    return None;
                }
                for wrapper in &mut wrappers {
                    if !matches!(wrapper, AstNode::Rule(_) | AstNode::AtRule(_)) {
                        return None;
                    }
                    (def.apply)(wrapper, variant)?;
                }

                let body = std::mem::take(node.children_mut()?);
                fill_leaves(&mut wrappers, &body);
                *node.children_mut()? = wrappers;
                Some(())
            }
            Variant::Static { root } | Variant::Functional { root, .. } => {
                let def = self.defs.get(root)?;
                (def.apply)(node, variant)
            }
        }
    }

    /// Orders two variants: registration order first, then the group's
    /// comparator, then the value. Arbitrary variants sort last.
    pub fn compare(&self, a: &Variant, z: &Variant) -> Ordering {
        if a == z {
            return Ordering::Equal;
        }

        let (a_root, z_root) = match (a, z) {
            (Variant::Arbitrary { selector: x, .. }, Variant::Arbitrary { selector: y, .. }) => {
                return x.cmp(y);
            }
            (Variant::Arbitrary { .. }, _) => return Ordering::Greater,
            (_, Variant::Arbitrary { .. }) => return Ordering::Less,
            (a, z) => match (a.root(), z.root()) {
                (Some(a_root), Some(z_root)) => (a_root, z_root),
                _ => return Ordering::Equal,
            },
        };

        let a_order = self.defs.get(a_root).map_or(usize::MAX, |d| d.order);
        let z_order = self.defs.get(z_root).map_or(usize::MAX, |d| d.order);
        if a_order != z_order {
            return a_order.cmp(&z_order);
        }

        if let (
            Variant::Compound {
                variant: a_inner,
                modifier: a_modifier,
                ..
            },
            Variant::Compound {
                variant: z_inner,
                modifier: z_modifier,
                ..
            },
        ) = (a, z)
        {
            return self
                .compare(a_inner, z_inner)
                .then_with(|| a_modifier.cmp(z_modifier));
        }

        if let Some(compare) = self.compare_fns.get(&a_order) {
            return compare(a, z);
        }

        if a_root != z_root {
            return a_root.cmp(z_root);
        }

        let value = |v: &Variant| match v {
            Variant::Functional { value, .. } => value.clone(),
            _ => None,
        };
        compare_values(value(a).as_ref(), value(z).as_ref())
            .then_with(|| a.modifier().cmp(&z.modifier()))
    }

    /// Assigns an order index to each distinct variant. Variants that compare
    /// equal share an index.
    pub fn order_indices<'a>(&self, variants: impl IntoIterator<Item = &'a Variant>) -> HashMap<Variant, usize> {
        let mut unique: Vec<&Variant> = Vec::new();
        for variant in variants {
            if !unique.contains(&variant) {
                unique.push(variant);
            }
        }
        unique.sort_by(|a, z| self.compare(a, z));

        let mut indices = HashMap::with_capacity(unique.len());
        let mut index = 0;
        for (i, variant) in unique.iter().enumerate() {
            if i > 0 && self.compare(unique[i - 1], variant) != Ordering::Equal {
                index += 1;
            }
            indices.insert((*variant).clone(), index);
        }
        indices
    }
}

/// Bare values before arbitrary ones, no value before both.
fn compare_values(a: Option<&VariantValue>, z: Option<&VariantValue>) -> Ordering {
    match (a, z) {
        (None, None) => Ordering::Equal,
        (None, _) => Ordering::Less,
        (_, None) => Ordering::Greater,
        (Some(a), Some(z)) => match (a.is_arbitrary(), z.is_arbitrary()) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => a.as_str().cmp(z.as_str()),
        },
    }
}

/// Fills every empty block in `nodes` with `body`, without descending into
/// the filled blocks.
fn fill_leaves(nodes: &mut [AstNode], body: &[AstNode]) {
    for node in nodes.iter_mut() {
        let is_block = matches!(node, AstNode::Rule(_))
            || matches!(node, AstNode::AtRule(a) if a.block);
        if !is_block {
            continue;
        }
        if let Some(children) = node.children_mut() {
            if children.is_empty() {
                *children = body.to_vec();
            } else {
                fill_leaves(children, body);
            }
        }
    }
}

/// Works out what a list of variant selectors produces. Pseudo-elements and
/// at-rules other than `@media`, `@supports` and `@container` never compound.
///
/// ```
/// use wcss::variants::{compounds_for_selectors, Compounds};
///
/// assert_eq!(compounds_for_selectors(&["&:hover"]), Compounds::STYLE_RULES);
/// assert_eq!(compounds_for_selectors(&["@media print"]), Compounds::AT_RULES);
/// assert_eq!(compounds_for_selectors(&["&::before"]), Compounds::NEVER);
/// ```
pub fn compounds_for_selectors(selectors: &[&str]) -> Compounds {
    let mut compounds = Compounds::NEVER;
    for selector in selectors {
        if selector.starts_with('@') {
            if !["@media", "@supports", "@container"]
                .iter()
                .any(|prefix| selector.starts_with(prefix))
            {
                return Compounds::NEVER;
            }
            compounds |= Compounds::AT_RULES;
            continue;
        }
        if selector.contains("::") {
            return Compounds::NEVER;
        }
        compounds |= Compounds::STYLE_RULES;
    }
    compounds
}

/// Whether `name` can be registered as a variant: lowercase letters, digits,
/// `-` and `_`, not starting or ending with `-` or `_`.
///
/// ```
/// use wcss::variants::is_valid_variant_name;
///
/// assert!(is_valid_variant_name("hocus"));
/// assert!(is_valid_variant_name("theme-midnight"));
/// assert!(!is_valid_variant_name("-bad"));
/// assert!(!is_valid_variant_name("Bad"));
/// ```
pub fn is_valid_variant_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(['-', '_'])
        && !name.ends_with(['-', '_'])
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_'))
}

/// Wraps a selector list in `:is()` when it has more than one entry.
/// Merges sibling style rules with identical bodies into one selector list:
/// `&:hover { x } &:focus { x }` becomes `&:hover, &:focus { x }`. At-rules
/// are left as they are.
pub(crate) fn join_selector_rules(nodes: Vec<AstNode>) -> Vec<AstNode> {
    let mut joined: Vec<AstNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let AstNode::Rule(next) = &node {
            let same_body = joined.iter_mut().find_map(|existing| match existing {
                AstNode::Rule(r) if r.nodes == next.nodes => Some(r),
                _ => None,
            });
            if let Some(existing) = same_body {
                existing.selector = format!("{}, {}", existing.selector, next.selector);
                continue;
            }
        }
        joined.push(node);
    }
    joined
}

pub(crate) fn wrap_list(selector: &str) -> String {
    if segment(selector, ',').len() > 1 {
        format!(":is({selector})")
    } else {
        selector.to_string()
    }
}
