//! Compiling one candidate into a rule.
//!
//! ```text
//! hover:bg-red-500/50
//!   utility   → background-color: color-mix(in srgb, var(--color-red-500, …) 50%, transparent)
//!   `&` rule  → & { background-color: … }
//!   variants  → & { &:hover { @media (hover: hover) { background-color: … } } }
//!   selector  → .hover\:bg-red-500\/50 { … }
//! ```

use classname::{Candidate, CandidateKind};

use crate::apply::substitute_at_apply;
use crate::ast::{AstNode, decl, mark_important, rule, walk};
use crate::css::escape_class_name;
use crate::design_system::DesignSystem;
use crate::error::Result;
use crate::utilities::as_color;

/// Compiles `candidate` into a rule selected by its escaped class name.
/// Candidates that produce nothing, or whose `@apply` chain loops, yield
/// `None`.
pub fn compile_candidate(ds: &DesignSystem, candidate: &Candidate) -> Option<AstNode> {
    let mut node = match compile_nodes(ds, candidate, &mut Vec::new()) {
        Ok(node) => node?,
        Err(error) => {
            log::warn!("dropping `{}`: {error}", candidate.raw);
            return None;
        }
    };

    if let AstNode::Rule(r) = &mut node {
        r.selector = format!(".{}", escape_class_name(&candidate.raw));
    }
    Some(node)
}

/// Compiles `candidate` into a `&` rule with its variants applied.
///
/// `stack` holds the candidates currently being applied; nested `@apply`
/// rules in the utility body are resolved against it.
pub(crate) fn compile_nodes(
    ds: &DesignSystem,
    candidate: &Candidate,
    stack: &mut Vec<String>,
) -> Result<Option<AstNode>> {
    let Some(mut nodes) = compile_base(ds, candidate) else {
        return Ok(None);
    };

    if has_apply(&nodes) {
        substitute_at_apply(&mut nodes, ds, stack)?;
    }
    if nodes.is_empty() {
        return Ok(None);
    }
    if candidate.important {
        mark_important(&mut nodes);
    }

    let mut node = rule("&", nodes);
    for variant in candidate.variants.iter().rev() {
        if ds.variants.apply(&mut node, variant, 0).is_none() {
            log::trace!("variant {variant:?} does not apply to `{}`", candidate.raw);
            return Ok(None);
        }
    }
    Ok(Some(node))
}

fn compile_base(ds: &DesignSystem, candidate: &Candidate) -> Option<Vec<AstNode>> {
    let nodes = match &candidate.kind {
        CandidateKind::Static { root } => ds.utilities.compile_static(root)?,
        CandidateKind::Functional { root, .. } => {
            ds.utilities.compile_functional(root, candidate, &ds.theme)?
        }
        CandidateKind::ArbitraryProperty {
            property,
            value,
            modifier,
        } => {
            let value = match modifier {
                Some(modifier) => as_color(value, modifier, &ds.theme)?,
                None => value.clone(),
            };
            vec![decl(property.as_str(), value)]
        }
    };
    (!nodes.is_empty()).then_some(nodes)
}

fn has_apply(nodes: &[AstNode]) -> bool {
    let mut found = false;
    walk(nodes, &mut |node| found |= node.is_at_rule("apply"));
    found
}
