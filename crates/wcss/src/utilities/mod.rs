//! The utility registry.
//!
//! Utilities are stored per root name in registration order. A root may have
//! any number of definitions:
//!
//! - **Static** utilities (`flex`, `sr-only`) have a fixed body. Registering
//!   the same static name twice appends to the existing body.
//! - **Functional** utilities (`bg-*`, `m-*`) compile a candidate's value and
//!   modifier into declarations. Most are built from a [`ValueSpec`]; the
//!   `@utility` directive registers hand-written compile functions.
//!
//! Functional definitions are tried in order and the first one that accepts
//! the candidate's value decides the outcome, even if it then rejects the
//! modifier. Definitions marked as *fallback* (typed `any` among other types)
//! are only tried once every regular definition declined.

pub mod builtin;
mod resolve;

use std::collections::HashMap;
use std::sync::Arc;

use classname::Candidate;

use crate::ast::AstNode;
use crate::theme::Theme;

pub use resolve::{ModifierPolicy, Resolution, Resolved, ValueSpec, Values, as_color};

/// The result of running one definition against a candidate.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The definition does not apply; try the next one.
    Rejected,
    /// The definition claimed the candidate but cannot compile it. Stop.
    Halt,
    Nodes(Vec<AstNode>),
}

pub type UtilityFn = Arc<dyn Fn(&Candidate, &Theme) -> Outcome + Send + Sync>;

#[derive(Clone)]
pub enum Utility {
    Static(Vec<AstNode>),
    Functional { compile: UtilityFn, fallback: bool },
}

impl std::fmt::Debug for Utility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Utility::Static(nodes) => f.debug_tuple("Static").field(nodes).finish(),
            Utility::Functional { fallback, .. } => f
                .debug_struct("Functional")
                .field("fallback", fallback)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Utilities {
    by_name: HashMap<String, Vec<Utility>>,
    names: Vec<String>,
}

impl Utilities {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, name: &str) -> &mut Vec<Utility> {
        if !self.by_name.contains_key(name) {
            self.names.push(name.to_string());
        }
        self.by_name.entry(name.to_string()).or_default()
    }

    /// Registers a static utility, merging into an existing one of the same
    /// name.
    pub fn static_utility(&mut self, name: &str, nodes: Vec<AstNode>) {
        let definitions = self.entry(name);
        for definition in definitions.iter_mut() {
            if let Utility::Static(existing) = definition {
                existing.extend(nodes);
                return;
            }
        }
        definitions.push(Utility::Static(nodes));
    }

    pub fn functional(&mut self, name: &str, compile: UtilityFn) {
        self.entry(name).push(Utility::Functional {
            compile,
            fallback: false,
        });
    }

    pub fn fallback(&mut self, name: &str, compile: UtilityFn) {
        self.entry(name).push(Utility::Functional {
            compile,
            fallback: true,
        });
    }

    /// Registers a functional utility whose value is resolved by `spec` and
    /// turned into declarations by `handler`.
    pub fn with_value(
        &mut self,
        name: &str,
        spec: ValueSpec,
        handler: impl Fn(&Resolved) -> Vec<AstNode> + Send + Sync + 'static,
    ) {
        let fallback = spec.is_fallback();
        let compile: UtilityFn = Arc::new(move |candidate, theme| {
            match spec.resolve(candidate, theme) {
                Resolution::Rejected => Outcome::Rejected,
                Resolution::Halt => Outcome::Halt,
                Resolution::Value(resolved) => {
                    let nodes = handler(&resolved);
                    if nodes.is_empty() {
                        Outcome::Rejected
                    } else {
                        Outcome::Nodes(nodes)
                    }
                }
            }
        });
        self.entry(name).push(Utility::Functional { compile, fallback });
    }

    pub fn has_static(&self, name: &str) -> bool {
        self.by_name
            .get(name)
            .is_some_and(|defs| defs.iter().any(|d| matches!(d, Utility::Static(_))))
    }

    pub fn has_functional(&self, name: &str) -> bool {
        self.by_name.get(name).is_some_and(|defs| {
            defs.iter()
                .any(|d| matches!(d, Utility::Functional { .. }))
        })
    }

    pub fn get(&self, name: &str) -> &[Utility] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Root names in first-registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Compiles a static candidate to its registered body.
    pub fn compile_static(&self, name: &str) -> Option<Vec<AstNode>> {
        self.get(name).iter().find_map(|d| match d {
            Utility::Static(nodes) => Some(nodes.clone()),
            Utility::Functional { .. } => None,
        })
    }

    /// Compiles a functional candidate. Returns `None` when no definition
    /// produced output.
    pub fn compile_functional(&self, root: &str, candidate: &Candidate, theme: &Theme) -> Option<Vec<AstNode>> {
        let definitions = self.get(root);
        for pass_fallback in [false, true] {
            for definition in definitions {
                let Utility::Functional { compile, fallback } = definition else {
                    continue;
                };
                if *fallback != pass_fallback {
                    continue;
                }
                match compile(candidate, theme) {
                    Outcome::Rejected => continue,
                    Outcome::Halt => return None,
                    Outcome::Nodes(nodes) => return Some(nodes),
                }
            }
        }
        None
    }
}

/// Whether `name` is usable as a utility name: a lowercase letter followed
/// by letters, digits and `/ % . _ -`.
///
/// ```
/// use wcss::utilities::is_valid_utility_name;
///
/// assert!(is_valid_utility_name("tab-4"));
/// assert!(is_valid_utility_name("w-1/2"));
/// assert!(!is_valid_utility_name("-bad"));
/// assert!(!is_valid_utility_name("foo > *"));
/// ```
pub fn is_valid_utility_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '%' | '.' | '_' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::decl;
    use classname::{CandidateKind, CandidateValue};
    use smallvec::SmallVec;

    fn functional(root: &str, value: &str) -> Candidate {
        Candidate {
            raw: format!("{root}-{value}"),
            kind: CandidateKind::Functional {
                root: root.into(),
                value: Some(CandidateValue::Bare {
                    value: value.into(),
                    fraction: None,
                }),
                modifier: None,
            },
            variants: SmallVec::new(),
            negative: false,
            important: false,
        }
    }

    fn fixed(outcome: Outcome) -> UtilityFn {
        Arc::new(move |_, _| outcome.clone())
    }

    #[test]
    fn test_static_utilities_merge() {
        let mut utilities = Utilities::new();
        utilities.static_utility("foo", vec![decl("color", "red")]);
        utilities.static_utility("foo", vec![decl("color", "blue")]);
        assert_eq!(
            utilities.compile_static("foo"),
            Some(vec![decl("color", "red"), decl("color", "blue")])
        );
        assert_eq!(utilities.get("foo").len(), 1);
    }

    #[test]
    fn test_first_accepting_definition_wins() {
        let mut utilities = Utilities::new();
        utilities.functional("tab", fixed(Outcome::Rejected));
        utilities.functional("tab", fixed(Outcome::Nodes(vec![decl("tab-size", "2")])));
        utilities.functional("tab", fixed(Outcome::Nodes(vec![decl("tab-size", "4")])));
        assert_eq!(
            utilities.compile_functional("tab", &functional("tab", "2"), &Theme::new()),
            Some(vec![decl("tab-size", "2")])
        );
    }

    #[test]
    fn test_halt_stops_the_scan() {
        let mut utilities = Utilities::new();
        utilities.functional("tab", fixed(Outcome::Halt));
        utilities.functional("tab", fixed(Outcome::Nodes(vec![decl("tab-size", "4")])));
        assert_eq!(
            utilities.compile_functional("tab", &functional("tab", "2"), &Theme::new()),
            None
        );
    }

    #[test]
    fn test_fallback_definitions_run_last() {
        let mut utilities = Utilities::new();
        utilities.fallback("x", fixed(Outcome::Nodes(vec![decl("a", "fallback")])));
        utilities.functional("x", fixed(Outcome::Nodes(vec![decl("a", "normal")])));
        assert_eq!(
            utilities.compile_functional("x", &functional("x", "1"), &Theme::new()),
            Some(vec![decl("a", "normal")])
        );
    }
}
