//! Turning a candidate's value and modifier into CSS values.

use classname::{Candidate, CandidateValue, Modifier};

use crate::theme::legacy::is_number;
use crate::theme::{ConfigMap, ConfigValue, Theme};
use crate::value::{DataType, infer_data_type, with_alpha, with_negative};

/// Where bare values come from.
#[derive(Clone, Debug, Default)]
pub enum Values {
    #[default]
    None,
    /// Theme namespaces searched in order: `["--background-color", "--color"]`.
    Theme(Vec<String>),
    /// A fixed table, possibly carrying a bare-value rule.
    Table(ConfigMap),
}

/// Which modifiers a utility accepts.
#[derive(Clone, Debug, Default)]
pub enum ModifierPolicy {
    #[default]
    None,
    Any,
    Table(ConfigMap),
    /// Named modifiers resolve through theme namespaces, `text-sm/6`
    /// through `--leading`; numbers go through the bare handler.
    Theme(Vec<String>),
}

/// Formats bare values a table does not list, `mt-7` → `calc(var(--spacing) * 7)`.
pub type BareFn = fn(&str) -> Option<String>;

/// How a functional utility resolves values.
#[derive(Clone, Debug, Default)]
pub struct ValueSpec {
    /// Accepted types for arbitrary values, in preference order. The first
    /// type also describes bare values.
    pub types: Vec<DataType>,
    pub values: Values,
    pub bare: Option<BareFn>,
    /// Used when the candidate has no value at all (`border`, `rounded`).
    pub default: Option<String>,
    pub modifiers: ModifierPolicy,
    pub supports_negative: bool,
    /// `w-1/2` → `calc(1/2 * 100%)`.
    pub fractions: bool,
    /// Fixed named values tried after the theme, `inset-full` → `100%`.
    /// Unlike static utilities these can be negated.
    pub keywords: Vec<(String, String)>,
}

/// A candidate value resolved to CSS.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    /// The final value, negated and opacity-mixed as needed.
    pub value: String,
    /// `None` for values taken from a table or theme.
    pub data_type: Option<DataType>,
    /// The resolved modifier for non-color utilities.
    pub modifier: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    Rejected,
    Halt,
    Value(Resolved),
}

impl ValueSpec {
    pub fn new(types: &[DataType]) -> Self {
        Self {
            types: types.to_vec(),
            ..Self::default()
        }
    }

    pub fn theme(mut self, namespaces: &[&str]) -> Self {
        self.values = Values::Theme(namespaces.iter().map(|ns| ns.to_string()).collect());
        self
    }

    pub fn table(mut self, table: ConfigMap) -> Self {
        self.values = Values::Table(table);
        self
    }

    pub fn bare(mut self, bare: BareFn) -> Self {
        self.bare = Some(bare);
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default = Some(value.to_string());
        self
    }

    pub fn modifiers(mut self, modifiers: ModifierPolicy) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn negative(mut self) -> Self {
        self.supports_negative = true;
        self
    }

    pub fn fractions(mut self) -> Self {
        self.fractions = true;
        self
    }

    pub fn keyword(mut self, name: &str, value: &str) -> Self {
        self.keywords.push((name.to_string(), value.to_string()));
        self
    }

    /// Typed `any` alongside other types.
    pub fn is_fallback(&self) -> bool {
        self.types.len() > 1 && self.types.contains(&DataType::Any)
    }

    fn is_color(&self) -> bool {
        self.types.first() == Some(&DataType::Color)
    }

    pub fn resolve(&self, candidate: &Candidate, theme: &Theme) -> Resolution {
        if candidate.negative && !self.supports_negative {
            return Resolution::Rejected;
        }

        let modifier = candidate.modifier();
        let (value, data_type, modifier) = match candidate.value() {
            None => match self.lookup_default(theme) {
                Some(value) => (value, None, modifier),
                None => return Resolution::Rejected,
            },
            Some(CandidateValue::Arbitrary { value, data_type }) => {
                let Some(data_type) = self.accept_arbitrary(value, data_type.as_deref()) else {
                    return Resolution::Rejected;
                };
                (value.clone(), Some(data_type), modifier)
            }
            Some(CandidateValue::Bare { value, fraction }) => {
                if let Some(fraction) = fraction {
                    if let Some(resolved) = self.lookup_fraction(fraction, theme) {
                        return self.finish(resolved, None, None, candidate.negative, theme);
                    }
                }
                match self.lookup_bare(value, theme) {
                    Some(resolved) => (resolved, None, modifier),
                    None => return Resolution::Rejected,
                }
            }
        };

        self.finish(value, data_type, modifier, candidate.negative, theme)
    }

    fn finish(
        &self,
        value: String,
        data_type: Option<DataType>,
        modifier: Option<&Modifier>,
        negative: bool,
        theme: &Theme,
    ) -> Resolution {
        let is_color = match data_type {
            Some(data_type) => data_type == DataType::Color,
            None => self.is_color(),
        };

        if is_color {
            let value = match modifier {
                None => value,
                Some(modifier) => match as_color(&value, modifier, theme) {
                    Some(value) => value,
                    None => return Resolution::Halt,
                },
            };
            return Resolution::Value(Resolved {
                value,
                data_type,
                modifier: None,
            });
        }

        let modifier = match modifier {
            None => None,
            Some(modifier) => match self.resolve_modifier(modifier, theme) {
                Some(modifier) => Some(modifier),
                None => return Resolution::Halt,
            },
        };

        let value = if negative { with_negative(&value) } else { value };

        Resolution::Value(Resolved {
            value,
            data_type,
            modifier,
        })
    }

    fn accept_arbitrary(&self, value: &str, hint: Option<&str>) -> Option<DataType> {
        if let Some(hint) = hint {
            let data_type = DataType::from_name(hint)?;
            let declared = self.types.contains(&data_type) || self.types.contains(&DataType::Any);
            let conforms = data_type == DataType::Any
                || value.starts_with("var(")
                || infer_data_type(value, &[data_type]).is_some();
            return (declared && conforms).then_some(data_type);
        }

        if let Some(data_type) = infer_data_type(value, &self.types) {
            return Some(data_type);
        }
        if self.types.contains(&DataType::Any) {
            return Some(DataType::Any);
        }
        if value.starts_with("var(") {
            return self.types.first().copied();
        }
        None
    }

    fn lookup_default(&self, theme: &Theme) -> Option<String> {
        let found = match &self.values {
            Values::None => None,
            Values::Theme(namespaces) => theme.resolve(None, &as_strs(namespaces)),
            Values::Table(table) => table.get("DEFAULT").and_then(table_string),
        };
        found.or_else(|| self.default.clone())
    }

    fn lookup_fraction(&self, fraction: &str, theme: &Theme) -> Option<String> {
        let found = match &self.values {
            Values::None => None,
            Values::Theme(namespaces) => theme.resolve(Some(fraction), &as_strs(namespaces)),
            Values::Table(table) => match table.get(fraction).and_then(table_string) {
                Some(value) => Some(value),
                None => table
                    .bare
                    .filter(|bare| bare.consumes_modifier())
                    .and_then(|bare| {
                        let (num, _) = fraction.split_once('/')?;
                        bare.format(num, Some(fraction))
                    }),
            },
        };
        found.or_else(|| {
            let (num, den) = fraction.split_once('/')?;
            let nonzero = den.parse::<f64>().is_ok_and(|d| d != 0.0);
            (self.fractions && is_number(num) && is_number(den) && nonzero)
                .then(|| format!("calc({fraction} * 100%)"))
        })
    }

    fn lookup_bare(&self, value: &str, theme: &Theme) -> Option<String> {
        let value = if self.is_color() {
            match value {
                "current" => "currentcolor",
                other => other,
            }
        } else {
            value
        };

        if self.is_color() && matches!(value, "inherit" | "transparent" | "currentcolor") {
            if let Some(found) = self.lookup_table(value, theme) {
                return Some(found);
            }
            return Some(value.to_string());
        }

        self.lookup_table(value, theme)
            .or_else(|| {
                self.keywords
                    .iter()
                    .find(|(name, _)| name == value)
                    .map(|(_, keyword)| keyword.clone())
            })
            .or_else(|| match &self.values {
                Values::Table(table) => table
                    .bare
                    .filter(|bare| !bare.consumes_modifier())
                    .and_then(|bare| bare.format(value, None)),
                _ => None,
            })
            .or_else(|| self.bare.and_then(|bare| bare(value)))
    }

    fn lookup_table(&self, value: &str, theme: &Theme) -> Option<String> {
        match &self.values {
            Values::None => None,
            Values::Theme(namespaces) => theme.resolve(Some(value), &as_strs(namespaces)),
            Values::Table(table) => table.get(value).and_then(table_string),
        }
    }

    fn resolve_modifier(&self, modifier: &Modifier, theme: &Theme) -> Option<String> {
        match (&self.modifiers, modifier) {
            (ModifierPolicy::None, _) => None,
            (_, Modifier::Arbitrary(value)) => Some(value.clone()),
            (ModifierPolicy::Any, Modifier::Named(value)) => Some(value.clone()),
            (ModifierPolicy::Table(table), Modifier::Named(value)) => {
                table.get(value).and_then(table_string)
            }
            (ModifierPolicy::Theme(namespaces), Modifier::Named(value)) => theme
                .resolve(Some(value), &as_strs(namespaces))
                .or_else(|| self.bare.and_then(|bare| bare(value))),
        }
    }
}

/// Applies an opacity modifier to a color. Named modifiers read the
/// `--opacity` namespace first, then plain numbers mean percentages.
pub fn as_color(color: &str, modifier: &Modifier, theme: &Theme) -> Option<String> {
    let alpha = match modifier {
        Modifier::Arbitrary(value) => value.clone(),
        Modifier::Named(value) => match theme.resolve(Some(value), &["--opacity"]) {
            Some(alpha) => alpha,
            None if is_number(value) => format!("{value}%"),
            None => return None,
        },
    };
    Some(with_alpha(color, &alpha))
}

fn as_strs(namespaces: &[String]) -> Vec<&str> {
    namespaces.iter().map(String::as_str).collect()
}

fn table_string(value: &ConfigValue) -> Option<String> {
    match value {
        ConfigValue::Str(value) => Some(value.clone()),
        ConfigValue::List(items) => {
            let parts: Vec<&str> = items.iter().filter_map(ConfigValue::as_str).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        ConfigValue::Map(map) => map.get("DEFAULT").and_then(table_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeOptions;
    use classname::CandidateKind;
    use smallvec::SmallVec;

    fn candidate(value: Option<CandidateValue>, modifier: Option<Modifier>, negative: bool) -> Candidate {
        Candidate {
            raw: String::new(),
            kind: CandidateKind::Functional {
                root: "x".into(),
                value,
                modifier,
            },
            variants: SmallVec::new(),
            negative,
            important: false,
        }
    }

    fn bare(value: &str) -> Option<CandidateValue> {
        Some(CandidateValue::Bare {
            value: value.into(),
            fraction: None,
        })
    }

    fn arbitrary(value: &str, hint: Option<&str>) -> Option<CandidateValue> {
        Some(CandidateValue::Arbitrary {
            value: value.into(),
            data_type: hint.map(Into::into),
        })
    }

    fn theme() -> Theme {
        let mut theme = Theme::new();
        theme.add("--spacing-4", "1rem", ThemeOptions::NONE);
        theme.add("--color-red-500", "#ef4444", ThemeOptions::NONE);
        theme.add("--opacity-half", "0.5", ThemeOptions::INLINE);
        theme
    }

    fn value_of(resolution: Resolution) -> String {
        match resolution {
            Resolution::Value(resolved) => resolved.value,
            other => panic!("expected a value, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_theme_value() {
        let spec = ValueSpec::new(&[DataType::Length]).theme(&["--spacing"]).negative();
        assert_eq!(
            value_of(spec.resolve(&candidate(bare("4"), None, true), &theme())),
            "calc(var(--spacing-4, 1rem) * -1)"
        );
    }

    #[test]
    fn test_negative_requires_support() {
        let spec = ValueSpec::new(&[DataType::Length]).theme(&["--spacing"]);
        assert_eq!(spec.resolve(&candidate(bare("4"), None, true), &theme()), Resolution::Rejected);
    }

    #[test]
    fn test_color_opacity() {
        let spec = ValueSpec::new(&[DataType::Color]).theme(&["--color"]);
        let t = theme();
        assert_eq!(
            value_of(spec.resolve(&candidate(bare("red-500"), Some(Modifier::Named("50".into())), false), &t)),
            "color-mix(in srgb, var(--color-red-500, #ef4444) 50%, transparent)"
        );
        assert_eq!(
            value_of(spec.resolve(&candidate(bare("red-500"), Some(Modifier::Named("half".into())), false), &t)),
            "color-mix(in srgb, var(--color-red-500, #ef4444) 50%, transparent)"
        );
        assert_eq!(
            value_of(spec.resolve(&candidate(bare("current"), Some(Modifier::Arbitrary("var(--x)".into())), false), &t)),
            "color-mix(in srgb, currentcolor calc(var(--x) * 100%), transparent)"
        );
        assert_eq!(
            spec.resolve(&candidate(bare("red-500"), Some(Modifier::Named("foo".into())), false), &t),
            Resolution::Halt
        );
    }

    #[test]
    fn test_unsupported_modifier_halts() {
        let spec = ValueSpec::new(&[DataType::Length]).theme(&["--spacing"]);
        assert_eq!(
            spec.resolve(&candidate(arbitrary("10px", None), Some(Modifier::Named("2".into())), false), &theme()),
            Resolution::Halt
        );
    }

    #[test]
    fn test_arbitrary_type_hints() {
        let spec = ValueSpec::new(&[DataType::Color]);
        let t = theme();
        assert_eq!(
            spec.resolve(&candidate(arbitrary("12px", None), None, false), &t),
            Resolution::Rejected
        );
        assert_eq!(
            spec.resolve(&candidate(arbitrary("red", Some("length")), None, false), &t),
            Resolution::Rejected
        );
        assert_eq!(
            value_of(spec.resolve(&candidate(arbitrary("var(--c)", Some("color")), None, false), &t)),
            "var(--c)"
        );
    }

    #[test]
    fn test_fractions_and_bare_fallback() {
        let spec = ValueSpec::new(&[DataType::Length])
            .theme(&["--spacing"])
            .bare(|v| is_number(v).then(|| format!("calc(var(--spacing) * {v})")))
            .fractions();
        let t = theme();
        let half = candidate(
            Some(CandidateValue::Bare {
                value: "1".into(),
                fraction: Some("1/2".into()),
            }),
            Some(Modifier::Named("2".into())),
            false,
        );
        assert_eq!(value_of(spec.resolve(&half, &t)), "calc(1/2 * 100%)");
        assert_eq!(
            value_of(spec.resolve(&candidate(bare("7"), None, false), &t)),
            "calc(var(--spacing) * 7)"
        );
    }

    #[test]
    fn test_zero_denominator_is_not_a_fraction() {
        let spec = ValueSpec::new(&[DataType::Length]).fractions();
        let by_zero = candidate(
            Some(CandidateValue::Bare {
                value: "1".into(),
                fraction: Some("1/0".into()),
            }),
            Some(Modifier::Named("0".into())),
            false,
        );
        assert_eq!(spec.resolve(&by_zero, &theme()), Resolution::Halt);
    }

    #[test]
    fn test_keywords_negate_literally() {
        let spec = ValueSpec::new(&[DataType::Length])
            .theme(&["--spacing"])
            .keyword("full", "100%")
            .negative();
        let t = theme();
        assert_eq!(value_of(spec.resolve(&candidate(bare("full"), None, false), &t)), "100%");
        assert_eq!(value_of(spec.resolve(&candidate(bare("full"), None, true), &t)), "-100%");
        assert_eq!(spec.resolve(&candidate(bare("half"), None, false), &t), Resolution::Rejected);
    }

    #[test]
    fn test_table_with_bare_values() {
        let mut table = ConfigMap::new().with("slow", "800ms");
        table.bare = Some(crate::theme::BareValue::Suffix("ms"));
        let spec = ValueSpec::new(&[DataType::Any]).table(table);
        let t = Theme::new();
        assert_eq!(value_of(spec.resolve(&candidate(bare("slow"), None, false), &t)), "800ms");
        assert_eq!(value_of(spec.resolve(&candidate(bare("316"), None, false), &t)), "316ms");
        assert_eq!(spec.resolve(&candidate(bare("fast"), None, false), &t), Resolution::Rejected);
    }
}
