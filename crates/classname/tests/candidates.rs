use classname::{
    Candidate, CandidateKind, CandidateValue, Modifier, Registry, Variant, VariantKind,
    VariantValue, parse_candidate, parse_variant, segment,
};

struct Names;

impl Registry for Names {
    fn has_static_utility(&self, name: &str) -> bool {
        matches!(name, "flex" | "underline" | "sr-only")
    }

    fn has_functional_utility(&self, root: &str) -> bool {
        matches!(root, "bg" | "text" | "mt" | "w" | "grid-cols" | "translate-x")
    }

    fn variant_kind(&self, root: &str) -> Option<VariantKind> {
        match root {
            "hover" | "focus" | "md" | "dark" => Some(VariantKind::Static),
            "min" | "data" | "aria" | "supports" => Some(VariantKind::Functional),
            "group" | "peer" | "not" => Some(VariantKind::Compound),
            _ => None,
        }
    }

    fn compounds_with(&self, parent: &str, child: &Variant) -> bool {
        match parent {
            "not" => true,
            _ => !matches!(child, Variant::Compound { .. }),
        }
    }
}

fn single(input: &str) -> Candidate {
    let mut candidates = parse_candidate(input, &Names);
    assert_eq!(candidates.len(), 1, "expected one candidate for `{input}`: {candidates:?}");
    candidates.remove(0)
}

fn functional(candidate: &Candidate) -> (&str, Option<&CandidateValue>, Option<&Modifier>) {
    match &candidate.kind {
        CandidateKind::Functional {
            root,
            value,
            modifier,
        } => (root, value.as_ref(), modifier.as_ref()),
        other => panic!("expected a functional candidate, got {other:?}"),
    }
}

fn bare(value: &str) -> CandidateValue {
    CandidateValue::Bare {
        value: value.to_string(),
        fraction: None,
    }
}

// ============================================================================
// Utilities
// ============================================================================

#[test]
fn test_static_candidate() {
    let candidate = single("flex");
    assert_eq!(
        candidate.kind,
        CandidateKind::Static {
            root: "flex".into()
        }
    );
    assert!(candidate.variants.is_empty());
    assert!(!candidate.negative);
    assert!(!candidate.important);
}

#[test]
fn test_longest_registered_root_wins() {
    let candidate = single("grid-cols-3");
    let (root, value, _) = functional(&candidate);
    assert_eq!(root, "grid-cols");
    assert_eq!(value, Some(&bare("3")));
}

#[test]
fn test_named_modifier_and_fraction() {
    let candidate = single("w-1/2");
    let (root, value, modifier) = functional(&candidate);
    assert_eq!(root, "w");
    assert_eq!(
        value,
        Some(&CandidateValue::Bare {
            value: "1".into(),
            fraction: Some("1/2".into()),
        })
    );
    assert_eq!(modifier, Some(&Modifier::Named("2".into())));
}

#[test]
fn test_arbitrary_modifier() {
    let candidate = single("bg-red-500/[0.3]");
    let (_, _, modifier) = functional(&candidate);
    assert_eq!(modifier, Some(&Modifier::Arbitrary("0.3".into())));

    let candidate = single("bg-red-500/(--alpha)");
    let (_, _, modifier) = functional(&candidate);
    assert_eq!(modifier, Some(&Modifier::Arbitrary("var(--alpha)".into())));
}

#[test]
fn test_arbitrary_value_with_type_hint() {
    let candidate = single("text-[length:var(--size)]");
    let (root, value, _) = functional(&candidate);
    assert_eq!(root, "text");
    assert_eq!(
        value,
        Some(&CandidateValue::Arbitrary {
            value: "var(--size)".into(),
            data_type: Some("length".into()),
        })
    );
}

#[test]
fn test_arbitrary_value_decodes_underscores() {
    let candidate = single("grid-cols-[1fr_auto]");
    let (_, value, _) = functional(&candidate);
    assert_eq!(value.map(CandidateValue::as_str), Some("1fr auto"));
}

#[test]
fn test_custom_property_shorthand() {
    let candidate = single("bg-(--brand)");
    let (_, value, _) = functional(&candidate);
    assert_eq!(
        value,
        Some(&CandidateValue::Arbitrary {
            value: "var(--brand)".into(),
            data_type: None,
        })
    );
    assert!(parse_candidate("bg-(brand)", &Names).is_empty());
}

#[test]
fn test_negative_and_important() {
    let candidate = single("-translate-x-4!");
    assert!(candidate.negative);
    assert!(candidate.important);
    assert_eq!(candidate.raw, "-translate-x-4!");

    let candidate = single("!mt-2");
    assert!(candidate.important);
    assert!(!candidate.negative);
}

#[test]
fn test_arbitrary_property() {
    let candidate = single("[mask-type:luminance]");
    assert_eq!(
        candidate.kind,
        CandidateKind::ArbitraryProperty {
            property: "mask-type".into(),
            value: "luminance".into(),
            modifier: None,
        }
    );

    let candidate = single("[--gap:calc(1rem*2)]");
    assert!(matches!(
        &candidate.kind,
        CandidateKind::ArbitraryProperty { property, .. } if property == "--gap"
    ));
}

// ============================================================================
// Variants
// ============================================================================

#[test]
fn test_variant_stack_is_outermost_first() {
    let candidate = single("md:hover:underline");
    let roots: Vec<_> = candidate.variants.iter().filter_map(Variant::root).collect();
    assert_eq!(roots, vec!["md", "hover"]);
}

#[test]
fn test_functional_variants() {
    assert_eq!(
        parse_variant("data-[state=open]", &Names),
        Some(Variant::Functional {
            root: "data".into(),
            value: Some(VariantValue::Arbitrary("state=open".into())),
            modifier: None,
        })
    );
    assert_eq!(
        parse_variant("aria-checked", &Names),
        Some(Variant::Functional {
            root: "aria".into(),
            value: Some(VariantValue::Named("checked".into())),
            modifier: None,
        })
    );
}

#[test]
fn test_compound_variants() {
    let variant = parse_variant("group-hover/sidebar", &Names).unwrap();
    assert_eq!(
        variant,
        Variant::Compound {
            root: "group".into(),
            modifier: Some(Modifier::Named("sidebar".into())),
            variant: Box::new(Variant::Static {
                root: "hover".into()
            }),
        }
    );

    assert!(parse_variant("not-group-hover", &Names).is_some());
    assert!(parse_variant("group-not-hover", &Names).is_none());
}

#[test]
fn test_arbitrary_variants() {
    assert_eq!(
        parse_variant("[&>*]", &Names),
        Some(Variant::Arbitrary {
            selector: "&>*".into(),
            relative: false,
        })
    );
    assert_eq!(
        parse_variant("[@media(print)]", &Names),
        Some(Variant::Arbitrary {
            selector: "@media(print)".into(),
            relative: false,
        })
    );
}

#[test]
fn test_static_variant_rejects_values() {
    assert!(parse_variant("hover-foo", &Names).is_none());
    assert!(parse_variant("hover/50", &Names).is_none());
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_malformed_candidates_yield_nothing() {
    for input in [
        "",
        "   ",
        "hover:",
        ":flex",
        "hover::flex",
        "bg-[red",
        "bg-red]",
        "flex/",
        "unknown:flex",
        "bg-[]",
        "nothing-here",
        "[color red]",
        "-[color:red]",
    ] {
        assert!(
            parse_candidate(input, &Names).is_empty(),
            "`{input}` should not parse"
        );
    }
}

#[test]
fn test_segment_respects_brackets() {
    insta::assert_snapshot!(
        segment("md:[&:hover]:bg-[url(a:b)]", ':').join(" | "),
        @"md | [&:hover] | bg-[url(a:b)]"
    );
}
