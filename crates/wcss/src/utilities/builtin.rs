//! The built-in utility set.

use std::sync::Arc;

use classname::CandidateValue;

use crate::ast::{AstNode, at_rule, decl};
use crate::property::property;
use crate::theme::ConfigMap;
use crate::theme::legacy::{is_integer, is_number};
use crate::value::DataType;

use super::{ModifierPolicy, Outcome, Resolution, Resolved, Utilities, ValueSpec};

/// Registers every built-in utility.
pub fn register(utilities: &mut Utilities) {
    layout(utilities);
    spacing(utilities);
    sizing(utilities);
    flexbox_and_grid(utilities);
    colors(utilities);
    typography(utilities);
    borders(utilities);
    effects(utilities);
    transforms(utilities);
}

/// `mt-7` → `calc(var(--spacing) * 7)`; multiples of 0.25 only.
fn spacing_multiplier(value: &str) -> Option<String> {
    if value == "px" {
        return Some("1px".into());
    }
    let n: f64 = value.parse().ok()?;
    (is_number(value) && (n * 4.0).fract() == 0.0).then(|| format!("calc(var(--spacing) * {value})"))
}

fn integer(value: &str) -> Option<String> {
    is_integer(value).then(|| value.to_string())
}

fn percent(value: &str) -> Option<String> {
    is_number(value).then(|| format!("{value}%"))
}

fn degrees(value: &str) -> Option<String> {
    is_number(value).then(|| format!("{value}deg"))
}

fn pixels(value: &str) -> Option<String> {
    is_number(value).then(|| format!("{value}px"))
}

fn milliseconds(value: &str) -> Option<String> {
    is_integer(value).then(|| format!("{value}ms"))
}

fn statics(utilities: &mut Utilities, entries: &[(&str, &[(&str, &str)])]) {
    for (name, decls) in entries {
        utilities.static_utility(name, decls.iter().map(|(p, v)| decl(*p, *v)).collect());
    }
}

/// Registers `name` writing the resolved value to each of `properties`.
fn properties(utilities: &mut Utilities, name: &str, spec: ValueSpec, properties: &'static [&'static str]) {
    utilities.with_value(name, spec, move |resolved| {
        properties.iter().map(|p| decl(*p, &resolved.value)).collect()
    });
}

fn layout(utilities: &mut Utilities) {
    for (name, display) in [
        ("block", "block"),
        ("inline-block", "inline-block"),
        ("inline", "inline"),
        ("flex", "flex"),
        ("inline-flex", "inline-flex"),
        ("grid", "grid"),
        ("inline-grid", "inline-grid"),
        ("table", "table"),
        ("table-row", "table-row"),
        ("table-cell", "table-cell"),
        ("contents", "contents"),
        ("flow-root", "flow-root"),
        ("list-item", "list-item"),
        ("hidden", "none"),
    ] {
        utilities.static_utility(name, vec![decl("display", display)]);
    }

    for position in ["static", "fixed", "absolute", "relative", "sticky"] {
        utilities.static_utility(position, vec![decl("position", position)]);
    }

    statics(
        utilities,
        &[
            ("visible", &[("visibility", "visible")]),
            ("invisible", &[("visibility", "hidden")]),
            ("collapse", &[("visibility", "collapse")]),
            ("isolate", &[("isolation", "isolate")]),
            ("isolation-auto", &[("isolation", "auto")]),
            ("box-border", &[("box-sizing", "border-box")]),
            ("box-content", &[("box-sizing", "content-box")]),
            ("float-left", &[("float", "left")]),
            ("float-right", &[("float", "right")]),
            ("float-none", &[("float", "none")]),
            ("clear-both", &[("clear", "both")]),
            ("clear-none", &[("clear", "none")]),
            ("pointer-events-none", &[("pointer-events", "none")]),
            ("pointer-events-auto", &[("pointer-events", "auto")]),
            ("select-none", &[("-webkit-user-select", "none"), ("user-select", "none")]),
            ("select-text", &[("-webkit-user-select", "text"), ("user-select", "text")]),
            ("select-all", &[("-webkit-user-select", "all"), ("user-select", "all")]),
            ("select-auto", &[("-webkit-user-select", "auto"), ("user-select", "auto")]),
            (
                "sr-only",
                &[
                    ("position", "absolute"),
                    ("width", "1px"),
                    ("height", "1px"),
                    ("padding", "0"),
                    ("margin", "-1px"),
                    ("overflow", "hidden"),
                    ("clip", "rect(0, 0, 0, 0)"),
                    ("white-space", "nowrap"),
                    ("border-width", "0"),
                ],
            ),
            (
                "not-sr-only",
                &[
                    ("position", "static"),
                    ("width", "auto"),
                    ("height", "auto"),
                    ("padding", "0"),
                    ("margin", "0"),
                    ("overflow", "visible"),
                    ("clip", "auto"),
                    ("white-space", "normal"),
                ],
            ),
        ],
    );

    for value in ["auto", "hidden", "clip", "visible", "scroll"] {
        utilities.static_utility(&format!("overflow-{value}"), vec![decl("overflow", value)]);
        utilities.static_utility(&format!("overflow-x-{value}"), vec![decl("overflow-x", value)]);
        utilities.static_utility(&format!("overflow-y-{value}"), vec![decl("overflow-y", value)]);
    }

    let cursors = [
        "auto", "default", "pointer", "wait", "text", "move", "help", "not-allowed", "none",
        "progress", "cell", "crosshair", "grab", "grabbing", "zoom-in", "zoom-out",
    ]
    .into_iter()
    .map(|c| (c, c))
    .collect();
    properties(utilities, "cursor", ValueSpec::new(&[DataType::Any]).table(cursors), &["cursor"]);

    utilities.static_utility("z-auto", vec![decl("z-index", "auto")]);
    properties(
        utilities,
        "z",
        ValueSpec::new(&[DataType::Integer])
            .theme(&["--z-index"])
            .bare(integer)
            .negative(),
        &["z-index"],
    );

    let mut aspect: ConfigMap = [("auto", "auto"), ("square", "1 / 1"), ("video", "16 / 9")]
        .into_iter()
        .collect();
    aspect.bare = Some(crate::theme::BareValue::Ratio);
    properties(
        utilities,
        "aspect",
        ValueSpec::new(&[DataType::Ratio]).table(aspect),
        &["aspect-ratio"],
    );

    properties(
        utilities,
        "columns",
        ValueSpec::new(&[DataType::Integer])
            .theme(&["--columns", "--container"])
            .bare(integer),
        &["columns"],
    );
}

fn spacing(utilities: &mut Utilities) {
    let spacing = || {
        ValueSpec::new(&[DataType::Length, DataType::Percentage])
            .theme(&["--spacing"])
            .bare(spacing_multiplier)
    };

    const MARGINS: &[(&str, &[&str])] = &[
        ("m", &["margin"]),
        ("mx", &["margin-inline"]),
        ("my", &["margin-block"]),
        ("ms", &["margin-inline-start"]),
        ("me", &["margin-inline-end"]),
        ("mt", &["margin-top"]),
        ("mr", &["margin-right"]),
        ("mb", &["margin-bottom"]),
        ("ml", &["margin-left"]),
    ];
    const PADDINGS: &[(&str, &[&str])] = &[
        ("p", &["padding"]),
        ("px", &["padding-inline"]),
        ("py", &["padding-block"]),
        ("ps", &["padding-inline-start"]),
        ("pe", &["padding-inline-end"]),
        ("pt", &["padding-top"]),
        ("pr", &["padding-right"]),
        ("pb", &["padding-bottom"]),
        ("pl", &["padding-left"]),
    ];
    const INSETS: &[(&str, &[&str])] = &[
        ("inset", &["inset"]),
        ("inset-x", &["inset-inline"]),
        ("inset-y", &["inset-block"]),
        ("start", &["inset-inline-start"]),
        ("end", &["inset-inline-end"]),
        ("top", &["top"]),
        ("right", &["right"]),
        ("bottom", &["bottom"]),
        ("left", &["left"]),
    ];
    const GAPS: &[(&str, &[&str])] = &[
        ("gap", &["gap"]),
        ("gap-x", &["column-gap"]),
        ("gap-y", &["row-gap"]),
    ];

    for (name, props) in MARGINS {
        utilities.static_utility(&format!("{name}-auto"), props.iter().map(|p| decl(*p, "auto")).collect());
        properties(utilities, name, spacing().negative(), props);
    }
    for (name, props) in PADDINGS {
        properties(utilities, name, spacing(), props);
    }
    for (name, props) in INSETS {
        utilities.static_utility(&format!("{name}-auto"), props.iter().map(|p| decl(*p, "auto")).collect());
        properties(utilities, name, spacing().keyword("full", "100%").negative().fractions(), props);
    }
    for (name, props) in GAPS {
        properties(utilities, name, spacing(), props);
    }
}

fn sizing(utilities: &mut Utilities) {
    const SIZES: &[(&str, &[&str], &[&str], &str)] = &[
        ("w", &["width"], &["--width", "--spacing", "--container"], "vw"),
        ("min-w", &["min-width"], &["--min-width", "--spacing", "--container"], "vw"),
        ("max-w", &["max-width"], &["--max-width", "--spacing", "--container"], "vw"),
        ("h", &["height"], &["--height", "--spacing"], "vh"),
        ("min-h", &["min-height"], &["--min-height", "--spacing"], "vh"),
        ("max-h", &["max-height"], &["--max-height", "--spacing"], "vh"),
        ("size", &["width", "height"], &["--size", "--spacing"], ""),
    ];

    for (name, props, namespaces, screen) in SIZES {
        let keywords: &[(&str, &str)] = &[
            ("auto", "auto"),
            ("full", "100%"),
            ("min", "min-content"),
            ("max", "max-content"),
            ("fit", "fit-content"),
        ];
        for (keyword, value) in keywords {
            if name.starts_with("max") && *keyword == "auto" {
                continue;
            }
            utilities.static_utility(
                &format!("{name}-{keyword}"),
                props.iter().map(|p| decl(*p, *value)).collect(),
            );
        }
        if !screen.is_empty() {
            utilities.static_utility(
                &format!("{name}-screen"),
                props.iter().map(|p| decl(*p, format!("100{screen}"))).collect(),
            );
        }
        properties(
            utilities,
            name,
            ValueSpec::new(&[DataType::Length, DataType::Percentage])
                .theme(namespaces)
                .bare(spacing_multiplier)
                .fractions(),
            props,
        );
    }
}

fn flexbox_and_grid(utilities: &mut Utilities) {
    statics(
        utilities,
        &[
            ("flex-row", &[("flex-direction", "row")]),
            ("flex-row-reverse", &[("flex-direction", "row-reverse")]),
            ("flex-col", &[("flex-direction", "column")]),
            ("flex-col-reverse", &[("flex-direction", "column-reverse")]),
            ("flex-wrap", &[("flex-wrap", "wrap")]),
            ("flex-nowrap", &[("flex-wrap", "nowrap")]),
            ("flex-wrap-reverse", &[("flex-wrap", "wrap-reverse")]),
            ("flex-auto", &[("flex", "auto")]),
            ("flex-initial", &[("flex", "0 auto")]),
            ("flex-none", &[("flex", "none")]),
            ("order-first", &[("order", "-9999")]),
            ("order-last", &[("order", "9999")]),
            ("order-none", &[("order", "0")]),
            ("grid-cols-none", &[("grid-template-columns", "none")]),
            ("grid-cols-subgrid", &[("grid-template-columns", "subgrid")]),
            ("grid-rows-none", &[("grid-template-rows", "none")]),
            ("grid-rows-subgrid", &[("grid-template-rows", "subgrid")]),
            ("col-span-full", &[("grid-column", "1 / -1")]),
            ("row-span-full", &[("grid-row", "1 / -1")]),
        ],
    );

    for (prefix, property) in [
        ("items", "align-items"),
        ("self", "align-self"),
        ("justify", "justify-content"),
        ("content", "align-content"),
    ] {
        for (name, value) in [
            ("start", "flex-start"),
            ("end", "flex-end"),
            ("center", "center"),
            ("baseline", "baseline"),
            ("stretch", "stretch"),
            ("between", "space-between"),
            ("around", "space-around"),
            ("evenly", "space-evenly"),
        ] {
            let applies = match prefix {
                "items" | "self" => !matches!(name, "between" | "around" | "evenly"),
                _ => name != "baseline",
            };
            if applies {
                utilities.static_utility(&format!("{prefix}-{name}"), vec![decl(property, value)]);
            }
        }
    }

    properties(
        utilities,
        "flex",
        ValueSpec::new(&[DataType::Number]).bare(integer).fractions(),
        &["flex"],
    );
    utilities.with_value(
        "grow",
        ValueSpec::new(&[DataType::Number]).bare(integer).default_value("1"),
        |r| vec![decl("flex-grow", &r.value)],
    );
    utilities.with_value(
        "shrink",
        ValueSpec::new(&[DataType::Number]).bare(integer).default_value("1"),
        |r| vec![decl("flex-shrink", &r.value)],
    );
    properties(
        utilities,
        "basis",
        ValueSpec::new(&[DataType::Length, DataType::Percentage])
            .theme(&["--flex-basis", "--spacing", "--container"])
            .bare(spacing_multiplier)
            .fractions(),
        &["flex-basis"],
    );
    properties(
        utilities,
        "order",
        ValueSpec::new(&[DataType::Integer]).theme(&["--order"]).bare(integer).negative(),
        &["order"],
    );

    utilities.with_value(
        "grid-cols",
        ValueSpec::new(&[DataType::Any]).theme(&["--grid-template-columns"]).bare(integer),
        |r| vec![decl("grid-template-columns", grid_repeat(r))],
    );
    utilities.with_value(
        "grid-rows",
        ValueSpec::new(&[DataType::Any]).theme(&["--grid-template-rows"]).bare(integer),
        |r| vec![decl("grid-template-rows", grid_repeat(r))],
    );
    utilities.with_value(
        "col-span",
        ValueSpec::new(&[DataType::Integer]).bare(integer),
        |r| vec![decl("grid-column", format!("span {0} / span {0}", r.value))],
    );
    utilities.with_value(
        "row-span",
        ValueSpec::new(&[DataType::Integer]).bare(integer),
        |r| vec![decl("grid-row", format!("span {0} / span {0}", r.value))],
    );
}

fn grid_repeat(resolved: &Resolved) -> String {
    if resolved.data_type.is_none() && is_integer(&resolved.value) {
        format!("repeat({}, minmax(0, 1fr))", resolved.value)
    } else {
        resolved.value.clone()
    }
}

fn colors(utilities: &mut Utilities) {
    const COLORS: &[(&str, &[&str], &'static [&'static str])] = &[
        ("bg", &["--background-color", "--color"], &["background-color"]),
        ("text", &["--text-color", "--color"], &["color"]),
        ("fill", &["--fill", "--color"], &["fill"]),
        ("stroke", &["--stroke", "--color"], &["stroke"]),
        ("accent", &["--accent-color", "--color"], &["accent-color"]),
        ("caret", &["--caret-color", "--color"], &["caret-color"]),
        ("decoration", &["--text-decoration-color", "--color"], &["text-decoration-color"]),
        ("outline", &["--outline-color", "--color"], &["outline-color"]),
    ];

    for (name, namespaces, props) in COLORS {
        properties(utilities, name, ValueSpec::new(&[DataType::Color]).theme(namespaces), props);
    }

    properties(
        utilities,
        "bg",
        ValueSpec::new(&[DataType::Image, DataType::Url]).theme(&["--background-image"]),
        &["background-image"],
    );
    properties(
        utilities,
        "stroke",
        ValueSpec::new(&[DataType::Number, DataType::Length]).theme(&["--stroke-width"]).bare(integer),
        &["stroke-width"],
    );
}

fn typography(utilities: &mut Utilities) {
    statics(
        utilities,
        &[
            ("italic", &[("font-style", "italic")]),
            ("not-italic", &[("font-style", "normal")]),
            ("underline", &[("text-decoration-line", "underline")]),
            ("overline", &[("text-decoration-line", "overline")]),
            ("line-through", &[("text-decoration-line", "line-through")]),
            ("no-underline", &[("text-decoration-line", "none")]),
            ("uppercase", &[("text-transform", "uppercase")]),
            ("lowercase", &[("text-transform", "lowercase")]),
            ("capitalize", &[("text-transform", "capitalize")]),
            ("normal-case", &[("text-transform", "none")]),
            ("text-left", &[("text-align", "left")]),
            ("text-center", &[("text-align", "center")]),
            ("text-right", &[("text-align", "right")]),
            ("text-justify", &[("text-align", "justify")]),
            ("text-start", &[("text-align", "start")]),
            ("text-end", &[("text-align", "end")]),
            (
                "truncate",
                &[
                    ("overflow", "hidden"),
                    ("text-overflow", "ellipsis"),
                    ("white-space", "nowrap"),
                ],
            ),
            (
                "antialiased",
                &[
                    ("-webkit-font-smoothing", "antialiased"),
                    ("-moz-osx-font-smoothing", "grayscale"),
                ],
            ),
            (
                "subpixel-antialiased",
                &[
                    ("-webkit-font-smoothing", "auto"),
                    ("-moz-osx-font-smoothing", "auto"),
                ],
            ),
            ("whitespace-normal", &[("white-space", "normal")]),
            ("whitespace-nowrap", &[("white-space", "nowrap")]),
            ("whitespace-pre", &[("white-space", "pre")]),
            ("break-words", &[("overflow-wrap", "break-word")]),
            ("break-all", &[("word-break", "break-all")]),
        ],
    );

    // text-sm, text-sm/6, text-[12px]/[1.5]
    let size = ValueSpec::new(&[
        DataType::AbsoluteSize,
        DataType::RelativeSize,
        DataType::Length,
        DataType::Percentage,
    ])
    .theme(&["--text"])
    .bare(spacing_multiplier)
    .modifiers(ModifierPolicy::Theme(vec!["--leading".into()]));
    utilities.functional(
        "text",
        Arc::new(move |candidate, theme| {
            let resolved = match size.resolve(candidate, theme) {
                Resolution::Value(resolved) => resolved,
                Resolution::Halt => return Outcome::Halt,
                Resolution::Rejected => return Outcome::Rejected,
            };
            let line_height = match (&resolved.modifier, candidate.value()) {
                (Some(leading), _) => Some(leading.clone()),
                (None, Some(CandidateValue::Bare { value, .. })) => theme
                    .resolve_with(Some(value), &["--text"], &["--line-height"])
                    .and_then(|(_, nested)| nested.into_iter().next())
                    .map(|(_, line_height)| format!("var(--tw-leading, {line_height})")),
                _ => None,
            };
            let mut nodes = vec![decl("font-size", &resolved.value)];
            if let Some(line_height) = line_height {
                nodes.push(decl("line-height", line_height));
            }
            Outcome::Nodes(nodes)
        }),
    );

    utilities.with_value(
        "font",
        ValueSpec::new(&[DataType::Number]).theme(&["--font-weight"]).bare(integer),
        |r| {
            vec![
                decl("--tw-font-weight", &r.value),
                decl("font-weight", &r.value),
                property("--tw-font-weight", None, None),
            ]
        },
    );
    properties(
        utilities,
        "font",
        ValueSpec::new(&[DataType::FamilyName, DataType::GenericName]).theme(&["--font"]),
        &["font-family"],
    );

    utilities.with_value(
        "leading",
        ValueSpec::new(&[DataType::Number, DataType::Length, DataType::Percentage])
            .theme(&["--leading"])
            .bare(spacing_multiplier),
        |r| {
            vec![
                decl("--tw-leading", &r.value),
                decl("line-height", &r.value),
                property("--tw-leading", None, None),
            ]
        },
    );
    utilities.with_value(
        "tracking",
        ValueSpec::new(&[DataType::Length]).theme(&["--tracking"]).negative(),
        |r| {
            vec![
                decl("--tw-tracking", &r.value),
                decl("letter-spacing", &r.value),
                property("--tw-tracking", None, None),
            ]
        },
    );
    utilities.with_value(
        "line-clamp",
        ValueSpec::new(&[DataType::Integer]).theme(&["--line-clamp"]).bare(integer),
        |r| {
            vec![
                decl("overflow", "hidden"),
                decl("display", "-webkit-box"),
                decl("-webkit-box-orient", "vertical"),
                decl("-webkit-line-clamp", &r.value),
            ]
        },
    );
    properties(
        utilities,
        "decoration",
        ValueSpec::new(&[DataType::Length, DataType::Percentage])
            .theme(&["--text-decoration-thickness"])
            .bare(pixels),
        &["text-decoration-thickness"],
    );
    properties(
        utilities,
        "underline-offset",
        ValueSpec::new(&[DataType::Length, DataType::Percentage])
            .theme(&["--text-underline-offset"])
            .bare(pixels)
            .negative(),
        &["text-underline-offset"],
    );
    utilities.with_value(
        "content",
        ValueSpec::new(&[DataType::Any]).theme(&["--content"]),
        |r| {
            vec![
                decl("--tw-content", &r.value),
                decl("content", "var(--tw-content)"),
                property("--tw-content", Some("\"\""), None),
            ]
        },
    );
    utilities.static_utility(
        "content-none",
        vec![
            decl("--tw-content", "none"),
            decl("content", "none"),
            property("--tw-content", Some("\"\""), None),
        ],
    );
}

fn borders(utilities: &mut Utilities) {
    const SIDES: &[(&str, &[&str], &[&str])] = &[
        ("border", &["border-width"], &["border-color"]),
        ("border-x", &["border-inline-width"], &["border-inline-color"]),
        ("border-y", &["border-block-width"], &["border-block-color"]),
        ("border-s", &["border-inline-start-width"], &["border-inline-start-color"]),
        ("border-e", &["border-inline-end-width"], &["border-inline-end-color"]),
        ("border-t", &["border-top-width"], &["border-top-color"]),
        ("border-r", &["border-right-width"], &["border-right-color"]),
        ("border-b", &["border-bottom-width"], &["border-bottom-color"]),
        ("border-l", &["border-left-width"], &["border-left-color"]),
    ];

    for (name, widths, colors) in SIDES {
        utilities.with_value(
            name,
            ValueSpec::new(&[DataType::Length, DataType::LineWidth])
                .theme(&["--border-width"])
                .bare(pixels)
                .default_value("1px"),
            move |r| {
                let mut nodes = vec![decl("border-style", "var(--tw-border-style)")];
                nodes.extend(widths.iter().map(|p| decl(*p, &r.value)));
                nodes.push(property("--tw-border-style", Some("solid"), None));
                nodes
            },
        );
        properties(
            utilities,
            name,
            ValueSpec::new(&[DataType::Color]).theme(&["--border-color", "--color"]),
            colors,
        );
    }

    for style in ["solid", "dashed", "dotted", "double", "hidden", "none"] {
        utilities.static_utility(
            &format!("border-{style}"),
            vec![
                decl("--tw-border-style", style),
                decl("border-style", style),
                property("--tw-border-style", Some("solid"), None),
            ],
        );
    }

    const RADII: &[(&str, &[&str])] = &[
        ("rounded", &["border-radius"]),
        ("rounded-s", &["border-start-start-radius", "border-end-start-radius"]),
        ("rounded-e", &["border-start-end-radius", "border-end-end-radius"]),
        ("rounded-t", &["border-top-left-radius", "border-top-right-radius"]),
        ("rounded-r", &["border-top-right-radius", "border-bottom-right-radius"]),
        ("rounded-b", &["border-bottom-right-radius", "border-bottom-left-radius"]),
        ("rounded-l", &["border-top-left-radius", "border-bottom-left-radius"]),
        ("rounded-ss", &["border-start-start-radius"]),
        ("rounded-se", &["border-start-end-radius"]),
        ("rounded-ee", &["border-end-end-radius"]),
        ("rounded-es", &["border-end-start-radius"]),
        ("rounded-tl", &["border-top-left-radius"]),
        ("rounded-tr", &["border-top-right-radius"]),
        ("rounded-br", &["border-bottom-right-radius"]),
        ("rounded-bl", &["border-bottom-left-radius"]),
    ];
    for (name, props) in RADII {
        utilities.static_utility(&format!("{name}-none"), props.iter().map(|p| decl(*p, "0")).collect());
        utilities.static_utility(
            &format!("{name}-full"),
            props.iter().map(|p| decl(*p, "calc(infinity * 1px)")).collect(),
        );
        properties(
            utilities,
            name,
            ValueSpec::new(&[DataType::Length, DataType::Percentage]).theme(&["--radius"]),
            props,
        );
    }

    // outline, outline-2, outline-offset-2, outline-hidden
    utilities.with_value(
        "outline",
        ValueSpec::new(&[DataType::Length, DataType::Number, DataType::Percentage])
            .theme(&["--outline-width"])
            .bare(pixels)
            .default_value("1px"),
        |r| {
            vec![
                decl("outline-style", "var(--tw-outline-style)"),
                decl("outline-width", &r.value),
                property("--tw-outline-style", Some("solid"), None),
            ]
        },
    );
    properties(
        utilities,
        "outline-offset",
        ValueSpec::new(&[DataType::Length, DataType::Number, DataType::Percentage])
            .theme(&["--outline-offset"])
            .bare(pixels)
            .negative(),
        &["outline-offset"],
    );
    utilities.static_utility(
        "outline-hidden",
        vec![
            decl("--tw-outline-style", "none"),
            decl("outline-style", "none"),
            at_rule(
                "media",
                "(forced-colors: active)",
                vec![decl("outline", "2px solid transparent"), decl("outline-offset", "2px")],
            ),
            property("--tw-outline-style", Some("solid"), None),
        ],
    );
    for style in ["solid", "dashed", "dotted", "double", "none"] {
        utilities.static_utility(
            &format!("outline-{style}"),
            vec![
                decl("--tw-outline-style", style),
                decl("outline-style", style),
                property("--tw-outline-style", Some("solid"), None),
            ],
        );
    }
}

const SHADOW_STACK: &str = "var(--tw-inset-shadow), var(--tw-inset-ring-shadow), var(--tw-ring-offset-shadow), var(--tw-ring-shadow), var(--tw-shadow)";

fn shadow_properties() -> Vec<AstNode> {
    vec![
        property("--tw-shadow", Some("0 0 #0000"), None),
        property("--tw-shadow-color", None, None),
        property("--tw-inset-shadow", Some("0 0 #0000"), None),
        property("--tw-inset-ring-shadow", Some("0 0 #0000"), None),
        property("--tw-ring-offset-shadow", Some("0 0 #0000"), None),
        property("--tw-ring-shadow", Some("0 0 #0000"), None),
    ]
}

/// `0 1px 3px 0 rgb(0 0 0 / 0.1)` → `0 1px 3px 0 var(--tw-shadow-color, rgb(0 0 0 / 0.1))`.
fn colorize_shadow(shadow: &str) -> String {
    classname::segment(shadow, ',')
        .into_iter()
        .map(|layer| {
            let layer = layer.trim();
            let parts = classname::segment(layer, ' ');
            match parts.last() {
                Some(color) if crate::value::is_color(color) => {
                    let head = layer[..layer.len() - color.len()].trim_end();
                    format!("{head} var(--tw-shadow-color, {color})")
                }
                _ => layer.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn effects(utilities: &mut Utilities) {
    utilities.with_value(
        "opacity",
        ValueSpec::new(&[DataType::Percentage, DataType::Number])
            .theme(&["--opacity"])
            .bare(percent),
        |r| vec![decl("opacity", &r.value)],
    );

    utilities.static_utility("shadow-none", {
        let mut nodes = vec![
            decl("--tw-shadow", "0 0 #0000"),
            decl("box-shadow", SHADOW_STACK),
        ];
        nodes.extend(shadow_properties());
        nodes
    });
    utilities.with_value(
        "shadow",
        ValueSpec::new(&[DataType::Color]).theme(&["--box-shadow-color", "--color"]),
        |r| {
            vec![
                decl("--tw-shadow-color", &r.value),
                property("--tw-shadow-color", None, None),
            ]
        },
    );

    utilities.with_value(
        "shadow",
        ValueSpec::new(&[DataType::Any]).theme(&["--shadow"]),
        |r| {
            let shadow = match r.value.strip_prefix("var(").and_then(|v| v.split_once(", ")) {
                Some((key, raw)) => {
                    let raw = raw.strip_suffix(')').unwrap_or(raw);
                    format!("var({key}, {})", colorize_shadow(raw))
                }
                None => colorize_shadow(&r.value),
            };
            let mut nodes = vec![decl("--tw-shadow", shadow), decl("box-shadow", SHADOW_STACK)];
            nodes.extend(shadow_properties());
            nodes
        },
    );
    utilities.with_value(
        "duration",
        ValueSpec::new(&[DataType::Any]).theme(&["--transition-duration"]).bare(milliseconds),
        |r| {
            vec![
                decl("--tw-duration", &r.value),
                decl("transition-duration", &r.value),
                property("--tw-duration", None, None),
            ]
        },
    );
    utilities.with_value(
        "delay",
        ValueSpec::new(&[DataType::Any]).theme(&["--transition-delay"]).bare(milliseconds),
        |r| vec![decl("transition-delay", &r.value)],
    );
    utilities.with_value(
        "ease",
        ValueSpec::new(&[DataType::Any]).theme(&["--ease"]),
        |r| {
            vec![
                decl("--tw-ease", &r.value),
                decl("transition-timing-function", &r.value),
                property("--tw-ease", None, None),
            ]
        },
    );
    utilities.with_value(
        "animate",
        ValueSpec::new(&[DataType::Any]).theme(&["--animate"]),
        |r| vec![decl("animation", &r.value)],
    );
    utilities.static_utility("animate-none", vec![decl("animation", "none")]);
}

fn transforms(utilities: &mut Utilities) {
    let translate = || {
        ValueSpec::new(&[DataType::Length, DataType::Percentage])
            .theme(&["--translate", "--spacing"])
            .bare(spacing_multiplier)
            .keyword("full", "100%")
            .negative()
            .fractions()
    };
    let translate_properties = || {
        vec![
            property("--tw-translate-x", Some("0"), None),
            property("--tw-translate-y", Some("0"), None),
            property("--tw-translate-z", Some("0"), None),
        ]
    };

    for axis in ["x", "y"] {
        let name = format!("translate-{axis}");
        utilities.with_value(&name, translate(), move |r| {
            let mut nodes = vec![
                decl(format!("--tw-translate-{axis}"), &r.value),
                decl("translate", "var(--tw-translate-x) var(--tw-translate-y)"),
            ];
            nodes.extend(translate_properties());
            nodes
        });
    }
    utilities.with_value("translate", translate(), move |r| {
        let mut nodes = vec![
            decl("--tw-translate-x", &r.value),
            decl("--tw-translate-y", &r.value),
            decl("translate", "var(--tw-translate-x) var(--tw-translate-y)"),
        ];
        nodes.extend(translate_properties());
        nodes
    });

    let scale = || {
        ValueSpec::new(&[DataType::Percentage, DataType::Number])
            .theme(&["--scale"])
            .bare(percent)
            .negative()
    };
    let scale_properties = || {
        vec![
            property("--tw-scale-x", Some("1"), None),
            property("--tw-scale-y", Some("1"), None),
            property("--tw-scale-z", Some("1"), None),
        ]
    };
    for axis in ["x", "y"] {
        let name = format!("scale-{axis}");
        utilities.with_value(&name, scale(), move |r| {
            let mut nodes = vec![
                decl(format!("--tw-scale-{axis}"), &r.value),
                decl("scale", "var(--tw-scale-x) var(--tw-scale-y)"),
            ];
            nodes.extend(scale_properties());
            nodes
        });
    }
    utilities.with_value("scale", scale(), move |r| {
        let mut nodes = vec![
            decl("--tw-scale-x", &r.value),
            decl("--tw-scale-y", &r.value),
            decl("--tw-scale-z", &r.value),
            decl("scale", "var(--tw-scale-x) var(--tw-scale-y)"),
        ];
        nodes.extend(scale_properties());
        nodes
    });

    utilities.with_value(
        "rotate",
        ValueSpec::new(&[DataType::Angle])
            .theme(&["--rotate"])
            .bare(degrees)
            .negative(),
        |r| vec![decl("rotate", &r.value)],
    );
    utilities.static_utility("rotate-none", vec![decl("rotate", "none")]);
    utilities.static_utility("translate-none", vec![decl("translate", "none")]);
    utilities.static_utility("scale-none", vec![decl("scale", "none")]);

    utilities.static_utility(
        "transition",
        vec![
            decl(
                "transition-property",
                "color, background-color, border-color, outline-color, text-decoration-color, fill, stroke, opacity, box-shadow, translate, scale, rotate",
            ),
            decl("transition-timing-function", "var(--tw-ease, ease)"),
            decl("transition-duration", "var(--tw-duration, 150ms)"),
        ],
    );
    utilities.static_utility("transition-none", vec![decl("transition-property", "none")]);
}
