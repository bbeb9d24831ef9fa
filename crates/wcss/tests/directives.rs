//! Directives in the entry stylesheet: `@theme`, `@utility`,
//! `@custom-variant`, `@variant`, `@apply`, `@source` and CSS functions.

use wcss::{CompileOptions, Compiler, Glob, WcssError, compile};

async fn compiler(css: &str) -> Compiler {
    compile(css, "/project", CompileOptions::new().minify(true))
        .await
        .expect("stylesheet compiles")
}

async fn compile_error(css: &str) -> WcssError {
    compile(css, "/project", CompileOptions::new())
        .await
        .expect_err("stylesheet should not compile")
}

// ============================================================================
// @theme
// ============================================================================

#[tokio::test]
async fn test_theme_tokens_are_emitted_to_root() {
    let compiler = compiler(
        r#"
        @theme { --color-brand: #123456; }
        @tailwind utilities;
        "#,
    )
    .await;

    assert_eq!(compiler.build(Vec::<&str>::new()), ":root{--color-brand:#123456}");
    assert_eq!(
        compiler.build(["text-brand"]),
        ":root{--color-brand:#123456}.text-brand{color:var(--color-brand,#123456)}"
    );
}

#[tokio::test]
async fn test_reference_tokens_are_not_emitted() {
    let compiler = compiler(
        r#"
        @theme reference { --color-brand: #123456; }
        @tailwind utilities;
        "#,
    )
    .await;
    assert_eq!(
        compiler.build(["text-brand"]),
        ".text-brand{color:var(--color-brand,#123456)}"
    );
}

#[tokio::test]
async fn test_inline_tokens_use_raw_values() {
    let compiler = compiler(
        r#"
        @theme inline reference { --color-brand: #123456; }
        @tailwind utilities;
        "#,
    )
    .await;
    assert_eq!(compiler.build(["text-brand"]), ".text-brand{color:#123456}");
}

#[tokio::test]
async fn test_theme_keyframes_are_hoisted() {
    let compiler = compiler(
        r#"
        @theme reference {
            @keyframes spin { to { transform: rotate(360deg); } }
        }
        @tailwind utilities;
        "#,
    )
    .await;
    assert_eq!(
        compiler.build(Vec::<&str>::new()),
        "@keyframes spin{to{transform:rotate(360deg)}}"
    );
}

#[tokio::test]
async fn test_theme_rejects_selectors() {
    let error = compile_error("@theme { .a { color: red; } }").await;
    assert!(matches!(error, WcssError::InvalidDirective { directive, .. } if directive == "theme"));
}

// ============================================================================
// @utility
// ============================================================================

#[tokio::test]
async fn test_static_utility() {
    let compiler = compiler(
        r#"
        @utility scrollbar-none { scrollbar-width: none; }
        @tailwind utilities;
        "#,
    )
    .await;
    assert_eq!(
        compiler.build(["scrollbar-none", "hover:scrollbar-none"]).matches("scrollbar-width:none").count(),
        2
    );
}

#[tokio::test]
async fn test_functional_utility_value_kinds() {
    let compiler = compiler(
        r#"
        @theme reference { --tab-size-github: 8; }
        @utility tab-* { tab-size: --value(--tab-size-*, integer, [integer]); }
        @tailwind utilities;
        "#,
    )
    .await;

    insta::assert_snapshot!(
        compiler.build(["tab-4", "tab-github", "tab-[12]", "tab-foo", "tab-[red]"]),
        @r".tab-4{tab-size:4}.tab-\[12\]{tab-size:12}.tab-github{tab-size:var(--tab-size-github,8)}"
    );
}

#[tokio::test]
async fn test_functional_utility_modifiers() {
    let compiler = compiler(
        r#"
        @utility clampy-* {
            -webkit-line-clamp: --value(integer);
            line-height: --modifier(number);
        }
        @tailwind utilities;
        "#,
    )
    .await;

    assert_eq!(compiler.build(["clampy-3"]), r".clampy-3{-webkit-line-clamp:3}");
    assert_eq!(
        compiler.build(["clampy-3/2"]),
        r".clampy-3\/2{-webkit-line-clamp:3;line-height:2}"
    );
    assert_eq!(compiler.build(["clampy-x"]), "");
}

#[tokio::test]
async fn test_unused_modifier_rejects_candidate() {
    let compiler = compiler(
        r#"
        @utility tab-* { tab-size: --value(integer); }
        @tailwind utilities;
        "#,
    )
    .await;
    assert_eq!(compiler.build(["tab-4/2"]), "");
}

#[tokio::test]
async fn test_ratio_consumes_modifier() {
    let compiler = compiler(
        r#"
        @utility ratio-* { aspect-ratio: --value(ratio); }
        @tailwind utilities;
        "#,
    )
    .await;
    assert_eq!(compiler.build(["ratio-16/9"]), r".ratio-16\/9{aspect-ratio:16/9}");
}

#[tokio::test]
async fn test_literal_values() {
    let compiler = compiler(
        r#"
        @utility wrap-* { text-wrap: --value('balance', 'pretty'); }
        @tailwind utilities;
        "#,
    )
    .await;
    assert_eq!(compiler.build(["wrap-pretty"]), ".wrap-pretty{text-wrap:pretty}");
    assert_eq!(compiler.build(["wrap-nowhere"]), "");
}

#[tokio::test]
async fn test_invalid_utility_name() {
    let error = compile_error("@utility -bad { color: red; }").await;
    assert!(matches!(
        error,
        WcssError::InvalidUtilityName { source_name, name } if source_name == "@utility" && name == "-bad"
    ));
}

// ============================================================================
// @apply
// ============================================================================

#[tokio::test]
async fn test_apply_in_author_css() {
    let compiler = compiler(
        r#"
        @theme reference { --spacing-4: 1rem; }
        .btn { @apply flex mt-4; }
        @tailwind utilities;
        "#,
    )
    .await;
    assert_eq!(
        compiler.build(Vec::<&str>::new()),
        ".btn{display:flex;margin-top:var(--spacing-4,1rem)}"
    );
}

#[tokio::test]
async fn test_apply_with_variants() {
    let compiler = compiler(
        r#"
        .btn { @apply hover:underline; }
        "#,
    )
    .await;
    let css = compiler.build(Vec::<&str>::new());
    assert!(css.contains(".btn:hover"), "{css}");
    assert!(css.contains("text-decoration-line:underline"), "{css}");
}

#[tokio::test]
async fn test_utilities_apply_each_other() {
    let compiler = compiler(
        r#"
        @utility btn { @apply card flex; }
        @utility card { border-radius: 4px; }
        @tailwind utilities;
        "#,
    )
    .await;
    assert_eq!(
        compiler.build(["btn"]),
        ".btn{border-radius:4px;display:flex}"
    );
}

#[tokio::test]
async fn test_circular_apply() {
    let error = compile_error(
        r#"
        @utility a { @apply b; }
        @utility b { @apply a; }
        "#,
    )
    .await;
    assert_eq!(
        error.to_string(),
        "You cannot `@apply` the `a` utility here because it creates a circular dependency."
    );
}

#[tokio::test]
async fn test_self_apply() {
    let error = compile_error("@utility loop { @apply hover:loop; }").await;
    assert!(matches!(error, WcssError::CircularApply { candidate } if candidate == "hover:loop"));
}

#[tokio::test]
async fn test_unknown_apply() {
    let error = compile_error(".x { @apply nope; }").await;
    assert_eq!(error.to_string(), "Cannot apply unknown utility class: nope");
}

// ============================================================================
// Variants
// ============================================================================

#[tokio::test]
async fn test_custom_variant_selectors() {
    let compiler = compiler(
        r#"
        @custom-variant hocus (&:hover, &:focus);
        @tailwind utilities;
        "#,
    )
    .await;
    assert_eq!(
        compiler.build(["hocus:flex"]),
        r".hocus\:flex:hover, .hocus\:flex:focus{display:flex}"
    );
}

#[tokio::test]
async fn test_custom_variant_block() {
    let compiler = compiler(
        r#"
        @custom-variant theme-dark {
            &:where([data-theme=dark] *) { @slot; }
        }
        @tailwind utilities;
        "#,
    )
    .await;
    assert_eq!(
        compiler.build(["theme-dark:flex"]),
        r".theme-dark\:flex:where([data-theme=dark] *){display:flex}"
    );
}

#[tokio::test]
async fn test_custom_variant_at_rule() {
    let compiler = compiler(
        r#"
        @custom-variant paper (@media print);
        @tailwind utilities;
        "#,
    )
    .await;
    assert_eq!(
        compiler.build(["paper:flex"]),
        r"@media print{.paper\:flex{display:flex}}"
    );
}

#[tokio::test]
async fn test_nested_variant_in_author_css() {
    let compiler = compiler(".card { @variant focus { color: red; } }").await;
    assert_eq!(compiler.build(Vec::<&str>::new()), ".card:focus{color:red}");
}

#[tokio::test]
async fn test_unknown_nested_variant() {
    let error = compile_error(".card { @variant nope { color: red; } }").await;
    assert!(matches!(error, WcssError::InvalidVariant { name, .. } if name == "nope"));
}

#[tokio::test]
async fn test_invalid_variant_name() {
    let error = compile_error("@custom-variant -x (&:hover);").await;
    assert!(matches!(error, WcssError::InvalidVariantName(name) if name == "-x"));
}

// ============================================================================
// Functions and globs
// ============================================================================

#[tokio::test]
async fn test_css_functions() {
    let compiler = compiler(
        r#"
        @theme { --spacing: 0.25rem; --color-brand: #123456; }
        .a {
            padding: --spacing(4);
            color: --theme(--color-brand);
            border-color: theme(--color-brand);
        }
        "#,
    )
    .await;
    let css = compiler.build(Vec::<&str>::new());
    assert!(css.contains("padding:calc(var(--spacing,0.25rem) * 4)"), "{css}");
    assert!(css.contains("color:var(--color-brand)"), "{css}");
    assert!(css.contains("border-color:#123456"), "{css}");
}

#[tokio::test]
async fn test_source_globs() {
    let compiler = compiler(
        r#"
        @source "./src/**/*.rs";
        @source '../shared/*.html';
        "#,
    )
    .await;
    assert_eq!(
        compiler.globs(),
        &[
            Glob {
                origin: "/project".to_string(),
                pattern: "./src/**/*.rs".to_string(),
            },
            Glob {
                origin: "/project".to_string(),
                pattern: "../shared/*.html".to_string(),
            },
        ]
    );
}
