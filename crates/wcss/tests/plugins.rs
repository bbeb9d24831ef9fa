//! `@plugin` and `@config` modules driving the plugin API.

use std::sync::Arc;

use wcss::compat::{
    CssObject, DarkMode, MatchUtilitiesOptions, MatchVariantOptions, Plugin, UserConfig,
};
use wcss::theme::{ConfigMap, ConfigValue};
use wcss::value::DataType;
use wcss::{CompileOptions, Compiler, Glob, Module, ModuleMap, WcssError, compile};

async fn compiler(css: &str, modules: ModuleMap) -> Compiler {
    compile(css, "/project", CompileOptions::new().minify(true).loader(modules))
        .await
        .expect("stylesheet compiles")
}

fn scrollbar_plugin() -> Plugin {
    Plugin::new(|api| {
        api.add_utilities(CssObject::new().with(
            ".scrollbar-none",
            CssObject::new().with("scrollbarWidth", "none"),
        ))
    })
}

// ============================================================================
// Utilities
// ============================================================================

#[tokio::test]
async fn test_add_utilities() {
    let modules = ModuleMap::new().with("scrollbar", Module::Plugin(scrollbar_plugin()));
    let compiler = compiler(r#"@plugin "scrollbar"; @tailwind utilities;"#, modules).await;

    assert_eq!(
        compiler.build(["scrollbar-none"]),
        ".scrollbar-none{scrollbar-width:none}"
    );
}

#[tokio::test]
async fn test_match_utilities_with_values() {
    let plugin = Plugin::new(|api| {
        api.match_utility(
            "tab",
            |value, _| CssObject::new().with("tabSize", value),
            MatchUtilitiesOptions::new(&[DataType::Integer])
                .values(ConfigMap::new().with("2", "2").with("4", "4")),
        )
    });
    let modules = ModuleMap::new().with("tab", Module::Plugin(plugin));
    let compiler = compiler(r#"@plugin "tab"; @tailwind utilities;"#, modules).await;

    assert_eq!(compiler.build(["tab-4"]), ".tab-4{tab-size:4}");
    assert_eq!(compiler.build(["tab-[8]"]), r".tab-\[8\]{tab-size:8}");
    assert_eq!(compiler.build(["tab-3"]), "");
}

#[tokio::test]
async fn test_match_utilities_fall_through_by_type() {
    let plugin = Plugin::new(|api| {
        api.match_utility(
            "foo",
            |value, _| CssObject::new().with("color", value),
            MatchUtilitiesOptions::new(&[DataType::Color])
                .values(ConfigMap::new().with("red", "red")),
        )?;
        api.match_utility(
            "foo",
            |value, _| CssObject::new().with("width", value),
            MatchUtilitiesOptions::new(&[DataType::Length]),
        )
    });
    let modules = ModuleMap::new().with("foo", Module::Plugin(plugin));
    let compiler = compiler(r#"@plugin "foo"; @tailwind utilities;"#, modules).await;

    assert_eq!(compiler.build(["foo-red"]), ".foo-red{color:red}");
    assert_eq!(compiler.build(["foo-red/bogus"]), "");
    assert_eq!(compiler.build(["foo-[10px]"]), r".foo-\[10px\]{width:10px}");
}

#[tokio::test]
async fn test_invalid_utility_selector() {
    let plugin = Plugin::new(|api| {
        api.add_utilities(CssObject::new().with("div > .a", CssObject::new().with("color", "red")))
    });
    let modules = ModuleMap::new().with("bad", Module::Plugin(plugin));
    let result = compile(r#"@plugin "bad";"#, "/", CompileOptions::new().loader(modules)).await;
    assert!(matches!(result, Err(WcssError::InvalidUtilitySelector(_))));
}

// ============================================================================
// Variants
// ============================================================================

#[tokio::test]
async fn test_add_variant() {
    let plugin = Plugin::new(|api| api.add_variant("hocus", vec!["&:hover", "&:focus"]));
    let modules = ModuleMap::new().with("hocus", Module::Plugin(plugin));
    let compiler = compiler(r#"@plugin "hocus"; @tailwind utilities;"#, modules).await;

    assert_eq!(
        compiler.build(["hocus:flex"]),
        r".hocus\:flex:hover, .hocus\:flex:focus{display:flex}"
    );

    let css = compiler.build(["group-hocus:flex"]);
    assert_eq!(css.matches("{display:flex}").count(), 1, "{css}");
    assert!(css.contains(":where(.group):hover, :where(.group):focus"), "{css}");
}

#[tokio::test]
async fn test_match_variant_templates_form_one_selector_list() {
    let plugin = Plugin::new(|api| {
        api.match_variant(
            "nth",
            |value, _| {
                let value = value.unwrap_or_default();
                vec![
                    format!("&:nth-child({value})"),
                    format!("&:nth-of-type({value})"),
                ]
            },
            MatchVariantOptions::new().value("2", Some("2")),
        )
    });
    let modules = ModuleMap::new().with("nth", Module::Plugin(plugin));
    let compiler = compiler(r#"@plugin "nth"; @tailwind utilities;"#, modules).await;

    assert_eq!(
        compiler.build(["nth-2:flex"]),
        r".nth-2\:flex:nth-child(2), .nth-2\:flex:nth-of-type(2){display:flex}"
    );
}

#[tokio::test]
async fn test_match_variant_order() {
    let plugin = Plugin::new(|api| {
        api.match_variant(
            "above",
            |value, _| vec![format!("@media (min-width: {})", value.unwrap_or_default())],
            MatchVariantOptions::new()
                .value("sm", Some("100px"))
                .value("lg", Some("200px")),
        )
    });
    let modules = ModuleMap::new().with("above", Module::Plugin(plugin));
    let compiler = compiler(r#"@plugin "above"; @tailwind utilities;"#, modules).await;

    let css = compiler.build(["above-lg:flex", "above-[50px]:flex", "above-sm:flex"]);
    let sm = css.find("(min-width: 100px)").unwrap();
    let lg = css.find("(min-width: 200px)").unwrap();
    let arbitrary = css.find("(min-width: 50px)").unwrap();
    assert!(sm < lg, "{css}");
    assert!(lg < arbitrary, "{css}");
    assert_eq!(compiler.build(["above-xl:flex"]), "");
}

#[tokio::test]
async fn test_match_variant_custom_sort() {
    let plugin = Plugin::new(|api| {
        api.match_variant(
            "upto",
            |value, _| vec![format!("@media (max-width: {})", value.unwrap_or_default())],
            MatchVariantOptions::new()
                .value("sm", Some("100px"))
                .value("lg", Some("200px"))
                .sort(|a, z| z.value.cmp(a.value)),
        )
    });
    let modules = ModuleMap::new().with("upto", Module::Plugin(plugin));
    let compiler = compiler(r#"@plugin "upto"; @tailwind utilities;"#, modules).await;

    let css = compiler.build(["upto-sm:flex", "upto-lg:flex"]);
    let sm = css.find("(max-width: 100px)").unwrap();
    let lg = css.find("(max-width: 200px)").unwrap();
    assert!(lg < sm, "{css}");
}

// ============================================================================
// Base styles
// ============================================================================

fn base_plugin() -> Plugin {
    Plugin::new(|api| {
        api.add_base(CssObject::new().with("h1", CssObject::new().with("fontSize", "2rem")));
        Ok(())
    })
}

#[tokio::test]
async fn test_base_replaces_plugin_directive() {
    let modules = ModuleMap::new().with("base", Module::Plugin(base_plugin()));
    let compiler = compiler(r#".a { color: red; } @plugin "base";"#, modules).await;
    assert_eq!(
        compiler.build(Vec::<&str>::new()),
        ".a{color:red}@layer base{h1{font-size:2rem}}"
    );
}

#[tokio::test]
async fn test_base_moves_to_marker() {
    let modules = ModuleMap::new().with("base", Module::Plugin(base_plugin()));
    let compiler = compiler(
        r#"@plugin "base"; .a { color: red; } @tailwind base; @tailwind utilities;"#,
        modules,
    )
    .await;
    assert_eq!(
        compiler.build(["flex"]),
        ".a{color:red}@layer base{h1{font-size:2rem}}.flex{display:flex}"
    );
}

// ============================================================================
// Options and configs
// ============================================================================

#[tokio::test]
async fn test_plugin_options() {
    let factory = Arc::new(|options: &ConfigMap| {
        let class = options
            .get("class")
            .and_then(ConfigValue::as_str)
            .unwrap_or("prose")
            .to_string();
        Plugin::new(move |api| {
            api.add_utilities(CssObject::new().with(
                format!(".{class}"),
                CssObject::new().with("maxWidth", "65ch"),
            ))
        })
    });
    let modules = ModuleMap::new().with("typography", Module::PluginWithOptions(factory));
    let compiler = compiler(
        r#"@plugin "typography" { class: "article"; } @tailwind utilities;"#,
        modules,
    )
    .await;

    assert_eq!(compiler.build(["article"]), ".article{max-width:65ch}");
    assert_eq!(compiler.build(["prose"]), "");
}

#[tokio::test]
async fn test_options_need_a_factory() {
    let modules = ModuleMap::new().with("scrollbar", Module::Plugin(scrollbar_plugin()));
    let result = compile(
        r#"@plugin "scrollbar" { size: thin; }"#,
        "/",
        CompileOptions::new().loader(modules),
    )
    .await;
    assert!(matches!(result, Err(WcssError::InvalidDirective { .. })));
}

#[tokio::test]
async fn test_config_theme_and_content() {
    let config = UserConfig::new()
        .theme(ConfigMap::new().with(
            "colors",
            ConfigMap::new().with("brand", "#123456"),
        ))
        .content("./templates/**/*.html")
        .dark_mode(DarkMode::Selector(None));
    let modules = ModuleMap::new().with("./windcraft.config", Module::Config(config));
    let compiler = compiler(
        r#"@config "./windcraft.config"; @tailwind utilities;"#,
        modules,
    )
    .await;

    assert_eq!(compiler.build(["text-brand"]), ".text-brand{color:#123456}");
    assert_eq!(
        compiler.globs(),
        &[Glob {
            origin: "/project".to_string(),
            pattern: "./templates/**/*.html".to_string(),
        }]
    );

    let css = compiler.build(["dark:flex"]);
    assert!(css.contains(":where(.dark, .dark *)"), "{css}");
}

#[tokio::test]
async fn test_builds_share_the_config_theme_across_threads() {
    let config = UserConfig::new().theme(ConfigMap::new().with(
        "spacing",
        ConfigMap::new().with("gutter", "2rem"),
    ));
    let modules = ModuleMap::new().with("./windcraft.config", Module::Config(config));
    let compiler = compiler(
        r#"
        @config "./windcraft.config";
        @utility gutter-pad { padding: theme(spacing.gutter); }
        @tailwind utilities;
        "#,
        modules,
    )
    .await;

    std::thread::scope(|scope| {
        let builds: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| compiler.build(["gutter-pad"])))
            .collect();
        for build in builds {
            assert_eq!(build.join().unwrap(), ".gutter-pad{padding:2rem}");
        }
    });
}

#[tokio::test]
async fn test_missing_module() {
    let result = compile(
        r#"@plugin "nowhere";"#,
        "/",
        CompileOptions::new().loader(ModuleMap::new()),
    )
    .await;
    let error = result.unwrap_err();
    assert!(matches!(&error, WcssError::Loader { id, .. } if id == "nowhere"));
}
