use anyhow::Result;
use serde_json::{Value, json};

use crate::{CliTest, stderr, stdout};

const CONFIG: &str = r#"{ "dest": "locales/en/[name].json", "sourceRoot": "./src" }"#;

fn project() -> Result<CliTest> {
    let test = CliTest::with_file(".gleanrc.json", CONFIG)?;
    test.write_file(
        "src/views/home.html",
        r#"<template>
  <h1 t="home.title">Welcome</h1>
  <img t="home.logo[alt]" src="logo.png" alt="Logo">
</template>"#,
    )?;
    test.write_file(
        "src/main.js",
        r#"i18next.t("home.intro", null, "Hello there");"#,
    )?;
    Ok(test)
}

fn read_json(test: &CliTest, path: &str) -> Result<Value> {
    Ok(serde_json::from_str(&test.read_file(path)?)?)
}

#[test]
fn test_build_writes_catalog_and_index() -> Result<()> {
    let test = project()?;

    let output = test.build_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.starts_with("✓ Extracted 3 keys from 2 documents\n"), "{out}");
    assert!(out.contains("  catalog: locales/en/translation.json\n"));

    assert_eq!(
        test.read_file("dist/locales/en/translation.json")?,
        r#"{"home":{"intro":"Hello there","title":"Welcome","logo":"Logo"}}"#
    );
    assert_eq!(
        read_json(&test, "dist/locales/index.json")?,
        json!({"en": {"translation": "locales/en/translation.json"}})
    );

    Ok(())
}

#[test]
fn test_build_with_content_hash_name() -> Result<()> {
    let test = CliTest::with_file(".gleanrc.json", r#"{ "sourceRoot": "./src" }"#)?;
    test.write_file("src/app.html", r#"<span t="greeting">Hello</span>"#)?;

    let output = test.build_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let files = test.list_dir("dist/locales/en")?;
    assert_eq!(files.len(), 1);
    let name = &files[0];
    assert!(name.starts_with("translation.") && name.ends_with(".json"));
    assert_eq!(name.len(), "translation.".len() + 8 + ".json".len());

    let index = read_json(&test, "dist/locales/index.json")?;
    assert_eq!(index["en"]["translation"], format!("locales/en/{}", name));

    Ok(())
}

#[test]
fn test_build_with_diff() -> Result<()> {
    let test = project()?;
    test.write_file(
        "locales/en/translation.json",
        r#"{"home": {"title": "Welcome!", "old": "Gone", "old_plural": "Gones"}}"#,
    )?;

    let output = test.build_command().arg("--diff").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("(2 new, 1 changed, 1 removed)"));

    assert_eq!(
        read_json(&test, "locales/en/translation.diff.json")?,
        json!({
            "new": {"home": {"intro": "Hello there", "logo": "Logo"}},
            "changed": {"home": {"title": "Welcome"}},
            "removed": {"home": {"old": "Gone"}}
        })
    );

    Ok(())
}

#[test]
fn test_structural_conflict_fails_build() -> Result<()> {
    let test = CliTest::with_file(".gleanrc.json", CONFIG)?;
    test.write_file(
        "src/app.html",
        r#"<span t="nav">Navigation</span><a t="nav.home">Home</a>"#,
    )?;

    let output = test.build_command().output()?;
    assert_eq!(output.status.code(), Some(1));

    let out = stdout(&output);
    assert!(out.contains("structural-conflict"), "{out}");
    assert!(out.contains("  --> app.html:1:"), "{out}");
    assert!(out.contains("✘ 1 problem (1 error, 0 warnings)"), "{out}");
    assert_eq!(
        test.read_file("dist/locales/en/translation.json")?,
        r#"{"nav":"Navigation"}"#
    );

    Ok(())
}

#[test]
fn test_warnings_do_not_fail_build() -> Result<()> {
    let test = CliTest::with_file(".gleanrc.json", CONFIG)?;
    test.write_file(
        "src/app.js",
        "i18next.t(\"plain\");\ni18next.t(someKey, null, \"Dynamic\");\n",
    )?;

    let output = test.build_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("missing-default"), "{out}");
    assert!(out.contains("non-literal-argument"), "{out}");
    assert!(out.contains("  --> app.js:2:1"), "{out}");
    assert_eq!(
        test.read_file("dist/locales/en/translation.json")?,
        r#"{"plain":"plain"}"#
    );

    Ok(())
}

#[test]
fn test_excluded_paths_are_skipped() -> Result<()> {
    let test = CliTest::with_file(".gleanrc.json", CONFIG)?;
    test.write_file("src/app.js", r#"i18next.t("app", null, "App");"#)?;
    test.write_file(
        "src/node_modules/lib/index.js",
        r#"i18next.t(dynamic); i18next.t("vendor", null, "Vendor");"#,
    )?;

    let output = test.build_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(!stdout(&output).contains("non-literal-argument"));
    assert_eq!(
        test.read_file("dist/locales/en/translation.json")?,
        r#"{"app":"App"}"#
    );

    Ok(())
}

#[test]
fn test_invalid_translation_file_is_reported() -> Result<()> {
    let test = project()?;
    test.write_file("dist/locales/de/translation.json", "{ \"home\": ")?;

    let output = test.build_command().output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("invalid-output-file"));
    assert_eq!(
        read_json(&test, "dist/locales/index.json")?,
        json!({"en": {"translation": "locales/en/translation.json"}})
    );

    Ok(())
}

#[test]
fn test_duplicate_value_warnings() -> Result<()> {
    let test = CliTest::with_file(".gleanrc.json", CONFIG)?;
    test.write_file(
        "src/app.html",
        r#"<button t="save">Save</button><button t="dialog.save">Save</button>"#,
    )?;

    let quiet = test.build_command().output()?;
    assert!(!stdout(&quiet).contains("duplicate-value"));

    let output = test.build_command().arg("--duplicate-warnings").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("duplicate-value"), "{out}");
    assert!(out.contains("= note: dialog.save"), "{out}");

    Ok(())
}

#[test]
fn test_invalid_config_is_internal_error() -> Result<()> {
    let test = CliTest::with_file(".gleanrc.json", r#"{ "variantPattern": "(" }"#)?;

    let output = test.build_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("variantPattern"));

    Ok(())
}

#[test]
fn test_help_without_command() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("build"));

    Ok(())
}

#[test]
fn test_rebuild_indexes_new_catalog() -> Result<()> {
    let test = CliTest::with_file(".gleanrc.json", r#"{ "sourceRoot": "./src" }"#)?;

    let mut written = Vec::new();
    for value in ["Hello", "Hello again"] {
        test.write_file(
            "src/app.js",
            &format!(r#"i18next.t("greeting", null, "{}");"#, value),
        )?;
        let output = test.build_command().output()?;
        assert!(output.status.success(), "stderr: {}", stderr(&output));

        let index = read_json(&test, "dist/locales/index.json")?;
        let name = index["en"]["translation"].as_str().unwrap_or_default().to_string();
        assert!(!written.contains(&name));
        assert_eq!(
            read_json(&test, &format!("dist/{}", name))?,
            json!({"greeting": value})
        );
        written.push(name);
    }

    assert_eq!(test.list_dir("dist/locales/en")?.len(), 2);

    Ok(())
}

#[test]
fn test_baseline_plural_forms_are_kept() -> Result<()> {
    let test = project()?;
    test.write_file(
        "locales/en/translation.json",
        r#"{"home": {"title": "Welcome", "item": "Item", "item_plural": "Items"}}"#,
    )?;

    let output = test.build_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(
        test.read_file("dist/locales/en/translation.json")?,
        r#"{"home":{"title":"Welcome","item":"Item","item_plural":"Items","intro":"Hello there","logo":"Logo"}}"#
    );

    Ok(())
}
