use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["src"], "./locales/en/translation.json");
    assert_eq!(parsed["dest"], "locales/en/[name].[hash:8].json");
    assert_eq!(parsed["i18nFunctionName"], "i18next.t");
    assert_eq!(parsed["excludePaths"], serde_json::json!(["node_modules"]));
    assert!(
        parsed.get("translationFilePattern").is_some(),
        "Config should have 'translationFilePattern' field"
    );

    assert!(
        content.contains("\n  \""),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success());
    assert_eq!(stdout(&output), "✓ Created .gleanrc.json\n");

    assert!(test.root().join(".gleanrc.json").exists());
    let content = test.read_file(".gleanrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".gleanrc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains(".gleanrc.json already exists"));
    assert_eq!(test.read_file(".gleanrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file("src/app.html", r#"<h1 t="title">Title</h1>"#)?;

    let output = test.build_command().output()?;
    assert!(
        output.status.success(),
        "Build command should work with initialized config. stderr: {}",
        stderr(&output)
    );

    Ok(())
}
