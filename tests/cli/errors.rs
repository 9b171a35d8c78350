use anyhow::Result;
use insta::assert_snapshot;

use crate::CliTest;

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_missing_api_key() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("i18n.yaml", "- en: en.json\n  fr: fr.json\n")?;

    let output = test.bare_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert_snapshot!(stderr(&output), @"Error: DEEPSEEK_API_KEY environment variable not set");

    Ok(())
}

#[test]
fn test_incomplete_pair_args() -> Result<()> {
    let test = CliTest::new()?;

    let output = test
        .bare_command()
        .env("DEEPSEEK_API_KEY", "sk-test")
        .args(["--source-lang", "en", "--target-file", "fr.json"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert_snapshot!(
        stderr(&output),
        @"Error: if you specify --source-lang, --target-lang, --source-file or --target-file, all of them must be provided (missing: --target-lang, --source-file)"
    );

    Ok(())
}

#[test]
fn test_no_config_found() -> Result<()> {
    let test = CliTest::new()?;

    let output = test
        .bare_command()
        .env("DEEPSEEK_API_KEY", "sk-test")
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert_snapshot!(stderr(&output), @"Error: no i18n.yaml found in current or parent directories");

    Ok(())
}

#[test]
fn test_group_without_targets() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("i18n.yaml", "- en: en.json\n")?;

    let output = test
        .bare_command()
        .env("DEEPSEEK_API_KEY", "sk-test")
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("has no target languages"));

    Ok(())
}

#[test]
fn test_zero_batch_size() -> Result<()> {
    let test = CliTest::new()?;

    let output = test
        .bare_command()
        .env("DEEPSEEK_API_KEY", "sk-test")
        .args(["--batch-size", "0"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert_snapshot!(stderr(&output), @"Error: batch size must be greater than 0");

    Ok(())
}
