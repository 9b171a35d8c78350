use anyhow::Result;
use insta::assert_snapshot;
use serde_json::json;
use wiremock::ResponseTemplate;

use crate::{CliTest, PrefixResponder, completion, mock_provider};

#[tokio::test(flavor = "multi_thread")]
async fn test_config_group_fills_missing_keys() -> Result<()> {
    let server = mock_provider(PrefixResponder("fr:")).await;
    let test = CliTest::new()?;
    test.write_file(
        "i18n.yaml",
        "- en: locales/en.json\n  fr: locales/fr.json\n",
    )?;
    test.write_json(
        "locales/en.json",
        json!({"a": {"b": "Hello", "c": "World"}, "count": 3}),
    )?;
    test.write_json("locales/fr.json", json!({"a": {"b": "Bonjour"}}))?;

    let output = test.command(&server).output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_snapshot!(test.stdout(&output), @r"
    ✓ en -> fr  locales/fr.json  translated 1, copied 1
    ✓ 1 unit done, 2 keys written
    ");
    assert_snapshot!(test.read_file("locales/fr.json")?, @r#"
    {
      "a": {
        "b": "Bonjour",
        "c": "fr:World"
      },
      "count": 3
    }
    "#);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pair_args_create_target_file() -> Result<()> {
    let server = mock_provider(PrefixResponder("de:")).await;
    let test = CliTest::new()?;
    test.write_json("en.json", json!({"x": "Hi", "greet": "Hello {{name}}"}))?;

    let output = test
        .command(&server)
        .args(["--source-lang", "en", "--target-lang", "de"])
        .args(["--source-file", "en.json", "--target-file", "out/de.json"])
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_snapshot!(test.read_file("out/de.json")?, @r#"
    {
      "x": "de:Hi",
      "greet": "de:Hello {{name}}"
    }
    "#);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_second_run_is_up_to_date() -> Result<()> {
    let server = mock_provider(PrefixResponder("fr:")).await;
    let test = CliTest::new()?;
    test.write_file("i18n.yaml", "- en: en.json\n  fr: fr.json\n")?;
    test.write_json("en.json", json!({"nav": {"home": "Home"}}))?;

    let first = test.command(&server).output()?;
    assert_eq!(first.status.code(), Some(0));
    let written = test.read_file("fr.json")?;

    let second = test.command(&server).output()?;
    assert_eq!(second.status.code(), Some(0));
    assert_snapshot!(test.stdout(&second), @r"
    ✓ en -> fr  fr.json  up to date
    ✓ 1 unit done, 0 keys written
    ");
    assert_eq!(test.read_file("fr.json")?, written);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_partial_response_leaves_target_untouched() -> Result<()> {
    let server = mock_provider(
        ResponseTemplate::new(200).set_body_json(completion(r#"{"b": "Deux"}"#)),
    )
    .await;
    let test = CliTest::new()?;
    test.write_file("i18n.yaml", "- en: en.json\n  fr: fr.json\n")?;
    test.write_json("en.json", json!({"a": "One", "b": "Two", "c": "Three"}))?;
    let original = "{\"untouched\": true}";
    test.write_file("fr.json", original)?;

    let output = test.command(&server).output()?;

    assert_eq!(output.status.code(), Some(1));
    assert_snapshot!(test.stdout(&output), @r"
    ✘ en -> fr  fr.json  batch 1 returned no translation for 2 key(s): a, c
    ✘ 1 of 1 unit failed, 0 keys written
    ");
    assert_eq!(test.read_file("fr.json")?, original);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_unit_does_not_stop_siblings() -> Result<()> {
    let server = mock_provider(PrefixResponder("t:")).await;
    let test = CliTest::new()?;
    test.write_file(
        "i18n.yaml",
        "- en: en.json\n  fr: fr.json\n  ja: ja.json\n",
    )?;
    test.write_json("en.json", json!({"k": "v"}))?;
    test.write_file("fr.json", "[1, 2]")?;

    let output = test.command(&server).output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(test.stdout(&output).contains("✘ en -> fr"));
    assert!(test.stdout(&output).contains("✓ en -> ja"));
    assert_eq!(test.read_file("fr.json")?, "[1, 2]");
    assert!(test.root().join("ja.json").exists());

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dry_run_lists_missing_keys() -> Result<()> {
    let server = mock_provider(PrefixResponder("fr:")).await;
    let test = CliTest::new()?;
    test.write_file("i18n.yaml", "- en: en.json\n  fr: fr.json\n")?;
    test.write_json("en.json", json!({"a": {"b": "Hello"}, "n": 1}))?;

    let output = test.command(&server).arg("--dry-run").output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_snapshot!(test.stdout(&output), @r"
    • en -> fr  fr.json  would translate 1, copy 1
        + a.b
        + n
    ✓ 1 unit done, 0 keys written
    ");
    assert!(!test.root().join("fr.json").exists());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_verbose_lists_written_keys() -> Result<()> {
    let server = mock_provider(PrefixResponder("fr:")).await;
    let test = CliTest::new()?;
    test.write_file("i18n.yaml", "- en: en.json\n  fr: fr.json\n")?;
    test.write_json(
        "en.json",
        json!({"nav": {"home": "Home"}, "cards": [{"a": "A"}, {}], "n": 1}),
    )?;

    let output = test.command(&server).arg("-v").output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_snapshot!(test.stdout(&output), @r"
    ✓ en -> fr  fr.json  translated 2, copied 2
        + nav.home
        + cards[0].a
        + cards[1]
        + n
    ✓ 1 unit done, 4 keys written
    ");
    assert_snapshot!(test.read_file("fr.json")?, @r#"
    {
      "nav": {
        "home": "fr:Home"
      },
      "cards": [
        {
          "a": "fr:A"
        },
        {}
      ],
      "n": 1
    }
    "#);

    Ok(())
}
