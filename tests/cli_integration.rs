use assert_cmd::Command;
use predicates::prelude::*;

const SOURCE: &str = "https://example.test/prequelbot-source";
const ISSUES: &str = "https://example.test/prequelbot-tracker";

/// A command isolated from the caller's environment and config files.
fn prequelbot(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("prequelbot").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("PREQUELBOT_CONFIG")
        .env_remove("PREQUELBOT_CATALOG")
        .env_remove("RUST_LOG")
        .env("REDDIT_USER", "prequel_bot")
        .env("GITHUB_SOURCE_URL", SOURCE)
        .env("GITHUB_ISSUES_URL", ISSUES);
    cmd
}

#[test]
fn reply_prints_reply_with_footer() {
    let dir = tempfile::tempdir().unwrap();
    prequelbot(&dir)
        .args(["reply", "--author", "obi", "--body", "Hello there!"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("General Kenobi!"))
        .stdout(predicate::str::contains(SOURCE))
        .stdout(predicate::str::contains(ISSUES));
}

#[test]
fn reply_without_match_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();
    prequelbot(&dir)
        .args(["reply", "--author", "obi", "--body", "This is not a quote from the prequels."])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn reply_ignores_own_messages() {
    let dir = tempfile::tempdir().unwrap();
    prequelbot(&dir)
        .args(["reply", "--author", "prequel_bot", "--body", "not. yet."])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn reply_uses_parent_message() {
    let dir = tempfile::tempdir().unwrap();
    prequelbot(&dir)
        .args([
            "reply",
            "--author",
            "anakin",
            "--body",
            "no.",
            "--parent-author",
            "palpatine",
            "--parent-body",
            "Did you ever hear the tragedy of Darth Plagueis the Wise?",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Darth Plagueis"));
}

#[test]
fn reply_to_own_message_uses_replies() {
    let dir = tempfile::tempdir().unwrap();
    prequelbot(&dir)
        .args([
            "reply",
            "--author",
            "user_1",
            "--body",
            "good bot",
            "--parent-id",
            "t1_abc",
            "--prior-id",
            "t1_xyz",
            "--prior-id",
            "t1_abc",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(SOURCE));
}

#[test]
fn missing_username_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    prequelbot(&dir)
        .env_remove("REDDIT_USER")
        .args(["reply", "--author", "obi", "--body", "hello there"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("REDDIT_USER"));
}

#[test]
fn config_file_supplies_settings() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".prequelbot.toml"),
        r#"
[bot]
username = "from_file_bot"

[links]
source_url = "https://file.test/source"
issues_url = "https://file.test/issues"
"#,
    )
    .unwrap();

    prequelbot(&dir)
        .env_remove("REDDIT_USER")
        .env_remove("GITHUB_SOURCE_URL")
        .args(["reply", "--author", "obi", "--body", "hello there"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://file.test/source"))
        // Environment still wins over the file.
        .stdout(predicate::str::contains(ISSUES));

    prequelbot(&dir)
        .env_remove("REDDIT_USER")
        .args(["reply", "--author", "from_file_bot", "--body", "hello there"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn defective_catalog_fails_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("rules.json");
    std::fs::write(
        &catalog,
        r#"{
            "messages": [{"pattern": "(unclosed", "response": "x"}],
            "footer": {"signatures": ["s"], "sourceCodeTexts": ["src"], "issuesTexts": ["iss"]}
        }"#,
    )
    .unwrap();

    prequelbot(&dir)
        .args(["--catalog", catalog.to_str().unwrap(), "check"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("messages rule #0"));
}

#[test]
fn out_of_range_placeholder_fails_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("rules.toml");
    std::fs::write(
        &catalog,
        r#"
[[commands]]
pattern = "!order (\\d+)"
response = "Execute order $1."

[footer]
signatures = ["s"]
source_code_texts = ["src"]
issues_texts = ["iss"]
"#,
    )
    .unwrap();

    prequelbot(&dir)
        .args(["--catalog", catalog.to_str().unwrap(), "reply", "--author", "a", "--body", "b"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("`$1`"));
}

#[test]
fn check_reports_builtin_catalog() {
    let dir = tempfile::tempdir().unwrap();
    prequelbot(&dir)
        .args(["check", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"catalog\": \"built-in\""))
        .stdout(predicate::str::contains("\"commands\""));
}

#[test]
fn check_flags_empty_category() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("rules.json");
    std::fs::write(
        &catalog,
        r#"{
            "replies": [{"pattern": "good bot", "response": "thanks"}],
            "messages": [{"pattern": "hello there", "response": "General Kenobi!"}],
            "footer": {"signatures": ["s"], "sourceCodeTexts": ["src"], "issuesTexts": ["iss"]}
        }"#,
    )
    .unwrap();

    prequelbot(&dir)
        .args(["--catalog", catalog.to_str().unwrap(), "check", "--format", "text"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("category `commands` has no rules"));
}

#[test]
fn stream_answers_each_line() {
    let dir = tempfile::tempdir().unwrap();
    let input = concat!(
        r#"{"message": {"body": "hello there", "author": {"name": "obi"}}}"#,
        "\n",
        r#"{"message": {"body": "meh", "author": {"name": "obi"}}}"#,
        "\n",
        "garbage\n",
    );

    let output = prequelbot(&dir)
        .args(["stream", "--seed", "66"])
        .write_stdin(input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0]["reply"].as_str().unwrap().contains(SOURCE));
    assert!(lines[1]["reply"].is_null());
    assert!(lines[2]["error"].is_string());
}

#[test]
fn stream_is_reproducible_with_seed() {
    let dir = tempfile::tempdir().unwrap();
    let input = r#"{"message": {"body": "hello there", "author": {"name": "obi"}}}
{"message": {"body": "I don't like sand", "author": {"name": "ani"}}}
{"message": {"body": "what have i done", "author": {"name": "ani"}}}
"#;

    let run = || {
        prequelbot(&dir)
            .args(["stream", "--seed", "1138"])
            .write_stdin(input)
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn schema_describes_catalog() {
    let dir = tempfile::tempdir().unwrap();
    prequelbot(&dir)
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"footer\""))
        .stdout(predicate::str::contains("\"pattern\""));
}
