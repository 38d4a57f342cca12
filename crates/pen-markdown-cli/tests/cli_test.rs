//! Integration tests for the pen-markdown CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pen-markdown"))
}

#[test]
fn test_basic_stdin() {
    cli()
        .write_stdin("<h1>Title</h1><p>Content</p>")
        .assert()
        .success()
        .stdout("Title\n=====\n\nContent\n");
}

#[test]
fn test_empty_input_writes_nothing() {
    cli().write_stdin("").assert().success().stdout("");
}

#[test]
fn test_file_input() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("input.html");
    fs::write(&input_path, "<p>Test <em>content</em></p>").unwrap();

    cli()
        .arg(input_path.to_str().unwrap())
        .assert()
        .success()
        .stdout("Test _content_\n");
}

#[test]
fn test_file_output() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("output.md");

    cli()
        .arg("-o")
        .arg(output_path.to_str().unwrap())
        .write_stdin("<p>Output test</p>")
        .assert()
        .success()
        .stdout("");

    let output = fs::read_to_string(&output_path).unwrap();
    assert_eq!(output, "Output test\n");
}

#[test]
fn test_dash_reads_stdin() {
    cli()
        .arg("-")
        .write_stdin("<p>Dash test</p>")
        .assert()
        .success()
        .stdout("Dash test\n");
}

#[test]
fn test_heading_style_flag() {
    cli()
        .args(["--heading-style", "atx"])
        .write_stdin("<h1>Title</h1><p>Content</p>")
        .assert()
        .success()
        .stdout("# Title\n\nContent\n");
}

#[test]
fn test_editor_preset() {
    cli()
        .arg("--editor")
        .write_stdin("<h2>Notes</h2><pre><code class=\"language-rust\">let a = 1;</code></pre>")
        .assert()
        .success()
        .stdout("## Notes\n\n```rust\nlet a = 1;\n```\n");
}

#[test]
fn test_flags_override_editor_preset() {
    cli()
        .args(["--editor", "--heading-style", "setext", "--fence", "~~~"])
        .write_stdin("<h1>Title</h1><pre><code>x</code></pre>")
        .assert()
        .success()
        .stdout("Title\n=====\n\n~~~\nx\n~~~\n");
}

#[test]
fn test_list_and_delimiter_flags() {
    cli()
        .args(["--bullet-list-marker", "-", "--em-delimiter", "*", "--strong-delimiter", "__"])
        .write_stdin("<ul><li><em>a</em></li><li><strong>b</strong></li></ul>")
        .assert()
        .success()
        .stdout("-   *a*\n-   __b__\n");
}

#[test]
fn test_reference_links() {
    cli()
        .args(["--link-style", "referenced", "--link-reference-style", "collapsed"])
        .write_stdin(r#"<p><a href="/docs">docs</a></p>"#)
        .assert()
        .success()
        .stdout("[docs][]\n\n[docs]: /docs\n");
}

#[test]
fn test_keep_and_remove() {
    cli()
        .args(["--keep", "del", "--remove", "script", "--remove", "style"])
        .write_stdin("<p>a <del>b</del></p><script>x()</script><style>p {}</style>")
        .assert()
        .success()
        .stdout("a <del>b</del>\n");
}

#[test]
fn test_invalid_option_value() {
    cli()
        .args(["--heading-style", "underlined"])
        .write_stdin("<p>x</p>")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::starts_with("Error: "))
        .stderr(predicate::str::contains("underlined"));
}

#[test]
fn test_invalid_bullet_marker() {
    cli()
        .args(["--bullet-list-marker", "**"])
        .write_stdin("<ul><li>x</li></ul>")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("single character"));
}

#[test]
fn test_invalid_filter() {
    cli()
        .args(["--keep", "not a tag"])
        .write_stdin("<p>x</p>")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid filter"));
}

#[test]
fn test_missing_input_file() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.html");

    cli()
        .arg(missing.to_str().unwrap())
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error: "));
}

#[test]
fn test_verbose_logs_to_stderr() {
    cli()
        .arg("--verbose")
        .write_stdin("<p>x</p>")
        .assert()
        .success()
        .stdout("x\n")
        .stderr(predicate::str::contains("converted"));
}
