use std::fs;
use std::process::{Command, Output};

use similar_asserts::assert_eq;
use tempfile::TempDir;

/// Test fixture holding a directory of input files.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Fixture {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Write a file and return its path as a string argument.
    fn write(&self, name: &str, content: &str) -> String {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write input file");
        path.display().to_string()
    }
}

/// Run the binary with the given arguments and a scrubbed environment.
fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_linediff"))
        .args(args)
        .env_remove("POSIXLY_CORRECT")
        .output()
        .expect("Failed to run linediff")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is not UTF-8")
}

#[test]
fn unified_diff_with_labels() {
    let f = Fixture::new();
    let old = f.write("old.txt", "a\nb\nc\n");
    let new = f.write("new.txt", "a\nB\nc\n");

    let output = run(&[old.as_str(), new.as_str(), "--label", "old", "--label", "new"]);
    assert_eq!(
        stdout(&output),
        "--- old\n+++ new\n@@ -1,3 +1,3 @@\n a\n-b\n+B\n c\n"
    );
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn context_format_with_labels() {
    let f = Fixture::new();
    let old = f.write("old.txt", "1\n2\n3\n4\n5\n");
    let new = f.write("new.txt", "1\n2\nX\n4\n5\n");

    let output = run(&[
        old.as_str(),
        new.as_str(),
        "-c",
        "-n",
        "2",
        "--label",
        "old",
        "--label",
        "new",
    ]);
    assert_eq!(
        stdout(&output),
        "*** old\n--- new\n\
         ***************\n\
         *** 1,5 ****\n  1\n  2\n! 3\n  4\n  5\n\
         --- 1,5 ----\n  1\n  2\n! X\n  4\n  5\n"
    );
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn identical_files_exit_zero_with_no_output() {
    let f = Fixture::new();
    let old = f.write("old.txt", "same\n");
    let new = f.write("new.txt", "same\n");

    let output = run(&[old.as_str(), new.as_str()]);
    assert_eq!(stdout(&output), "");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn header_shows_file_name_and_time_without_labels() {
    let f = Fixture::new();
    let old = f.write("old.txt", "a\n");
    let new = f.write("new.txt", "b\n");

    let output = run(&[old.as_str(), new.as_str()]);
    let text = stdout(&output);
    let mut lines = text.lines();
    let first = lines.next().unwrap();
    let second = lines.next().unwrap();
    assert!(first.starts_with("--- ") && first.contains("old.txt\t"));
    assert!(second.starts_with("+++ ") && second.contains("new.txt\t"));
}

#[test]
fn function_line_option_labels_hunks() {
    let f = Fixture::new();
    let old = f.write(
        "old.c",
        "int main(void) {\n  a;\n  b;\n  c;\n  d;\n  e;\n  f;\n}\n",
    );
    let new = f.write(
        "new.c",
        "int main(void) {\n  a;\n  b;\n  c;\n  d;\n  E;\n  f;\n}\n",
    );

    let output = run(&[
        old.as_str(),
        new.as_str(),
        "-n",
        "1",
        "-F",
        "^[A-Za-z_]",
        "--label",
        "old",
        "--label",
        "new",
    ]);
    assert_eq!(
        stdout(&output),
        "--- old\n+++ new\n@@ -5,3 +5,3 @@ int main(void) {\n   d;\n-  e;\n+  E;\n   f;\n"
    );
}

#[test]
fn ignore_blank_lines_drops_blank_only_changes() {
    let f = Fixture::new();
    let old = f.write("old.txt", "a\nb\n");
    let new = f.write("new.txt", "a\n\nb\n");

    let output = run(&[old.as_str(), new.as_str(), "-B"]);
    assert_eq!(stdout(&output), "");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn bad_pattern_reports_trouble() {
    let f = Fixture::new();
    let old = f.write("old.txt", "a\n");
    let new = f.write("new.txt", "b\n");

    let output = run(&[old.as_str(), new.as_str(), "-I", "["]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Invalid pattern"));
}

#[test]
fn missing_file_reports_trouble() {
    let f = Fixture::new();
    let old = f.write("old.txt", "a\n");
    let missing = f.dir.path().join("absent.txt").display().to_string();

    let output = run(&[old.as_str(), missing.as_str()]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Failed to read"));
}

#[test]
fn posix_mode_keeps_the_blank_context_prefix() {
    let f = Fixture::new();
    let old = f.write("old.txt", "a\n\nc\n");
    let new = f.write("new.txt", "a\n\nC\n");
    let labels = ["--label", "old", "--label", "new"];

    // By default an empty context line is written with no prefix at all.
    let mut args = vec![old.as_str(), new.as_str(), "-n", "1"];
    args.extend(labels);
    let output = run(&args);
    assert_eq!(
        stdout(&output),
        "--- old\n+++ new\n@@ -2,2 +2,2 @@\n\n-c\n+C\n"
    );

    // POSIX conformance restores the leading space.
    let output = Command::new(env!("CARGO_BIN_EXE_linediff"))
        .args(&args)
        .env("POSIXLY_CORRECT", "1")
        .output()
        .expect("Failed to run linediff");
    assert_eq!(
        stdout(&output),
        "--- old\n+++ new\n@@ -2,2 +2,2 @@\n \n-c\n+C\n"
    );
}
