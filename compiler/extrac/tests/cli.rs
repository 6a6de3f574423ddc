// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Command tests: the pure `*_source` functions, then the `extra` binary
//! end to end.

use std::io::Write;
use std::process::Command;

use extra_diagnostic::ErrorCode;
use extrac::commands::{check_source, explain, format_source, lisp, type_source, SourceKind};
use pretty_assertions::assert_eq;

const APP: &str = "\
state @count: Int = 0

helper double(#x: Int): Int => x * 2

main => double(2)
";

fn codes(result: Result<String, Vec<extra_diagnostic::Diagnostic>>) -> Vec<ErrorCode> {
    match result {
        Ok(output) => panic!("expected errors, got {output}"),
        Err(diagnostics) => diagnostics.iter().map(|d| d.code).collect(),
    }
}

#[test]
fn lisp_of_an_expression() {
    assert_eq!(
        lisp("1 + 2 * 3", SourceKind::Expression).unwrap(),
        "(+ 1 (* 2 3))"
    );
}

#[test]
fn lisp_of_a_module_lists_bodies() {
    let output = lisp(APP, SourceKind::Module).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.contains(&"double: (* x 2)"), "{output}");
    assert_eq!(lines[2], "main: (fn double (2))");
}

#[test]
fn type_of_an_expression() {
    assert_eq!(type_source("1 + 2", SourceKind::Expression).unwrap(), "3");
}

#[test]
fn types_of_module_declarations() {
    let output = type_source(APP, SourceKind::Module).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec!["state @count: Int", "double: fn(#x: Int): Int", "main: Int"]
    );
}

#[test]
fn check_reports_declaration_count() {
    assert_eq!(
        check_source(APP, SourceKind::Module).unwrap(),
        "OK (3 declarations)"
    );
    assert_eq!(check_source("1 + 2", SourceKind::Expression).unwrap(), "OK");
}

#[test]
fn check_collects_type_errors() {
    assert_eq!(
        codes(check_source("main => nope", SourceKind::Module)),
        vec![ErrorCode::E2003]
    );
    assert_eq!(
        codes(type_source("1 < 'a'", SourceKind::Expression)),
        vec![ErrorCode::E2007]
    );
}

#[test]
fn parse_errors_become_diagnostics() {
    let codes = codes(check_source("main => (1 +", SourceKind::Module));
    assert_eq!(codes.len(), 1);
    assert!(codes[0].is_parser_error(), "{codes:?}");
}

#[test]
fn rendered_diagnostics_point_at_the_source() {
    let source = "main => nope";
    let diagnostics = check_source(source, SourceKind::Module).unwrap_err();
    let rendered = diagnostics[0].render("app.extra", source);
    assert!(
        rendered.starts_with("error[E2003]: Cannot find 'nope'"),
        "{rendered}"
    );
    assert!(rendered.contains("--> app.extra:1:9"), "{rendered}");
}

#[test]
fn format_is_canonical() {
    assert_eq!(
        format_source("1+2   *3", SourceKind::Expression).unwrap(),
        "1 + 2 * 3"
    );
    let once = format_source(APP, SourceKind::Module).unwrap();
    let twice = format_source(&once, SourceKind::Module).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn view_sources_parse_tags() {
    assert!(type_source("<p>hi</p>", SourceKind::View).is_ok());
}

#[test]
fn explain_known_and_unknown_codes() {
    let text = explain("E2001").unwrap();
    assert!(text.starts_with("E2001 (type error): "), "{text}");
    assert!(explain("e1001").unwrap().contains("parse error"));
    assert_eq!(explain("E9999"), None);
}

#[test]
fn source_kind_from_flags() {
    let flags = |args: &[&str]| {
        let args: Vec<String> = args.iter().map(|arg| (*arg).to_string()).collect();
        SourceKind::from_flags(&args)
    };
    assert_eq!(flags(&["app.extra"]), SourceKind::Module);
    assert_eq!(flags(&["-e", "app.extra"]), SourceKind::Expression);
    assert_eq!(flags(&["app.extra", "--view"]), SourceKind::View);
}

fn extra(args: &[&str], source: &str) -> std::process::Output {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    let path = file.path().to_str().unwrap().to_string();
    let mut command = Command::new(env!("CARGO_BIN_EXE_extra"));
    command.args(args).arg(&path);
    command.env_remove("RUST_LOG");
    command.output().unwrap()
}

#[test]
fn binary_checks_a_clean_file() {
    let output = extra(&["check"], APP);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("OK (3 declarations): "), "{stdout}");
}

#[test]
fn binary_fails_on_type_errors() {
    let output = extra(&["check"], "main => nope");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error[E2003]"), "{stderr}");
    assert!(stderr.contains("1 error"), "{stderr}");
}

#[test]
fn binary_prints_lisp_for_expressions() {
    let output = extra(&["lisp", "--expr"], "a.b(1)");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim_end(),
        "(fn (. a b) (1))"
    );
}

#[test]
fn binary_explains_codes() {
    let output = Command::new(env!("CARGO_BIN_EXE_extra"))
        .args(["--explain", "E2003"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("E2003 (type error)"));
}
