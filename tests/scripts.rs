//! End-to-end script runs through the public engine API.

use bistroscript::{Engine, EngineOptions, Flow};

fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

fn engine() -> Engine {
    Engine::new(EngineOptions::default())
}

#[test]
fn hello_world_script_runs_clean() {
    let mut engine = engine();
    let flow = engine
        .run_source(&lines(&[
            "#!/usr/bin/bistro",
            "minver 1",
            "",
            "- Say hello to the world",
            "writeln \"Hello World!\"",
        ]))
        .unwrap();
    assert_eq!(flow, Flow::Continue);
}

#[test]
fn variables_carry_across_statements() {
    let mut engine = engine();
    engine
        .run_source(&lines(&[
            "set name = \"Bistro\"",
            "set greeting = \"Hello #name\"",
            "set count = \"2+3\"",
        ]))
        .unwrap();
    assert_eq!(engine.vars.get("greeting"), Some("Hello Bistro"));
    assert_eq!(engine.vars.get("count"), Some("5"));
}

#[test]
fn minver_must_lead_the_script() {
    let mut engine = engine();
    let err = engine
        .run_source(&lines(&["writeln \"first\"", "minver 1"]))
        .unwrap_err();
    assert!(err.message.contains("minver"));
}

#[test]
fn minver_may_follow_a_shebang() {
    let mut engine = engine();
    engine
        .run_source(&lines(&["#!/usr/bin/bistro", "minver 1", "writeln \"ok\""]))
        .unwrap();
    assert!(engine.shebang_present);
}

#[test]
fn duplicate_minver_is_rejected() {
    let mut engine = engine();
    let err = engine
        .run_source(&lines(&["minver 1", "minver 1"]))
        .unwrap_err();
    assert!(err.message.contains("specifically 2"));
}

#[test]
fn comment_lines_never_reach_dispatch() {
    let mut engine = engine();
    engine
        .run_source(&lines(&[
            "- frobnicate is not a statement but this line is a comment",
            "set ok = \"yes\"",
        ]))
        .unwrap();
    assert_eq!(engine.vars.get("ok"), Some("yes"));
}

#[test]
fn diagnostics_carry_the_source_line_number() {
    let mut engine = engine();
    let err = engine
        .run_source(&lines(&[
            "- a comment",
            "",
            "set ok = \"yes\"",
            "unknownstatement \"x\"",
        ]))
        .unwrap_err();
    assert_eq!(err.line(), Some(4));
    assert!(err.message.contains("not a valid statement"));
}

#[test]
fn reserved_variables_resolve_in_templates() {
    let mut engine = engine();
    engine
        .run_source(&lines(&["set platform = \"#b_os/#b_arch\""]))
        .unwrap();
    let platform = engine.vars.get("platform").unwrap();
    assert!(platform.contains('/'));
    assert!(!platform.contains('#'));
}

#[test]
fn exit_skips_the_rest_of_the_script() {
    let mut engine = engine();
    let flow = engine
        .run_source(&lines(&[
            "set before = \"1\"",
            "exit",
            "set after = \"2\"",
        ]))
        .unwrap();
    assert_eq!(flow, Flow::Exit);
    assert_eq!(engine.vars.get("after"), None);
}
