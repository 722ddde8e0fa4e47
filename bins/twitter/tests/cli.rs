//! Process-level tests: spawn the real binary, pipe request lines to its
//! stdin and check what comes back on stdout.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_twitter(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_twitter"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn twitter");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("failed to write input");

    child.wait_with_output().expect("failed to wait for twitter")
}

fn response_ids(output: &Output) -> Vec<i64> {
    String::from_utf8(output.stdout.clone())
        .expect("stdout must be UTF-8")
        .lines()
        .map(|line| {
            let value: serde_json::Value =
                serde_json::from_str(line).expect("each stdout line must be JSON");
            value["id"].as_i64().expect("every response has an id")
        })
        .collect()
}

#[test]
fn wrong_arity_prints_usage_and_exits_cleanly() {
    let output = run_twitter(&["3"], "");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Usage: twitter"));
}

#[test]
fn sequential_mode_round_trip() {
    let input = "{\"command\":\"ADD\",\"id\":1,\"body\":\"hi\",\"timestamp\":10}\n\
                 {\"command\":\"FEED\",\"id\":2}\n\
                 {\"command\":\"DONE\"}\n";

    let output = run_twitter(&[], input);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "{\"success\":true,\"id\":1}");
    assert_eq!(
        lines[1],
        "{\"id\":2,\"feed\":[{\"body\":\"hi\",\"timestamp\":10.0}]}"
    );
}

#[test]
fn concurrent_mode_answers_every_request() {
    let mut input = String::new();
    for id in 1..=10 {
        input.push_str(&format!(
            "{{\"command\":\"ADD\",\"id\":{id},\"body\":\"post\",\"timestamp\":{id}}}\n"
        ));
    }
    input.push_str("{\"command\":\"DONE\"}\n");

    let output = run_twitter(&["4", "3"], &input);
    assert!(output.status.success());

    let mut ids = response_ids(&output);
    ids.sort_unstable();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());
}

#[test]
fn malformed_line_diagnostic_stays_off_stdout() {
    let input = "not json\n\
                 {\"command\":\"CONTAINS\",\"id\":5,\"timestamp\":1}\n\
                 {\"command\":\"DONE\"}\n";

    let output = run_twitter(&[], input);
    assert!(output.status.success());
    assert_eq!(response_ids(&output), vec![5]);
}
