use assert_cmd::Command;
use predicates::prelude::*;

fn hashchain() -> Command {
    Command::cargo_bin("hashchain").unwrap()
}

#[test]
fn mines_demo_payloads_by_default() {
    let output = hashchain()
        .args(["--difficulty", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mining block 1..."))
        .stdout(predicate::str::contains("Block 3 Data"))
        .stdout(predicate::str::contains("Blockchain:"))
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    assert_eq!(stdout.matches("Block mined: 0").count(), 3);
    assert_eq!(stdout.matches("Index: ").count(), 4);
}

#[test]
fn mines_given_payloads() {
    hashchain()
        .args(["-d", "1", "hello", "world"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Data: hello"))
        .stdout(predicate::str::contains("Data: world"))
        .stdout(predicate::str::contains("Index: 2"))
        .stdout(predicate::str::contains("Index: 3").not());
}

#[test]
fn prints_json_chain() {
    let assert = hashchain()
        .args(["--difficulty", "1", "--parallel", "--json", "only"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Mining block 1..."))
        .stderr(predicate::str::contains("Block mined: 0"));
    let output = assert.get_output();

    let blocks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let blocks = blocks.as_array().unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[1]["payload"], "only");
    assert_eq!(blocks[1]["previous_hash"], blocks[0]["hash"]);
}

#[test]
fn rejects_out_of_range_difficulty() {
    hashchain()
        .args(["--difficulty", "65"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("difficulty 65 exceeds"));
}

#[test]
fn reports_exhausted_search() {
    hashchain()
        .args(["--difficulty", "8", "--max-attempts", "1", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("mining block 1"));
}

#[test]
fn rejects_zero_max_attempts() {
    hashchain()
        .args(["--difficulty", "1", "--max-attempts", "0", "x"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--max-attempts"));
}
