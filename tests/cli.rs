mod common;

use common::{items_fixture, names, TestEnv};
use predicates::prelude::*;
use predicates::str::contains;

#[test]
fn sorts_explicit_path_compact() {
    let env = TestEnv::new();
    env.write("data.json", r#"[{"name":"b"},{"name":"a"}]"#);
    env.cmd()
        .args(["sort", "data.json", "--indent", "compact"])
        .assert()
        .success()
        .stdout(contains("data.json: 2 records, sorted"));
    assert_eq!(env.read("data.json"), r#"[{"name":"a"},{"name":"b"}]"#);
}

#[test]
fn sorts_explicit_path_pretty_by_default() {
    let env = TestEnv::new();
    env.write("data.json", r#"[{"name":"b"},{"name":"a"}]"#);
    env.cmd().args(["sort", "data.json"]).assert().success();
    assert_eq!(
        env.read("data.json"),
        "[\n\t{\n\t\t\"name\": \"a\"\n\t},\n\t{\n\t\t\"name\": \"b\"\n\t}\n]"
    );
}

#[test]
fn missing_file_fails() {
    let env = TestEnv::new();
    env.cmd()
        .args(["sort", "nowhere.json"])
        .assert()
        .failure()
        .stderr(contains("not found"));
}

#[test]
fn invalid_json_fails_and_leaves_file() {
    let env = TestEnv::new();
    env.write("broken.json", "[{\"name\": \"a\",]");
    env.cmd()
        .args(["sort", "broken.json"])
        .assert()
        .failure()
        .stderr(contains("invalid JSON"));
    assert_eq!(env.read("broken.json"), "[{\"name\": \"a\",]");
}

#[test]
fn missing_name_fails_without_writing() {
    let env = TestEnv::new();
    let original = r#"[{"name":"b"},{"label":"x"}]"#;
    env.write("data.json", original);
    env.cmd()
        .args(["sort", "data.json"])
        .assert()
        .failure()
        .stderr(contains("record 1 has no `name` field"));
    assert_eq!(env.read("data.json"), original);
}

#[test]
fn findings_are_printed_before_a_missing_name_aborts() {
    let env = TestEnv::new();
    let original = r#"[{"name":"b","label":"x","image":"https://i.imgur.com/b.png"},{"label":"x","image":"https://i.imgur.com/n.png"}]"#;
    env.write("items.json", original);
    env.cmd()
        .args(["sort", "items.json"])
        .assert()
        .failure()
        .stdout(contains("The following objects have duplicate labels:"))
        .stdout(contains("https://i.imgur.com/n.png"))
        .stderr(contains("record 1 has no `name` field"));
    assert_eq!(env.read("items.json"), original);
}

#[test]
fn non_ascii_is_escaped_unless_utf8_is_asked_for() {
    let env = TestEnv::new();
    env.write("relics.json", r#"[{"name":"Élan"},{"name":"Anima"}]"#);
    env.cmd().args(["sort", "relics.json", "--indent", "compact"]).assert().success();
    assert_eq!(env.read("relics.json"), r#"[{"name":"Anima"},{"name":"\u00c9lan"}]"#);

    env.cmd().args(["sort", "relics.json", "--indent", "compact", "--utf8"]).assert().success();
    assert_eq!(env.read("relics.json"), r#"[{"name":"Anima"},{"name":"Élan"}]"#);
}

#[test]
fn the_same_file_spelled_twice_runs_once() {
    let env = TestEnv::new();
    env.write("data.json", r#"[{"name":"b"},{"name":"a"}]"#);
    env.cmd()
        .args(["sort", "./data.json", "data.json"])
        .assert()
        .success()
        .stdout(contains("data.json: 2 records, sorted"))
        .stdout(contains("already sorted").not());
}

#[test]
fn findings_are_printed_and_write_still_happens() {
    let env = TestEnv::new();
    env.write("items.json", &items_fixture().to_string());
    env.cmd()
        .args(["sort", "items.json"])
        .assert()
        .success()
        .stdout(contains("The following objects have duplicate labels:"))
        .stdout(contains("\"name\":\"Bow of the Last Guardian\""))
        .stdout(contains("The following objects have invalid domains (valid domains = https://i.imgur.com):"))
        .stdout(contains("whip - https://imgur.com/whip.png"));
    assert_eq!(
        names(&env.read_json("items.json")),
        ["Abyssal whip", "Bow of the Last Guardian", "Dragon claws", "Zaryte bow"]
    );
}

#[test]
fn no_validate_suppresses_findings() {
    let env = TestEnv::new();
    env.write("items.json", &items_fixture().to_string());
    env.cmd()
        .args(["sort", "items.json", "--no-validate"])
        .assert()
        .success()
        .stdout(contains("duplicate").not())
        .stdout(contains("invalid domains").not());
}

#[test]
fn accept_and_match_flags_change_policy() {
    let env = TestEnv::new();
    env.write("items.json", &items_fixture().to_string());
    env.cmd()
        .args(["sort", "items.json", "--match", "contains", "--accept", "imgur.com"])
        .assert()
        .success()
        .stdout(contains("invalid domains").not());
}

#[test]
fn dry_run_does_not_write() {
    let env = TestEnv::new();
    let original = r#"[{"name":"b"},{"name":"a"}]"#;
    env.write("data.json", original);
    env.cmd()
        .args(["sort", "data.json", "--dry-run"])
        .assert()
        .success()
        .stdout(contains("not sorted"));
    assert_eq!(env.read("data.json"), original);
}

#[test]
fn check_fails_on_unsorted_and_passes_on_clean() {
    let env = TestEnv::new();
    env.write("data.json", r#"[{"name":"b"},{"name":"a"}]"#);
    env.cmd()
        .args(["check", "data.json", "--no-validate"])
        .assert()
        .code(1)
        .stdout(contains("not sorted"));

    env.write("data.json", r#"[{"name":"a"},{"name":"b"}]"#);
    env.cmd()
        .args(["check", "data.json", "--no-validate"])
        .assert()
        .success()
        .stdout(contains("already sorted"));
}

#[test]
fn check_fails_on_findings() {
    let env = TestEnv::new();
    env.write(
        "data.json",
        r#"[{"name":"a","label":"x","image":"https://i.imgur.com/a"},{"name":"b","label":"x","image":"https://i.imgur.com/b"}]"#,
    );
    env.cmd()
        .args(["check", "data.json"])
        .assert()
        .code(1)
        .stdout(contains("duplicate labels"));
}

#[test]
fn schema_flag_reports_shape_problems() {
    let env = TestEnv::new();
    env.write("data.json", r#"[{"name":"a","label":"a","image":"https://i.imgur.com/a","energy":"high"}]"#);
    env.cmd()
        .args(["check", "data.json", "--schema"])
        .assert()
        .code(1)
        .stdout(contains("do not match the entity schema"));
}
