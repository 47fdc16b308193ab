#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub root: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let root = tmp.path().join("workspace");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(root.join("src/data")).expect("create data dir");
        Self { _tmp: tmp, home, root }
    }

    /// Binary isolated from the real user config, running in the workspace.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("catalog-sorter");
        cmd.current_dir(&self.root)
            .env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", self.home.join(".config"))
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn write(&self, rel: &str, text: &str) -> PathBuf {
        let p = self.root.join(rel);
        if let Some(dir) = p.parent() {
            fs::create_dir_all(dir).expect("create parent dir");
        }
        fs::write(&p, text).expect("write fixture");
        p
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.root.join(rel)).expect("read fixture")
    }

    pub fn read_json(&self, rel: &str) -> Value {
        serde_json::from_str(&self.read(rel)).expect("fixture is valid json")
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }
}

/// Items in the shape the planner keeps them, deliberately out of order and
/// with one duplicate label and one off-domain image.
pub fn items_fixture() -> Value {
    serde_json::json!([
        {"label": "zbow", "image": "https://i.imgur.com/zbow.png", "name": "Zaryte bow"},
        {"label": "whip", "image": "https://imgur.com/whip.png", "name": "Abyssal whip"},
        {"label": "zbow", "image": "https://i.imgur.com/zbow2.png", "name": "Bow of the Last Guardian"},
        {"label": "claws", "image": "https://i.imgur.com/claws.png", "name": "Dragon claws", "breakdownNotes": "spec"}
    ])
}

pub fn names(v: &Value) -> Vec<String> {
    v.as_array()
        .expect("array")
        .iter()
        .map(|r| r["name"].as_str().expect("name").to_string())
        .collect()
}
