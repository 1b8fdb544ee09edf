use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const FEATURES: &str = r#"{
  "features": {
    "ts": { "dependencies": [] },
    "node": { "dependencies": ["ts"] },
    "react": { "dependencies": ["ts"] },
    "cue": { "dependencies": [] }
  },
  "presets": {
    "lib": ["ts", "node", "cue"],
    "web": ["react"]
  }
}"#;

/// A project directory plus a CUE package installed outside of it.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("project")).unwrap();
        std::fs::create_dir_all(dir.path().join("home")).unwrap();
        let package = dir.path().join("pkg");
        std::fs::create_dir_all(&package).unwrap();
        std::fs::write(package.join("features.json"), FEATURES).unwrap();
        Self { dir }
    }

    fn project_path(&self, relative: &str) -> PathBuf {
        self.dir.path().join("project").join(relative)
    }

    fn cuekit(&self, args: &[&str]) -> Output {
        let home = self.dir.path().join("home");
        Command::new(env!("CARGO_BIN_EXE_cuekit"))
            .args(args)
            .arg("-C")
            .arg(self.dir.path().join("project"))
            .arg("--package-root")
            .arg(self.dir.path().join("pkg"))
            .env("HOME", &home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env("CUEKIT_EVALUATOR", self.dir.path().join("no-such-cue"))
            .env_remove("CUEKIT_PACKAGE_ROOT")
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to run cuekit")
    }

    fn json(&self, args: &[&str]) -> (bool, Value) {
        let output = self.cuekit(args);
        let value = serde_json::from_slice(&output.stdout).unwrap_or_else(|err| {
            panic!(
                "stdout is not JSON ({err}): {}",
                String::from_utf8_lossy(&output.stdout)
            )
        });
        (output.status.success(), value)
    }
}

#[test]
fn help_lists_all_commands() {
    let output = Command::new(env!("CARGO_BIN_EXE_cuekit"))
        .arg("--help")
        .output()
        .expect("failed to run cuekit");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for cmd in ["init", "add", "remove", "generate", "validate"] {
        assert!(stdout.contains(cmd), "help is missing {cmd}: {stdout}");
    }
}

#[test]
fn init_add_remove_validate_round_trip() {
    let sb = Sandbox::new();

    let (ok, init) = sb.json(&["init", "--preset", "lib"]);
    assert!(ok, "{init}");
    assert_eq!(init["created"][0], "dependencies.json");
    assert!(sb.project_path("src/index.ts").is_file());

    let (ok, add) = sb.json(&["add", "react"]);
    assert!(ok);
    assert_eq!(add["added"], true);

    let (ok, again) = sb.json(&["add", "react"]);
    assert!(ok);
    assert_eq!(again["added"], false);

    let (ok, removed) = sb.json(&["remove", "node"]);
    assert!(ok);
    assert_eq!(removed["removed"], true);

    let deps: Value =
        serde_json::from_str(&std::fs::read_to_string(sb.project_path("dependencies.json")).unwrap())
            .unwrap();
    assert_eq!(deps["dependencies"], serde_json::json!(["ts", "cue", "react"]));

    let (ok, validate) = sb.json(&["validate"]);
    assert!(ok);
    assert_eq!(validate["valid"], true);
    assert_eq!(validate["message"], "Validation passed");
}

#[test]
fn unknown_feature_exits_nonzero() {
    let sb = Sandbox::new();
    let (ok, add) = sb.json(&["add", "typed"]);
    assert!(!ok);
    assert_eq!(add["success"], false);
    assert_eq!(add["error"], "Unknown feature: typed. Available: cue, node, react, ts");
}

#[test]
fn validate_flags_unknown_declared_feature() {
    let sb = Sandbox::new();
    std::fs::write(sb.project_path("dependencies.json"), r#"["ts", "x"]"#).unwrap();

    let (ok, out) = sb.json(&["validate"]);
    assert!(ok);
    assert_eq!(out["valid"], false);
    assert_eq!(out["errors"], serde_json::json!(["Unknown feature: 'x'"]));
}

#[test]
fn generate_without_evaluator_fails_and_writes_nothing() {
    let sb = Sandbox::new();
    sb.json(&["init"]);

    let (ok, out) = sb.json(&["generate"]);
    assert!(!ok);
    assert_eq!(out["success"], false);
    assert_eq!(
        out["error"],
        "CUE is not installed. Install from: https://cuelang.org/docs/install/"
    );
    assert!(!sb.project_path("package.json").exists());
    assert!(!sb.project_path("tsconfig.json").exists());
}

#[test]
fn text_format_prints_summary() {
    let sb = Sandbox::new();
    let output = sb.cuekit(&["remove", "ts", "--format", "text"]);
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("error: No dependencies.json found"), "{stdout}");
}

#[test]
fn malformed_project_config_is_an_error() {
    let sb = Sandbox::new();
    let config_dir = sb.project_path(".cuekit");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "[evaluator\nprogram = ").unwrap();

    let output = sb.cuekit(&["validate"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load config"));
}
