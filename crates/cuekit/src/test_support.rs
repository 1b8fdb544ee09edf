//! Fixtures shared by command tests: a temp project with an installed CUE
//! package, and an in-process evaluator.

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};

use cuekit_core::{FileSystem, StdFs};
use cuekit_process::{EvalError, Evaluator, VetOutcome};
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::context::CommandContext;

pub(crate) const FIXTURE_FEATURES: &str = r#"{
  "features": {
    "ts": { "dependencies": [] },
    "node": { "dependencies": ["ts"] },
    "node-cjs": { "dependencies": ["node"] },
    "vite": { "dependencies": ["ts"] },
    "react": { "dependencies": ["vite"] },
    "vite-react": { "dependencies": ["react", "vite"] },
    "cue": { "dependencies": [] },
    "lint": { "dependencies": [] }
  },
  "presets": {
    "lib": ["ts", "node", "cue"],
    "app": ["vite-react"],
    "bare": []
  }
}"#;

pub(crate) struct Fixture {
    _dir: TempDir,
    pub project: PathBuf,
    pub package: PathBuf,
}

impl Fixture {
    /// Project with the package installed at its default location.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("project");
        let package = project.join("node_modules/@mark1russell7/cue");
        std::fs::create_dir_all(&package).unwrap();
        std::fs::write(package.join("features.json"), FIXTURE_FEATURES).unwrap();

        for (sub, files) in [
            ("npm/package", &["base", "ts", "node", "viteReact", "cue"][..]),
            ("git/ignore", &["base", "node", "vite-react"][..]),
        ] {
            let frag_dir = package.join(sub);
            std::fs::create_dir_all(&frag_dir).unwrap();
            for name in files {
                std::fs::write(frag_dir.join(format!("{name}.cue")), "package x\n").unwrap();
            }
        }

        Self {
            _dir: dir,
            project,
            package,
        }
    }

    /// Project with no package installed.
    pub fn without_package() -> Self {
        let fixture = Self::new();
        std::fs::remove_dir_all(&fixture.package).unwrap();
        fixture
    }

    pub fn ctx<'a>(&self, evaluator: &'a dyn Evaluator) -> CommandContext<'a> {
        self.ctx_with_fs(&StdFs, evaluator)
    }

    pub fn ctx_with_fs<'a>(
        &self,
        fs: &'a dyn FileSystem,
        evaluator: &'a dyn Evaluator,
    ) -> CommandContext<'a> {
        CommandContext {
            fs,
            evaluator,
            project_root: self.project.clone(),
            package_root: self.package.clone(),
        }
    }

    pub fn write_deps(&self, content: &str) {
        std::fs::write(self.project.join("dependencies.json"), content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.project.join(relative)).unwrap()
    }

    pub fn read_json(&self, relative: &str) -> Value {
        serde_json::from_str(&self.read(relative)).unwrap()
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.project.join(relative).exists()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EvalCall {
    pub dir: PathBuf,
    pub files: Vec<String>,
    pub expression: String,
}

/// Evaluator that answers from canned values and records calls.
pub(crate) struct FakeEvaluator {
    pub available: bool,
    /// Result for `-e output`; `None` simulates a non-zero exit.
    pub package: Option<Value>,
    /// Result for `-e patterns`; `None` simulates a non-zero exit.
    pub patterns: Option<Value>,
    pub vet: VetOutcome,
    pub calls: RefCell<Vec<EvalCall>>,
}

impl FakeEvaluator {
    pub fn new() -> Self {
        Self {
            available: true,
            package: Some(json!({
                "name": "generated",
                "type": "module",
                "files": ["dist"],
                "scripts": {"build": "tsc -b"},
                "devDependencies": {"typescript": "^5.6.0"}
            })),
            patterns: Some(json!(["node_modules/", "dist/"])),
            vet: VetOutcome::Passed,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn calls_for(&self, expression: &str) -> Vec<EvalCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.expression == expression)
            .cloned()
            .collect()
    }
}

impl Evaluator for FakeEvaluator {
    fn program(&self) -> &str {
        "fake-cue"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn eval(&self, dir: &Path, files: &[String], expression: &str) -> Result<Value, EvalError> {
        self.calls.borrow_mut().push(EvalCall {
            dir: dir.to_path_buf(),
            files: files.to_vec(),
            expression: expression.to_string(),
        });
        let canned = match expression {
            "output" => self.package.clone(),
            "patterns" => self.patterns.clone(),
            _ => None,
        };
        canned.ok_or_else(|| EvalError::Failed {
            status: 1,
            diagnostic: format!("{expression}: incomplete value"),
        })
    }

    fn vet(&self, _schema: &Path, _definition: &str, _data: &Path) -> Result<VetOutcome, EvalError> {
        Ok(self.vet.clone())
    }
}

/// Std file system that refuses writes to paths ending in `blocked`.
pub(crate) struct BlockingFs {
    pub blocked: &'static str,
}

impl FileSystem for BlockingFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        if path.ends_with(self.blocked) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "blocked"));
        }
        std::fs::write(path, content)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        if path.ends_with(self.blocked) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "blocked"));
        }
        std::fs::create_dir_all(path)
    }
}
