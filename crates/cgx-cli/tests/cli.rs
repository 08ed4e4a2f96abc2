use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const NOT_EXPORTED: &str = "Course was not exported, check log output for details";

const COURSE_JSON: &str = r#"{
  "org": "MITx",
  "course": "101",
  "run": "2024",
  "display_name": "Intro",
  "chapters": [
    {
      "url_name": "week1",
      "display_name": "Week 1",
      "units": [
        { "url_name": "welcome", "display_name": "Welcome", "body": "<p>Hello</p>" }
      ]
    }
  ]
}"#;

/// Isolated home, data dir and export root for one test
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().expect("sandbox");
        fs::create_dir(dir.path().join("exports")).expect("export root");
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn export_root(&self) -> PathBuf {
        self.path().join("exports")
    }

    fn cgx(&self) -> Command {
        let mut cmd = Command::cargo_bin("cgx").expect("cgx binary");
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("CGX_EXPORT_DIR", self.export_root())
            .env("CGX_DATA_DIR", self.path().join("data"))
            .arg("--no-color");
        cmd
    }

    fn import_course(&self) {
        self.import_course_json(COURSE_JSON);
    }

    /// Import the course again under a new display name
    fn change_course(&self, display_name: &str) {
        let json = COURSE_JSON.replace("\"Intro\"", &format!("\"{}\"", display_name));
        self.import_course_json(&json);
    }

    fn import_course_json(&self, json: &str) {
        let file = self.path().join("course.json");
        fs::write(&file, json).expect("course file");
        self.cgx()
            .args(["course", "import"])
            .arg(&file)
            .assert()
            .success();
    }

    /// Bare repository to push to, or `None` when git is unavailable
    fn bare_remote(&self) -> Option<String> {
        if !git_available() {
            eprintln!("git not available, skipping");
            return None;
        }
        let remote = self.path().join("remote.git");
        let status = Command::new("git")
            .env("HOME", self.path())
            .args(["init", "--bare", "-q"])
            .arg(&remote)
            .status()
            .expect("git init");
        assert!(status.success());
        Some(format!("file://{}", remote.display()))
    }

    fn last_commit_author(&self) -> String {
        let output = Command::new("git")
            .env("HOME", self.path())
            .arg("--git-dir")
            .arg(self.path().join("remote.git"))
            .args(["log", "-1", "--format=%an|%ae"])
            .output()
            .expect("git log");
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[test]
fn export_requires_course_and_url() {
    let sandbox = Sandbox::new();
    sandbox.cgx().arg("export").assert().failure();
    sandbox
        .cgx()
        .args(["export", "MITx/101/2024"])
        .assert()
        .failure();
}

#[test]
fn malformed_url_is_not_exported() {
    let sandbox = Sandbox::new();
    sandbox
        .cgx()
        .args(["export", "MITx/101/2024", "https://example.com/repo"])
        .assert()
        .failure()
        .stderr(contains(NOT_EXPORTED));
    assert!(fs::read_dir(sandbox.export_root()).unwrap().next().is_none());
}

#[test]
fn url_without_credentials_is_not_exported() {
    let sandbox = Sandbox::new();
    sandbox
        .cgx()
        .args(["export", "MITx/101/2024", "https://example.com/repo.git"])
        .assert()
        .failure()
        .stderr(contains(NOT_EXPORTED));
}

#[test]
fn missing_export_root_is_not_exported() {
    let sandbox = Sandbox::new();
    sandbox
        .cgx()
        .env("CGX_EXPORT_DIR", sandbox.path().join("missing"))
        .args(["export", "MITx/101/2024", "file:///tmp/c.git"])
        .assert()
        .failure()
        .stderr(contains(NOT_EXPORTED));
}

#[test]
fn export_pushes_course_and_reexport_without_changes_fails() {
    let sandbox = Sandbox::new();
    let Some(url) = sandbox.bare_remote() else {
        return;
    };
    sandbox.import_course();

    sandbox
        .cgx()
        .args(["export", "MITx/101/2024", &url])
        .assert()
        .success()
        .stdout("");

    let working_copy = sandbox.export_root().join("remote");
    assert!(working_copy.join("course.xml").exists());
    assert!(working_copy.join("html/welcome.html").exists());
    assert_eq!(
        sandbox.last_commit_author(),
        "STUDIO_PUSH_TO_LMS|STUDIO_PUSH_TO_LMS@example.com"
    );

    // Nothing changed, so there is nothing to commit
    sandbox
        .cgx()
        .args(["export", "MITx/101/2024", &url])
        .assert()
        .failure()
        .stderr(contains(NOT_EXPORTED));
}

#[test]
fn export_attributes_commit_to_known_user() {
    let sandbox = Sandbox::new();
    let Some(url) = sandbox.bare_remote() else {
        return;
    };
    sandbox.import_course();
    sandbox
        .cgx()
        .args(["user", "add", "alice", "alice@example.com"])
        .assert()
        .success();

    sandbox
        .cgx()
        .args(["export", "MITx/101/2024", &url])
        .assert()
        .success();
    assert_eq!(
        sandbox.last_commit_author(),
        "STUDIO_PUSH_TO_LMS|STUDIO_PUSH_TO_LMS@example.com"
    );

    // Second export refreshes the existing working copy
    sandbox.change_course("Intro, revised");
    sandbox
        .cgx()
        .args(["export", "MITx/101/2024", &url, "--user", "alice"])
        .assert()
        .success();

    assert_eq!(sandbox.last_commit_author(), "alice|alice@example.com");
}

#[test]
fn export_recovers_after_remote_was_unreachable() {
    let sandbox = Sandbox::new();
    let Some(url) = sandbox.bare_remote() else {
        return;
    };
    sandbox.import_course();
    sandbox
        .cgx()
        .args(["export", "MITx/101/2024", &url])
        .assert()
        .success();

    let remote = sandbox.path().join("remote.git");
    let moved = sandbox.path().join("remote.moved");
    fs::rename(&remote, &moved).expect("hide remote");
    sandbox.change_course("Intro, revised");
    sandbox
        .cgx()
        .args(["export", "MITx/101/2024", &url])
        .assert()
        .failure()
        .stderr(contains(NOT_EXPORTED));

    fs::rename(&moved, &remote).expect("restore remote");
    sandbox
        .cgx()
        .args(["export", "MITx/101/2024", &url])
        .assert()
        .success();

    let course_xml = sandbox.export_root().join("remote/course/2024.xml");
    assert!(fs::read_to_string(course_xml)
        .expect("course xml")
        .contains("Intro, revised"));
    assert_eq!(
        sandbox.last_commit_author(),
        "STUDIO_PUSH_TO_LMS|STUDIO_PUSH_TO_LMS@example.com"
    );
}

#[test]
fn export_into_named_repo_dir() {
    let sandbox = Sandbox::new();
    let Some(url) = sandbox.bare_remote() else {
        return;
    };
    sandbox.import_course();

    sandbox
        .cgx()
        .args(["export", "MITx/101/2024", &url, "-r", "intro"])
        .assert()
        .success();

    assert!(sandbox.export_root().join("intro/course.xml").exists());
    assert!(!sandbox.export_root().join("remote").exists());
}

#[test]
fn unknown_course_is_not_exported() {
    let sandbox = Sandbox::new();
    let Some(url) = sandbox.bare_remote() else {
        return;
    };

    sandbox
        .cgx()
        .args(["export", "foo/blah/100", &url])
        .assert()
        .failure()
        .stderr(contains(NOT_EXPORTED));
}

#[test]
fn push_requires_course_access() {
    let sandbox = Sandbox::new();
    sandbox.import_course();

    sandbox
        .cgx()
        .args(["push", "MITx/101/2024", "--user", "student"])
        .assert()
        .failure()
        .stderr(contains("Permission denied"));
}

#[test]
fn push_without_action_shows_stored_url() {
    let sandbox = Sandbox::new();
    sandbox.import_course();
    sandbox
        .cgx()
        .args(["user", "add", "admin", "admin@example.com", "--staff"])
        .assert()
        .success();
    sandbox
        .cgx()
        .args(["course", "set-url", "MITx/101/2024", "file:///tmp/c.git"])
        .assert()
        .success();

    sandbox
        .cgx()
        .args(["push", "MITx/101/2024", "--user", "admin", "--json"])
        .assert()
        .success()
        .stdout(contains("\"git_url\": \"file:///tmp/c.git\""))
        .stdout(contains("\"failed\": false"));
}

#[test]
fn course_import_reports_update() {
    let sandbox = Sandbox::new();
    let file = sandbox.path().join("course.json");
    fs::write(&file, COURSE_JSON).expect("course file");

    for expected in ["Stored MITx/101/2024", "Updated MITx/101/2024"] {
        sandbox
            .cgx()
            .args(["course", "import"])
            .arg(&file)
            .assert()
            .success()
            .stdout(contains(expected));
    }
}

#[test]
fn course_list_shows_imported_course() {
    let sandbox = Sandbox::new();
    sandbox.import_course();

    sandbox
        .cgx()
        .args(["course", "list"])
        .assert()
        .success()
        .stdout(contains("MITx/101/2024"))
        .stdout(contains("Intro"));
}

#[test]
fn config_show_reflects_overrides() {
    let sandbox = Sandbox::new();
    sandbox
        .cgx()
        .args(["config", "show", "--json"])
        .assert()
        .success()
        .stdout(contains("STUDIO_PUSH_TO_LMS"))
        .stdout(contains("exports"));
}
