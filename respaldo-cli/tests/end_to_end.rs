use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use predicates::prelude::PredicateBooleanExt;
use tempfile::TempDir;

/// Isolated home, projects root, NAS root and log file for one run.
struct Sandbox {
    home: TempDir,
    projects: PathBuf,
    nas: PathBuf,
    log: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let home = TempDir::new().expect("home");
        let projects = home.path().join("ProyectosDAM");
        let nas = home.path().join("nas");
        let log = home.path().join("logs").join("backup.log");
        fs::create_dir_all(&projects).expect("projects root");
        fs::create_dir_all(&nas).expect("nas root");
        Self {
            home,
            projects,
            nas,
            log,
        }
    }

    fn respaldo(&self, dest: &str) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("respaldo"));
        cmd.env("HOME", self.home.path())
            .env("USERPROFILE", self.home.path())
            .env_remove("RUST_LOG")
            .env_remove("RESPALDO_PROJECTS_DIR")
            .env_remove("RESPALDO_NAS_DIR")
            .env_remove("RESPALDO_LOG_FILE")
            .env_remove("RESPALDO_GIT")
            .args(["--dest", dest])
            .arg("--projects-dir")
            .arg(&self.projects)
            .arg("--nas-dir")
            .arg(&self.nas)
            .arg("--log-file")
            .arg(&self.log);
        cmd
    }

    fn log_lines(&self, level: &str) -> Vec<String> {
        let needle = format!(" - {level} - ");
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .filter(|l| l.contains(&needle))
            .map(str::to_owned)
            .collect()
    }
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(home: &Path, dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .env("HOME", home)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .args(args)
        .output()
        .expect("spawn git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn nas_run_copies_single_file_project() {
    let sandbox = Sandbox::new();
    let project = sandbox.projects.join("C");
    fs::create_dir_all(&project).expect("mkdir C");
    fs::write(project.join("x.txt"), b"contenido de prueba\n").expect("write x.txt");

    sandbox
        .respaldo("nas")
        .assert()
        .success()
        .stdout(contains("'C'"))
        .stdout(contains("Backup finalizado"));

    let copy = sandbox.nas.join("C").join("x.txt");
    assert_eq!(fs::read(&copy).expect("copy"), b"contenido de prueba\n");

    let info = sandbox.log_lines("INFO");
    assert!(
        info.iter()
            .any(|l| l.contains("NAS backup completed for") && l.contains("C")),
        "log: {info:?}"
    );
}

#[test]
fn nas_dry_run_writes_nothing() {
    let sandbox = Sandbox::new();
    let project = sandbox.projects.join("C");
    fs::create_dir_all(&project).expect("mkdir C");
    fs::write(project.join("x.txt"), "x").expect("write");

    sandbox
        .respaldo("nas")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(contains("[dry-run]"))
        .stdout(contains("1 would copy"));

    assert!(!sandbox.nas.join("C").exists(), "dry-run must not create dirs");
}

#[test]
fn missing_projects_root_reports_error_and_exits_zero() {
    let sandbox = Sandbox::new();
    fs::remove_dir_all(&sandbox.projects).expect("rm projects root");

    sandbox
        .respaldo("nas")
        .assert()
        .success()
        .stdout(contains("la carpeta").and(contains("no existe")))
        .stdout(contains("Backup finalizado").not());

    assert_eq!(sandbox.log_lines("ERROR").len(), 1);
}

#[test]
fn unknown_destination_is_a_usage_error_before_logging() {
    let sandbox = Sandbox::new();

    Command::new(assert_cmd::cargo::cargo_bin!("respaldo"))
        .env("HOME", sandbox.home.path())
        .args(["--dest", "s3"])
        .arg("--log-file")
        .arg(&sandbox.log)
        .assert()
        .failure()
        .stderr(contains("s3"));

    assert!(!sandbox.log.exists(), "nothing may be logged on usage errors");
}

#[test]
fn missing_dest_flag_is_a_usage_error() {
    let sandbox = Sandbox::new();
    Command::new(assert_cmd::cargo::cargo_bin!("respaldo"))
        .env("HOME", sandbox.home.path())
        .assert()
        .failure()
        .stderr(contains("--dest"));
}

#[test]
fn github_run_warns_for_plain_dir_and_pushes_dirty_repo() {
    if !git_available() {
        eprintln!("git not installed; skipping");
        return;
    }
    let sandbox = Sandbox::new();
    let home = sandbox.home.path();

    // Bare remote for B.
    let remote = home.join("remote.git");
    fs::create_dir_all(&remote).expect("mkdir remote");
    git(home, &remote, &["init", "--bare", "--quiet"]);

    // A: plain directory.
    let a = sandbox.projects.join("A");
    fs::create_dir_all(&a).expect("mkdir A");
    fs::write(a.join("notes.txt"), "not versioned").expect("write");

    // B: repository with one tracked file, pushed once, then modified.
    let b = sandbox.projects.join("B");
    fs::create_dir_all(&b).expect("mkdir B");
    git(home, &b, &["init", "--quiet"]);
    git(home, &b, &["config", "user.name", "Respaldo Test"]);
    git(home, &b, &["config", "user.email", "respaldo@example.com"]);
    fs::write(b.join("README.md"), "v1\n").expect("write");
    git(home, &b, &["add", "."]);
    git(home, &b, &["commit", "--quiet", "-m", "initial"]);
    git(home, &b, &["remote", "add", "origin", remote.to_str().expect("utf8 path")]);
    git(home, &b, &["push", "--quiet", "-u", "origin", "HEAD"]);
    fs::write(b.join("README.md"), "v2\n").expect("modify");

    sandbox
        .respaldo("github")
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .assert()
        .success()
        .stdout(contains("Backup finalizado"));

    let warnings = sandbox.log_lines("WARN");
    assert_eq!(warnings.len(), 1, "log warnings: {warnings:?}");
    assert!(warnings[0].contains("not a git repository"));
    assert!(sandbox.log_lines("ERROR").is_empty());

    let remote_log = git(home, &remote, &["log", "--format=%s"]);
    let subjects: Vec<&str> = remote_log.lines().collect();
    assert_eq!(subjects.len(), 2, "remote log: {subjects:?}");
    assert!(subjects[0].starts_with("Backup automático "));

    assert!(git(home, &b, &["status", "--porcelain"]).trim().is_empty());
    assert!(!a.join(".git").exists());
}
