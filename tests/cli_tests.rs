mod common;

use common::{list_files, read, write_file, USER_MANIFEST};
use std::process::Command;

fn routegen() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_routegen"));
    cmd.env_remove("ROUTEGEN_SORT_ROUTER")
        .env_remove("ROUTEGEN_SNAKE_MIDDLEWARE")
        .env("ROUTEGEN_LOG_LEVEL", "warn");
    cmd
}

#[test]
fn test_cli_generate_writes_project() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_file(dir.path(), "services.yaml", USER_MANIFEST);
    write_file(dir.path(), "routegen.toml", "module = \"example.com/demo\"\n");

    let status = routegen()
        .arg("generate")
        .arg("--manifest")
        .arg(&manifest)
        .arg("--out")
        .arg(dir.path())
        .status()
        .expect("run cli");
    assert!(status.success());

    let router = read(dir.path(), "biz/router/user/user.go");
    assert!(router.contains("user \"example.com/demo/biz/handler/user\""));
    assert!(dir.path().join("biz/router/user/middleware.go").is_file());
    assert!(read(dir.path(), "biz/router/register.go").contains("user.Register(r)"));

    // second run converges and still succeeds
    let status = routegen()
        .args(["generate", "--manifest"])
        .arg(&manifest)
        .arg("--out")
        .arg(dir.path())
        .status()
        .expect("run cli");
    assert!(status.success());
}

#[test]
fn test_cli_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_file(dir.path(), "services.yaml", USER_MANIFEST);
    let before = list_files(dir.path());

    let output = routegen()
        .args(["generate", "--dry-run", "--manifest"])
        .arg(&manifest)
        .arg("--out")
        .arg(dir.path())
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("would write [new] biz/router/user/user.go"));
    assert_eq!(list_files(dir.path()), before);
}

#[test]
fn test_cli_malformed_register_fails_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_file(dir.path(), "services.yaml", USER_MANIFEST);
    write_file(dir.path(), "biz/router/register.go", "package router\n\nimport (\n)\n");
    let before = list_files(dir.path());

    let status = routegen()
        .args(["generate", "--manifest"])
        .arg(&manifest)
        .arg("--out")
        .arg(dir.path())
        .status()
        .expect("run cli");
    assert!(!status.success());
    assert_eq!(list_files(dir.path()), before);
}

#[test]
fn test_cli_inspect_prints_routes() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_file(dir.path(), "services.yaml", USER_MANIFEST);

    let output = routegen()
        .current_dir(dir.path())
        .args(["inspect", "--manifest"])
        .arg(&manifest)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("service user (package user)"));
    assert!(stdout.contains("/api/user/:id"));
    assert!(stdout.contains("user.CreateUser"));
    assert!(stdout.contains("unified _getuser"));
}
