//! End-to-end tests of the `schemashift` binary.

use assert_cmd::Command;
use tempfile::TempDir;

const SCHEMA: &str = "import { Object, String } from 'runtypes';\n\nexport const User = Object({ name: String });\n";
const REWRITTEN: &str = "import { z } from 'zod';\n\nexport const User = z.object({ name: z.string() });\n";

/// The binary running inside `dir`, isolated from any global config.
fn schemashift(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("schemashift").unwrap();
    cmd.current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("xdg"))
        .env_remove("RUST_LOG");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

fn read(dir: &TempDir, name: &str) -> String {
    std::fs::read_to_string(dir.path().join(name)).unwrap()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_rewrites_directory_in_place() {
    let dir = TempDir::new().unwrap();
    write(&dir, "src/user.ts", SCHEMA);
    write(&dir, "src/plain.ts", "export const x = 1;\n");
    write(&dir, "README.md", "import { String } from 'runtypes';\n");

    let output = schemashift(&dir).output().unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(read(&dir, "src/user.ts"), REWRITTEN);
    assert_eq!(read(&dir, "src/plain.ts"), "export const x = 1;\n");
    assert_eq!(read(&dir, "README.md"), "import { String } from 'runtypes';\n");
    assert!(stderr(&output).contains("2 files: 1 rewritten, 1 unchanged, 0 errors, 0 notes"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    write(&dir, "user.ts", SCHEMA);

    let output = schemashift(&dir).arg("--dry-run").output().unwrap();

    assert!(output.status.success());
    assert_eq!(read(&dir, "user.ts"), SCHEMA);
    assert!(stderr(&output).contains("would rewrite"));
    assert!(stderr(&output).contains("user.ts"));
}

#[test]
fn test_print_emits_rewritten_text() {
    let dir = TempDir::new().unwrap();
    write(&dir, "user.ts", SCHEMA);

    let output = schemashift(&dir).args(["--print", "user.ts"]).output().unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), REWRITTEN);
    assert_eq!(read(&dir, "user.ts"), SCHEMA);
}

#[test]
fn test_json_report() {
    let dir = TempDir::new().unwrap();
    write(&dir, "user.ts", SCHEMA);

    let output = schemashift(&dir)
        .args(["--json", "--dry-run"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["files"], 1);
    assert_eq!(report["summary"]["rewritten"], 1);
    assert_eq!(report["files"][0]["outcome"]["status"], "rewritten");
}

#[test]
fn test_unit_failure_sets_exit_code_but_finishes_batch() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a_broken.ts", "import { String } from 'runtypes';\nconst = ;\n");
    write(&dir, "b_user.ts", SCHEMA);

    let output = schemashift(&dir).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(read(&dir, "b_user.ts"), REWRITTEN);
    assert!(stderr(&output).contains("error: "));
    assert!(stderr(&output).contains("a_broken.ts"));
}

#[test]
fn test_project_config_and_ext_flag() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        ".schemashift/config.toml",
        "[source]\nmodules = [\"@acme/rt\"]\n\n[target]\nmodule = \"zod/v4\"\n",
    );
    write(&dir, "schema.mts", "import { Number } from '@acme/rt';\nexport const N = Number;\n");
    write(&dir, "other.ts", "import { Number } from '@acme/rt';\nexport const N = Number;\n");

    let output = schemashift(&dir).args(["--ext", ".mts"]).output().unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        read(&dir, "schema.mts"),
        "import { z } from 'zod/v4';\nexport const N = z.number();\n"
    );
    assert_eq!(
        read(&dir, "other.ts"),
        "import { Number } from '@acme/rt';\nexport const N = Number;\n"
    );
}

#[test]
fn test_malformed_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    write(&dir, "custom.toml", "[target\n");
    write(&dir, "user.ts", SCHEMA);

    let output = schemashift(&dir)
        .args(["--config", "custom.toml"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("custom.toml"));
    assert_eq!(read(&dir, "user.ts"), SCHEMA);
}

#[test]
fn test_invalid_binding_is_rejected() {
    let dir = TempDir::new().unwrap();
    write(&dir, "custom.toml", "[target]\nbinding = \"not valid\"\n");
    write(&dir, "user.ts", SCHEMA);

    let output = schemashift(&dir)
        .args(["--config", "custom.toml"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid configuration"));
    assert_eq!(read(&dir, "user.ts"), SCHEMA);
}
