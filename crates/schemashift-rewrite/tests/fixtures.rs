//! Fixture-based tests for whole-file rewrites.
//!
//! Structure:
//!   tests/fixtures/<name>/input.ts   source before the rewrite
//!   tests/fixtures/<name>/output.ts  exact expected result
//!
//! Every fixture is also checked for idempotence: rewriting `output.ts`
//! must leave it byte-identical.

use schemashift_rewrite::{RewriteOptions, transform};
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Directories holding both `input.ts` and `output.ts`.
fn find_fixture_dirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.join("input.ts").is_file() && path.join("output.ts").is_file())
        .collect();
    dirs.sort();
    dirs
}

#[test]
fn test_rewrite_fixtures() {
    let options = RewriteOptions::default();
    let mut failures: Vec<String> = Vec::new();
    let mut tested = 0;

    for fixture_dir in find_fixture_dirs(&fixtures_dir()) {
        let name = fixture_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let input_path = fixture_dir.join("input.ts");
        let input = std::fs::read_to_string(&input_path).unwrap();
        let expected = std::fs::read_to_string(fixture_dir.join("output.ts")).unwrap();

        match transform(&input, &input_path, &options) {
            Ok(result) if result.output != expected => failures.push(format!(
                "`{name}`: output mismatch\n--- expected\n{expected}\n--- actual\n{}",
                result.output
            )),
            Ok(result) if result.changed != (input != expected) => failures.push(format!(
                "`{name}`: changed flag is {} but input and output {}",
                result.changed,
                if input == expected { "match" } else { "differ" }
            )),
            Ok(_) => {}
            Err(err) => failures.push(format!("`{name}`: input failed to rewrite: {err}")),
        }

        match transform(&expected, &fixture_dir.join("output.ts"), &options) {
            Ok(again) if again.changed || again.output != expected => failures.push(format!(
                "`{name}`: rewrite is not idempotent\n{}",
                again.output
            )),
            Ok(_) => {}
            Err(err) => failures.push(format!("`{name}`: output failed to parse: {err}")),
        }

        tested += 1;
    }

    if !failures.is_empty() {
        panic!(
            "{} fixture failure(s):\n\n{}",
            failures.len(),
            failures.join("\n\n")
        );
    }

    assert!(
        tested >= 11,
        "expected at least 9 fixtures, found {tested}; fixture discovery may be broken"
    );
}
