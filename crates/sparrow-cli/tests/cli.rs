use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const REPLY: &str = r#"Sure, here is a counter.

## File Structure
- package.json
- src/App.tsx
- src/components/Counter.tsx

## Code Files
```tsx file="src/components/Counter.tsx"
export function Counter() {
  return <button>0</button>;
}
```
"#;

fn sparrow(data: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sparrow").unwrap();
    cmd.arg("--data-dir")
        .arg(data)
        .env_remove("SPARROW_HOME")
        .env_remove("OPENROUTER_API_KEY")
        .env_remove("SPARROW_MODEL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_extract_apply_then_tree() {
    let data = TempDir::new().unwrap();
    let reply = data.path().join("reply.md");
    std::fs::write(&reply, REPLY).unwrap();

    sparrow(data.path())
        .args(["extract", "--apply", "-i"])
        .arg(&reply)
        .assert()
        .success()
        .stdout(predicate::str::contains("src/components/Counter.tsx"));

    sparrow(data.path())
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::contains("components/"))
        .stdout(predicate::str::contains("    Counter.tsx"))
        .stdout(predicate::str::contains("  App.tsx"));

    sparrow(data.path())
        .args(["show", "src/components/Counter.tsx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<button>0</button>"));
}

#[test]
fn test_extract_json_without_apply_leaves_project() {
    let data = TempDir::new().unwrap();

    sparrow(data.path())
        .args(["extract", "--json", "-i", "-"])
        .write_stdin(REPLY)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""files":["package.json","src/App.tsx","src/components/Counter.tsx"]"#));

    sparrow(data.path())
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::contains("Counter.tsx").not());
}

#[test]
fn test_ask_requires_terms() {
    let data = TempDir::new().unwrap();

    sparrow(data.path())
        .args(["ask", "build", "a", "counter"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("terms not accepted"));

    sparrow(data.path())
        .args(["terms", "--accept"])
        .assert()
        .success();

    sparrow(data.path())
        .arg("terms")
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: accepted"));

    sparrow(data.path())
        .args(["ask", "build", "a", "counter"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENROUTER_API_KEY"));
}

#[test]
fn test_write_rename_delete() {
    let data = TempDir::new().unwrap();

    sparrow(data.path())
        .args(["write", "src/lib/util.ts"])
        .write_stdin("export const one = 1;\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote src/lib/util.ts"));

    sparrow(data.path())
        .args(["rename", "src/lib", "helpers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("renamed src/lib -> src/helpers"));

    sparrow(data.path())
        .args(["show", "src/helpers/util.ts"])
        .assert()
        .success()
        .stdout("export const one = 1;\n");

    sparrow(data.path())
        .args(["rename", "src/nope.ts", "x.ts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no such path"));

    sparrow(data.path())
        .args(["delete", "src"])
        .assert()
        .success();

    sparrow(data.path())
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::contains("util.ts").not())
        .stdout(predicate::str::contains("index.html"));
}

#[test]
fn test_rejected_write_leaves_project_untouched() {
    let data = TempDir::new().unwrap();

    let before = sparrow(data.path())
        .args(["tree", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    sparrow(data.path())
        .args(["write", "Dockerfile"])
        .write_stdin("FROM node:20\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no extension"));

    sparrow(data.path())
        .args(["write", "src"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is a folder"));

    sparrow(data.path())
        .args(["tree", "--json"])
        .assert()
        .success()
        .stdout(before);
}

#[test]
fn test_new_project_resets_tree() {
    let data = TempDir::new().unwrap();

    sparrow(data.path())
        .args(["write", "extra.ts"])
        .write_stdin("x")
        .assert()
        .success();

    sparrow(data.path())
        .args(["new", "--name", "Fresh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fresh"));

    sparrow(data.path())
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Fresh (5 files)"))
        .stdout(predicate::str::contains("extra.ts").not());
}

#[test]
fn test_preview_urls() {
    let data = TempDir::new().unwrap();

    sparrow(data.path())
        .arg("preview")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "https://codesandbox.io/api/v1/sandboxes/define?parameters=",
        ))
        .stdout(predicate::str::contains("embed=1&view=preview&runonclick=0"));

    sparrow(data.path())
        .args(["preview", "--anchor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("embed").not());
}

#[test]
fn test_oauth_code_handoff() {
    let data = TempDir::new().unwrap();

    sparrow(data.path())
        .args(["oauth-callback", "https://app.example/?code=abc123&state=x"])
        .assert()
        .success()
        .stdout("https://app.example/\n");

    sparrow(data.path())
        .args(["oauth-callback", "--take"])
        .assert()
        .success()
        .stdout("abc123\n");

    sparrow(data.path())
        .args(["oauth-callback", "--take"])
        .assert()
        .failure();
}

#[test]
fn test_export_writes_files() {
    let data = TempDir::new().unwrap();
    let out = data.path().join("out");

    sparrow(data.path())
        .args(["export", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("exported 5 files"));

    let app = std::fs::read_to_string(out.join("src/App.tsx")).unwrap();
    assert!(app.contains("export default App"));
    assert!(out.join("package.json").is_file());
}

#[test]
fn test_models_marks_default() {
    let data = TempDir::new().unwrap();

    sparrow(data.path())
        .arg("models")
        .assert()
        .success()
        .stdout(predicate::str::contains("* google/gemini-2.0-flash-exp:free"));
}
