// CLI integration tests for the load → encode → write flow.
use std::path::Path;
use std::process::{Command, Output};

use serde_json::{Value, json};

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_fsdjson");
    let mut cmd = Command::new(exe);
    cmd.env_remove("FSDJSON_SHARED_CACHE").env_remove("RUST_LOG");
    cmd
}

fn run(args: &[&str]) -> Output {
    cmd().args(args).output().expect("run fsdjson")
}

fn read_json(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).expect("read output");
    serde_json::from_str(&text).expect("valid json")
}

fn stderr_error(output: &Output) -> Value {
    let text = String::from_utf8_lossy(&output.stderr);
    let line = text
        .lines()
        .find(|line| line.starts_with("{\"error\""))
        .expect("error json line");
    serde_json::from_str(line).expect("valid json")
}

const SCENARIO_TREE: &str = r#"{"Record": {"type_name": "Root", "attributes": {
    "name": {"Str": "Test"},
    "items": {"OpaqueMap": [[{"Int": 1}, {"Str": "a"}], [{"Int": 2}, {"Str": "b"}]]},
    "__class__": {"Str": "Root"}
}}}"#;

#[test]
fn tree_loader_writes_expected_json() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("root.tree.json");
    let output = temp.path().join("root.json");
    std::fs::write(&input, SCENARIO_TREE).expect("write input");

    let result = run(&["tree", input.to_str().unwrap(), output.to_str().unwrap()]);
    assert!(result.status.success(), "stderr: {}", String::from_utf8_lossy(&result.stderr));
    assert!(result.stdout.is_empty());

    let text = std::fs::read_to_string(&output).expect("read output");
    assert_eq!(text, r#"{"items": {"1": "a", "2": "b"}, "name": "Test"}"#);
    assert_eq!(
        read_json(&output),
        json!({"name": "Test", "items": {"1": "a", "2": "b"}})
    );
}

#[test]
fn opaque_map_string_keys_are_written_quoted() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("keys.tree.json");
    let output = temp.path().join("keys.json");
    std::fs::write(
        &input,
        r#"{"OpaqueMap": [[{"Str": "name"}, {"Int": 1}], [{"Int": 1}, {"Str": "int"}], [{"Str": "1"}, {"Str": "str"}]]}"#,
    )
    .expect("write input");

    let result = run(&["tree", input.to_str().unwrap(), output.to_str().unwrap()]);
    assert!(result.status.success(), "stderr: {}", String::from_utf8_lossy(&result.stderr));
    assert_eq!(
        std::fs::read_to_string(&output).expect("read"),
        r#"{"\"name\"": 1, "1": "int", "\"1\"": "str"}"#
    );
}

#[test]
fn missing_arguments_prints_message_and_writes_nothing() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("root.tree.json");
    std::fs::write(&input, SCENARIO_TREE).expect("write input");

    for args in [vec![], vec!["tree"], vec!["tree", input.to_str().unwrap()]] {
        let result = run(&args);
        assert!(result.status.success());
        assert_eq!(String::from_utf8_lossy(&result.stdout), "Missing arguments!\n");
    }
    let entries = std::fs::read_dir(temp.path()).expect("read dir").count();
    assert_eq!(entries, 1);
}

#[test]
fn unknown_loader_fails_without_output() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = temp.path().join("types.json");

    let result = run(&["typesLoader", "types.fsdbinary", output.to_str().unwrap()]);
    assert_eq!(result.status.code().unwrap(), 3);
    assert!(!output.exists());

    let err = stderr_error(&result);
    assert_eq!(err["error"]["kind"], "NotFound");
    assert_eq!(err["error"]["message"], "unknown loader `typesLoader`");
    assert!(err["error"]["hint"].as_str().unwrap().contains("tree, json"));
}

#[test]
fn json_loader_reencodes_unchanged() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("groups.json");
    let output = temp.path().join("groups.out.json");
    let doc = r#"{"25": {"groupID": 25, "anchorable": 0, "categoryID": 6, "iconID": null}, "18": {"groupID": 18, "published": 1}}"#;
    std::fs::write(&input, doc).expect("write input");

    let result = run(&["json", input.to_str().unwrap(), output.to_str().unwrap()]);
    assert!(result.status.success());
    assert_eq!(std::fs::read_to_string(&output).expect("read"), doc);
}

#[test]
fn unencodable_value_exits_with_serialize_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("bad.tree.json");
    let output = temp.path().join("bad.json");
    std::fs::write(&input, r#"{"OpaqueList": [{"Bytes": [255, 254]}]}"#).expect("write input");

    let result = run(&["tree", input.to_str().unwrap(), output.to_str().unwrap()]);
    assert_eq!(result.status.code().unwrap(), 5);
    assert!(!output.exists());
    assert_eq!(stderr_error(&result)["error"]["kind"], "Serialize");
}

#[test]
fn malformed_tree_is_loader_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("bad.tree.json");
    let output = temp.path().join("bad.json");
    std::fs::write(&input, r#"{"Int": "one"}"#).expect("write input");

    let result = run(&["tree", input.to_str().unwrap(), output.to_str().unwrap()]);
    assert_eq!(result.status.code().unwrap(), 4);
    assert!(!output.exists());
}

fn install_shared_cache(dir: &Path) {
    let write = |rel: &str, text: &str| {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).expect("mkdir");
        std::fs::write(path, text).expect("write");
    };
    write("tq/start.ini", "build = 2845147\n");
    write(
        "index_tranquility.txt",
        "app:/resfileindex.txt,ab/abcd_resfileindex,5f1e,120,60\n",
    );
    write(
        "ResFiles/ab/abcd_resfileindex",
        "res:/staticdata/root.tree,cd/cdef_root,1a2b,300,120\n",
    );
    write("ResFiles/cd/cdef_root", SCENARIO_TREE);
}

#[test]
fn shared_cache_resources_resolve_by_flag_and_env() {
    let temp = tempfile::tempdir().expect("tempdir");
    let cache_dir = temp.path().join("SharedCache");
    install_shared_cache(&cache_dir);

    let by_flag = temp.path().join("flag.json");
    let result = run(&[
        "tree",
        "res:/StaticData/root.tree",
        by_flag.to_str().unwrap(),
        "--shared-cache",
        cache_dir.to_str().unwrap(),
    ]);
    assert!(result.status.success(), "stderr: {}", String::from_utf8_lossy(&result.stderr));
    assert_eq!(read_json(&by_flag)["name"], "Test");

    let by_env = temp.path().join("env.json");
    let result = cmd()
        .env("FSDJSON_SHARED_CACHE", &cache_dir)
        .args(["tree", "res:/staticdata/root.tree", by_env.to_str().unwrap()])
        .output()
        .expect("run");
    assert!(result.status.success());
    assert_eq!(read_json(&by_env)["items"]["2"], "b");
}

#[test]
fn cache_resource_without_cache_is_usage_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = temp.path().join("out.json");
    let result = run(&["tree", "res:/staticdata/root.tree", output.to_str().unwrap()]);
    assert_eq!(result.status.code().unwrap(), 2);
    assert!(!output.exists());
}

#[test]
fn unknown_cache_resource_is_not_found() {
    let temp = tempfile::tempdir().expect("tempdir");
    let cache_dir = temp.path().join("SharedCache");
    install_shared_cache(&cache_dir);
    let output = temp.path().join("out.json");
    let result = run(&[
        "tree",
        "res:/staticdata/types.fsdbinary",
        output.to_str().unwrap(),
        "--shared-cache",
        cache_dir.to_str().unwrap(),
    ]);
    assert_eq!(result.status.code().unwrap(), 3);
}

#[cfg(unix)]
#[test]
fn exec_loader_reads_decoder_stdout() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("root.tree.json");
    let output = temp.path().join("root.json");
    std::fs::write(&input, SCENARIO_TREE).expect("write input");

    let result = run(&["exec:cat", input.to_str().unwrap(), output.to_str().unwrap()]);
    assert!(result.status.success());
    assert_eq!(read_json(&output)["items"]["1"], "a");

    let failing = run(&["exec:false", input.to_str().unwrap(), output.to_str().unwrap()]);
    assert_eq!(failing.status.code().unwrap(), 4);
}

#[test]
fn list_loaders_names_builtins_and_exec() {
    let result = run(&["--list-loaders"]);
    assert!(result.status.success());
    let text = String::from_utf8_lossy(&result.stdout);
    let names: Vec<&str> = text
        .lines()
        .filter_map(|line| line.split('\t').next())
        .collect();
    assert_eq!(names, vec!["tree", "json", "exec:<program>"]);
}

#[test]
fn pretty_flag_indents_output() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("root.tree.json");
    let output = temp.path().join("root.json");
    std::fs::write(&input, SCENARIO_TREE).expect("write input");

    let result = run(&[
        "tree",
        input.to_str().unwrap(),
        output.to_str().unwrap(),
        "--pretty",
    ]);
    assert!(result.status.success());
    let text = std::fs::read_to_string(&output).expect("read");
    assert!(text.starts_with("{\n  \"items\": {\n    \"1\": \"a\""));
}
