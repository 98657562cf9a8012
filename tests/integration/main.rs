//! Integration tests for incgraph
//!
//! These tests verify that the graph store, the trace parser and the CLI work
//! together correctly.

use incgraph_core::{IncludeGraph, load_graph, save_graph};
use incgraph_trace::{TraceConfig, extend_graph_from_trace};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const MAIN_TRACE: &str = "\
1>------ Build started: Project: demo, Configuration: Debug x64 ------\r
1>main.cpp\r
1>Note: including file: C:\\demo\\include\\app.h\r
1>Note: including file:  C:\\demo\\include\\config.h\r
1>Note: including file:  C:\\Program Files\\MSVC\\include\\vector\r
1>Note: including file:   C:\\Program Files\\MSVC\\include\\yvals.h\r
1>Note: including file: C:\\demo\\include\\log.h\r
1>Note: including file:  C:\\demo\\include\\CONFIG.H\r
1>Done building project \"demo.vcxproj\".\r
";

const WORKER_TRACE: &str = "\
1>worker.cpp
1>Note: including file: C:\\demo\\include\\log.h
1>Note: including file:  C:\\demo\\include\\config.h
1>Note: including file: C:\\demo\\include\\queue.h
";

fn includes_of(graph: &IncludeGraph, path: &str) -> Vec<String> {
    let id = graph.find(path).unwrap();
    graph
        .includes(id)
        .into_iter()
        .map(|include| graph.node(include.target).unwrap().name.clone())
        .collect()
}

/// Two translation units traced one after the other share their common headers.
#[test]
fn test_two_translation_units_share_headers() {
    let config = TraceConfig::default();
    let mut graph = IncludeGraph::new();

    extend_graph_from_trace(&mut graph, r"C:\demo\src\main.cpp", &[], MAIN_TRACE, &config).unwrap();
    assert_eq!(graph.node_count(), 6);
    assert_eq!(includes_of(&graph, "c:/demo/src/main.cpp"), vec!["app.h", "log.h"]);
    assert_eq!(includes_of(&graph, "c:/demo/include/app.h"), vec!["config.h", "vector"]);
    assert_eq!(includes_of(&graph, "c:/demo/include/log.h"), vec!["config.h"]);

    let summary =
        extend_graph_from_trace(&mut graph, r"C:\demo\src\worker.cpp", &[], WORKER_TRACE, &config)
            .unwrap();
    assert_eq!(summary.nodes_created, 2);
    assert_eq!(graph.node_count(), 8);

    let config_h = graph.find(r"C:\demo\include\config.h").unwrap();
    assert_eq!(graph.includers(config_h).len(), 3);
    assert_eq!(graph.roots().len(), 2);
    assert!(!graph.has_cycle());
}

/// A graph restored from the cache keeps merging into the same nodes.
#[test]
fn test_cached_graph_keeps_merging() {
    let temp_dir = TempDir::new().unwrap();
    let config = TraceConfig::default();

    let mut graph = IncludeGraph::new();
    extend_graph_from_trace(&mut graph, r"C:\demo\src\main.cpp", &[], MAIN_TRACE, &config).unwrap();
    save_graph(&graph, temp_dir.path()).unwrap();

    let mut restored = load_graph(temp_dir.path()).unwrap().unwrap();
    extend_graph_from_trace(&mut restored, r"C:\demo\src\worker.cpp", &[], WORKER_TRACE, &config)
        .unwrap();

    assert_eq!(restored.node_count(), 8);
    assert_eq!(
        includes_of(&restored, "c:/demo/include/log.h"),
        vec!["config.h", "config.h"]
    );
}

fn incgraph(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_incgraph"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .expect("Failed to execute incgraph")
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let output = Command::new(env!("CARGO_BIN_EXE_incgraph"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("include graph"));
    assert!(stdout.contains("trace"));
}

/// Trace a transcript through the CLI, then print the tree from the cache.
#[test]
fn test_cli_trace_then_show() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::fs::write(
        root.join("main.txt"),
        "Note: including file: /demo/include/app.h\n\
         Note: including file:  /demo/include/config.h\n\
         Note: including file: /demo/include/log.h\n",
    )
    .unwrap();

    let traced = incgraph(root, &["trace", "src/main.cpp", "--transcript", "main.txt"]);
    assert!(traced.status.success(), "{}", String::from_utf8_lossy(&traced.stderr));
    assert!(incgraph_core::graph_cache_path(root).exists());

    let shown = incgraph(root, &["show", "src/main.cpp"]);
    assert!(shown.status.success(), "{}", String::from_utf8_lossy(&shown.stderr));
    let stdout = String::from_utf8_lossy(&shown.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("src/main.cpp"));
    assert_eq!(&lines[1..], ["  /demo/include/app.h", "    /demo/include/config.h", "  /demo/include/log.h"]);
}

/// Headers are rejected before anything is parsed or cached.
#[test]
fn test_cli_rejects_header() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::fs::write(root.join("t.txt"), "Note: including file: /demo/a.h\n").unwrap();

    let traced = incgraph(root, &["trace", "include/app.h", "--transcript", "t.txt"]);
    assert!(!traced.status.success());
    let stderr = String::from_utf8_lossy(&traced.stderr);
    assert!(stderr.contains("cannot be traced"), "{}", stderr);
    assert!(stderr.contains("headers are not compiled on their own"), "{}", stderr);
    assert!(!incgraph_core::graph_cache_path(root).exists());
}

/// Relative include dirs in incgraph.toml are searched under --root.
#[test]
fn test_cli_config_include_dirs_resolve_under_root() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::fs::create_dir_all(root.join("inc")).unwrap();
    std::fs::write(root.join("inc/a.h"), "").unwrap();
    std::fs::write(root.join("incgraph.toml"), "include_dirs = [\"inc\"]\n").unwrap();
    std::fs::write(root.join("t.txt"), "Note: including file: a.h\n").unwrap();

    let traced = incgraph(root, &["trace", "main.cpp", "--transcript", "t.txt"]);
    assert!(traced.status.success(), "{}", String::from_utf8_lossy(&traced.stderr));

    let graph = load_graph(root).unwrap().unwrap();
    let header = std::path::absolute(root.join("inc/a.h")).unwrap();
    assert!(graph.find(&header.to_string_lossy()).is_some());
    assert!(graph.find("a.h").is_none());
}

/// A relative `-I` dir is searched under --root, not the working directory.
#[test]
fn test_cli_include_dir_flag_resolves_under_root() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::fs::create_dir_all(root.join("third_party/include")).unwrap();
    std::fs::write(root.join("third_party/include/zlib.h"), "").unwrap();
    std::fs::write(root.join("t.txt"), "Note: including file: zlib.h\n").unwrap();

    let traced = incgraph(
        root,
        &["trace", "src/main.cpp", "--transcript", "t.txt", "-I", "third_party/include"],
    );
    assert!(traced.status.success(), "{}", String::from_utf8_lossy(&traced.stderr));

    let graph = load_graph(root).unwrap().unwrap();
    let header = std::path::absolute(root.join("third_party/include/zlib.h")).unwrap();
    let main = std::path::absolute(root.join("src/main.cpp")).unwrap();
    let header_id = graph.find(&header.to_string_lossy()).unwrap();
    let main_id = graph.find(&main.to_string_lossy()).unwrap();
    assert_eq!(graph.includes(main_id)[0].target, header_id);
}

/// A malformed transcript fails but the includes read before it are cached.
#[test]
fn test_cli_keeps_partial_trace() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::fs::write(
        root.join("t.txt"),
        "Note: including file: /demo/a.h\nNote: including file: \n",
    )
    .unwrap();

    let traced = incgraph(root, &["trace", "main.cpp", "--transcript", "t.txt"]);
    assert!(!traced.status.success());

    let graph = load_graph(root).unwrap().unwrap();
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.find("/demo/a.h").is_some());
}
