//! CLI command implementations

use crate::host::TranscriptHost;
use anyhow::{Context, bail};
use incgraph_core::IncludeGraph;
use incgraph_trace::{ErrorKind, TraceConfig, TraceDriver};
use std::path::{Path, PathBuf};

pub async fn trace(
    root: PathBuf,
    file: PathBuf,
    transcript: PathBuf,
    include_dirs: Vec<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = TraceConfig::load(&root)?;
    config.include_dirs = config
        .include_dirs
        .iter()
        .map(|dir| absolute(&root, dir))
        .collect::<anyhow::Result<_>>()?;
    let include_dirs = include_dirs
        .iter()
        .map(|dir| absolute(&root, dir))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let output = if transcript.as_os_str() == "-" {
        read_transcript(&transcript)?
    } else {
        read_transcript(&absolute(&root, &transcript)?)?
    };
    let file = absolute(&root, &file)?;
    tracing::info!("Tracing {}", file.display());

    let mut graph = match incgraph_core::load_graph(&root)? {
        Some(graph) => {
            if graph.case_sensitivity() != config.case_sensitivity {
                tracing::warn!(
                    "Cached graph uses {:?} paths but the config asks for {:?}; keeping the cached mode until the cache is cleared",
                    graph.case_sensitivity(),
                    config.case_sensitivity
                );
            }
            graph
        }
        None => IncludeGraph::with_case_sensitivity(config.case_sensitivity),
    };

    let driver = TraceDriver::new(TranscriptHost::new(output, include_dirs), config);
    match driver.extend_graph(&mut graph, &file).await {
        Ok(summary) => {
            incgraph_core::save_graph(&graph, &root)?;
            tracing::info!(
                "Graph now has {} nodes, {} edges ({} includes added)",
                graph.node_count(),
                graph.edge_count(),
                summary.includes_added
            );
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::Malformed => {
            // The includes read before the bad line are kept.
            incgraph_core::save_graph(&graph, &root)?;
            Err(e).context("trace was only partially merged")
        }
        Err(e) => Err(e.into()),
    }
}

pub fn show(root: PathBuf, file: PathBuf) -> anyhow::Result<()> {
    let graph = load_existing(&root)?;
    let file = absolute(&root, &file)?;
    let id = graph
        .find(&file.to_string_lossy())
        .with_context(|| format!("{} is not in the graph", file.display()))?;

    if let Some(tree) = graph.render_tree(id) {
        print!("{}", tree);
    }
    Ok(())
}

pub fn stats(root: PathBuf) -> anyhow::Result<()> {
    let graph = load_existing(&root)?;

    println!("files:              {}", graph.node_count());
    println!("includes:           {}", graph.edge_count());
    println!("translation units:  {}", graph.roots().len());
    println!("include cycles:     {}", if graph.has_cycle() { "yes" } else { "no" });
    Ok(())
}

pub fn clear(root: PathBuf) -> anyhow::Result<()> {
    tracing::info!("Clearing cache for: {}", root.display());

    incgraph_core::clear_cache(&root)?;

    tracing::info!("Cache cleared");
    Ok(())
}

fn load_existing(root: &Path) -> anyhow::Result<IncludeGraph> {
    match incgraph_core::load_graph(root)? {
        Some(graph) => Ok(graph),
        None => bail!("no include graph cached under {}", root.display()),
    }
}

fn read_transcript(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        return std::io::read_to_string(std::io::stdin()).context("reading transcript from stdin");
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("reading transcript {}", path.display()))
}

fn absolute(root: &Path, file: &Path) -> anyhow::Result<PathBuf> {
    let joined = if file.is_absolute() {
        file.to_path_buf()
    } else {
        root.join(file)
    };
    std::path::absolute(&joined).with_context(|| format!("resolving {}", joined.display()))
}
