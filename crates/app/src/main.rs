//! lod - load an OBJ mesh, simplify it with QEM edge collapses, write it back

mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use lod_simplify::{export_compact, HalfEdgeMesh, Simplifier, SimplifyReport};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::Args;

/// `--json` output: the run report plus the files involved
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    input: &'a Path,
    output: &'a Path,
    #[serde(flatten)]
    report: &'a SimplifyReport,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args
        .resolve_config()
        .context("Failed to resolve configuration")?;
    info!("Starting lod with {:?}", config);

    let (mesh, report) = lod_builder::load_obj(&args.input, config.weld_epsilon)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    if !report.is_watertight() {
        warn!("Input is not watertight; edges touching holes or non-manifold edges stay fixed");
    }

    let he_mesh = HalfEdgeMesh::from_mesh(&mesh).context("Failed to build half-edge mesh")?;
    let mut simplifier = Simplifier::new(he_mesh);
    let run = simplifier.run(&config);

    let output = if args.sparse {
        simplifier.export()
    } else {
        export_compact(simplifier.mesh())
    };

    let path = args.output_path();
    lod_builder::save_obj(&path, &output)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(
        "Wrote {} ({} vertices, {} triangles)",
        path.display(),
        output.vertices.len(),
        output.triangle_count()
    );

    if args.json {
        let summary = RunSummary {
            input: &args.input,
            output: &path,
            report: &run,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
