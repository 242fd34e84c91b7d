//! Command-line arguments and their merge into [`SimplifyConfig`]

use std::path::PathBuf;

use clap::Parser;
use lod_config::{ConfigError, SimplifyConfig};

/// Simplify a triangle mesh by quadric-error edge collapse
#[derive(Debug, Parser)]
#[command(name = "lod", version, about)]
pub struct Args {
    /// Input OBJ file
    pub input: PathBuf,

    /// Output OBJ file (defaults to `<input>.lod.obj`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum number of edge collapses
    #[arg(short = 'n', long)]
    pub iterations: Option<usize>,

    /// Stop once the face count drops to this
    #[arg(long)]
    pub target_faces: Option<usize>,

    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Per-axis tolerance for welding coincident vertices
    #[arg(long)]
    pub weld_epsilon: Option<f32>,

    /// Validate the topology after every collapse
    #[arg(long)]
    pub validate: bool,

    /// Keep removed vertex slots in the output instead of compacting
    #[arg(long)]
    pub sparse: bool,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Defaults, then environment, then config file, then flags
    pub fn resolve_config(&self) -> Result<SimplifyConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => SimplifyConfig::load(path)?,
            None => SimplifyConfig::default().with_env_overrides()?,
        };
        Ok(self.apply(base))
    }

    fn apply(&self, mut config: SimplifyConfig) -> SimplifyConfig {
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(target) = self.target_faces {
            config.target_faces = Some(target);
        }
        if let Some(epsilon) = self.weld_epsilon {
            config.weld_epsilon = epsilon;
        }
        if self.validate {
            config.validate_each_step = true;
        }
        config
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("lod.obj"))
    }
}
