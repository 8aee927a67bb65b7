// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::config::{PreviewConfig, RootPolicy};

#[derive(Parser, Debug, Clone)]
#[command(name = "cylinder-preview")]
#[command(about = "3D preview of a cylindrical display and its event-graph chart", long_about = None)]
pub struct Cli {
    /// JSON configuration file; defaults apply to every missing key
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Open the preview window (default)
    Preview(PreviewArgs),
    /// Generate the chart as SVG and PNG files
    Chart(ChartArgs),
    /// Print paths, entry points and node degrees of an edge table
    Analyze {
        /// Edges CSV (Source, Target, Type, Description)
        edges: PathBuf,
    },
    /// Print the effective configuration as JSON
    DumpConfig,
}

impl Default for Command {
    fn default() -> Self {
        Self::Preview(PreviewArgs::default())
    }
}

/// Event and edge tables for the chart
#[derive(Args, Debug, Clone, Default)]
pub struct TableArgs {
    /// Events CSV (ID, Date, World, Description, Characters, Important_Trigger, Death)
    #[arg(long, requires = "edges")]
    pub events: Option<PathBuf>,

    /// Edges CSV (Source, Target, Type, Description)
    #[arg(long, requires = "events")]
    pub edges: Option<PathBuf>,

    /// Fail when several events have no incoming edge instead of using the first
    #[arg(long)]
    pub strict_root: bool,
}

impl TableArgs {
    pub fn tables(&self) -> Option<(&PathBuf, &PathBuf)> {
        self.events.as_ref().zip(self.edges.as_ref())
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub tables: TableArgs,

    /// Margin around the drawing area in pixels
    #[arg(long)]
    pub margin: Option<u32>,

    /// Images shown after the chart, cycled with the arrow keys
    pub textures: Vec<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ChartArgs {
    #[command(flatten)]
    pub tables: TableArgs,

    /// Where to write the SVG markup
    #[arg(long, default_value = "chart.svg")]
    pub svg: PathBuf,

    /// Where to write the PNG texture
    #[arg(long, default_value = "chart.png")]
    pub png: PathBuf,
}

impl Cli {
    /// Configuration from `--config`, or defaults
    pub fn load_config(&self) -> anyhow::Result<PreviewConfig> {
        match &self.config {
            Some(path) => PreviewConfig::load(path)
                .with_context(|| format!("Failed to load configuration {}", path.display())),
            None => Ok(PreviewConfig::default()),
        }
    }
}

/// Fold command-line overrides into the configuration
pub fn apply_overrides(config: &mut PreviewConfig, tables: &TableArgs, margin: Option<u32>) {
    if tables.strict_root {
        config.chart.root_policy = RootPolicy::Unique;
    }
    if let Some(margin) = margin {
        config.body_margin = margin;
    }
}
