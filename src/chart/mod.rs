//! Event-graph chart: tables to tree, tree to cluster layout, layout to SVG
//! markup and a PNG texture for the display.

pub mod analysis;
pub mod data;
pub mod hierarchy;
pub mod layout;
pub mod render;

use std::path::Path;

pub use analysis::{all_paths, compare_ids, degree_table, entry_points, GraphReport, NodeDegree};
pub use data::{read_edges, read_events, EdgeRecord, EventRecord};
pub use hierarchy::{build_hierarchy, find_root, EventNode};
pub use layout::ClusterLayout;
pub use render::{render_raster, render_svg, RasterChart};

use crate::config::ChartConfig;
use crate::error::ChartError;
use crate::texture::{TextureDescriptor, TextureSource};

#[derive(Debug, Clone, PartialEq)]
pub struct ChartStats {
    pub root_id: String,
    pub nodes: usize,
    pub leaves: usize,
    /// Levels below the root
    pub depth: usize,
    /// Chart size in layout units
    pub width: f64,
    pub height: f64,
    /// Texture size in pixels
    pub texture_width: u32,
    pub texture_height: u32,
}

#[derive(Debug, Clone)]
pub struct ChartOutput {
    pub svg: String,
    pub png: Vec<u8>,
    pub stats: ChartStats,
}

impl ChartOutput {
    /// Texture descriptor showing the chart image
    pub fn to_texture_descriptor(&self) -> TextureDescriptor {
        TextureDescriptor::new(TextureSource::memory(
            format!("chart rooted at {}", self.stats.root_id),
            self.png.clone(),
        ))
    }
}

pub fn generate_chart(
    events: &[EventRecord],
    edges: &[EdgeRecord],
    config: &ChartConfig,
) -> Result<ChartOutput, ChartError> {
    let tree = build_hierarchy(events, edges, config.root_policy)?;
    let layout = ClusterLayout::new(&tree, config.node_spacing as f64, config.width as f64);

    let svg = render_svg(&layout, config);
    let raster = render_raster(&layout, config);
    let png = raster.encode_png()?;

    let frame = render::ChartFrame::new(&layout, config.width as f64);
    let stats = ChartStats {
        root_id: tree.event.id.clone(),
        nodes: tree.len(),
        leaves: tree.leaf_count(),
        depth: tree.height(),
        width: frame.width,
        height: frame.height,
        texture_width: raster.width,
        texture_height: raster.height,
    };
    log::info!(
        "Chart: {} nodes, {} leaves, {}x{} texture ({} bytes PNG)",
        stats.nodes,
        stats.leaves,
        stats.texture_width,
        stats.texture_height,
        png.len()
    );

    Ok(ChartOutput { svg, png, stats })
}

/// Read both tables and generate the chart
pub fn generate_chart_from_files(
    events_path: impl AsRef<Path>,
    edges_path: impl AsRef<Path>,
    config: &ChartConfig,
) -> Result<ChartOutput, ChartError> {
    let events = read_events(events_path)?;
    let edges = read_edges(edges_path)?;
    generate_chart(&events, &edges, config)
}
