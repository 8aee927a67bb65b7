use std::fs;

use anyhow::Context;
use clap::Parser;
use winit::event_loop::EventLoop;

use cylinder_preview::app::PreviewApp;
use cylinder_preview::chart::{generate_chart_from_files, read_edges, GraphReport};
use cylinder_preview::cli::{apply_overrides, ChartArgs, Cli, Command, PreviewArgs};
use cylinder_preview::config::PreviewConfig;
use cylinder_preview::texture::TextureDescriptor;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    match cli.command.unwrap_or_default() {
        Command::Preview(args) => run_preview(config, args),
        Command::Chart(args) => run_chart(config, args),
        Command::Analyze { edges } => {
            let edges = read_edges(&edges)?;
            print!("{}", GraphReport::from_edges(&edges).to_text());
            Ok(())
        }
        Command::DumpConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn run_preview(mut config: PreviewConfig, args: PreviewArgs) -> anyhow::Result<()> {
    apply_overrides(&mut config, &args.tables, args.margin);

    let mut descriptors = Vec::new();
    if let Some((events, edges)) = args.tables.tables() {
        let chart = generate_chart_from_files(events, edges, &config.chart)?;
        descriptors.push(chart.to_texture_descriptor());
    }
    descriptors.extend(
        config
            .textures
            .iter()
            .chain(&args.textures)
            .cloned()
            .map(TextureDescriptor::from),
    );
    log::info!("Previewing {} texture(s)", descriptors.len());

    let event_loop = EventLoop::new()?;
    let mut app = PreviewApp::new(config, descriptors);
    event_loop.run_app(&mut app)?;
    app.finish()
}

fn run_chart(mut config: PreviewConfig, args: ChartArgs) -> anyhow::Result<()> {
    apply_overrides(&mut config, &args.tables, None);
    let (events, edges) = args
        .tables
        .tables()
        .context("chart needs --events and --edges")?;

    let chart = generate_chart_from_files(events, edges, &config.chart)?;
    fs::write(&args.svg, &chart.svg)
        .with_context(|| format!("Failed to write {}", args.svg.display()))?;
    fs::write(&args.png, &chart.png)
        .with_context(|| format!("Failed to write {}", args.png.display()))?;

    let stats = &chart.stats;
    println!(
        "Root {}: {} nodes, {} leaves, depth {}",
        stats.root_id, stats.nodes, stats.leaves, stats.depth
    );
    println!(
        "Wrote {} ({:.0}x{:.0}) and {} ({}x{})",
        args.svg.display(),
        stats.width,
        stats.height,
        args.png.display(),
        stats.texture_width,
        stats.texture_height
    );
    Ok(())
}
