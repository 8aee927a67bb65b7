//! Chart output: SVG markup and the raster texture.

use std::io::Cursor;

use super::layout::{ClusterLayout, PositionedNode};
use crate::config::ChartConfig;
use crate::core::{Canvas, DrawOp, Rgba};
use crate::error::ChartError;

const LINK_COLOR: u32 = 0x555555;
const LINK_OPACITY: f32 = 0.4;
const LINK_WIDTH: f64 = 1.5;
const DASH: f64 = 5.0;
/// Straight segments per link curve in the raster
const CURVE_SEGMENTS: usize = 24;

/// Visible region of the chart in layout coordinates: horizontal is depth
/// (`node.y`), vertical is breadth (`node.x`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFrame {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ChartFrame {
    pub fn new(layout: &ClusterLayout<'_>, width: f64) -> Self {
        let (x0, x1) = layout.x_extent();
        Self {
            min_x: -layout.dy / 3.0,
            min_y: x0 - layout.dx,
            width,
            height: x1 - x0 + layout.dx * 2.0,
        }
    }
}

pub fn node_color(node: &PositionedNode<'_>) -> u32 {
    let event = &node.node.event;
    if event.important_trigger {
        0xff0000
    } else if event.death {
        0x000000
    } else if node.has_children() {
        0x555555
    } else {
        0x999999
    }
}

/// Horizontal link: a cubic curve leaving the parent and entering the child
/// horizontally, in screen space (depth right, breadth down)
fn link_curve(parent: &PositionedNode<'_>, child: &PositionedNode<'_>) -> [(f64, f64); 4] {
    let mid = (parent.y + child.y) / 2.0;
    [(parent.y, parent.x), (mid, parent.x), (mid, child.x), (child.y, child.x)]
}

fn is_dashed(node: &PositionedNode<'_>) -> bool {
    node.node.incoming.as_ref().is_some_and(|edge| edge.is_dashed())
}

/// Compact number formatting for markup
fn num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0 + 0.0;
    format!("{rounded}")
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_svg(layout: &ClusterLayout<'_>, config: &ChartConfig) -> String {
    let frame = ChartFrame::new(layout, config.width as f64);

    let mut links = String::new();
    for (p, c) in layout.links() {
        let [(x0, y0), (x1, y1), (x2, y2), (x3, y3)] = link_curve(&layout.nodes[p], &layout.nodes[c]);
        let dash = if is_dashed(&layout.nodes[c]) {
            r#" stroke-dasharray="5,5""#
        } else {
            ""
        };
        links.push_str(&format!(
            "<path d=\"M{},{}C{},{},{},{},{},{}\"{dash}/>\n",
            num(x0),
            num(y0),
            num(x1),
            num(y1),
            num(x2),
            num(y2),
            num(x3),
            num(y3)
        ));
    }

    let mut nodes = String::new();
    for node in &layout.nodes {
        let (label_x, anchor) = if node.has_children() { (-6, "end") } else { (6, "start") };
        nodes.push_str(&format!(
            concat!(
                "<g transform=\"translate({},{})\">",
                "<circle fill=\"#{:06x}\" r=\"{}\"/>",
                "<text dy=\"0.31em\" x=\"{}\" text-anchor=\"{}\" stroke=\"white\" paint-order=\"stroke\">{}</text>",
                "<title>{}</title></g>\n"
            ),
            num(node.y),
            num(node.x),
            node_color(node),
            num(config.node_radius as f64),
            label_x,
            anchor,
            escape_xml(&node.node.label(config.label_length)),
            escape_xml(&node.node.tooltip()),
        ));
    }

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="{vx} {vy} {w} {h}" style="max-width: 100%; height: auto; font: 10px sans-serif;">
<g fill="none" stroke="#{LINK_COLOR:06x}" stroke-opacity="{LINK_OPACITY}" stroke-width="{LINK_WIDTH}">
{links}</g>
<g stroke-linejoin="round" stroke-width="3">
{nodes}</g>
</svg>
"##,
        w = num(frame.width),
        h = num(frame.height),
        vx = num(frame.min_x),
        vy = num(frame.min_y),
    )
}

/// Rasterized chart
#[derive(Debug, Clone)]
pub struct RasterChart {
    pub width: u32,
    pub height: u32,
    /// Layout units to pixels
    pub scale: f64,
    pub pixels: Vec<u8>,
}

impl RasterChart {
    pub fn encode_png(&self) -> Result<Vec<u8>, ChartError> {
        let image = image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| ChartError::Encode("pixel buffer does not match image size".to_string()))?;
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(|e| ChartError::Encode(e.to_string()))?;
        Ok(bytes)
    }
}

/// Draw links and node circles on a white canvas. The chart is scaled down
/// uniformly when either side would exceed the maximum texture dimension.
pub fn render_raster(layout: &ClusterLayout<'_>, config: &ChartConfig) -> RasterChart {
    let frame = ChartFrame::new(layout, config.width as f64);
    let longest = frame.width.max(frame.height).max(1.0);
    let scale = (config.max_texture_dimension as f64 / longest).min(1.0);

    let limit = config.max_texture_dimension.max(1);
    let width = ((frame.width * scale).ceil() as u32).clamp(1, limit);
    let height = ((frame.height * scale).ceil() as u32).clamp(1, limit);
    if scale < 1.0 {
        log::info!(
            "Chart is {}x{}, scaling by {:.3} to {}x{}",
            num(frame.width),
            num(frame.height),
            scale,
            width,
            height
        );
    }

    let to_pixel = |(x, y): (f64, f64)| ((x - frame.min_x) * scale, (y - frame.min_y) * scale);
    let stroke = ((LINK_WIDTH * scale).round() as u32).max(1);
    let dash_length = ((DASH * scale).round() as u32).max(1);
    let link_color = Rgba::from_hex(LINK_COLOR).with_opacity(LINK_OPACITY);

    let mut canvas = Canvas::new(width, height).draw(DrawOp::Clear(Rgba::WHITE));

    for (p, c) in layout.links() {
        let curve = link_curve(&layout.nodes[p], &layout.nodes[c]).map(to_pixel);
        let points = (0..=CURVE_SEGMENTS)
            .map(|i| {
                let (x, y) = cubic_point(&curve, i as f64 / CURVE_SEGMENTS as f64);
                (x.round() as i32, y.round() as i32)
            })
            .collect();
        canvas.push(DrawOp::Polyline {
            points,
            width: stroke,
            color: link_color,
            dash: is_dashed(&layout.nodes[c]).then_some((dash_length, dash_length)),
        });
    }

    let radius = (config.node_radius as f64 * scale).max(0.5) as f32;
    for node in &layout.nodes {
        let (cx, cy) = to_pixel((node.y, node.x));
        canvas.push(DrawOp::FilledCircle {
            cx: cx as f32,
            cy: cy as f32,
            radius,
            color: Rgba::from_hex(node_color(node)),
        });
    }

    let pixels = canvas.execute_ops().into_pixels();
    RasterChart {
        width,
        height,
        scale,
        pixels,
    }
}

fn cubic_point(p: &[(f64, f64); 4], t: f64) -> (f64, f64) {
    let u = 1.0 - t;
    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    (
        a * p[0].0 + b * p[1].0 + c * p[2].0 + d * p[3].0,
        a * p[0].1 + b * p[1].1 + c * p[2].1 + d * p[3].1,
    )
}
