/// RGBA color with straight (non-premultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const WHITE: Rgba = Rgba(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba(0, 0, 0, 255);

    /// Opaque color from 0xRRGGBB
    pub const fn from_hex(hex: u32) -> Self {
        Rgba((hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 255)
    }

    /// Same color with alpha scaled by `opacity` in [0, 1]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let alpha = (self.3 as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Rgba(self.0, self.1, self.2, alpha)
    }
}

/// 2D drawing operations for canvas
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Fill entire canvas with color, replacing what was there
    Clear(Rgba),

    /// Blend a single pixel
    Pixel { x: i32, y: i32, color: Rgba },

    /// Draw filled circle centered at (cx, cy)
    FilledCircle { cx: f32, cy: f32, radius: f32, color: Rgba },

    /// Connected line segments; `dash` is (on, off) in pixels along the path
    Polyline {
        points: Vec<(i32, i32)>,
        width: u32,
        color: Rgba,
        dash: Option<(u32, u32)>,
    },
}

/// Canvas state - pixel buffer with pending draw operations
#[derive(Clone)]
pub struct Canvas {
    /// RGBA pixel buffer
    pixels: Vec<u8>,
    /// Pending draw operations
    operations: Vec<DrawOp>,
    width: u32,
    height: u32,
}

impl Canvas {
    /// Create new transparent canvas with dimensions
    pub fn new(width: u32, height: u32) -> Self {
        let size = width as usize * height as usize * 4;

        Self {
            pixels: vec![0; size],
            operations: Vec::new(),
            width,
            height,
        }
    }

    /// Add draw operation - functional style
    pub fn draw(mut self, op: DrawOp) -> Self {
        self.operations.push(op);
        self
    }

    /// Add draw operation in place
    pub fn push(&mut self, op: DrawOp) {
        self.operations.push(op);
    }

    /// Execute all pending operations and return new canvas
    pub fn execute_ops(&self) -> Self {
        let mut canvas = Self {
            pixels: self.pixels.clone(),
            operations: Vec::new(),
            width: self.width,
            height: self.height,
        };

        for op in &self.operations {
            canvas.execute_op(op);
        }

        canvas
    }

    /// Execute single draw operation (mutates internal state)
    fn execute_op(&mut self, op: &DrawOp) {
        match op {
            DrawOp::Clear(color) => self.clear(*color),
            DrawOp::Pixel { x, y, color } => self.blend_pixel(*x, *y, *color),
            DrawOp::FilledCircle { cx, cy, radius, color } => {
                self.draw_filled_circle(*cx, *cy, *radius, *color)
            }
            DrawOp::Polyline {
                points,
                width,
                color,
                dash,
            } => self.draw_polyline(points, *width, *color, *dash),
        }
    }

    fn clear(&mut self, color: Rgba) {
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&[color.0, color.1, color.2, color.3]);
        }
    }

    /// Source-over blend of `color` onto the pixel at (x, y)
    fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }

        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let src_a = color.3 as f32 / 255.0;
        let dst_a = self.pixels[idx + 3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        if out_a <= 0.0 {
            self.pixels[idx..idx + 4].copy_from_slice(&[0, 0, 0, 0]);
            return;
        }

        let src = [color.0, color.1, color.2];
        for channel in 0..3 {
            let s = src[channel] as f32;
            let d = self.pixels[idx + channel] as f32;
            let value = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
            self.pixels[idx + channel] = value.round().clamp(0.0, 255.0) as u8;
        }
        self.pixels[idx + 3] = (out_a * 255.0).round() as u8;
    }

    /// Draw filled circle, covering pixels whose centers fall inside
    fn draw_filled_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        let r_sq = radius * radius;
        let min_x = (cx - radius).floor() as i32;
        let max_x = (cx + radius).ceil() as i32;
        let min_y = (cy - radius).floor() as i32;
        let max_y = (cy + radius).ceil() as i32;

        for py in min_y..=max_y {
            for px in min_x..=max_x {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r_sq {
                    self.blend_pixel(px, py, color);
                }
            }
        }
    }

    /// Rasterize the polyline with Bresenham, widen every step to a square
    /// brush and blend each covered pixel exactly once
    fn draw_polyline(&mut self, points: &[(i32, i32)], width: u32, color: Rgba, dash: Option<(u32, u32)>) {
        let mut covered = Vec::new();
        let mut step: u32 = 0;
        let brush = width.max(1) as i32;
        let lo = -(brush - 1) / 2;
        let hi = lo + brush - 1;

        for segment in points.windows(2) {
            let path = bresenham(segment[0], segment[1]);
            // Shared endpoints are walked once
            let skip = usize::from(step > 0);
            for (x, y) in path.into_iter().skip(skip) {
                let visible = match dash {
                    Some((on, off)) if on + off > 0 => step % (on + off) < on,
                    _ => true,
                };
                step += 1;
                if !visible {
                    continue;
                }
                for by in lo..=hi {
                    for bx in lo..=hi {
                        covered.push((x + bx, y + by));
                    }
                }
            }
        }

        covered.sort_unstable();
        covered.dedup();
        for (x, y) in covered {
            self.blend_pixel(x, y, color);
        }
    }

    /// Get pixel buffer
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the canvas, returning its pixel buffer
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Color at (x, y), `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.pixels[idx..idx + 4];
        Some(Rgba(p[0], p[1], p[2], p[3]))
    }

    /// Get canvas dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pending_ops(&self) -> usize {
        self.operations.len()
    }
}

/// Integer points from `from` to `to` inclusive (Bresenham's algorithm)
fn bresenham(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
    let (mut x, mut y) = from;
    let (x2, y2) = to;

    let dx = (x2 - x).abs();
    let dy = -(y2 - y).abs();
    let sx = if x < x2 { 1 } else { -1 };
    let sy = if y < y2 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut points = Vec::with_capacity((dx - dy) as usize + 1);

    loop {
        points.push((x, y));

        if x == x2 && y == y2 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }

    points
}
