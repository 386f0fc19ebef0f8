use crate::frame::Frame;
use crate::geometry::Vec2;
use crate::projection::Column;
use crate::scene::Scene;
use crate::viewpoint::Viewpoint;

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // 0RGB, which is what softbuffer expects
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
}

const BACKGROUND: u32 = 0;
const WALL: u32 = 0x00FF_FFFF;
const RAY: u32 = 0x0050_5050;
const HIT_LEG: u32 = 0x00FF_0000;
const HEADING: u32 = 0x00FF_D040;

/// Rectangle of the framebuffer a view draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

/// Framebuffer being drawn, row-major with `width` pixels per row.
pub struct Canvas<'a> {
    buf: &'a mut [u32],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(buf: &'a mut [u32], width: usize, height: usize) -> Self {
        debug_assert!(buf.len() >= width * height);
        Self { buf, width, height }
    }

    pub fn fill_rect(&mut self, vp: Viewport, x: i64, y: i64, w: i64, h: i64, color: u32) {
        let x0 = (x.max(0) as usize).min(vp.w);
        let y0 = (y.max(0) as usize).min(vp.h);
        let x1 = ((x + w).max(0) as usize).min(vp.w).max(x0);
        let y1 = ((y + h).max(0) as usize).min(vp.h);
        for yy in y0..y1 {
            if vp.y + yy >= self.height {
                break;
            }
            let row = (vp.y + yy) * self.width + vp.x;
            self.buf[row + x0..row + x1].fill(color);
        }
    }

    #[inline]
    fn plot(&mut self, vp: Viewport, x: i64, y: i64, color: u32) {
        if x < 0 || y < 0 || x as usize >= vp.w || y as usize >= vp.h {
            return;
        }
        let (px, py) = (vp.x + x as usize, vp.y + y as usize);
        if px < self.width && py < self.height {
            self.buf[py * self.width + px] = color;
        }
    }

    /// Bresenham line. The segment is clipped to the viewport first so the
    /// step count is bounded by the viewport size, not the line length.
    pub fn line(&mut self, vp: Viewport, a: Vec2, b: Vec2, color: u32) {
        let Some((a, b)) = clip_line(vp, a, b) else {
            return;
        };
        let (mut x0, mut y0) = (a[0].round() as i64, a[1].round() as i64);
        let (x1, y1) = (b[0].round() as i64, b[1].round() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(vp, x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

/// Clip `a -> b` to the pixel box `[0, w-1] x [0, h-1]` of `vp` (Liang-Barsky).
/// Returns None when nothing of the line is inside.
fn clip_line(vp: Viewport, a: Vec2, b: Vec2) -> Option<([f64; 2], [f64; 2])> {
    if vp.w == 0 || vp.h == 0 || !a.is_finite() || !b.is_finite() {
        return None;
    }
    let max_x = (vp.w - 1) as f64;
    let max_y = (vp.h - 1) as f64;
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (dx, dy) = (b.x as f64 - ax, b.y as f64 - ay);

    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for (p, q) in [(-dx, ax), (dx, max_x - ax), (-dy, ay), (dy, max_y - ay)] {
        if p == 0.0 {
            // parallel to this edge: fully outside or no constraint
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| {
        [
            (ax + dx * t).clamp(0.0, max_x),
            (ay + dy * t).clamp(0.0, max_y),
        ]
    };
    Some((at(t0), at(t1)))
}

/// Draw both views: top-down on the left, projected strip on the right.
pub fn render_frame(
    buf: &mut [u32],
    width: usize,
    height: usize,
    scene: &Scene,
    viewpoint: &Viewpoint,
    frame: &Frame,
) {
    buf.fill(BACKGROUND);
    let mut canvas = Canvas::new(buf, width, height);

    let half = width / 2;
    let top_down = Viewport {
        x: 0,
        y: 0,
        w: half,
        h: height,
    };
    let strip = Viewport {
        x: half,
        y: 0,
        w: width - half,
        h: height,
    };

    draw_top_down(&mut canvas, top_down, scene, viewpoint, frame);
    draw_strip(&mut canvas, strip, &frame.columns);
}

fn draw_top_down(
    canvas: &mut Canvas,
    vp: Viewport,
    scene: &Scene,
    viewpoint: &Viewpoint,
    frame: &Frame,
) {
    for ray in viewpoint.rays() {
        canvas.line(vp, ray.origin, ray.tip(), RAY);
    }
    for (ray, hit) in viewpoint.rays().iter().zip(&frame.hits) {
        if let Some(hit) = hit {
            canvas.line(vp, ray.origin, hit.point, HIT_LEG);
        }
    }
    for segment in scene.segments() {
        canvas.line(vp, segment.a(), segment.b(), WALL);
    }
    let heading = viewpoint.heading_ray();
    canvas.line(vp, heading.origin, heading.tip(), HEADING);

    let p = viewpoint.position();
    canvas.fill_rect(vp, p.x as i64 - 2, p.y as i64 - 2, 5, 5, HEADING);
}

fn draw_strip(canvas: &mut Canvas, vp: Viewport, columns: &[Column]) {
    for c in columns {
        if c.is_empty() {
            continue; // background is already dark
        }
        let color = pack_rgb(c.shade, c.shade, c.shade);
        canvas.fill_rect(
            vp,
            c.x as i64,
            c.top as i64,
            c.width as i64,
            c.height as i64,
            color,
        );
    }
}
