use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Two source samples and the 8.8 fixed-point weight of the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tap {
    near: usize,
    far: usize,
    weight: u32,
}

fn taps(dst: usize, src: usize) -> Vec<Tap> {
    if dst == 0 || src == 0 {
        return Vec::new();
    }
    let step = src as f32 / dst as f32;
    (0..dst)
        .map(|d| {
            let f = d as f32 * step;
            let near = (f.floor() as usize).min(src - 1);
            Tap {
                near,
                far: (near + 1).min(src - 1),
                weight: ((f - near as f32) * 256.0).round().clamp(0.0, 256.0) as u32,
            }
        })
        .collect()
}

/// Precomputed window-to-framebuffer sampling, rebuilt when either size changes.
#[derive(Debug, Clone, Default)]
pub struct Stretch {
    src_w: usize,
    src_h: usize,
    cols: Vec<Tap>,
    rows: Vec<Tap>,
}

impl Stretch {
    pub fn new(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> Self {
        Self {
            src_w,
            src_h,
            cols: taps(dst_w, src_w),
            rows: taps(dst_h, src_h),
        }
    }

    pub fn dst_size(&self) -> (usize, usize) {
        (self.cols.len(), self.rows.len())
    }

    /// Bilinear stretch of `src` into `dst`, one rayon task per output row.
    pub fn blit(&self, dst: &mut [u32], src: &[u32]) {
        let dw = self.cols.len();
        if dw == 0 || self.rows.is_empty() || src.len() < self.src_w * self.src_h {
            return;
        }
        let sw = self.src_w;
        dst.par_chunks_mut(dw)
            .zip(self.rows.par_iter())
            .for_each(|(out, row)| {
                let upper = &src[row.near * sw..(row.near + 1) * sw];
                let lower = &src[row.far * sw..(row.far + 1) * sw];
                for (px, col) in out.iter_mut().zip(&self.cols) {
                    let top = mix(upper[col.near], upper[col.far], col.weight);
                    let bottom = mix(lower[col.near], lower[col.far], col.weight);
                    *px = mix(top, bottom, row.weight);
                }
            });
    }
}

/// Blend two 0RGB pixels, `w` in 0..=256 towards `b`.
#[inline]
fn mix(a: u32, b: u32, w: u32) -> u32 {
    let inv = 256 - w;
    // red and blue share one multiply, green gets its own
    let rb = (((a & 0x00FF_00FF) * inv + (b & 0x00FF_00FF) * w) >> 8) & 0x00FF_00FF;
    let g = (((a & 0x0000_FF00) * inv + (b & 0x0000_FF00) * w) >> 8) & 0x0000_FF00;
    rb | g
}
