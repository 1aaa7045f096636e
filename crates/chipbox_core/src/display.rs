use chipbox_common::{Frame, Region};

use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Past this many pending rectangles the whole grid is reported instead.
const MAX_REGIONS: usize = 32;

const FULL: Region = Region::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT);

/// 64x32 monochrome framebuffer with dirty-region tracking.
pub struct Display {
    pixels: [bool; SCREEN_WIDTH * SCREEN_HEIGHT],
    dirty: Vec<Region>,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            pixels: [false; SCREEN_WIDTH * SCREEN_HEIGHT],
            dirty: Vec::new(),
        }
    }
}

impl Display {
    pub fn pixels(&self) -> &[bool; SCREEN_WIDTH * SCREEN_HEIGHT] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y * SCREEN_WIDTH + x]
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            pixels: &self.pixels,
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [false; SCREEN_WIDTH * SCREEN_HEIGHT];
        self.dirty.clear();
        self.dirty.push(FULL);
    }

    /// XOR an 8-pixel-wide sprite onto the screen with its top-left corner
    /// at (`x`, `y`), one byte per row, MSB leftmost.
    ///
    /// The origin is reduced modulo the screen size. Pixels that fall past
    /// the right or bottom edge wrap to the opposite side when `wrap` is set
    /// and are dropped otherwise. Returns true if any lit pixel was turned
    /// off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, rows: &[u8], wrap: bool) -> bool {
        let x0 = x % SCREEN_WIDTH;
        let y0 = y % SCREEN_HEIGHT;
        let mut collision = false;
        // Bounds of toggled pixels in unwrapped coordinates.
        let mut bounds: Option<(usize, usize, usize, usize)> = None;

        for (row, bits) in rows.iter().enumerate() {
            let yu = y0 + row;
            if !wrap && yu >= SCREEN_HEIGHT {
                break;
            }
            for col in 0..8 {
                if (bits >> (7 - col)) & 0x1 == 0 {
                    continue;
                }
                let xu = x0 + col;
                if !wrap && xu >= SCREEN_WIDTH {
                    break;
                }
                let idx = (yu % SCREEN_HEIGHT) * SCREEN_WIDTH + xu % SCREEN_WIDTH;
                let pixel = &mut self.pixels[idx];
                if *pixel {
                    collision = true;
                }
                *pixel ^= true;

                bounds = Some(match bounds {
                    None => (xu, yu, xu, yu),
                    Some((x_min, y_min, x_max, y_max)) => {
                        (x_min.min(xu), y_min.min(yu), x_max.max(xu), y_max.max(yu))
                    }
                });
            }
        }

        if let Some((x_min, y_min, x_max, y_max)) = bounds {
            for (rx, rw) in split_span(x_min, x_max, SCREEN_WIDTH).into_iter().flatten() {
                for (ry, rh) in split_span(y_min, y_max, SCREEN_HEIGHT).into_iter().flatten() {
                    self.mark(Region::new(rx, ry, rw, rh));
                }
            }
        }
        collision
    }

    fn mark(&mut self, region: Region) {
        if self.dirty.first() == Some(&FULL) {
            return;
        }
        if self.dirty.len() >= MAX_REGIONS {
            self.dirty.clear();
            self.dirty.push(FULL);
            return;
        }
        self.dirty.push(region);
    }

    pub fn has_changes(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Regions changed since the previous call. Leaves the display clean.
    pub fn take_changes(&mut self) -> Vec<Region> {
        std::mem::take(&mut self.dirty)
    }
}

/// Split the inclusive unwrapped span `lo..=hi` into at most two
/// `(start, len)` pieces inside `0..limit`. `lo < limit` and
/// `hi - lo < limit` always hold for sprite spans.
fn split_span(lo: usize, hi: usize, limit: usize) -> [Option<(usize, usize)>; 2] {
    if hi < limit {
        [Some((lo, hi - lo + 1)), None]
    } else if lo >= limit {
        [Some((lo - limit, hi - lo + 1)), None]
    } else {
        [Some((lo, limit - lo)), Some((0, hi - limit + 1))]
    }
}
