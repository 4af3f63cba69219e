//! Scratch-off occlusion layer covering a gallery card's secret message.
//!
//! The layer is a plain RGBA pixel buffer. It is initialized as a silver
//! coating (fill, centered hint plate, textured specks) and removed by
//! pointer strokes that cut transparent round-capped paths through it.
//! There is no semantic "revealed" state; [`ScratchOverlay::revealed_fraction`]
//! samples the alpha channel when a caller needs a number.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use rand::Rng;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Solid silver coating.
pub const COATING_COLOR: Rgba<u8> = Rgba([0xC0, 0xC0, 0xC0, 0xFF]);

/// Hint plate tint, a darker silver.
pub const HINT_COLOR: Rgba<u8> = Rgba([0xA0, 0xA0, 0xA0, 0xFF]);

/// Hint shown on the coating.
pub const HINT_TEXT: &str = "刮开查看密语";

/// Hint glyph height in pixels; each glyph occupies a square cell.
pub const HINT_FONT_PX: u32 = 20;

/// Number of texture specks scattered over the coating.
pub const SPECK_COUNT: usize = 500;

/// Side length of a speck in pixels.
pub const SPECK_SIZE: u32 = 2;

/// Upper bound (exclusive) of a speck's opacity.
pub const SPECK_MAX_ALPHA: f32 = 0.2;

/// Radius of the scratch brush; strokes are twice as wide.
pub const SCRATCH_RADIUS: f32 = 25.0;

const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

// ---------------------------------------------------------------------------
// Hint plate
// ---------------------------------------------------------------------------

/// Area of the coating tinted behind the hint text, clipped to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintPlate {
    pub text: &'static str,
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl HintPlate {
    fn centered(width: u32, height: u32) -> Self {
        let glyphs = HINT_TEXT.chars().count() as u32;
        let plate_w = (glyphs * HINT_FONT_PX).min(width);
        let plate_h = HINT_FONT_PX.min(height);
        Self {
            text: HINT_TEXT,
            left: (width - plate_w) / 2,
            top: (height - plate_h) / 2,
            width: plate_w,
            height: plate_h,
        }
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.left + self.width && y >= self.top && y < self.top + self.height
    }
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

/// A scratch-off layer sized to its container.
#[derive(Debug, Clone)]
pub struct ScratchOverlay {
    buffer: RgbaImage,
    hint: HintPlate,
    specks: usize,
    /// Last point of the stroke in progress, `None` between strokes.
    last: Option<(f32, f32)>,
}

impl ScratchOverlay {
    /// Build a fresh coating of exactly `width` x `height` pixels.
    ///
    /// Order is fixed: solid fill, hint plate, then [`SPECK_COUNT`] specks at
    /// random positions.
    pub fn new<R: Rng>(width: u32, height: u32, rng: &mut R) -> Self {
        let mut buffer = RgbaImage::from_pixel(width, height, COATING_COLOR);

        let hint = HintPlate::centered(width, height);
        for y in hint.top..hint.top + hint.height {
            for x in hint.left..hint.left + hint.width {
                buffer.put_pixel(x, y, HINT_COLOR);
            }
        }

        let mut specks = 0;
        if width > 0 && height > 0 {
            for _ in 0..SPECK_COUNT {
                let sx = rng.random_range(0..width);
                let sy = rng.random_range(0..height);
                let alpha = rng.random_range(0.0..SPECK_MAX_ALPHA);
                paint_speck(&mut buffer, sx, sy, alpha);
                specks += 1;
            }
        }

        Self {
            buffer,
            hint,
            specks,
            last: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn hint(&self) -> &HintPlate {
        &self.hint
    }

    pub fn speck_count(&self) -> usize {
        self.specks
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.buffer.get_pixel_checked(x, y).copied()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Whether a stroke is in progress.
    pub fn is_stroking(&self) -> bool {
        self.last.is_some()
    }

    // -----------------------------------------------------------------------
    // Pointer input
    // -----------------------------------------------------------------------

    /// Pointer moved over the layer; erases only while pressed.
    pub fn pointer_move(&mut self, x: f32, y: f32, pressed: bool) {
        if pressed {
            self.scratch_to(x, y);
        }
    }

    pub fn pointer_up(&mut self) {
        self.end_stroke();
    }

    pub fn pointer_leave(&mut self) {
        self.end_stroke();
    }

    /// Extend the current stroke to `(x, y)`.
    ///
    /// The first point of a stroke cuts a dot; later points cut a capsule
    /// from the previous point so fast movement leaves no gaps.
    pub fn scratch_to(&mut self, x: f32, y: f32) {
        match self.last {
            Some((lx, ly)) => self.cut_capsule((lx, ly), (x, y)),
            None => self.cut_capsule((x, y), (x, y)),
        }
        self.last = Some((x, y));
    }

    /// Finish the current stroke; the next point starts a new one.
    pub fn end_stroke(&mut self) {
        self.last = None;
    }

    /// Share of pixels that are fully transparent, in `[0, 1]`.
    pub fn revealed_fraction(&self) -> f64 {
        let total = u64::from(self.width()) * u64::from(self.height());
        if total == 0 {
            return 0.0;
        }
        let clear = self.buffer.pixels().filter(|p| p.0[3] == 0).count() as u64;
        clear as f64 / total as f64
    }

    /// Encode the layer as PNG for the renderer.
    pub fn to_png(&self) -> Result<Vec<u8>, CoreError> {
        let mut bytes = Vec::new();
        self.buffer
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| CoreError::Internal(format!("Failed to encode overlay: {e}")))?;
        Ok(bytes)
    }

    // ---- private helpers ----

    /// Cut every pixel whose center lies within [`SCRATCH_RADIUS`] of the
    /// segment `a..b` (a dot when `a == b`).
    fn cut_capsule(&mut self, a: (f32, f32), b: (f32, f32)) {
        let (w, h) = (self.width(), self.height());
        if w == 0 || h == 0 {
            return;
        }
        let r = SCRATCH_RADIUS;
        let min_x = (a.0.min(b.0) - r).floor().max(0.0) as u32;
        let min_y = (a.1.min(b.1) - r).floor().max(0.0) as u32;
        let max_x = ((a.0.max(b.0) + r).ceil().max(0.0) as u32).min(w);
        let max_y = ((a.1.max(b.1) + r).ceil().max(0.0) as u32).min(h);

        for y in min_y..max_y {
            for x in min_x..max_x {
                let center = (x as f32 + 0.5, y as f32 + 0.5);
                if distance_to_segment(center, a, b) <= r {
                    self.buffer.put_pixel(x, y, CLEAR);
                }
            }
        }
    }
}

/// Composite a white speck source-over onto the coating.
fn paint_speck(buffer: &mut RgbaImage, x: u32, y: u32, alpha: f32) {
    let x_end = (x + SPECK_SIZE).min(buffer.width());
    let y_end = (y + SPECK_SIZE).min(buffer.height());
    for py in y..y_end {
        for px in x..x_end {
            let pixel = buffer.get_pixel_mut(px, py);
            for channel in 0..3 {
                let dst = f32::from(pixel.0[channel]);
                pixel.0[channel] = (255.0 * alpha + dst * (1.0 - alpha)).round() as u8;
            }
        }
    }
}

fn distance_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
