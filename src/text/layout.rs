use crate::foundation::core::{Canvas, PixelPos, Rgba8};
use crate::foundation::error::{BannerError, BannerResult};
use crate::raster::buffer::RasterBuffer;
use crate::text::typeface::{TextBox, Typeface};

/// Hard cap on auto-fit iterations, independent of the configured bounds.
pub const MAX_AUTO_FIT_STEPS: u32 = 4096;

/// How the ad string is placed on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum TextPolicy {
    /// One line at a fixed size, centered on its line box.
    Centered {
        /// Font size in pixels.
        size_px: f32,
    },
    /// One centered line, grown from `start_px` by `step_px` while it fits.
    AutoFit {
        /// First size tried.
        start_px: f32,
        /// Growth per iteration.
        step_px: f32,
        /// Largest size tried; defaults to the canvas height.
        #[serde(default)]
        max_px: Option<f32>,
        /// Fraction of the canvas width/height the text must stay under.
        #[serde(default = "default_fill_ratio")]
        fill_ratio: f32,
    },
    /// A grid of repeated copies starting at the top-left corner.
    Tiled {
        /// Font size in pixels.
        size_px: f32,
        /// Gap added to the text box on both axes.
        margin_px: u32,
    },
}

fn default_fill_ratio() -> f32 {
    0.98
}

impl TextPolicy {
    /// Reject non-positive sizes, steps and ratios.
    pub fn validate(&self) -> BannerResult<()> {
        fn positive(name: &str, v: f32) -> BannerResult<()> {
            if !v.is_finite() || v <= 0.0 {
                return Err(BannerError::validation(format!(
                    "{name} must be finite and > 0, got {v}"
                )));
            }
            Ok(())
        }
        match *self {
            Self::Centered { size_px } | Self::Tiled { size_px, .. } => positive("size_px", size_px),
            Self::AutoFit {
                start_px,
                step_px,
                max_px,
                fill_ratio,
            } => {
                positive("start_px", start_px)?;
                positive("step_px", step_px)?;
                if let Some(max_px) = max_px {
                    positive("max_px", max_px)?;
                    if start_px > max_px {
                        return Err(BannerError::validation(format!(
                            "start_px {start_px} exceeds max_px {max_px}"
                        )));
                    }
                }
                positive("fill_ratio", fill_ratio)?;
                if fill_ratio > 1.0 {
                    return Err(BannerError::validation("fill_ratio must be <= 1"));
                }
                Ok(())
            }
        }
    }
}

/// One copy of the string at an origin (top-left of its line box).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Placement {
    /// Text drawn at this origin.
    pub text: String,
    /// Top-left of the line box; may lie outside the canvas.
    pub origin: PixelPos,
}

/// Where and how large the text ends up.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextLayoutResult {
    /// Font size actually used.
    pub size_px: f32,
    /// Measured box at `size_px`.
    pub text_box: TextBox,
    /// Every copy to draw, row-major for tiled layouts.
    pub placements: Vec<Placement>,
    /// Tile counts along x and y; `(1, 1)` for single-line policies.
    pub grid: (u32, u32),
}

impl TextLayoutResult {
    fn single(text: &str, size_px: f32, text_box: TextBox, canvas: Canvas) -> Self {
        Self {
            size_px,
            text_box,
            placements: vec![Placement {
                text: text.to_string(),
                origin: centered_origin(canvas, text_box),
            }],
            grid: (1, 1),
        }
    }

    /// Origins of all placements.
    pub fn origins(&self) -> Vec<PixelPos> {
        self.placements.iter().map(|p| p.origin).collect()
    }
}

/// `((W - w) / 2, (H - h) / 2)` with floor division; negative when the text overflows.
pub fn centered_origin(canvas: Canvas, text_box: TextBox) -> PixelPos {
    let dx = i64::from(canvas.width) - i64::from(text_box.width);
    let dy = i64::from(canvas.height) - i64::from(text_box.height);
    PixelPos::new(
        dx.div_euclid(2).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
        dy.div_euclid(2).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
    )
}

/// Number of tiles needed to cover `canvas_dim` with a pitch of `text_dim + margin`.
pub fn tile_count(canvas_dim: u32, text_dim: u32, margin: u32) -> u32 {
    let pitch = text_dim.saturating_add(margin).max(1);
    canvas_dim.div_ceil(pitch)
}

/// Lay out `text` under `policy`.
pub fn layout_text(
    face: &mut dyn Typeface,
    text: &str,
    policy: TextPolicy,
    canvas: Canvas,
) -> BannerResult<TextLayoutResult> {
    policy.validate()?;
    let out = match policy {
        TextPolicy::Centered { size_px } => layout_centered(face, text, size_px, canvas)?,
        TextPolicy::AutoFit {
            start_px,
            step_px,
            max_px,
            fill_ratio,
        } => layout_auto_fit(
            face,
            text,
            AutoFitBounds {
                start_px,
                step_px,
                max_px: max_px.unwrap_or(canvas.height as f32),
                fill_ratio,
            },
            canvas,
        )?,
        TextPolicy::Tiled { size_px, margin_px } => {
            layout_tiled(face, text, size_px, margin_px, canvas)?
        }
    };
    tracing::debug!(
        face = face.name(),
        size_px = out.size_px,
        text_w = out.text_box.width,
        text_h = out.text_box.height,
        placements = out.placements.len(),
        "laid out text"
    );
    Ok(out)
}

/// Fixed-size line centered on the canvas.
pub fn layout_centered(
    face: &mut dyn Typeface,
    text: &str,
    size_px: f32,
    canvas: Canvas,
) -> BannerResult<TextLayoutResult> {
    let text_box = face.measure(text, size_px)?;
    Ok(TextLayoutResult::single(text, size_px, text_box, canvas))
}

/// Search range for [`layout_auto_fit`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoFitBounds {
    /// First size tried.
    pub start_px: f32,
    /// Growth per iteration; must be > 0.
    pub step_px: f32,
    /// Largest size tried.
    pub max_px: f32,
    /// Fraction of the canvas the text must stay under.
    pub fill_ratio: f32,
}

/// Largest size in `start, start+step, ..` up to `max_px` whose box stays under `fill_ratio` of
/// both canvas dimensions. If nothing fits, the smaller of `start_px` and `max_px` is used.
pub fn layout_auto_fit(
    face: &mut dyn Typeface,
    text: &str,
    bounds: AutoFitBounds,
    canvas: Canvas,
) -> BannerResult<TextLayoutResult> {
    let limit_w = bounds.fill_ratio * canvas.width as f32;
    let limit_h = bounds.fill_ratio * canvas.height as f32;

    let mut best: Option<(f32, TextBox)> = None;
    let mut size = bounds.start_px;
    for _ in 0..MAX_AUTO_FIT_STEPS {
        if size > bounds.max_px {
            break;
        }
        let b = face.measure(text, size)?;
        if b.width as f32 >= limit_w || b.height as f32 >= limit_h {
            break;
        }
        best = Some((size, b));
        let next = size + bounds.step_px;
        if next <= size {
            break;
        }
        size = next;
    }

    let (size_px, text_box) = match best {
        Some(found) => found,
        None => {
            let size = bounds.start_px.min(bounds.max_px);
            (size, face.measure(text, size)?)
        }
    };
    Ok(TextLayoutResult::single(text, size_px, text_box, canvas))
}

/// Repeat the line on a grid with pitch `text + margin`, starting at `(0, 0)`.
///
/// Tiles that extend past the right or bottom edge are kept; the renderer clips them.
pub fn layout_tiled(
    face: &mut dyn Typeface,
    text: &str,
    size_px: f32,
    margin_px: u32,
    canvas: Canvas,
) -> BannerResult<TextLayoutResult> {
    let text_box = face.measure(text, size_px)?;
    if text.is_empty() || (text_box.width == 0 && text_box.height == 0 && margin_px == 0) {
        return Ok(TextLayoutResult {
            size_px,
            text_box,
            placements: Vec::new(),
            grid: (0, 0),
        });
    }

    let pitch_x = text_box.width.saturating_add(margin_px).max(1);
    let pitch_y = text_box.height.saturating_add(margin_px).max(1);
    let nx = tile_count(canvas.width, text_box.width, margin_px);
    let ny = tile_count(canvas.height, text_box.height, margin_px);

    let mut placements = Vec::with_capacity((nx as usize) * (ny as usize));
    for row in 0..ny {
        for col in 0..nx {
            placements.push(Placement {
                text: text.to_string(),
                origin: PixelPos::new((col * pitch_x) as i32, (row * pitch_y) as i32),
            });
        }
    }
    Ok(TextLayoutResult {
        size_px,
        text_box,
        placements,
        grid: (nx, ny),
    })
}

/// Draw a layout into a fresh, fully transparent layer covering `canvas`.
pub fn render_text_layer(
    face: &mut dyn Typeface,
    layout: &TextLayoutResult,
    fill: Rgba8,
    canvas: Canvas,
) -> BannerResult<RasterBuffer> {
    let mut layer = RasterBuffer::transparent(canvas)?;
    let Some(first) = layout.placements.first() else {
        return Ok(layer);
    };
    if layout.placements.iter().all(|p| p.text == first.text) {
        face.draw(&first.text, layout.size_px, &layout.origins(), fill, &mut layer)?;
    } else {
        for p in &layout.placements {
            face.draw(&p.text, layout.size_px, &[p.origin], fill, &mut layer)?;
        }
    }
    Ok(layer)
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
