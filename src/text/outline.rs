use crate::effects::composite::over;
use crate::foundation::core::{PixelPos, Rgba8};
use crate::foundation::error::{BannerError, BannerResult};
use crate::raster::buffer::{PixelLayout, RasterBuffer};
use crate::text::typeface::{TextBox, Typeface};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// TrueType/OpenType face shaped with Parley and rasterized with `vello_cpu`.
pub struct OutlineTypeface {
    name: String,
    family: String,
    font: vello_cpu::peniko::FontData,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl std::fmt::Debug for OutlineTypeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineTypeface")
            .field("name", &self.name)
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

impl OutlineTypeface {
    /// Register raw font bytes. Fails with [`BannerError::FontUnavailable`] when the bytes hold
    /// no usable font family.
    pub fn from_bytes(name: impl Into<String>, font_bytes: Vec<u8>) -> BannerResult<Self> {
        let name = name.into();
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| BannerError::font_unavailable(&name, "no font families in file"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| BannerError::font_unavailable(&name, "font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            name,
            family,
            font,
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
        })
    }

    /// Family name reported by the font file.
    pub fn family(&self) -> &str {
        &self.family
    }

    fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> BannerResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(BannerError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

impl Typeface for OutlineTypeface {
    fn name(&self) -> &str {
        &self.name
    }

    fn measure(&mut self, text: &str, size_px: f32) -> BannerResult<TextBox> {
        let layout = self.layout_line(text, size_px, TextBrushRgba8::default())?;
        let (ascent, descent) = layout
            .lines()
            .next()
            .map(|line| {
                let m = line.metrics();
                (m.ascent, m.descent)
            })
            .unwrap_or((0.0, 0.0));
        Ok(TextBox {
            width: layout.width().max(0.0).ceil() as u32,
            height: (ascent + descent).max(layout.height()).max(0.0).ceil() as u32,
            ascent,
            descent,
        })
    }

    fn draw(
        &mut self,
        text: &str,
        size_px: f32,
        origins: &[PixelPos],
        fill: Rgba8,
        target: &mut RasterBuffer,
    ) -> BannerResult<()> {
        if target.layout() != PixelLayout::Rgba {
            return Err(BannerError::validation("text target must be rgba"));
        }
        if origins.is_empty() || text.is_empty() {
            return Ok(());
        }
        let w: u16 = target
            .width()
            .try_into()
            .map_err(|_| BannerError::validation("text target width exceeds u16"))?;
        let h: u16 = target
            .height()
            .try_into()
            .map_err(|_| BannerError::validation("text target height exceeds u16"))?;

        let layout = self.layout_line(text, size_px, TextBrushRgba8::from(fill))?;
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        for origin in origins {
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                f64::from(origin.x),
                f64::from(origin.y),
            )));
            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));
                    let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&self.font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        composite_premul_over(target, pixmap.data_as_u8_slice());
        Ok(())
    }
}

fn composite_premul_over(target: &mut RasterBuffer, premul: &[u8]) {
    for (d, s) in target
        .data_mut()
        .chunks_exact_mut(4)
        .zip(premul.chunks_exact(4))
    {
        let a = s[3];
        if a == 0 {
            continue;
        }
        let out = over([d[0], d[1], d[2], d[3]], unpremultiply([s[0], s[1], s[2], a]));
        d.copy_from_slice(&out);
    }
}

fn unpremultiply(px: [u8; 4]) -> [u8; 4] {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let un = |c: u8| -> u8 { ((u32::from(c) * 255 + a / 2) / a).min(255) as u8 };
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

#[cfg(test)]
#[path = "../../tests/unit/text/outline.rs"]
mod tests;
