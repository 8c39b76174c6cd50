use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::assets::store::RasterImage;
use crate::foundation::core::{Affine, Point, Rect, Rgba8};
use crate::foundation::diagnostic::Diagnostic;
use crate::foundation::error::{LaurelError, LaurelResult};
use crate::render::surface::{Fill, FrameRgba, RenderBackend, Surface};
use crate::text::fonts::{FontBook, ResolvedFont};

/// CPU raster backend powered by `vello_cpu`, with `parley` shaping.
pub struct CpuBackend {
    shared: Arc<Shared>,
}

struct Shared {
    fonts: FontBook,
    faces: Vec<FaceData>,
    load_diagnostics: Vec<Diagnostic>,
    image_cache: Mutex<HashMap<usize, CachedImage>>,
}

#[derive(Clone)]
struct FaceData {
    family: Arc<str>,
    internal_name: String,
    shaping_blob: parley::fontique::Blob<u8>,
    font: vello_cpu::peniko::FontData,
}

struct CachedImage {
    // Keeps the keyed allocation alive so its address cannot be reused.
    _pixels: Arc<Vec<u8>>,
    paint: vello_cpu::Image,
}

impl CpuBackend {
    /// Backend drawing text with the faces in `fonts`.
    pub fn new(fonts: FontBook) -> Self {
        Self::with_diagnostics(fonts, Vec::new())
    }

    /// Like [`Self::new`], carrying diagnostics produced while loading `fonts`.
    pub fn with_diagnostics(fonts: FontBook, load_diagnostics: Vec<Diagnostic>) -> Self {
        let faces = fonts
            .faces()
            .iter()
            .map(|f| FaceData {
                family: f.family.clone(),
                internal_name: f.internal_name.clone(),
                shaping_blob: parley::fontique::Blob::from(f.bytes.as_ref().clone()),
                font: vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(f.bytes.as_ref().clone()),
                    0,
                ),
            })
            .collect();
        Self {
            shared: Arc::new(Shared {
                fonts,
                faces,
                load_diagnostics,
                image_cache: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Fonts this backend draws with.
    pub fn fonts(&self) -> &FontBook {
        &self.shared.fonts
    }
}

impl RenderBackend for CpuBackend {
    type Surface = CpuSurface;

    fn create_surface(&self, background: &RasterImage) -> LaurelResult<CpuSurface> {
        let width = to_u16(background.width, "canvas width")?;
        let height = to_u16(background.height, "canvas height")?;

        let mut surface = CpuSurface {
            shared: self.shared.clone(),
            ctx: vello_cpu::RenderContext::new(width, height),
            width,
            height,
            shaper: TextShaper::new(&self.shared.faces),
            font: None,
            fill: Fill::Solid(Rgba8::BLACK),
            last_shaped: None,
        };
        surface.ctx.reset();
        surface.draw_image(background, Rect::new(0.0, 0.0, width as f64, height as f64))?;
        Ok(surface)
    }

    fn font_families(&self) -> Vec<String> {
        self.shared.fonts.families()
    }

    fn diagnostics(&self) -> Vec<Diagnostic> {
        self.shared.load_diagnostics.clone()
    }
}

/// One certificate being drawn on the CPU.
pub struct CpuSurface {
    shared: Arc<Shared>,
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    shaper: TextShaper,
    font: Option<ResolvedFont>,
    fill: Fill,
    last_shaped: Option<(ResolvedFont, String, Arc<ShapedText>)>,
}

impl CpuSurface {
    fn shaped(&mut self, text: &str) -> LaurelResult<Arc<ShapedText>> {
        let font = self
            .font
            .clone()
            .ok_or_else(|| LaurelError::render("no font set before drawing text"))?;
        if let Some((f, t, shaped)) = &self.last_shaped
            && *f == font
            && t == text
        {
            return Ok(shaped.clone());
        }
        let shaped = Arc::new(self.shaper.shape(&font, text)?);
        self.last_shaped = Some((font, text.to_owned(), shaped.clone()));
        Ok(shaped)
    }

    fn image_paint_for(&self, image: &RasterImage) -> LaurelResult<vello_cpu::Image> {
        let key = Arc::as_ptr(&image.rgba8_premul) as usize;
        let mut cache = self
            .shared
            .image_cache
            .lock()
            .map_err(|_| LaurelError::render("image cache lock poisoned"))?;
        if let Some(c) = cache.get(&key) {
            return Ok(c.paint.clone());
        }
        let paint = rgba_premul_to_image(&image.rgba8_premul, image.width, image.height)?;
        cache.insert(
            key,
            CachedImage {
                _pixels: image.rgba8_premul.clone(),
                paint: paint.clone(),
            },
        );
        Ok(paint)
    }
}

impl Surface for CpuSurface {
    fn draw_image(&mut self, image: &RasterImage, dest: Rect) -> LaurelResult<()> {
        if dest.width() <= 0.0 || dest.height() <= 0.0 {
            return Ok(());
        }
        let paint = self.image_paint_for(image)?;
        let tr = Affine::translate((dest.x0, dest.y0))
            * Affine::scale_non_uniform(
                dest.width() / image.width as f64,
                dest.height() / image.height as f64,
            );
        self.ctx.set_transform(affine_to_cpu(tr));
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            image.width as f64,
            image.height as f64,
        ));
        Ok(())
    }

    fn set_font(&mut self, font: &ResolvedFont) -> LaurelResult<()> {
        if !font.size_px.is_finite() || font.size_px <= 0.0 {
            return Err(LaurelError::validation("font size_px must be finite and > 0"));
        }
        if !self.shaper.has_family(&font.family) {
            return Err(LaurelError::render(format!(
                "font family '{}' is not registered",
                font.family
            )));
        }
        self.font = Some(font.clone());
        Ok(())
    }

    fn set_fill(&mut self, fill: Fill) {
        self.fill = fill;
    }

    fn measure_text(&mut self, text: &str) -> LaurelResult<f64> {
        Ok(self.shaped(text)?.width)
    }

    fn fill_text(&mut self, text: &str, origin: Point) -> LaurelResult<()> {
        let shaped = self.shaped(text)?;
        if shaped.glyphs.is_empty() {
            return Ok(());
        }

        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        match self.fill {
            Fill::Solid(c) => {
                self.ctx
                    .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                self.ctx
                    .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
            }
            fill @ Fill::VerticalGradient { y0, y1, .. } => {
                let rows = ((y1 - y0).round().max(0.0) as u32).saturating_add(1);
                let img = gradient_paint(&fill, y0, rows)?;
                self.ctx
                    .set_paint_transform(vello_cpu::kurbo::Affine::translate((0.0, y0)));
                self.ctx.set_paint(img);
            }
        }

        let ox = origin.x as f32;
        let oy = origin.y as f32;
        let glyphs = shaped.glyphs.iter().map(|g| vello_cpu::Glyph {
            id: g.id,
            x: ox + g.x,
            y: oy + g.y,
        });
        self.ctx
            .glyph_run(&shaped.font)
            .font_size(shaped.size_px)
            .fill_glyphs(glyphs);
        Ok(())
    }

    fn finish(mut self) -> LaurelResult<FrameRgba> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRgba {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

/// Glyphs positioned relative to the baseline origin.
struct ShapedText {
    glyphs: Vec<vello_cpu::Glyph>,
    width: f64,
    font: vello_cpu::peniko::FontData,
    size_px: f32,
}

struct FamilyShaper {
    font_ctx: parley::FontContext,
    internal_name: String,
    font: vello_cpu::peniko::FontData,
}

/// Per-surface shaping state. Each logical family gets a font context holding only its own face,
/// so faces sharing an internal family name stay distinct.
struct TextShaper {
    families: HashMap<Arc<str>, FamilyShaper>,
    layout_ctx: parley::LayoutContext<()>,
}

impl TextShaper {
    fn new(faces: &[FaceData]) -> Self {
        let families = faces
            .iter()
            .map(|f| {
                let mut font_ctx = parley::FontContext::default();
                font_ctx
                    .collection
                    .register_fonts(f.shaping_blob.clone(), None);
                (
                    f.family.clone(),
                    FamilyShaper {
                        font_ctx,
                        internal_name: f.internal_name.clone(),
                        font: f.font.clone(),
                    },
                )
            })
            .collect();
        Self {
            families,
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    fn has_family(&self, family: &str) -> bool {
        self.families.contains_key(family)
    }

    fn shape(&mut self, font: &ResolvedFont, text: &str) -> LaurelResult<ShapedText> {
        let fam = self.families.get_mut(&*font.family).ok_or_else(|| {
            LaurelError::render(format!("font family '{}' is not registered", font.family))
        })?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut fam.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(fam.internal_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px));
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        let mut width = 0f32;
        let mut baseline0: Option<f32> = None;
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let mut x = run.offset();
                let y = run.baseline();
                let base = *baseline0.get_or_insert(y);
                for g in run.glyphs() {
                    glyphs.push(vello_cpu::Glyph {
                        id: g.id,
                        x: x + g.x,
                        y: (y - g.y) - base,
                    });
                    x += g.advance;
                }
                width = width.max(x);
            }
        }

        Ok(ShapedText {
            glyphs,
            width: f64::from(width),
            font: fam.font.clone(),
            size_px: font.size_px,
        })
    }
}

/// One pixel wide column of `fill` sampled at rows `y0..y0 + rows`; drawn with pad extend.
fn gradient_paint(fill: &Fill, y0: f64, rows: u32) -> LaurelResult<vello_cpu::Image> {
    let h = rows.max(1);
    let mut bytes = Vec::with_capacity(h as usize * 4);
    for y in 0..h {
        bytes.extend_from_slice(&fill.sample(y0 + f64::from(y)).premultiplied());
    }
    rgba_premul_to_image(&bytes, 1, h)
}

fn to_u16(v: u32, what: &str) -> LaurelResult<u16> {
    u16::try_from(v)
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| LaurelError::render(format!("{what} {v} outside 1..=65535")))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> LaurelResult<vello_cpu::Pixmap> {
    let w = to_u16(width, "pixmap width")?;
    let h = to_u16(height, "pixmap height")?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(LaurelError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    let may_have_opacities = bytes.chunks_exact(4).any(|px| px[3] != 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> LaurelResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
