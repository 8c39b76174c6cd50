use crate::assets::store::RasterImage;
use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::diagnostic::Diagnostic;
use crate::foundation::error::LaurelResult;
use crate::text::fonts::ResolvedFont;

/// A rendered certificate as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// Paint used for subsequent text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fill {
    /// Flat color.
    Solid(Rgba8),
    /// Top-to-bottom linear gradient spanning canvas rows `y0..=y1`; padded outside.
    VerticalGradient {
        /// Color at `y0`.
        top: Rgba8,
        /// Color at `y1`.
        bottom: Rgba8,
        /// First row of the gradient.
        y0: f64,
        /// Last row of the gradient.
        y1: f64,
    },
}

impl Fill {
    /// Color at canvas row `y`.
    pub fn sample(&self, y: f64) -> Rgba8 {
        match *self {
            Self::Solid(c) => c,
            Self::VerticalGradient { top, bottom, y0, y1 } => {
                let span = y1 - y0;
                let t = if span <= 0.0 { 0.0 } else { (y - y0) / span };
                top.lerp(bottom, t as f32)
            }
        }
    }
}

/// Drawing target for one certificate.
///
/// Text state (font and fill) persists between calls, like a 2D canvas context.
pub trait Surface {
    /// Draw `image` scaled into `dest`.
    fn draw_image(&mut self, image: &RasterImage, dest: Rect) -> LaurelResult<()>;

    /// Make `font` the active font.
    fn set_font(&mut self, font: &ResolvedFont) -> LaurelResult<()>;

    /// Make `fill` the active paint.
    fn set_fill(&mut self, fill: Fill);

    /// Advance width of `text` under the active font. Trailing whitespace counts.
    fn measure_text(&mut self, text: &str) -> LaurelResult<f64>;

    /// Draw `text` with its baseline starting at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point) -> LaurelResult<()>;

    /// Rasterize everything drawn so far.
    fn finish(self) -> LaurelResult<FrameRgba>
    where
        Self: Sized;
}

/// Creates one [`Surface`] per certificate. Shared across render workers.
pub trait RenderBackend: Sync {
    /// Surface type produced by this backend.
    type Surface: Surface;

    /// Fresh surface sized to `background`, with the background already drawn at the origin.
    fn create_surface(&self, background: &RasterImage) -> LaurelResult<Self::Surface>;

    /// Logical font families text can be drawn with, in preference order.
    fn font_families(&self) -> Vec<String>;

    /// Observations made while the backend was set up.
    fn diagnostics(&self) -> Vec<Diagnostic> {
        Vec::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
