use std::sync::Arc;

use super::*;
use crate::assets::store::RasterImage;
use crate::foundation::core::Rect;
use crate::render::surface::FrameRgba;

#[derive(Debug, Clone, PartialEq)]
struct Drawn {
    text: String,
    at: Point,
    size_px: f32,
    fill: Fill,
}

/// Every glyph is half an em wide.
struct Recording {
    font: Option<ResolvedFont>,
    fill: Fill,
    drawn: Vec<Drawn>,
}

impl Recording {
    fn new() -> Self {
        Self {
            font: None,
            fill: Fill::Solid(Rgba8::BLACK),
            drawn: Vec::new(),
        }
    }

    fn size(&self) -> f32 {
        self.font.as_ref().map(|f| f.size_px).unwrap_or(10.0)
    }
}

impl Surface for Recording {
    fn draw_image(&mut self, _image: &RasterImage, _dest: Rect) -> LaurelResult<()> {
        Ok(())
    }

    fn set_font(&mut self, font: &ResolvedFont) -> LaurelResult<()> {
        self.font = Some(font.clone());
        Ok(())
    }

    fn set_fill(&mut self, fill: Fill) {
        self.fill = fill;
    }

    fn measure_text(&mut self, text: &str) -> LaurelResult<f64> {
        Ok(text.chars().count() as f64 * f64::from(self.size()) * 0.5)
    }

    fn fill_text(&mut self, text: &str, origin: Point) -> LaurelResult<()> {
        self.drawn.push(Drawn {
            text: text.to_owned(),
            at: origin,
            size_px: self.size(),
            fill: self.fill,
        });
        Ok(())
    }

    fn finish(self) -> LaurelResult<FrameRgba> {
        Ok(FrameRgba {
            width: 100,
            height: 100,
            data: vec![0; 100 * 100 * 4],
            premultiplied: true,
        })
    }
}

fn font(size_px: f32) -> ResolvedFont {
    ResolvedFont {
        family: Arc::from("Test"),
        size_px,
    }
}

fn style(size_px: f32, fill: Rgba8) -> TextStyle {
    TextStyle {
        font: font(size_px),
        fill,
    }
}

#[test]
fn runs_advance_by_width_measured_in_their_own_font() {
    let mut s = Recording::new();
    let grey = Rgba8::rgb(0x55, 0x55, 0x55);
    let accent = Rgba8::rgb(0xC9, 0xA2, 0x27);
    let end = render_line(
        &mut s,
        57.0,
        800.0,
        &[
            StyledRun::styled("for winning ", &style(20.0, grey)),
            StyledRun::styled("Gold", &style(40.0, accent)),
            StyledRun::new(" in "),
        ],
    )
    .unwrap();

    assert_eq!(s.drawn[0].at, Point::new(57.0, 800.0));
    assert_eq!(s.drawn[1].at.x, 57.0 + 12.0 * 10.0);
    assert_eq!(s.drawn[1].fill, Fill::Solid(accent));
    assert_eq!(s.drawn[2].at.x, 57.0 + 120.0 + 4.0 * 20.0);
    assert_eq!(s.drawn[2].size_px, 40.0, "unstyled run inherits the previous font");
    assert_eq!(s.drawn[2].fill, Fill::Solid(accent));
    assert_eq!(end, 57.0 + 120.0 + 80.0 + 4.0 * 20.0);
}

#[test]
fn empty_line_returns_start() {
    let mut s = Recording::new();
    assert_eq!(render_line(&mut s, 10.0, 0.0, &[]).unwrap(), 10.0);
    assert!(s.drawn.is_empty());
}

#[test]
fn gradient_text_spans_box_above_baseline() {
    let mut s = Recording::new();
    let top = Rgba8::rgb(0x99, 0x73, 0x00);
    let bottom = Rgba8::rgb(0xff, 0xc0, 0x00);
    let end = render_gradient_text(&mut s, "Merit", 57.0, 550.0, &font(32.0), [top, bottom], 32.0)
        .unwrap();
    assert_eq!(s.drawn.len(), 1);
    assert_eq!(
        s.drawn[0].fill,
        Fill::VerticalGradient {
            top,
            bottom,
            y0: 518.0,
            y1: 550.0
        }
    );
    assert_eq!(end, 57.0 + 5.0 * 16.0);
}

#[test]
fn ordinal_date_raises_suffix_and_continues() {
    let mut s = Recording::new();
    let date = OrdinalDate::parse("2026-12-10").unwrap();
    let value = style(20.0, Rgba8::BLACK);
    let sup = style(10.0, Rgba8::BLACK);
    let end = render_ordinal_date(&mut s, 100.0, 900.0, &date, &value, &sup, 5.0).unwrap();

    let texts: Vec<_> = s.drawn.iter().map(|d| d.text.as_str()).collect();
    assert_eq!(texts, vec!["10", "th", " december, 2026"]);
    assert_eq!(s.drawn[0].at, Point::new(100.0, 900.0));
    assert_eq!(s.drawn[1].at, Point::new(120.0, 895.0));
    assert_eq!(s.drawn[1].size_px, 10.0);
    assert_eq!(s.drawn[2].at, Point::new(130.0, 900.0));
    assert_eq!(end, 130.0 + 15.0 * 10.0);
}

#[test]
fn spaced_text_adds_spacing_per_character() {
    let mut s = Recording::new();
    s.set_font(&font(10.0)).unwrap();
    let end = render_spaced_text(&mut s, "CERT", 0.0, 618.0, 2.0).unwrap();
    let xs: Vec<_> = s.drawn.iter().map(|d| d.at.x).collect();
    assert_eq!(xs, vec![0.0, 7.0, 14.0, 21.0]);
    assert_eq!(end, 28.0);
}

#[test]
fn styled_run_is_immutable_builder() {
    let base = StyledRun::new("x");
    let with = base.clone().with_fill(Fill::Solid(Rgba8::WHITE));
    assert!(base.fill.is_none());
    assert_eq!(with.fill, Some(Fill::Solid(Rgba8::WHITE)));
    assert_eq!(with.text, "x");
    assert!(with.font.is_none());
}
