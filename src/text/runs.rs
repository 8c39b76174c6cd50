use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::LaurelResult;
use crate::render::surface::{Fill, Surface};
use crate::text::date::OrdinalDate;
use crate::text::fonts::{ResolvedFont, TextStyle};

/// One fragment of a composed line. Unset font or fill inherit the surface's current state.
#[derive(Clone, Debug, PartialEq)]
pub struct StyledRun {
    text: String,
    font: Option<ResolvedFont>,
    fill: Option<Fill>,
}

impl StyledRun {
    /// Run that inherits font and fill.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: None,
            fill: None,
        }
    }

    /// Run drawn with `style`'s font and color.
    pub fn styled(text: impl Into<String>, style: &TextStyle) -> Self {
        Self::new(text)
            .with_font(style.font.clone())
            .with_fill(Fill::Solid(style.fill))
    }

    /// Copy with `font` set.
    pub fn with_font(self, font: ResolvedFont) -> Self {
        Self {
            font: Some(font),
            ..self
        }
    }

    /// Copy with `fill` set.
    pub fn with_fill(self, fill: Fill) -> Self {
        Self {
            fill: Some(fill),
            ..self
        }
    }
}

/// Draw `runs` left to right on baseline `y` from `x`; returns the cursor after the last run.
///
/// Each run is measured after its own font is applied.
pub fn render_line<S: Surface + ?Sized>(
    surface: &mut S,
    x: f64,
    y: f64,
    runs: &[StyledRun],
) -> LaurelResult<f64> {
    let mut cursor = x;
    for run in runs {
        if let Some(font) = &run.font {
            surface.set_font(font)?;
        }
        if let Some(fill) = run.fill {
            surface.set_fill(fill);
        }
        surface.fill_text(&run.text, Point::new(cursor, y))?;
        cursor += surface.measure_text(&run.text)?;
    }
    Ok(cursor)
}

/// Draw `text` once with a top-to-bottom gradient over `y - text_height ..= y`.
pub fn render_gradient_text<S: Surface + ?Sized>(
    surface: &mut S,
    text: &str,
    x: f64,
    y: f64,
    font: &ResolvedFont,
    colors: [Rgba8; 2],
    text_height: f64,
) -> LaurelResult<f64> {
    surface.set_font(font)?;
    surface.set_fill(Fill::VerticalGradient {
        top: colors[0],
        bottom: colors[1],
        y0: y - text_height,
        y1: y,
    });
    surface.fill_text(text, Point::new(x, y))?;
    Ok(x + surface.measure_text(text)?)
}

/// Draw `day`, a raised `suffix`, then `" month, year"`; returns the final cursor.
pub fn render_ordinal_date<S: Surface + ?Sized>(
    surface: &mut S,
    x: f64,
    y: f64,
    date: &OrdinalDate,
    value: &TextStyle,
    superscript: &TextStyle,
    rise: f64,
) -> LaurelResult<f64> {
    let x = render_line(surface, x, y, &[StyledRun::styled(date.day.as_str(), value)])?;
    let x = render_line(
        surface,
        x,
        y - rise,
        &[StyledRun::styled(date.suffix, superscript)],
    )?;
    render_line(surface, x, y, &[StyledRun::styled(date.month_year(), value)])
}

/// Draw `text` one character at a time, adding `spacing` after each; uses the current style.
pub fn render_spaced_text<S: Surface + ?Sized>(
    surface: &mut S,
    text: &str,
    x: f64,
    y: f64,
    spacing: f64,
) -> LaurelResult<f64> {
    let mut cursor = x;
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        let s = ch.encode_utf8(&mut buf);
        surface.fill_text(s, Point::new(cursor, y))?;
        cursor += surface.measure_text(s)? + spacing;
    }
    Ok(cursor)
}

#[cfg(test)]
#[path = "../../tests/unit/text/runs.rs"]
mod tests;
