use serde::{Deserialize, Serialize};

use crate::foundation::core::{Point, Rect, Size};

/// Tuning for the sponsor block layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoLayoutParams {
    /// Height cap for row layouts.
    pub max_logo_height: f64,
    /// A set of logos all at most this wide is laid out in a single row.
    pub small_threshold: f64,
    /// Horizontal gap between logos, and vertical gap between grid rows.
    pub spacing: f64,
    /// Width cap when exactly one large logo is shown.
    pub single_max_width: f64,
    /// Target height for the three-logo grid.
    pub grid_row_height: f64,
}

impl Default for LogoLayoutParams {
    fn default() -> Self {
        Self {
            max_logo_height: 120.0,
            small_threshold: 80.0,
            spacing: 20.0,
            single_max_width: 140.0,
            grid_row_height: 85.0,
        }
    }
}

/// Where one logo lands, relative to the sponsor block origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogoPlacement {
    /// Index into the input slice.
    pub index: usize,
    /// Top-left corner.
    pub origin: Point,
    /// Drawn size.
    pub size: Size,
    /// Uniform scale applied to the intrinsic size, always `<= 1`.
    pub scale: f64,
}

impl LogoPlacement {
    /// Destination rectangle after offsetting by the block origin.
    pub fn rect_at(&self, block_origin: Point) -> Rect {
        Rect::from_origin_size(
            Point::new(block_origin.x + self.origin.x, block_origin.y + self.origin.y),
            self.size,
        )
    }
}

/// Lay out logos given their intrinsic sizes.
///
/// Inputs beyond the third are ignored: more than three logos use the three-logo grid.
pub fn layout_logos(sizes: &[Size], params: &LogoLayoutParams) -> Vec<LogoPlacement> {
    if sizes.is_empty() {
        return Vec::new();
    }

    let all_small = sizes.iter().all(|s| s.width <= params.small_threshold);
    if all_small && sizes.len() <= 3 {
        return row(sizes, params.max_logo_height, params.spacing);
    }

    match sizes.len() {
        1 => {
            let s = sizes[0];
            let scale = clamp_scale(
                (params.max_logo_height / s.height).min(params.single_max_width / s.width),
            );
            vec![place(0, Point::ZERO, s, scale)]
        }
        2 => row(sizes, params.max_logo_height, params.spacing),
        _ => {
            let mut out = row(&sizes[..2], params.grid_row_height, params.spacing);
            let s = sizes[2];
            let scale = clamp_scale(params.grid_row_height / s.height);
            out.push(place(
                2,
                Point::new(0.0, params.grid_row_height + params.spacing),
                s,
                scale,
            ));
            out
        }
    }
}

fn row(sizes: &[Size], max_height: f64, spacing: f64) -> Vec<LogoPlacement> {
    let mut x = 0.0;
    sizes
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let p = place(i, Point::new(x, 0.0), s, clamp_scale(max_height / s.height));
            x += p.size.width + spacing;
            p
        })
        .collect()
}

fn place(index: usize, origin: Point, intrinsic: Size, scale: f64) -> LogoPlacement {
    LogoPlacement {
        index,
        origin,
        size: Size::new(intrinsic.width * scale, intrinsic.height * scale),
        scale,
    }
}

fn clamp_scale(s: f64) -> f64 {
    if s.is_nan() { 1.0 } else { s.min(1.0) }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/logos.rs"]
mod tests;
