use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::foundation::core::Point;

/// Fixed pixel offsets for one canvas resolution (1080x1920 templates by default).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Left margin shared by every text line.
    pub text_start_x: f64,
    /// Baseline of the gradient header word.
    pub header_title_y: f64,
    /// Baseline of the letter-spaced "CERTIFICATE" line.
    pub certificate_y: f64,
    /// Baseline of "This is to certify".
    pub certify_label_y: f64,
    /// Baseline of the first name line.
    pub first_name_y: f64,
    /// Distance between name lines.
    pub name_line_height: f64,
    /// Extra gap between the last name and the first body line.
    pub body_start_gap: f64,
    /// Distance between body lines.
    pub body_line_height: f64,
    /// Distance from the last body line to the certificate ID.
    pub cert_id_gap: f64,
    /// Top-left corner of the sponsor block.
    pub sponsor_origin: Point,
    /// Height of the header gradient box, ending at the header baseline.
    pub header_text_height: f64,
    /// Extra advance after each "CERTIFICATE" letter.
    pub certificate_letter_spacing: f64,
    /// Upward shift of ordinal suffixes.
    pub superscript_rise: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            text_start_x: 57.0,
            header_title_y: 550.0,
            certificate_y: 618.0,
            certify_label_y: 693.0,
            first_name_y: 726.0,
            name_line_height: 33.0,
            body_start_gap: 8.0,
            body_line_height: 27.0,
            cert_id_gap: 45.0,
            sponsor_origin: Point::new(45.0, 35.0),
            header_text_height: 32.0,
            certificate_letter_spacing: 2.0,
            superscript_rise: 5.0,
        }
    }
}

/// Named vertical sections of a certificate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    /// Gradient header word.
    Header,
    /// "CERTIFICATE".
    Certificate,
    /// "This is to certify".
    CertifyLabel,
    /// Name lines.
    Names,
}

/// Vertical baseline cursor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineCursor {
    y: f64,
    line_height: f64,
}

impl LineCursor {
    /// Cursor at an explicit baseline.
    pub fn new(y: f64, line_height: f64) -> Self {
        Self { y, line_height }
    }

    /// Cursor at the start of `section`, stepping by that section's line height.
    pub fn at(section: Section, cfg: &LayoutConfig) -> Self {
        match section {
            Section::Header => Self::new(cfg.header_title_y, 0.0),
            Section::Certificate => Self::new(cfg.certificate_y, 0.0),
            Section::CertifyLabel => Self::new(cfg.certify_label_y, 0.0),
            Section::Names => Self::new(cfg.first_name_y, cfg.name_line_height),
        }
    }

    /// Current baseline.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Return the current baseline and step one line down.
    pub fn advance(&mut self) -> f64 {
        let y = self.y;
        self.y += self.line_height;
        y
    }

    /// Shift by an arbitrary gap without emitting a line.
    pub fn skip(&mut self, gap: f64) {
        self.y += gap;
    }

    /// Keep the position and switch to a new line height.
    pub fn with_line_height(self, line_height: f64) -> Self {
        Self {
            y: self.y,
            line_height,
        }
    }
}

/// Number of body lines below the name block.
pub const BODY_LINES: usize = 6;

/// Every baseline used to compose one certificate.
#[derive(Clone, Debug, PartialEq)]
pub struct CertificatePlan {
    /// Header word baseline.
    pub header_y: f64,
    /// "CERTIFICATE" baseline.
    pub certificate_y: f64,
    /// "This is to certify" baseline.
    pub certify_label_y: f64,
    /// Two or three name baselines.
    pub name_ys: SmallVec<[f64; 3]>,
    /// Body baselines: category, event, organizer, association, from, to.
    pub body_ys: [f64; BODY_LINES],
    /// Certificate ID baseline.
    pub id_y: f64,
}

impl CertificatePlan {
    /// Walk the sections for a record with or without a middle name.
    pub fn compute(cfg: &LayoutConfig, has_middle_name: bool) -> Self {
        let mut names = LineCursor::at(Section::Names, cfg);
        let name_count = if has_middle_name { 3 } else { 2 };
        let name_ys: SmallVec<[f64; 3]> = (0..name_count).map(|_| names.advance()).collect();
        names.skip(cfg.body_start_gap);

        let mut body = names.with_line_height(cfg.body_line_height);
        let mut body_ys = [0.0; BODY_LINES];
        for slot in &mut body_ys {
            *slot = body.y();
            body.advance();
        }
        let id_y = body_ys[BODY_LINES - 1] + cfg.cert_id_gap;

        Self {
            header_y: LineCursor::at(Section::Header, cfg).y(),
            certificate_y: LineCursor::at(Section::Certificate, cfg).y(),
            certify_label_y: LineCursor::at(Section::CertifyLabel, cfg).y(),
            name_ys,
            body_ys,
            id_y,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/cursor.rs"]
mod tests;
