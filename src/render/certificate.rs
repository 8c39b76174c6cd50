use std::sync::Arc;

use crate::assets::store::RasterImage;
use crate::data::records::ParticipantRecord;
use crate::foundation::core::Point;
use crate::foundation::diagnostic::{Diagnostic, DiagnosticKind};
use crate::foundation::error::LaurelResult;
use crate::layout::cursor::{CertificatePlan, LayoutConfig};
use crate::layout::logos::{LogoLayoutParams, layout_logos};
use crate::render::surface::{Fill, Surface};
use crate::template::registry::TemplateConfig;
use crate::text::date::OrdinalDate;
use crate::text::fonts::{TextStyle, TextStyles};
use crate::text::runs::{
    StyledRun, render_gradient_text, render_line, render_ordinal_date, render_spaced_text,
};

/// Everything that varies per certificate.
#[derive(Clone, Copy, Debug)]
pub struct CertificateContent<'a> {
    /// Participant being certified.
    pub record: &'a ParticipantRecord,
    /// Resolved category template.
    pub template: &'a TemplateConfig,
    /// Decoded sponsor logos for the record's event, in priority order.
    pub logos: &'a [Arc<RasterImage>],
    /// Generated certificate ID.
    pub cert_id: &'a str,
}

/// Fixed, per-run drawing configuration.
#[derive(Clone, Copy, Debug)]
pub struct CertificateComposer<'a> {
    /// Pixel offsets.
    pub layout: &'a LayoutConfig,
    /// Sponsor block tuning.
    pub logo_params: &'a LogoLayoutParams,
    /// Resolved text styles.
    pub styles: &'a TextStyles,
}

impl CertificateComposer<'_> {
    /// Draw one certificate onto a surface that already holds the template background.
    ///
    /// Returns diagnostics for date fields that were present but unreadable.
    pub fn compose<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        content: &CertificateContent<'_>,
    ) -> LaurelResult<Vec<Diagnostic>> {
        let layout = self.layout;
        let styles = self.styles;
        let record = content.record;
        let template = content.template;
        let x = layout.text_start_x;
        let plan = CertificatePlan::compute(layout, record.middle_name.is_some());
        let mut diagnostics = Vec::new();

        self.draw_sponsor_block(surface, content.logos)?;

        render_gradient_text(
            surface,
            &template.header_text,
            x,
            plan.header_y,
            &styles.header_title.font,
            template.header_gradient,
            layout.header_text_height,
        )?;

        surface.set_font(&styles.certificate.font)?;
        surface.set_fill(Fill::Solid(styles.certificate.fill));
        render_spaced_text(
            surface,
            "CERTIFICATE",
            x,
            plan.certificate_y,
            layout.certificate_letter_spacing,
        )?;

        render_line(
            surface,
            x,
            plan.certify_label_y,
            &[StyledRun::styled("This is to certify", &styles.certify_label)],
        )?;

        let names = std::iter::once(record.first_name.as_str())
            .chain(record.middle_name.as_deref())
            .chain(std::iter::once(record.last_name.as_str()));
        for (name, &y) in names.zip(plan.name_ys.iter()) {
            render_line(surface, x, y, &[StyledRun::styled(name, &styles.name)])?;
        }

        let [category_y, event_y, org_y, assoc_y, from_y, to_y] = plan.body_ys;
        render_line(surface, x, category_y, &category_line(record, template, styles))?;
        render_line(
            surface,
            x,
            event_y,
            &labelled("at the ", &record.event_name, styles),
        )?;
        render_line(
            surface,
            x,
            org_y,
            &labelled("organised by ", &record.organization, styles),
        )?;
        render_line(
            surface,
            x,
            assoc_y,
            &labelled("under the aegis of ", &record.association, styles),
        )?;

        for (label, raw, y) in [
            ("from ", &record.start_date, from_y),
            ("to ", &record.end_date, to_y),
        ] {
            match OrdinalDate::parse(raw) {
                Some(date) => {
                    let after = render_line(
                        surface,
                        x,
                        y,
                        &[StyledRun::styled(label, &styles.body_label)],
                    )?;
                    render_ordinal_date(
                        surface,
                        after,
                        y,
                        &date,
                        &styles.body_value,
                        &styles.superscript,
                        layout.superscript_rise,
                    )?;
                }
                None if !raw.trim().is_empty() => diagnostics.push(Diagnostic::warn(
                    DiagnosticKind::DateFormat,
                    Some(record.source_line),
                    format!("unreadable date '{raw}' left blank"),
                )),
                None => {}
            }
        }

        render_line(
            surface,
            x,
            plan.id_y,
            &[StyledRun::styled(
                format!("Certificate ID: {}", content.cert_id),
                &styles.cert_id,
            )],
        )?;

        Ok(diagnostics)
    }

    fn draw_sponsor_block<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        logos: &[Arc<RasterImage>],
    ) -> LaurelResult<()> {
        let sizes: Vec<_> = logos.iter().map(|l| l.size()).collect();
        let origin: Point = self.layout.sponsor_origin;
        for placement in layout_logos(&sizes, self.logo_params) {
            surface.draw_image(&logos[placement.index], placement.rect_at(origin))?;
        }
        Ok(())
    }
}

/// First body line: the rank for winner templates, participation (and role) otherwise.
pub fn category_line(
    record: &ParticipantRecord,
    template: &TemplateConfig,
    styles: &TextStyles,
) -> Vec<StyledRun> {
    let accent = TextStyle {
        font: styles.accent_value.font.clone(),
        fill: template.accent_color,
    };
    let mut runs = if template.is_winner {
        vec![
            StyledRun::styled("for winning ", &styles.body_label),
            StyledRun::styled(template.rank_text.as_str(), &accent),
        ]
    } else {
        vec![
            StyledRun::styled("for ", &styles.body_label),
            StyledRun::styled("participating", &accent),
        ]
    };
    runs.push(StyledRun::styled(" in ", &styles.body_label));
    runs.push(StyledRun::styled(record.sport.as_str(), &styles.body_value));
    if !template.is_winner
        && let Some(role) = &record.role
    {
        runs.push(StyledRun::styled(" as ", &styles.body_label));
        runs.push(StyledRun::styled(role.as_str(), &styles.body_value));
    }
    runs
}

fn labelled(label: &str, value: &str, styles: &TextStyles) -> Vec<StyledRun> {
    vec![
        StyledRun::styled(label, &styles.body_label),
        StyledRun::styled(value, &styles.body_value),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/render/certificate.rs"]
mod tests;
