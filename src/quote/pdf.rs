//! PDF quotation export
//!
//! Renders the same grouped content as the text target into an A4 document
//! using `printpdf` builtin fonts, returning the finished byte buffer. The
//! caller decides where the bytes go.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use std::io::BufWriter;
use thiserror::Error;

use super::{format_money, Quotation, TITLE};

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN_LEFT: Mm = Mm(20.0);
const TOP_Y: Mm = Mm(280.0);
const BOTTOM_Y: Mm = Mm(25.0);

/// Error producing the PDF byte buffer
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to load PDF font: {0}")]
    Font(String),

    #[error("failed to write PDF: {0}")]
    Write(String),
}

struct Cursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    y: Mm,
}

impl Cursor {
    /// Write one line and advance, breaking to a new page when the bottom
    /// margin is reached
    fn line(&mut self, text: &str, size: f32, indent: Mm, font: &IndirectFontRef, leading: Mm) {
        if self.y < BOTTOM_Y {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP_Y;
        }
        self.layer.use_text(text, size, indent, self.y, font);
        self.y -= leading;
    }

    fn gap(&mut self, amount: Mm) {
        self.y -= amount;
    }
}

/// Render the quotation to PDF bytes.
pub fn render(quotation: &Quotation, currency: &str) -> Result<Vec<u8>, PdfError> {
    let (doc, page, layer) = PdfDocument::new(TITLE, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let first_layer = doc.get_page(page).get_layer(layer);

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| PdfError::Font(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| PdfError::Font(e.to_string()))?;

    let mut cursor = Cursor {
        doc,
        layer: first_layer,
        y: TOP_Y,
    };

    cursor.line(TITLE, 16.0, MARGIN_LEFT, &bold, Mm(8.0));

    if let Some(practice) = &quotation.practice {
        cursor.line(practice, 11.0, MARGIN_LEFT, &font, Mm(6.0));
    }
    if let Some(patient) = &quotation.patient {
        cursor.line(&format!("Patient: {patient}"), 10.0, MARGIN_LEFT, &font, Mm(5.0));
    }
    if let Some(clinician) = &quotation.clinician {
        cursor.line(&format!("Clinician: {clinician}"), 10.0, MARGIN_LEFT, &font, Mm(5.0));
    }
    if let Some(date) = quotation.date {
        cursor.line(&format!("Date: {date}"), 10.0, MARGIN_LEFT, &font, Mm(5.0));
    }
    cursor.gap(Mm(4.0));

    for section in &quotation.sections {
        cursor.line(&section.heading(), 12.0, MARGIN_LEFT, &bold, Mm(6.5));

        for item in &section.items {
            let entry = format!(
                "{} - {} - {}",
                item.site_description,
                item.treatment,
                format_money(currency, item.cost)
            );
            cursor.line(&entry, 10.0, Mm(25.0), &font, Mm(5.0));

            if let Some(disclaimer) = &item.disclaimer {
                for wrapped in wrap_text(disclaimer, 86) {
                    cursor.line(&wrapped, 8.0, Mm(30.0), &font, Mm(4.0));
                }
            }
        }
        cursor.gap(Mm(4.0));
    }

    if !quotation.notes.is_empty() {
        cursor.line("Notes:", 12.0, MARGIN_LEFT, &bold, Mm(6.0));
        for line in quotation.notes.lines() {
            for wrapped in wrap_text(line, 90) {
                cursor.line(&wrapped, 10.0, Mm(25.0), &font, Mm(5.0));
            }
        }
        cursor.gap(Mm(4.0));
    }

    cursor.line(
        &format!("Total Cost: {}", format_money(currency, quotation.total)),
        13.0,
        MARGIN_LEFT,
        &bold,
        Mm(6.0),
    );

    let mut buf = BufWriter::new(Vec::new());
    cursor
        .doc
        .save(&mut buf)
        .map_err(|e| PdfError::Write(e.to_string()))?;
    buf.into_inner().map_err(|e| PdfError::Write(e.to_string()))
}

/// Wrap text at word boundaries to a maximum character width
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{PhasePlan, SiteSelection, TreatmentPlan, TreatmentStep};

    #[test]
    fn test_wrap_text() {
        let wrapped = wrap_text("one two three four five", 9);
        assert_eq!(wrapped, vec!["one two", "three", "four five"]);
        assert_eq!(wrap_text("short", 80), vec!["short"]);
        assert!(wrap_text("", 80).is_empty());
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let mut plan = TreatmentPlan {
            patient: Some("Test Patient".to_string()),
            notes: "Estimate valid for 90 days.".to_string(),
            ..Default::default()
        };
        plan.sites.insert(
            "UR6".parse().unwrap(),
            SiteSelection {
                restoration: Some(PhasePlan {
                    step: TreatmentStep {
                        treatment: Some("Implant".to_string()),
                        minutes: 60,
                        lab_fee: 50.0,
                    },
                    second: None,
                }),
                ..Default::default()
            },
        );

        let bytes = render(&Quotation::build(&plan), "£").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_render_empty_plan_still_produces_document() {
        let bytes = render(&Quotation::build(&TreatmentPlan::default()), "£").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
