//! Plain-text quotation rendering
//!
//! Produces the on-screen summary: one heading per non-empty phase, one
//! line per item with its formatted cost, disclaimers indented under the
//! items they apply to, then notes and the total line. Output is plain
//! text; the CLI layer decides whether to colour it.

use super::{format_money, Quotation, TITLE};

/// Render the quotation as display text.
pub fn render(quotation: &Quotation, currency: &str) -> String {
    let mut out = String::new();

    out.push_str(TITLE);
    out.push('\n');

    if let Some(patient) = &quotation.patient {
        out.push_str(&format!("Patient: {patient}\n"));
    }
    if let Some(clinician) = &quotation.clinician {
        out.push_str(&format!("Clinician: {clinician}\n"));
    }
    if let Some(date) = quotation.date {
        out.push_str(&format!("Date: {date}\n"));
    }

    for section in &quotation.sections {
        out.push('\n');
        out.push_str(&section.heading());
        out.push('\n');

        for item in &section.items {
            out.push_str(&format!(
                "  {} - {} - {}\n",
                item.site_description,
                item.treatment,
                format_money(currency, item.cost)
            ));
            if let Some(disclaimer) = &item.disclaimer {
                out.push_str(&format!("    * {disclaimer}\n"));
            }
        }
    }

    if !quotation.notes.is_empty() {
        out.push_str("\nNotes:\n");
        for line in quotation.notes.lines() {
            out.push_str(&format!("  {line}\n"));
        }
    }

    out.push_str(&format!(
        "\nTotal Cost: {}\n",
        format_money(currency, quotation.total)
    ));

    out
}
