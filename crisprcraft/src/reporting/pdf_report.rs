use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use tracing::info;

use crate::analysis::summary::RunSummary;

pub const SUMMARY_FILE: &str = "grna_summary.pdf";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const LINE_SPACING: f32 = 8.0;

/// Single A4 page: title, then one line per summary entry.
pub fn write_summary_pdf(summary: &RunSummary, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(SUMMARY_FILE);

    let (doc, page, layer) = PdfDocument::new(
        "CRISPRCraft gRNA summary",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Summary",
    );
    let title_font = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let body_font = doc.add_builtin_font(BuiltinFont::Courier)?;
    let layer = doc.get_page(page).get_layer(layer);

    let mut y = PAGE_HEIGHT - MARGIN;
    layer.use_text("CRISPRCraft gRNA Design Summary", 18.0, Mm(MARGIN), Mm(y), &title_font);
    y -= LINE_SPACING * 2.0;

    for line in summary.lines() {
        layer.use_text(line, 11.0, Mm(MARGIN), Mm(y), &body_font);
        y -= LINE_SPACING;
    }

    if summary.efficiency_source.is_fallback() {
        y -= LINE_SPACING;
        layer.use_text(
            "Note: efficiency values are random placeholders, not model predictions.",
            10.0,
            Mm(MARGIN),
            Mm(y),
            &title_font,
        );
    }

    let file = File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    doc.save(&mut BufWriter::new(file))
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Summary PDF saved to {}", path.display());
    Ok(path)
}
