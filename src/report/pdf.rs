//! PDF layout for a [`ReportDocument`].
//!
//! A simple top-down flow layout: a cursor moves down the page, blocks that
//! do not fit start a new page, and tables repeat their header row after a
//! page break. Text uses the built-in Helvetica faces, so widths are
//! estimated from an average glyph width rather than measured.

use super::{Block, ReportDocument, StyledTable};
use crate::error::{ReportGenerationError, ReportResult};
use crate::theme::{Rgb8, Theme, THEME};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Rect, Rgb,
};
use std::io::BufWriter;
use tracing::debug;

pub const PAGE_WIDTH: f32 = 297.0;
pub const PAGE_HEIGHT: f32 = 210.0;
const PT_TO_MM: f32 = 0.352_778;
/// 30pt on every side.
pub const MARGIN: f32 = 30.0 * PT_TO_MM;
const ROW_HEIGHT: f32 = 6.5;
const CELL_PADDING: f32 = 1.2;
const GRID_THICKNESS: f32 = 0.5;
/// Average Helvetica advance width as a fraction of the font size.
const GLYPH_WIDTH_EM: f32 = 0.52;
const LAYER: &str = "Layer 1";

/// Finished PDF bytes.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

fn color(rgb: Rgb8) -> Color {
    let (r, g, b) = rgb.unit();
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_WIDTH_EM * PT_TO_MM
}

/// Built-in fonts only cover Latin-1; anything else prints as '?'.
fn printable(text: &str) -> String {
    text.chars()
        .map(|c| if (' '..='~').contains(&c) || ('\u{a0}'..='\u{ff}').contains(&c) { c } else { '?' })
        .collect()
}

/// Cut `text` so it fits in `width`, marking the cut with "...".
fn fit(text: &str, size: f32, width: f32) -> String {
    let text = printable(text);
    if text_width(&text, size) <= width {
        return text;
    }
    let per_char = size * GLYPH_WIDTH_EM * PT_TO_MM;
    let keep = ((width / per_char) as usize).saturating_sub(3);
    let mut cut: String = text.chars().take(keep).collect();
    cut.push_str("...");
    cut
}

struct Canvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    theme: &'static Theme,
    /// Top of the free space on the current page, from the page bottom.
    y: f32,
    pages: usize,
}

impl Canvas {
    fn new(title: &str, theme: &'static Theme) -> ReportResult<Self> {
        let (doc, page, layer) = PdfDocument::new(
            printable(title),
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            LAYER.to_string(),
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportGenerationError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportGenerationError::Pdf(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            theme,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
        self.pages += 1;
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y - height < MARGIN {
            self.new_page();
        }
    }

    fn at_page_top(&self) -> bool {
        self.y >= PAGE_HEIGHT - MARGIN
    }

    fn text(&self, text: &str, size: f32, x: f32, baseline: f32, bold: bool, rgb: Rgb8) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.set_fill_color(color(rgb));
        self.layer.use_text(text, size, Mm(x), Mm(baseline), font);
    }

    fn centered_line(&mut self, text: &str, size: f32, bold: bool, rgb: Rgb8) {
        let line = size * PT_TO_MM * 1.2;
        self.ensure_space(line);
        let text = fit(text, size, PAGE_WIDTH - 2.0 * MARGIN);
        let x = (PAGE_WIDTH - text_width(&text, size)) / 2.0;
        self.y -= line;
        self.text(&text, size, x.max(MARGIN), self.y, bold, rgb);
    }

    fn left_line(&mut self, text: &str, size: f32, rgb: Rgb8, space_before: f32, space_after: f32) {
        let line = size * PT_TO_MM * 1.2;
        if !self.at_page_top() {
            self.y -= space_before;
        }
        // Keep a heading together with at least one table row.
        self.ensure_space(line + space_after + 2.0 * ROW_HEIGHT);
        self.y -= line;
        let text = fit(text, size, PAGE_WIDTH - 2.0 * MARGIN);
        self.text(&text, size, MARGIN, self.y, true, rgb);
        self.y -= space_after;
    }

    fn rect(&self, x: f32, top: f32, width: f32, height: f32, fill: Option<Rgb8>) {
        let rect = Rect::new(Mm(x), Mm(top - height), Mm(x + width), Mm(top));
        match fill {
            Some(rgb) => {
                self.layer.set_fill_color(color(rgb));
                self.layer.add_rect(rect.with_mode(PaintMode::Fill));
            }
            None => {
                self.layer.set_outline_color(color(self.theme.grid));
                self.layer.set_outline_thickness(GRID_THICKNESS);
                self.layer.add_rect(rect.with_mode(PaintMode::Stroke));
            }
        }
    }

    fn table_row(&mut self, cells: &[String], widths: &[f32], x0: f32, header: bool, band: usize) {
        let size = self.theme.body_size;
        let (fill, text_rgb) = if header {
            (self.theme.table_header_bg, self.theme.table_header_text)
        } else {
            (self.theme.row_bands[band % 2], self.theme.body_text)
        };
        let top = self.y;
        let total: f32 = widths.iter().sum();
        self.rect(x0, top, total, ROW_HEIGHT, Some(fill));

        let baseline = top - ROW_HEIGHT / 2.0 - size * PT_TO_MM * 0.35;
        let mut x = x0;
        for (cell, width) in cells.iter().zip(widths) {
            let text = fit(cell, size, width - 2.0 * CELL_PADDING);
            let offset = (width - text_width(&text, size)) / 2.0;
            self.text(&text, size, x + offset.max(CELL_PADDING), baseline, header, text_rgb);
            self.rect(x, top, *width, ROW_HEIGHT, None);
            x += width;
        }
        self.y -= ROW_HEIGHT;
    }

    fn table(&mut self, table: &StyledTable) {
        let widths = table.kind.column_widths_mm();
        let total: f32 = widths.iter().sum();
        let x0 = (PAGE_WIDTH - total) / 2.0;

        self.ensure_space(2.0 * ROW_HEIGHT);
        self.table_row(&table.data.headers, &widths, x0, true, 0);
        for (i, row) in table.data.rows.iter().enumerate() {
            if self.y - ROW_HEIGHT < MARGIN {
                self.new_page();
                self.table_row(&table.data.headers, &widths, x0, true, 0);
            }
            self.table_row(row, &widths, x0, false, i);
        }
        debug!(table = %table.data.title, rows = table.data.rows.len(), "table laid out");
    }

    fn block(&mut self, block: &Block) {
        let theme = self.theme;
        match block {
            Block::Title(text) => {
                self.centered_line(text, theme.title_size, true, theme.title);
                self.y -= 8.0;
            }
            Block::Caption(text) => {
                self.centered_line(text, theme.body_size, false, theme.grid);
                self.y -= 6.0;
            }
            Block::Heading(text) => self.left_line(text, theme.heading_size, theme.heading, 7.0, 4.0),
            Block::SubHeading(text) => {
                self.left_line(text, theme.subheading_size, theme.body_text, 2.0, 2.5)
            }
            Block::Table(table) => self.table(table),
            Block::Spacer(height) => {
                if !self.at_page_top() {
                    self.y -= height;
                }
            }
        }
    }

    fn finish(self) -> ReportResult<RenderedReport> {
        let pages = self.pages;
        let mut writer = BufWriter::new(Vec::new());
        self.doc
            .save(&mut writer)
            .map_err(|e| ReportGenerationError::Pdf(e.to_string()))?;
        let bytes = writer
            .into_inner()
            .map_err(|e| ReportGenerationError::Pdf(e.to_string()))?;
        Ok(RenderedReport { bytes, pages })
    }
}

/// Validate every table, then lay out the whole document. Nothing is
/// returned unless every page rendered.
pub fn render(document: &ReportDocument) -> ReportResult<RenderedReport> {
    document.validate()?;
    let mut canvas = Canvas::new(&document.title, &THEME)?;
    for (i, section) in document.sections.iter().enumerate() {
        if section.page_break_before && i > 0 {
            canvas.new_page();
        }
        for block in &section.blocks {
            canvas.block(block);
        }
    }
    canvas.finish()
}
