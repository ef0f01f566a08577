//! Paginated PDF table rendering.
//!
//! Layout is computed first ([`layout`]) so the page count is known before
//! drawing and every page can carry a `Page n/N` footer.

use std::io::BufWriter;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, Greyscale, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Polygon,
};

use crate::table::{Report, Table};

use super::ExportError;

pub const LINE_HEIGHT: f32 = 6.0;
const MARGIN: f32 = 12.0;
const CELL_PADDING: f32 = 1.5;
const FONT_SIZE: f32 = 9.0;
const TITLE_SIZE: f32 = 14.0;
/// Title and date range block above the first table header.
const PREAMBLE: f32 = 16.0;
const FOOTER: f32 = 10.0;
const MIN_COLUMN_WIDTH: f32 = 28.0;
/// Average Helvetica glyph width, as a fraction of the font size.
const GLYPH_RATIO: f32 = 0.5;
const PT_TO_MM: f32 = 0.3528;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const A4_PORTRAIT: PageSize = PageSize { width: 210.0, height: 297.0 };
    pub const A4_LANDSCAPE: PageSize = PageSize { width: 297.0, height: 210.0 };

    /// Landscape once the columns no longer fit portrait at their minimum width.
    pub fn for_columns(columns: usize) -> Self {
        let usable = Self::A4_PORTRAIT.width - 2.0 * MARGIN;
        if columns as f32 * MIN_COLUMN_WIDTH > usable {
            Self::A4_LANDSCAPE
        } else {
            Self::A4_PORTRAIT
        }
    }

    fn usable_width(&self) -> f32 {
        self.width - 2.0 * MARGIN
    }
}

/// Greedy word wrap to at most `max_chars` per line; over-long words are split.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if current.is_empty() { word.len() } else { current.chars().count() + 1 + word.len() };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.extend(word);
        }
        lines.push(current);
    }
    lines
}

/// A table row as drawn: wrapped lines per cell and the common row height.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutRow {
    pub cells: Vec<Vec<String>>,
    pub height: f32,
}

impl LaidOutRow {
    fn new(texts: impl IntoIterator<Item = String>, max_chars: usize) -> Self {
        let cells: Vec<Vec<String>> = texts.into_iter().map(|t| wrap(&t, max_chars)).collect();
        let lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
        Self { cells, height: lines as f32 * LINE_HEIGHT }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub page: PageSize,
    pub column_width: f32,
    pub header: LaidOutRow,
    /// Row indices per page.
    pub pages: Vec<Vec<usize>>,
    pub rows: Vec<LaidOutRow>,
}

pub fn layout(table: &Table) -> Layout {
    let columns = table.columns.len().max(1);
    let page = PageSize::for_columns(columns);
    let column_width = page.usable_width() / columns as f32;
    let glyph = FONT_SIZE * GLYPH_RATIO * PT_TO_MM;
    let max_chars = ((column_width - 2.0 * CELL_PADDING) / glyph).floor() as usize;

    let header = LaidOutRow::new(table.columns.iter().cloned(), max_chars);
    let rows: Vec<LaidOutRow> = table
        .rows
        .iter()
        .map(|r| LaidOutRow::new(r.iter().map(|c| c.display()), max_chars))
        .collect();

    let top = page.height - MARGIN;
    let bottom = MARGIN + FOOTER;
    let mut pages = vec![Vec::new()];
    let mut y = top - PREAMBLE - header.height;
    for (i, row) in rows.iter().enumerate() {
        let current_empty = pages.last().is_none_or(Vec::is_empty);
        if y - row.height < bottom && !current_empty {
            pages.push(Vec::new());
            y = top - header.height;
        }
        if let Some(current) = pages.last_mut() {
            current.push(i);
        }
        y -= row.height;
    }

    Layout { page, column_width, header, pages, rows }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn rule(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32) {
    layer.add_line(Line {
        points: vec![(Point::new(Mm(x1), Mm(y)), false), (Point::new(Mm(x2), Mm(y)), false)],
        is_closed: false,
    });
}

fn shade(layer: &PdfLayerReference, x1: f32, x2: f32, y_top: f32, height: f32) {
    layer.set_fill_color(Color::Greyscale(Greyscale::new(0.85, None)));
    layer.add_polygon(Polygon {
        rings: vec![vec![
            (Point::new(Mm(x1), Mm(y_top)), false),
            (Point::new(Mm(x2), Mm(y_top)), false),
            (Point::new(Mm(x2), Mm(y_top - height)), false),
            (Point::new(Mm(x1), Mm(y_top - height)), false),
        ]],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(Color::Greyscale(Greyscale::new(0.0, None)));
}

/// Draws a row with its top edge at `y`; every cell shares the row height.
fn draw_row(layer: &PdfLayerReference, font: &IndirectFontRef, row: &LaidOutRow, column_width: f32, y: f32) {
    for (col, lines) in row.cells.iter().enumerate() {
        let x = MARGIN + col as f32 * column_width + CELL_PADDING;
        for (n, line) in lines.iter().enumerate() {
            let baseline = y - (n as f32 + 1.0) * LINE_HEIGHT + 1.8;
            layer.use_text(line.as_str(), FONT_SIZE, Mm(x), Mm(baseline), font);
        }
    }
}

fn draw_header(layer: &PdfLayerReference, fonts: &Fonts, layout: &Layout, y: f32) -> f32 {
    let right = layout.page.width - MARGIN;
    shade(layer, MARGIN, right, y, layout.header.height);
    draw_row(layer, &fonts.bold, &layout.header, layout.column_width, y);
    let y = y - layout.header.height;
    rule(layer, MARGIN, right, y);
    y
}

pub fn render(report: &Report) -> Result<Vec<u8>, ExportError> {
    let layout = layout(&report.table);
    let PageSize { width, height } = layout.page;
    let title = report.report_type.title();

    let (doc, first_page, first_layer) = PdfDocument::new(title.as_str(), Mm(width), Mm(height), "Layer 1");
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(|e| ExportError::Pdf(e.to_string()))?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(|e| ExportError::Pdf(e.to_string()))?,
    };

    let total = layout.pages.len();
    for (index, rows) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(width), Mm(height), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };
        layer.set_outline_thickness(0.3);

        let mut y = height - MARGIN;
        if index == 0 {
            layer.use_text(title.as_str(), TITLE_SIZE, Mm(MARGIN), Mm(y - 6.0), &fonts.bold);
            let range = format!(
                "Date Range: {} - {}",
                report.range.start().format("%d %b %Y"),
                report.range.end().format("%d %b %Y")
            );
            layer.use_text(range.as_str(), FONT_SIZE + 1.0, Mm(MARGIN), Mm(y - 12.0), &fonts.regular);
            y -= PREAMBLE;
        }

        y = draw_header(&layer, &fonts, &layout, y);
        for &i in rows {
            let row = &layout.rows[i];
            draw_row(&layer, &fonts.regular, row, layout.column_width, y);
            y -= row.height;
            rule(&layer, MARGIN, width - MARGIN, y);
        }

        let footer = format!("Page {}/{}", index + 1, total);
        layer.use_text(footer.as_str(), FONT_SIZE, Mm(width / 2.0 - 8.0), Mm(MARGIN / 2.0 + 2.0), &fonts.regular);
    }

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer).map_err(|e| ExportError::Pdf(e.to_string()))?;
    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}
