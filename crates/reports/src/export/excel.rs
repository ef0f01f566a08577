use rust_xlsxwriter::{Format, Workbook};

use crate::table::{Cell, Table};

use super::ExportError;

const SHEET: &str = "Report";
const COLUMN_WIDTH: f64 = 22.0;

pub(super) fn render(table: &Table) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let money = Format::new().set_num_format("0.00");

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET)?;
    for (col, title) in table.columns.iter().enumerate() {
        let col = col as u16;
        sheet.set_column_width(col, COLUMN_WIDTH)?;
        sheet.write_string_with_format(0, col, title, &bold)?;
    }
    for (r, row) in table.rows.iter().enumerate() {
        let r = r as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(s) => sheet.write_string(r, col, s)?,
                Cell::Count(n) => sheet.write_number(r, col, *n as f64)?,
                Cell::Money(m) => sheet.write_number_with_format(r, col, *m as f64 / 100.0, &money)?,
            };
        }
    }
    Ok(workbook.save_to_buffer()?)
}
