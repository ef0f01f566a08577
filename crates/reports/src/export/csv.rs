use crate::table::Table;

use super::ExportError;

pub(super) fn render(table: &Table) -> Result<Vec<u8>, ExportError> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|c| c.display()))?;
    }
    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}
