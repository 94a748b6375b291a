// CSV export: plain header row, every data field quoted

use super::{cell_text, columns};
use crate::errors::ExportError;
use crate::models::ReportRow;
use csv::{QuoteStyle, Terminator, WriterBuilder};

/// Write rows as CSV
///
/// The header row is quoted only where CSV requires it; data fields are
/// always quoted. Records end with `\n`.
pub fn write_csv(rows: &[ReportRow]) -> Result<Vec<u8>, ExportError> {
    let headers = columns(rows);

    let mut header_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    header_writer.write_record(&headers)?;
    let buffer = header_writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.to_string()))?;

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);

    for row in rows {
        let record: Vec<String> = headers.iter().map(|h| cell_text(row, h)).collect();
        writer.write_record(&record)?;
    }

    writer.into_inner().map_err(|e| ExportError::Csv(e.to_string()))
}
