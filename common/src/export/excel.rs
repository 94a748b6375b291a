// Excel export: one worksheet named "Reporte"

use super::columns;
use crate::errors::ExportError;
use crate::models::ReportRow;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde_json::Value;

const SHEET_NAME: &str = "Reporte";
const MAX_COLUMN_WIDTH: f64 = 60.0;

/// Write rows as an XLSX workbook
pub fn write_xlsx(rows: &[ReportRow]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    write_sheet(worksheet, rows)?;

    Ok(workbook.save_to_buffer()?)
}

fn write_sheet(worksheet: &mut Worksheet, rows: &[ReportRow]) -> Result<(), ExportError> {
    let headers = columns(rows);
    let header_format = Format::new().set_bold();
    let blank = Format::new();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();

    for (col_idx, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col_idx as u16, *header, &header_format)?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let row_num = row_idx as u32 + 1;

        for (col_idx, header) in headers.iter().enumerate() {
            let col_num = col_idx as u16;

            let written = match row.get(*header) {
                Some(Value::Number(n)) => {
                    if let Some(f) = n.as_f64() {
                        worksheet.write_number(row_num, col_num, f)?;
                    }
                    n.to_string()
                }
                Some(Value::String(s)) => {
                    worksheet.write_string(row_num, col_num, s)?;
                    s.clone()
                }
                Some(Value::Bool(b)) => {
                    worksheet.write_boolean(row_num, col_num, *b)?;
                    b.to_string()
                }
                None | Some(Value::Null) => {
                    worksheet.write_blank(row_num, col_num, &blank)?;
                    String::new()
                }
                Some(other) => {
                    let text = other.to_string();
                    worksheet.write_string(row_num, col_num, &text)?;
                    text
                }
            };

            widths[col_idx] = widths[col_idx].max(written.chars().count());
        }
    }

    for (col_idx, width) in widths.iter().enumerate() {
        worksheet.set_column_width(col_idx as u16, (*width as f64 + 2.0).min(MAX_COLUMN_WIDTH))?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    Ok(())
}
