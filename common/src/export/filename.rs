// Deterministic export file names

use super::ExportFormat;
use crate::models::ExecutionDate;

/// Replace every character that is not an ASCII letter or digit with `_`
pub fn sanitize_report_name(report_name: &str) -> String {
    report_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// `{report}-{execution id}-{date}.{ext}`
///
/// The execution id is cut at its first space and the date is the date token
/// of the selected label.
pub fn export_filename(
    report_name: &str,
    execution_id: &str,
    date_label: &str,
    format: ExportFormat,
) -> String {
    let id = execution_id.split(' ').next().unwrap_or_default();
    format!(
        "{}-{}-{}.{}",
        sanitize_report_name(report_name),
        id,
        ExecutionDate::date_token(date_label),
        format.extension()
    )
}
