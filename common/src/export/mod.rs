// Export writers for fetched report data
// All writers work on rows already held in memory; none of them queries the database.

mod csv;
mod excel;
mod filename;
mod pdf;

use crate::errors::ExportError;
use crate::models::ReportRow;
use chrono::NaiveDate;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, instrument, warn};

pub use self::csv::write_csv;
pub use self::excel::write_xlsx;
pub use self::filename::{export_filename, sanitize_report_name};
pub use self::pdf::{write_pdf, LogoImage, PdfLayout};

/// Supported export file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("Unsupported export format: {}", other)),
        }
    }
}

/// A fetched report ready to be exported
#[derive(Debug, Clone)]
pub struct ReportDocument<'a> {
    pub title: &'a str,
    pub rows: &'a [ReportRow],
    pub generated_on: NaiveDate,
    pub logo_text: &'a str,
    /// Drawn instead of the `logo_text` badge when present
    pub logo_image: Option<&'a LogoImage>,
}

/// Logo drawn in the PDF page header
#[derive(Debug, Clone, Default)]
pub struct Branding {
    pub logo_text: String,
    pub logo_image: Option<LogoImage>,
}

impl Branding {
    pub fn text(logo_text: impl Into<String>) -> Self {
        Self {
            logo_text: logo_text.into(),
            logo_image: None,
        }
    }

    /// Load the logo image if one is configured. A missing or undecodable
    /// file only drops the image; exports fall back to the text badge.
    pub fn load(logo_text: &str, logo_path: Option<&Path>) -> Self {
        let logo_image = logo_path.and_then(|path| {
            let decoded = std::fs::read(path)
                .map_err(ExportError::from)
                .and_then(|bytes| LogoImage::decode(&bytes));
            match decoded {
                Ok(image) => Some(image),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Logo not loaded, using text badge");
                    None
                }
            }
        });

        Self {
            logo_text: logo_text.to_string(),
            logo_image,
        }
    }

    /// Document over `rows` carrying this logo
    pub fn document<'a>(
        &'a self,
        title: &'a str,
        rows: &'a [ReportRow],
        generated_on: NaiveDate,
    ) -> ReportDocument<'a> {
        ReportDocument {
            title,
            rows,
            generated_on,
            logo_text: &self.logo_text,
            logo_image: self.logo_image.as_ref(),
        }
    }
}

/// Column names of a dataset: the keys of its first record
pub fn columns(rows: &[ReportRow]) -> Vec<&str> {
    rows.first()
        .map(|row| row.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

/// Display text of one cell; missing keys and nulls are empty
pub fn cell_text(row: &ReportRow, column: &str) -> String {
    match row.get(column) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

fn is_empty_cell(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Columns of the first record that hold a non-empty value in at least one row
pub fn non_empty_columns(rows: &[ReportRow]) -> Vec<&str> {
    columns(rows)
        .into_iter()
        .filter(|column| rows.iter().any(|row| !is_empty_cell(row.get(*column))))
        .collect()
}

/// Render a document in the given format
#[instrument(skip(document), fields(title = document.title, rows = document.rows.len()))]
pub fn render(format: ExportFormat, document: &ReportDocument<'_>) -> Result<Vec<u8>, ExportError> {
    if document.rows.is_empty() {
        return Err(ExportError::EmptyDataset);
    }

    match format {
        ExportFormat::Csv => write_csv(document.rows),
        ExportFormat::Xlsx => write_xlsx(document.rows),
        ExportFormat::Pdf => write_pdf(document, &PdfLayout::default()),
    }
}

/// Render a document and save it under `dir` with the given file name
pub fn save_to_dir(
    format: ExportFormat,
    document: &ReportDocument<'_>,
    dir: &Path,
    file_name: &str,
) -> Result<PathBuf, ExportError> {
    let bytes = render(format, document)?;
    std::fs::create_dir_all(dir)?;

    let path = dir.join(file_name);
    std::fs::write(&path, &bytes)?;

    info!(path = %path.display(), size = bytes.len(), format = %format, "Export written");
    Ok(path)
}
