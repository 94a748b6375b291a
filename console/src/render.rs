// HTML rendering of the result area

use common::export::{cell_text, columns};
use common::models::ReportRow;
use tera::{Context, Tera};

use crate::errors::ConsoleError;
use crate::messages;

const REPORT_TABLE: &str = r#"<div class="report-card">
  <h2 class="report-title">{{ title }}</h2>
{% if headers | length == 0 %}  <p class="no-data">{{ no_data }}</p>
{% else %}  <table class="report-table">
    <thead>
      <tr>{% for header in headers %}<th>{{ header }}</th>{% endfor %}</tr>
    </thead>
    <tbody>
{% for row in rows %}      <tr>{% for cell in row %}<td>{{ cell }}</td>{% endfor %}</tr>
{% endfor %}    </tbody>
  </table>
{% endif %}</div>
"#;

lazy_static::lazy_static! {
    static ref TEMPLATES: Result<Tera, tera::Error> = {
        let mut tera = Tera::default();
        tera.add_raw_template("report_table.html", REPORT_TABLE).map(|_| tera)
    };
}

/// Render the report card: a title plus a table whose columns are the keys
/// of the first record. Values are HTML-escaped.
pub fn report_card(title: &str, rows: &[ReportRow]) -> Result<String, ConsoleError> {
    let tera = TEMPLATES
        .as_ref()
        .map_err(|e| ConsoleError::Render(e.to_string()))?;

    let headers = columns(rows);
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| headers.iter().map(|column| cell_text(row, column)).collect())
        .collect();

    let mut context = Context::new();
    context.insert("title", title);
    context.insert("headers", &headers);
    context.insert("rows", &cells);
    context.insert("no_data", messages::NO_DATA);

    tera.render("report_table.html", &context).map_err(|e| {
        tracing::error!(error = %e, "Template rendering failed");
        ConsoleError::Render(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_follows_first_record_keys() {
        let rows: Vec<ReportRow> = serde_json::from_value(json!([
            {"Usuario": "ana", "Rol": "admin"},
            {"Rol": "lectura", "Extra": "x"},
        ]))
        .unwrap();

        let html = report_card("Usuarios por Rol", &rows).unwrap();
        assert!(html.contains("<h2 class=\"report-title\">Usuarios por Rol</h2>"));
        assert!(html.contains("<tr><th>Usuario</th><th>Rol</th></tr>"));
        assert!(html.contains("<tr><td>ana</td><td>admin</td></tr>"));
        assert!(html.contains("<tr><td></td><td>lectura</td></tr>"));
        assert!(!html.contains("Extra"));
    }

    #[test]
    fn test_values_are_escaped() {
        let rows: Vec<ReportRow> = serde_json::from_value(json!([{"a": "<b>x</b>"}])).unwrap();
        let html = report_card("R", &rows).unwrap();
        assert!(!html.contains("<b>x</b>"));
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_empty_dataset_has_no_table() {
        let html = report_card("Usuarios por Rol", &[]).unwrap();
        assert!(html.contains(messages::NO_DATA));
        assert!(!html.contains("<table"));
    }
}
