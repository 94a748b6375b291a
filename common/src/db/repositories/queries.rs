// SQL for the report tables
// Identifiers are quoted so JSON keys built from column names keep their casing.

/// SQL queries against `datos_reportes` and `ejecuciones_reportes`
pub mod report_queries {
    /// Database clock, used as a connectivity check
    pub const CURRENT_TIME: &str = r#"SELECT NOW() AS "currentTime""#;

    /// Every row of one execution as a JSON object, row-table columns first
    ///
    /// `json` (not `jsonb`) keeps the column order of the select list.
    pub const ROWS_BY_EXECUTION: &str = r#"
        SELECT row_to_json(r) AS "row"
        FROM (
            SELECT t1.*, t2."NombreReporte", t2."FechaEjecucion"
            FROM datos_reportes t1
            JOIN ejecuciones_reportes t2 ON t1."EjecucionID" = t2."EjecucionID"
            WHERE t1."EjecucionID" = $1
            ORDER BY t1."DatoID"
        ) r"#;

    /// Distinct executions matching entity ($1), report name ($2) and environment ($3)
    ///
    /// The date is cast to `timestamp` so `TIMESTAMPTZ` columns decode too;
    /// those are read in the session time zone.
    pub const EXECUTIONS_BY_FILTER: &str = r#"
        SELECT DISTINCT t1."EjecucionID", t2."FechaEjecucion"::timestamp AS "FechaEjecucion"
        FROM datos_reportes t1
        JOIN ejecuciones_reportes t2 ON t1."EjecucionID" = t2."EjecucionID"
        WHERE t1."Entidad_Organizacion" = $1
          AND t2."NombreReporte" = $2
          AND t1."Ambiente" = $3"#;
}

#[cfg(test)]
mod tests {
    use super::report_queries::*;

    #[test]
    fn test_execution_dates_decode_as_naive_timestamp() {
        assert!(EXECUTIONS_BY_FILTER.contains(r#"t2."FechaEjecucion"::timestamp AS "FechaEjecucion""#));
    }

    #[test]
    fn test_rows_keep_select_list_order() {
        assert!(ROWS_BY_EXECUTION.contains("row_to_json"));
        assert!(!ROWS_BY_EXECUTION.contains("jsonb"));
    }
}
