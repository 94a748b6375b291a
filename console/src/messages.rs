// User-facing messages of the console

pub const NO_DATES_AVAILABLE: &str = "No hay consultas disponibles";
pub const DATES_LOOKUP_FAILED: &str = "Error al consultar las fechas de ejecución.";
pub const GENERATION_FAILED: &str = "Error al generar el reporte. Por favor, intente de nuevo.";
pub const GENERATION_CANCELED: &str = "Generación de reporte cancelada.";
pub const NO_DATA: &str = "No hay datos para mostrar.";
pub const SELECT_REPORT: &str = "-- Seleccione un reporte --";
