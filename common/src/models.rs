use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;

/// One record of a report. Columns vary by report type, so the row is kept
/// as an ordered JSON object.
pub type ReportRow = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// Executions
// ============================================================================

/// Identifier of one historical run of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(pub i32);

impl ExecutionId {
    /// Parse the leading integer of a user-supplied execution id.
    ///
    /// The value may carry a trailing date suffix (`"007 2024-05-01"`), so only
    /// the first space-separated token is read, and only its leading run of
    /// digits (with an optional sign) counts, the same way `parseInt` reads it.
    pub fn parse_leading(raw: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidExecutionId(raw.to_string());

        let token = raw.trim().split(' ').next().unwrap_or_default();
        let (sign, unsigned) = match token.as_bytes().first() {
            Some(b'-') => (-1i64, &token[1..]),
            Some(b'+') => (1i64, &token[1..]),
            _ => (1i64, token),
        };

        let digits_end = unsigned
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(unsigned.len());
        let digits = &unsigned[..digits_end];
        if digits.is_empty() {
            return Err(invalid());
        }

        let magnitude: i64 = digits.parse().map_err(|_| invalid())?;
        i32::try_from(sign * magnitude)
            .map(ExecutionId)
            .map_err(|_| invalid())
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExecutionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_leading(s)
    }
}

/// Execution row as read from the database before labelling
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ExecutionRecord {
    #[sqlx(rename = "EjecucionID")]
    pub id: i32,
    #[sqlx(rename = "FechaEjecucion")]
    pub executed_at: NaiveDateTime,
}

/// Execution as listed by the dates endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionDate {
    #[serde(rename = "EjecucionID")]
    pub id: i32,
    /// Zero-padded id and ISO date, e.g. `"007 2024-05-01"`
    #[serde(rename = "EjecucionID_Fecha")]
    pub label: String,
}

impl ExecutionDate {
    pub fn label_for(id: i32, executed_at: NaiveDateTime) -> String {
        format!("{:03} {}", id, executed_at.format("%Y-%m-%d"))
    }

    /// Date token of a label (`"007 2024-05-01"` → `"2024-05-01"`), falling
    /// back to the first token when the label has no space
    pub fn date_token(label: &str) -> &str {
        let mut tokens = label.split(' ');
        let first = tokens.next().unwrap_or_default();
        match tokens.next() {
            Some(second) if !second.is_empty() => second,
            _ => first,
        }
    }
}

impl From<ExecutionRecord> for ExecutionDate {
    fn from(record: ExecutionRecord) -> Self {
        Self {
            id: record.id,
            label: Self::label_for(record.id, record.executed_at),
        }
    }
}

/// Label executions, drop duplicates and order them by label, most recent first
pub fn label_executions(records: Vec<ExecutionRecord>) -> Vec<ExecutionDate> {
    let mut dates: Vec<ExecutionDate> = records.into_iter().map(ExecutionDate::from).collect();
    dates.sort_by(|a, b| b.label.cmp(&a.label).then(b.id.cmp(&a.id)));
    dates.dedup();
    dates
}

/// Response item of `GET /api/reports`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentTime {
    #[serde(rename = "currentTime")]
    pub current_time: DateTime<Utc>,
}

// ============================================================================
// Filters
// ============================================================================

/// Lookup filter for candidate executions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub entidad: String,
    pub reporte: String,
    pub ambiente: String,
}

impl ReportFilter {
    /// Build a filter from optional inputs; every field must be present and non-empty
    pub fn from_parts(
        entidad: Option<String>,
        reporte: Option<String>,
        ambiente: Option<String>,
    ) -> Result<Self, ValidationError> {
        let present = |value: Option<String>| value.filter(|v| !v.is_empty());
        match (present(entidad), present(reporte), present(ambiente)) {
            (Some(entidad), Some(reporte), Some(ambiente)) => Ok(Self {
                entidad,
                reporte,
                ambiente,
            }),
            _ => Err(ValidationError::MissingFilter),
        }
    }
}

// ============================================================================
// Users
// ============================================================================

/// Role of a console user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "administrador")]
    Administrator,
    #[serde(rename = "colaborador")]
    Collaborator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Administrator => write!(f, "administrador"),
            Role::Collaborator => write!(f, "colaborador"),
        }
    }
}

/// Static user record from the user list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "usr")]
    pub username: String,
    /// `None` for the placeholder user and for unknown profiles
    #[serde(rename = "perfil", default, deserialize_with = "deserialize_role")]
    pub role: Option<Role>,
    #[serde(rename = "organizacion", default)]
    pub organization: String,
}

fn deserialize_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw.as_deref() {
        Some("administrador") => Some(Role::Administrator),
        Some("colaborador") => Some(Role::Collaborator),
        _ => None,
    })
}

impl User {
    /// Stand-in used when the user list is empty
    pub fn placeholder() -> Self {
        Self {
            username: "Sin Usuario".to_string(),
            role: None,
            organization: String::new(),
        }
    }

    pub fn is_collaborator(&self) -> bool {
        self.role == Some(Role::Collaborator)
    }
}
