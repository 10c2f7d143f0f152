use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Visitor record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Visitor {
    pub id: i64,
    pub name: String,
    pub company: Option<String>,
    pub reason: Option<String>,
    pub host: Option<String>, // person to visit
    #[serde(with = "time::serde::rfc3339")]
    pub check_in: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub check_out: Option<OffsetDateTime>,
}

impl Visitor {
    pub fn is_inside(&self) -> bool {
        self.check_out.is_none()
    }
}

/// Validated check-in data, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVisitor {
    pub name: String,
    pub company: Option<String>,
    pub reason: Option<String>,
    pub host: Option<String>,
}

/// Whole-table counts. `inside + exited == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct VisitorCounts {
    pub total: i64,
    pub inside: i64,
    pub exited: i64,
}
