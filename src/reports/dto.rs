use serde::{Deserialize, Serialize};

use crate::visitors::repo_types::Visitor;

/// Report query string. Every parameter is optional; blank means absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportQuery {
    #[serde(rename = "fecha_inicio")]
    pub start_date: Option<String>,
    #[serde(rename = "fecha_fin")]
    pub end_date: Option<String>,
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "empresa")]
    pub company: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyCount {
    pub company: Option<String>,
    pub visits: i64,
}

#[derive(Debug, Serialize)]
pub struct ReportPage {
    /// Echo of the submitted filters, for re-filling the form.
    pub filters: ReportQuery,
    pub visitors: Vec<Visitor>,
    pub total: i64,
    pub inside: i64,
    pub exited: i64,
    pub by_company: Vec<CompanyCount>,
}
