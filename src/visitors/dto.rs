use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    visitors::repo_types::{NewVisitor, Visitor},
};

pub const MAX_FIELD_LEN: usize = 200;

/// Check-in form body. Only `name` is required.
#[derive(Debug, Default, Deserialize)]
pub struct CheckInForm {
    #[serde(default)]
    pub name: String,
    pub company: Option<String>,
    pub reason: Option<String>,
    #[serde(alias = "person_to_visit")]
    pub host: Option<String>,
}

impl CheckInForm {
    /// Trims every field; blank optional fields become `None`.
    pub fn validate(self) -> Result<NewVisitor, AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        let new = NewVisitor {
            name,
            company: non_blank(self.company),
            reason: non_blank(self.reason),
            host: non_blank(self.host),
        };
        let fields = [
            Some(&new.name),
            new.company.as_ref(),
            new.reason.as_ref(),
            new.host.as_ref(),
        ];
        let too_long = fields
            .into_iter()
            .flatten()
            .any(|v| v.chars().count() > MAX_FIELD_LEN);
        if too_long {
            return Err(AppError::validation(format!(
                "Fields are limited to {MAX_FIELD_LEN} characters"
            )));
        }
        Ok(new)
    }
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[derive(Debug, Serialize)]
pub struct ListPage {
    pub visitors: Vec<Visitor>,
    pub inside_count: i64,
}

#[derive(Debug, Serialize)]
pub struct HistoryPage {
    pub visitors: Vec<Visitor>,
}
