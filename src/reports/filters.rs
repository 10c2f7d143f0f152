use time::{macros::format_description, Date, OffsetDateTime};

use crate::{error::AppError, reports::dto::ReportQuery, visitors::repo_types::Visitor};

/// Parsed report filters. Every present filter must match (logical AND).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Inclusive lower bound on check-in.
    pub from: Option<OffsetDateTime>,
    /// Exclusive upper bound on check-in: midnight after the end date.
    pub until: Option<OffsetDateTime>,
    /// Lowercased name needle.
    pub name: Option<String>,
    /// Lowercased company needle.
    pub company: Option<String>,
}

impl ReportFilter {
    pub fn from_query(q: &ReportQuery) -> Result<Self, AppError> {
        let start = parse_date("start date", q.start_date.as_deref())?;
        let end = parse_date("end date", q.end_date.as_deref())?;

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(AppError::validation("Start date is after end date"));
            }
        }

        Ok(Self {
            from: start.map(|d| d.midnight().assume_utc()),
            until: end.and_then(Date::next_day).map(|d| d.midnight().assume_utc()),
            name: needle(q.name.as_deref()),
            company: needle(q.company.as_deref()),
        })
    }

    pub fn matches(&self, v: &Visitor) -> bool {
        if self.from.is_some_and(|from| v.check_in < from) {
            return false;
        }
        if self.until.is_some_and(|until| v.check_in >= until) {
            return false;
        }
        if let Some(name) = &self.name {
            if !v.name.to_lowercase().contains(name.as_str()) {
                return false;
            }
        }
        if let Some(company) = &self.company {
            let hit = v
                .company
                .as_ref()
                .is_some_and(|c| c.to_lowercase().contains(company.as_str()));
            if !hit {
                return false;
            }
        }
        true
    }
}

fn parse_date(label: &str, raw: Option<&str>) -> Result<Option<Date>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map(Some)
        .map_err(|_| AppError::validation(format!("Invalid {label} '{raw}', expected YYYY-MM-DD")))
}

fn needle(raw: Option<&str>) -> Option<String> {
    raw.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn query(start: &str, end: &str, name: &str, company: &str) -> ReportQuery {
        let opt = |s: &str| Some(s.to_string());
        ReportQuery {
            start_date: opt(start),
            end_date: opt(end),
            name: opt(name),
            company: opt(company),
        }
    }

    fn visitor(name: &str, company: Option<&str>, check_in: OffsetDateTime) -> Visitor {
        Visitor {
            id: 1,
            name: name.into(),
            company: company.map(Into::into),
            reason: None,
            host: None,
            check_in,
            check_out: None,
        }
    }

    #[test]
    fn blank_parameters_impose_nothing() {
        let f = ReportFilter::from_query(&query("", " ", "", "")).unwrap();
        assert_eq!(f, ReportFilter::default());
        assert!(f.matches(&visitor("Anyone", None, datetime!(2001-01-01 0:00 UTC))));
    }

    #[test]
    fn end_date_covers_the_whole_day() {
        let f = ReportFilter::from_query(&query("2025-12-01", "2025-12-01", "", "")).unwrap();
        assert_eq!(f.from, Some(datetime!(2025-12-01 0:00 UTC)));
        assert_eq!(f.until, Some(datetime!(2025-12-02 0:00 UTC)));
        assert!(f.matches(&visitor("Juan", None, datetime!(2025-12-01 0:00 UTC))));
        assert!(f.matches(&visitor("Juan", None, datetime!(2025-12-01 23:59:59 UTC))));
        assert!(!f.matches(&visitor("Juan", None, datetime!(2025-12-02 0:00 UTC))));
        assert!(!f.matches(&visitor("Juan", None, datetime!(2025-11-30 23:59:59 UTC))));
    }

    #[test]
    fn malformed_dates_are_validation_errors() {
        for bad in ["2025-13-01", "01/12/2025", "2025-12-1", "yesterday"] {
            let err = ReportFilter::from_query(&query(bad, "", "", "")).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{bad}");
        }
        let err = ReportFilter::from_query(&query("", "2025-02-30", "", "")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = ReportFilter::from_query(&query("2025-12-02", "2025-12-01", "", "")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn text_filters_are_case_insensitive_substrings() {
        let at = datetime!(2025-12-01 9:30 UTC);
        let f = ReportFilter::from_query(&query("", "", "ÁLV", "")).unwrap();
        assert!(f.matches(&visitor("Álvaro", None, at)));
        assert!(!f.matches(&visitor("Ana", None, at)));

        let f = ReportFilter::from_query(&query("", "", "", "olci")).unwrap();
        assert!(f.matches(&visitor("Juan", Some("Holcim"), at)));
        assert!(!f.matches(&visitor("Juan", None, at)));
    }

    #[test]
    fn filters_compose_conjunctively() {
        let at = datetime!(2025-12-01 9:30 UTC);
        let f = ReportFilter::from_query(&query("", "", "ana", "alg")).unwrap();
        assert!(f.matches(&visitor("Ana", Some("ALG"), at)));
        assert!(!f.matches(&visitor("Ana", Some("GAS"), at)));
        assert!(!f.matches(&visitor("Juan", Some("ALG"), at)));
    }
}
