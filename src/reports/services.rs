use std::collections::BTreeMap;

use sqlx::SqlitePool;
use tracing::debug;

use crate::{
    error::AppError,
    reports::{
        dto::{CompanyCount, ReportPage, ReportQuery},
        filters::ReportFilter,
        repo,
    },
    visitors::repo_types::Visitor,
};

/// Filtered records plus whole-table counts and a per-company breakdown of the
/// filtered set.
pub async fn run_report(db: &SqlitePool, query: ReportQuery) -> Result<ReportPage, AppError> {
    let filter = ReportFilter::from_query(&query)?;

    let visitors: Vec<Visitor> = repo::list_in_range(db, filter.from, filter.until)
        .await?
        .into_iter()
        .filter(|v| filter.matches(v))
        .collect();
    let counts = Visitor::counts(db).await?;
    debug!(matched = visitors.len(), total = counts.total, "report computed");

    Ok(ReportPage {
        by_company: company_breakdown(&visitors),
        filters: query,
        visitors,
        total: counts.total,
        inside: counts.inside,
        exited: counts.exited,
    })
}

/// Visits per company, most visited first, ties by company name.
fn company_breakdown(visitors: &[Visitor]) -> Vec<CompanyCount> {
    let mut per_company: BTreeMap<Option<&str>, i64> = BTreeMap::new();
    for v in visitors {
        *per_company.entry(v.company.as_deref()).or_default() += 1;
    }
    let mut out: Vec<CompanyCount> = per_company
        .into_iter()
        .map(|(company, visits)| CompanyCount {
            company: company.map(str::to_string),
            visits,
        })
        .collect();
    // BTreeMap already ordered by name; a stable sort keeps that for ties.
    out.sort_by(|a, b| b.visits.cmp(&a.visits));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::AppState, visitors::services};

    fn query(pairs: &[(&str, &str)]) -> ReportQuery {
        let mut q = ReportQuery::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "fecha_inicio" => q.start_date = v,
                "fecha_fin" => q.end_date = v,
                "nombre" => q.name = v,
                "empresa" => q.company = v,
                other => panic!("unknown parameter {other}"),
            }
        }
        q
    }

    fn names(page: &ReportPage) -> Vec<&str> {
        page.visitors.iter().map(|v| v.name.as_str()).collect()
    }

    #[tokio::test]
    async fn unfiltered_report_returns_everything_newest_first() {
        let state = AppState::fake_with(true).await.unwrap();
        let page = run_report(&state.db, ReportQuery::default()).await.unwrap();
        assert_eq!(names(&page), ["Luis", "Ana", "Juan"]);
        assert_eq!((page.total, page.inside, page.exited), (3, 3, 0));
    }

    #[tokio::test]
    async fn name_and_company_compose() {
        let state = AppState::fake_with(true).await.unwrap();

        let page = run_report(&state.db, query(&[("nombre", "ana"), ("empresa", "alg")]))
            .await
            .unwrap();
        assert_eq!(names(&page), ["Ana"]);

        let page = run_report(&state.db, query(&[("nombre", "ana"), ("empresa", "gas")]))
            .await
            .unwrap();
        assert!(page.visitors.is_empty());
        // Counts ignore the filters.
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn date_range_filters_on_check_in() {
        let state = AppState::fake_with(true).await.unwrap();
        // Today's visitor falls outside the 2025-12-01 window.
        services::check_in(
            &state.db,
            crate::visitors::dto::CheckInForm {
                name: "Marta".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let page = run_report(
            &state.db,
            query(&[("fecha_inicio", "2025-12-01"), ("fecha_fin", "2025-12-01")]),
        )
        .await
        .unwrap();
        assert_eq!(names(&page), ["Luis", "Ana", "Juan"]);
        assert_eq!(page.total, 4);

        let page = run_report(&state.db, query(&[("fecha_inicio", "2025-12-02")]))
            .await
            .unwrap();
        assert_eq!(names(&page), ["Marta"]);
    }

    #[tokio::test]
    async fn counts_track_checkouts() {
        let state = AppState::fake_with(true).await.unwrap();
        let first = run_report(&state.db, ReportQuery::default()).await.unwrap();
        services::check_out(&state.db, first.visitors[0].id).await.unwrap();

        let page = run_report(&state.db, query(&[("empresa", "holcim")])).await.unwrap();
        assert_eq!((page.total, page.inside, page.exited), (3, 2, 1));
        assert_eq!(page.inside + page.exited, page.total);
    }

    #[tokio::test]
    async fn malformed_date_is_reported() {
        let state = AppState::fake_with(true).await.unwrap();
        let err = run_report(&state.db, query(&[("fecha_fin", "12/01/2025")]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn breakdown_orders_by_visits_then_name() {
        let at = time::macros::datetime!(2025-12-01 9:00 UTC);
        let v = |name: &str, company: Option<&str>| Visitor {
            id: 0,
            name: name.into(),
            company: company.map(Into::into),
            reason: None,
            host: None,
            check_in: at,
            check_out: None,
        };
        let rows = [
            v("a", Some("GAS")),
            v("b", Some("ALG")),
            v("c", Some("GAS")),
            v("d", None),
            v("e", Some("Holcim")),
        ];
        let out = company_breakdown(&rows);
        let flat: Vec<_> = out
            .iter()
            .map(|c| (c.company.as_deref(), c.visits))
            .collect();
        assert_eq!(
            flat,
            [(Some("GAS"), 2), (None, 1), (Some("ALG"), 1), (Some("Holcim"), 1)]
        );
    }
}
