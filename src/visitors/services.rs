use sqlx::SqlitePool;
use tracing::info;

use crate::{
    clock,
    error::AppError,
    visitors::{
        dto::{CheckInForm, HistoryPage, ListPage},
        repo_types::Visitor,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    CheckedOut(Visitor),
    /// Check-out was already stamped; the record is returned unchanged.
    AlreadyCheckedOut(Visitor),
}

pub async fn check_in(db: &SqlitePool, form: CheckInForm) -> Result<Visitor, AppError> {
    let new = form.validate()?;
    let visitor = Visitor::insert(db, &new, clock::now_utc()).await?;
    info!(visitor_id = visitor.id, name = %visitor.name, "visitor checked in");
    Ok(visitor)
}

pub async fn check_out(db: &SqlitePool, id: i64) -> Result<CheckoutOutcome, AppError> {
    let updated = Visitor::mark_checked_out(db, id, clock::now_utc()).await?;
    let visitor = Visitor::find_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Visitor {id} not found")))?;

    if updated {
        info!(visitor_id = id, "visitor checked out");
        Ok(CheckoutOutcome::CheckedOut(visitor))
    } else {
        info!(visitor_id = id, "visitor already checked out");
        Ok(CheckoutOutcome::AlreadyCheckedOut(visitor))
    }
}

pub async fn list(db: &SqlitePool) -> Result<ListPage, AppError> {
    let visitors = Visitor::list_all(db).await?;
    let inside_count = visitors.iter().filter(|v| v.is_inside()).count() as i64;
    Ok(ListPage {
        visitors,
        inside_count,
    })
}

pub async fn history(db: &SqlitePool) -> Result<HistoryPage, AppError> {
    Ok(HistoryPage {
        visitors: Visitor::list_all(db).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::AppState, visitors::repo_types::VisitorCounts};
    use time::{Duration, OffsetDateTime};

    fn form(name: &str, company: Option<&str>) -> CheckInForm {
        CheckInForm {
            name: name.into(),
            company: company.map(Into::into),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn check_in_creates_inside_record_stamped_now() {
        let state = AppState::fake().await.unwrap();
        let before = OffsetDateTime::now_utc();
        let v = check_in(&state.db, form("Ana", Some("ALG"))).await.unwrap();

        assert!(v.is_inside());
        assert!((v.check_in - before).abs() < Duration::seconds(2));
        assert_eq!(Visitor::find_by_id(&state.db, v.id).await.unwrap(), Some(v));
    }

    #[tokio::test]
    async fn check_in_without_name_inserts_nothing() {
        let state = AppState::fake().await.unwrap();
        let err = check_in(&state.db, form("", Some("ALG"))).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(Visitor::counts(&state.db).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn check_out_sets_timestamp_once() {
        let state = AppState::fake().await.unwrap();
        let v = check_in(&state.db, form("Juan", None)).await.unwrap();

        let first = match check_out(&state.db, v.id).await.unwrap() {
            CheckoutOutcome::CheckedOut(v) => v,
            other => panic!("unexpected {other:?}"),
        };
        let stamped = first.check_out.expect("check_out set");

        // Wait past the one-second timestamp resolution so a rewrite would show.
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        let second = match check_out(&state.db, v.id).await.unwrap() {
            CheckoutOutcome::AlreadyCheckedOut(v) => v,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(second.check_out, Some(stamped));
    }

    #[tokio::test]
    async fn check_out_unknown_id_is_not_found() {
        let state = AppState::fake().await.unwrap();
        check_in(&state.db, form("Luis", Some("GAS"))).await.unwrap();

        let err = check_out(&state.db, 999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(Visitor::counts(&state.db).await.unwrap().exited, 0);
    }

    #[tokio::test]
    async fn counts_partition_the_table() {
        let state = AppState::fake().await.unwrap();
        assert_eq!(Visitor::counts(&state.db).await.unwrap(), VisitorCounts::default());

        let a = check_in(&state.db, form("Ana", None)).await.unwrap();
        check_in(&state.db, form("Juan", None)).await.unwrap();
        check_in(&state.db, form("Luis", None)).await.unwrap();
        check_out(&state.db, a.id).await.unwrap();

        let counts = Visitor::counts(&state.db).await.unwrap();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.inside, 2);
        assert_eq!(counts.exited, 1);
        assert_eq!(counts.inside + counts.exited, counts.total);

        let page = list(&state.db).await.unwrap();
        assert_eq!(page.inside_count, 2);
        assert_eq!(page.visitors.len(), 3);
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let state = AppState::fake_with(true).await.unwrap();
        let names: Vec<_> = history(&state.db)
            .await
            .unwrap()
            .visitors
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, ["Luis", "Ana", "Juan"]);
    }
}
