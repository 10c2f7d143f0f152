use anyhow::Context;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use time::OffsetDateTime;

use crate::visitors::repo_types::Visitor;

/// Records with `from <= check_in < until`, newest first. Absent bounds are open.
pub async fn list_in_range(
    db: &SqlitePool,
    from: Option<OffsetDateTime>,
    until: Option<OffsetDateTime>,
) -> anyhow::Result<Vec<Visitor>> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT id, name, company, reason, host, check_in, check_out FROM visitors WHERE 1 = 1",
    );
    if let Some(from) = from {
        qb.push(" AND check_in >= ").push_bind(from);
    }
    if let Some(until) = until {
        qb.push(" AND check_in < ").push_bind(until);
    }
    qb.push(" ORDER BY check_in DESC, id DESC");

    let rows = qb
        .build_query_as::<Visitor>()
        .fetch_all(db)
        .await
        .context("list visitors in range")?;
    Ok(rows)
}
