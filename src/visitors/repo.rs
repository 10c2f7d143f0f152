use anyhow::Context;
use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::visitors::repo_types::{NewVisitor, Visitor, VisitorCounts};

impl Visitor {
    pub async fn insert(
        db: &SqlitePool,
        new: &NewVisitor,
        check_in: OffsetDateTime,
    ) -> anyhow::Result<Visitor> {
        let visitor = sqlx::query_as::<_, Visitor>(
            r#"
            INSERT INTO visitors (name, company, reason, host, check_in)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, company, reason, host, check_in, check_out
            "#,
        )
        .bind(&new.name)
        .bind(&new.company)
        .bind(&new.reason)
        .bind(&new.host)
        .bind(check_in)
        .fetch_one(db)
        .await
        .context("insert visitor")?;
        Ok(visitor)
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> anyhow::Result<Option<Visitor>> {
        let visitor = sqlx::query_as::<_, Visitor>(
            r#"
            SELECT id, name, company, reason, host, check_in, check_out
            FROM visitors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find visitor by id")?;
        Ok(visitor)
    }

    /// Stamps check-out only while it is still unset.
    /// Returns `false` when no row was updated (unknown id or already out).
    pub async fn mark_checked_out(
        db: &SqlitePool,
        id: i64,
        at: OffsetDateTime,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE visitors
               SET check_out = $1
             WHERE id = $2 AND check_out IS NULL
            "#,
        )
        .bind(at)
        .bind(id)
        .execute(db)
        .await
        .context("mark visitor checked out")?;
        Ok(res.rows_affected() == 1)
    }

    /// Every record, newest check-in first.
    pub async fn list_all(db: &SqlitePool) -> anyhow::Result<Vec<Visitor>> {
        let rows = sqlx::query_as::<_, Visitor>(
            r#"
            SELECT id, name, company, reason, host, check_in, check_out
            FROM visitors
            ORDER BY check_in DESC, id DESC
            "#,
        )
        .fetch_all(db)
        .await
        .context("list visitors")?;
        Ok(rows)
    }

    pub async fn counts(db: &SqlitePool) -> anyhow::Result<VisitorCounts> {
        let counts = sqlx::query_as::<_, VisitorCounts>(
            r#"
            SELECT COUNT(*)                    AS total,
                   COUNT(*) - COUNT(check_out) AS inside,
                   COUNT(check_out)            AS exited
            FROM visitors
            "#,
        )
        .fetch_one(db)
        .await
        .context("count visitors")?;
        Ok(counts)
    }
}
