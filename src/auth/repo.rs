use anyhow::Context;
use sqlx::SqlitePool;

use crate::{auth::repo_types::Staff, clock};

impl Staff {
    /// Find an identity by login name.
    pub async fn find_by_username(
        db: &SqlitePool,
        username: &str,
    ) -> anyhow::Result<Option<Staff>> {
        let staff = sqlx::query_as::<_, Staff>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM staff
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
        .context("find staff by username")?;
        Ok(staff)
    }

    /// Insert an identity with an already-hashed password.
    pub async fn create(
        db: &SqlitePool,
        username: &str,
        password_hash: &str,
    ) -> anyhow::Result<Staff> {
        let staff = sqlx::query_as::<_, Staff>(
            r#"
            INSERT INTO staff (username, password_hash, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(clock::now_utc())
        .fetch_one(db)
        .await
        .context("insert staff")?;
        Ok(staff)
    }

    pub async fn count(db: &SqlitePool) -> anyhow::Result<i64> {
        let (n,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM staff")
            .fetch_one(db)
            .await
            .context("count staff")?;
        Ok(n)
    }
}
