//! Start-up initialisation. Safe to run on every boot.

use anyhow::Context;
use sqlx::SqlitePool;
use time::{macros::datetime, OffsetDateTime};
use tracing::{debug, info};

use crate::{
    auth::{password::hash_password, repo_types::Staff},
    config::AdminConfig,
    state::AppState,
    visitors::repo_types::{NewVisitor, Visitor},
};

const SAMPLE_VISITORS: [(&str, &str, OffsetDateTime); 3] = [
    ("Juan", "Holcim", datetime!(2025-12-01 9:00 UTC)),
    ("Ana", "ALG", datetime!(2025-12-01 9:30 UTC)),
    ("Luis", "GAS", datetime!(2025-12-01 10:00 UTC)),
];

/// Creates the schema, seeds the admin identity when no identity exists, and
/// optionally seeds sample visitors into an empty table.
pub async fn init(state: &AppState) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(&state.db)
        .await
        .context("run migrations")?;

    seed_admin(&state.db, &state.config.admin).await?;
    if state.config.seed_sample_visitors {
        seed_sample_visitors(&state.db).await?;
    }
    Ok(())
}

async fn seed_admin(db: &SqlitePool, admin: &AdminConfig) -> anyhow::Result<bool> {
    if Staff::count(db).await? > 0 {
        debug!("identities present, admin seed skipped");
        return Ok(false);
    }
    let hash = hash_password(&admin.password).context("hash admin password")?;
    Staff::create(db, &admin.username, &hash).await?;
    info!(username = %admin.username, "seeded admin identity");
    Ok(true)
}

async fn seed_sample_visitors(db: &SqlitePool) -> anyhow::Result<bool> {
    if Visitor::counts(db).await?.total > 0 {
        return Ok(false);
    }
    for (name, company, check_in) in SAMPLE_VISITORS {
        let new = NewVisitor {
            name: name.into(),
            company: Some(company.into()),
            reason: None,
            host: None,
        };
        Visitor::insert(db, &new, check_in).await?;
    }
    info!(count = SAMPLE_VISITORS.len(), "seeded sample visitors");
    Ok(true)
}
