use sqlx::PgPool;

use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::models::{Plan, Role};

/// Password shared by every seeded account.
pub const SEED_PASSWORD: &str = "password";

/// (slug, display name) of the demo tenants.
pub const SEED_TENANTS: [(&str, &str); 2] = [("acme", "Acme"), ("globex", "Globex")];

/// Populate an empty database with the demo tenants and one admin and one
/// member per tenant. Does nothing once any tenant exists.
pub async fn seed_database(pool: &PgPool) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock(1)")
        .execute(&mut *tx)
        .await?;

    if db::tenants::count_all(&mut *tx).await? > 0 {
        tracing::info!("Database already seeded, skipping");
        return Ok(false);
    }

    let pw_hash = password::hash(SEED_PASSWORD)?;

    for (slug, name) in SEED_TENANTS {
        let tenant = db::tenants::create(&mut *tx, name, slug, Plan::Free).await?;

        for (local, role) in [("admin", Role::Admin), ("user", Role::Member)] {
            let email = format!("{local}@{slug}.test");
            db::users::create(&mut *tx, tenant.id, &email, &pw_hash, role).await?;
        }
    }

    tx.commit().await?;
    tracing::info!("Database seeded with {} tenants", SEED_TENANTS.len());
    Ok(true)
}
