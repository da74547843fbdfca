use uuid::Uuid;

use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;

/// Idempotent seed admin. Safe to run on every boot.
pub(crate) async fn ensure_admin(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.first_superuser_password.is_empty() {
        tracing::warn!("FIRST_SUPERUSER_PASSWORD not configured; skipping admin creation");
        return Ok(());
    }

    let email = &admin.first_superuser_email;
    let user = repositories::users::find_by_email(state.db(), email).await?;
    let now = primitive_now_utc();

    if let Some(user) = user {
        let mut needs_update = false;

        let verified =
            security::verify_password(&admin.first_superuser_password, &user.hashed_password)
                .unwrap_or(false);
        let hashed_password = if verified {
            user.hashed_password.clone()
        } else {
            needs_update = true;
            security::hash_password(&admin.first_superuser_password)?
        };

        let role = if user.role != UserRole::Admin {
            needs_update = true;
            UserRole::Admin
        } else {
            user.role
        };

        let is_active = if !user.is_active {
            needs_update = true;
            true
        } else {
            user.is_active
        };

        if needs_update {
            sqlx::query(
                "UPDATE users
                 SET hashed_password = $1,
                     role = $2,
                     is_active = $3,
                     updated_at = $4
                 WHERE id = $5",
            )
            .bind(hashed_password)
            .bind(role)
            .bind(is_active)
            .bind(now)
            .bind(user.id)
            .execute(state.db())
            .await?;

            tracing::info!("Updated default admin {email}");
        } else {
            tracing::info!("Default admin already up to date");
        }

        return Ok(());
    }

    let hashed_password = security::hash_password(&admin.first_superuser_password)?;

    sqlx::query(
        "INSERT INTO users (
            id, full_name, email, hashed_password, role, is_active, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind("Platform Admin")
    .bind(email)
    .bind(hashed_password)
    .bind(UserRole::Admin)
    .bind(true)
    .bind(now)
    .bind(now)
    .execute(state.db())
    .await?;

    tracing::info!("Created default admin {email}");
    Ok(())
}
