use sqlx::PgPool;
use sqlx::{Postgres, QueryBuilder};

use crate::db::models::User;
use crate::db::types::UserRole;

const COLUMNS: &str = "\
    id, full_name, email, hashed_password, role, avatar, bio, headline, \
    is_active, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, id: &str) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists_by_email(pool: &PgPool, email: &str) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) struct CreateUser<'a> {
    pub id: &'a str,
    pub full_name: &'a str,
    pub email: &'a str,
    pub hashed_password: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (
            id, full_name, email, hashed_password, role, is_active, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.full_name)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.role)
    .bind(params.is_active)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update_role(
    pool: &PgPool,
    id: &str,
    role: UserRole,
    now: time::PrimitiveDateTime,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET role = $1, updated_at = $2 WHERE id = $3 RETURNING {COLUMNS}"
    ))
    .bind(role)
    .bind(now)
    .bind(id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserBrief {
    pub id: String,
    pub full_name: String,
    pub avatar: Option<String>,
}

pub(crate) async fn list_briefs_by_ids(
    pool: &PgPool,
    ids: &[String],
) -> Result<Vec<UserBrief>, sqlx::Error> {
    sqlx::query_as::<_, UserBrief>("SELECT id, full_name, avatar FROM users WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
}

pub(crate) struct ListUsers {
    pub role: Option<UserRole>,
    pub search: Option<String>,
    pub skip: i64,
    pub limit: i64,
}

pub(crate) async fn list(pool: &PgPool, params: &ListUsers) -> Result<Vec<User>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM users WHERE TRUE"));
    push_filters(&mut builder, params);
    builder.push(" ORDER BY created_at DESC OFFSET ");
    builder.push_bind(params.skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(params.limit.clamp(1, 1000));
    builder.build_query_as::<User>().fetch_all(pool).await
}

pub(crate) async fn count(pool: &PgPool, params: &ListUsers) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users WHERE TRUE");
    push_filters(&mut builder, params);
    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, params: &ListUsers) {
    if let Some(role) = params.role {
        builder.push(" AND role = ");
        builder.push_bind(role);
    }
    if let Some(search) = params.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        builder.push(" AND (full_name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR email ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
}
