//! Bootstrap seeding: one organization and one ADMIN user, idempotent.
//! The admin's created_by_user_id stays NULL; every other account is
//! created through the API by an admin.

use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "seed=info,sqlx=warn".to_string());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let database_url = std::env::var("DATABASE_URL")?;
    let org_name =
        std::env::var("SEED_ORG_NAME").unwrap_or_else(|_| "Berkeley Math Circle".into());
    let admin_email =
        std::env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@berkeley-math.org".into());
    let admin_password = std::env::var("SEED_ADMIN_PASSWORD")?;

    let db = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&db).await?;

    let (org_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO organizations (name)
        VALUES ($1)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(&org_name)
    .fetch_one(&db)
    .await?;
    info!(%org_id, name = %org_name, "organization ready");

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(admin_password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let inserted: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (email, password_hash, first_name, last_name, role,
                           organization_id, created_by_user_id)
        VALUES ($1, $2, 'Site', 'Admin', 'ADMIN', $3, NULL)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(&admin_email)
    .bind(&hash)
    .bind(org_id)
    .fetch_optional(&db)
    .await?;

    match inserted {
        Some((id,)) => info!(user_id = %id, email = %admin_email, "admin user created"),
        None => info!(email = %admin_email, "admin user already present, left untouched"),
    }

    Ok(())
}
