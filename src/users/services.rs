use anyhow::Context;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::UsersConfig;
use crate::error::ApiError;
use crate::users::{
    dto::{RegisterForm, UserPayload},
    password::hash_password_blocking,
    repo::UserStore,
    repo_types::{EmailRule, User, UserChanges, WriteOutcome},
};

fn email_rule(cfg: &UsersConfig) -> EmailRule {
    if cfg.unique_email {
        EmailRule::Unique
    } else {
        EmailRule::Any
    }
}

fn applied(outcome: WriteOutcome, email: &str) -> Result<u64, ApiError> {
    match outcome {
        WriteOutcome::Applied(n) => Ok(n),
        WriteOutcome::EmailTaken => {
            warn!(email = %email, "email already registered");
            Err(ApiError::Conflict("Email already registered"))
        }
    }
}

/// Hashes, then inserts. Nothing is written if hashing fails.
async fn insert_new(
    store: &dyn UserStore,
    cfg: &UsersConfig,
    name: String,
    email: String,
    plain_password: String,
) -> Result<User, ApiError> {
    let password = hash_password_blocking(plain_password)
        .await
        .context("hash password")?;
    let user = User {
        id: Uuid::new_v4(),
        name,
        email,
        password,
        created_at: OffsetDateTime::now_utc(),
        updated_at: None,
    };
    let outcome = store.insert_one(&user, email_rule(cfg)).await?;
    applied(outcome, &user.email)?;
    Ok(user)
}

pub async fn register_user(
    store: &dyn UserStore,
    cfg: &UsersConfig,
    form: RegisterForm,
) -> Result<User, ApiError> {
    let user = insert_new(store, cfg, form.name, form.email, form.password).await?;
    info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// Any id or timestamps the client sent are replaced.
pub async fn create_user(
    store: &dyn UserStore,
    cfg: &UsersConfig,
    payload: UserPayload,
) -> Result<User, ApiError> {
    if let Some(client_id) = payload.id {
        debug!(%client_id, "discarding client-supplied id");
    }
    let user = insert_new(store, cfg, payload.name, payload.email, payload.password).await?;
    info!(user_id = %user.id, "user created");
    Ok(user)
}

pub async fn list_users(store: &dyn UserStore) -> Result<Vec<User>, ApiError> {
    Ok(store.find_all().await?)
}

/// Replaces name, email and password and stamps `updated_at`. The password is
/// stored as given unless `rehash_on_update` is on. A missing or unknown id
/// matches nothing and is not an error.
pub async fn update_user(
    store: &dyn UserStore,
    cfg: &UsersConfig,
    payload: UserPayload,
) -> Result<u64, ApiError> {
    let Some(id) = payload.id else {
        debug!("update without id matches nothing");
        return Ok(0);
    };
    let password = if cfg.rehash_on_update {
        hash_password_blocking(payload.password)
            .await
            .context("hash password")?
    } else {
        payload.password
    };
    let changes = UserChanges {
        name: payload.name,
        email: payload.email,
        password,
        updated_at: OffsetDateTime::now_utc(),
    };
    let outcome = store.update_one(id, &changes, email_rule(cfg)).await?;
    let matched = applied(outcome, &changes.email)?;
    info!(user_id = %id, matched, "user updated");
    Ok(matched)
}

pub async fn delete_user(store: &dyn UserStore, id: Option<Uuid>) -> Result<u64, ApiError> {
    let Some(id) = id else {
        debug!("delete without id matches nothing");
        return Ok(0);
    };
    let removed = store.delete_one(id).await?;
    info!(user_id = %id, removed, "user deleted");
    Ok(removed)
}
