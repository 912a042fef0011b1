use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::users::repo_types::{EmailRule, User, UserChanges, WriteOutcome};

/// Operations the user collection must provide. Each call is a single
/// atomic write or read; nothing spans more than one document.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Connectivity check.
    async fn ping(&self) -> anyhow::Result<()>;
    /// Under `EmailRule::Unique` the email check and the insert are one
    /// atomic step.
    async fn insert_one(&self, user: &User, rule: EmailRule) -> anyhow::Result<WriteOutcome>;
    /// All records in the collection's natural order.
    async fn find_all(&self) -> anyhow::Result<Vec<User>>;
    /// Matching zero records is `Applied(0)`, not an error. Under
    /// `EmailRule::Unique` the email may not belong to any other record.
    async fn update_one(
        &self,
        id: Uuid,
        changes: &UserChanges,
        rule: EmailRule,
    ) -> anyhow::Result<WriteOutcome>;
    /// Returns the number of records removed; zero is not an error.
    async fn delete_one(&self, id: Uuid) -> anyhow::Result<u64>;
}

pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Serializes writers of the same email until the transaction ends, then
/// reports whether a record other than `except` already holds it.
async fn email_taken_tx(
    tx: &mut Transaction<'_, Postgres>,
    email: &str,
    except: Option<Uuid>,
) -> anyhow::Result<bool> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(email)
        .execute(&mut **tx)
        .await
        .context("lock email")?;
    let taken: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM users
             WHERE email = $1
               AND ($2::uuid IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(email)
    .bind(except)
    .fetch_one(&mut **tx)
    .await
    .context("check email")?;
    Ok(taken)
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.db)
            .await
            .context("ping database")?;
        Ok(())
    }

    async fn insert_one(&self, user: &User, rule: EmailRule) -> anyhow::Result<WriteOutcome> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        if rule == EmailRule::Unique && email_taken_tx(&mut tx, &user.email, None).await? {
            return Ok(WriteOutcome::EmailTaken);
        }
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .context("insert user")?;
        tx.commit().await.context("commit tx")?;
        Ok(WriteOutcome::Applied(1))
    }

    async fn find_all(&self) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, created_at, updated_at
            FROM users
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list users")?;
        Ok(users)
    }

    async fn update_one(
        &self,
        id: Uuid,
        changes: &UserChanges,
        rule: EmailRule,
    ) -> anyhow::Result<WriteOutcome> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        if rule == EmailRule::Unique && email_taken_tx(&mut tx, &changes.email, Some(id)).await? {
            return Ok(WriteOutcome::EmailTaken);
        }
        let res = sqlx::query(
            r#"
            UPDATE users
               SET name = $2, email = $3, password = $4, updated_at = $5
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.password)
        .bind(changes.updated_at)
        .execute(&mut *tx)
        .await
        .context("update user")?;
        tx.commit().await.context("commit tx")?;
        Ok(WriteOutcome::Applied(res.rows_affected()))
    }

    async fn delete_one(&self, id: Uuid) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete user")?;
        Ok(res.rows_affected())
    }
}
