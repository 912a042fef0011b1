use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::users::repo::UserStore;
use crate::users::repo_types::{EmailRule, User, UserChanges, WriteOutcome};

/// Insertion-ordered in-memory collection used by tests.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
    broken: bool,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails, as if the database were gone.
    pub fn broken() -> Self {
        Self {
            users: RwLock::default(),
            broken: true,
        }
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.broken {
            anyhow::bail!("connection refused");
        }
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn ping(&self) -> anyhow::Result<()> {
        self.check()
    }

    async fn insert_one(&self, user: &User, rule: EmailRule) -> anyhow::Result<WriteOutcome> {
        self.check()?;
        let mut users = self.users.write().await;
        anyhow::ensure!(
            users.iter().all(|u| u.id != user.id),
            "duplicate key {}",
            user.id
        );
        if rule == EmailRule::Unique && users.iter().any(|u| u.email == user.email) {
            return Ok(WriteOutcome::EmailTaken);
        }
        users.push(user.clone());
        Ok(WriteOutcome::Applied(1))
    }

    async fn find_all(&self) -> anyhow::Result<Vec<User>> {
        self.check()?;
        Ok(self.users.read().await.clone())
    }

    async fn update_one(
        &self,
        id: Uuid,
        changes: &UserChanges,
        rule: EmailRule,
    ) -> anyhow::Result<WriteOutcome> {
        self.check()?;
        let mut users = self.users.write().await;
        if rule == EmailRule::Unique
            && users.iter().any(|u| u.id != id && u.email == changes.email)
        {
            return Ok(WriteOutcome::EmailTaken);
        }
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(WriteOutcome::Applied(0));
        };
        user.name = changes.name.clone();
        user.email = changes.email.clone();
        user.password = changes.password.clone();
        user.updated_at = Some(changes.updated_at);
        Ok(WriteOutcome::Applied(1))
    }

    async fn delete_one(&self, id: Uuid) -> anyhow::Result<u64> {
        self.check()?;
        let mut users = self.users.write().await;
        match users.iter().position(|u| u.id == id) {
            Some(idx) => {
                users.remove(idx);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
