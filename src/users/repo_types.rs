use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record as persisted in the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: Uuid,          // assigned once, on insert
    pub name: String,
    pub email: String,
    pub password: String,  // argon2 PHC string on create/register
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

/// Field set applied by an update; everything else on the record is left alone.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    pub password: String,
    pub updated_at: OffsetDateTime,
}

/// Whether a write may reuse an email another record already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailRule {
    Any,
    Unique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Number of records written.
    Applied(u64),
    EmailTaken,
}
