use anyhow::Context;
use serde::Deserialize;

/// Behavior switches for the user endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct UsersConfig {
    pub list_include_password: bool, // expose the stored hash in GET /users
    pub rehash_on_update: bool,      // hash the password on PUT /users/update too
    pub unique_email: bool,          // reject duplicate emails on register/create
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            list_include_password: true,
            rehash_on_update: false,
            unique_email: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub users: UsersConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .with_context(|| format!("invalid DB_MAX_CONNECTIONS: {v}"))?,
            None => 10,
        };
        let port = match lookup("APP_PORT") {
            Some(v) => v
                .parse::<u16>()
                .with_context(|| format!("invalid APP_PORT: {v}"))?,
            None => 8080,
        };

        let defaults = UsersConfig::default();
        let users = UsersConfig {
            list_include_password: flag(
                &lookup,
                "USERS_LIST_INCLUDE_PASSWORD",
                defaults.list_include_password,
            )?,
            rehash_on_update: flag(&lookup, "USERS_REHASH_ON_UPDATE", defaults.rehash_on_update)?,
            unique_email: flag(&lookup, "USERS_UNIQUE_EMAIL", defaults.unique_email)?,
        };

        Ok(Self {
            database_url,
            max_connections,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            users,
        })
    }
}

fn flag<F>(lookup: &F, key: &str, default: bool) -> anyhow::Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => anyhow::bail!("invalid boolean for {key}: {other}"),
    }
}
