// src/config.rs

use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment or .env file")]
    Missing(&'static str),
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub db: DbConfig,
    pub credentials: Credentials,
}

#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

#[derive(Clone, Default)]
pub struct Credentials {
    accounts: Vec<Account>,
}

#[derive(Clone)]
struct Account {
    username: String,
    password: String,
}

// (username var, password var) for each login account
const ACCOUNT_VARS: [(&str, &str); 3] = [
    ("ADMIN_USER", "ADMIN_PASS"),
    ("TEST_USER", "TEST_PASS"),
    ("MD_USER", "MD_PASS"),
];

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; `from_env` is the
    /// process-environment flavour.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| lookup(var).ok_or(ConfigError::Missing(var));
        let port_or = |var: &'static str, default: u16| -> Result<u16, ConfigError> {
            match lookup(var) {
                None => Ok(default),
                Some(raw) => raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::Invalid { var, reason: e.to_string() }
                }),
            }
        };

        let db = DbConfig {
            host: required("DB_HOST")?,
            port: port_or("DB_PORT", 3306)?,
            user: required("DB_USER")?,
            password: required("DB_PASSWORD")?,
            database: required("DB_NAME")?,
        };

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".into()),
            port: port_or("PORT", 8080)?,
            db,
            credentials: Credentials::from_lookup(&lookup),
        })
    }
}

impl Credentials {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let accounts = ACCOUNT_VARS.iter().filter_map(|&(user_var, pass_var)| {
            // half-configured accounts are skipped
            Some(Account { username: lookup(user_var)?, password: lookup(pass_var)? })
        });
        Self::from_accounts(accounts)
    }

    // A username configured twice keeps the later password.
    fn from_accounts(iter: impl IntoIterator<Item = Account>) -> Self {
        let mut accounts: Vec<Account> = Vec::new();
        for account in iter {
            match accounts.iter_mut().find(|a| a.username == account.username) {
                Some(existing) => existing.password = account.password,
                None => accounts.push(account),
            }
        }
        Self { accounts }
    }

    #[cfg(test)]
    pub fn with_accounts<I, U, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        Self::from_accounts(
            pairs
                .into_iter()
                .map(|(u, p)| Account { username: u.into(), password: p.into() }),
        )
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Exact match on both username and that account's password.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.accounts
            .iter()
            .any(|a| a.username == username && a.password == password)
    }
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let users: Vec<&str> = self.accounts.iter().map(|a| a.username.as_str()).collect();
        f.debug_struct("Credentials").field("users", &users).finish()
    }
}
