use anyhow::{Context, Result};

use std::{io::Cursor, str::FromStr};

const ENV_FILE: &str = include_str!("../.env");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub seed_users: bool,
    pub tracking: bool,
    pub tracking_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_users: true,
            tracking: true,
            tracking_capacity: 64,
        }
    }
}

impl Config {
    /// Loads the embedded `.env` defaults (variables already set in the
    /// environment win) and reads the settings from the process environment.
    pub fn load() -> Result<Self> {
        let mut env_reader = Cursor::new(ENV_FILE);
        dotenvy::from_read(&mut env_reader).context("Failed to load embedded .env")?;

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            seed_users: read(&lookup, "USERDASH_SEED_USERS", defaults.seed_users)?,
            tracking: read(&lookup, "USERDASH_TRACKING", defaults.tracking)?,
            tracking_capacity: read(
                &lookup,
                "USERDASH_TRACKING_CAPACITY",
                defaults.tracking_capacity,
            )?,
        })
    }
}

fn read<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value {:?} for {}", raw, key)),
        None => Ok(default),
    }
}
