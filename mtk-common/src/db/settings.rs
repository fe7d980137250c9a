//! Settings database access
//!
//! Read/write runtime settings from the `settings` table (key-value store).

use crate::config::{RankingConfig, DEFAULT_DEBOUNCE_MS};
use crate::{Error, Result};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::debug;

/// Setting key for the ranking client's debounce quiet period
pub const RANKING_DEBOUNCE_MS: &str = "ranking_debounce_ms";

/// Insert defaults for any setting that is missing
///
/// Defaults come from the bootstrap config, so its values seed a new
/// database. Values already stored are left alone.
pub async fn init_default_settings(db: &SqlitePool, ranking: &RankingConfig) -> Result<()> {
    let defaults = [(RANKING_DEBOUNCE_MS, ranking.debounce_ms.to_string())];

    for (key, value) in defaults {
        let inserted = sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(&value)
            .execute(db)
            .await?
            .rows_affected();

        if inserted > 0 {
            debug!("Initialized default setting {} = {}", key, value);
        }
    }

    Ok(())
}

/// Generic setting getter
///
/// Returns `None` when the key is absent or its value is NULL.
pub async fn get_setting<T: FromStr>(db: &SqlitePool, key: &str) -> Result<Option<T>> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(db)
            .await?;

    match value.flatten() {
        Some(s) => match s.parse::<T>() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(Error::Config(format!(
                "Failed to parse setting '{}' value: {}",
                key, s
            ))),
        },
        None => Ok(None),
    }
}

/// Generic setting setter (insert or update)
pub async fn set_setting<T: ToString>(db: &SqlitePool, key: &str, value: T) -> Result<()> {
    let value_str = value.to_string();

    sqlx::query(
        r#"
        INSERT INTO settings (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(key)
    .bind(value_str)
    .execute(db)
    .await?;

    Ok(())
}

/// Debounce quiet period for ranking clients, in milliseconds
pub async fn get_ranking_debounce_ms(db: &SqlitePool) -> Result<u64> {
    Ok(get_setting::<u64>(db, RANKING_DEBOUNCE_MS)
        .await?
        .unwrap_or(DEFAULT_DEBOUNCE_MS))
}
