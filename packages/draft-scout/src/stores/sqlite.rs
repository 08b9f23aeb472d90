//! SQLite storage implementation.
//!
//! A file-based storage backend using SQLite. Good for:
//! - Local development
//! - Feeding downstream analysis that prefers SQL over JSON
//!
//! Stat blocks are kept as JSON in `stats_json`; the identifying and
//! biographical columns are first-class so they can be queried directly.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

use crate::error::{StoreError, StoreResult};
use crate::traits::store::PlayerStore;
use crate::types::player::PlayerRecord;

fn db_err(e: sqlx::Error) -> StoreError {
    StoreError::Database(Box::new(e))
}

/// SQLite-backed player store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store with the given connection URL.
    ///
    /// # Example URLs
    /// - `sqlite::memory:` - In-memory database (ephemeral)
    /// - `sqlite://data/players.db?mode=rwc` - Create if not exists
    pub async fn new(database_url: &str) -> StoreResult<Self> {
        Self::connect(database_url, 5).await
    }

    /// Create an in-memory SQLite store (for testing).
    ///
    /// Uses a single connection; every new in-memory connection would
    /// otherwise see its own empty database.
    pub async fn in_memory() -> StoreResult<Self> {
        Self::connect("sqlite::memory:", 1).await
    }

    async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(db_err)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run database migrations.
    async fn run_migrations(&self) -> StoreResult<()> {
        // college is '' rather than NULL so the unique key treats
        // unknown colleges as equal.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS players (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                college TEXT NOT NULL DEFAULT '',
                position TEXT NOT NULL,
                age INTEGER,
                height INTEGER,
                weight INTEGER,
                stats_link TEXT,
                draft_pick INTEGER,
                career_av INTEGER,
                drafted INTEGER NOT NULL DEFAULT 0,
                stats_json TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(name, college, position)
            );

            CREATE INDEX IF NOT EXISTS idx_players_position ON players(position);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[derive(Debug, FromRow)]
struct PlayerRow {
    name: String,
    college: String,
    position: String,
    age: Option<i64>,
    height: Option<i64>,
    weight: Option<i64>,
    stats_link: Option<String>,
    draft_pick: Option<i64>,
    career_av: Option<i64>,
    drafted: bool,
    stats_json: String,
}

impl PlayerRow {
    fn into_record(self) -> StoreResult<PlayerRecord> {
        let stats: serde_json::Value = serde_json::from_str(&self.stats_json)?;
        let draft = self.drafted.then(|| {
            json!({
                "pick": self.draft_pick,
                "career_av": self.career_av,
            })
        });

        // Route through serde so the stat block is checked against the position.
        let value = json!({
            "name": self.name,
            "position": self.position,
            "age": self.age,
            "height": self.height,
            "weight": self.weight,
            "college": (!self.college.is_empty()).then_some(self.college),
            "stats_link": self.stats_link,
            "draft": draft,
            "stats": stats,
        });
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl PlayerStore for SqliteStore {
    async fn upsert(&self, players: &[PlayerRecord]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let now = Utc::now().to_rfc3339();

        for player in players {
            let stats_json = serde_json::to_string(player.stats())?;
            let draft = player.draft.clone().unwrap_or_default();

            sqlx::query(
                r#"
                INSERT INTO players
                    (name, college, position, age, height, weight, stats_link,
                     draft_pick, career_av, drafted, stats_json, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(name, college, position) DO UPDATE SET
                    age = excluded.age,
                    height = excluded.height,
                    weight = excluded.weight,
                    stats_link = excluded.stats_link,
                    draft_pick = excluded.draft_pick,
                    career_av = excluded.career_av,
                    drafted = excluded.drafted,
                    stats_json = excluded.stats_json,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(&player.name)
            .bind(player.college.as_deref().unwrap_or(""))
            .bind(player.position().code())
            .bind(player.age.map(i64::from))
            .bind(player.height.map(i64::from))
            .bind(player.weight.map(i64::from))
            .bind(&player.stats_link)
            .bind(draft.pick.map(i64::from))
            .bind(draft.career_av)
            .bind(player.draft.is_some())
            .bind(&stats_json)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn load_all(&self) -> StoreResult<Vec<PlayerRecord>> {
        let rows = sqlx::query_as::<_, PlayerRow>(
            r#"
            SELECT name, college, position, age, height, weight, stats_link,
                   draft_pick, career_av, drafted, stats_json
            FROM players
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(PlayerRow::into_record).collect()
    }

    async fn count(&self) -> StoreResult<usize> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM players")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}
