use async_trait::async_trait;
use diesel::prelude::*;
use std::collections::BTreeMap;

use super::connection::{create_pool, run_migrations, DbPool};
use super::model::{HistoryRow, NewHistoryRow};
use super::schema::population_history;
use crate::domain::model::HistoryEntry;
use crate::domain::ports::HistoryStore;
use crate::utils::error::Result;

/// SQLite-backed population history, one row per species per step.
pub struct SqliteHistoryStore {
    pool: DbPool,
    database_url: String,
}

impl SqliteHistoryStore {
    pub fn new(pool: DbPool, database_url: impl Into<String>) -> Self {
        Self {
            pool,
            database_url: database_url.into(),
        }
    }

    /// Open (creating if needed) the database and apply migrations.
    pub fn open(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url)?;
        run_migrations(&pool)?;
        tracing::debug!("🗄️ History database ready at {}", database_url);
        Ok(Self::new(pool, database_url))
    }
}

/// Fold rows (sorted by step) into one entry per step.
pub fn group_rows(rows: Vec<HistoryRow>) -> Vec<HistoryEntry> {
    let mut entries: Vec<HistoryEntry> = Vec::new();

    for row in rows {
        let time = row.time_step.max(0) as u64;
        match entries.last_mut() {
            Some(entry) if entry.time == time => {
                entry.populations.insert(row.species, row.population);
            }
            _ => entries.push(HistoryEntry {
                time,
                populations: BTreeMap::from([(row.species, row.population)]),
            }),
        }
    }

    entries
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn save_step(&self, time_step: u64, populations: &BTreeMap<String, f64>) -> Result<()> {
        let rows: Vec<NewHistoryRow> = populations
            .iter()
            .map(|(species, population)| NewHistoryRow {
                time_step: time_step as i64,
                species: species.clone(),
                population: *population,
            })
            .collect();

        let mut conn = self.pool.get()?;
        // 直接取得寫鎖，避免讀轉寫時的 SQLITE_BUSY
        conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
            for row in &rows {
                diesel::insert_into(population_history::table)
                    .values(row)
                    .execute(conn)?;
            }
            Ok(())
        })?;

        Ok(())
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>> {
        use population_history::dsl;

        let mut conn = self.pool.get()?;
        let rows = dsl::population_history
            .select((dsl::time_step, dsl::species, dsl::population))
            .order((dsl::time_step.asc(), dsl::id.asc()))
            .load::<HistoryRow>(&mut conn)?;

        Ok(group_rows(rows))
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(population_history::table).execute(&mut conn)?;
        tracing::debug!("Cleared {} history rows", deleted);
        Ok(())
    }

    fn location(&self) -> &str {
        &self.database_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{step_populations, GOLEM, VAMPIRE};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, SqliteHistoryStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("population_data.db");
        let store = SqliteHistoryStore::open(path.to_str().unwrap()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_group_rows_merges_same_step() {
        let rows = vec![
            HistoryRow { time_step: 1, species: GOLEM.into(), population: 145.0 },
            HistoryRow { time_step: 1, species: VAMPIRE.into(), population: 900.0 },
            HistoryRow { time_step: 2, species: GOLEM.into(), population: 170.0 },
        ];

        let entries = group_rows(rows);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].populations.len(), 2);
        assert_eq!(entries[1].population(GOLEM), Some(170.0));
        assert_eq!(entries[1].population(VAMPIRE), None);
    }

    #[tokio::test]
    async fn test_save_and_read_history() {
        let (_dir, store) = temp_store();

        store.save_step(1, &step_populations(145.0, 900.0)).await.unwrap();
        store.save_step(2, &step_populations(160.0, 850.0)).await.unwrap();

        let history = store.history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].time, 1);
        assert_eq!(history[0].population(GOLEM), Some(145.0));
        assert_eq!(history[1].population(VAMPIRE), Some(850.0));
    }

    #[tokio::test]
    async fn test_history_is_ordered_by_step() {
        let (_dir, store) = temp_store();

        store.save_step(3, &step_populations(3.0, 3.0)).await.unwrap();
        store.save_step(1, &step_populations(1.0, 1.0)).await.unwrap();
        store.save_step(2, &step_populations(2.0, 2.0)).await.unwrap();

        let steps: Vec<u64> = store.history().await.unwrap().iter().map(|e| e.time).collect();
        assert_eq!(steps, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let (_dir, store) = temp_store();
        store.save_step(1, &step_populations(1.0, 1.0)).await.unwrap();

        store.clear().await.unwrap();
        assert!(store.history().await.unwrap().is_empty());

        // 清空兩次也不應失敗
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_reopen_keeps_history() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("population_data.db");
        let url = path.to_str().unwrap();

        {
            let store = SqliteHistoryStore::open(url).unwrap();
            store.save_step(1, &step_populations(145.0, 900.0)).await.unwrap();
        }

        let reopened = SqliteHistoryStore::open(url).unwrap();
        assert_eq!(reopened.history().await.unwrap().len(), 1);
        assert_eq!(reopened.location(), url);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reads_and_writes_do_not_lock() {
        let (_dir, store) = temp_store();
        let store = Arc::new(store);

        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                let mut errors = Vec::new();
                for step in 1..=200u64 {
                    if let Err(e) = store.save_step(step, &step_populations(step as f64, 1.0)).await {
                        errors.push(e.to_string());
                    }
                }
                errors
            })
        };

        let readers: Vec<_> = (0..3)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    let mut errors = Vec::new();
                    for _ in 0..200 {
                        if let Err(e) = store.history().await {
                            errors.push(e.to_string());
                        }
                    }
                    errors
                })
            })
            .collect();

        let mut errors = writer.await.unwrap();
        for reader in readers {
            errors.extend(reader.await.unwrap());
        }

        assert!(errors.is_empty(), "lock errors: {:?}", errors);
        assert_eq!(store.history().await.unwrap().len(), 200);
    }
}
