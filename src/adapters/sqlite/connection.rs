//! Connection pooling and migrations.

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::utils::error::{PopulationError, Result};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// How long a connection waits on a locked database before giving up.
pub const BUSY_TIMEOUT_MS: u32 = 5000;

/// Pragmas applied to every pooled connection.
///
/// WAL lets readers run alongside the single writer; `busy_timeout` makes
/// writers queue behind each other instead of failing with SQLITE_BUSY.
#[derive(Debug, Clone, Copy)]
pub struct SqlitePragmas {
    pub busy_timeout_ms: u32,
}

impl Default for SqlitePragmas {
    fn default() -> Self {
        Self {
            busy_timeout_ms: BUSY_TIMEOUT_MS,
        }
    }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        // busy_timeout 要先設定，切換 WAL 本身也需要取得鎖
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;",
            self.busy_timeout_ms
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Create a connection pool for `database_url`.
///
/// An in-memory database lives only as long as its connection, so `:memory:`
/// gets a single shared connection.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    let max_size = if database_url == ":memory:" { 1 } else { 4 };
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(SqlitePragmas::default()))
        .build(manager)
        .map_err(|e| PopulationError::DatabaseError {
            message: format!("cannot open {}: {}", database_url, e),
        })
}

/// Apply pending migrations. Safe to call on every start.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PopulationError::DatabaseError {
            message: format!("migration failed: {}", e),
        })?;
    Ok(())
}
