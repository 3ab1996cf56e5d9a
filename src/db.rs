//! SQLite pool and embedded schema migrations.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Pragmas every pooled connection starts with.
#[derive(Debug, Clone, Copy)]
struct SitePragmas {
    busy_timeout: Duration,
}

impl SitePragmas {
    fn script(&self) -> String {
        format!(
            "PRAGMA busy_timeout = {}; \
             PRAGMA journal_mode = WAL; \
             PRAGMA synchronous = NORMAL; \
             PRAGMA foreign_keys = ON;",
            self.busy_timeout.as_millis()
        )
    }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&self.script())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Opens the pool for `database_url`, creating the file if needed.
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, PoolError> {
    Pool::builder()
        .connection_customizer(Box::new(SitePragmas {
            busy_timeout: BUSY_TIMEOUT,
        }))
        .build(ConnectionManager::<SqliteConnection>::new(database_url))
}

pub fn get_connection(pool: &DbPool) -> Result<DbConnection, PoolError> {
    pool.get().inspect_err(|e| log::error!("No database connection available: {e}"))
}

/// Brings the schema up to date and returns the number of migrations run.
pub fn run_migrations(pool: &DbPool) -> Result<usize, String> {
    let mut conn = get_connection(pool).map_err(|e| e.to_string())?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| format!("Failed to run migrations: {e}"))?;
    applied
        .iter()
        .for_each(|version| log::info!("Applied migration {version}"));
    Ok(applied.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pragmas_enable_wal_and_foreign_keys() {
        let script = SitePragmas {
            busy_timeout: Duration::from_millis(250),
        }
        .script();
        assert!(script.starts_with("PRAGMA busy_timeout = 250;"));
        assert!(script.contains("journal_mode = WAL"));
        assert!(script.contains("foreign_keys = ON"));
    }
}
