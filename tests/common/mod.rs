//! Shared helpers for integration tests.

use std::path::PathBuf;

use lexsite::db::{DbPool, establish_connection_pool, run_migrations};
use tempfile::TempDir;

/// Fresh migrated SQLite database living in a temporary directory that is
/// removed on drop.
pub struct TestDb {
    pool: DbPool,
    path: PathBuf,
    _dir: TempDir,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("build pool");
        run_migrations(&pool).expect("run migrations");
        Self {
            pool,
            path,
            _dir: dir,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
