//! Few-attempt retry for repository calls that may hit a busy database.

use std::thread;
use std::time::Duration;

use crate::repository::errors::RepositoryResult;

pub const DEFAULT_ATTEMPTS: usize = 3;
const BACKOFF: Duration = Duration::from_millis(50);

/// Runs `op` up to `attempts` times, retrying only transient errors.
/// Sleeps the calling thread between attempts.
pub fn with_retry<T>(
    attempts: usize,
    mut op: impl FnMut() -> RepositoryResult<T>,
) -> RepositoryResult<T> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Err(err) if err.is_transient() && attempt < attempts => {
                log::warn!("Attempt {attempt}/{attempts} failed, retrying: {err}");
                thread::sleep(BACKOFF * attempt as u32);
                attempt += 1;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::errors::RepositoryError;

    #[test]
    fn retries_transient_errors_until_success() {
        let mut calls = 0;
        let result = with_retry(3, || {
            calls += 1;
            if calls < 3 {
                Err(RepositoryError::ConnectionError("busy".into()))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn gives_up_after_the_last_attempt() {
        let mut calls = 0;
        let result: RepositoryResult<()> = with_retry(3, || {
            calls += 1;
            Err(RepositoryError::DatabaseError("locked".into()))
        });
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }

    #[test]
    fn permanent_errors_are_not_retried() {
        let mut calls = 0;
        let result: RepositoryResult<()> = with_retry(3, || {
            calls += 1;
            Err(RepositoryError::NotFound)
        });
        assert!(matches!(result, Err(RepositoryError::NotFound)));
        assert_eq!(calls, 1);
    }
}
