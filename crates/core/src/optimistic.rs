//! Optimistic mutation helper.
//!
//! Applies a local change before the remote write resolves and undoes it if
//! the write fails. This is a compensating action, not a transaction: a
//! concurrent writer that touched the same state in between is overwritten by
//! the revert.

use std::future::Future;

/// Run `apply`, await `commit`, and run `revert` if `commit` fails.
///
/// The commit error is returned unchanged so callers can surface it.
pub async fn optimistic<T, E, A, C, R>(apply: A, commit: C, revert: R) -> Result<T, E>
where
    A: FnOnce(),
    C: Future<Output = Result<T, E>>,
    R: FnOnce(),
{
    apply();
    match commit.await {
        Ok(value) => Ok(value),
        Err(err) => {
            revert();
            Err(err)
        }
    }
}
