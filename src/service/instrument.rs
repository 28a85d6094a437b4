//! Timing wrapper for cache-touching operations.

use std::future::Future;
use std::time::Instant;

use tracing::debug;

/// Runs `operation`, logs its name and elapsed time, and hands back its output
/// untouched.
///
/// ```ignore
/// let users = timed("user.list", cached.list()).await?;
/// ```
pub async fn timed<F, T>(operation: &str, fut: F) -> T
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let output = fut.await;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    debug!(operation, elapsed_ms, "Operation finished");
    output
}
