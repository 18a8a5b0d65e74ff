use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep, Instant};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("condition not met within {0:?}")]
pub struct WaitTimeout(pub Duration);

/// Polls `probe` every `interval` until it yields a value or `timeout`
/// elapses. The first probe runs immediately.
pub async fn wait_for<T, F>(mut probe: F, timeout: Duration, interval: Duration) -> Result<T, WaitTimeout>
where
    F: FnMut() -> Option<T>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(value) = probe() {
            return Ok(value);
        }
        if Instant::now() + interval > deadline {
            return Err(WaitTimeout(timeout));
        }
        sleep(interval).await;
    }
}
