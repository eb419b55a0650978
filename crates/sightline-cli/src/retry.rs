//! Startup discovery with a single bounded retry.

use std::time::Duration;

use anyhow::{Result, bail};
use sightline_core::{Error, FixedDelay, ProcessHandle, retry_with};
use tracing::{error, info};

use crate::shutdown::ShutdownSignal;

/// Locate the target process and its module.
///
/// A discovery failure is logged and retried once after `delay`; a second
/// failure, or any other error, is fatal for the run. Returns `Ok(None)` if shutdown was signaled while
/// waiting.
pub fn discover_with_retry(
    process_name: &str,
    module_name: &str,
    delay: Duration,
    shutdown: &ShutdownSignal,
) -> Result<Option<ProcessHandle>> {
    info!("Looking for {} ({})...", process_name, module_name);

    let result = retry_with(
        &FixedDelay::once(delay),
        Error::is_discovery,
        |d| shutdown.wait(d),
        || ProcessHandle::find_and_open(process_name, module_name),
    );

    match result {
        Ok(process) => {
            info!(
                "Found {} (pid {}, {} base: {})",
                process_name, process.pid, module_name, process.base_address
            );
            Ok(Some(process))
        }
        Err(_) if shutdown.is_shutdown() => Ok(None),
        Err(e) => {
            error!("Discovery failed: {}", e);
            bail!("could not attach to {}: {}", process_name, e)
        }
    }
}
