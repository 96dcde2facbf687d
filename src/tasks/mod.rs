//! Background scheduled tasks.
//!
//! Call `spawn_all` once during startup. Request-time gating reads the
//! tenant's end dates directly, so these tasks only keep stored statuses
//! in line with them.

use crate::services::TenantService;

const EXPIRY_SWEEP_INTERVAL_SECS: u64 = 60 * 60;

/// Spawn all background tasks. Detaches via `tokio::spawn`; does not block.
pub fn spawn_all(tenant_service: TenantService) {
    // Hourly: trials and subscriptions past their end date become expired
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(EXPIRY_SWEEP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            match tenant_service.expire_lapsed().await {
                Ok(0) => log::debug!("Expiry sweep: nothing to expire"),
                Ok(n) => log::info!("Expiry sweep: {n} stores expired"),
                Err(e) => log::error!("Expiry sweep failed: {e:?}"),
            }
        }
    });
}
