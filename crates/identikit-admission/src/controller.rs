use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, info, warn};

/// Default quota per client between two sweeps.
pub const DEFAULT_LIMIT: u64 = 1000;
/// Default period between sweeps.
pub const DEFAULT_RESET_INTERVAL: Duration = Duration::from_secs(5 * 60);
/// Default usage at which a client is reported during a sweep.
pub const DEFAULT_REPORT_THRESHOLD: u64 = 1000;
/// Shortest period the sweeper runs with; shorter intervals are raised to it.
pub const MIN_RESET_INTERVAL: Duration = Duration::from_secs(1);

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Admitted; `total` is the client's usage after this request.
    Allow { total: u64 },
    /// Rejected; `current` is the unchanged usage that reached the limit.
    Deny { current: u64 },
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allow { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaPolicy {
    pub limit: u64,
    /// `None` disables reporting of heavy clients.
    pub report_threshold: Option<u64>,
    pub reset_interval: Duration,
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            report_threshold: Some(DEFAULT_REPORT_THRESHOLD),
            reset_interval: DEFAULT_RESET_INTERVAL,
        }
    }
}

/// Result of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Number of client entries dropped.
    pub cleared: usize,
    /// Clients at or above the reporting threshold, sorted by key.
    pub heavy_clients: Vec<(String, u64)>,
}

/// Tracks cumulative per-client usage against a quota.
///
/// The decision and the increment happen under the same lock, so concurrent
/// requests for one key never admit more than one request past the limit.
/// An admitted request may overshoot: usage 3 with limit 5 still admits a
/// request for 3.
#[derive(Debug, Default)]
pub struct AdmissionController {
    policy: QuotaPolicy,
    usage: Mutex<HashMap<String, u64>>,
}

impl AdmissionController {
    /// A `reset_interval` below [`MIN_RESET_INTERVAL`] is raised to it.
    pub fn new(mut policy: QuotaPolicy) -> Self {
        if policy.reset_interval < MIN_RESET_INTERVAL {
            warn!(
                requested_ms = policy.reset_interval.as_millis() as u64,
                "reset interval too short; using the minimum"
            );
            policy.reset_interval = MIN_RESET_INTERVAL;
        }
        Self {
            policy,
            usage: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> &QuotaPolicy {
        &self.policy
    }

    /// Admit `requested` records for `client_key` against the configured limit.
    pub fn admit(&self, client_key: &str, requested: u64) -> Admission {
        self.admit_with_limit(client_key, requested, self.policy.limit)
    }

    pub fn admit_with_limit(&self, client_key: &str, requested: u64, limit: u64) -> Admission {
        let mut usage = self.lock();
        let current = usage.get(client_key).copied().unwrap_or(0);
        if current >= limit {
            debug!(client = %client_key, current, limit, "admission denied");
            return Admission::Deny { current };
        }

        let total = current.saturating_add(requested);
        usage.insert(client_key.to_string(), total);
        Admission::Allow { total }
    }

    /// Usage recorded for `client_key` since the last sweep.
    pub fn usage(&self, client_key: &str) -> u64 {
        self.lock().get(client_key).copied().unwrap_or(0)
    }

    /// Number of clients with recorded usage.
    pub fn tracked_clients(&self) -> usize {
        self.lock().len()
    }

    /// Report heavy clients, then replace the table with an empty one.
    pub fn sweep(&self) -> SweepReport {
        let mut usage = self.lock();
        let table = std::mem::take(&mut *usage);

        let mut heavy_clients: Vec<(String, u64)> = match self.policy.report_threshold {
            Some(threshold) => table
                .iter()
                .filter(|(_, count)| **count >= threshold)
                .map(|(key, count)| (key.clone(), *count))
                .collect(),
            None => Vec::new(),
        };
        heavy_clients.sort();

        for (client, count) in &heavy_clients {
            info!(client = %client, count, "heavy client before quota reset");
        }
        debug!(cleared = table.len(), "quota table reset");

        SweepReport {
            cleared: table.len(),
            heavy_clients,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        self.usage.lock().unwrap_or_else(|poisoned| {
            warn!("quota table lock poisoned; recovering");
            poisoned.into_inner()
        })
    }
}
