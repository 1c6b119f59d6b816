use std::collections::VecDeque;
use std::sync::Mutex;

use serde::Serialize;

pub const DEFAULT_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RequestStat {
    /// Unix seconds.
    pub timestamp: i64,
    pub simulations: usize,
    pub simulation_time_ms: u64,
    pub response_time_ms: u64,
    pub success: bool,
}

impl RequestStat {
    pub fn now(simulations: usize, simulation_time_ms: u64, response_time_ms: u64, success: bool) -> Self {
        Self {
            timestamp: chrono::Utc::now().timestamp(),
            simulations,
            simulation_time_ms,
            response_time_ms,
            success,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StatsSummary {
    pub total_requests: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub avg_simulations: f64,
    pub avg_simulation_time_ms: f64,
    pub avg_response_time_ms: f64,
}

/// Most recent request stats, oldest evicted first once `capacity` is hit.
#[derive(Debug)]
pub struct RequestLog {
    capacity: usize,
    entries: Mutex<VecDeque<RequestStat>>,
}

impl Default for RequestLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl RequestLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn record(&self, stat: RequestStat) {
        let mut entries = self.lock();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(stat);
    }

    pub fn snapshot(&self) -> Vec<RequestStat> {
        self.lock().iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn summary(&self) -> StatsSummary {
        let stats = self.snapshot();
        let total = stats.len();
        if total == 0 {
            return StatsSummary::default();
        }

        let success_count = stats.iter().filter(|s| s.success).count();
        let sum_sims: usize = stats.iter().map(|s| s.simulations).sum();
        let sum_sim_ms: u64 = stats.iter().map(|s| s.simulation_time_ms).sum();
        let sum_resp_ms: u64 = stats.iter().map(|s| s.response_time_ms).sum();
        let n = total as f64;

        StatsSummary {
            total_requests: total,
            success_count,
            error_count: total - success_count,
            avg_simulations: sum_sims as f64 / n,
            avg_simulation_time_ms: sum_sim_ms as f64 / n,
            avg_response_time_ms: sum_resp_ms as f64 / n,
        }
    }

    // A poisoned lock only means a recorder panicked mid-push; the deque is still usable.
    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<RequestStat>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
