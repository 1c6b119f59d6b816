use std::env;

use crate::monte_carlo::{DEFAULT_CHUNK_SIZE, DEFAULT_SAMPLES, SimConfig};
use crate::request_stats;

/// Runtime knobs read from the environment (and `.env`, when present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub simulations: usize,
    pub seed: Option<u64>,
    pub threads: Option<usize>,
    pub stats_capacity: usize,
    pub chunk_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            simulations: DEFAULT_SAMPLES,
            seed: None,
            threads: None,
            stats_capacity: request_stats::DEFAULT_CAPACITY,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same parsing as [`Settings::from_env`], against any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str| lookup(key).and_then(|val| val.trim().parse::<u64>().ok());
        let defaults = Self::default();

        Self {
            simulations: parse("TENNIS_SIMULATIONS")
                .filter(|n| *n > 0)
                .map_or(defaults.simulations, |n| n as usize),
            seed: parse("TENNIS_SEED"),
            threads: parse("TENNIS_THREADS").map(|n| (n as usize).clamp(1, 64)),
            stats_capacity: parse("TENNIS_STATS_CAPACITY")
                .filter(|n| *n > 0)
                .map_or(defaults.stats_capacity, |n| n as usize),
            chunk_size: parse("TENNIS_CHUNK_SIZE")
                .filter(|n| *n > 0)
                .map_or(defaults.chunk_size, |n| n as usize),
        }
    }

    pub fn sim_config(&self, simulations: Option<i64>, seed: Option<u64>) -> SimConfig {
        let samples = match simulations {
            Some(n) if n > 0 => n as usize,
            _ => self.simulations,
        };
        SimConfig {
            samples,
            seed: seed.or(self.seed),
            chunk_size: self.chunk_size,
        }
    }

    pub fn build_pool(&self) -> Option<rayon::ThreadPool> {
        let threads = self.threads?;
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .ok()
    }
}
