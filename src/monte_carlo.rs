use std::collections::HashMap;
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::best_of::BestOf;
use crate::error::Result;
use crate::sim::{SimulatedMatch, simulate_match};

pub const DEFAULT_SAMPLES: usize = 1_000_000;
pub const DEFAULT_CHUNK_SIZE: usize = 8_192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    pub samples: usize,
    /// Chunk `i` of the run is seeded with `seed + i`; `None` draws entropy.
    pub seed: Option<u64>,
    /// Matches per rayon task. Each task owns its generator.
    pub chunk_size: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            seed: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl SimConfig {
    /// Non-positive counts fall back to [`DEFAULT_SAMPLES`].
    pub fn with_samples(n: i64) -> Self {
        Self {
            samples: if n > 0 { n as usize } else { DEFAULT_SAMPLES },
            ..Self::default()
        }
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn effective_samples(&self) -> usize {
        if self.samples == 0 {
            DEFAULT_SAMPLES
        } else {
            self.samples
        }
    }
}

/// Simulates `n` independent matches between servers `p_a` and `p_b`.
///
/// Fails before any simulation when `best_of` is not 3 or 5.
pub fn simulate(p_a: f64, p_b: f64, best_of: u32, n: i64) -> Result<Vec<SimulatedMatch>> {
    simulate_with(p_a, p_b, best_of, &SimConfig::with_samples(n))
}

pub fn simulate_with(
    p_a: f64,
    p_b: f64,
    best_of: u32,
    config: &SimConfig,
) -> Result<Vec<SimulatedMatch>> {
    let best_of = BestOf::try_from(best_of)?;
    let samples = config.effective_samples();
    let chunk_size = config.chunk_size.max(1);
    let chunks = samples.div_ceil(chunk_size);
    let seed = config.seed;

    let started = Instant::now();
    let matches: Vec<SimulatedMatch> = (0..chunks)
        .into_par_iter()
        .flat_map_iter(|idx| {
            let len = chunk_size.min(samples - idx * chunk_size);
            let mut rng = match seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(idx as u64)),
                None => ChaCha8Rng::from_entropy(),
            };
            (0..len).map(move |_| simulate_match(p_a, p_b, best_of, &mut rng))
        })
        .collect();

    debug!(
        p_a,
        p_b,
        best_of = best_of.sets(),
        samples,
        chunks,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "simulated match batch"
    );
    Ok(matches)
}

/// One observed `(a, b)` score pair and its relative frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreFrequency {
    pub a: u32,
    pub b: u32,
    pub count: u64,
    pub probability: f64,
}

/// Empirical joint distribution of `(a, b)` scores over a batch of matches,
/// sorted by score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreTable {
    samples: usize,
    entries: Vec<ScoreFrequency>,
}

impl ScoreTable {
    /// Sets won by (A, B).
    pub fn sets(matches: &[SimulatedMatch]) -> Self {
        Self::tally(matches, |m| (m.a_sets, m.b_sets))
    }

    /// Games won by (A, B), summed over every set of the match.
    pub fn games(matches: &[SimulatedMatch]) -> Self {
        Self::tally(matches, SimulatedMatch::games_won)
    }

    fn tally<F>(matches: &[SimulatedMatch], key: F) -> Self
    where
        F: Fn(&SimulatedMatch) -> (u32, u32) + Sync,
    {
        let counts = matches
            .par_iter()
            .fold(HashMap::new, |mut acc, m| {
                *acc.entry(key(m)).or_insert(0u64) += 1;
                acc
            })
            .reduce(HashMap::new, merge_counts);
        Self::from_counts(counts, matches.len())
    }

    pub fn from_counts(counts: HashMap<(u32, u32), u64>, samples: usize) -> Self {
        let mut entries: Vec<ScoreFrequency> = counts
            .into_iter()
            .map(|((a, b), count)| ScoreFrequency {
                a,
                b,
                count,
                probability: count as f64 / samples as f64,
            })
            .collect();
        entries.sort_by_key(|e| (e.a, e.b));
        Self { samples, entries }
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn entries(&self) -> &[ScoreFrequency] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    pub fn probability_of(&self, a: u32, b: u32) -> f64 {
        self.entries
            .iter()
            .find(|e| e.a == a && e.b == b)
            .map_or(0.0, |e| e.probability)
    }

    /// Share of samples whose score satisfies `pred`. `NaN` for an empty table.
    pub fn share_where(&self, pred: impl Fn(u32, u32) -> bool) -> f64 {
        let hits: u64 = self
            .entries
            .iter()
            .filter(|e| pred(e.a, e.b))
            .map(|e| e.count)
            .sum();
        hits as f64 / self.samples as f64
    }

    pub fn total_probability(&self) -> f64 {
        self.entries.iter().map(|e| e.probability).sum()
    }
}

fn merge_counts(
    mut left: HashMap<(u32, u32), u64>,
    mut right: HashMap<(u32, u32), u64>,
) -> HashMap<(u32, u32), u64> {
    if left.len() < right.len() {
        std::mem::swap(&mut left, &mut right);
    }
    for (key, count) in right {
        *left.entry(key).or_insert(0) += count;
    }
    left
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::sim::SimulatedSet;

    fn straight_sets(a_first: bool) -> SimulatedMatch {
        let set = if a_first {
            SimulatedSet { a_games: 6, b_games: 3 }
        } else {
            SimulatedSet { a_games: 3, b_games: 6 }
        };
        SimulatedMatch {
            a_sets: if a_first { 2 } else { 0 },
            b_sets: if a_first { 0 } else { 2 },
            sets: vec![set, set],
        }
    }

    #[test]
    fn rejects_bad_format_before_simulating() {
        for bad in [1, 2, 4, 6, 7] {
            assert_eq!(
                simulate(0.6, 0.6, bad, 10).unwrap_err(),
                SimError::InvalidConfiguration { best_of: bad }
            );
        }
    }

    #[test]
    fn non_positive_count_uses_default() {
        assert_eq!(SimConfig::with_samples(0).samples, DEFAULT_SAMPLES);
        assert_eq!(SimConfig::with_samples(-5).samples, DEFAULT_SAMPLES);
        assert_eq!(SimConfig::with_samples(250).samples, 250);
    }

    #[test]
    fn returns_requested_count_across_uneven_chunks() {
        let config = SimConfig {
            samples: 1_001,
            seed: Some(3),
            chunk_size: 100,
        };
        let matches = simulate_with(0.6, 0.6, 3, &config).unwrap();
        assert_eq!(matches.len(), 1_001);
    }

    #[test]
    fn seeded_runs_repeat() {
        let config = SimConfig {
            samples: 2_000,
            seed: Some(42),
            chunk_size: 256,
        };
        let first = simulate_with(0.64, 0.61, 5, &config).unwrap();
        let second = simulate_with(0.64, 0.61, 5, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn tally_counts_exact_pairs() {
        let matches = vec![straight_sets(true), straight_sets(true), straight_sets(false), straight_sets(true)];

        let sets = ScoreTable::sets(&matches);
        assert_eq!(sets.samples(), 4);
        assert_eq!(sets.entries().len(), 2);
        assert_eq!(sets.probability_of(2, 0), 0.75);
        assert_eq!(sets.probability_of(0, 2), 0.25);
        assert_eq!(sets.probability_of(2, 1), 0.0);

        let games = ScoreTable::games(&matches);
        assert_eq!(games.probability_of(12, 6), 0.75);
        assert_eq!(games.probability_of(6, 12), 0.25);
        assert!((games.total_probability() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn entries_are_sorted() {
        let matches = vec![straight_sets(true), straight_sets(false)];
        let sets = ScoreTable::sets(&matches);
        let keys: Vec<(u32, u32)> = sets.entries().iter().map(|e| (e.a, e.b)).collect();
        assert_eq!(keys, vec![(0, 2), (2, 0)]);
    }

    #[test]
    fn empty_table_shares_are_nan() {
        let table = ScoreTable::sets(&[]);
        assert!(table.is_empty());
        assert!(table.entries().is_empty());
        assert!(table.share_where(|a, b| a > b).is_nan());
    }

    #[test]
    fn merge_is_elementwise_sum() {
        let left = HashMap::from([((2, 0), 3), ((2, 1), 1)]);
        let right = HashMap::from([((2, 0), 2), ((0, 2), 5)]);
        let merged = merge_counts(left, right);
        assert_eq!(merged[&(2, 0)], 5);
        assert_eq!(merged[&(2, 1)], 1);
        assert_eq!(merged[&(0, 2)], 5);
    }
}
