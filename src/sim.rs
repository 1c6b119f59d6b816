use rand::Rng;
use serde::Serialize;

use crate::best_of::BestOf;
use crate::game_prob::game_win_probability;
use crate::tiebreak::tiebreak_win_probability;

const GAMES_FOR_SET: u32 = 6;

/// Games won by each side in one finished set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SimulatedSet {
    pub a_games: u32,
    pub b_games: u32,
}

impl SimulatedSet {
    pub fn a_won(&self) -> bool {
        self.a_games > self.b_games
    }

    pub fn games_played(&self) -> u32 {
        self.a_games + self.b_games
    }

    /// 6-0 through 6-4, 7-5 or 7-6, either way round.
    pub fn is_valid(&self) -> bool {
        let (hi, lo) = if self.a_games >= self.b_games {
            (self.a_games, self.b_games)
        } else {
            (self.b_games, self.a_games)
        };
        (hi == 6 && lo <= 4) || (hi == 7 && (lo == 5 || lo == 6))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SimulatedMatch {
    pub a_sets: u32,
    pub b_sets: u32,
    pub sets: Vec<SimulatedSet>,
}

impl SimulatedMatch {
    pub fn a_won(&self) -> bool {
        self.a_sets > self.b_sets
    }

    /// Total games won by (A, B) across every set of the match.
    pub fn games_won(&self) -> (u32, u32) {
        self.sets
            .iter()
            .fold((0, 0), |(a, b), set| (a + set.a_games, b + set.b_games))
    }

    pub fn games_played(&self) -> u32 {
        self.sets.iter().map(SimulatedSet::games_played).sum()
    }
}

/// Single Bernoulli trial: a uniform draw in `[0, 1)` below `p`.
pub fn bernoulli<R: Rng>(rng: &mut R, p: f64) -> bool {
    rng.gen_range(0.0..1.0) < p
}

/// Plays one set game by game. The server alternates every game; a 6-6
/// set is settled by one draw against the exact tiebreak probability,
/// with the set's first server opening the tiebreak.
pub fn simulate_set<R: Rng>(p_a: f64, p_b: f64, a_serves_first: bool, rng: &mut R) -> SimulatedSet {
    let hold_a = game_win_probability(p_a);
    let hold_b = game_win_probability(p_b);

    let mut set = SimulatedSet::default();
    let mut a_serving = a_serves_first;
    loop {
        if set.a_games == GAMES_FOR_SET && set.b_games == GAMES_FOR_SET {
            let p_tiebreak = tiebreak_win_probability(p_a, p_b, a_serves_first);
            if bernoulli(rng, p_tiebreak) {
                set.a_games += 1;
            } else {
                set.b_games += 1;
            }
            return set;
        }

        let server_holds = if a_serving {
            bernoulli(rng, hold_a)
        } else {
            bernoulli(rng, hold_b)
        };
        if server_holds == a_serving {
            set.a_games += 1;
        } else {
            set.b_games += 1;
        }

        let lead = set.a_games.abs_diff(set.b_games);
        if set.a_games.max(set.b_games) >= GAMES_FOR_SET && lead >= 2 {
            return set;
        }
        a_serving = !a_serving;
    }
}

/// Plays sets until one side has `sets_to_win` of them.
///
/// A opens a set when the running game count is even, B when odd, so the
/// serve carries over set boundaries the way it does on court.
pub fn simulate_match<R: Rng>(p_a: f64, p_b: f64, best_of: BestOf, rng: &mut R) -> SimulatedMatch {
    let sets_to_win = best_of.sets_to_win();
    let mut out = SimulatedMatch {
        a_sets: 0,
        b_sets: 0,
        sets: Vec::with_capacity(best_of.sets() as usize),
    };

    let mut games_played = 0;
    while out.a_sets < sets_to_win && out.b_sets < sets_to_win {
        let set = simulate_set(p_a, p_b, games_played % 2 == 0, rng);
        if set.a_won() {
            out.a_sets += 1;
        } else {
            out.b_sets += 1;
        }
        games_played += set.games_played();
        out.sets.push(set);
    }
    out
}
