//! Exact win probability for a first-to-7, win-by-2 tiebreak.
//!
//! The score space is filled bottom-up, from the deepest explored total
//! back to 0-0. Scores that reach `MAX_POINTS` played without a winner are
//! valued at 0.5; only rates pinned near a coin flip get that deep with
//! any meaningful probability.

const MAX_POINTS: usize = 30;
const TARGET: usize = 7;

/// Probability that A wins the tiebreak.
///
/// `prob_a_on_serve` / `prob_b_on_serve` are each player's point-win rate
/// on their own serve; A's chance on B's serve is `1 - prob_b_on_serve`.
pub fn tiebreak_win_probability(
    prob_a_on_serve: f64,
    prob_b_on_serve: f64,
    a_serves_first: bool,
) -> f64 {
    let mut table = [[0.0_f64; MAX_POINTS + 1]; MAX_POINTS + 1];

    for total in (0..=MAX_POINTS).rev() {
        for a in 0..=total {
            let b = total - a;
            table[a][b] = if a >= TARGET && a >= b + 2 {
                1.0
            } else if b >= TARGET && b >= a + 2 {
                0.0
            } else if total >= MAX_POINTS {
                0.5
            } else {
                let p = if a_serves_point(total, a_serves_first) {
                    prob_a_on_serve
                } else {
                    1.0 - prob_b_on_serve
                };
                p * table[a + 1][b] + (1.0 - p) * table[a][b + 1]
            };
        }
    }

    table[0][0]
}

/// Serve order: one point for the opener, then two each, alternating.
pub fn a_serves_point(points_played: usize, a_serves_first: bool) -> bool {
    if points_played == 0 {
        return a_serves_first;
    }
    let pair = (points_played - 1) / 2;
    if pair % 2 == 0 {
        !a_serves_first
    } else {
        a_serves_first
    }
}
