const DEUCE_EPS: f64 = 1e-10;
const DEUCE_MIN: f64 = 0.001;
const DEUCE_MAX: f64 = 0.999;

/// Probability that the server holds a standard game, given the probability
/// `p` of winning any single point on serve.
///
/// Sums the four ways to win: to love, to 15, to 30, and from deuce.
pub fn game_win_probability(p: f64) -> f64 {
    let q = 1.0 - p;

    let p_4_0 = p.powi(4);
    let p_4_1 = 4.0 * p.powi(4) * q;
    let p_4_2 = 10.0 * p.powi(4) * q * q;
    let reach_deuce = 20.0 * p.powi(3) * q.powi(3);

    p_4_0 + p_4_1 + p_4_2 + reach_deuce * deuce_win_probability(p)
}

/// Probability of winning a game from deuce: `p^2 / (1 - 2p(1-p))`,
/// clamped to `[0.001, 0.999]`.
pub fn deuce_win_probability(p: f64) -> f64 {
    let denom = 1.0 - 2.0 * p * (1.0 - p);
    if denom.abs() < DEUCE_EPS {
        return if p > 0.5 {
            DEUCE_MAX
        } else if p < 0.5 {
            DEUCE_MIN
        } else {
            0.5
        };
    }
    clamp(p * p / denom, DEUCE_MIN, DEUCE_MAX)
}

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coin_flip_server_holds_half_the_time() {
        assert!((game_win_probability(0.5) - 0.5).abs() < 1e-12);
        assert_eq!(deuce_win_probability(0.5), 0.5);
    }

    #[test]
    fn seventy_percent_server_holds_about_ninety() {
        let g = game_win_probability(0.70);
        assert!((g - 0.90).abs() < 0.02, "got {g}");
    }

    #[test]
    fn extremes() {
        assert_eq!(game_win_probability(0.0), 0.0);
        assert!((game_win_probability(1.0) - 1.0).abs() < 1e-12);
        assert!(game_win_probability(0.001) < 1e-6);
        assert!(game_win_probability(0.999) > 0.999_999);
    }

    #[test]
    fn bounded_and_monotonic() {
        let mut prev = -1.0;
        for i in 0..=1000 {
            let p = i as f64 / 1000.0;
            let g = game_win_probability(p);
            assert!((0.0..=1.0).contains(&g), "p={p} g={g}");
            assert!(g >= prev - 1e-12, "not monotonic at p={p}");
            prev = g;
        }
    }

    #[test]
    fn deuce_is_clamped() {
        assert_eq!(deuce_win_probability(0.0), DEUCE_MIN);
        assert_eq!(deuce_win_probability(1.0), DEUCE_MAX);
        let mid = deuce_win_probability(0.6);
        assert!((mid - 0.36 / 0.52).abs() < 1e-12);
    }

    #[test]
    fn favours_the_better_server() {
        for p in [0.1, 0.3, 0.7, 0.9] {
            let g = game_win_probability(p);
            if p > 0.5 {
                assert!(g > p);
            } else {
                assert!(g < p);
            }
        }
    }
}
