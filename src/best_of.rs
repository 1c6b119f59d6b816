use serde::Serialize;

use crate::error::SimError;

const BO3_SET_SPREAD: f64 = 1.5;
const BO5_SET_SPREAD: f64 = 2.5;
const BO3_GAME_SPREAD: f64 = 8.5;
const BO5_GAME_SPREAD: f64 = 12.5;

/// Match length. Only best-of-3 and best-of-5 are played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BestOf {
    Three,
    Five,
}

impl TryFrom<u32> for BestOf {
    type Error = SimError;

    fn try_from(best_of: u32) -> Result<Self, Self::Error> {
        match best_of {
            3 => Ok(BestOf::Three),
            5 => Ok(BestOf::Five),
            _ => Err(SimError::InvalidConfiguration { best_of }),
        }
    }
}

impl BestOf {
    pub fn sets(self) -> u32 {
        match self {
            BestOf::Three => 3,
            BestOf::Five => 5,
        }
    }

    pub fn sets_to_win(self) -> u32 {
        self.sets() / 2 + 1
    }

    pub fn set_handicap_span(self) -> f64 {
        match self {
            BestOf::Three => BO3_SET_SPREAD,
            BestOf::Five => BO5_SET_SPREAD,
        }
    }

    pub fn game_handicap_span(self) -> f64 {
        match self {
            BestOf::Three => BO3_GAME_SPREAD,
            BestOf::Five => BO5_GAME_SPREAD,
        }
    }

    pub fn set_handicap_lines(self) -> Vec<f64> {
        let span = self.set_handicap_span();
        half_lines(-span, span)
    }

    pub fn game_handicap_lines(self) -> Vec<f64> {
        let span = self.game_handicap_span();
        half_lines(-span, span)
    }

    pub fn set_total_lines(self) -> Vec<f64> {
        match self {
            BestOf::Three => vec![2.5],
            BestOf::Five => half_lines(3.5, 4.5),
        }
    }

    /// From the shortest possible match (straight sets, every set 6-0) to
    /// twelve games per set.
    pub fn game_total_lines(self) -> Vec<f64> {
        let sets = self.sets() as f64;
        let start = self.sets_to_win() as f64 * 6.0 + 0.5;
        let end = sets * 6.0 * 2.0 + 0.5;
        half_lines(start, end)
    }
}

// Lines are stepped by whole units; counting steps keeps float drift out of the bounds.
fn half_lines(start: f64, end: f64) -> Vec<f64> {
    let steps = (end - start).round() as i64;
    (0..=steps).map(|i| start + i as f64).collect()
}
