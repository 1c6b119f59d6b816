use serde::Serialize;
use tracing::warn;

use crate::best_of::BestOf;
use crate::error::{Result, SimError};
use crate::monte_carlo::ScoreTable;
use crate::sim::SimulatedMatch;

pub const MONEYLINE_LABEL: &str = "ml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarketKind {
    #[serde(rename = "ML")]
    Moneyline,
    #[serde(rename = "AH")]
    Handicap,
    #[serde(rename = "OU")]
    Total,
}

/// Two-sided market price. For totals, side A is the over.
///
/// `prob_a + prob_b == 1` for any non-empty sample; both are `NaN` when
/// derived from zero matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketLine {
    pub market: MarketKind,
    pub line: String,
    pub prob_a: f64,
    pub prob_b: f64,
}

impl MarketLine {
    fn from_share(market: MarketKind, line: String, prob_a: f64) -> Self {
        Self {
            market,
            line,
            prob_a,
            prob_b: 1.0 - prob_a,
        }
    }

    pub fn is_defined(&self) -> bool {
        !self.prob_a.is_nan() && !self.prob_b.is_nan()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Markets {
    pub samples: usize,
    pub moneyline: MarketLine,
    pub set_handicaps: Vec<MarketLine>,
    pub game_handicaps: Vec<MarketLine>,
    pub set_totals: Vec<MarketLine>,
    pub game_totals: Vec<MarketLine>,
    pub sets: ScoreTable,
    pub games: ScoreTable,
}

impl Markets {
    /// Turns the `NaN` prices of an empty batch into [`SimError::EmptySample`].
    pub fn require_samples(self) -> Result<Self> {
        if self.samples == 0 {
            return Err(SimError::EmptySample);
        }
        Ok(self)
    }

    pub fn lines(&self) -> impl Iterator<Item = &MarketLine> {
        std::iter::once(&self.moneyline)
            .chain(&self.set_handicaps)
            .chain(&self.game_handicaps)
            .chain(&self.set_totals)
            .chain(&self.game_totals)
    }
}

/// Prices every market for a batch of simulated matches.
pub fn derive_markets(matches: &[SimulatedMatch], best_of: BestOf) -> Markets {
    if matches.is_empty() {
        warn!("deriving markets from an empty sample; prices are NaN");
    }

    let sets = ScoreTable::sets(matches);
    let games = ScoreTable::games(matches);

    Markets {
        samples: matches.len(),
        moneyline: moneyline(matches),
        set_handicaps: handicap_lines(&sets, &best_of.set_handicap_lines()),
        game_handicaps: handicap_lines(&games, &best_of.game_handicap_lines()),
        set_totals: total_lines(&sets, &best_of.set_total_lines()),
        game_totals: total_lines(&games, &best_of.game_total_lines()),
        sets,
        games,
    }
}

/// Share of matches A wins outright, straight from the raw outcomes.
pub fn moneyline(matches: &[SimulatedMatch]) -> MarketLine {
    let wins = matches.iter().filter(|m| m.a_won()).count();
    MarketLine::from_share(
        MarketKind::Moneyline,
        MONEYLINE_LABEL.to_string(),
        wins as f64 / matches.len() as f64,
    )
}

/// A covers `handicap` when `a + handicap > b`. Lines are half-integers, so
/// there is no push.
pub fn handicap_line(table: &ScoreTable, handicap: f64) -> MarketLine {
    let covered = table.share_where(|a, b| a as f64 + handicap > b as f64);
    MarketLine::from_share(MarketKind::Handicap, line_label(handicap), covered)
}

/// Over side wins when `a + b > total`.
pub fn total_line(table: &ScoreTable, total: f64) -> MarketLine {
    let over = table.share_where(|a, b| (a + b) as f64 > total);
    MarketLine::from_share(MarketKind::Total, line_label(total), over)
}

pub fn handicap_lines(table: &ScoreTable, lines: &[f64]) -> Vec<MarketLine> {
    lines.iter().map(|&h| handicap_line(table, h)).collect()
}

pub fn total_lines(table: &ScoreTable, lines: &[f64]) -> Vec<MarketLine> {
    lines.iter().map(|&t| total_line(table, t)).collect()
}

fn line_label(value: f64) -> String {
    format!("{value:.1}")
}
