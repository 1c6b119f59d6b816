pub mod best_of;
pub mod error;
pub mod game_prob;
pub mod markets;
pub mod monte_carlo;
pub mod request_stats;
pub mod settings;
pub mod sim;
pub mod tiebreak;

pub use best_of::BestOf;
pub use error::{SimError, validate_point_rates};
pub use markets::{MarketKind, MarketLine, Markets, derive_markets};
pub use monte_carlo::{ScoreFrequency, ScoreTable, SimConfig, simulate, simulate_with};
pub use sim::{SimulatedMatch, SimulatedSet};
