use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid bestof value {best_of}: must be 3 or 5")]
    InvalidConfiguration { best_of: u32 },

    #[error("{name} must be a probability between 0 and 1, got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("no simulated matches to derive markets from")]
    EmptySample,
}

pub type Result<T> = std::result::Result<T, SimError>;

/// Rejects point-win rates that are not finite values in `[0, 1]`.
///
/// The simulation itself assumes pre-validated input; this is the check a
/// caller runs before handing user-provided rates to the core.
pub fn validate_point_rates(p1: f64, p2: f64) -> Result<()> {
    for (name, value) in [("p1", p1), ("p2", p2)] {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(SimError::InvalidProbability { name, value });
        }
    }
    Ok(())
}
