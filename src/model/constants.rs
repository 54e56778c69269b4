// Rating constants
pub const DEFAULT_RATING: f64 = 1000.0;
pub const RATING_FLOOR: f64 = 100.0;
pub const DEFAULT_WEIGHTING: f64 = 32.0;
/// Width of the logistic curve used for expected scores
pub const ELO_SCALE: f64 = 400.0;
// Elimination fields shrink by one pairing per generated round
pub const ELIMINATION_STEP: u32 = 2;
