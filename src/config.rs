use std::{env, str::FromStr};

use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{constants::DEFAULT_WEIGHTING, structures::rating_policy::TournamentRatingPolicy};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("ELO_WEIGHTING must be a positive number, got {0:?}")]
    InvalidWeighting(String),

    #[error("TOURNAMENT_RATING_POLICY must be `exclude` or `include`, got {0:?}")]
    InvalidPolicy(String)
}

/// League-wide settings for rating updates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeagueConfig {
    /// K-factor handed to the ELO update
    pub weighting: f64,
    /// Whether tournament games move the global rating
    pub tournament_rating_policy: TournamentRatingPolicy
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            weighting: DEFAULT_WEIGHTING,
            tournament_rating_policy: TournamentRatingPolicy::default()
        }
    }
}

impl LeagueConfig {
    /// Reads `ELO_WEIGHTING` and `TOURNAMENT_RATING_POLICY`, loading `.env`
    /// first. Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        Self::from_values(
            env::var("ELO_WEIGHTING").ok().as_deref(),
            env::var("TOURNAMENT_RATING_POLICY").ok().as_deref()
        )
    }

    fn from_values(weighting: Option<&str>, policy: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = weighting {
            config.weighting = parse_weighting(raw)?;
        }

        if let Some(raw) = policy {
            config.tournament_rating_policy =
                TournamentRatingPolicy::from_str(raw.trim()).map_err(|_| ConfigError::InvalidPolicy(raw.to_string()))?;
        }

        Ok(config)
    }
}

pub fn parse_weighting(raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ConfigError::InvalidWeighting(raw.to_string()))
    }
}
