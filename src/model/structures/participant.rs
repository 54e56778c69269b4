use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{constants::DEFAULT_RATING, structures::ids::PlayerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: PlayerId,
    pub username: String,
    pub full_name: Option<String>,
    pub rating: f64
}

impl Participant {
    /// A freshly registered player starts at the default rating.
    pub fn new(id: PlayerId, username: &str, full_name: Option<&str>) -> Participant {
        Participant {
            id,
            username: username.to_string(),
            full_name: full_name.filter(|n| !n.trim().is_empty()).map(str::to_string),
            rating: DEFAULT_RATING
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.full_name {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}", self.username)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Participant;
    use crate::model::constants::DEFAULT_RATING;

    #[test]
    fn test_new_participant_has_default_rating() {
        let p = Participant::new(1, "timo", None);
        assert_eq!(p.rating, DEFAULT_RATING);
    }

    #[test]
    fn test_display_prefers_full_name() {
        let p = Participant::new(1, "jo", Some("Jan-Ove Waldner"));
        assert_eq!(p.to_string(), "Jan-Ove Waldner");

        let p = Participant::new(2, "timo", Some("  "));
        assert_eq!(p.to_string(), "timo");
    }
}
