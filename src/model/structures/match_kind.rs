use serde_repr::{Deserialize_repr, Serialize_repr};
use std::convert::TryFrom;
use strum_macros::{Display, EnumIter};

#[derive(Deserialize_repr, Serialize_repr, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[repr(u8)]
pub enum MatchKind {
    Casual = 0,
    RoundRobin = 1,
    Elimination = 2
}

impl MatchKind {
    pub fn is_tournament(self) -> bool {
        !matches!(self, MatchKind::Casual)
    }

    pub fn is_elimination(self) -> bool {
        matches!(self, MatchKind::Elimination)
    }
}

impl TryFrom<i32> for MatchKind {
    type Error = ();

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(MatchKind::Casual),
            1 => Ok(MatchKind::RoundRobin),
            2 => Ok(MatchKind::Elimination),
            _ => Err(())
        }
    }
}
