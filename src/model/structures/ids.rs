pub type PlayerId = i32;
pub type MatchId = i32;
pub type TournamentId = i32;
