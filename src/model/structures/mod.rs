pub mod game;
pub mod ids;
pub mod match_kind;
pub mod participant;
pub mod rating_change;
pub mod rating_policy;
pub mod tournament;
