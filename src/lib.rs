pub mod args;
pub mod config;
pub mod database;
pub mod league;
pub mod model;
pub mod simulation;
pub mod utils;
