pub mod config;
pub mod recipe;
pub mod stopwatch;
pub mod tabata;
