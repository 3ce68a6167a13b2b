// Library root: player scoring, squad validation, replacement suggestions and
// greedy squad generation for fantasy football.

pub mod cache;
pub mod config;
pub mod generate;
pub mod ingest;
pub mod player;
pub mod scoring;
pub mod search;
pub mod squad;
pub mod suggest;
