pub mod config;
pub mod engine;
pub mod graph;
pub mod storage;
