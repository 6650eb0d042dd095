pub mod config;
pub mod focus;
pub mod stats;
