// src/lib.rs
pub mod chart;
pub mod config;
pub mod fetch;
pub mod process;
pub mod server;
