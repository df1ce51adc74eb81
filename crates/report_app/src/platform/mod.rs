//! Terminal shell: wires the pure report core to the task engine.
pub mod app;
pub mod cli;
mod config;
mod effects;
mod ui;
