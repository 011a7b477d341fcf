//! Harbor Derby library crate. Re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the actual game entry point.
//! This library crate exposes the same modules so that `tests/` integration
//! tests can drive the game loop without needing a window or GPU.

pub mod shared;
pub mod config;
pub mod scheduler;
pub mod scoring;
pub mod input;
pub mod fishing;
pub mod session;
pub mod save;
pub mod data;
pub mod ui;
