/// Space War: a single-screen arcade shooter.
///
/// The simulation (`compute`, `fleet`, `collision`, `stage`) is pure Rust
/// with no terminal dependency; `game` sequences one frame at a time
/// against the narrow `platform` traits, and `display`/`input` provide the
/// crossterm implementation used by the binary.

pub mod collision;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod fleet;
pub mod game;
pub mod geometry;
pub mod input;
pub mod platform;
pub mod sprites;
pub mod stage;
