//! Implementation of chess rules: board, move generation and application,
//! check detection and game state.

pub mod attacks;
pub mod board;
pub mod core;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod position;
