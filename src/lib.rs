//! Chess rules engine: given a board and a requested move, it determines
//! legality, produces the resulting board and classifies the state of the
//! game (playing, check, checkmate or stalemate).
//!
//! The rules live in [`chess`]: boards are plain values, every operation
//! takes a board by reference and returns a new one, nothing is mutated
//! behind the caller's back.
//!
//! ```
//! use tabiya::chess::core::{Player, Square};
//! use tabiya::{apply_move, classify, initial_board, legal_moves, GameState};
//!
//! let board = initial_board();
//! let e2 = Square::try_from("e2").unwrap();
//! let e4 = Square::try_from("e4").unwrap();
//! assert!(legal_moves(&board, e2).contains(&e4));
//! let result = apply_move(&board, e2, e4).unwrap();
//! assert_eq!(classify(&result.board, Player::Black), GameState::Playing);
//! ```
//!
//! The binary exposes the library through a line-oriented text protocol, see
//! [`Driver`].

pub mod chess;

mod driver;
pub use driver::Driver;

pub use crate::chess::attacks::is_in_check;
pub use crate::chess::game::{classify, GameState};
pub use crate::chess::movegen::legal_moves;
pub use crate::chess::moves::{apply_move, apply_promotion, try_apply_move, MoveResult};

use shadow_rs::shadow;

shadow!(build);

/// Build profile (debug assertions on or off). Produced by `build.rs`.
const PROFILE: &str = include_str!(concat!(env!("OUT_DIR"), "/profile"));

/// Standard chess starting position.
#[must_use]
pub fn initial_board() -> chess::board::Board {
    chess::board::Board::starting()
}

/// Returns the full version that can be used to identify how the binary was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints the version on startup.
pub fn print_engine_info() {
    println!("{} {}", build::PROJECT_NAME, engine_version());
}

/// Prints information about the build: profile and whether it is clean.
pub fn print_binary_info() {
    println!("Build profile: {PROFILE}");
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
    println!();
}
