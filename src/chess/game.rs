//! Classification of the game state for the player to move.

use std::fmt;

use crate::chess::attacks::is_in_check;
use crate::chess::board::Board;
use crate::chess::core::Player;
use crate::chess::movegen::legal_moves;

/// State of the game from the perspective of the player to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Not in check and has at least one legal move.
    Playing,
    /// In check and has at least one legal move.
    Check,
    /// In check without any legal moves: the game is lost.
    Checkmate,
    /// Not in check but without any legal moves: the game is drawn.
    Stalemate,
}

impl GameState {
    /// Returns `true` if the game can not continue.
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Checkmate | Self::Stalemate)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Playing => "playing",
            Self::Check => "check",
            Self::Checkmate => "checkmate",
            Self::Stalemate => "stalemate",
        })
    }
}

/// Returns `true` if any piece of `player` has at least one legal move. The
/// scan stops at the first piece that does.
#[must_use]
pub fn has_legal_moves(board: &Board, player: Player) -> bool {
    board
        .player_pieces(player)
        .any(|(square, _)| !legal_moves(board, square).is_empty())
}

/// Decides between [`GameState`]s for `player` to move. Only the existence of
/// a legal move matters, not which one it is.
///
/// ```
/// use tabiya::chess::board::Board;
/// use tabiya::chess::core::Player;
/// use tabiya::chess::game::{classify, GameState};
///
/// assert_eq!(classify(&Board::starting(), Player::White), GameState::Playing);
/// ```
#[must_use]
pub fn classify(board: &Board, player: Player) -> GameState {
    let state = match (is_in_check(board, player), has_legal_moves(board, player)) {
        (false, true) => GameState::Playing,
        (false, false) => GameState::Stalemate,
        (true, true) => GameState::Check,
        (true, false) => GameState::Checkmate,
    };
    tracing::debug!(%player, %state, "classified game state");
    state
}

/// Returns `true` if `player` is in check and has no legal moves.
#[must_use]
pub fn is_checkmate(board: &Board, player: Player) -> bool {
    is_in_check(board, player) && !has_legal_moves(board, player)
}

/// Returns `true` if `player` is not in check but has no legal moves.
#[must_use]
pub fn is_stalemate(board: &Board, player: Player) -> bool {
    !is_in_check(board, player) && !has_legal_moves(board, player)
}
