//! Check detection: whether a king is attacked by any of the opponent's
//! pieces.

use crate::chess::board::Board;
use crate::chess::core::{Player, Square};
use crate::chess::movegen;

/// Returns `true` if the king of `player` is attacked by any opponent's
/// piece.
///
/// The king is located with a full board scan. A board without a king of
/// given player is never in check.
///
/// ```
/// use tabiya::chess::attacks::is_in_check;
/// use tabiya::chess::board::Board;
/// use tabiya::chess::core::Player;
///
/// let board = Board::from_placement("4k3/8/8/8/8/8/8/4R1K1").unwrap();
/// assert!(is_in_check(&board, Player::Black));
/// assert!(!is_in_check(&board, Player::White));
/// ```
#[must_use]
pub fn is_in_check(board: &Board, player: Player) -> bool {
    match board.king(player) {
        Some(king) => is_attacked(board, king, player.opponent()),
        None => false,
    }
}

/// Returns `true` if any piece of `attacker` can move to `target`.
#[must_use]
pub fn is_attacked(board: &Board, target: Square, attacker: Player) -> bool {
    board
        .player_pieces(attacker)
        .any(|(square, _)| movegen::attacks(board, square).contains(&target))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::chess::core::{Piece, PieceKind};

    fn setup(placement: &str) -> Board {
        Board::from_placement(placement).expect("parsing valid placement")
    }

    #[test]
    fn starting_position() {
        let board = Board::starting();
        assert!(!is_in_check(&board, Player::White));
        assert!(!is_in_check(&board, Player::Black));
    }

    #[test]
    fn checks_by_each_piece() {
        // Pawn.
        assert!(is_in_check(&setup("8/8/8/3k4/4P3/8/8/4K3"), Player::Black));
        // Pushes do not attack.
        assert!(!is_in_check(&setup("8/8/8/4k3/4P3/8/8/4K3"), Player::Black));
        // Knight.
        assert!(is_in_check(&setup("8/8/8/3k4/8/4N3/8/4K3"), Player::Black));
        // Bishop.
        assert!(is_in_check(&setup("7k/8/8/8/8/8/8/B3K3"), Player::Black));
        // Rook.
        assert!(is_in_check(&setup("3k4/8/8/8/8/8/8/3RK3"), Player::Black));
        // Queen.
        assert!(is_in_check(&setup("7k/8/8/8/8/8/8/Q3K3"), Player::Black));
        assert!(!is_in_check(&setup("7k/8/8/8/8/8/8/Q3K3"), Player::White));
        assert!(!is_in_check(&setup("3k4/8/8/8/8/8/8/Q3K3"), Player::Black));
        // Black pawns attack downwards.
        assert!(is_in_check(&setup("4k3/8/8/8/8/8/3p4/4K3"), Player::White));
        assert!(!is_in_check(&setup("4k3/8/8/8/8/8/4p3/4K3"), Player::White));
    }

    #[test]
    fn blocked_checks() {
        assert!(!is_in_check(&setup("3k4/3n4/8/8/8/8/8/3RK3"), Player::Black));
        assert!(!is_in_check(&setup("7k/6p1/8/8/8/8/8/B3K3"), Player::Black));
    }

    #[test]
    fn missing_king() {
        let board = setup("8/8/8/8/8/8/8/R7");
        assert!(!is_in_check(&board, Player::White));
        assert!(!is_in_check(&board, Player::Black));
    }

    #[test]
    fn castling_is_not_an_attack() {
        // Both kings can castle: check detection must not recurse through
        // castling availability of the other side.
        let board = setup("r3k2r/8/8/8/8/8/8/R3K2R");
        assert!(!is_in_check(&board, Player::White));
        assert!(!is_in_check(&board, Player::Black));
        assert!(!is_attacked(
            &board,
            Square::try_from("g1").unwrap(),
            Player::Black
        ));
    }

    #[test]
    fn attacked_squares() {
        let mut board = Board::empty();
        board.put(
            Square::try_from("d4").unwrap(),
            Piece::new(Player::White, PieceKind::Knight),
        );
        assert!(is_attacked(&board, Square::try_from("e6").unwrap(), Player::White));
        assert!(!is_attacked(&board, Square::try_from("e5").unwrap(), Player::White));
        assert!(!is_attacked(&board, Square::try_from("e6").unwrap(), Player::Black));
    }
}
