//! Move generation for a single piece: [raw moves] follow the piece geometry
//! and occupancy only, [legal moves] additionally reject the destinations that
//! leave the mover's own king in check.
//!
//! There is no en passant: the board does not track the last double pawn push.
//!
//! [raw moves]: raw_moves
//! [legal moves]: legal_moves

use arrayvec::ArrayVec;

use crate::chess::attacks;
use crate::chess::board::Board;
use crate::chess::core::{CastlingSide, Piece, PieceKind, Player, Square};

/// Upper bound on the number of destinations of one piece: a queen in the
/// center of an empty board reaches 27 squares.
pub const MAX_DESTINATIONS: usize = 32;

/// Destination squares of a single piece. Lives on the stack.
pub type Destinations = ArrayVec<Square, MAX_DESTINATIONS>;

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];
const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Calculates the destinations of the piece standing on `from` that do not
/// leave its own king in check. An empty square has no moves.
///
/// Every candidate is tried on a scratch copy of the board where only the
/// moving piece is relocated (the castling rook stays in place), and rejected
/// if [`attacks::is_in_check`] holds for the mover afterwards.
///
/// ```
/// use tabiya::chess::board::Board;
/// use tabiya::chess::core::Square;
/// use tabiya::chess::movegen::legal_moves;
///
/// let moves = legal_moves(&Board::starting(), Square::try_from("g1").unwrap());
/// assert_eq!(moves.len(), 2);
/// ```
#[must_use]
pub fn legal_moves(board: &Board, from: Square) -> Destinations {
    let Some(piece) = board.at(from) else {
        return Destinations::new();
    };
    let mut moves = raw_moves(board, from);
    moves.retain(|to| !leaves_king_in_check(board, from, *to, piece.owner));
    moves
}

/// Destinations of the piece on `from` according to its geometry, including
/// castling, but ignoring whether the own king would be exposed.
pub(crate) fn raw_moves(board: &Board, from: Square) -> Destinations {
    generate(board, from, true)
}

/// Same as [`raw_moves`] without castling. Castling never captures, so these
/// are exactly the squares the piece threatens for the purposes of check
/// detection.
pub(crate) fn attacks(board: &Board, from: Square) -> Destinations {
    generate(board, from, false)
}

/// Plays `from` -> `to` on a copy of the board (without any side effects like
/// castling rook relocation) and checks if `player`'s king is attacked.
pub(crate) fn leaves_king_in_check(board: &Board, from: Square, to: Square, player: Player) -> bool {
    let mut scratch = *board;
    if let Some(piece) = scratch.take(from) {
        scratch.put(to, piece);
    }
    attacks::is_in_check(&scratch, player)
}

fn generate(board: &Board, from: Square, with_castling: bool) -> Destinations {
    let mut moves = Destinations::new();
    let Some(piece) = board.at(from) else {
        return moves;
    };
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, from, piece.owner, &mut moves),
        PieceKind::Rook => slide(board, from, piece.owner, &ROOK_DIRECTIONS, &mut moves),
        PieceKind::Bishop => slide(board, from, piece.owner, &BISHOP_DIRECTIONS, &mut moves),
        PieceKind::Queen => {
            slide(board, from, piece.owner, &ROOK_DIRECTIONS, &mut moves);
            slide(board, from, piece.owner, &BISHOP_DIRECTIONS, &mut moves);
        },
        PieceKind::Knight => step(board, from, piece.owner, &KNIGHT_OFFSETS, &mut moves),
        PieceKind::King => {
            step(board, from, piece.owner, &KING_OFFSETS, &mut moves);
            if with_castling {
                castle_moves(board, from, piece, &mut moves);
            }
        },
    }
    moves
}

fn pawn_moves(board: &Board, from: Square, owner: Player, moves: &mut Destinations) {
    let direction = owner.push_direction();
    if let Some(push) = from.offset(direction, 0) {
        if board.at(push).is_none() {
            moves.push(push);
            if from.row() == owner.pawns_starting() {
                if let Some(double_push) = from.offset(2 * direction, 0) {
                    if board.at(double_push).is_none() {
                        moves.push(double_push);
                    }
                }
            }
        }
    }
    for side in [-1, 1] {
        if let Some(target) = from.offset(direction, side) {
            if board.at(target).is_some_and(|piece| piece.owner != owner) {
                moves.push(target);
            }
        }
    }
}

/// Sliding pieces move along the direction until they hit the edge of the
/// board or another piece. Opponent's piece can be captured, own piece stops
/// the ray before it.
fn slide(
    board: &Board,
    from: Square,
    owner: Player,
    directions: &[(i8, i8)],
    moves: &mut Destinations,
) {
    for &(rows, columns) in directions {
        let mut current = from;
        while let Some(next) = current.offset(rows, columns) {
            match board.at(next) {
                None => moves.push(next),
                Some(piece) => {
                    if piece.owner != owner {
                        moves.push(next);
                    }
                    break;
                },
            }
            current = next;
        }
    }
}

fn step(
    board: &Board,
    from: Square,
    owner: Player,
    offsets: &[(i8, i8)],
    moves: &mut Destinations,
) {
    for &(rows, columns) in offsets {
        if let Some(target) = from.offset(rows, columns) {
            if board.at(target).map_or(true, |piece| piece.owner != owner) {
                moves.push(target);
            }
        }
    }
}

/// Castling is offered as a two-square king move when:
///
/// - The king has not moved.
/// - The castling rook is in place, belongs to the same player and has not
///   moved.
/// - All squares between the king and the rook are empty.
/// - The king is not in check.
/// - The square the king passes over is not attacked.
///
/// The destination square itself is not verified here: [`legal_moves`]
/// rejects it if the king would end up in check.
fn castle_moves(board: &Board, from: Square, king: Piece, moves: &mut Destinations) {
    if king.has_moved {
        return;
    }
    let mut in_check = None;
    for side in [CastlingSide::Short, CastlingSide::Long] {
        let Some(rook_square) = from.offset(0, side.rook_offset()) else {
            continue;
        };
        let rook_ready = board.at(rook_square).is_some_and(|rook| {
            rook.kind == PieceKind::Rook && rook.owner == king.owner && !rook.has_moved
        });
        if !rook_ready {
            continue;
        }
        let direction = side.direction();
        let path_is_clear = (1..side.rook_offset().abs()).all(|distance| {
            from.offset(0, direction * distance)
                .is_some_and(|square| board.at(square).is_none())
        });
        if !path_is_clear {
            continue;
        }
        if *in_check.get_or_insert_with(|| attacks::is_in_check(board, king.owner)) {
            return;
        }
        let (Some(passed), Some(destination)) =
            (from.offset(0, direction), from.offset(0, 2 * direction))
        else {
            continue;
        };
        if leaves_king_in_check(board, from, passed, king.owner) {
            continue;
        }
        moves.push(destination);
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use super::*;

    fn square(name: &str) -> Square {
        Square::try_from(name).unwrap()
    }

    fn setup(placement: &str) -> Board {
        Board::from_placement(placement).expect("parsing valid placement")
    }

    fn to_strings(moves: &[Square]) -> Vec<String> {
        moves.iter().map(Square::to_string).sorted().collect()
    }

    fn sorted(squares: &[&str]) -> Vec<String> {
        squares.iter().map(|s| (*s).to_string()).sorted().collect()
    }

    fn raw(board: &Board, from: &str) -> Vec<String> {
        to_strings(&raw_moves(board, square(from)))
    }

    fn legal(board: &Board, from: &str) -> Vec<String> {
        to_strings(&legal_moves(board, square(from)))
    }

    #[test]
    fn empty_square() {
        let board = Board::starting();
        assert!(raw_moves(&board, square("e4")).is_empty());
        assert!(legal_moves(&board, square("e4")).is_empty());
    }

    #[test]
    fn pawns() {
        let board = Board::starting();
        assert_eq!(raw(&board, "e2"), sorted(&["e3", "e4"]));
        assert_eq!(raw(&board, "d7"), sorted(&["d6", "d5"]));
        // Blocked double push and captures in both directions.
        let board = setup("4k3/8/8/8/2p1p3/3P4/3P4/4K3");
        assert_eq!(raw(&board, "d3"), sorted(&["c4", "d4", "e4"]));
        assert_eq!(raw(&board, "d2"), Vec::<String>::new());
        // A piece right in front blocks both pushes.
        let board = setup("4k3/3p4/3N4/8/8/8/8/4K3");
        assert_eq!(raw(&board, "d7"), Vec::<String>::new());
        // A piece two squares ahead only blocks the double push.
        let board = setup("4k3/3p4/8/3N4/8/8/8/4K3");
        assert_eq!(raw(&board, "d7"), sorted(&["d6"]));
        // Own pieces can not be captured.
        let board = setup("4k3/8/8/8/8/2N1N3/3P4/4K3");
        assert_eq!(raw(&board, "d2"), sorted(&["d3", "d4"]));
        // The pawn on the last rank has nowhere to go.
        let board = setup("3Pk3/8/8/8/8/8/8/4K3");
        assert_eq!(raw(&board, "d8"), Vec::<String>::new());
        // Pawns are not moved off the board by edge captures.
        let board = setup("4k3/8/8/8/8/1p6/P7/4K3");
        assert_eq!(raw(&board, "a2"), sorted(&["a3", "a4", "b3"]));
    }

    #[test]
    fn sliders() {
        let board = setup("4k3/8/8/8/3R4/8/8/4K3");
        assert_eq!(
            raw(&board, "d4"),
            sorted(&[
                "d1", "d2", "d3", "d5", "d6", "d7", "d8", "a4", "b4", "c4", "e4", "f4", "g4", "h4"
            ])
        );
        let board = setup("4k3/6p1/8/8/3B4/8/5P2/4K3");
        assert_eq!(
            raw(&board, "d4"),
            sorted(&["a1", "b2", "c3", "e3", "a7", "b6", "c5", "e5", "f6", "g7"])
        );
        let board = setup("4k3/8/8/8/3Q4/8/8/4K3");
        assert_eq!(raw_moves(&board, square("d4")).len(), 27);
        let board = setup("4k3/8/8/8/8/8/8/Q3K3");
        assert_eq!(raw_moves(&board, square("a1")).len(), 17);
    }

    #[test]
    fn knights() {
        let board = Board::starting();
        assert_eq!(raw(&board, "b1"), sorted(&["a3", "c3"]));
        let board = setup("4k3/8/8/8/3N4/8/4P3/4K3");
        assert_eq!(
            raw(&board, "d4"),
            sorted(&["b3", "b5", "c2", "c6", "e6", "f3", "f5"])
        );
        let board = setup("N3k3/8/8/8/8/8/8/4K3");
        assert_eq!(raw(&board, "a8"), sorted(&["b6", "c7"]));
    }

    #[test]
    fn kings() {
        let board = setup("4k3/8/8/8/8/8/3Pp3/4K3");
        assert_eq!(raw(&board, "e1"), sorted(&["d1", "f1", "e2", "f2"]));
        // The king can not step next to the opponent's king.
        let board = setup("8/8/8/3k4/8/3K4/8/8");
        assert_eq!(
            legal(&board, "d3"),
            sorted(&["c2", "d2", "e2", "c3", "e3"])
        );
    }

    #[test]
    fn castling() {
        let board = setup("r3k2r/8/8/8/8/8/8/R3K2R");
        assert_eq!(
            legal(&board, "e1"),
            sorted(&["c1", "d1", "d2", "e2", "f1", "f2", "g1"])
        );
        assert_eq!(
            legal(&board, "e8"),
            sorted(&["c8", "d8", "d7", "e7", "f8", "f7", "g8"])
        );
        // Blocked by a piece on b1: only the queenside castling is affected.
        let board = setup("r3k2r/8/8/8/8/8/8/RN2K2R");
        assert_eq!(
            legal(&board, "e1"),
            sorted(&["d1", "d2", "e2", "f1", "f2", "g1"])
        );
        // Not available when the king is in check.
        let board = setup("r3k2r/8/8/8/8/8/8/R3K2R");
        let mut checked = board;
        checked.put(square("e5"), Piece::new(Player::Black, PieceKind::Rook));
        assert_eq!(legal(&checked, "e1"), sorted(&["d1", "d2", "f1", "f2"]));
        // Not available when the square the king passes over is attacked.
        let mut board = setup("r3k2r/8/8/8/8/8/8/R3K2R");
        board.put(square("f5"), Piece::new(Player::Black, PieceKind::Rook));
        assert_eq!(
            legal(&board, "e1"),
            sorted(&["c1", "d1", "d2", "e2"])
        );
        // Moved rook.
        let mut board = setup("r3k2r/8/8/8/8/8/8/R3K2R");
        board.put(square("h1"), Piece::new(Player::White, PieceKind::Rook).moved());
        assert_eq!(
            legal(&board, "e1"),
            sorted(&["c1", "d1", "d2", "e2", "f1", "f2"])
        );
        // Moved king.
        let mut board = setup("r3k2r/8/8/8/8/8/8/R3K2R");
        board.put(square("e1"), Piece::new(Player::White, PieceKind::King).moved());
        assert_eq!(
            legal(&board, "e1"),
            sorted(&["d1", "d2", "e2", "f1", "f2"])
        );
        // The rook must be our own.
        let board = setup("4k3/8/8/8/8/8/8/4K2r");
        assert!(!legal(&board, "e1").contains(&"g1".to_string()));
    }

    #[test]
    fn castling_into_attacked_square() {
        // The rook on g8 attacks g1 but not f1: the raw generator offers
        // castling, the legal move filter rejects it.
        let board = setup("4k1r1/8/8/8/8/8/8/4K2R");
        assert!(raw(&board, "e1").contains(&"g1".to_string()));
        assert!(!legal(&board, "e1").contains(&"g1".to_string()));
        // The b-file square only needs to be empty, not safe.
        let board = setup("1r2k3/8/8/8/8/8/8/R3K3");
        assert!(legal(&board, "e1").contains(&"c1".to_string()));
    }

    #[test]
    fn pins() {
        // The knight is pinned to its king.
        let board = setup("4k3/4r3/8/8/8/8/4N3/4K3");
        assert!(legal_moves(&board, square("e2")).is_empty());
        // The rook is pinned but can move along the pin line.
        let board = setup("4k3/4r3/8/8/8/8/4R3/4K3");
        assert_eq!(
            legal(&board, "e2"),
            sorted(&["e3", "e4", "e5", "e6", "e7"])
        );
    }

    #[test]
    fn check_evasions() {
        // Only blocking the check with the rook or moving the king helps.
        let board = setup("k7/8/8/8/8/8/1R6/r3K3");
        assert_eq!(legal(&board, "b2"), sorted(&["b1"]));
        assert_eq!(legal(&board, "e1"), sorted(&["d2", "e2", "f2"]));
    }

    #[test]
    fn missing_king() {
        // Without a king there is nothing to expose.
        let board = setup("8/8/8/8/8/8/8/R7");
        assert_eq!(legal_moves(&board, square("a1")).len(), 14);
    }
}
