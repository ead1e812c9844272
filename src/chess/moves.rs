//! Move application. [`apply_move`] and [`apply_promotion`] trust the caller
//! to pass a legal move and skip re-validation; [`try_apply_move`] checks
//! everything first.

use anyhow::bail;

use crate::chess::attacks::is_in_check;
use crate::chess::board::Board;
use crate::chess::core::{CastlingSide, Piece, PieceKind, Promotion, Square};
use crate::chess::game::has_legal_moves;
use crate::chess::movegen::legal_moves;

/// Outcome of applying a move: the new board and what happened on it.
///
/// `is_check` and `is_checkmate` are evaluated for the opponent of the moved
/// piece on the resulting board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveResult {
    /// Board after the move.
    pub board: Board,
    /// The moved piece as it stands on `to`: with `has_moved` set and the
    /// kind replaced in case of promotion.
    pub piece: Piece,
    #[allow(missing_docs)]
    pub from: Square,
    #[allow(missing_docs)]
    pub to: Square,
    /// Piece that occupied `to` before the move.
    pub captured: Option<Piece>,
    #[allow(missing_docs)]
    pub promotion: Option<Promotion>,
    #[allow(missing_docs)]
    pub is_check: bool,
    #[allow(missing_docs)]
    pub is_checkmate: bool,
}

/// Moves the piece from `from` to `to` on a copy of the board. A king moving
/// two columns castles: the rook is moved to the square the king passed over.
///
/// The move is expected to be one of [`legal_moves`]: otherwise the
/// resulting board is well-formed but meaningless. Returns [`None`] if `from`
/// is empty.
///
/// ```
/// use tabiya::chess::board::Board;
/// use tabiya::chess::core::Square;
/// use tabiya::chess::moves::apply_move;
///
/// let e2 = Square::try_from("e2").unwrap();
/// let e4 = Square::try_from("e4").unwrap();
/// let result = apply_move(&Board::starting(), e2, e4).unwrap();
/// assert!(result.board.at(e2).is_none());
/// assert!(result.board.at(e4).unwrap().has_moved);
/// assert_eq!(result.captured, None);
/// ```
#[must_use]
pub fn apply_move(board: &Board, from: Square, to: Square) -> Option<MoveResult> {
    execute(board, from, to, None)
}

/// Same as [`apply_move`] but the piece arriving at `to` becomes `promotion`.
#[must_use]
pub fn apply_promotion(
    board: &Board,
    from: Square,
    to: Square,
    promotion: Promotion,
) -> Option<MoveResult> {
    execute(board, from, to, Some(promotion))
}

/// Validates the move before applying it.
///
/// # Errors
///
/// - `from` is empty.
/// - `to` is not a legal destination of the piece on `from`.
/// - A pawn reaches the last rank without `promotion`.
/// - `promotion` is given for a move that does not promote.
pub fn try_apply_move(
    board: &Board,
    from: Square,
    to: Square,
    promotion: Option<Promotion>,
) -> anyhow::Result<MoveResult> {
    let Some(piece) = board.at(from) else {
        tracing::debug!(%from, %to, "rejected move from empty square");
        bail!("there is no piece on {from}");
    };
    if !legal_moves(board, from).contains(&to) {
        tracing::debug!(%from, %to, "rejected illegal move");
        bail!("illegal move: {piece} can not go from {from} to {to}");
    }
    let promotes = piece.kind == PieceKind::Pawn && to.row() == piece.owner.promotion_rank();
    match (promotes, promotion) {
        (true, None) => bail!("pawn reaching {to} has to be promoted"),
        (false, Some(promotion)) => {
            bail!("{from}{to} is not a promotion, can not promote to {promotion}")
        },
        _ => (),
    }
    match execute(board, from, to, promotion) {
        Some(result) => Ok(result),
        None => bail!("there is no piece on {from}"),
    }
}

fn execute(
    board: &Board,
    from: Square,
    to: Square,
    promotion: Option<Promotion>,
) -> Option<MoveResult> {
    let mut next = *board;
    let piece = next.take(from)?;
    if piece.kind == PieceKind::King && from.column().abs_diff(to.column()) == 2 {
        castle_rook(&mut next, from, to);
    }
    let captured = next.take(to);
    let piece = Piece {
        kind: promotion.map_or(piece.kind, PieceKind::from),
        ..piece.moved()
    };
    next.put(to, piece);
    let opponent = piece.owner.opponent();
    let is_check = is_in_check(&next, opponent);
    let is_checkmate = is_check && !has_legal_moves(&next, opponent);
    tracing::trace!(
        %from,
        %to,
        %piece,
        ?captured,
        ?promotion,
        is_check,
        is_checkmate,
        "applied move"
    );
    Some(MoveResult {
        board: next,
        piece,
        from,
        to,
        captured,
        promotion,
        is_check,
        is_checkmate,
    })
}

fn castle_rook(board: &mut Board, from: Square, to: Square) {
    let side = if to.column() > from.column() {
        CastlingSide::Short
    } else {
        CastlingSide::Long
    };
    let (Some(rook_from), Some(rook_to)) = (
        from.offset(0, side.rook_offset()),
        from.offset(0, side.direction()),
    ) else {
        return;
    };
    if let Some(rook) = board.take(rook_from) {
        board.put(rook_to, rook.moved());
    }
}
