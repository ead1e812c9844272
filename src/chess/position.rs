//! [`Position`] pairs a [`Board`] with the player to move and provides the
//! textual (FEN-compatible) representation of the game.

use std::fmt;

use anyhow::{bail, Context};

use crate::chess::board::{Board, CastleRights};
use crate::chess::core::{Move, PieceKind, Player, Promotion, Square};
use crate::chess::game::{classify, GameState};
use crate::chess::movegen::legal_moves;
use crate::chess::moves::{apply_move, apply_promotion, try_apply_move, MoveResult};

/// State of the game: the [`Board`] and whose turn it is.
///
/// Everything else that [Forsyth-Edwards Notation] carries (en passant
/// square, halfmove clock, fullmove counter) is not tracked. Castling
/// availability is derived from the board itself.
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    board: Board,
    side_to_move: Player,
}

impl Position {
    /// Creates the starting position of the standard chess.
    ///
    /// ```
    /// use tabiya::chess::position::Position;
    ///
    /// assert_eq!(
    ///     Position::starting().to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        Self::new(Board::starting(), Player::White)
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(board: Board, side_to_move: Player) -> Self {
        Self {
            board,
            side_to_move,
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    /// Parses board from Forsyth-Edwards Notation.
    ///
    /// Only piece placement, side to move and castling rights are required.
    /// En passant square (`-` or a square) and the move counters (both or
    /// none) are validated and discarded, so [EPD] and trimmed FEN strings
    /// are accepted, too.
    ///
    /// Castling rights are transferred into "has moved" flags of kings and
    /// rooks. If the placement does not support a right (e.g. the rook is
    /// missing), the right is silently dropped.
    ///
    /// NOTE: This expects properly-formatted inputs: no extra symbols or
    /// additional whitespace. Use [`Position::try_from`] for cleaning up the
    /// input.
    ///
    /// [EPD]: https://www.chessprogramming.org/Extended_Position_Description
    ///
    /// # Errors
    ///
    /// If any of the fields is malformed or missing, or if there are trailing
    /// symbols.
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split(' ');
        let Some(placement) = parts.next() else {
            bail!("incorrect FEN: missing pieces placement");
        };
        let mut board = Board::from_placement(placement)?;
        let side_to_move = match parts.next() {
            Some(value) => Player::try_from(value)?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        let castling = match parts.next() {
            Some(value) => CastleRights::try_from(value)?,
            None => bail!("incorrect FEN: missing castling rights"),
        };
        board.set_castle_rights(castling);
        let position = Self::new(board, side_to_move);
        match parts.next() {
            Some("-") => (),
            Some(value) => {
                if Square::try_from(value).is_err() {
                    bail!("incorrect FEN: en passant square should be '-' or a square, got {value}");
                }
            },
            // EPD without the en passant field.
            None => return Ok(position),
        }
        match parts.next() {
            Some(halfmove_clock) => parse_counter(halfmove_clock, "halfmove clock")?,
            // This is a correct EPD: exit early.
            None => return Ok(position),
        }
        match parts.next() {
            Some(fullmove_counter) => parse_counter(fullmove_counter, "fullmove counter")?,
            None => bail!("incorrect FEN: missing fullmove counter"),
        }
        match parts.next() {
            None => Ok(position),
            Some(_) => bail!("trailing symbols are not allowed in FEN"),
        }
    }

    /// Calculates all legal moves of the side to move. Pawn moves to the last
    /// rank are expanded into one move per [`Promotion`] choice.
    ///
    /// ```
    /// use tabiya::chess::position::Position;
    ///
    /// assert_eq!(Position::starting().legal_moves().len(), 20);
    /// ```
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for (from, piece) in self.board.player_pieces(self.side_to_move) {
            for to in legal_moves(&self.board, from) {
                if piece.kind == PieceKind::Pawn && to.row() == piece.owner.promotion_rank() {
                    moves.extend(
                        Promotion::ALL.map(|promotion| Move::new(from, to, Some(promotion))),
                    );
                } else {
                    moves.push(Move::new(from, to, None));
                }
            }
        }
        moves
    }

    /// Plays a move after checking that it is legal and passes the turn to
    /// the opponent. The position does not change on error.
    ///
    /// # Errors
    ///
    /// If the moved piece does not belong to the side to move or the move is
    /// rejected by [`try_apply_move`].
    pub fn make_move(&mut self, next_move: &Move) -> anyhow::Result<MoveResult> {
        if let Some(piece) = self.board.at(next_move.from) {
            if piece.owner != self.side_to_move {
                bail!(
                    "can not move {piece} on {}: side to move is {}",
                    next_move.from,
                    self.side_to_move
                );
            }
        }
        let result = try_apply_move(
            &self.board,
            next_move.from,
            next_move.to,
            next_move.promotion,
        )
        .with_context(|| format!("can not play {next_move}"))?;
        self.board = result.board;
        self.side_to_move = self.side_to_move.opponent();
        Ok(result)
    }

    /// Classifies the position for the side to move.
    #[must_use]
    pub fn state(&self) -> GameState {
        classify(&self.board, self.side_to_move)
    }

    /// Plays a move without validation, see [`apply_move`].
    fn play_unchecked(&self, next_move: &Move) -> Option<Self> {
        let result = match next_move.promotion {
            Some(promotion) => {
                apply_promotion(&self.board, next_move.from, next_move.to, promotion)
            },
            None => apply_move(&self.board, next_move.from, next_move.to),
        }?;
        Some(Self::new(result.board, self.side_to_move.opponent()))
    }
}

fn parse_counter(value: &str, name: &str) -> anyhow::Result<()> {
    if !value.bytes().all(|c| c.is_ascii_digit()) {
        bail!("{name} can not contain anything other than digits, got {value}");
    }
    let _counter: u32 = value
        .parse()
        .with_context(|| format!("incorrect FEN: {name} can not be parsed {value}"))?;
    Ok(())
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Cleans up the input (surrounding whitespace, `fen ` and `epd `
    /// prefixes) and parses it with [`Position::from_fen`].
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        for prefix in ["fen ", "epd "] {
            if let Some(stripped) = input.strip_prefix(prefix) {
                return Self::from_fen(stripped);
            }
        }
        Self::from_fen(input)
    }
}

impl fmt::Display for Position {
    /// Prints the position in Forsyth-Edwards Notation. En passant square and
    /// move counters are not tracked and always printed as `- 0 1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} - 0 1",
            &self.board,
            &self.side_to_move,
            &self.board.castle_rights()
        )
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", &self.board)?;
        writeln!(f, "Player to move: {:?}", &self.side_to_move)?;
        writeln!(f, "Castling rights: {}", &self.board.castle_rights())?;
        write!(f, "FEN: {self}")
    }
}

/// [Perft] (*per*formance *t*esting) counts the leaf nodes of the legal move
/// tree of given depth. It checks move generation and application against
/// published numbers.
///
/// Moves are played with the unchecked [`apply_move`]: they come from the
/// legal move generator anyway.
///
/// [Perft]: https://www.chessprogramming.org/Perft
#[must_use]
pub fn perft(position: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = position.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .filter_map(|next_move| position.play_unchecked(next_move))
        .map(|next| perft(&next, depth - 1))
        .sum()
}
