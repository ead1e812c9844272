//! Square-centric [`Board`] representation: a flat array of 64 optional
//! pieces. A board is a plain value: copying it is a 64-byte memcpy and never
//! allocates, which makes "try the move on a scratch board" cheap.

use std::fmt::{self, Write};

use anyhow::bail;

use crate::chess::core::{
    CastlingSide,
    Piece,
    PieceKind,
    Player,
    Square,
    BOARD_SIZE,
    BOARD_WIDTH,
};

/// Column of both kings in the starting position.
const KING_COLUMN: u8 = 4;

const BACKRANK_PIECES: [PieceKind; BOARD_WIDTH as usize] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Piece-centric view of the 8x8 grid: every square holds at most one
/// [`Piece`].
///
/// The board does not validate that there is exactly one king per player:
/// rules code treats a missing king as "never in check".
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE as usize],
}

impl Board {
    /// Creates a board without any pieces.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
        }
    }

    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use tabiya::chess::board::Board;
    ///
    /// assert_eq!(
    ///     Board::starting().to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        let mut board = Self::empty();
        for player in [Player::White, Player::Black] {
            for (column, kind) in (0..).zip(BACKRANK_PIECES) {
                board.put(
                    Square::new_unchecked(player.backrank(), column),
                    Piece::new(player, kind),
                );
                board.put(
                    Square::new_unchecked(player.pawns_starting(), column),
                    Piece::new(player, PieceKind::Pawn),
                );
            }
        }
        board
    }

    /// Returns the piece standing on given square, if any.
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Places a piece on the square, replacing whatever was there.
    pub fn put(&mut self, square: Square, piece: Piece) {
        self.squares[square.index()] = Some(piece);
    }

    /// Removes the piece from the square (if any).
    pub fn clear(&mut self, square: Square) {
        self.squares[square.index()] = None;
    }

    /// Removes the piece from the square and returns it.
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.index()].take()
    }

    /// Iterates over occupied squares in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.at(square).map(|piece| (square, piece)))
    }

    /// Iterates over the squares occupied by the pieces of given player.
    pub fn player_pieces(&self, player: Player) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.owner == player)
    }

    /// Finds the king of given player with a full board scan. If there are
    /// several (the board is malformed), the first one in row-major order is
    /// returned.
    #[must_use]
    pub fn king(&self, player: Player) -> Option<Square> {
        self.player_pieces(player)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(square, _)| square)
    }

    /// Derives castling availability from the "has moved" flags: a side is
    /// available when both the king and the corresponding rook stand on their
    /// original squares and have not moved. Squares between them and attacks
    /// are not considered.
    #[must_use]
    pub fn castle_rights(&self) -> CastleRights {
        let mut rights = CastleRights::empty();
        for player in [Player::White, Player::Black] {
            for side in [CastlingSide::Short, CastlingSide::Long] {
                let (king, rook) = castling_squares(player, side);
                if self.is_unmoved(king, PieceKind::King, player)
                    && self.is_unmoved(rook, PieceKind::Rook, player)
                {
                    rights.insert(CastleRights::flag(player, side));
                }
            }
        }
        rights
    }

    /// Sets the "has moved" flags of kings and rooks so that
    /// [`Board::castle_rights`] matches given rights as closely as the
    /// placement allows. All kings and rooks that do not take part in an
    /// available castling are marked as moved.
    pub(super) fn set_castle_rights(&mut self, rights: CastleRights) {
        for square in Square::iter() {
            if let Some(piece) = self.at(square) {
                if matches!(piece.kind, PieceKind::King | PieceKind::Rook) {
                    self.put(square, piece.moved());
                }
            }
        }
        for player in [Player::White, Player::Black] {
            for side in [CastlingSide::Short, CastlingSide::Long] {
                if !rights.contains(CastleRights::flag(player, side)) {
                    continue;
                }
                let (king, rook) = castling_squares(player, side);
                for (square, kind) in [(king, PieceKind::King), (rook, PieceKind::Rook)] {
                    if let Some(piece) = self.at(square) {
                        if piece.kind == kind && piece.owner == player {
                            self.put(square, Piece::new(player, kind));
                        }
                    }
                }
            }
        }
    }

    fn is_unmoved(&self, square: Square, kind: PieceKind, player: Player) -> bool {
        self.at(square)
            .is_some_and(|piece| piece.kind == kind && piece.owner == player && !piece.has_moved)
    }

    /// Parses the piece placement part of Forsyth-Edwards Notation, starting
    /// from Black's back rank. Pawns are marked as moved unless they stand on
    /// their starting row; kings and rooks are assumed unmoved when they are on
    /// their original squares (as if all castling rights were available).
    ///
    /// ```
    /// use tabiya::chess::board::Board;
    ///
    /// let board = Board::from_placement("4k3/8/8/8/8/8/8/4K2R").unwrap();
    /// assert_eq!(board.to_string(), "4k3/8/8/8/8/8/8/4K2R");
    /// assert_eq!(board.castle_rights().to_string(), "K");
    /// ```
    ///
    /// # Errors
    ///
    /// If the input does not describe exactly 8 rows of 8 squares each or
    /// contains unknown symbols.
    pub fn from_placement(placement: &str) -> anyhow::Result<Self> {
        let mut board = Self::empty();
        let mut row: u8 = 0;
        for rank in placement.split('/') {
            if row == BOARD_WIDTH {
                bail!("incorrect placement: expected 8 ranks, got {placement}");
            }
            let mut column: u8 = 0;
            for symbol in rank.chars() {
                if column >= BOARD_WIDTH {
                    bail!("incorrect placement: rank {rank} exceeds {BOARD_WIDTH} squares");
                }
                if let Some(skip) = symbol.to_digit(10) {
                    if skip == 0 || skip > 8 {
                        bail!("increment should be within 1..=8, got {skip}");
                    }
                    column += u8::try_from(skip)?;
                    continue;
                }
                let mut piece = Piece::try_from(symbol)?;
                let Some(square) = Square::new(row, column) else {
                    bail!("incorrect placement: rank {rank} exceeds {BOARD_WIDTH} squares");
                };
                if piece.kind == PieceKind::Pawn && row != piece.owner.pawns_starting() {
                    piece = piece.moved();
                }
                board.put(square, piece);
                column += 1;
            }
            if column != BOARD_WIDTH {
                bail!("incorrect placement: rank size should be exactly {BOARD_WIDTH}, got {rank} of length {column}");
            }
            row += 1;
        }
        if row != BOARD_WIDTH {
            bail!("incorrect placement: there should be 8 ranks, got {placement}");
        }
        board.set_castle_rights(CastleRights::all());
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl TryFrom<&str> for Board {
    type Error = anyhow::Error;

    fn try_from(placement: &str) -> anyhow::Result<Self> {
        Self::from_placement(placement.trim())
    }
}

impl fmt::Display for Board {
    /// Prints the piece placement part of Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_WIDTH {
            let mut empty_squares = 0;
            for column in 0..BOARD_WIDTH {
                match Square::new(row, column).and_then(|square| self.at(square)) {
                    Some(piece) => {
                        if empty_squares != 0 {
                            write!(f, "{empty_squares}")?;
                            empty_squares = 0;
                        }
                        write!(f, "{piece}")?;
                    },
                    None => empty_squares += 1,
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if row != BOARD_WIDTH - 1 {
                f.write_char('/')?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a human-readable format: one line per row, starting
    /// from Black's back rank, `.` for empty squares.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_WIDTH {
            for column in 0..BOARD_WIDTH {
                if column != 0 {
                    f.write_char(' ')?;
                }
                match Square::new(row, column).and_then(|square| self.at(square)) {
                    Some(piece) => write!(f, "{piece}")?,
                    None => f.write_char('.')?,
                }
            }
            if row != BOARD_WIDTH - 1 {
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}

/// Original squares of the king and the rook taking part in castling.
fn castling_squares(player: Player, side: CastlingSide) -> (Square, Square) {
    let row = player.backrank();
    let rook_column = match side {
        CastlingSide::Short => BOARD_WIDTH - 1,
        CastlingSide::Long => 0,
    };
    (
        Square::new_unchecked(row, KING_COLUMN),
        Square::new_unchecked(row, rook_column),
    )
}

bitflags::bitflags! {
    /// Availability of [castling] for each player and side (kingside is often
    /// referred to as O-O or h-side castle, queenside -- O-O-O or a-side
    /// castle).
    ///
    /// The rights are not stored anywhere: they are derived from the "has
    /// moved" flags of kings and rooks on the [`Board`] and exist to
    /// (de)serialize the castling part of FEN.
    ///
    /// [castling]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CastleRights: u8 {
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b1000;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0100;
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0010;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b0001;
    }
}

impl CastleRights {
    const fn flag(player: Player, side: CastlingSide) -> Self {
        match (player, side) {
            (Player::White, CastlingSide::Short) => Self::WHITE_SHORT,
            (Player::White, CastlingSide::Long) => Self::WHITE_LONG,
            (Player::Black, CastlingSide::Short) => Self::BLACK_SHORT,
            (Player::Black, CastlingSide::Long) => Self::BLACK_LONG,
        }
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = anyhow::Error;

    /// Parses [`CastleRights`] for both players from the FEN format: either
    /// `-` or any non-repeating combination of `KQkq`.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        if input == "-" {
            return Ok(Self::empty());
        }
        if input.is_empty() {
            bail!("castling rights should be '-' or a combination of \"KQkq\", got empty string");
        }
        let mut rights = Self::empty();
        for symbol in input.chars() {
            let flag = match symbol {
                'K' => Self::WHITE_SHORT,
                'Q' => Self::WHITE_LONG,
                'k' => Self::BLACK_SHORT,
                'q' => Self::BLACK_LONG,
                _ => bail!("unknown castling rights symbol '{symbol}' in {input}"),
            };
            if rights.contains(flag) {
                bail!("repeated castling rights symbol '{symbol}' in {input}");
            }
            rights.insert(flag);
        }
        Ok(rights)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_char('-');
        }
        for (flag, symbol) in [
            (Self::WHITE_SHORT, 'K'),
            (Self::WHITE_LONG, 'Q'),
            (Self::BLACK_SHORT, 'k'),
            (Self::BLACK_LONG, 'q'),
        ] {
            if self.contains(flag) {
                f.write_char(symbol)?;
            }
        }
        Ok(())
    }
}
