//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};

use anyhow::bail;
use itertools::Itertools;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// A request to move a piece from one square to another. This is the
/// input-side representation of a move: it is parsed from (and printed in)
/// long algebraic notation, e.g. `e2e4` or `a7a8q`.
///
/// A [`Move`] carries no information about the position it is played in, so
/// it is not necessarily legal. Use [`crate::chess::movegen::legal_moves`] to
/// find out which destinations are.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub(super) from: Square,
    pub(super) to: Square,
    pub(super) promotion: Option<Promotion>,
}

impl Move {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(from: Square, to: Square, promotion: Option<Promotion>) -> Self {
        Self {
            from,
            to,
            promotion,
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn to(&self) -> Square {
        self.to
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }

    /// Parses a move in long algebraic notation: origin and destination
    /// squares followed by an optional promotion piece.
    ///
    /// ```
    /// use tabiya::chess::core::{Move, Promotion, Square};
    ///
    /// let m = Move::from_uci("e7e8q").unwrap();
    /// assert_eq!(m.from(), Square::try_from("e7").unwrap());
    /// assert_eq!(m.to(), Square::try_from("e8").unwrap());
    /// assert_eq!(m.promotion(), Some(Promotion::Queen));
    /// ```
    ///
    /// # Errors
    ///
    /// If the input is not 4 or 5 characters long or any of the parts is
    /// malformed.
    pub fn from_uci(input: &str) -> anyhow::Result<Self> {
        if !input.is_ascii() {
            bail!("move should be ASCII, got {input}");
        }
        if input.len() != 4 && input.len() != 5 {
            bail!("move should be 4 or 5 chars, got {input}");
        }
        let from = Square::try_from(&input[0..2])?;
        let to = Square::try_from(&input[2..4])?;
        let promotion = match input[4..].chars().next() {
            Some(symbol) => Some(Promotion::try_from(symbol)?),
            None => None,
        };
        Ok(Self::new(from, to, promotion))
    }
}

impl fmt::Display for Move {
    /// Serializes a move in long algebraic notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}

/// A square of the board addressed by zero-based `(row, column)`
/// coordinates. Row 0 is Black's back rank (rank 8), row 7 is White's back
/// rank (rank 1); column 0 is the a-file.
///
/// ```
/// use tabiya::chess::core::Square;
///
/// let e2 = Square::try_from("e2").unwrap();
/// assert_eq!((e2.row(), e2.column()), (6, 4));
/// assert_eq!(Square::new(0, 0).unwrap().to_string(), "a8");
/// assert!(Square::new(8, 0).is_none());
/// ```
///
/// Square is a compact representation using only one byte.
///
/// ```
/// use tabiya::chess::core::Square;
///
/// assert_eq!(std::mem::size_of::<Square>(), 1);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    /// Creates a square from its coordinates, or [`None`] if any of them is
    /// outside `0..BOARD_WIDTH`.
    #[must_use]
    pub const fn new(row: u8, column: u8) -> Option<Self> {
        if row < BOARD_WIDTH && column < BOARD_WIDTH {
            Some(Self(row * BOARD_WIDTH + column))
        } else {
            None
        }
    }

    /// Creates a square from coordinates known to be within the board.
    pub(super) const fn new_unchecked(row: u8, column: u8) -> Self {
        debug_assert!(row < BOARD_WIDTH && column < BOARD_WIDTH);
        Self(row * BOARD_WIDTH + column)
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn row(self) -> u8 {
        self.0 / BOARD_WIDTH
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn column(self) -> u8 {
        self.0 % BOARD_WIDTH
    }

    /// Position of the square in row-major order, `0..BOARD_SIZE`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the square shifted by given number of rows and columns or
    /// [`None`] if it would fall off the board.
    #[must_use]
    pub fn offset(self, rows: i8, columns: i8) -> Option<Self> {
        let row = i16::from(self.row()) + i16::from(rows);
        let column = i16::from(self.column()) + i16::from(columns);
        Self::new(u8::try_from(row).ok()?, u8::try_from(column).ok()?)
    }

    /// Iterates over all squares in row-major order, starting from a8.
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..BOARD_SIZE).map(Self)
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its row-major index.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        if square_index >= BOARD_SIZE {
            bail!("square index should be in 0..BOARD_SIZE, got {square_index}");
        }
        Ok(Self(square_index))
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            );
        };
        let column = match file {
            'a'..='h' => file as u8 - b'a',
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        };
        let row = match rank {
            '1'..='8' => b'8' - rank as u8,
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        };
        match Self::new(row, column) {
            Some(square) => Ok(square),
            None => bail!("square {square} is outside the board"),
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + self.column()) as char)?;
        f.write_char((b'8' - self.row()) as char)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Row delta of a pawn push: White pawns move towards row 0.
    pub(super) const fn push_direction(self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// Row where the pieces of the player are placed in the starting
    /// position.
    pub(super) const fn backrank(self) -> u8 {
        match self {
            Self::White => BOARD_WIDTH - 1,
            Self::Black => 0,
        }
    }

    /// Row where the player's pawns can be pushed two squares from.
    pub(super) const fn pawns_starting(self) -> u8 {
        match self {
            Self::White => BOARD_WIDTH - 2,
            Self::Black => 1,
        }
    }

    /// Row where the player's pawns get promoted.
    #[must_use]
    pub const fn promotion_rank(self) -> u8 {
        self.opponent().backrank()
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        })
    }
}

/// The only valid promotions are to Queen, Rook, Bishop or Knight: this is a
/// subset of [`PieceKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    /// All promotion choices, strongest first.
    pub const ALL: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];
}

impl TryFrom<char> for Promotion {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol {
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            _ => bail!("promotion should be one of \"qrbn\", got '{symbol}'"),
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", PieceKind::from(*self))
    }
}

/// Represents a specific piece owned by a player.
///
/// `has_moved` is only meaningful for kings and rooks, where it gates
/// castling. It is carried (and set after every move) for all other kinds,
/// too.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
    #[allow(missing_docs)]
    pub has_moved: bool,
}

impl Piece {
    /// Creates a piece that has not moved yet.
    #[must_use]
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self {
            owner,
            kind,
            has_moved: false,
        }
    }

    /// Returns the same piece with `has_moved` set.
    #[must_use]
    pub const fn moved(self) -> Self {
        Self {
            has_moved: true,
            ..self
        }
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    /// Parses a piece from its FEN symbol: uppercase for White, lowercase for
    /// Black. The resulting piece has not moved.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        Ok(Self::new(owner, kind))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.to_string();
        match self.owner {
            Player::White => f.write_str(&symbol.to_ascii_uppercase()),
            Player::Black => f.write_str(&symbol),
        }
    }
}

/// Side of the board the king castles towards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastlingSide {
    /// Kingside (O-O): the rook starts 3 columns towards the h-file.
    Short,
    /// Queenside (O-O-O): the rook starts 4 columns towards the a-file.
    Long,
}

impl CastlingSide {
    /// Column step of the king towards the castling rook.
    pub(super) const fn direction(self) -> i8 {
        match self {
            Self::Short => 1,
            Self::Long => -1,
        }
    }

    /// Column distance from the unmoved king to the castling rook.
    pub(super) const fn rook_offset(self) -> i8 {
        match self {
            Self::Short => 3,
            Self::Long => -4,
        }
    }
}
