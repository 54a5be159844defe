use serde::{Deserialize, Serialize};
use std::fmt;

// --- Enums and Basic Structs ---

/// The two players. Red moves first.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side { Red, Black }

impl Side {
    pub fn opponent(&self) -> Side {
        match self { Side::Red => Side::Black, Side::Black => Side::Red }
    }

    pub fn index(&self) -> usize { // Helper for Zobrist indexing
        match self { Side::Red => 0, Side::Black => 1 }
    }

    /// Rank step of a Soldier moving "forward".
    pub fn forward(&self) -> i8 {
        match self { Side::Red => 1, Side::Black => -1 }
    }

    pub fn name(&self) -> &'static str {
        match self { Side::Red => "Red", Side::Black => "Black" }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceKind { General, Advisor, Elephant, Horse, Chariot, Cannon, Soldier }

impl PieceKind {
    pub fn index(&self) -> usize {
        match self {
            PieceKind::General => 0, PieceKind::Advisor => 1, PieceKind::Elephant => 2,
            PieceKind::Horse => 3, PieceKind::Chariot => 4, PieceKind::Cannon => 5,
            PieceKind::Soldier => 6,
        }
    }

    fn letter(&self) -> char {
        match self {
            PieceKind::General => 'g', PieceKind::Advisor => 'a', PieceKind::Elephant => 'e',
            PieceKind::Horse => 'h', PieceKind::Chariot => 'r', PieceKind::Cannon => 'c',
            PieceKind::Soldier => 's',
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(side: Side, kind: PieceKind) -> Self { Piece { side, kind } }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self.side {
            Side::Red => self.kind.letter().to_ascii_uppercase(),
            Side::Black => self.kind.letter(),
        };
        write!(f, "{}", symbol)
    }
}

/// A board intersection. `file` runs 0..=8 left to right from Red's seat,
/// `rank` runs 0..=9 from Red's back rank to Black's.
///
/// Squares are plain coordinates and may be off the board; check with
/// [`Square::in_bounds`] before indexing.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub file: i8,
    pub rank: i8,
}

impl Square {
    pub const FILES: i8 = 9;
    pub const RANKS: i8 = 10;

    pub const fn new(file: i8, rank: i8) -> Self { Square { file, rank } }

    pub fn in_bounds(&self) -> bool {
        (0..Self::FILES).contains(&self.file) && (0..Self::RANKS).contains(&self.rank)
    }

    pub fn offset(&self, df: i8, dr: i8) -> Square {
        Square::new(self.file + df, self.rank + dr)
    }

    /// Row-major index into a 90-cell grid. Only meaningful when in bounds.
    pub fn index(&self) -> usize {
        debug_assert!(self.in_bounds());
        (self.rank as usize) * (Self::FILES as usize) + self.file as usize
    }

    pub fn in_palace(&self, side: Side) -> bool {
        if !(3..=5).contains(&self.file) { return false; }
        match side {
            Side::Red => (0..=2).contains(&self.rank),
            Side::Black => (7..=9).contains(&self.rank),
        }
    }

    /// Whether the square lies on `side`'s half of the river.
    pub fn on_own_half(&self, side: Side) -> bool {
        match side {
            Side::Red => self.rank <= 4,
            Side::Black => self.rank >= 5,
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.file, self.rank)
    }
}

/// A candidate relocation. Carries no metadata; legality depends on the board.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self { Move { from, to } }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}
