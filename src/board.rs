use crate::error::BoardError;
use crate::types::{Move, Piece, PieceKind, Side, Square};
use crate::zobrist::ZOBRIST;
use serde::{Deserialize, Serialize};
use std::fmt;

const FILES: usize = Square::FILES as usize;
const RANKS: usize = Square::RANKS as usize;

// Back rank, file 0 to file 8. Identical for both sides.
const BACK_RANK: [PieceKind; FILES] = [
    PieceKind::Chariot, PieceKind::Horse, PieceKind::Elephant, PieceKind::Advisor,
    PieceKind::General,
    PieceKind::Advisor, PieceKind::Elephant, PieceKind::Horse, PieceKind::Chariot,
];
const CANNON_FILES: [i8; 2] = [1, 7];
const SOLDIER_FILES: [i8; 5] = [0, 2, 4, 6, 8];

/// Contents of one intersection.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Piece),
}

impl Cell {
    pub fn piece(&self) -> Option<Piece> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(piece) => Some(*piece),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

// --- Board ---

/// The 9x10 grid, indexed `cells[rank][file]`.
///
/// After construction the only write path is [`Board::apply_move`].
/// Serialized as a piece list; deserializing goes through [`Board::from_pieces`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<(Square, Piece)>", into = "Vec<(Square, Piece)>")]
pub struct Board {
    cells: [[Cell; FILES]; RANKS],
}

impl Board {
    pub fn empty() -> Self {
        Board { cells: [[Cell::Empty; FILES]; RANKS] }
    }

    /// The standard starting position: Red on ranks 0-4, Black mirrored on ranks 5-9.
    pub fn initial_layout() -> Self {
        let mut board = Board::empty();
        for (side, back, cannons, soldiers) in [(Side::Red, 0, 2, 3), (Side::Black, 9, 7, 6)] {
            for (file, kind) in BACK_RANK.iter().enumerate() {
                board.put(Square::new(file as i8, back), Piece::new(side, *kind));
            }
            for file in CANNON_FILES {
                board.put(Square::new(file, cannons), Piece::new(side, PieceKind::Cannon));
            }
            for file in SOLDIER_FILES {
                board.put(Square::new(file, soldiers), Piece::new(side, PieceKind::Soldier));
            }
        }
        board
    }

    /// Builds an arbitrary position. Rejects off-board squares, two pieces on one
    /// square and a second General for the same side. Boards without Generals are
    /// allowed.
    pub fn from_pieces<I>(pieces: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = (Square, Piece)>,
    {
        let mut board = Board::empty();
        for (sq, piece) in pieces {
            if !sq.in_bounds() {
                return Err(BoardError::OutOfBounds(sq));
            }
            if !board.cell(sq).is_empty() {
                return Err(BoardError::Occupied(sq));
            }
            if piece.kind == PieceKind::General && board.find_general(piece.side).is_some() {
                return Err(BoardError::DuplicateGeneral(piece.side));
            }
            board.put(sq, piece);
        }
        Ok(board)
    }

    fn put(&mut self, sq: Square, piece: Piece) {
        self.cells[sq.rank as usize][sq.file as usize] = Cell::Occupied(piece);
    }

    /// Cell at `sq`. Off-board squares read as empty.
    pub fn cell(&self, sq: Square) -> Cell {
        if !sq.in_bounds() {
            return Cell::Empty;
        }
        self.cells[sq.rank as usize][sq.file as usize]
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.cell(sq).piece()
    }

    pub fn is_occupied(&self, sq: Square) -> bool {
        !self.cell(sq).is_empty()
    }

    /// All pieces in rank-major, file-minor order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells.iter().enumerate().flat_map(|(rank, row)| {
            row.iter().enumerate().filter_map(move |(file, cell)| {
                cell.piece().map(|p| (Square::new(file as i8, rank as i8), p))
            })
        })
    }

    pub fn find_general(&self, side: Side) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| p.side == side && p.kind == PieceKind::General)
            .map(|(sq, _)| sq)
    }

    pub fn count(&self, side: Side) -> usize {
        self.pieces().filter(|(_, p)| p.side == side).count()
    }

    /// Relocates the piece on `mv.from` to `mv.to` and returns whatever stood on `mv.to`.
    ///
    /// Performs no legality check: callers must only pass moves produced by
    /// [`legal_moves_from`](crate::rules::legal_moves_from) or
    /// [`all_legal_moves`](crate::rules::all_legal_moves), or scratch trials of
    /// pseudo-legal moves. Moving from an empty or off-board square is a contract
    /// violation.
    pub fn apply_move(&mut self, mv: Move) -> Option<Piece> {
        if !mv.from.in_bounds() || !mv.to.in_bounds() {
            debug_assert!(false, "apply_move with off-board move {}", mv);
            return None;
        }
        let Some(moving) = self.piece_at(mv.from) else {
            debug_assert!(false, "apply_move from empty square {}", mv.from);
            return None;
        };
        let captured = self.piece_at(mv.to);
        self.cells[mv.from.rank as usize][mv.from.file as usize] = Cell::Empty;
        self.put(mv.to, moving);
        captured
    }

    /// Non-mutating form of [`Board::apply_move`].
    pub fn after_move(&self, mv: Move) -> (Board, Option<Piece>) {
        let mut next = self.clone();
        let captured = next.apply_move(mv);
        (next, captured)
    }

    /// Zobrist key over piece placement only.
    pub fn position_key(&self) -> u64 {
        let zob = &*ZOBRIST;
        self.pieces().fold(0u64, |key, (sq, piece)| key ^ zob.piece(piece, sq))
    }
}

impl TryFrom<Vec<(Square, Piece)>> for Board {
    type Error = BoardError;

    fn try_from(pieces: Vec<(Square, Piece)>) -> Result<Self, Self::Error> {
        Board::from_pieces(pieces)
    }
}

impl From<Board> for Vec<(Square, Piece)> {
    fn from(board: Board) -> Self {
        board.pieces().collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::initial_layout()
    }
}

/// Whether `sq` lies on the 9x10 board.
pub fn in_bounds(sq: Square) -> bool {
    sq.in_bounds()
}

// Rank 9 on top, Red's side at the bottom.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..RANKS).rev() {
            write!(f, "{} ", rank)?;
            for file in 0..FILES {
                match self.cells[rank][file] {
                    Cell::Occupied(piece) => write!(f, " {}", piece)?,
                    Cell::Empty => write!(f, " .")?,
                }
            }
            writeln!(f)?;
            if rank == 5 {
                writeln!(f, "  ~~~~~~~~~~~~~~~~~~")?;
            }
        }
        write!(f, "  ")?;
        for file in 0..FILES {
            write!(f, " {}", file)?;
        }
        writeln!(f)
    }
}
