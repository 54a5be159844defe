use crate::types::{Piece, Side, Square};
use lazy_static::lazy_static;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

const CELLS: usize = (Square::FILES as usize) * (Square::RANKS as usize);

lazy_static! {
    pub(crate) static ref ZOBRIST: ZobristTable = ZobristTable::new();
}

// --- Zobrist Hashing ---
#[derive(Debug, Clone)]
pub(crate) struct ZobristTable {
    // piece[side][kind][square]
    piece_keys: [[[u64; CELLS]; 7]; 2],
    black_to_move_key: u64,
}

impl ZobristTable {
    fn new() -> Self {
        // Fixed seed so keys are stable across runs
        let mut rng = StdRng::seed_from_u64(0x5849_414E_4751_4931);
        let mut table = ZobristTable {
            piece_keys: [[[0; CELLS]; 7]; 2],
            black_to_move_key: rng.next_u64(),
        };

        for side in table.piece_keys.iter_mut() {
            for kind in side.iter_mut() {
                for key in kind.iter_mut() {
                    *key = rng.next_u64();
                }
            }
        }

        table
    }

    #[inline(always)]
    pub(crate) fn piece(&self, piece: Piece, sq: Square) -> u64 {
        self.piece_keys[piece.side.index()][piece.kind.index()][sq.index()]
    }

    /// Key component for side to move. Zero for Red.
    #[inline(always)]
    pub(crate) fn side_to_move(&self, side: Side) -> u64 {
        if side == Side::Black { self.black_to_move_key } else { 0 }
    }
}
