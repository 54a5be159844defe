//! Xiangqi move generation and check detection.
//!
//! Everything here is a pure function of its inputs. Legality is decided by
//! brute force: every pseudo-legal move is tried on a scratch copy of the board
//! and kept only if the mover's General is not left in check.

use crate::board::Board;
use crate::types::{Move, Piece, PieceKind, Side, Square};
use log::debug;

// (df, dr) step tables
const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ELEPHANT: [(i8, i8); 4] = [(2, 2), (2, -2), (-2, 2), (-2, -2)];
const HORSE: [(i8, i8); 8] = [
    (2, 1), (2, -1), (-2, 1), (-2, -1),
    (1, 2), (1, -2), (-1, 2), (-1, -2),
];

// --- Geometry helpers ---

/// The square that blocks a Horse jump by `(df, dr)`: one step along the long axis.
fn horse_leg(from: Square, df: i8, dr: i8) -> Square {
    if df.abs() == 2 {
        from.offset(df / 2, 0)
    } else {
        from.offset(0, dr / 2)
    }
}

/// Whether a Soldier standing on `sq` has crossed the river.
fn crossed_river(side: Side, sq: Square) -> bool {
    !sq.on_own_half(side)
}

/// Number of pieces strictly between two squares on the same file or rank.
/// `None` if the squares are not aligned.
fn pieces_between(board: &Board, a: Square, b: Square) -> Option<usize> {
    if a == b || (a.file != b.file && a.rank != b.rank) {
        return None;
    }
    let df = (b.file - a.file).signum();
    let dr = (b.rank - a.rank).signum();
    let mut count = 0;
    let mut cur = a.offset(df, dr);
    while cur != b {
        if board.is_occupied(cur) {
            count += 1;
        }
        cur = cur.offset(df, dr);
    }
    Some(count)
}

/// Both Generals on one file with nothing between them.
pub fn generals_facing(board: &Board) -> bool {
    let (Some(red), Some(black)) = (board.find_general(Side::Red), board.find_general(Side::Black)) else {
        return false;
    };
    red.file == black.file && pieces_between(board, red, black) == Some(0)
}

/// Whether `piece` standing on `from` attacks `target`.
///
/// Same geometry as move generation, phrased as a point test. Occupancy of
/// `target` itself is ignored. Facing Generals are handled by [`generals_facing`].
/// False when either square is off the board.
pub fn attacks_square(board: &Board, from: Square, piece: Piece, target: Square) -> bool {
    if !from.in_bounds() || !target.in_bounds() {
        return false;
    }
    let df = target.file - from.file;
    let dr = target.rank - from.rank;

    match piece.kind {
        PieceKind::General => target.in_palace(piece.side) && df.abs() + dr.abs() == 1,
        PieceKind::Advisor => target.in_palace(piece.side) && df.abs() == 1 && dr.abs() == 1,
        PieceKind::Elephant => {
            target.on_own_half(piece.side)
                && df.abs() == 2
                && dr.abs() == 2
                && !board.is_occupied(from.offset(df / 2, dr / 2))
        }
        PieceKind::Horse => {
            let shape = (df.abs() == 2 && dr.abs() == 1) || (df.abs() == 1 && dr.abs() == 2);
            shape && !board.is_occupied(horse_leg(from, df, dr))
        }
        PieceKind::Chariot => pieces_between(board, from, target) == Some(0),
        PieceKind::Cannon => pieces_between(board, from, target) == Some(1),
        PieceKind::Soldier => {
            if df == 0 && dr == piece.side.forward() {
                return true;
            }
            crossed_river(piece.side, from) && df.abs() == 1 && dr == 0
        }
    }
}

// --- Pseudo-Legal Move Generation ---

/// Moves allowed by the movement pattern of the `side` piece on `from`, ignoring
/// whether the mover's own General ends up in check.
///
/// Empty when `from` is off the board, empty, or holds an enemy piece.
pub fn pseudo_moves_from(board: &Board, from: Square, side: Side) -> Vec<Move> {
    let mut moves = Vec::with_capacity(17);
    if !from.in_bounds() {
        return moves;
    }
    let Some(piece) = board.piece_at(from) else {
        return moves;
    };
    if piece.side != side {
        return moves;
    }

    // Destination must be on the board and not hold a friendly piece.
    let push_if_ok = |to: Square, moves: &mut Vec<Move>| {
        if !to.in_bounds() {
            return;
        }
        if board.piece_at(to).is_some_and(|p| p.side == side) {
            return;
        }
        moves.push(Move::new(from, to));
    };

    match piece.kind {
        PieceKind::General => {
            for (df, dr) in ORTHOGONAL {
                let to = from.offset(df, dr);
                if to.in_palace(side) {
                    push_if_ok(to, &mut moves);
                }
            }
        }
        PieceKind::Advisor => {
            for (df, dr) in DIAGONAL {
                let to = from.offset(df, dr);
                if to.in_palace(side) {
                    push_if_ok(to, &mut moves);
                }
            }
        }
        PieceKind::Elephant => {
            for (df, dr) in ELEPHANT {
                let to = from.offset(df, dr);
                if !to.in_bounds() || !to.on_own_half(side) {
                    continue;
                }
                if board.is_occupied(from.offset(df / 2, dr / 2)) {
                    continue; // eye blocked
                }
                push_if_ok(to, &mut moves);
            }
        }
        PieceKind::Horse => {
            for (df, dr) in HORSE {
                let to = from.offset(df, dr);
                if !to.in_bounds() || board.is_occupied(horse_leg(from, df, dr)) {
                    continue;
                }
                push_if_ok(to, &mut moves);
            }
        }
        PieceKind::Chariot => {
            for (df, dr) in ORTHOGONAL {
                let mut to = from.offset(df, dr);
                while to.in_bounds() {
                    match board.piece_at(to) {
                        None => moves.push(Move::new(from, to)),
                        Some(target) => {
                            if target.side != side {
                                moves.push(Move::new(from, to));
                            }
                            break;
                        }
                    }
                    to = to.offset(df, dr);
                }
            }
        }
        PieceKind::Cannon => {
            for (df, dr) in ORTHOGONAL {
                let mut to = from.offset(df, dr);
                let mut screened = false;
                while to.in_bounds() {
                    match (screened, board.piece_at(to)) {
                        (false, None) => moves.push(Move::new(from, to)),
                        (false, Some(_)) => screened = true,
                        (true, None) => {}
                        (true, Some(target)) => {
                            if target.side != side {
                                moves.push(Move::new(from, to));
                            }
                            break;
                        }
                    }
                    to = to.offset(df, dr);
                }
            }
        }
        PieceKind::Soldier => {
            push_if_ok(from.offset(0, side.forward()), &mut moves);
            if crossed_river(side, from) {
                push_if_ok(from.offset(-1, 0), &mut moves);
                push_if_ok(from.offset(1, 0), &mut moves);
            }
        }
    }

    moves
}

// --- Check Detection ---

/// Whether `side`'s General is attacked, either by an enemy piece or by the
/// opposing General across an open file (which puts both sides in check).
///
/// A side with no General on the board is reported as not in check.
pub fn is_in_check(board: &Board, side: Side) -> bool {
    let Some(general) = board.find_general(side) else {
        debug!("no {} General on the board, treating as not in check", side);
        return false;
    };

    if generals_facing(board) {
        return true;
    }

    let enemy = side.opponent();
    board
        .pieces()
        .filter(|(_, p)| p.side == enemy)
        .any(|(sq, p)| attacks_square(board, sq, p, general))
}

// --- Legal Move Generation ---

/// Pseudo-legal moves from `from` that do not leave `side` in check.
pub fn legal_moves_from(board: &Board, from: Square, side: Side) -> Vec<Move> {
    pseudo_moves_from(board, from, side)
        .into_iter()
        .filter(|&mv| {
            let (trial, _) = board.after_move(mv);
            !is_in_check(&trial, side)
        })
        .collect()
}

/// Every legal move for `side`, scanning origins rank by rank, file by file.
pub fn all_legal_moves(board: &Board, side: Side) -> Vec<Move> {
    board
        .pieces()
        .filter(|(_, p)| p.side == side)
        .flat_map(|(sq, _)| legal_moves_from(board, sq, side))
        .collect()
}

/// Pure form of [`Board::apply_move`]: the resulting board and the captured piece.
pub fn apply_move(board: &Board, mv: Move) -> (Board, Option<Piece>) {
    board.after_move(mv)
}
