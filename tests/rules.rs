use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use xiangqi::{
    all_legal_moves, apply_move, in_bounds, initial_layout, is_in_check, legal_moves_from,
    pseudo_moves_from, Board, Move, Piece, PieceKind, Side, Square,
};

use PieceKind::*;
use Side::*;

fn sq(file: i8, rank: i8) -> Square {
    Square::new(file, rank)
}

fn board(pieces: &[(i8, i8, Side, PieceKind)]) -> Board {
    Board::from_pieces(
        pieces
            .iter()
            .map(|&(file, rank, side, kind)| (sq(file, rank), Piece::new(side, kind))),
    )
    .unwrap()
}

fn targets(moves: &[Move]) -> HashSet<Square> {
    moves.iter().map(|mv| mv.to).collect()
}

fn target_set(squares: &[(i8, i8)]) -> HashSet<Square> {
    squares.iter().map(|&(f, r)| sq(f, r)).collect()
}

// Every legal move is pseudo-legal, and every pseudo-legal move that was
// filtered out really leaves the mover in check.
fn assert_legality_filter(board: &Board, side: Side) {
    for (from, _) in board.pieces().filter(|(_, p)| p.side == side) {
        let pseudo = pseudo_moves_from(board, from, side);
        let legal = legal_moves_from(board, from, side);
        for mv in &legal {
            assert!(pseudo.contains(mv), "{} legal but not pseudo-legal", mv);
        }
        for mv in pseudo.iter().filter(|mv| !legal.contains(mv)) {
            let (after, _) = apply_move(board, *mv);
            assert!(is_in_check(&after, side), "{} filtered without leaving check", mv);
        }
    }
}

#[test]
fn initial_layout_has_sixteen_pieces_a_side() {
    let board = initial_layout();
    assert_eq!(board.count(Red), 16);
    assert_eq!(board.count(Black), 16);
    assert!(board.pieces().all(|(sq, _)| in_bounds(sq)));

    let expected_red = [
        (0, 0, Chariot), (1, 0, Horse), (2, 0, Elephant), (3, 0, Advisor), (4, 0, General),
        (5, 0, Advisor), (6, 0, Elephant), (7, 0, Horse), (8, 0, Chariot),
        (1, 2, Cannon), (7, 2, Cannon),
        (0, 3, Soldier), (2, 3, Soldier), (4, 3, Soldier), (6, 3, Soldier), (8, 3, Soldier),
    ];
    for (file, rank, kind) in expected_red {
        assert_eq!(board.piece_at(sq(file, rank)), Some(Piece::new(Red, kind)));
        assert_eq!(board.piece_at(sq(file, 9 - rank)), Some(Piece::new(Black, kind)));
    }
}

#[test]
fn in_bounds_edges() {
    assert!(in_bounds(sq(0, 0)));
    assert!(in_bounds(sq(8, 9)));
    assert!(!in_bounds(sq(9, 0)));
    assert!(!in_bounds(sq(0, 10)));
    assert!(!in_bounds(sq(-1, 4)));
}

#[test]
fn opening_move_count_is_pinned() {
    let board = initial_layout();
    let moves = all_legal_moves(&board, Red);
    assert_eq!(moves.len(), 44);
    assert_eq!(all_legal_moves(&board, Black).len(), 44);
    assert_eq!(moves, all_legal_moves(&board, Red));
    // scan order: rank 0 first, chariot on file 0 leads
    assert_eq!(moves[0].from, sq(0, 0));
}

#[test]
fn legal_moves_are_filtered_pseudo_moves() {
    let pinned = board(&[
        (4, 0, Red, General),
        (4, 3, Red, Chariot),
        (4, 8, Black, Chariot),
        (3, 9, Black, General),
    ]);
    assert_legality_filter(&pinned, Red);
    assert_legality_filter(&pinned, Black);

    // the pinned chariot may only slide along the file
    let chariot = legal_moves_from(&pinned, sq(4, 3), Red);
    assert!(chariot.iter().all(|mv| mv.to.file == 4));
    assert!(chariot.iter().any(|mv| mv.to == sq(4, 8)));
    assert!(pseudo_moves_from(&pinned, sq(4, 3), Red).iter().any(|mv| mv.to == sq(0, 3)));

    // stepping onto file 3 would face the Black General
    let general = targets(&legal_moves_from(&pinned, sq(4, 0), Red));
    assert_eq!(general, target_set(&[(5, 0), (4, 1)]));

    assert_legality_filter(&initial_layout(), Red);
}

#[test]
fn legality_filter_holds_through_random_games() {
    let mut rng = StdRng::seed_from_u64(0x1234);
    for _ in 0..4 {
        let mut board = initial_layout();
        let mut side = Red;
        for _ in 0..40 {
            assert_legality_filter(&board, side);
            let moves = all_legal_moves(&board, side);
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.random_range(0..moves.len())];
            board.apply_move(mv);
            assert!(!is_in_check(&board, side), "{} left the mover in check", mv);
            side = side.opponent();
        }
    }
}

#[test]
fn elephant_eye_blocks_every_diagonal() {
    for side in [Red, Black] {
        let homes: Vec<Square> = [(2, 0), (6, 0), (0, 2), (4, 2), (8, 2), (2, 4), (6, 4)]
            .iter()
            .map(|&(f, r)| if side == Red { sq(f, r) } else { sq(f, 9 - r) })
            .collect();

        for &from in &homes {
            let alone = Board::from_pieces([(from, Piece::new(side, Elephant))]).unwrap();
            let open = targets(&legal_moves_from(&alone, from, side));

            for (df, dr) in [(2, 2), (2, -2), (-2, 2), (-2, -2)] {
                let to = from.offset(df, dr);
                if !in_bounds(to) || !to.on_own_half(side) {
                    assert!(!open.contains(&to), "elephant crossed river to {}", to);
                    continue;
                }
                assert!(open.contains(&to), "open diagonal {} -> {} missing", from, to);

                let eye = from.offset(df / 2, dr / 2);
                let blocked = Board::from_pieces([
                    (from, Piece::new(side, Elephant)),
                    (eye, Piece::new(side.opponent(), Soldier)),
                ])
                .unwrap();
                let moves = targets(&legal_moves_from(&blocked, from, side));
                assert!(!moves.contains(&to), "eye at {} did not block {} -> {}", eye, from, to);
            }
        }
    }
}

#[test]
fn horse_leg_not_destination_neighbour() {
    let clear = board(&[(1, 0, Red, Horse)]);
    assert_eq!(
        targets(&pseudo_moves_from(&clear, sq(1, 0), Red)),
        target_set(&[(0, 2), (2, 2), (3, 1)])
    );

    let leg_blocked = board(&[(1, 0, Red, Horse), (1, 1, Black, Soldier)]);
    assert_eq!(targets(&pseudo_moves_from(&leg_blocked, sq(1, 0), Red)), target_set(&[(3, 1)]));

    let diagonal_blocker = board(&[(1, 0, Red, Horse), (2, 1, Black, Soldier)]);
    assert_eq!(
        targets(&pseudo_moves_from(&diagonal_blocker, sq(1, 0), Red)),
        target_set(&[(0, 2), (2, 2), (3, 1)])
    );

    let side_leg = board(&[(1, 0, Red, Horse), (2, 0, Red, Elephant)]);
    assert_eq!(targets(&pseudo_moves_from(&side_leg, sq(1, 0), Red)), target_set(&[(0, 2), (2, 2)]));
}

#[test]
fn cannon_needs_exactly_one_screen() {
    // no screen: slides up to the enemy but cannot take it
    let none = board(&[(0, 0, Red, Cannon), (0, 5, Black, Chariot)]);
    let up: HashSet<Square> = targets(&pseudo_moves_from(&none, sq(0, 0), Red))
        .into_iter()
        .filter(|to| to.file == 0)
        .collect();
    assert_eq!(up, target_set(&[(0, 1), (0, 2), (0, 3), (0, 4)]));

    // one screen: takes the first piece beyond it, nothing past that
    let one = board(&[(0, 0, Red, Cannon), (0, 3, Red, Soldier), (0, 7, Black, Chariot)]);
    let up: HashSet<Square> = targets(&pseudo_moves_from(&one, sq(0, 0), Red))
        .into_iter()
        .filter(|to| to.file == 0)
        .collect();
    assert_eq!(up, target_set(&[(0, 1), (0, 2), (0, 7)]));

    // first piece beyond the screen is friendly: no capture on that line
    let friendly = board(&[(0, 0, Red, Cannon), (0, 3, Black, Soldier), (0, 5, Red, Horse), (0, 8, Black, Chariot)]);
    assert!(!targets(&pseudo_moves_from(&friendly, sq(0, 0), Red)).contains(&sq(0, 8)));

    // two screens: no capture at all
    let two = board(&[(0, 0, Red, Cannon), (0, 2, Red, Soldier), (0, 4, Red, Horse), (0, 7, Black, Chariot)]);
    let up: HashSet<Square> = targets(&pseudo_moves_from(&two, sq(0, 0), Red))
        .into_iter()
        .filter(|to| to.file == 0)
        .collect();
    assert_eq!(up, target_set(&[(0, 1)]));
}

#[test]
fn chariot_stops_at_first_piece() {
    let b = board(&[(4, 4, Red, Chariot), (4, 7, Black, Horse), (6, 4, Red, Soldier)]);
    let moves = targets(&pseudo_moves_from(&b, sq(4, 4), Red));
    assert!(moves.contains(&sq(4, 7)));
    assert!(!moves.contains(&sq(4, 8)));
    assert!(moves.contains(&sq(5, 4)));
    assert!(!moves.contains(&sq(6, 4)));
    assert!(moves.contains(&sq(0, 4)));
    assert!(moves.contains(&sq(4, 0)));
    assert_eq!(moves.len(), 3 + 1 + 4 + 4);
}

#[test]
fn soldier_gains_sideways_steps_after_river() {
    let b = board(&[(4, 3, Red, Soldier), (2, 5, Red, Soldier), (0, 9, Red, Soldier), (6, 6, Black, Soldier), (6, 4, Black, Soldier)]);
    assert_eq!(targets(&pseudo_moves_from(&b, sq(4, 3), Red)), target_set(&[(4, 4)]));
    assert_eq!(targets(&pseudo_moves_from(&b, sq(2, 5), Red)), target_set(&[(2, 6), (1, 5), (3, 5)]));
    assert_eq!(targets(&pseudo_moves_from(&b, sq(0, 9), Red)), target_set(&[(1, 9)]));
    assert_eq!(targets(&pseudo_moves_from(&b, sq(6, 6), Black)), target_set(&[(6, 5)]));
    assert_eq!(targets(&pseudo_moves_from(&b, sq(6, 4), Black)), target_set(&[(6, 3), (5, 4), (7, 4)]));
}

#[test]
fn general_and_advisor_stay_in_palace() {
    let b = board(&[(3, 0, Red, General), (4, 1, Red, Advisor), (5, 7, Black, General), (3, 7, Black, Advisor)]);
    assert_eq!(targets(&pseudo_moves_from(&b, sq(3, 0), Red)), target_set(&[(4, 0), (3, 1)]));
    assert_eq!(targets(&pseudo_moves_from(&b, sq(4, 1), Red)), target_set(&[(5, 0), (3, 2), (5, 2)]));
    assert_eq!(targets(&pseudo_moves_from(&b, sq(5, 7), Black)), target_set(&[(4, 7), (5, 8)]));
    assert_eq!(targets(&pseudo_moves_from(&b, sq(3, 7), Black)), target_set(&[(4, 8)]));
}

#[test]
fn pseudo_moves_reject_wrong_side_and_empty_squares() {
    let b = initial_layout();
    assert!(pseudo_moves_from(&b, sq(0, 9), Red).is_empty());
    assert!(pseudo_moves_from(&b, sq(4, 4), Red).is_empty());
    assert!(pseudo_moves_from(&b, sq(12, 4), Red).is_empty());
}

#[test]
fn facing_generals_is_mutual_check() {
    let facing = board(&[(4, 0, Red, General), (4, 9, Black, General)]);
    assert!(is_in_check(&facing, Red));
    assert!(is_in_check(&facing, Black));

    let screened = board(&[(4, 0, Red, General), (4, 5, Black, Horse), (4, 9, Black, General)]);
    assert!(!is_in_check(&screened, Red));
    assert!(!is_in_check(&screened, Black));

    let offset = board(&[(3, 0, Red, General), (4, 9, Black, General)]);
    assert!(!is_in_check(&offset, Red));
}

#[test]
fn missing_general_is_not_in_check() {
    let b = board(&[(4, 9, Black, Chariot), (4, 0, Red, Advisor)]);
    assert!(!is_in_check(&b, Red));
}

#[test]
fn cannon_and_horse_checks() {
    let cannon = board(&[(3, 0, Red, General), (4, 2, Red, Cannon), (4, 5, Red, Soldier), (4, 9, Black, General)]);
    assert!(is_in_check(&cannon, Black));
    assert!(!is_in_check(&cannon, Red));

    let unscreened = board(&[(3, 0, Red, General), (4, 2, Red, Cannon), (4, 9, Black, General)]);
    assert!(!is_in_check(&unscreened, Black));

    let horse = board(&[(5, 0, Red, General), (3, 7, Red, Horse), (4, 9, Black, General)]);
    assert!(is_in_check(&horse, Black));

    let hobbled = board(&[(5, 0, Red, General), (3, 7, Red, Horse), (3, 8, Black, Advisor), (4, 9, Black, General)]);
    assert!(!is_in_check(&hobbled, Black));
}

#[test]
fn apply_move_returns_captured_piece() {
    let b = initial_layout();
    let (after, captured) = apply_move(&b, Move::new(sq(1, 2), sq(1, 9)));
    assert_eq!(captured, Some(Piece::new(Black, Horse)));
    assert_eq!(after.piece_at(sq(1, 9)), Some(Piece::new(Red, Cannon)));
    assert_eq!(after.count(Black), 15);
    assert_eq!(b.count(Black), 16);
}

#[test]
fn transposed_positions_share_a_key() {
    let b = initial_layout();
    let a1 = Move::new(sq(0, 0), sq(0, 1));
    let a2 = Move::new(sq(8, 0), sq(8, 1));
    let (x, _) = apply_move(&b, a1);
    let (x, _) = apply_move(&x, a2);
    let (y, _) = apply_move(&b, a2);
    let (y, _) = apply_move(&y, a1);
    assert_eq!(x, y);
    assert_eq!(x.position_key(), y.position_key());
    assert_ne!(x.position_key(), b.position_key());
}
