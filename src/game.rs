//! The match state machine: selection, move commit and outcome evaluation,
//! driven by one board-coordinate pick at a time.

use crate::board::Board;
use crate::config::MatchConfig;
use crate::events::{age_queue, CaptureEvent, MoveEvent, Notice};
use crate::rules::{all_legal_moves, is_in_check, legal_moves_from};
use crate::types::{Move, Side, Square};
use crate::zobrist::ZOBRIST;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchOutcome {
    Ongoing,
    Won(Side),
}

/// Structured status line. `Display` gives an English default.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    ToMove { side: Side, in_check: bool },
    Won { winner: Side },
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::ToMove { side, in_check: false } => write!(f, "{} to move", side),
            Status::ToMove { side, in_check: true } => write!(f, "{} to move (in check)", side),
            Status::Won { winner } => write!(f, "{} wins", winner),
        }
    }
}

// --- Match State ---
#[derive(Debug, Clone)]
pub struct MatchState {
    config: MatchConfig,
    board: Board,
    side_to_move: Side,
    selection: Option<Square>,
    /// Destinations of the selected piece; empty when nothing is selected.
    legal_targets: HashSet<Square>,
    outcome: MatchOutcome,
    last_move: Option<Move>,
    capture_events: Vec<CaptureEvent>,
    move_events: Vec<MoveEvent>,
    notice: Option<Notice>,
    /// Seconds left for a transient notice. Ignored for final notices.
    notice_timer: f32,
}

impl MatchState {
    /// A fresh game with default display timings.
    pub fn new() -> Self {
        Self::with_config(MatchConfig::default())
    }

    /// Unusable durations in `config` fall back to their defaults.
    pub fn with_config(config: MatchConfig) -> Self {
        MatchState {
            config: config.sanitized(),
            board: Board::initial_layout(),
            side_to_move: Side::Red,
            selection: None,
            legal_targets: HashSet::new(),
            outcome: MatchOutcome::Ongoing,
            last_move: None,
            capture_events: Vec::new(),
            move_events: Vec::new(),
            notice: None,
            notice_timer: 0.0,
        }
    }

    /// Starts from an arbitrary position. The position is evaluated at once, so a
    /// side to move with no legal moves has already lost.
    pub fn from_position(board: Board, side_to_move: Side, config: MatchConfig) -> Self {
        let mut state = MatchState {
            board,
            side_to_move,
            ..Self::with_config(config)
        };
        state.evaluate_outcome();
        state
    }

    /// Replaces the whole state with a fresh game, keeping the config.
    pub fn reset(&mut self) {
        info!("match reset");
        *self = Self::with_config(self.config);
    }

    // --- Accessors ---

    pub fn board(&self) -> &Board { &self.board }
    pub fn side_to_move(&self) -> Side { self.side_to_move }
    pub fn selection(&self) -> Option<Square> { self.selection }
    pub fn legal_targets(&self) -> &HashSet<Square> { &self.legal_targets }
    pub fn outcome(&self) -> MatchOutcome { self.outcome }
    pub fn last_move(&self) -> Option<Move> { self.last_move }
    pub fn config(&self) -> &MatchConfig { &self.config }
    pub fn capture_events(&self) -> &[CaptureEvent] { &self.capture_events }
    pub fn move_events(&self) -> &[MoveEvent] { &self.move_events }

    pub fn in_check(&self, side: Side) -> bool {
        is_in_check(&self.board, side)
    }

    pub fn status(&self) -> Status {
        match self.outcome {
            MatchOutcome::Won(winner) => Status::Won { winner },
            MatchOutcome::Ongoing => Status::ToMove {
                side: self.side_to_move,
                in_check: self.in_check(self.side_to_move),
            },
        }
    }

    /// The notice to show right now: a check notice while its timer runs, or the
    /// final checkmate/stalemate notice once the game is over.
    pub fn notice(&self) -> Option<Notice> {
        let notice = self.notice?;
        if notice.is_final() || self.notice_timer > 0.0 {
            Some(notice)
        } else {
            None
        }
    }

    /// Zobrist key of the board plus side to move.
    pub fn position_key(&self) -> u64 {
        self.board.position_key() ^ ZOBRIST.side_to_move(self.side_to_move)
    }

    /// Drains pending capture cues. Presentation calls this once it has taken them over.
    pub fn take_capture_events(&mut self) -> Vec<CaptureEvent> {
        std::mem::take(&mut self.capture_events)
    }

    pub fn take_move_events(&mut self) -> Vec<MoveEvent> {
        std::mem::take(&mut self.move_events)
    }

    // --- Input Handling ---

    /// Feeds one board pick into the state machine. Returns whether anything changed.
    ///
    /// Misclicks (finished game, off-board square, illegal target) are silent no-ops.
    pub fn handle_selection(&mut self, square: Square) -> bool {
        if self.outcome != MatchOutcome::Ongoing {
            trace!("ignoring pick at {}: game is over", square);
            return false;
        }
        if !square.in_bounds() {
            trace!("ignoring off-board pick at {}", square);
            return false;
        }

        let owns_square = self
            .board
            .piece_at(square)
            .is_some_and(|p| p.side == self.side_to_move);

        let Some(selected) = self.selection else {
            if owns_square {
                self.select(square);
                return true;
            }
            return false;
        };

        if selected == square {
            trace!("deselected {}", square);
            self.clear_selection();
            return true;
        }

        if owns_square {
            self.select(square);
            return true;
        }

        if !self.legal_targets.contains(&square) {
            trace!("{} is not a legal target from {}, keeping selection", square, selected);
            return false;
        }

        self.commit(Move::new(selected, square));
        true
    }

    fn select(&mut self, square: Square) {
        self.selection = Some(square);
        self.legal_targets = legal_moves_from(&self.board, square, self.side_to_move)
            .into_iter()
            .map(|mv| mv.to)
            .collect();
        trace!("selected {} with {} legal targets", square, self.legal_targets.len());
    }

    fn clear_selection(&mut self) {
        self.selection = None;
        self.legal_targets.clear();
    }

    /// Applies a move taken from the cached legal targets and hands the turn over.
    fn commit(&mut self, mv: Move) {
        let Some(moving) = self.board.piece_at(mv.from) else {
            debug_assert!(false, "selection {} holds no piece", mv.from);
            self.clear_selection();
            return;
        };

        let captured = self.board.apply_move(mv);
        if let Some(piece) = captured {
            self.capture_events.push(CaptureEvent {
                piece,
                square: mv.to,
                elapsed: 0.0,
                duration: self.config.capture_display_seconds,
            });
        }
        self.move_events.push(MoveEvent {
            piece: moving,
            from: mv.from,
            to: mv.to,
            elapsed: 0.0,
            duration: self.config.move_display_seconds,
        });

        self.last_move = Some(mv);
        self.clear_selection();
        self.side_to_move = self.side_to_move.opponent();

        debug!(
            "{} {:?} {} captured {:?} (key {:016x})",
            moving.side,
            moving.kind,
            mv,
            captured.map(|p| p.kind),
            self.position_key()
        );

        self.evaluate_outcome();
    }

    // --- Outcome Evaluation ---

    /// Runs against the side now to move. No legal moves is a loss whether or not
    /// that side is in check.
    fn evaluate_outcome(&mut self) {
        let side = self.side_to_move;
        let in_check = is_in_check(&self.board, side);

        if all_legal_moves(&self.board, side).is_empty() {
            let winner = side.opponent();
            self.outcome = MatchOutcome::Won(winner);
            let notice = if in_check {
                Notice::Checkmate { winner }
            } else {
                Notice::Stalemate { winner }
            };
            info!("{}", notice);
            self.set_notice(Some(notice), 0.0);
            return;
        }

        if in_check {
            let notice = Notice::Check { checker: side.opponent() };
            self.set_notice(Some(notice), self.config.check_notice_seconds);
        } else {
            self.set_notice(None, 0.0);
        }
    }

    fn set_notice(&mut self, notice: Option<Notice>, seconds: f32) {
        if notice != self.notice {
            if let Some(check @ Notice::Check { .. }) = notice {
                debug!("{}", check);
            }
            self.notice = notice;
        }
        self.notice_timer = seconds;
    }

    // --- Clocks ---

    /// Ages the presentation cues by `dt` seconds. Negative or NaN `dt` counts as zero.
    pub fn advance_clocks(&mut self, dt: f32) {
        let dt = dt.max(0.0);

        age_queue(&mut self.capture_events, dt);
        age_queue(&mut self.move_events, dt);

        if self.outcome == MatchOutcome::Ongoing && self.notice_timer > 0.0 {
            self.notice_timer -= dt;
            if self.notice_timer <= 0.0 {
                self.notice_timer = 0.0;
                self.notice = None;
            }
        }
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        if let Some(notice) = self.notice() {
            write!(f, "{}  ", notice)?;
        }
        writeln!(f, "{}", self.status())
    }
}
