use std::fmt;

use super::board::{Board, TileColor, TileState};

/// Pause between revealing a second tile and resolving the pair, so the
/// player gets to see both faces.
pub const GRACE_DELAY_MS: u64 = 1000;

/// Period of the elapsed-time counter.
pub const TICK_INTERVAL_MS: u64 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    NotStarted,
    InProgress,
    Won,
}

/// State changes a renderer needs to mirror.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    TileRevealed { index: usize, color: TileColor },
    TileHidden { index: usize },
    TileMatched { index: usize },
    RoundWon,
    FlipCountChanged { flips: u32 },
    ElapsedTimeChanged { elapsed_ms: u32 },
}

/// Timer work the host has to perform on the round's behalf. The round owns
/// no clock: the host starts the 100 ms ticker when asked, and arranges for
/// `resolve_pending` to run one grace delay after a second reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    StartTicker,
    ScheduleResolve,
}

#[derive(Debug)]
pub struct SelectOutcome {
    pub events: Vec<Event>,
    pub effect: Option<Effect>,
}

impl SelectOutcome {
    fn empty() -> Self {
        SelectOutcome {
            events: Vec::new(),
            effect: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SelectError {
    OutOfRange { index: usize, len: usize },
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectError::OutOfRange { index, len } => {
                write!(f, "tile index {} out of range for a board of {}", index, len)
            }
        }
    }
}

impl std::error::Error for SelectError {}

/// A reveal pair waiting out its grace delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingResolution {
    pub first: usize,
    pub second: usize,
    pub matched: bool,
}

/// One play-through from shuffle to all-matched.
///
/// `select` is the only input entry point; `resolve_pending` and `tick` are
/// invoked by the host when the timers it was asked to run fire. Input
/// arriving while a resolution is pending is ignored, which keeps the
/// two-tile comparison race-free without any locking.
pub struct Round {
    board: Board,
    first_pick: Option<usize>,
    pending: Option<PendingResolution>,
    unmatched_left: usize,
    input_locked: bool,
    flips: u32,
    elapsed_ms: u32,
    phase: RoundPhase,
}

impl Round {
    pub fn new() -> Self {
        Self::with_board(Board::new())
    }

    pub fn with_board(board: Board) -> Self {
        let unmatched_left = board.len();
        Round {
            board,
            first_pick: None,
            pending: None,
            unmatched_left,
            input_locked: false,
            flips: 0,
            elapsed_ms: 0,
            phase: RoundPhase::NotStarted,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_won(&self) -> bool {
        self.phase == RoundPhase::Won
    }

    pub fn input_locked(&self) -> bool {
        self.input_locked
    }

    pub fn unmatched_left(&self) -> usize {
        self.unmatched_left
    }

    pub fn flips(&self) -> u32 {
        self.flips
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }

    pub fn first_pick(&self) -> Option<usize> {
        self.first_pick
    }

    pub fn pending_resolution(&self) -> Option<PendingResolution> {
        self.pending
    }

    /// Handle a tile selection. Returns the resulting events plus at most
    /// one timer request for the host. Selections made while input is
    /// locked, after the round is won, or on a matched tile are ignored;
    /// only an out-of-range index is an error.
    pub fn select(&mut self, index: usize) -> Result<SelectOutcome, SelectError> {
        if index >= self.board.len() {
            return Err(SelectError::OutOfRange {
                index,
                len: self.board.len(),
            });
        }

        let mut outcome = SelectOutcome::empty();
        if self.input_locked || self.phase == RoundPhase::Won {
            return Ok(outcome);
        }
        if self.board.tiles()[index].state == TileState::Matched {
            return Ok(outcome);
        }

        if self.phase == RoundPhase::NotStarted {
            self.phase = RoundPhase::InProgress;
            outcome.effect = Some(Effect::StartTicker);
        }

        match self.first_pick {
            // Re-selecting the open tile folds it back over.
            Some(first) if first == index => {
                self.board.set_state(index, TileState::Hidden);
                self.first_pick = None;
                outcome.events.push(Event::TileHidden { index });
            }
            None => {
                self.board.set_state(index, TileState::Revealed);
                self.first_pick = Some(index);
                self.flips += 1;
                outcome.events.push(Event::TileRevealed {
                    index,
                    color: self.board.tiles()[index].color,
                });
                outcome.events.push(Event::FlipCountChanged { flips: self.flips });
            }
            Some(first) => {
                self.board.set_state(index, TileState::Revealed);
                self.flips += 1;
                let matched =
                    self.board.tiles()[first].color == self.board.tiles()[index].color;
                // Lock out further picks until the delayed resolution runs;
                // the open-tile slot is free again right away.
                self.input_locked = true;
                self.pending = Some(PendingResolution {
                    first,
                    second: index,
                    matched,
                });
                self.first_pick = None;
                outcome.events.push(Event::TileRevealed {
                    index,
                    color: self.board.tiles()[index].color,
                });
                outcome.events.push(Event::FlipCountChanged { flips: self.flips });
                outcome.effect = Some(Effect::ScheduleResolve);
            }
        }

        Ok(outcome)
    }

    /// Resolve the pair revealed one grace delay ago. A matched pair leaves
    /// the board for good; a mismatch folds both tiles back over. Either way
    /// input unlocks. No-op when nothing is pending.
    pub fn resolve_pending(&mut self) -> Vec<Event> {
        let Some(pending) = self.pending.take() else {
            return Vec::new();
        };

        let mut events = Vec::new();
        if pending.matched {
            for index in [pending.first, pending.second] {
                self.board.set_state(index, TileState::Matched);
                events.push(Event::TileMatched { index });
            }
            self.unmatched_left -= 2;
            self.input_locked = false;
            if self.unmatched_left == 0 {
                self.phase = RoundPhase::Won;
                events.push(Event::RoundWon);
            }
        } else {
            for index in [pending.first, pending.second] {
                self.board.set_state(index, TileState::Hidden);
                events.push(Event::TileHidden { index });
            }
            self.input_locked = false;
        }

        events
    }

    /// Advance the display clock by one tick. Counts only while the round
    /// is in progress; the host stops the ticker once the round is won.
    pub fn tick(&mut self) -> Option<Event> {
        if self.phase != RoundPhase::InProgress {
            return None;
        }
        self.elapsed_ms += TICK_INTERVAL_MS as u32;
        Some(Event::ElapsedTimeChanged {
            elapsed_ms: self.elapsed_ms,
        })
    }
}

impl Default for Round {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::TILE_COUNT;

    fn two_pair_round() -> Round {
        Round::with_board(Board::with_layout(vec![
            TileColor::Red,
            TileColor::Red,
            TileColor::Blue,
            TileColor::Blue,
        ]))
    }

    fn state_of(round: &Round, index: usize) -> TileState {
        round.board().tiles()[index].state
    }

    #[test]
    fn test_new_round_initial_state() {
        let round = Round::new();
        assert_eq!(round.phase(), RoundPhase::NotStarted);
        assert_eq!(round.unmatched_left(), TILE_COUNT);
        assert_eq!(round.flips(), 0);
        assert_eq!(round.elapsed_ms(), 0);
        assert!(!round.input_locked());
        assert!(round.pending_resolution().is_none());
    }

    #[test]
    fn test_out_of_range_select_is_an_error() {
        let mut round = Round::new();
        let err = round.select(TILE_COUNT).unwrap_err();
        assert_eq!(
            err,
            SelectError::OutOfRange {
                index: TILE_COUNT,
                len: TILE_COUNT
            }
        );
    }

    #[test]
    fn test_first_select_starts_round_and_ticker() {
        let mut round = two_pair_round();
        let outcome = round.select(0).unwrap();
        assert_eq!(round.phase(), RoundPhase::InProgress);
        assert_eq!(outcome.effect, Some(Effect::StartTicker));
        assert_eq!(
            outcome.events,
            vec![
                Event::TileRevealed {
                    index: 0,
                    color: TileColor::Red
                },
                Event::FlipCountChanged { flips: 1 },
            ]
        );
        assert_eq!(state_of(&round, 0), TileState::Revealed);
    }

    #[test]
    fn test_reselect_deselects_without_counting_a_flip() {
        let mut round = two_pair_round();
        round.select(0).unwrap();
        let outcome = round.select(0).unwrap();
        assert_eq!(outcome.events, vec![Event::TileHidden { index: 0 }]);
        assert_eq!(outcome.effect, None);
        assert_eq!(state_of(&round, 0), TileState::Hidden);
        assert_eq!(round.flips(), 1);
        assert!(!round.input_locked());

        // The slot is free again: a new first pick works.
        let outcome = round.select(1).unwrap();
        assert_eq!(outcome.events.len(), 2);
    }

    #[test]
    fn test_matching_pair_resolves_to_matched() {
        let mut round = two_pair_round();
        round.select(0).unwrap();
        let outcome = round.select(1).unwrap();
        assert_eq!(outcome.effect, Some(Effect::ScheduleResolve));
        assert!(round.input_locked());
        let pending = round.pending_resolution().unwrap();
        assert!(pending.matched);

        let events = round.resolve_pending();
        assert_eq!(
            events,
            vec![
                Event::TileMatched { index: 0 },
                Event::TileMatched { index: 1 },
            ]
        );
        assert_eq!(state_of(&round, 0), TileState::Matched);
        assert_eq!(state_of(&round, 1), TileState::Matched);
        assert_eq!(round.unmatched_left(), 2);
        assert!(!round.input_locked());
    }

    #[test]
    fn test_mismatched_pair_folds_back_over() {
        let mut round = two_pair_round();
        round.select(0).unwrap();
        let outcome = round.select(2).unwrap();
        assert_eq!(outcome.effect, Some(Effect::ScheduleResolve));
        let pending = round.pending_resolution().unwrap();
        assert!(!pending.matched);

        let events = round.resolve_pending();
        assert_eq!(
            events,
            vec![
                Event::TileHidden { index: 0 },
                Event::TileHidden { index: 2 },
            ]
        );
        assert_eq!(state_of(&round, 0), TileState::Hidden);
        assert_eq!(state_of(&round, 2), TileState::Hidden);
        assert_eq!(round.unmatched_left(), 4);
        assert!(!round.input_locked());
    }

    #[test]
    fn test_input_ignored_while_locked() {
        let mut round = two_pair_round();
        round.select(0).unwrap();
        round.select(2).unwrap();
        assert!(round.input_locked());

        let outcome = round.select(3).unwrap();
        assert!(outcome.events.is_empty());
        assert_eq!(outcome.effect, None);
        assert_eq!(state_of(&round, 3), TileState::Hidden);
        assert_eq!(round.flips(), 2);
    }

    #[test]
    fn test_selecting_a_matched_tile_is_ignored() {
        let mut round = two_pair_round();
        round.select(0).unwrap();
        round.select(1).unwrap();
        round.resolve_pending();

        let outcome = round.select(0).unwrap();
        assert!(outcome.events.is_empty());
        assert_eq!(state_of(&round, 0), TileState::Matched);
        assert_eq!(round.flips(), 2);
    }

    #[test]
    fn test_resolve_without_pending_is_a_no_op() {
        let mut round = two_pair_round();
        assert!(round.resolve_pending().is_empty());
        round.select(0).unwrap();
        assert!(round.resolve_pending().is_empty());
        assert_eq!(state_of(&round, 0), TileState::Revealed);
    }

    #[test]
    fn test_win_emitted_exactly_once_and_terminal() {
        let mut round = two_pair_round();
        round.select(0).unwrap();
        round.select(1).unwrap();
        round.resolve_pending();
        round.select(2).unwrap();
        round.select(3).unwrap();
        let events = round.resolve_pending();
        assert_eq!(
            events
                .iter()
                .filter(|event| matches!(event, Event::RoundWon))
                .count(),
            1
        );
        assert!(round.is_won());
        assert_eq!(round.unmatched_left(), 0);

        // Terminal: further input and resolutions change nothing.
        let outcome = round.select(0).unwrap();
        assert!(outcome.events.is_empty());
        assert!(round.resolve_pending().is_empty());
        assert_eq!(round.unmatched_left(), 0);
    }

    #[test]
    fn test_tick_counts_only_while_in_progress() {
        let mut round = two_pair_round();
        assert_eq!(round.tick(), None);

        round.select(0).unwrap();
        assert_eq!(
            round.tick(),
            Some(Event::ElapsedTimeChanged { elapsed_ms: 100 })
        );
        assert_eq!(
            round.tick(),
            Some(Event::ElapsedTimeChanged { elapsed_ms: 200 })
        );
        assert_eq!(round.elapsed_secs(), 0.2);

        round.select(0).unwrap();
        round.select(0).unwrap();
        round.select(1).unwrap();
        round.resolve_pending();
        round.select(2).unwrap();
        round.select(3).unwrap();
        round.resolve_pending();
        assert!(round.is_won());
        assert_eq!(round.tick(), None);
        assert_eq!(round.elapsed_ms(), 200);
    }

    #[test]
    fn test_flips_count_first_and_second_reveals() {
        let mut round = two_pair_round();
        round.select(0).unwrap();
        assert_eq!(round.flips(), 1);
        round.select(2).unwrap();
        assert_eq!(round.flips(), 2);
        round.resolve_pending();
        round.select(1).unwrap();
        assert_eq!(round.flips(), 3);
    }
}
