//! Game-logic core: the shuffled pair board and the round state machine.
//! No GTK types in here; the UI layer renders the events this module emits.

pub mod board;
pub mod round;

pub use board::{Board, Tile, TileColor, TileState, COPIES_PER_COLOR, TILE_COUNT};
pub use round::{
    Effect, Event, PendingResolution, Round, RoundPhase, SelectError, SelectOutcome,
    GRACE_DELAY_MS, TICK_INTERVAL_MS,
};
