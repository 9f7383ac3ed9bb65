//! End-to-end round flow against the public game API, driving the host
//! timers (resolution, ticker) by hand.

use tessella::game::{
    Board, Effect, Event, Round, RoundPhase, TileColor, TileState, COPIES_PER_COLOR, TILE_COUNT,
};

#[test]
fn test_two_pair_round_walkthrough() {
    // Board: [A, A, B, B].
    let mut round = Round::with_board(Board::with_layout(vec![
        TileColor::Red,
        TileColor::Red,
        TileColor::Blue,
        TileColor::Blue,
    ]));
    assert_eq!(round.unmatched_left(), 4);

    // First reveal.
    let outcome = round.select(0).unwrap();
    assert_eq!(outcome.effect, Some(Effect::StartTicker));
    assert!(outcome.events.contains(&Event::TileRevealed {
        index: 0,
        color: TileColor::Red
    }));
    assert!(outcome.events.contains(&Event::FlipCountChanged { flips: 1 }));

    // Second reveal, different color: a mismatch waits out the grace delay.
    let outcome = round.select(2).unwrap();
    assert_eq!(outcome.effect, Some(Effect::ScheduleResolve));
    assert!(outcome.events.contains(&Event::FlipCountChanged { flips: 2 }));
    assert!(round.input_locked());

    let events = round.resolve_pending();
    assert_eq!(
        events,
        vec![Event::TileHidden { index: 0 }, Event::TileHidden { index: 2 }]
    );
    assert!(!round.input_locked());
    assert_eq!(round.unmatched_left(), 4);

    // Matching pair.
    round.select(0).unwrap();
    let outcome = round.select(1).unwrap();
    assert_eq!(outcome.effect, Some(Effect::ScheduleResolve));
    let events = round.resolve_pending();
    assert_eq!(
        events,
        vec![Event::TileMatched { index: 0 }, Event::TileMatched { index: 1 }]
    );
    assert_eq!(round.unmatched_left(), 2);

    // Last pair wins the round.
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
    assert_eq!(round.unmatched_left(), 0);
    assert_eq!(round.phase(), RoundPhase::Won);
}

#[test]
fn test_full_board_drives_to_a_win_after_eighteen_matches() {
    // Known layout: each color occupies four consecutive positions.
    let mut colors = Vec::with_capacity(TILE_COUNT);
    for color in TileColor::ALL {
        for _ in 0..COPIES_PER_COLOR {
            colors.push(color);
        }
    }
    let mut round = Round::with_board(Board::with_layout(colors));

    let mut wins = 0;
    let mut matches = 0;
    for pair_base in (0..TILE_COUNT).step_by(2) {
        round.select(pair_base).unwrap();
        let outcome = round.select(pair_base + 1).unwrap();
        assert_eq!(outcome.effect, Some(Effect::ScheduleResolve));

        for event in round.resolve_pending() {
            match event {
                Event::TileMatched { .. } => {}
                Event::RoundWon => wins += 1,
                other => panic!("unexpected event {:?}", other),
            }
        }
        matches += 1;
    }

    assert_eq!(matches, TILE_COUNT / 2);
    assert_eq!(wins, 1);
    assert!(round.is_won());
    assert_eq!(round.flips(), TILE_COUNT as u32);
    assert!(
        round
            .board()
            .tiles()
            .iter()
            .all(|tile| tile.state == TileState::Matched)
    );
}

#[test]
fn test_ticker_runs_between_selections_and_stops_at_win() {
    let mut round = Round::with_board(Board::with_layout(vec![
        TileColor::Green,
        TileColor::Green,
    ]));

    assert_eq!(round.tick(), None, "clock must not run before the round starts");

    round.select(0).unwrap();
    round.tick();
    round.tick();
    round.tick();
    assert_eq!(round.elapsed_ms(), 300);

    round.select(1).unwrap();
    // The clock keeps counting through the grace delay.
    round.tick();
    assert_eq!(round.elapsed_ms(), 400);

    round.resolve_pending();
    assert!(round.is_won());
    assert_eq!(round.tick(), None);
    assert_eq!(round.elapsed_ms(), 400);
}

#[test]
fn test_shuffled_rounds_always_hold_four_of_each_color() {
    for _ in 0..16 {
        let round = Round::new();
        for color in TileColor::ALL {
            let count = round
                .board()
                .tiles()
                .iter()
                .filter(|tile| tile.color == color)
                .count();
            assert_eq!(count, COPIES_PER_COLOR);
        }
    }
}
