use std::time::Duration;

use labyrinth_core::{Event, Level, LEVELS};
use labyrinth_system_clock::Clock;

fn advance(dt_millis: u64) -> Event {
    Event::TimeAdvanced {
        dt: Duration::from_millis(dt_millis),
    }
}

#[test]
fn clock_waits_for_start() {
    let mut clock = Clock::new();
    clock.handle(&[advance(5_000)]);
    assert_eq!(clock.elapsed_seconds(), 0);
    assert!(!clock.is_running());
}

#[test]
fn clock_counts_whole_seconds_across_levels() {
    let mut clock = Clock::new();
    clock.handle(&[Event::GameStarted]);
    for _ in 0..90 {
        clock.handle(&[advance(16)]);
    }
    assert_eq!(clock.elapsed_seconds(), 1);

    clock.handle(&[
        advance(16),
        Event::LevelComplete {
            level: Level::new(2),
        },
    ]);
    clock.handle(&[Event::LevelLoaded {
        level: Level::new(2),
        size: 13,
    }]);
    for _ in 0..62 {
        clock.handle(&[advance(16)]);
    }
    assert_eq!(clock.elapsed_seconds(), 2);
    assert!(clock.is_running());
}

#[test]
fn clock_freezes_when_run_completes() {
    let mut clock = Clock::new();
    clock.handle(&[Event::GameStarted, advance(2_500)]);
    clock.handle(&[Event::GameComplete {
        level: Level::new(LEVELS),
    }]);
    clock.handle(&[advance(10_000), Event::GameStarted, advance(10_000)]);

    assert_eq!(clock.elapsed_seconds(), 2);
    assert!(clock.is_finished());
    assert!(!clock.is_running());
}
