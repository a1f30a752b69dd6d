//! Countdown driver against a scripted console.

use cuecard_core::interrupt::Interrupts;
use cuecard_render::canvas::{Canvas, Layer};
use cuecard_runtime::countdown::{Countdown, CountdownConfig, CountdownOutcome};
use cuecard_runtime::scripted::ScriptedConsole;
use proptest::prelude::*;

#[test]
fn finishes_after_d_plus_one_redraws() {
    let interrupts = Interrupts::new();
    let mut console = ScriptedConsole::new(40, 12);
    let mut canvas = Canvas::new(40, 12).unwrap();
    let countdown = Countdown::default();

    let report = countdown
        .run(&mut console, &mut canvas, "GO!", 3, &interrupts)
        .unwrap();

    assert_eq!(report.outcome, CountdownOutcome::Finished);
    assert_eq!(report.redraws, 4);
    assert_eq!(console.ticks(), 3 * 60);
}

#[test]
fn zero_seconds_draws_once() {
    let interrupts = Interrupts::new();
    let mut console = ScriptedConsole::new(20, 10);
    let mut canvas = Canvas::new(20, 10).unwrap();

    let report = Countdown::default()
        .run(&mut console, &mut canvas, "GO!", 0, &interrupts)
        .unwrap();

    assert_eq!(report.redraws, 1);
    assert_eq!(console.ticks(), 0);
    assert!(console.screen().contains("00:00"));
}

#[test]
fn interrupt_cancels_within_a_tick() {
    let interrupts = Interrupts::new();
    let mut console = ScriptedConsole::new(40, 12).interrupt_at_tick(70);
    let mut canvas = Canvas::new(40, 12).unwrap();

    let report = Countdown::default()
        .run(&mut console, &mut canvas, "GO!", 10, &interrupts)
        .unwrap();

    assert_eq!(report.outcome, CountdownOutcome::Cancelled);
    assert_eq!(report.redraws, 2);
    assert_eq!(console.ticks(), 70);
    assert!(!interrupts.is_raised(), "cancel consumes the flag");
}

#[test]
fn last_frame_shows_zero_and_help() {
    let interrupts = Interrupts::new();
    let mut console = ScriptedConsole::new(40, 12);
    let mut canvas = Canvas::new(40, 12).unwrap();
    let countdown = Countdown::new(CountdownConfig::default().with_tick_rate(1));

    countdown
        .run(&mut console, &mut canvas, "Get ready...", 2, &interrupts)
        .unwrap();

    let screen = console.screen();
    assert_eq!(screen.row_text(6).trim(), "Get ready...");
    assert_eq!(screen.row_text(8).trim(), "00:00");
    assert_eq!(
        screen.row_text(11).trim(),
        "Press Ctrl + C to stop the timer"
    );
    assert_eq!(screen.clears(), 3);
}

#[test]
fn foreground_stays_on_top() {
    let interrupts = Interrupts::new();
    let mut console = ScriptedConsole::new(20, 10);
    let mut canvas = Canvas::new(20, 10).unwrap();
    canvas.fill_row(Layer::Foreground, 0, b'-');

    Countdown::new(CountdownConfig::default().with_tick_rate(1))
        .run(&mut console, &mut canvas, "GO!", 1, &interrupts)
        .unwrap();

    let screen = console.screen();
    assert_eq!(screen.row_text(0), "-".repeat(20));
    assert!(screen.contains("GO!"));
}

#[test]
fn custom_help_text() {
    let interrupts = Interrupts::new();
    let mut console = ScriptedConsole::new(30, 12);
    let mut canvas = Canvas::new(30, 12).unwrap();
    let config = CountdownConfig::default()
        .with_tick_rate(1)
        .with_help_text("Esc to skip");

    Countdown::new(config)
        .run(&mut console, &mut canvas, "GO!", 0, &interrupts)
        .unwrap();
    assert!(console.screen().contains("Esc to skip"));
}

proptest! {
    #[test]
    fn redraws_match_duration(seconds in 0u32..20, rate in 1u32..8) {
        let interrupts = Interrupts::new();
        let mut console = ScriptedConsole::new(16, 8);
        let mut canvas = Canvas::new(16, 8).unwrap();
        let countdown = Countdown::new(CountdownConfig::default().with_tick_rate(rate));

        let report = countdown
            .run(&mut console, &mut canvas, "GO!", seconds, &interrupts)
            .unwrap();
        prop_assert_eq!(report.outcome, CountdownOutcome::Finished);
        prop_assert_eq!(report.redraws, seconds + 1);
        prop_assert_eq!(console.ticks(), u64::from(seconds) * u64::from(rate));
    }

    #[test]
    fn cancel_tick_bounds_redraws(seconds in 1u32..20, rate in 1u32..8, at in 1u64..200) {
        let interrupts = Interrupts::new();
        let mut console = ScriptedConsole::new(16, 8).interrupt_at_tick(at);
        let mut canvas = Canvas::new(16, 8).unwrap();
        let countdown = Countdown::new(CountdownConfig::default().with_tick_rate(rate));

        let report = countdown
            .run(&mut console, &mut canvas, "GO!", seconds, &interrupts)
            .unwrap();
        let total_ticks = u64::from(seconds) * u64::from(rate);
        if at <= total_ticks {
            prop_assert_eq!(report.outcome, CountdownOutcome::Cancelled);
            prop_assert_eq!(console.ticks(), at);
            prop_assert_eq!(u64::from(report.redraws), (at - 1) / u64::from(rate) + 1);
        } else {
            prop_assert_eq!(report.outcome, CountdownOutcome::Finished);
        }
    }
}
