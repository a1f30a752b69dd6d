//! Whole rounds against a scripted console.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cuecard_core::event::KeyEvent;
use cuecard_core::interrupt::Interrupts;
use cuecard_deck::{CardPicker, parse_bytes};
use cuecard_runtime::countdown::CountdownConfig;
use cuecard_runtime::game::{
    Game, GameConfig, GameError, Outcome, QUIT_PROMPT, READY_TEXT, WELCOME_TEXT,
};
use cuecard_runtime::scripted::{ScriptStep, ScriptedConsole};

fn fast_config() -> GameConfig {
    GameConfig {
        countdown: CountdownConfig::default().with_tick_rate(2),
        ready_seconds: 4,
    }
}

fn hooked_interrupts() -> (Arc<Interrupts>, Arc<AtomicBool>) {
    let interrupts = Interrupts::new();
    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);
    interrupts.set_shutdown_hook(move || flag.store(true, Ordering::SeqCst));
    (interrupts, ran)
}

#[test]
fn one_round_then_quit() {
    let cards = parse_bytes(b"Hello there ~ 3\n").unwrap();
    let (interrupts, hook_ran) = hooked_interrupts();
    let mut console = ScriptedConsole::new(60, 20).with_script([
        ScriptStep::enter(),
        ScriptStep::Key(KeyEvent::interrupt()),
        ScriptStep::char('y'),
    ]);

    let mut game = Game::new(
        &cards,
        CardPicker::with_seed(1),
        fast_config(),
        Arc::clone(&interrupts),
    );
    let outcome = game.run(&mut console).unwrap();

    assert_eq!(outcome, Outcome::Quit);
    assert_eq!(game.rounds(), 1);
    assert!(hook_ran.load(Ordering::SeqCst));
    assert_eq!(console.ticks(), (4 + 3) * 2);
    assert_eq!((game.canvas().width(), game.canvas().height()), (60, 20));

    let text = console.output_text();
    assert!(text.starts_with(WELCOME_TEXT));
    assert!(text.contains("You will have 3 seconds to complete the following prompt:"));
    assert!(text.contains("Hello there"));
    assert!(text.contains("Get ready..."));
    assert!(text.contains("GO!"));
    assert!(text.ends_with(QUIT_PROMPT));
}

#[test]
fn declining_quit_resumes() {
    let cards = parse_bytes(b"A ~ 1\n").unwrap();
    let (interrupts, hook_ran) = hooked_interrupts();
    let mut console = ScriptedConsole::new(40, 12)
        .with_interrupts(Arc::clone(&interrupts))
        .with_script([
            ScriptStep::Interrupt,
            ScriptStep::char('n'),
            ScriptStep::Timeout,
            ScriptStep::Interrupt,
            ScriptStep::char('y'),
        ]);

    let mut game = Game::new(&cards, CardPicker::with_seed(2), fast_config(), interrupts);
    assert_eq!(game.run(&mut console).unwrap(), Outcome::Quit);
    assert_eq!(game.rounds(), 0);
    assert!(hook_ran.load(Ordering::SeqCst));

    let text = console.output_text();
    assert_eq!(text.matches(QUIT_PROMPT).count(), 2);
    assert_eq!(text.matches(READY_TEXT).count(), 2);
}

#[test]
fn interrupts_during_confirmation_are_ignored() {
    let cards = parse_bytes(b"A ~ 1\n").unwrap();
    let (interrupts, _) = hooked_interrupts();
    let mut console = ScriptedConsole::new(40, 12)
        .with_interrupts(Arc::clone(&interrupts))
        .with_script([
            ScriptStep::Key(KeyEvent::interrupt()),
            ScriptStep::Key(KeyEvent::interrupt()),
            ScriptStep::Interrupt,
            ScriptStep::char('y'),
        ]);

    let mut game = Game::new(
        &cards,
        CardPicker::with_seed(3),
        fast_config(),
        Arc::clone(&interrupts),
    );
    assert_eq!(game.run(&mut console).unwrap(), Outcome::Quit);
    assert_eq!(console.output_text().matches(QUIT_PROMPT).count(), 1);
    assert!(!interrupts.is_confirming());
}

#[test]
fn stale_enter_does_not_start_a_round() {
    let cards = parse_bytes(b"A ~ 1\n").unwrap();
    let (interrupts, _) = hooked_interrupts();
    let mut console = ScriptedConsole::new(40, 12).with_script([
        ScriptStep::Stale(KeyEvent::new(cuecard_core::event::KeyCode::Enter)),
        ScriptStep::Key(KeyEvent::interrupt()),
        ScriptStep::char('y'),
    ]);

    let mut game = Game::new(&cards, CardPicker::with_seed(4), fast_config(), interrupts);
    game.run(&mut console).unwrap();
    assert_eq!(game.rounds(), 0);
    assert_eq!(console.drains(), 1);
}

#[test]
fn resize_rebuilds_canvas_between_rounds() {
    let cards = parse_bytes(b"A ~ 1\n").unwrap();
    let (interrupts, _) = hooked_interrupts();
    let mut console = ScriptedConsole::new(40, 12).with_script([
        ScriptStep::enter(),
        ScriptStep::Resize(80, 24),
        ScriptStep::enter(),
        ScriptStep::Key(KeyEvent::interrupt()),
        ScriptStep::char('y'),
    ]);

    let mut game = Game::new(&cards, CardPicker::with_seed(5), fast_config(), interrupts);
    game.run(&mut console).unwrap();
    assert_eq!(game.rounds(), 2);
    assert_eq!((game.canvas().width(), game.canvas().height()), (80, 24));
}

#[test]
fn cancelling_get_ready_skips_to_go() {
    let cards = parse_bytes(b"A ~ 2\n").unwrap();
    let (interrupts, _) = hooked_interrupts();
    let mut console = ScriptedConsole::new(40, 12)
        .interrupt_at_tick(1)
        .with_script([
            ScriptStep::enter(),
            ScriptStep::Key(KeyEvent::interrupt()),
            ScriptStep::char('y'),
        ]);

    let mut game = Game::new(&cards, CardPicker::with_seed(6), fast_config(), interrupts);
    game.run(&mut console).unwrap();
    // One tick of "Get ready...", then the full two seconds of "GO!".
    assert_eq!(console.ticks(), 1 + 2 * 2);
}

#[test]
fn exhausted_input_is_an_io_error() {
    let cards = parse_bytes(b"A ~ 1\n").unwrap();
    let mut console = ScriptedConsole::new(40, 12);
    let mut game = Game::new(
        &cards,
        CardPicker::with_seed(7),
        fast_config(),
        Interrupts::new(),
    );
    assert!(matches!(game.run(&mut console), Err(GameError::Io(_))));
}
