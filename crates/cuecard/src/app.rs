#![forbid(unsafe_code)]

//! Wiring: logging, deck, interrupts, terminal session, round loop.
//!
//! Start-up order matters. The deck is loaded before the terminal enters
//! raw mode, so a bad card file is reported on a normal screen. The
//! terminal session is dropped before `run` returns, so whatever `main`
//! prints afterwards lands on a restored terminal.

use std::fmt;
use std::io::{self, Write};

use cuecard_core::interrupt::Interrupts;
use cuecard_core::terminal_session::{SessionOptions, TerminalSession};
use cuecard_deck::{CardPicker, DeckError};
use cuecard_render::ansi;
use cuecard_runtime::console::TerminalConsole;
use cuecard_runtime::countdown::CountdownConfig;
use cuecard_runtime::game::{Game, GameConfig, GameError, Outcome};

use crate::cli::Opts;

/// Any fatal error after argument parsing.
#[derive(Debug)]
pub enum AppError {
    /// The log file could not be set up.
    Logging(io::Error),
    /// The card file could not be loaded.
    Deck(DeckError),
    /// The terminal could not be prepared.
    Terminal(io::Error),
    /// The round loop failed.
    Game(GameError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "Failed to set up logging: {err}"),
            Self::Deck(err) => write!(f, "{err}"),
            Self::Terminal(err) => write!(f, "Failed to prepare the terminal: {err}"),
            Self::Game(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Logging(err) | Self::Terminal(err) => Some(err),
            Self::Deck(err) => Some(err),
            Self::Game(err) => Some(err),
        }
    }
}

impl From<DeckError> for AppError {
    fn from(err: DeckError) -> Self {
        Self::Deck(err)
    }
}

impl From<GameError> for AppError {
    fn from(err: GameError) -> Self {
        Self::Game(err)
    }
}

/// Round loop settings for `opts`.
pub fn game_config(opts: &Opts) -> GameConfig {
    GameConfig {
        countdown: CountdownConfig::default().with_tick_rate(opts.tick_rate),
        ready_seconds: opts.ready_secs,
    }
}

/// Clear the screen and home the cursor on stdout.
fn restore_screen() {
    let mut out = io::stdout().lock();
    let _ = out.write_all(ansi::CLEAR_SCREEN);
    let _ = out.write_all(ansi::CURSOR_HOME);
    let _ = out.flush();
}

/// Run the program until the user quits.
///
/// # Errors
///
/// Returns the first fatal error; the terminal is already restored when
/// this returns.
pub fn run(opts: &Opts) -> Result<Outcome, AppError> {
    if let Some(path) = &opts.log_file {
        cuecard_core::logging::init_file_logging(path).map_err(AppError::Logging)?;
    }
    tracing::info!(
        cards_file = %opts.cards_file.display(),
        tick_rate = opts.tick_rate,
        ready_secs = opts.ready_secs,
        "starting"
    );

    let cards = cuecard_deck::load(&opts.cards_file)?;

    let interrupts = Interrupts::new();
    let _signals = interrupts
        .install_signal_handlers()
        .map_err(AppError::Terminal)?;
    interrupts.set_shutdown_hook(restore_screen);

    let session =
        TerminalSession::new(SessionOptions { hide_cursor: true }).map_err(AppError::Terminal)?;
    let mut console = TerminalConsole::new(session);

    let mut game = Game::new(
        &cards,
        CardPicker::new(),
        game_config(opts),
        std::sync::Arc::clone(&interrupts),
    );
    let outcome = game.run(&mut console)?;

    tracing::info!(rounds = game.rounds(), "quit");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn opts() -> Opts {
        Opts {
            cards_file: PathBuf::from("missing-cards-file.txt"),
            tick_rate: 30,
            ready_secs: 2,
            log_file: None,
        }
    }

    #[test]
    fn config_follows_options() {
        let config = game_config(&opts());
        assert_eq!(config.countdown.tick_rate, 30);
        assert_eq!(config.ready_seconds, 2);
    }

    #[test]
    fn missing_deck_fails_before_touching_the_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = opts();
        opts.cards_file = dir.path().join("nope.txt");
        let err = run(&opts).unwrap_err();
        assert!(matches!(err, AppError::Deck(DeckError::Open { .. })));
        assert!(err.to_string().starts_with("could not open card file"));
    }

    #[test]
    fn bad_deck_message_names_the_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.txt");
        std::fs::write(&path, "Broken card ~ 0\n").unwrap();
        let mut opts = opts();
        opts.cards_file = path;
        let err = run(&opts).unwrap_err();
        assert!(err.to_string().contains("\"Broken card\""));
    }
}
