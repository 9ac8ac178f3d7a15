use anyhow::{anyhow, Result};
use clap::Parser;
use crossterm::{
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{stdout, Stdout},
    sync::{
        atomic::{AtomicU64, Ordering},
        mpsc, Arc,
    },
};

use gtetris::controls::{spawn_input_reader, spawn_ticker};
use gtetris::game::{Command, Game, GameState};
use gtetris::screen;

/// Falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(name = "gtetris", version, about)]
struct Args {
    /// Run game in debug mode (shows the log panel).
    #[arg(long)]
    debug: bool,

    /// Speeds up game: levels unlock ten times sooner.
    #[arg(long)]
    fast: bool,
}

// ============================================================================
// Main Loop
// ============================================================================

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, args: &Args) -> Result<()> {
    let mut game = Game::new(args.fast);
    game.start()?;

    let (commands, inbox) = mpsc::channel();
    let delay_ms = Arc::new(AtomicU64::new(game.tick_duration_ms()));
    let input = spawn_input_reader(commands.clone());
    let ticker = spawn_ticker(commands, Arc::clone(&delay_ms));

    terminal.draw(|frame| screen::render(frame, &game, args.debug))?;

    for command in inbox.iter() {
        if command == Command::Resize {
            terminal.autoresize()?;
        }
        if let Err(err) = game.handle(command) {
            game.journal_mut().error(err);
            return Err(err.into());
        }
        delay_ms.store(game.tick_duration_ms(), Ordering::Relaxed);

        if game.state() == GameState::Exiting {
            break;
        }
        terminal.draw(|frame| screen::render(frame, &game, args.debug))?;
    }

    game.close();
    drop(inbox);

    input
        .join()
        .map_err(|_| anyhow!("input thread panicked"))??;
    ticker
        .join()
        .map_err(|_| anyhow!("ticker thread panicked"))?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.hide_cursor()?;

    let result = run(&mut terminal, &args);

    // Restore terminal
    terminal.show_cursor()?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}
