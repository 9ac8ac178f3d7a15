//! Producers feeding the session's command channel: one thread reading the
//! terminal, one thread keeping the clock.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::game::Command;

// ============================================================================
// Key Mapping
// ============================================================================

pub fn command_for(event: &Event) -> Option<Command> {
    match event {
        Event::Resize(_, _) => Some(Command::Resize),
        Event::Key(key) if key.kind == KeyEventKind::Press => command_for_key(key),
        _ => None,
    }
}

fn command_for_key(key: &KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => Some(Command::Exit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Left => Some(Command::MoveLeft),
        KeyCode::Right => Some(Command::MoveRight),
        KeyCode::Down => Some(Command::SoftDrop),
        KeyCode::Up => Some(Command::Rotate),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::PauseResume),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Command::Restart),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Exit),
        _ => None,
    }
}

// ============================================================================
// Producers
// ============================================================================

/// Blocks on terminal events and forwards them as commands. Returns after
/// forwarding `Exit`, or once the receiving side is gone.
pub fn spawn_input_reader(commands: Sender<Command>) -> JoinHandle<io::Result<()>> {
    thread::spawn(move || forward_events(event::read, &commands))
}

/// A failed read still sends `Exit` so the session winds down, then the
/// error is returned to whoever joins the reader.
fn forward_events(
    mut read: impl FnMut() -> io::Result<Event>,
    commands: &Sender<Command>,
) -> io::Result<()> {
    loop {
        let event = match read() {
            Ok(event) => event,
            Err(err) => {
                let _ = commands.send(Command::Exit);
                return Err(err);
            }
        };
        let Some(command) = command_for(&event) else {
            continue;
        };
        if commands.send(command).is_err() || command == Command::Exit {
            return Ok(());
        }
    }
}

/// Sends a `Tick` after every delay. The delay is re-read before each sleep
/// so level changes apply to the next tick. Stops once the receiver is
/// dropped.
pub fn spawn_ticker(commands: Sender<Command>, delay_ms: Arc<AtomicU64>) -> JoinHandle<()> {
    thread::spawn(move || loop {
        thread::sleep(Duration::from_millis(delay_ms.load(Ordering::Relaxed)));
        if commands.send(Command::Tick).is_err() {
            return;
        }
    })
}
