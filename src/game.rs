use crate::block::{Block, PieceProvider, RandomPieceProvider};
use crate::field::{Field, FieldError, FIELD_HEIGHT, FIELD_WIDTH};
use crate::journal::Journal;
use crate::level::{level_for, Level, LEVELS};
use crate::shapes::preview_size;

// ============================================================================
// Configuration
// ============================================================================

pub const PREVIEW_LEFT: i16 = 1;
pub const PREVIEW_TOP: i16 = 0;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Init,
    Running,
    Paused,
    Finished,
    Exiting,
    Closed,
}

/// Everything a session can be asked to do, by the player or the clock.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    PauseResume,
    Restart,
    Exit,
    Resize,
    Tick,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Stats {
    pub level: &'static str,
    pub score: u32,
    pub lines: u32,
    pub blocks: u32,
    pub elapsed: f64,
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    field: Field,
    preview: Field,
    current: Option<Block>,
    next: Option<Block>,
    level: &'static Level,
    stats: Stats,
    state: GameState,
    fast: bool,
    provider: Box<dyn PieceProvider>,
    journal: Journal,
}

// ============================================================================
// Game Logic
// ============================================================================

impl Game {
    pub fn new(fast: bool) -> Self {
        Self::with_provider(Box::new(RandomPieceProvider::new()), fast)
    }

    pub fn with_provider(provider: Box<dyn PieceProvider>, fast: bool) -> Self {
        let (preview_width, preview_height) = preview_size();
        Self {
            field: Field::new(FIELD_WIDTH, FIELD_HEIGHT),
            preview: Field::new(preview_width, preview_height),
            current: None,
            next: None,
            level: &LEVELS[0],
            stats: Stats {
                level: LEVELS[0].name,
                ..Stats::default()
            },
            state: GameState::Init,
            fast,
            provider,
            journal: Journal::new(),
        }
    }

    /// A running game around a prepared field, with `current` already in
    /// play. Nothing is spawned, so stats start at zero.
    pub fn with_field(
        field: Field,
        current: Block,
        provider: Box<dyn PieceProvider>,
        fast: bool,
    ) -> Result<Self, FieldError> {
        let mut game = Self::with_provider(provider, fast);
        game.field = field;
        game.current = Some(current);
        game.next = Some(game.random_block(PREVIEW_LEFT, PREVIEW_TOP));
        game.state = GameState::Running;
        game.draw_preview()?;
        game.repaint()?;
        Ok(game)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn level(&self) -> &'static Level {
        self.level
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn preview(&self) -> &Field {
        &self.preview
    }

    pub fn current_block(&self) -> Option<&Block> {
        self.current.as_ref()
    }

    pub fn next_block(&self) -> Option<&Block> {
        self.next.as_ref()
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn journal_mut(&mut self) -> &mut Journal {
        &mut self.journal
    }

    pub fn is_fast(&self) -> bool {
        self.fast
    }

    pub fn tick_duration_ms(&self) -> u64 {
        self.level.delay_ms
    }

    /// Resets stats and the field and spawns the first block. Also used to
    /// restart; the pending next block is kept. Ignored once the session is
    /// exiting or closed.
    pub fn start(&mut self) -> Result<(), FieldError> {
        if self.is_shutting_down() {
            return Ok(());
        }
        self.stats = Stats::default();
        self.level = &LEVELS[0];
        self.stats.level = self.level.name;
        self.set_state(GameState::Running);
        self.field.clear(true);
        self.current = None;
        self.generate_block()?;
        self.repaint()
    }

    pub fn handle(&mut self, command: Command) -> Result<(), FieldError> {
        if self.is_shutting_down() {
            return Ok(());
        }
        match command {
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::SoftDrop => self.soft_drop(),
            Command::Rotate => self.rotate(),
            Command::PauseResume => {
                self.toggle_pause();
                Ok(())
            }
            Command::Restart => {
                self.journal.info("Restarting game.");
                self.start()
            }
            Command::Exit => {
                self.exit();
                Ok(())
            }
            Command::Resize => self.repaint(),
            Command::Tick => self.tick(),
        }
    }

    pub fn move_left(&mut self) -> Result<(), FieldError> {
        self.shift(-1, "left")
    }

    pub fn move_right(&mut self) -> Result<(), FieldError> {
        self.shift(1, "right")
    }

    fn shift(&mut self, dx: i16, direction: &str) -> Result<(), FieldError> {
        if self.state != GameState::Running {
            return Ok(());
        }
        if let Some(block) = self.current.as_mut() {
            if block.try_move(dx, 0, &self.field) {
                self.journal.debug(format_args!("Moved {direction}."));
            } else {
                self.journal.debug(format_args!("Failed to move {direction}."));
            }
        }
        self.repaint()
    }

    pub fn rotate(&mut self) -> Result<(), FieldError> {
        if self.state != GameState::Running {
            return Ok(());
        }
        if let Some(block) = self.current.as_mut() {
            if block.try_rotate(&self.field) {
                self.journal.debug("Rotated.");
            } else {
                self.journal.debug("Failed to rotate.");
            }
        }
        self.repaint()
    }

    pub fn soft_drop(&mut self) -> Result<(), FieldError> {
        if self.state != GameState::Running {
            return Ok(());
        }
        self.move_down()
    }

    /// One clock step: gravity, then time and tick points at the level that
    /// is current afterwards.
    pub fn tick(&mut self) -> Result<(), FieldError> {
        if self.state != GameState::Running {
            return Ok(());
        }
        self.move_down()?;
        self.stats.elapsed += self.level.delay_ms as f64 / 1000.0;
        self.stats.score = self.stats.score.saturating_add(self.level.tick_points);
        Ok(())
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Running => self.set_state(GameState::Paused),
            GameState::Paused => self.set_state(GameState::Running),
            _ => {}
        }
    }

    fn is_shutting_down(&self) -> bool {
        matches!(self.state, GameState::Exiting | GameState::Closed)
    }

    pub fn exit(&mut self) {
        if !self.is_shutting_down() {
            self.set_state(GameState::Exiting);
        }
    }

    pub fn close(&mut self) {
        if self.state != GameState::Closed {
            self.set_state(GameState::Closed);
        }
    }

    fn move_down(&mut self) -> Result<(), FieldError> {
        let Some(block) = self.current.as_mut() else {
            return Ok(());
        };
        if block.try_move(0, 1, &self.field) {
            self.journal.debug("Moved down.");
        } else {
            self.journal.debug("Failed to move down.");
            block.draw(&mut self.field, true)?;
            self.remove_lines();
            self.generate_block()?;
        }
        self.repaint()
    }

    fn remove_lines(&mut self) {
        let removed = self.field.remove_filled_lines();
        if removed > 0 {
            let points = self.level.line_points.saturating_mul(2u32.saturating_pow(removed));
            self.stats.score = self.stats.score.saturating_add(points);
            self.stats.lines = self.stats.lines.saturating_add(removed);
            self.journal.info(format_args!("Removed {removed} lines."));
        }
    }

    fn generate_block(&mut self) -> Result<(), FieldError> {
        let left = (self.field.width() / 2) as i16 - 1;
        let current = match self.next.take() {
            Some(next) => next.copy_at(left, 0),
            None => self.random_block(left, 0),
        };
        self.current = Some(current);
        self.next = Some(self.random_block(PREVIEW_LEFT, PREVIEW_TOP));
        self.journal.debug("Generated new block.");

        self.try_change_level();
        self.draw_preview()?;
        self.stats.score = self.stats.score.saturating_add(self.level.block_points);
        self.stats.blocks = self.stats.blocks.saturating_add(1);

        self.field.clear(false);
        if self
            .current
            .as_ref()
            .is_some_and(|block| block.overlaps(&self.field))
        {
            self.set_state(GameState::Finished);
        }
        Ok(())
    }

    fn try_change_level(&mut self) {
        let level = level_for(self.stats.elapsed, self.fast);
        if level != self.level {
            self.journal
                .info(format_args!("Changed level to {}.", level.name));
        }
        self.level = level;
        self.stats.level = level.name;
    }

    fn random_block(&mut self, x: i16, y: i16) -> Block {
        Block::new(x, y, self.provider.next_shape())
    }

    fn draw_preview(&mut self) -> Result<(), FieldError> {
        self.preview.clear(true);
        match &self.next {
            Some(next) => next.draw(&mut self.preview, false),
            None => Ok(()),
        }
    }

    /// Erases the previous moving paint and redraws the falling block. After
    /// game over the block overlaps the stack and is left unpainted.
    fn repaint(&mut self) -> Result<(), FieldError> {
        self.field.clear(false);
        if self.state == GameState::Finished {
            return Ok(());
        }
        match &self.current {
            Some(block) => block.draw(&mut self.field, false),
            None => Ok(()),
        }
    }

    fn set_state(&mut self, state: GameState) {
        self.state = state;
        self.journal.info(format_args!("Changed state to {state:?}."));
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(false)
    }
}
