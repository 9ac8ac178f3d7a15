//! Game state machine, scoring and level progression.
//!
//! Test categories:
//! - Start and restart
//! - Player input (moves, rotation, soft drop)
//! - Landing, line clearing and scoring
//! - Clock ticks and level selection
//! - Pause, game over and exit

use gtetris::block::{Block, SequencePieceProvider};
use gtetris::field::{test_helpers::*, Field, Occupancy};
use gtetris::game::{Command, Game, GameState};
use gtetris::level::LEVELS;
use gtetris::shapes::{Color, Shape, ShapeKind};

fn only(kind: ShapeKind) -> Box<SequencePieceProvider> {
    Box::new(SequencePieceProvider::new(vec![Shape::get(kind)]))
}

fn started(kind: ShapeKind, fast: bool) -> Game {
    let mut game = Game::with_provider(only(kind), fast);
    game.start().unwrap();
    game
}

/// Soft-drops until the current block lands and the next one spawns.
fn drop_until_spawn(game: &mut Game) -> usize {
    let blocks = game.stats().blocks;
    let mut drops = 0;
    while game.stats().blocks == blocks {
        game.soft_drop().unwrap();
        drops += 1;
        assert!(drops <= 100, "block never landed");
    }
    drops
}

// ============================================================================
// Start And Restart
// ============================================================================

mod start {
    use super::*;

    #[test]
    fn new_game_waits_in_init() {
        let game = Game::with_provider(only(ShapeKind::O), false);
        assert_eq!(game.state(), GameState::Init);
        assert!(game.current_block().is_none());
    }

    #[test]
    fn start_spawns_first_block() {
        let game = started(ShapeKind::O, false);

        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.stats().blocks, 1);
        assert_eq!(game.stats().score, LEVELS[0].block_points);
        assert_eq!(game.stats().level, "A");

        let block = game.current_block().unwrap();
        assert_eq!((block.x(), block.y()), (6, 0));
        assert_eq!(game.field().count(Occupancy::Moving), 4);
        assert_eq!(game.field().get(6, 0).unwrap().color, Color::Yellow);
    }

    #[test]
    fn preview_shows_next_block() {
        let game = started(ShapeKind::I, false);

        assert_eq!(game.preview().width(), 4);
        assert_eq!(game.preview().height(), 2);
        assert_eq!(game.preview().count(Occupancy::Moving), 4);
        assert!(game.preview().rows().next().unwrap().iter().all(|cell| cell.color == Color::Cyan));
    }

    #[test]
    fn restart_resets_stats_and_field_and_keeps_next_block() {
        let provider = SequencePieceProvider::new(vec![
            Shape::get(ShapeKind::O),
            Shape::get(ShapeKind::I),
            Shape::get(ShapeKind::T),
        ]);
        let mut game = Game::with_provider(Box::new(provider), false);
        game.start().unwrap();
        assert_eq!(game.current_block().unwrap().shape().kind, ShapeKind::O);
        assert_eq!(game.next_block().unwrap().shape().kind, ShapeKind::I);

        drop_until_spawn(&mut game);
        game.tick().unwrap();
        game.handle(Command::Restart).unwrap();

        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.stats().blocks, 1);
        assert_eq!(game.stats().lines, 0);
        assert_eq!(game.stats().elapsed, 0.0);
        assert_eq!(game.stats().score, LEVELS[0].block_points);
        assert_eq!(game.field().count(Occupancy::Fixed), 0);
        // O landed, I was promoted, T was pending when the restart came.
        assert_eq!(game.current_block().unwrap().shape().kind, ShapeKind::T);
        assert_eq!(game.next_block().unwrap().shape().kind, ShapeKind::O);
    }
}

// ============================================================================
// Player Input
// ============================================================================

mod input {
    use super::*;

    #[test]
    fn lateral_moves_repaint_the_block() {
        let mut game = started(ShapeKind::O, false);

        game.handle(Command::MoveLeft).unwrap();
        assert_eq!(game.current_block().unwrap().x(), 5);
        assert_eq!(game.field().get(5, 0).unwrap().occupancy, Occupancy::Moving);
        assert_eq!(game.field().get(7, 0).unwrap().occupancy, Occupancy::Empty);
        assert_eq!(game.field().count(Occupancy::Moving), 4);

        game.handle(Command::MoveRight).unwrap();
        assert_eq!(game.current_block().unwrap().x(), 6);
    }

    #[test]
    fn failed_move_is_absorbed() {
        let mut game = started(ShapeKind::O, false);
        for _ in 0..10 {
            game.move_left().unwrap();
        }

        assert_eq!(game.current_block().unwrap().x(), 0);
        assert_eq!(game.stats().score, LEVELS[0].block_points);
        assert_eq!(game.state(), GameState::Running);
    }

    #[test]
    fn rotate_command_turns_the_block() {
        let mut game = started(ShapeKind::T, false);
        game.soft_drop().unwrap();
        game.handle(Command::Rotate).unwrap();

        assert_eq!(game.current_block().unwrap().mask(), &[vec![1, 0], vec![1, 1], vec![1, 0]]);
        assert_eq!(game.field().count(Occupancy::Moving), 4);
    }

    #[test]
    fn blocked_rotation_is_absorbed() {
        let mut game = started(ShapeKind::I, false);
        game.handle(Command::Rotate).unwrap();

        assert_eq!(game.current_block().unwrap().mask(), &[vec![1, 1, 1, 1]]);
    }

    #[test]
    fn soft_drop_moves_one_row() {
        let mut game = started(ShapeKind::O, false);
        game.handle(Command::SoftDrop).unwrap();

        assert_eq!(game.current_block().unwrap().y(), 1);
        assert_eq!(game.field().get(6, 0).unwrap().occupancy, Occupancy::Empty);
        assert_eq!(game.stats().elapsed, 0.0);
    }

    #[test]
    fn resize_keeps_the_board() {
        let mut game = started(ShapeKind::O, false);
        let before = game.field().clone();
        game.handle(Command::Resize).unwrap();

        assert_eq!(game.field(), &before);
    }
}

// ============================================================================
// Landing And Scoring
// ============================================================================

mod landing {
    use super::*;

    #[test]
    fn o_block_falls_to_the_floor_and_locks() {
        let mut game = started(ShapeKind::O, false);
        let spawn_score = game.stats().score;
        assert_eq!(spawn_score, LEVELS[0].block_points);

        for _ in 0..20 {
            game.soft_drop().unwrap();
        }
        assert_eq!(game.current_block().unwrap().y(), 20);
        assert_eq!(game.stats().blocks, 1);

        game.soft_drop().unwrap();

        for (x, y) in [(6, 20), (7, 20), (6, 21), (7, 21)] {
            let cell = game.field().get(x, y).unwrap();
            assert_eq!(cell.occupancy, Occupancy::Fixed);
            assert_eq!(cell.color, Color::Yellow);
        }
        assert_eq!(game.field().count(Occupancy::Fixed), 4);
        assert_eq!(game.stats().lines, 0);
        // Only the second spawn was added: no line bonus.
        assert_eq!(game.stats().score, spawn_score + LEVELS[0].block_points);
        assert_eq!(game.stats().blocks, 2);
        assert_eq!(game.current_block().unwrap().y(), 0);
    }

    #[test]
    fn blocks_stack_on_each_other() {
        let mut game = started(ShapeKind::O, false);

        assert_eq!(drop_until_spawn(&mut game), 21);
        assert_eq!(drop_until_spawn(&mut game), 19);
        assert_eq!(game.field().get(6, 18).unwrap().occupancy, Occupancy::Fixed);
    }

    #[test]
    fn double_clear_scores_four_times_line_points() {
        let mut field = Field::default();
        fill_row_with_gaps(&mut field, 20, &[6]);
        fill_row_with_gaps(&mut field, 21, &[6]);

        let mut block = Block::new(6, 19, Shape::get(ShapeKind::I));
        assert!(block.try_rotate(&Field::default()));
        let mut game = Game::with_field(field, block, only(ShapeKind::O), false).unwrap();
        let before = game.stats().score;

        game.soft_drop().unwrap();

        let level = &LEVELS[0];
        assert_eq!(game.stats().lines, 2);
        assert_eq!(game.stats().score - before, level.line_points * 4 + level.block_points);
        // The upper half of the I dropped into the cleared rows.
        assert_eq!(game.field().get(6, 21).unwrap().occupancy, Occupancy::Fixed);
        assert_eq!(game.field().get(6, 20).unwrap().color, Color::Cyan);
        assert_eq!(game.field().get(6, 19).unwrap().occupancy, Occupancy::Empty);
        assert_eq!(game.field().count(Occupancy::Fixed), 2);
    }

    #[test]
    fn single_clear_scores_double_line_points() {
        let mut field = Field::default();
        fill_row_with_gaps(&mut field, 21, &[6, 7]);

        let block = Block::new(6, 20, Shape::get(ShapeKind::O));
        let mut game = Game::with_field(field, block, only(ShapeKind::O), false).unwrap();

        game.soft_drop().unwrap();

        let level = &LEVELS[0];
        assert_eq!(game.stats().lines, 1);
        assert_eq!(game.stats().score, level.line_points * 2 + level.block_points);
        assert_eq!(game.field().get(6, 21).unwrap().occupancy, Occupancy::Fixed);
        assert_eq!(game.field().count(Occupancy::Fixed), 2);
    }
}

// ============================================================================
// Clock Ticks And Levels
// ============================================================================

mod ticks {
    use super::*;

    #[test]
    fn tick_applies_gravity_and_time() {
        let mut game = started(ShapeKind::O, false);
        game.handle(Command::Tick).unwrap();

        assert_eq!(game.current_block().unwrap().y(), 1);
        assert_eq!(game.stats().elapsed, 0.25);
        assert_eq!(game.stats().score, LEVELS[0].block_points + LEVELS[0].tick_points);
    }

    #[test]
    fn tick_is_counted_even_when_the_block_lands() {
        let mut game = started(ShapeKind::O, false);
        for _ in 0..21 {
            game.tick().unwrap();
        }

        assert_eq!(game.stats().blocks, 2);
        assert_eq!(game.stats().elapsed, 21.0 * 0.25);
    }

    fn tick_until(game: &mut Game, seconds: f64) {
        while game.stats().elapsed < seconds {
            game.tick().unwrap();
            assert_eq!(game.state(), GameState::Running);
        }
    }

    #[test]
    fn fast_mode_unlocks_level_at_next_spawn() {
        let mut game = started(ShapeKind::O, true);
        tick_until(&mut game, 18.0);
        assert_eq!(game.stats().elapsed, 18.0);
        assert_eq!(game.level().name, "A");

        let before = game.stats().score;
        drop_until_spawn(&mut game);

        assert_eq!(game.level().name, "B");
        assert_eq!(game.stats().level, "B");
        assert_eq!(game.tick_duration_ms(), 200);
        assert_eq!(game.stats().score - before, LEVELS[1].block_points);
    }

    #[test]
    fn normal_mode_keeps_first_level_at_same_time() {
        let mut game = started(ShapeKind::O, false);
        tick_until(&mut game, 18.0);
        drop_until_spawn(&mut game);

        assert_eq!(game.level().name, "A");
        assert_eq!(game.tick_duration_ms(), 250);
    }

    #[test]
    fn level_change_is_logged() {
        let mut game = started(ShapeKind::O, true);
        tick_until(&mut game, 18.0);
        drop_until_spawn(&mut game);

        let log = game.journal().tail(usize::MAX, usize::MAX);
        assert!(log.iter().any(|entry| entry.starts_with("I [") && entry.ends_with("Changed level to B.")));
    }
}

// ============================================================================
// Pause, Game Over And Exit
// ============================================================================

mod lifecycle {
    use super::*;

    #[test]
    fn pause_freezes_input_and_clock() {
        let mut game = started(ShapeKind::O, false);
        game.handle(Command::PauseResume).unwrap();
        assert_eq!(game.state(), GameState::Paused);

        game.handle(Command::MoveLeft).unwrap();
        game.handle(Command::SoftDrop).unwrap();
        game.handle(Command::Rotate).unwrap();
        game.handle(Command::Tick).unwrap();

        let block = game.current_block().unwrap();
        assert_eq!((block.x(), block.y()), (6, 0));
        assert_eq!(game.stats().elapsed, 0.0);

        game.handle(Command::PauseResume).unwrap();
        assert_eq!(game.state(), GameState::Running);
    }

    #[test]
    fn pause_has_no_effect_outside_running() {
        let mut game = Game::with_provider(only(ShapeKind::O), false);
        game.toggle_pause();
        assert_eq!(game.state(), GameState::Init);
    }

    fn finished_game() -> Game {
        let mut field = Field::default();
        field.set(6, 1, Occupancy::Fixed, Color::Red).unwrap();
        field.set(7, 1, Occupancy::Fixed, Color::Red).unwrap();

        let block = Block::new(0, 20, Shape::get(ShapeKind::O));
        let mut game = Game::with_field(field, block, only(ShapeKind::O), false).unwrap();
        game.soft_drop().unwrap();
        game
    }

    #[test]
    fn blocked_spawn_finishes_the_game() {
        let game = finished_game();

        assert_eq!(game.state(), GameState::Finished);
        assert_eq!(game.stats().blocks, 1);
        // The stack is not painted over by the spawned block.
        assert_eq!(game.field().get(6, 1).unwrap().occupancy, Occupancy::Fixed);
        assert_eq!(game.field().get(6, 1).unwrap().color, Color::Red);
        assert_eq!(game.field().count(Occupancy::Moving), 0);
    }

    #[test]
    fn finished_game_ignores_play_but_restarts() {
        let mut game = finished_game();
        let stats = game.stats().clone();

        game.handle(Command::Tick).unwrap();
        game.handle(Command::SoftDrop).unwrap();
        game.handle(Command::PauseResume).unwrap();
        assert_eq!(game.state(), GameState::Finished);
        assert_eq!(game.stats(), &stats);

        game.handle(Command::Restart).unwrap();
        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.field().count(Occupancy::Fixed), 0);
        assert_eq!(game.stats().score, LEVELS[0].block_points);
    }

    #[test]
    fn exit_and_close_are_idempotent() {
        let mut game = started(ShapeKind::O, false);

        game.handle(Command::Exit).unwrap();
        assert_eq!(game.state(), GameState::Exiting);
        game.handle(Command::Exit).unwrap();
        assert_eq!(game.state(), GameState::Exiting);
        game.handle(Command::Tick).unwrap();
        assert_eq!(game.stats().elapsed, 0.0);

        game.close();
        assert_eq!(game.state(), GameState::Closed);
        game.close();
        game.exit();
        assert_eq!(game.state(), GameState::Closed);
    }

    #[test]
    fn closed_game_stays_closed_on_restart() {
        let mut game = started(ShapeKind::O, false);
        game.handle(Command::Exit).unwrap();
        game.handle(Command::Restart).unwrap();
        assert_eq!(game.state(), GameState::Exiting);

        game.close();
        game.handle(Command::Restart).unwrap();
        game.start().unwrap();
        assert_eq!(game.state(), GameState::Closed);

        game.handle(Command::MoveLeft).unwrap();
        game.handle(Command::Tick).unwrap();
        let block = game.current_block().unwrap();
        assert_eq!((block.x(), block.y()), (6, 0));
        assert_eq!(game.stats().elapsed, 0.0);
        assert_eq!(game.state(), GameState::Closed);
    }

    #[test]
    fn state_changes_are_logged() {
        let mut game = started(ShapeKind::O, false);
        game.toggle_pause();

        let log = game.journal().tail(10, 200);
        assert!(log.iter().any(|entry| entry.ends_with("Changed state to Running.")));
        assert!(log.iter().any(|entry| entry.ends_with("Changed state to Paused.")));
    }
}
