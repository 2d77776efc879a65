//! Per-frame simulation tick
//!
//! The host calls `tick` once per rendered frame with the elapsed wall time.

use super::collision::below_field;
use super::state::{GameEvent, GamePhase, GameState, Outcome};

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held direction keys
    pub left: bool,
    pub right: bool,
    /// Launch ball (space)
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
    /// Dark/light theme toggle
    pub toggle_theme: bool,
    /// Quit request
    pub quit: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    // Meta input is handled in every phase
    if input.quit {
        state.quit_requested = true;
    }
    if input.toggle_theme {
        state.theme = state.theme.toggled();
        state.events.push(GameEvent::ThemeChanged(state.theme));
    }
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                log::info!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::Resumed);
                log::info!("Resumed");
            }
            GamePhase::GameOver(_) => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;
    let field = state.field_size();

    if input.launch && state.ball.launch() {
        state.events.push(GameEvent::Launched);
    }

    state.paddle.update(dt, input, field.x);

    let impacts = state.ball.update(dt, &state.paddle, field, &mut state.particles);
    for _ in 0..impacts.walls {
        state.events.push(GameEvent::WallBounce);
    }
    if impacts.paddle {
        state.events.push(GameEvent::PaddleBounce);
    }

    for block in &mut state.blocks {
        block.update(dt);
    }

    resolve_block_hits(state);

    if below_field(state.ball.pos, field.y) {
        lose_life(state);
    }

    if state.phase == GamePhase::Playing && state.all_blocks_cleared() {
        finish(state, Outcome::Won);
    }

    state.particles.advance(dt);
}

/// Hit every standing block the ball's bounding box overlaps
///
/// Each newly destroyed block scores and flips the vertical velocity, so
/// two blocks hit in the same tick cancel each other's bounce.
fn resolve_block_hits(state: &mut GameState) {
    let palette = state.theme.palette();
    let ball_bounds = state.ball.bounds();

    for block in state.blocks.iter_mut().filter(|b| !b.destroyed) {
        if !ball_bounds.overlaps(&block.rect) {
            continue;
        }
        if block.hit(&mut state.particles, palette) {
            let points = block.points();
            state.score += points;
            state.ball.vel.y = -state.ball.vel.y;
            state.events.push(GameEvent::BlockDestroyed {
                grid_x: block.grid_x,
                grid_y: block.grid_y,
                points,
            });
            log::debug!(
                "Block ({}, {}) destroyed for {} points",
                block.grid_x,
                block.grid_y,
                points
            );
        }
    }
}

/// Ball fell out: lose a life, then either end the run or re-serve
fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    state.events.push(GameEvent::LifeLost { remaining: state.lives });
    log::debug!("Life lost, {} remaining", state.lives);

    if state.lives == 0 {
        finish(state, Outcome::Lost);
    } else {
        state.ball.reset(&state.paddle);
    }
}

fn finish(state: &mut GameState, outcome: Outcome) {
    state.phase = GamePhase::GameOver(outcome);
    state.events.push(GameEvent::GameOver(outcome));
    log::info!("Game over ({:?}), final score {}", outcome, state.score);
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use glam::Vec2;

    use super::*;
    use crate::activity::ActivityRecord;
    use crate::consts::*;
    use crate::settings::Settings;
    use crate::sim::BallState;
    use crate::theme::Theme;

    const DT: f32 = 1.0 / 60.0;

    fn week(counts: [u32; 7]) -> Vec<ActivityRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        start
            .iter_days()
            .zip(counts)
            .map(|(date, count)| ActivityRecord::new(date, count))
            .collect()
    }

    fn new_state() -> GameState {
        GameState::new(&week([0, 5, 0, 10, 2, 0, 7]), Settings::default(), 12345).unwrap()
    }

    /// Put a free ball at `pos` moving with `vel`
    fn free_ball(state: &mut GameState, pos: Vec2, vel: Vec2) {
        state.ball.state = BallState::Free;
        state.ball.pos = pos;
        state.ball.vel = vel;
    }

    #[test]
    fn test_too_few_records_fails() {
        let records = &week([1; 7])[..6];
        assert!(GameState::new(records, Settings::default(), 1).is_err());
    }

    #[test]
    fn test_new_session() {
        let state = new_state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.score, 0);
        assert_eq!(state.blocks.len(), 4);
        assert!(state.ball.is_attached());
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_attached_ball_waits() {
        let mut state = new_state();
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.ball.is_attached());
        assert_eq!(state.ball.pos, Vec2::new(600.0, 691.0));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_launch_keeps_preset_velocity() {
        let mut state = new_state();
        assert_eq!(state.paddle.pos.x, 540.0);

        let launch = TickInput { launch: true, ..Default::default() };
        tick(&mut state, &launch, DT);
        assert!(!state.ball.is_attached());
        assert_eq!(state.ball.vel, Vec2::new(300.0, -300.0));
        assert_eq!(state.events, vec![GameEvent::Launched]);

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.ball.vel, Vec2::new(300.0, -300.0));
        assert!((state.ball.pos - Vec2::new(610.0, 681.0)).length() < 0.01);
    }

    #[test]
    fn test_pause_freezes_gameplay() {
        let mut state = new_state();
        tick(&mut state, &TickInput { launch: true, ..Default::default() }, DT);

        let pause = TickInput { pause: true, ..Default::default() };
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let ball = state.ball.pos;
        let paddle = state.paddle.pos;
        let (score, lives, particles) = (state.score, state.lives, state.particles.len());
        let busy = TickInput { left: true, launch: true, ..Default::default() };
        for _ in 0..30 {
            tick(&mut state, &busy, DT);
        }
        assert_eq!(state.ball.pos, ball);
        assert_eq!(state.paddle.pos, paddle);
        assert_eq!((state.score, state.lives, state.particles.len()), (score, lives, particles));

        // Unpause
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_ne!(state.ball.pos, ball);
    }

    #[test]
    fn test_theme_and_quit_live_while_paused() {
        let mut state = new_state();
        tick(&mut state, &TickInput { pause: true, ..Default::default() }, DT);

        let input = TickInput { toggle_theme: true, quit: true, ..Default::default() };
        tick(&mut state, &input, DT);
        assert_eq!(state.theme, Theme::Light);
        assert!(state.quit_requested);
        assert_eq!(state.events, vec![GameEvent::ThemeChanged(Theme::Light)]);
        assert_eq!(state.phase, GamePhase::Paused);
    }

    #[test]
    fn test_block_scores_once() {
        let mut state = new_state();
        // Block at row 3 holds the count of 10
        let target = state.blocks[1].rect.center();
        assert_eq!(state.blocks[1].intensity, 10);

        free_ball(&mut state, target, Vec2::new(0.0, -300.0));
        tick(&mut state, &TickInput::default(), 1.0 / 600.0);
        assert!(state.blocks[1].destroyed);
        assert_eq!(state.score, 100);
        assert!(state.ball.vel.y > 0.0);
        assert!(state.events.contains(&GameEvent::BlockDestroyed { grid_x: 0, grid_y: 3, points: 100 }));

        // Overlapping the dead block again scores nothing
        let score_after = state.score;
        free_ball(&mut state, target, Vec2::new(0.0, -300.0));
        tick(&mut state, &TickInput::default(), 1.0 / 600.0);
        assert_eq!(state.score, score_after);
        assert!(state.ball.vel.y < 0.0);
    }

    #[test]
    fn test_stacked_blocks_hit_in_one_tick() {
        let records = week([1, 2, 0, 0, 0, 0, 0]);
        let mut state = GameState::new(&records, Settings::default(), 7).unwrap();
        // Between rows 0 and 1, overlapping both
        let between = (state.blocks[0].rect.center() + state.blocks[1].rect.center()) / 2.0;

        free_ball(&mut state, between, Vec2::new(0.0, -300.0));
        tick(&mut state, &TickInput::default(), 1.0 / 600.0);
        assert!(state.blocks.iter().all(|b| b.destroyed));
        assert_eq!(state.score, 30);
        // Two flips cancel out
        assert!(state.ball.vel.y < 0.0);
        assert_eq!(state.phase, GamePhase::GameOver(Outcome::Won));
    }

    #[test]
    fn test_win_when_all_blocks_destroyed() {
        let mut state = new_state();
        let palette = state.palette();
        for block in state.blocks.iter_mut().skip(1) {
            block.hit(&mut state.particles, palette);
        }
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::Playing);

        state.blocks[0].hit(&mut state.particles, palette);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::GameOver(Outcome::Won));
        assert_eq!(state.outcome(), Some(Outcome::Won));
        assert!(state.events.contains(&GameEvent::GameOver(Outcome::Won)));
    }

    #[test]
    fn test_life_loss_reattaches_ball() {
        let mut state = new_state();
        free_ball(&mut state, Vec2::new(300.0, 801.0), Vec2::new(0.0, 300.0));
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.ball.is_attached());
        assert_eq!(state.ball.pos, Vec2::new(600.0, 691.0));
        assert_eq!(state.ball.vel, Vec2::new(300.0, -300.0));
    }

    #[test]
    fn test_third_life_loss_is_game_over() {
        let mut state = new_state();
        for expected in [2, 1, 0] {
            free_ball(&mut state, Vec2::new(300.0, 790.0), Vec2::new(0.0, 900.0));
            tick(&mut state, &TickInput::default(), DT);
            assert_eq!(state.lives, expected);
        }
        assert_eq!(state.phase, GamePhase::GameOver(Outcome::Lost));
    }

    #[test]
    fn test_last_life_lost_no_new_ball() {
        let mut state = new_state();
        state.lives = 1;
        free_ball(&mut state, Vec2::new(600.0, 801.0), Vec2::new(0.0, 300.0));
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver(Outcome::Lost));
        assert_eq!(state.ball.state, BallState::Free);
        assert!(state.ball.pos.y > 800.0);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut state = new_state();
        state.lives = 1;
        free_ball(&mut state, Vec2::new(600.0, 801.0), Vec2::new(0.0, 300.0));
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.is_over());

        let ball = state.ball.pos;
        let paddle = state.paddle.pos;
        let any = TickInput { right: true, launch: true, pause: true, ..Default::default() };
        for _ in 0..10 {
            tick(&mut state, &any, DT);
        }
        assert_eq!(state.phase, GamePhase::GameOver(Outcome::Lost));
        assert_eq!(state.ball.pos, ball);
        assert_eq!(state.paddle.pos, paddle);
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn test_paddle_input_moves_attached_ball() {
        let mut state = new_state();
        let right = TickInput { right: true, ..Default::default() };
        tick(&mut state, &right, 0.1);
        assert!((state.paddle.pos.x - 590.0).abs() < 0.001);
        assert!((state.ball.pos.x - 650.0).abs() < 0.001);
    }

    #[test]
    fn test_particles_decay_during_play() {
        let mut state = new_state();
        free_ball(&mut state, Vec2::new(300.0, 5.0), Vec2::new(0.0, -300.0));
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.events.contains(&GameEvent::WallBounce));
        assert_eq!(state.particles.len(), SPARK_COUNT);

        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let inputs = [
            TickInput { right: true, ..Default::default() },
            TickInput { launch: true, ..Default::default() },
            TickInput { left: true, ..Default::default() },
            TickInput::default(),
        ];
        let mut state1 = new_state();
        let mut state2 = new_state();
        for _ in 0..200 {
            for input in &inputs {
                tick(&mut state1, input, DT);
                tick(&mut state2, input, DT);
            }
        }
        assert_eq!(state1.snapshot(), state2.snapshot());
        assert_eq!(state1.ball.pos, state2.ball.pos);
        assert_eq!(state1.particles.particles(), state2.particles.particles());
    }
}
