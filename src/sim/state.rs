//! Game state and core simulation types
//!
//! Everything the per-tick update mutates lives here, owned by `GameState`.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, Wall, circle_rect_overlap, paddle_bounce, reflect_velocity, wall_contacts};
use super::layout::generate_blocks;
use super::particles::ParticleSystem;
use super::tick::TickInput;
use crate::Result;
use crate::activity::ActivityRecord;
use crate::consts::*;
use crate::settings::Settings;
use crate::theme::{Palette, Theme};

/// How a finished session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay (ball may still be attached)
    Playing,
    /// Gameplay suspended
    Paused,
    /// Session ended
    GameOver(Outcome),
}

/// Visual intensity bucket for a block's count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    None,
    Low,
    Medium,
    High,
    Max,
}

impl Tier {
    /// Buckets: 0, 1-3, 4-6, 7-9, 10+
    pub fn from_count(count: u32) -> Self {
        match count {
            0 => Tier::None,
            1..=3 => Tier::Low,
            4..=6 => Tier::Medium,
            7..=9 => Tier::High,
            _ => Tier::Max,
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal speed (pixels/s)
    pub speed: f32,
}

impl Paddle {
    /// Centered horizontally, `paddle_bottom_offset` above the bottom edge
    pub fn new(settings: &Settings) -> Self {
        let size = Vec2::new(settings.paddle_width, settings.paddle_height);
        Self {
            pos: Vec2::new(
                ((settings.window_width - size.x) / 2.0).floor(),
                settings.window_height - settings.paddle_bottom_offset,
            ),
            size,
            speed: settings.paddle_speed,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    /// Move by held direction keys, clamped to the play field
    pub fn update(&mut self, dt: f32, input: &TickInput, field_width: f32) {
        let max_x = (field_width - self.size.x).max(0.0);
        if input.left {
            self.pos.x = (self.pos.x - self.speed * dt).max(0.0);
        }
        if input.right {
            self.pos.x = (self.pos.x + self.speed * dt).min(max_x);
        }
    }
}

/// Ball state - attached to paddle or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Riding on top of the paddle, waiting for launch
    Attached,
    /// Integrating velocity and colliding
    Free,
}

/// Impacts from one ball update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Impacts {
    pub walls: u8,
    pub paddle: bool,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
    /// Per-axis launch speed
    pub launch_speed: f32,
    /// Recent positions, oldest first (rendering only)
    #[serde(skip)]
    pub trail: VecDeque<Vec2>,
}

impl Ball {
    /// A new ball attached to the paddle, holding its launch velocity
    pub fn new(radius: f32, launch_speed: f32, paddle: &Paddle) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius,
            state: BallState::Attached,
            launch_speed,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
        };
        ball.reset(paddle);
        ball
    }

    /// Back to a fresh attached state (after a lost life)
    pub fn reset(&mut self, paddle: &Paddle) {
        self.state = BallState::Attached;
        // Up and to the right
        self.vel = Vec2::new(self.launch_speed, -self.launch_speed);
        self.trail.clear();
        self.follow(paddle);
    }

    pub fn is_attached(&self) -> bool {
        self.state == BallState::Attached
    }

    /// Snap to the paddle's top center
    pub fn follow(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(paddle.center_x(), paddle.pos.y - self.radius - ATTACH_GAP);
    }

    /// Detach from the paddle. Returns false if already free.
    pub fn launch(&mut self) -> bool {
        if self.is_attached() {
            self.state = BallState::Free;
            true
        } else {
            false
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }

    /// Record current position to trail, evicting the oldest
    pub fn record_trail(&mut self) {
        if self.trail.len() == TRAIL_LENGTH {
            self.trail.pop_front();
        }
        self.trail.push_back(self.pos);
    }

    /// Advance one tick: follow the paddle when attached, otherwise move and
    /// bounce off walls and the paddle. Each bounce throws a spark.
    pub fn update(
        &mut self,
        dt: f32,
        paddle: &Paddle,
        field: Vec2,
        particles: &mut ParticleSystem,
    ) -> Impacts {
        let mut impacts = Impacts::default();
        if self.is_attached() {
            self.follow(paddle);
            return impacts;
        }

        self.record_trail();
        self.pos += self.vel * dt;

        for wall in wall_contacts(self.pos, self.radius, field.x) {
            let normal = wall.normal();
            // Only reflect when heading into the wall, so a ball that is
            // still overlapping after a bounce cannot flip back
            if self.vel.dot(normal) < 0.0 {
                self.vel = reflect_velocity(self.vel, normal);
                impacts.walls += 1;
                particles.spawn_spark(self.pos);
            }
            match wall {
                Wall::Left => self.pos.x = self.radius,
                Wall::Right => self.pos.x = field.x - self.radius,
                Wall::Top => self.pos.y = self.radius,
            }
        }

        let paddle_rect = paddle.rect();
        if self.vel.y > 0.0 && circle_rect_overlap(self.pos, self.radius, &paddle_rect) {
            self.vel = paddle_bounce(self.vel, self.pos.x, &paddle_rect);
            impacts.paddle = true;
            particles.spawn_spark(self.pos);
        }

        impacts
    }
}

/// A block built from one day of activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Week column
    pub grid_x: u32,
    /// Day-of-week row
    pub grid_y: u32,
    /// Activity count for the day
    pub intensity: u32,
    pub tier: Tier,
    pub rect: Rect,
    pub destroyed: bool,
    /// 1.0 when destroyed, decays to 0 (shrink/fade animation)
    pub destruction_progress: f32,
}

impl Block {
    pub fn new(grid_x: u32, grid_y: u32, intensity: u32, rect: Rect) -> Self {
        Self {
            grid_x,
            grid_y,
            intensity,
            tier: Tier::from_count(intensity),
            rect,
            destroyed: false,
            destruction_progress: 0.0,
        }
    }

    /// Destroy the block. Returns true only the first time.
    pub fn hit(&mut self, particles: &mut ParticleSystem, palette: &Palette) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        self.destruction_progress = 1.0;
        particles.spawn_explosion(self.rect.center(), palette.tier(self.tier));
        true
    }

    /// Decay the destruction animation
    pub fn update(&mut self, dt: f32) {
        if self.destroyed && self.destruction_progress > 0.0 {
            self.destruction_progress = (self.destruction_progress - BLOCK_DECAY_RATE * dt).max(0.0);
        }
    }

    /// Whether the renderer should still draw this block
    pub fn is_visible(&self) -> bool {
        !self.destroyed || self.destruction_progress > 0.0
    }

    /// Score for destroying this block
    pub fn points(&self) -> u64 {
        u64::from(self.intensity) * SCORE_PER_INTENSITY
    }
}

/// Something that happened during a tick, for audio/render consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Launched,
    WallBounce,
    PaddleBounce,
    BlockDestroyed { grid_x: u32, grid_y: u32, points: u64 },
    LifeLost { remaining: u8 },
    Paused,
    Resumed,
    ThemeChanged(Theme),
    GameOver(Outcome),
}

/// HUD-level view of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub score: u64,
    pub lives: u8,
    pub phase: GamePhase,
    pub theme: Theme,
    pub blocks_total: usize,
    pub blocks_remaining: usize,
    pub ball_attached: bool,
    pub ticks: u64,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub score: u64,
    pub lives: u8,
    pub phase: GamePhase,
    pub theme: Theme,
    /// Gameplay ticks processed (paused ticks excluded)
    pub time_ticks: u64,
    pub paddle: Paddle,
    pub ball: Ball,
    /// Layout order: week-major, then day
    pub blocks: Vec<Block>,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticleSystem,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    /// Set by the quit input; the host loop should stop
    pub quit_requested: bool,
}

impl GameState {
    /// Build a session from activity records. Fails with fewer than 7 records.
    pub fn new(records: &[ActivityRecord], settings: Settings, seed: u64) -> Result<Self> {
        let blocks = generate_blocks(records, &settings)?;
        let paddle = Paddle::new(&settings);
        let ball = Ball::new(settings.ball_radius, settings.ball_speed, &paddle);

        log::info!("New session: {} blocks, seed {}", blocks.len(), seed);

        Ok(Self {
            theme: settings.theme(),
            settings,
            seed,
            score: 0,
            lives: STARTING_LIVES,
            phase: GamePhase::Playing,
            time_ticks: 0,
            paddle,
            ball,
            blocks,
            particles: ParticleSystem::new(seed),
            events: Vec::new(),
            quit_requested: false,
        })
    }

    pub fn field_size(&self) -> Vec2 {
        self.settings.field_size()
    }

    pub fn palette(&self) -> &'static Palette {
        self.theme.palette()
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            GamePhase::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// Blocks with activity that are still standing
    pub fn blocks_remaining(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.intensity > 0 && !b.destroyed)
            .count()
    }

    /// Win condition
    pub fn all_blocks_cleared(&self) -> bool {
        self.blocks_remaining() == 0
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.score,
            lives: self.lives,
            phase: self.phase,
            theme: self.theme,
            blocks_total: self.blocks.len(),
            blocks_remaining: self.blocks_remaining(),
            ball_attached: self.ball.is_attached(),
            ticks: self.time_ticks,
        }
    }
}
