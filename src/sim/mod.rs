//! Simulation module
//!
//! All gameplay logic lives here. No rendering, audio or input devices:
//! - Elapsed time and input arrive per tick from the host
//! - Particle RNG is seeded per session
//! - Blocks are iterated in layout order

pub mod collision;
pub mod layout;
pub mod particles;
pub mod state;
pub mod tick;

pub use collision::{Rect, Wall, circle_rect_overlap, paddle_bounce, reflect_velocity};
pub use layout::{GridLayout, generate_blocks};
pub use particles::{Particle, ParticleSystem};
pub use state::{
    Ball, BallState, Block, GameEvent, GamePhase, GameState, Impacts, Outcome, Paddle, Snapshot, Tier,
};
pub use tick::{TickInput, tick};
