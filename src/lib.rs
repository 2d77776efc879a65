//! Contribution Breakout - a breakout game built from an activity calendar
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, particles, game state)
//! - `activity`: Activity records, calendar dates and data loading
//! - `settings`: Window/entity configuration
//! - `theme`: Immutable color palettes

pub mod activity;
pub mod error;
pub mod settings;
pub mod sim;
pub mod theme;

pub use activity::{ActivityRecord, parse_date};
pub use error::{GameError, Result};
pub use settings::Settings;
pub use theme::{Palette, Rgb, Theme};

/// Game constants that are not part of the configuration surface
pub mod consts {
    /// Lives at the start of a session
    pub const STARTING_LIVES: u8 = 3;
    /// Points per unit of block intensity
    pub const SCORE_PER_INTENSITY: u64 = 10;

    /// Days per grid column
    pub const DAYS_PER_WEEK: usize = 7;

    /// Ball trail slots
    pub const TRAIL_LENGTH: usize = 10;
    /// Gap between the attached ball and the paddle top
    pub const ATTACH_GAP: f32 = 1.0;

    /// Block shrink/fade rate once destroyed (progress per second)
    pub const BLOCK_DECAY_RATE: f32 = 3.0;

    /// Paddle bounce fan: angle = PI * (MIN + SPAN * hit_pos)
    pub const BOUNCE_ANGLE_MIN: f32 = 0.125;
    pub const BOUNCE_ANGLE_SPAN: f32 = 0.75;

    /// Particle gravity (units/s²)
    pub const PARTICLE_GRAVITY: f32 = 200.0;

    /// Spark burst (wall/paddle impacts)
    pub const SPARK_COUNT: usize = 5;
    pub const SPARK_SPEED: (f32, f32) = (50.0, 150.0);
    pub const SPARK_LIFETIME: (f32, f32) = (0.2, 0.4);

    /// Explosion burst (destroyed blocks)
    pub const EXPLOSION_COUNT: usize = 15;
    pub const EXPLOSION_SPEED: (f32, f32) = (100.0, 300.0);
    pub const EXPLOSION_LIFETIME: (f32, f32) = (0.3, 0.6);

    /// Particle size range in pixels (inclusive)
    pub const PARTICLE_SIZE: (u8, u8) = (2, 4);
}
