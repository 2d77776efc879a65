//! Collision detection and response for axis-aligned geometry
//!
//! Blocks and the paddle are rectangles, the ball is a circle. Block hits use
//! the ball's bounding box; the paddle uses the true circle/rectangle test.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BOUNCE_ANGLE_MIN, BOUNCE_ANGLE_SPAN};

/// Axis-aligned rectangle (screen space, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Square bounding box of a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self {
            min: center - Vec2::splat(radius),
            size: Vec2::splat(radius * 2.0),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Overlap test; touching edges count as overlapping
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min, self.max());
        let (b_min, b_max) = (other.min, other.max());
        a_max.x >= b_min.x && a_min.x <= b_max.x && a_max.y >= b_min.y && a_min.y <= b_max.y
    }

    /// Closest point inside the rectangle to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max())
    }
}

/// Check whether a circle overlaps a rectangle
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.closest_point(center);
    (center - closest).length_squared() <= radius * radius
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Play-field wall the ball can touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Left,
    Right,
    Top,
}

impl Wall {
    /// Normal pointing back into the play field
    pub fn normal(self) -> Vec2 {
        match self {
            Wall::Left => Vec2::X,
            Wall::Right => Vec2::NEG_X,
            Wall::Top => Vec2::Y,
        }
    }
}

/// Walls a ball currently touches (left/right first, then top)
pub fn wall_contacts(pos: Vec2, radius: f32, field_width: f32) -> impl Iterator<Item = Wall> {
    let side = if pos.x <= radius {
        Some(Wall::Left)
    } else if pos.x >= field_width - radius {
        Some(Wall::Right)
    } else {
        None
    };
    let top = (pos.y <= radius).then_some(Wall::Top);
    side.into_iter().chain(top)
}

/// New velocity after a paddle hit
///
/// The horizontal hit offset picks an angle on a fan from 22.5° to 157.5°;
/// the vertical component always points up and speed is preserved.
pub fn paddle_bounce(velocity: Vec2, ball_x: f32, paddle: &Rect) -> Vec2 {
    let hit_pos = ((ball_x - paddle.min.x) / paddle.size.x).clamp(0.0, 1.0);
    let angle = std::f32::consts::PI * (BOUNCE_ANGLE_MIN + BOUNCE_ANGLE_SPAN * hit_pos);
    let speed = velocity.length();
    Vec2::new(speed * angle.cos(), -(speed * angle.sin()).abs())
}

/// Check if the ball dropped below the play field
#[inline]
pub fn below_field(pos: Vec2, field_height: f32) -> bool {
    pos.y > field_height
}
