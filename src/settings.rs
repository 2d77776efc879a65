//! Game settings
//!
//! Fixed inputs to session construction: window size, frame rate, entity
//! dimensions and the starting theme. Persisted as JSON.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::theme::Theme;

/// Window, entity and theme configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Window ===
    pub window_width: f32,
    pub window_height: f32,
    /// Target frame rate (ticks per second for the host loop)
    pub fps: u32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Horizontal speed (pixels/s)
    pub paddle_speed: f32,
    /// Distance from the bottom of the window to the paddle top
    pub paddle_bottom_offset: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Launch speed per axis (pixels/s)
    pub ball_speed: f32,

    // === Blocks ===
    pub block_width: f32,
    pub block_height: f32,
    pub block_spacing: f32,
    /// Y of the first grid row
    pub block_top: f32,

    // === Theme ===
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 1200.0,
            window_height: 800.0,
            fps: 60,

            paddle_width: 120.0,
            paddle_height: 20.0,
            paddle_speed: 500.0,
            paddle_bottom_offset: 100.0,

            ball_radius: 8.0,
            ball_speed: 300.0,

            block_width: 12.0,
            block_height: 12.0,
            block_spacing: 3.0,
            block_top: 100.0,

            dark_mode: true,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Play-field size (width, height)
    pub fn field_size(&self) -> Vec2 {
        Vec2::new(self.window_width, self.window_height)
    }

    /// Fixed timestep for the host loop
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }

    /// Starting theme
    pub fn theme(&self) -> Theme {
        if self.dark_mode { Theme::Dark } else { Theme::Light }
    }
}
