//! Block layout from activity records
//!
//! Records fill a 7-row grid column by column: record `w * 7 + d` lands in
//! week column `w`, day row `d`. A trailing partial week is dropped and
//! zero-count days leave their cell empty.

use glam::Vec2;

use super::collision::Rect;
use super::state::Block;
use crate::activity::ActivityRecord;
use crate::consts::DAYS_PER_WEEK;
use crate::settings::Settings;
use crate::{GameError, Result};

/// Grid geometry for a number of weeks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub weeks: usize,
    /// Top-left of cell (0, 0)
    pub origin: Vec2,
    pub block_size: Vec2,
    /// Distance between neighbouring cell origins
    pub pitch: Vec2,
}

impl GridLayout {
    /// Grid centered horizontally, starting at `block_top`
    pub fn new(weeks: usize, settings: &Settings) -> Self {
        let block_size = Vec2::new(settings.block_width, settings.block_height);
        let pitch = block_size + Vec2::splat(settings.block_spacing);
        let grid_width = weeks as f32 * pitch.x;
        Self {
            weeks,
            origin: Vec2::new(((settings.window_width - grid_width) / 2.0).floor(), settings.block_top),
            block_size,
            pitch,
        }
    }

    /// Rectangle of a cell
    pub fn cell(&self, week: usize, day: usize) -> Rect {
        let min = self.origin + self.pitch * Vec2::new(week as f32, day as f32);
        Rect::new(min, self.block_size)
    }
}

/// Build the block set for a session
pub fn generate_blocks(records: &[ActivityRecord], settings: &Settings) -> Result<Vec<Block>> {
    if records.len() < DAYS_PER_WEEK {
        return Err(GameError::TooFewRecords { got: records.len() });
    }

    let weeks = records.len() / DAYS_PER_WEEK;
    let grid = GridLayout::new(weeks, settings);

    let blocks: Vec<Block> = records
        .chunks_exact(DAYS_PER_WEEK)
        .enumerate()
        .flat_map(|(week, days)| {
            days.iter()
                .enumerate()
                .filter(|(_, record)| record.count > 0)
                .map(move |(day, record)| {
                    Block::new(week as u32, day as u32, record.count, grid.cell(week, day))
                })
        })
        .collect();

    log::debug!(
        "Layout: {} blocks over {} weeks ({} trailing days dropped)",
        blocks.len(),
        weeks,
        records.len() % DAYS_PER_WEEK
    );

    Ok(blocks)
}
