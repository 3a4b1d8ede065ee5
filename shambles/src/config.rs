//! # Game Configuration
//!
//! Every tunable the frame loop reads. [`GameConfig::default`] matches the
//! shipped game; [`GameConfig::hardware_compat`] additionally reproduces the
//! quirks of the first cartridge release (one zombie slot reinitialised in
//! place, level-triggered vblank wait, unchecked sprite allocation).

use crate::{
    error::{Error, Result},
    scr::{HEIGHT, WIDTH},
    video_dma::{TransferPolicy, oam::{OAM_CAPACITY, OamMode}, vsync::SyncMode},
};

/// Largest zombie pool: every sprite slot except the survivor's.
pub const MAX_HORDE: usize = OAM_CAPACITY - 1;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub survivor_start: (i32, i32),
    /// Horizontal margin; walking into it scrolls the background instead.
    pub border: i32,
    /// Survivor cannot walk above this line; pushing further scrolls.
    pub top_limit: i32,
    /// Survivor cannot walk below this line.
    pub bottom_limit: i32,
    /// Frames per walk-cycle step.
    pub animation_delay: u32,
    /// Frames between spawn batches.
    pub spawn_interval: u32,
    pub starting_lives: i32,
    /// Busy-wait ticks at the end of each frame.
    pub pace_ticks: u32,
    pub initial_zombies: usize,
    pub max_zombies: usize,
    pub sync: SyncMode,
    pub oam: OamMode,
    pub transfers: TransferPolicy,
}

impl GameConfig {
    pub const fn new() -> Self {
        Self {
            survivor_start: (100, 140),
            border: 40,
            top_limit: 100,
            bottom_limit: 140,
            animation_delay: 8,
            spawn_interval: 180,
            starting_lives: 3,
            pace_ticks: 400,
            initial_zombies: 1,
            max_zombies: 16,
            sync: SyncMode::Edge,
            oam: OamMode::Checked,
            transfers: TransferPolicy::Wait,
        }
    }

    pub const fn hardware_compat() -> Self {
        Self {
            max_zombies: 1,
            sync: SyncMode::Level,
            oam: OamMode::HardwareCompat,
            ..Self::new()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let (x, y) = self.survivor_start;
        if self.border < 0 || self.border > (WIDTH - 16) / 2 {
            return Err(Error::InvalidConfig("border must leave room to walk"));
        }
        if self.top_limit > self.bottom_limit || self.bottom_limit > HEIGHT - 16 {
            return Err(Error::InvalidConfig("vertical limits are inverted or off-screen"));
        }
        if x < self.border || x > WIDTH - 16 - self.border || y < self.top_limit || y > self.bottom_limit {
            return Err(Error::InvalidConfig("survivor starts outside its walkable area"));
        }
        if self.animation_delay == 0 {
            return Err(Error::InvalidConfig("animation delay must be at least one frame"));
        }
        if self.spawn_interval == 0 {
            return Err(Error::InvalidConfig("spawn interval must be at least one frame"));
        }
        if self.max_zombies == 0 || self.max_zombies > MAX_HORDE {
            return Err(Error::InvalidConfig("zombie pool must hold 1..=127 zombies"));
        }
        if self.initial_zombies > self.max_zombies {
            return Err(Error::InvalidConfig("more initial zombies than the pool holds"));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
        assert_eq!(GameConfig::hardware_compat().validate(), Ok(()));
    }

    #[test]
    fn compat_keeps_gameplay_constants() {
        let compat = GameConfig::hardware_compat();
        let default = GameConfig::default();
        assert_eq!(compat.max_zombies, 1);
        assert_eq!(compat.spawn_interval, default.spawn_interval);
        assert_eq!(compat.border, default.border);
    }

    #[test]
    fn rejects_oversized_pool() {
        let config = GameConfig {
            max_zombies: OAM_CAPACITY,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_start_inside_border() {
        let config = GameConfig {
            survivor_start: (10, 140),
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
