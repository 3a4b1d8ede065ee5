//! The player-controlled survivor.
//!
//! Each frame the survivor gets at most one directional call (or
//! [`Survivor::stop`]) followed by [`Survivor::update`]. Walking into a
//! border does not move the sprite; the call reports [`Step::Blocked`] and
//! the game scrolls the background instead.

use crate::{
    config::GameConfig,
    error::Result,
    game::collision::Hitbox,
    scr::WIDTH,
    video_dma::oam::{OamTable, SpriteHandle, SpriteSize},
};

/// Tile offsets of the two walk frames.
pub const WALK_FRAMES: [u16; 2] = [0, 16];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    Moved,
    Blocked,
}

#[derive(Debug, Clone)]
pub struct Survivor {
    pub sprite: SpriteHandle,
    pub x: i32,
    pub y: i32,
    /// Tile offset currently shown.
    pub frame: u16,
    pub animation_delay: u32,
    pub counter: u32,
    pub moving: bool,
    pub border: i32,
    pub top_limit: i32,
    pub bottom_limit: i32,
}

impl Survivor {
    pub fn init(oam: &mut OamTable, config: &GameConfig) -> Result<Self> {
        let (x, y) = config.survivor_start;
        let frame = WALK_FRAMES[0];
        let sprite = oam.allocate(x, y, SpriteSize::S16x16, false, false, frame, 0)?;
        Ok(Self {
            sprite,
            x,
            y,
            frame,
            animation_delay: config.animation_delay,
            counter: 0,
            moving: false,
            border: config.border,
            top_limit: config.top_limit,
            bottom_limit: config.bottom_limit,
        })
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::entity(self.x, self.y)
    }

    pub fn right(&mut self, oam: &mut OamTable) -> Result<Step> {
        oam.set_horizontal_flip(self.sprite, false)?;
        self.moving = true;

        if self.x >= WIDTH - 16 - self.border {
            Ok(Step::Blocked)
        } else {
            self.x += 1;
            Ok(Step::Moved)
        }
    }

    pub fn left(&mut self, oam: &mut OamTable) -> Result<Step> {
        oam.set_horizontal_flip(self.sprite, true)?;
        self.moving = true;

        if self.x <= self.border {
            Ok(Step::Blocked)
        } else {
            self.x -= 1;
            Ok(Step::Moved)
        }
    }

    pub fn up(&mut self, oam: &mut OamTable) -> Result<Step> {
        oam.set_vertical_flip(self.sprite, false)?;
        self.moving = true;

        if self.y <= self.top_limit {
            Ok(Step::Blocked)
        } else {
            self.y -= 1;
            Ok(Step::Moved)
        }
    }

    pub fn down(&mut self, oam: &mut OamTable) -> Result<Step> {
        oam.set_vertical_flip(self.sprite, false)?;
        self.moving = true;

        if self.y >= self.bottom_limit {
            Ok(Step::Blocked)
        } else {
            self.y += 1;
            Ok(Step::Moved)
        }
    }

    /// Stand still on the first walk frame. The next move flips to the
    /// second frame straight away.
    pub fn stop(&mut self, oam: &mut OamTable) -> Result<()> {
        self.moving = false;
        self.frame = WALK_FRAMES[0];
        self.counter = self.animation_delay.saturating_sub(1);
        oam.set_tile_offset(self.sprite, self.frame)
    }

    /// Advance the walk cycle and push the position to the sprite.
    pub fn update(&mut self, oam: &mut OamTable) -> Result<()> {
        if !self.moving {
            return Ok(());
        }

        self.counter += 1;
        if self.counter >= self.animation_delay {
            self.frame = if self.frame == WALK_FRAMES[0] { WALK_FRAMES[1] } else { WALK_FRAMES[0] };
            oam.set_tile_offset(self.sprite, self.frame)?;
            self.counter = 0;
        }

        oam.set_position(self.sprite, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video_dma::oam::OamMode;

    fn fixture() -> (OamTable, Survivor) {
        let mut oam = OamTable::new(OamMode::Checked);
        let survivor = Survivor::init(&mut oam, &GameConfig::default()).unwrap();
        (oam, survivor)
    }

    fn shown_tile(oam: &OamTable, survivor: &Survivor) -> u16 {
        oam.sprite(survivor.sprite).unwrap().tile()
    }

    #[test]
    fn init_places_sprite() {
        let (oam, survivor) = fixture();
        assert_eq!((survivor.x, survivor.y), (100, 140));
        assert_eq!(oam.position(survivor.sprite).unwrap(), (100, 140));
        assert_eq!(oam.sprite(survivor.sprite).unwrap().size(), Some(SpriteSize::S16x16));
        assert!(!survivor.moving);
    }

    #[test]
    fn left_stops_at_border() {
        let (mut oam, mut survivor) = fixture();
        survivor.x = survivor.border;

        for _ in 0..10 {
            assert_eq!(survivor.left(&mut oam).unwrap(), Step::Blocked);
            assert_eq!(survivor.x, survivor.border);
        }
        assert!(oam.sprite(survivor.sprite).unwrap().h_flip());
    }

    #[test]
    fn right_stops_at_far_border() {
        let (mut oam, mut survivor) = fixture();
        let limit = WIDTH - 16 - survivor.border;

        let mut blocked = 0;
        for _ in 0..200 {
            if survivor.right(&mut oam).unwrap() == Step::Blocked {
                blocked += 1;
            }
            assert!(survivor.x <= limit);
            assert!(survivor.x >= survivor.border);
        }
        assert_eq!(survivor.x, limit);
        assert_eq!(blocked, 200 - (limit - 100));
        assert!(!oam.sprite(survivor.sprite).unwrap().h_flip());
    }

    #[test]
    fn vertical_limits() {
        let (mut oam, mut survivor) = fixture();
        assert_eq!(survivor.down(&mut oam).unwrap(), Step::Blocked);
        assert_eq!(survivor.y, 140);

        for _ in 0..40 {
            assert_eq!(survivor.up(&mut oam).unwrap(), Step::Moved);
        }
        assert_eq!(survivor.y, 100);
        assert_eq!(survivor.up(&mut oam).unwrap(), Step::Blocked);
        assert_eq!(survivor.down(&mut oam).unwrap(), Step::Moved);
        assert_eq!(survivor.y, 101);
        assert!(!oam.sprite(survivor.sprite).unwrap().v_flip());
    }

    #[test]
    fn walk_cycle_toggles_every_delay_frames() {
        let (mut oam, mut survivor) = fixture();
        survivor.moving = true;
        assert_eq!(survivor.animation_delay, 8);

        for _ in 0..7 {
            survivor.update(&mut oam).unwrap();
            assert_eq!(shown_tile(&oam, &survivor), 0);
        }
        survivor.update(&mut oam).unwrap();
        assert_eq!(shown_tile(&oam, &survivor), 16);

        for _ in 0..7 {
            survivor.update(&mut oam).unwrap();
            assert_eq!(shown_tile(&oam, &survivor), 16);
        }
        survivor.update(&mut oam).unwrap();
        assert_eq!(shown_tile(&oam, &survivor), 0);
    }

    #[test]
    fn idle_update_leaves_sprite_alone() {
        let (mut oam, mut survivor) = fixture();
        survivor.x = 60;
        for _ in 0..20 {
            survivor.update(&mut oam).unwrap();
        }
        assert_eq!(oam.position(survivor.sprite).unwrap(), (100, 140));
        assert_eq!(shown_tile(&oam, &survivor), 0);
    }

    #[test]
    fn stop_primes_next_step() {
        let (mut oam, mut survivor) = fixture();
        survivor.moving = true;
        for _ in 0..8 {
            survivor.update(&mut oam).unwrap();
        }
        assert_eq!(shown_tile(&oam, &survivor), 16);

        survivor.stop(&mut oam).unwrap();
        assert!(!survivor.moving);
        assert_eq!(shown_tile(&oam, &survivor), 0);

        survivor.right(&mut oam).unwrap();
        survivor.update(&mut oam).unwrap();
        assert_eq!(shown_tile(&oam, &survivor), 16);
        assert_eq!(oam.position(survivor.sprite).unwrap(), (101, 140));
    }
}
