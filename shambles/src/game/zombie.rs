//! Zombies and the pool they live in.
//!
//! A zombie drops from the top of the screen one line per frame and never
//! stops. The [`Horde`] owns up to `max_zombies` of them. Spawn batches grow
//! the pool until it is full, then reinitialise existing zombies in place,
//! oldest first, so sprite slots are never leaked.

use log::debug;
use rand::RngCore;

use crate::{
    config::MAX_HORDE,
    error::Result,
    game::collision::Hitbox,
    scr::WIDTH,
    video_dma::oam::{OamTable, SpriteHandle, SpriteSize},
};

pub const ZOMBIE_TILE: u16 = 8;
pub const ZOMBIE_SIZE: SpriteSize = SpriteSize::S16x32;

/// Vertical offset of the sprite at spawn, before the first update.
const SPAWN_DRAW_OFFSET: i32 = 16;

#[derive(Debug, Clone)]
pub struct Zombie {
    pub sprite: SpriteHandle,
    pub x: i32,
    pub y: i32,
    pub moving: bool,
}

fn spawn_column<R: RngCore>(rng: &mut R) -> i32 {
    (rng.next_u32() % (WIDTH - 16) as u32) as i32
}

impl Zombie {
    /// Claim a sprite slot and drop a new zombie in at a random column.
    pub fn spawn<R: RngCore>(oam: &mut OamTable, rng: &mut R) -> Result<Self> {
        let x = spawn_column(rng);
        let sprite = oam.allocate(x, SPAWN_DRAW_OFFSET, ZOMBIE_SIZE, false, false, ZOMBIE_TILE, 0)?;
        Ok(Self { sprite, x, y: 0, moving: true })
    }

    /// Send this zombie back to the top at a fresh column, keeping its slot.
    pub fn respawn<R: RngCore>(&mut self, oam: &mut OamTable, rng: &mut R) -> Result<()> {
        self.x = spawn_column(rng);
        self.y = 0;
        self.moving = true;
        oam.set_horizontal_flip(self.sprite, false)?;
        oam.set_vertical_flip(self.sprite, false)?;
        oam.set_tile_offset(self.sprite, ZOMBIE_TILE)?;
        oam.set_position(self.sprite, self.x, self.y + SPAWN_DRAW_OFFSET)
    }

    pub fn update(&mut self, oam: &mut OamTable) -> Result<()> {
        if self.moving {
            self.y += 1;
        }
        oam.set_position(self.sprite, self.x, self.y)
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::entity(self.x, self.y)
    }
}

#[derive(Debug)]
pub struct Horde {
    zombies: heapless::Vec<Zombie, MAX_HORDE>,
    capacity: usize,
    /// Next zombie to recycle once the pool is full.
    cursor: usize,
}

impl Horde {
    /// `capacity` is clamped to `1..=MAX_HORDE`.
    pub fn new(capacity: usize) -> Self {
        Self {
            zombies: heapless::Vec::new(),
            capacity: capacity.clamp(1, MAX_HORDE),
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.zombies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zombies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zombie> {
        self.zombies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Zombie> {
        self.zombies.iter_mut()
    }

    /// Bring in one zombie, recycling the oldest when the pool is full.
    pub fn summon_one<R: RngCore>(&mut self, oam: &mut OamTable, rng: &mut R) -> Result<()> {
        if self.zombies.len() < self.capacity {
            let zombie = Zombie::spawn(oam, rng)?;
            debug!("zombie {} joins at x={}", self.zombies.len(), zombie.x);
            // capacity never exceeds MAX_HORDE, so there is room
            let _ = self.zombies.push(zombie);
            return Ok(());
        }

        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.zombies.len();
        let zombie = &mut self.zombies[index];
        zombie.respawn(oam, rng)?;
        debug!("zombie {} respawns at x={}", index, zombie.x);
        Ok(())
    }

    /// Summon `count` zombies. Zero or negative counts summon none.
    ///
    /// A batch touches each zombie at most once, so counts above the pool
    /// capacity are cut down to it. Returns how many zombies were placed,
    /// new or recycled.
    pub fn summon<R: RngCore>(&mut self, oam: &mut OamTable, rng: &mut R, count: i32) -> Result<usize> {
        let count = (count.max(0) as usize).min(self.capacity);
        for _ in 0..count {
            self.summon_one(oam, rng)?;
        }
        Ok(count)
    }

    pub fn update(&mut self, oam: &mut OamTable) -> Result<()> {
        for zombie in self.zombies.iter_mut() {
            zombie.update(oam)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};

    use super::*;
    use crate::video_dma::oam::OamMode;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(0x5EED)
    }

    #[test]
    fn spawn_layout() {
        let mut oam = OamTable::new(OamMode::Checked);
        let mut rng = rng();
        for _ in 0..50 {
            let zombie = Zombie::spawn(&mut oam, &mut rng).unwrap();
            assert!((0..WIDTH - 16).contains(&zombie.x));
            assert_eq!(zombie.y, 0);
            assert!(zombie.moving);

            let sprite = oam.sprite(zombie.sprite).unwrap();
            assert_eq!(sprite.y(), 16);
            assert_eq!(sprite.tile(), ZOMBIE_TILE);
            assert_eq!(sprite.size(), Some(ZOMBIE_SIZE));
        }
    }

    #[test]
    fn falls_one_line_per_update_without_clamp() {
        let mut oam = OamTable::new(OamMode::Checked);
        let mut zombie = Zombie::spawn(&mut oam, &mut rng()).unwrap();

        zombie.update(&mut oam).unwrap();
        assert_eq!(zombie.y, 1);
        assert_eq!(oam.position(zombie.sprite).unwrap(), (zombie.x, 1));

        for _ in 0..299 {
            zombie.update(&mut oam).unwrap();
        }
        assert_eq!(zombie.y, 300);
        // attr0 keeps the low 8 bits
        assert_eq!(oam.position(zombie.sprite).unwrap().1, 300 & 0xFF);
    }

    #[test]
    fn stopped_zombie_stays_put() {
        let mut oam = OamTable::new(OamMode::Checked);
        let mut zombie = Zombie::spawn(&mut oam, &mut rng()).unwrap();
        zombie.moving = false;
        zombie.update(&mut oam).unwrap();
        assert_eq!(zombie.y, 0);
        assert_eq!(oam.position(zombie.sprite).unwrap().1, 0);
    }

    #[test]
    fn single_slot_pool_keeps_its_handle() {
        let mut oam = OamTable::new(OamMode::Checked);
        let mut rng = rng();
        let mut horde = Horde::new(1);

        horde.summon(&mut oam, &mut rng, 1).unwrap();
        let handle = horde.iter().next().unwrap().sprite;
        for _ in 0..10 {
            horde.update(&mut oam).unwrap();
        }

        assert_eq!(horde.summon(&mut oam, &mut rng, 5).unwrap(), 1);
        assert_eq!(horde.len(), 1);
        assert_eq!(oam.allocated(), 1);

        let zombie = horde.iter().next().unwrap();
        assert_eq!(zombie.sprite, handle);
        assert_eq!(zombie.y, 0);
        assert_eq!(oam.position(handle).unwrap(), (zombie.x, 16));
    }

    #[test]
    fn pool_grows_then_recycles_round_robin() {
        let mut oam = OamTable::new(OamMode::Checked);
        let mut rng = rng();
        let mut horde = Horde::new(3);

        horde.summon(&mut oam, &mut rng, 3).unwrap();
        assert_eq!(horde.len(), 3);
        assert_eq!(oam.allocated(), 3);
        for _ in 0..5 {
            horde.update(&mut oam).unwrap();
        }

        // recycles zombie 0 then zombie 1, leaves zombie 2 falling
        horde.summon(&mut oam, &mut rng, 2).unwrap();
        let ys: heapless::Vec<i32, 3> = horde.iter().map(|z| z.y).collect();
        assert_eq!(ys.as_slice(), &[0, 0, 5]);
        assert_eq!(oam.allocated(), 3);

        horde.summon(&mut oam, &mut rng, 1).unwrap();
        let ys: heapless::Vec<i32, 3> = horde.iter().map(|z| z.y).collect();
        assert_eq!(ys.as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn negative_and_zero_counts_summon_nothing() {
        let mut oam = OamTable::new(OamMode::Checked);
        let mut rng = rng();
        let mut horde = Horde::new(4);
        assert_eq!(horde.summon(&mut oam, &mut rng, -3).unwrap(), 0);
        assert_eq!(horde.summon(&mut oam, &mut rng, 0).unwrap(), 0);
        assert!(horde.is_empty());
        assert_eq!(oam.allocated(), 0);
    }

    #[test]
    fn oversized_batch_is_cut_to_the_pool() {
        let mut oam = OamTable::new(OamMode::Checked);
        let mut rng = rng();
        let mut horde = Horde::new(3);

        assert_eq!(horde.summon(&mut oam, &mut rng, i32::MAX).unwrap(), 3);
        assert_eq!(horde.len(), 3);
        assert_eq!(oam.allocated(), 3);

        for _ in 0..5 {
            horde.update(&mut oam).unwrap();
        }
        // recycled zombies each get one pass, the slots stay put
        assert_eq!(horde.summon(&mut oam, &mut rng, 1_000_000).unwrap(), 3);
        assert!(horde.iter().all(|z| z.y == 0));
        assert_eq!(oam.allocated(), 3);
    }

    #[test]
    fn capacity_is_clamped() {
        assert_eq!(Horde::new(0).capacity(), 1);
        assert_eq!(Horde::new(1000).capacity(), MAX_HORDE);
    }
}
