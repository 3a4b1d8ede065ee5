use crate::game::{survivor::Survivor, zombie::Zombie};

/// Axis-aligned box in screen pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Hitbox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Hitbox size for both survivors and zombies. The zombie sprite is 16×32
/// but only its top 16×16 collides.
pub const ENTITY_HITBOX: (i32, i32) = (16, 16);

impl Hitbox {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn entity(x: i32, y: i32) -> Self {
        Self::new(x, y, ENTITY_HITBOX.0, ENTITY_HITBOX.1)
    }

    /// Strict overlap: boxes that only share an edge do not collide.
    #[inline]
    pub const fn overlaps(&self, other: &Hitbox) -> bool {
        overlaps(self.x, self.y, self.w, self.h, other.x, other.y, other.w, other.h)
    }
}

#[inline]
pub const fn overlaps(x1: i32, y1: i32, w1: i32, h1: i32, x2: i32, y2: i32, w2: i32, h2: i32) -> bool {
    x1 < x2 + w2 && x1 + w1 > x2 && y1 < y2 + h2 && y1 + h1 > y2
}

pub fn survivor_hit(survivor: &Survivor, zombie: &Zombie) -> bool {
    survivor.hitbox().overlaps(&zombie.hitbox())
}
