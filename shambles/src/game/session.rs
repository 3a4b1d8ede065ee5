/// Decides how many zombies each spawn batch brings.
///
/// Any `Fn(i32, i32) -> i32` works, so a plain function or closure can be
/// passed straight to [`Game::boot`](super::Game::boot).
pub trait Difficulty {
    fn summon(&self, lives_remaining: i32, frames_survived: i32) -> i32;
}

impl<F> Difficulty for F
where
    F: Fn(i32, i32) -> i32,
{
    #[inline]
    fn summon(&self, lives_remaining: i32, frames_survived: i32) -> i32 {
        self(lives_remaining, frames_survived)
    }
}

/// Scores and timers for one play session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Session {
    /// May go negative; nothing ends the game.
    pub lives: i32,
    pub frames_alive: i32,
    pub spawn_counter: u32,
}

impl Session {
    pub const fn new(lives: i32) -> Self {
        Self {
            lives,
            frames_alive: 0,
            spawn_counter: 0,
        }
    }

    #[inline]
    pub fn tick(&mut self) {
        self.frames_alive = self.frames_alive.saturating_add(1);
    }

    #[inline]
    pub fn lose_lives(&mut self, count: usize) {
        self.lives = self.lives.saturating_sub(count.min(i32::MAX as usize) as i32);
    }

    /// Count one frame towards the next batch. True on the frame a batch is due.
    pub fn tick_spawn(&mut self, interval: u32) -> bool {
        self.spawn_counter += 1;
        if self.spawn_counter >= interval {
            self.spawn_counter = 0;
            true
        } else {
            false
        }
    }
}
