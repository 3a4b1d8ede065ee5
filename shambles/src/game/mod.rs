//! # Game
//!
//! [`Game`] owns the console and every piece of play state, and runs one
//! frame per [`Game::step`]. The frame order is fixed:
//!
//! | # | Stage                                                      |
//! |---|------------------------------------------------------------|
//! | 1 | wait for vblank                                            |
//! | 2 | count the frame, drift the background up one line          |
//! | 3 | update the survivor, then every zombie                     |
//! | 4 | collisions: one life per overlapping zombie                |
//! | 5 | spawn a batch if the interval has elapsed                  |
//! | 6 | sample the keypad, apply one movement                      |
//! | 7 | write the scroll registers, flush the sprite table         |
//! | 8 | pacing delay                                               |
//!
//! There is no game over. Lives keep counting down past zero.
//!
//! ```ignore
//! let mut game = Game::boot(hw, GameConfig::default(), &assets, |lives, frames| frames / 600 + 1 - lives, rng)?;
//! game.run()?;
//! ```

pub mod collision;
pub mod session;
pub mod survivor;
pub mod zombie;

use core::convert::Infallible;

use log::{debug, info};
use rand::RngCore;

use crate::{
    config::GameConfig,
    console::Console,
    error::Result,
    hw::Hardware,
    input::Intent,
    video_dma::{
        background::{BackgroundAssets, BackgroundLayer, Scroll},
        oam::{OamTable, SpriteSheet},
    },
};

use self::{
    session::{Difficulty, Session},
    survivor::{Step, Survivor},
    zombie::Horde,
};

/// Everything uploaded to video memory at boot.
#[derive(Debug, Copy, Clone)]
pub struct GameAssets<'a> {
    pub background: BackgroundAssets<'a>,
    pub sprites: SpriteSheet<'a>,
}

/// What happened during one [`Game::step`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u32,
    pub intent: Intent,
    /// Zombies overlapping the survivor this frame.
    pub collisions: usize,
    /// Zombies placed at the top this frame, new or recycled.
    pub summoned: usize,
    pub lives: i32,
}

pub struct Game<H: Hardware, D: Difficulty, R: RngCore> {
    pub console: Console<H>,
    pub oam: OamTable,
    pub survivor: Survivor,
    pub horde: Horde,
    pub scroll: Scroll,
    pub session: Session,
    difficulty: D,
    rng: R,
    config: GameConfig,
}

impl<H: Hardware, D: Difficulty, R: RngCore> Game<H, D, R> {
    pub fn boot(hw: H, config: GameConfig, assets: &GameAssets<'_>, difficulty: D, mut rng: R) -> Result<Self> {
        config.validate()?;

        let mut console = Console::init(hw, config.sync, config.transfers);
        BackgroundLayer::standard().setup(&mut console, &assets.background)?;

        let mut oam = OamTable::new(config.oam);
        oam.load_sprite_sheet(&mut console, &assets.sprites)?;
        oam.reset_all();

        let survivor = Survivor::init(&mut oam, &config)?;
        let mut horde = Horde::new(config.max_zombies);
        horde.summon(&mut oam, &mut rng, config.initial_zombies as i32)?;

        info!(
            "game booted: {} lives, {} zombie(s) of {} max",
            config.starting_lives,
            horde.len(),
            horde.capacity()
        );

        Ok(Self {
            console,
            oam,
            survivor,
            horde,
            scroll: Scroll::default(),
            session: Session::new(config.starting_lives),
            difficulty,
            rng,
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Run one frame.
    pub fn step(&mut self) -> Result<FrameReport> {
        let frame = self.console.wait_vblank();

        self.session.tick();
        self.scroll.shift(0, -1);

        self.survivor.update(&mut self.oam)?;
        self.horde.update(&mut self.oam)?;

        let collisions = self
            .horde
            .iter()
            .filter(|zombie| collision::survivor_hit(&self.survivor, zombie))
            .count();
        if collisions > 0 {
            self.session.lose_lives(collisions);
            info!("hit by {} zombie(s), {} lives left", collisions, self.session.lives);
        }

        let mut summoned = 0;
        if self.session.tick_spawn(self.config.spawn_interval) {
            let count = self.difficulty.summon(self.session.lives, self.session.frames_alive);
            summoned = self.horde.summon(&mut self.oam, &mut self.rng, count)?;
            debug!("spawn batch of {} (asked for {})", summoned, count);
        }

        let intent = self.console.read_keypad().intent();
        self.dispatch(intent)?;

        self.scroll.apply(&mut self.console);
        self.oam.flush(&mut self.console, &frame)?;
        self.console.pace(self.config.pace_ticks);

        Ok(FrameReport {
            frame: frame.number(),
            intent,
            collisions,
            summoned,
            lives: self.session.lives,
        })
    }

    /// Step forever. Only returns on an error.
    pub fn run(&mut self) -> Result<Infallible> {
        loop {
            self.step()?;
        }
    }

    fn dispatch(&mut self, intent: Intent) -> Result<()> {
        let oam = &mut self.oam;
        match intent {
            Intent::Right => {
                if self.survivor.right(oam)? == Step::Blocked {
                    self.scroll.shift(1, 0);
                }
            }
            Intent::Left => {
                if self.survivor.left(oam)? == Step::Blocked {
                    self.scroll.shift(-1, 0);
                }
            }
            Intent::Up => {
                if self.survivor.up(oam)? == Step::Blocked {
                    self.scroll.shift(0, -1);
                }
            }
            Intent::Down => {
                self.survivor.down(oam)?;
            }
            Intent::Stop => self.survivor.stop(oam)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use rand::{SeedableRng, rngs::SmallRng};

    use super::*;
    use crate::{
        error::Error,
        scr::{BG_PALETTE, Buttons, OAM, OBJ_PALETTE, REG_BG0CNT, REG_BG0HOFS, REG_BG0VOFS},
        testing::FakeHw,
    };

    static PALETTE: [u16; 4] = [0x0000, 0x001F, 0x03E0, 0x7C00];
    static TILES: [u16; 64] = [0x0101; 64];
    static MAP: [u16; 32] = [0; 32];

    fn assets() -> GameAssets<'static> {
        GameAssets {
            background: BackgroundAssets {
                palette: &PALETTE,
                tiles: &TILES,
                map: &MAP,
            },
            sprites: SpriteSheet {
                palette: &PALETTE,
                tiles: &TILES,
            },
        }
    }

    fn never(_: i32, _: i32) -> i32 {
        0
    }

    fn boot<D: Difficulty>(config: GameConfig, difficulty: D) -> Game<FakeHw, D, SmallRng> {
        Game::boot(FakeHw::new(), config, &assets(), difficulty, SmallRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn boot_uploads_assets_and_places_entities() {
        let game = boot(GameConfig::default(), never);
        let hw = &game.console.hw;

        let destinations: heapless::Vec<u32, 8> = hw.transfers.iter().map(|t| t.destination).collect();
        assert_eq!(destinations[0], BG_PALETTE);
        assert!(destinations.contains(&OBJ_PALETTE));
        assert_eq!(hw.reg(REG_BG0CNT), BackgroundLayer::standard().control().0);

        assert_eq!(game.oam.allocated(), 2);
        assert_eq!(game.horde.len(), 1);
        assert_eq!(game.session.lives, 3);
    }

    #[test]
    fn boot_rejects_bad_config() {
        let config = GameConfig {
            max_zombies: 0,
            ..GameConfig::default()
        };
        let result = Game::boot(FakeHw::new(), config, &assets(), never, SmallRng::seed_from_u64(7));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn idle_frame() {
        let mut game = boot(GameConfig::default(), never);
        let report = game.step().unwrap();

        assert_eq!(report.frame, 1);
        assert_eq!(report.intent, Intent::Stop);
        assert_eq!(game.session.frames_alive, 1);
        assert_eq!(game.scroll, Scroll { x: 0, y: -1 });
        assert_eq!(game.console.hw.reg(REG_BG0VOFS), (-1i16) as u16);
        assert_eq!(game.console.hw.delayed, 400);

        let last = game.console.hw.transfers.last().unwrap();
        assert_eq!(last.destination, OAM);
        assert_eq!(last.data.len(), 512);
    }

    #[test]
    fn right_at_border_scrolls_instead() {
        let mut game = boot(GameConfig::default(), never);
        game.survivor.x = 240 - 16 - 40;
        game.console.hw.hold(Buttons::RIGHT | Buttons::UP);

        let report = game.step().unwrap();
        assert_eq!(report.intent, Intent::Right);
        assert_eq!(game.survivor.x, 184);
        assert_eq!(game.survivor.y, 140);
        assert_eq!(game.scroll, Scroll { x: 1, y: -1 });
        assert_eq!(game.console.hw.reg(REG_BG0HOFS), 1);
    }

    #[test]
    fn up_at_top_scrolls_twice_as_fast() {
        let mut game = boot(GameConfig::default(), never);
        game.survivor.y = 100;
        game.console.hw.hold(Buttons::UP);

        game.step().unwrap();
        assert_eq!(game.survivor.y, 100);
        assert_eq!(game.scroll.y, -2);
    }

    #[test]
    fn each_overlapping_zombie_costs_a_life_every_frame() {
        let mut game = boot(GameConfig::default(), never);
        for zombie in game.horde.iter_mut() {
            zombie.x = game.survivor.x + 4;
            zombie.y = game.survivor.y;
            zombie.moving = false;
        }

        assert_eq!(game.step().unwrap().collisions, 1);
        assert_eq!(game.step().unwrap().lives, 1);
        game.step().unwrap();
        let report = game.step().unwrap();
        assert_eq!(report.lives, -1);
    }

    #[test]
    fn distant_zombie_is_harmless() {
        let mut game = boot(GameConfig::default(), never);
        for zombie in game.horde.iter_mut() {
            zombie.x = game.survivor.x + 16;
            zombie.y = game.survivor.y;
            zombie.moving = false;
        }
        assert_eq!(game.step().unwrap().collisions, 0);
        assert_eq!(game.session.lives, 3);
    }

    #[test]
    fn batch_spawns_on_interval_with_session_stats() {
        let asked = Cell::new((0, 0));
        let difficulty = |lives: i32, frames: i32| {
            asked.set((lives, frames));
            2
        };
        let mut game = boot(GameConfig::default(), &difficulty);
        // keep the first zombie away from the survivor
        for zombie in game.horde.iter_mut() {
            zombie.moving = false;
            zombie.x = 0;
        }

        for _ in 0..179 {
            assert_eq!(game.step().unwrap().summoned, 0);
        }
        let report = game.step().unwrap();
        assert_eq!(report.summoned, 2);
        assert_eq!(asked.get(), (3, 180));
        assert_eq!(game.horde.len(), 3);
    }

    #[test]
    fn flush_happens_once_per_frame() {
        let mut game = boot(GameConfig::default(), never);
        game.step().unwrap();
        let oam_writes = game.console.hw.transfers.iter().filter(|t| t.destination == OAM).count();
        game.step().unwrap();
        let after = game.console.hw.transfers.iter().filter(|t| t.destination == OAM).count();
        assert_eq!(after, oam_writes + 1);
    }
}
