#![no_std]
#![no_main]

use core::convert::Infallible;

use rand::{SeedableRng, rngs::SmallRng};
use shambles::{
    config::GameConfig,
    game::{Game, GameAssets},
    mmio::Mmio,
    video_dma::{background::BackgroundAssets, oam::SpriteSheet},
};

mod boot;

const fn rgb15(r: u16, g: u16, b: u16) -> u16 {
    r | g << 5 | b << 10
}

/// Two 256-colour 8×8 tiles per entry of `fills`, as half-words.
const fn tiles<const N: usize>(fills: [u8; 2]) -> [u16; N] {
    let mut out = [0u16; N];
    let mut i = 0;
    while i < N {
        let fill = fills[(i / 32) % 2] as u16;
        out[i] = fill | fill << 8;
        i += 1;
    }
    out
}

const fn checker_map() -> [u16; 1024] {
    let mut map = [0u16; 1024];
    let mut i = 0;
    while i < 1024 {
        map[i] = (((i % 32) ^ (i / 32)) & 1) as u16;
        i += 1;
    }
    map
}

// placeholder art until the converted images are checked in
static BG_PALETTE: [u16; 4] = [0, rgb15(4, 10, 4), rgb15(6, 14, 5), rgb15(20, 20, 20)];
static BG_TILES: [u16; 64] = tiles([1, 2]);
static BG_MAP: [u16; 1024] = checker_map();
static OBJ_PALETTE: [u16; 4] = [0, rgb15(31, 24, 16), rgb15(4, 20, 4), rgb15(31, 31, 31)];
static OBJ_TILES: [u16; 640] = tiles([1, 2]);

static ASSETS: GameAssets<'static> = GameAssets {
    background: BackgroundAssets {
        palette: &BG_PALETTE,
        tiles: &BG_TILES,
        map: &BG_MAP,
    },
    sprites: SpriteSheet {
        palette: &OBJ_PALETTE,
        tiles: &OBJ_TILES,
    },
};

/// Zombies per spawn batch.
fn summon(lives_remaining: i32, frames_survived: i32) -> i32 {
    if lives_remaining <= 0 {
        return 0;
    }
    1 + frames_survived / 1800
}

fn play() -> shambles::Result<Infallible> {
    let hw = unsafe { Mmio::new() };
    let rng = SmallRng::seed_from_u64(0x5EED);
    let mut game = Game::boot(hw, GameConfig::default(), &ASSETS, summon, rng)?;
    game.run()
}

fn main() -> ! {
    match play() {
        Ok(never) => match never {},
        Err(error) => panic!("{}", error),
    }
}
