//! Procedural stand-ins for the cartridge art.
//!
//! Every image is 256-colour: one byte per pixel, two pixels per half-word,
//! 32 half-words per 8×8 tile.

use shambles::{
    game::GameAssets,
    video_dma::{background::BackgroundAssets, oam::SpriteSheet},
};

const TILE_WORDS: usize = 32;
const MAP_SIDE: usize = 32;
/// Sprite tile indices are in 32-byte units; an 8×8 256-colour tile spans two.
const SPRITE_UNITS: usize = 40;

pub struct PlaceholderAssets {
    pub palette: Vec<u16>,
    pub bg_tiles: Vec<u16>,
    pub map: Vec<u16>,
    pub sprite_palette: Vec<u16>,
    pub sprite_tiles: Vec<u16>,
}

fn rgb15(r: u16, g: u16, b: u16) -> u16 {
    (r & 0x1F) | (g & 0x1F) << 5 | (b & 0x1F) << 10
}

fn tile(fill: u8, accent: u8, stride: usize) -> Vec<u16> {
    let px = |i: usize| if i % stride == 0 { accent } else { fill };
    (0..TILE_WORDS)
        .map(|word| u16::from_le_bytes([px(word * 2), px(word * 2 + 1)]))
        .collect()
}

impl PlaceholderAssets {
    pub fn generate() -> Self {
        let palette = (0..256u16).map(|i| rgb15(i >> 3, (i >> 1) & 0x1F, i & 0x1F)).collect();

        let bg_tiles = [(0x20, 0x21, 7), (0x22, 0x21, 5), (0x24, 0x30, 11), (0x26, 0x27, 3)]
            .into_iter()
            .flat_map(|(fill, accent, stride)| tile(fill, accent, stride))
            .collect();

        let map = (0..MAP_SIDE * MAP_SIDE)
            .map(|i| ((i % MAP_SIDE) ^ (i / MAP_SIDE)) as u16 & 3)
            .collect();

        let sprite_palette = [0x0000, rgb15(31, 24, 16), rgb15(4, 20, 4), rgb15(31, 31, 31)]
            .into_iter()
            .chain(core::iter::repeat(0).take(252))
            .collect();

        // half a 256-colour tile per unit
        let sprite_tiles = (0..SPRITE_UNITS)
            .flat_map(|unit| {
                let colour = if unit < 8 || (16..24).contains(&unit) { 1 } else { 2 };
                tile(colour, 3, 9).into_iter().take(TILE_WORDS / 2)
            })
            .collect();

        Self {
            palette,
            bg_tiles,
            map,
            sprite_palette,
            sprite_tiles,
        }
    }

    pub fn as_game_assets(&self) -> GameAssets<'_> {
        GameAssets {
            background: BackgroundAssets {
                palette: &self.palette,
                tiles: &self.bg_tiles,
                map: &self.map,
            },
            sprites: SpriteSheet {
                palette: &self.sprite_palette,
                tiles: &self.sprite_tiles,
            },
        }
    }
}

impl Default for PlaceholderAssets {
    fn default() -> Self {
        Self::generate()
    }
}
