//! # Tiled Background
//!
//! Background 0 is set up once at boot: palette, tile images and tilemap go
//! to their VRAM regions through the bulk transfer channel, then BG0CNT
//! selects where the hardware finds them. After that the only per-frame
//! work is writing the two scroll registers ([`Scroll::apply`]).
//!
//! ```text
//! VRAM $0600_0000
//! ├── char block 0   ($0600_0000)  tiles, 256-colour
//! ├── ...
//! └── screen block 16 ($0600_8000) 32×32 tilemap
//! ```

use bit_field::BitField;
use log::{debug, info};

use crate::{
    console::Console,
    error::{Error, Field, Result},
    hw::Hardware,
    scr::{
        BG_PALETTE, CHAR_BLOCK_SIZE, PALETTE_SIZE, REG_BG0CNT, REG_BG0HOFS, REG_BG0VOFS,
        SCREEN_BLOCK_SIZE, char_block, screen_block,
    },
    video_dma::{MAX_TRANSFER, TransferWidth},
};

/// Background control word (BG0CNT and friends).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BgControl(pub u16);

impl BgControl {
    pub const PRIORITY: core::ops::Range<usize> = 0..2;
    pub const CHAR_BASE: core::ops::Range<usize> = 2..4;
    pub const MOSAIC: usize = 6;
    pub const COLOR_256: usize = 7;
    pub const SCREEN_BASE: core::ops::Range<usize> = 8..13;
    pub const WRAP: usize = 13;
    pub const SIZE: core::ops::Range<usize> = 14..16;

    pub fn new(priority: u8, char_base: u8, screen_base: u8, color_256: bool, wrap: bool, size: u8) -> Self {
        let mut word = 0u16;
        word.set_bits(Self::PRIORITY, priority as u16 & 0b11);
        word.set_bits(Self::CHAR_BASE, char_base as u16 & 0b11);
        word.set_bit(Self::COLOR_256, color_256);
        word.set_bits(Self::SCREEN_BASE, screen_base as u16 & 0b1_1111);
        word.set_bit(Self::WRAP, wrap);
        word.set_bits(Self::SIZE, size as u16 & 0b11);
        Self(word)
    }

    pub fn priority(&self) -> u8 {
        self.0.get_bits(Self::PRIORITY) as u8
    }

    pub fn char_base(&self) -> u8 {
        self.0.get_bits(Self::CHAR_BASE) as u8
    }

    pub fn screen_base(&self) -> u8 {
        self.0.get_bits(Self::SCREEN_BASE) as u8
    }

    pub fn is_256_color(&self) -> bool {
        self.0.get_bit(Self::COLOR_256)
    }

    pub fn mosaic(&self) -> bool {
        self.0.get_bit(Self::MOSAIC)
    }
}

/// Palette, tiles and map for one background layer.
#[derive(Debug, Copy, Clone)]
pub struct BackgroundAssets<'a> {
    /// 15-bit BGR colours, at most 256.
    pub palette: &'a [u16],
    /// Packed tile pixels, as half-words.
    pub tiles: &'a [u16],
    /// Row-major tile indices.
    pub map: &'a [u16],
}

/// Where background 0 lives in VRAM.
///
/// The control word is derived from the block numbers, so the two can never
/// disagree.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BackgroundLayer {
    char_block: u8,
    screen_block: u8,
    control: BgControl,
}

impl BackgroundLayer {
    pub const MAX_CHAR_BLOCK: u8 = 3;
    pub const MAX_SCREEN_BLOCK: u8 = 31;

    /// A 256-colour, 256×256 layer with tiles in `char_block` (0-3) and the
    /// map in `screen_block` (0-31).
    pub fn new(char_block: u8, screen_block: u8, priority: u8, wrap: bool) -> Result<Self> {
        if char_block > Self::MAX_CHAR_BLOCK {
            return Err(Error::ValueOutOfRange {
                field: Field::CharBlock,
                value: char_block as i32,
                max: Self::MAX_CHAR_BLOCK as i32,
            });
        }
        if screen_block > Self::MAX_SCREEN_BLOCK {
            return Err(Error::ValueOutOfRange {
                field: Field::ScreenBlock,
                value: screen_block as i32,
                max: Self::MAX_SCREEN_BLOCK as i32,
            });
        }
        Ok(Self {
            char_block,
            screen_block,
            control: BgControl::new(priority, char_block, screen_block, true, wrap, 0),
        })
    }

    /// The cartridge layout: tiles in char block 0, map in screen block 16,
    /// 256 colours, 256×256 map.
    pub fn standard() -> Self {
        Self {
            char_block: 0,
            screen_block: 16,
            control: BgControl::new(0, 0, 16, true, true, 0),
        }
    }

    pub fn char_block(&self) -> u8 {
        self.char_block
    }

    pub fn screen_block(&self) -> u8 {
        self.screen_block
    }

    pub fn control(&self) -> BgControl {
        self.control
    }

    /// Upload `assets` and write BG0CNT.
    pub fn setup<H: Hardware>(&self, console: &mut Console<H>, assets: &BackgroundAssets<'_>) -> Result<()> {
        if assets.palette.len() > PALETTE_SIZE {
            return Err(Error::ValueOutOfRange {
                field: Field::Palette,
                value: assets.palette.len() as i32,
                max: PALETTE_SIZE as i32,
            });
        }

        let tile_room = (Self::MAX_CHAR_BLOCK - self.char_block + 1) as usize * (CHAR_BLOCK_SIZE as usize / 2);
        if assets.tiles.len() > tile_room.min(MAX_TRANSFER) {
            return Err(Error::ValueOutOfRange {
                field: Field::TileData,
                value: assets.tiles.len() as i32,
                max: tile_room.min(MAX_TRANSFER) as i32,
            });
        }

        let map_room = (Self::MAX_SCREEN_BLOCK - self.screen_block + 1) as usize * (SCREEN_BLOCK_SIZE as usize / 2);
        if assets.map.len() > map_room.min(MAX_TRANSFER) {
            return Err(Error::ValueOutOfRange {
                field: Field::TileMap,
                value: assets.map.len() as i32,
                max: map_room.min(MAX_TRANSFER) as i32,
            });
        }

        console.transfer(BG_PALETTE, assets.palette, TransferWidth::Half)?;
        console.transfer(char_block(self.char_block as u32), assets.tiles, TransferWidth::Half)?;
        console.hw.write_u16(REG_BG0CNT, self.control.0);
        console.transfer(screen_block(self.screen_block as u32), assets.map, TransferWidth::Half)?;

        info!(
            "background ready: {} colours, {} tile words, {} map entries, bg0cnt={:#06X}",
            assets.palette.len(),
            assets.tiles.len(),
            assets.map.len(),
            self.control.0
        );
        Ok(())
    }
}

/// Background 0 scroll offset in pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Scroll {
    pub x: i16,
    pub y: i16,
}

impl Scroll {
    #[inline]
    pub fn shift(&mut self, dx: i16, dy: i16) {
        self.x = self.x.wrapping_add(dx);
        self.y = self.y.wrapping_add(dy);
    }

    /// Write both offsets to BG0HOFS/BG0VOFS.
    pub fn apply<H: Hardware>(&self, console: &mut Console<H>) {
        console.hw.write_u16(REG_BG0HOFS, self.x as u16);
        console.hw.write_u16(REG_BG0VOFS, self.y as u16);
        debug!("scroll ({}, {})", self.x, self.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fake_console;

    #[test]
    fn standard_control_word() {
        let layer = BackgroundLayer::standard();
        // 256 colours, screen block 16, wrap
        assert_eq!(layer.control().0, (1 << 7) | (16 << 8) | (1 << 13));
        assert_eq!(layer.control().screen_base(), 16);
        assert_eq!(layer.control().char_base(), 0);
        assert!(layer.control().is_256_color());
        assert!(!layer.control().mosaic());
        assert_eq!(BackgroundLayer::new(0, 16, 0, true), Ok(layer));
    }

    #[test]
    fn control_follows_block_numbers() {
        let layer = BackgroundLayer::new(3, 31, 2, false).unwrap();
        assert_eq!(layer.char_block(), 3);
        assert_eq!(layer.screen_block(), 31);
        assert_eq!(layer.control().char_base(), 3);
        assert_eq!(layer.control().screen_base(), 31);
        assert_eq!(layer.control().priority(), 2);
    }

    #[test]
    fn out_of_range_blocks_are_rejected() {
        assert_eq!(
            BackgroundLayer::new(4, 16, 0, true),
            Err(Error::ValueOutOfRange { field: Field::CharBlock, value: 4, max: 3 })
        );
        assert_eq!(
            BackgroundLayer::new(0, 32, 0, true),
            Err(Error::ValueOutOfRange { field: Field::ScreenBlock, value: 32, max: 31 })
        );
        assert!(BackgroundLayer::new(u8::MAX, u8::MAX, 0, true).is_err());
    }

    #[test]
    fn last_blocks_leave_one_block_of_room() {
        let mut console = fake_console();
        let layer = BackgroundLayer::new(3, 31, 0, true).unwrap();
        let tiles = [0u16; 8 * 1024 + 1];

        let err = layer.setup(&mut console, &BackgroundAssets { palette: &[0; 4], tiles: &tiles, map: &[0; 4] });
        assert_eq!(
            err,
            Err(Error::ValueOutOfRange { field: Field::TileData, value: 8 * 1024 + 1, max: 8 * 1024 })
        );

        let map = [0u16; 1024 + 1];
        let err = layer.setup(&mut console, &BackgroundAssets { palette: &[0; 4], tiles: &[0; 4], map: &map });
        assert_eq!(err, Err(Error::ValueOutOfRange { field: Field::TileMap, value: 1025, max: 1024 }));
        assert!(console.hw.transfers.is_empty());
    }

    #[test]
    fn setup_uploads_in_order_and_writes_control() {
        let mut console = fake_console();
        let palette = [0u16; 256];
        let tiles = [1u16; 128];
        let map = [2u16; 1024];

        BackgroundLayer::standard()
            .setup(&mut console, &BackgroundAssets { palette: &palette, tiles: &tiles, map: &map })
            .unwrap();

        let destinations: [u32; 3] = [
            console.hw.transfers[0].destination,
            console.hw.transfers[1].destination,
            console.hw.transfers[2].destination,
        ];
        assert_eq!(destinations, [BG_PALETTE, 0x0600_0000, 0x0600_8000]);
        assert_eq!(console.hw.reg(REG_BG0CNT), BackgroundLayer::standard().control().0);
    }

    #[test]
    fn oversized_map_is_rejected_before_any_transfer() {
        let mut console = fake_console();
        let map = [0u16; 16 * 1024 + 1];

        let err = BackgroundLayer::standard()
            .setup(&mut console, &BackgroundAssets { palette: &[0; 4], tiles: &[0; 4], map: &map });

        assert!(matches!(err, Err(Error::ValueOutOfRange { field: Field::TileMap, .. })));
        assert!(console.hw.transfers.is_empty());
    }

    #[test]
    fn scroll_wraps_and_writes_registers() {
        let mut console = fake_console();
        let mut scroll = Scroll::default();
        scroll.shift(-1, -2);
        scroll.apply(&mut console);

        assert_eq!(console.hw.reg(REG_BG0HOFS), 0xFFFF);
        assert_eq!(console.hw.reg(REG_BG0VOFS), 0xFFFE);

        let mut edge = Scroll { x: i16::MAX, y: 0 };
        edge.shift(1, 0);
        assert_eq!(edge.x, i16::MIN);
    }
}
