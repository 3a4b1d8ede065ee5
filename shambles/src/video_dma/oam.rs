//! # Object Attribute Table
//!
//! The console draws up to 128 hardware sprites, each described by four
//! 16-bit attribute words in OAM at `$0700_0000`. [`OamTable`] keeps a RAM
//! copy of the whole table, hands out slots as [`SpriteHandle`]s, and copies
//! the table to OAM once per frame with [`OamTable::flush`].
//!
//! ## Attribute layout
//!
//! ```text
//! attr0  15 14 | 13  | 12  | 11 10 | 9   | 8      | 7 ........ 0
//!        shape | 256 | mos | mode  | off | affine | y
//! attr1  15 14 | 13    | 12    | 11 10 9 | 8 ........... 0
//!        size  | vflip | hflip | -       | x
//! attr2  15 .. 12 | 11 10    | 9 ............ 0
//!        palette  | priority | tile
//! attr3  unused (affine parameters)
//! ```
//!
//! Every setter is a masked read-modify-write of its own field: bits
//! belonging to other fields are never touched. Positions and tile offsets
//! are truncated to their field width, not clamped.
//!
//! ## Slots
//!
//! Fresh slots are handed out in increasing order. Released slots go on a
//! free list and are reused before any fresh slot. Every slot carries a
//! generation so a handle to a released (or reset) slot is rejected with
//! [`Error::StaleHandle`] instead of silently editing someone else's sprite.

use core::ops::Range;

use bit_field::BitField;
use bytemuck::{Pod, Zeroable};
use log::{debug, info, warn};

use crate::{
    console::Console,
    error::{Error, Field, Result},
    hw::Hardware,
    scr::{HEIGHT, OAM, OBJ_PALETTE, OBJ_TILES, PALETTE_SIZE, WIDTH},
    video_dma::{MAX_TRANSFER, TransferWidth, vsync::Frame},
};

pub const OAM_CAPACITY: usize = 128;

pub const ATTR0_Y: Range<usize> = 0..8;
pub const ATTR0_AFFINE: usize = 8;
pub const ATTR0_DISABLE: usize = 9;
pub const ATTR0_MODE: Range<usize> = 10..12;
pub const ATTR0_MOSAIC: usize = 12;
pub const ATTR0_COLOR_256: usize = 13;
pub const ATTR0_SHAPE: Range<usize> = 14..16;

pub const ATTR1_X: Range<usize> = 0..9;
pub const ATTR1_HFLIP: usize = 12;
pub const ATTR1_VFLIP: usize = 13;
pub const ATTR1_SIZE: Range<usize> = 14..16;

pub const ATTR2_TILE: Range<usize> = 0..10;
pub const ATTR2_PRIORITY: Range<usize> = 10..12;
pub const ATTR2_PALETTE: Range<usize> = 12..16;

pub const Y_MASK: u16 = 0x00FF;
pub const X_MASK: u16 = 0x01FF;
pub const TILE_MASK: u16 = 0x03FF;
pub const PRIORITY_MASK: u16 = 0x0003;

/// Largest tile index a descriptor can address.
pub const MAX_TILE: u16 = TILE_MASK;
pub const MAX_PRIORITY: u8 = PRIORITY_MASK as u8;

/// One hardware sprite descriptor, laid out exactly as in OAM.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct Sprite {
    pub attr0: u16,
    pub attr1: u16,
    pub attr2: u16,
    pub attr3: u16,
}

impl Sprite {
    /// Parked just past the bottom-right corner, with nothing else set.
    pub const HIDDEN: Sprite = Sprite {
        attr0: HEIGHT as u16,
        attr1: WIDTH as u16,
        attr2: 0,
        attr3: 0,
    };

    #[inline]
    pub fn y(&self) -> u16 {
        self.attr0.get_bits(ATTR0_Y)
    }

    #[inline]
    pub fn set_y(&mut self, y: u16) {
        self.attr0.set_bits(ATTR0_Y, y & Y_MASK);
    }

    #[inline]
    pub fn x(&self) -> u16 {
        self.attr1.get_bits(ATTR1_X)
    }

    #[inline]
    pub fn set_x(&mut self, x: u16) {
        self.attr1.set_bits(ATTR1_X, x & X_MASK);
    }

    #[inline]
    pub fn h_flip(&self) -> bool {
        self.attr1.get_bit(ATTR1_HFLIP)
    }

    #[inline]
    pub fn set_h_flip(&mut self, flip: bool) {
        self.attr1.set_bit(ATTR1_HFLIP, flip);
    }

    #[inline]
    pub fn v_flip(&self) -> bool {
        self.attr1.get_bit(ATTR1_VFLIP)
    }

    #[inline]
    pub fn set_v_flip(&mut self, flip: bool) {
        self.attr1.set_bit(ATTR1_VFLIP, flip);
    }

    #[inline]
    pub fn tile(&self) -> u16 {
        self.attr2.get_bits(ATTR2_TILE)
    }

    #[inline]
    pub fn set_tile(&mut self, tile: u16) {
        self.attr2.set_bits(ATTR2_TILE, tile & TILE_MASK);
    }

    #[inline]
    pub fn priority(&self) -> u8 {
        self.attr2.get_bits(ATTR2_PRIORITY) as u8
    }

    #[inline]
    pub fn set_priority(&mut self, priority: u8) {
        self.attr2.set_bits(ATTR2_PRIORITY, priority as u16 & PRIORITY_MASK);
    }

    #[inline]
    pub fn palette_bank(&self) -> u8 {
        self.attr2.get_bits(ATTR2_PALETTE) as u8
    }

    #[inline]
    pub fn is_256_color(&self) -> bool {
        self.attr0.get_bit(ATTR0_COLOR_256)
    }

    /// Shape and size codes as stored in attr0/attr1.
    #[inline]
    pub fn shape_size(&self) -> (u16, u16) {
        (self.attr0.get_bits(ATTR0_SHAPE), self.attr1.get_bits(ATTR1_SIZE))
    }

    pub fn size(&self) -> Option<SpriteSize> {
        let (shape, size) = self.shape_size();
        SpriteSize::from_codes(shape, size)
    }

    /// Full encode of a fresh 256-colour, non-affine descriptor.
    pub fn encode(x: u16, y: u16, size: SpriteSize, h_flip: bool, v_flip: bool, tile: u16, priority: u8) -> Sprite {
        let (shape_code, size_code) = size.codes();

        let mut attr0 = 0u16;
        attr0.set_bits(ATTR0_Y, y & Y_MASK);
        attr0.set_bit(ATTR0_COLOR_256, true);
        attr0.set_bits(ATTR0_SHAPE, shape_code);

        let mut attr1 = 0u16;
        attr1.set_bits(ATTR1_X, x & X_MASK);
        attr1.set_bit(ATTR1_HFLIP, h_flip);
        attr1.set_bit(ATTR1_VFLIP, v_flip);
        attr1.set_bits(ATTR1_SIZE, size_code);

        let mut attr2 = 0u16;
        attr2.set_bits(ATTR2_TILE, tile & TILE_MASK);
        attr2.set_bits(ATTR2_PRIORITY, priority as u16 & PRIORITY_MASK);

        Sprite { attr0, attr1, attr2, attr3: 0 }
    }
}

/// The twelve width×height combinations the hardware can draw.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SpriteSize {
    S8x8,
    S16x16,
    S32x32,
    S64x64,
    S16x8,
    S32x8,
    S32x16,
    S64x32,
    S8x16,
    S8x32,
    S16x32,
    S32x64,
}

impl SpriteSize {
    /// `(shape, size)` field codes.
    pub const fn codes(self) -> (u16, u16) {
        match self {
            SpriteSize::S8x8 => (0, 0),
            SpriteSize::S16x16 => (0, 1),
            SpriteSize::S32x32 => (0, 2),
            SpriteSize::S64x64 => (0, 3),
            SpriteSize::S16x8 => (1, 0),
            SpriteSize::S32x8 => (1, 1),
            SpriteSize::S32x16 => (1, 2),
            SpriteSize::S64x32 => (1, 3),
            SpriteSize::S8x16 => (2, 0),
            SpriteSize::S8x32 => (2, 1),
            SpriteSize::S16x32 => (2, 2),
            SpriteSize::S32x64 => (2, 3),
        }
    }

    pub const fn from_codes(shape: u16, size: u16) -> Option<Self> {
        Some(match (shape, size) {
            (0, 0) => SpriteSize::S8x8,
            (0, 1) => SpriteSize::S16x16,
            (0, 2) => SpriteSize::S32x32,
            (0, 3) => SpriteSize::S64x64,
            (1, 0) => SpriteSize::S16x8,
            (1, 1) => SpriteSize::S32x8,
            (1, 2) => SpriteSize::S32x16,
            (1, 3) => SpriteSize::S64x32,
            (2, 0) => SpriteSize::S8x16,
            (2, 1) => SpriteSize::S8x32,
            (2, 2) => SpriteSize::S16x32,
            (2, 3) => SpriteSize::S32x64,
            _ => return None,
        })
    }

    /// Width and height in pixels.
    pub const fn dimensions(self) -> (u8, u8) {
        match self {
            SpriteSize::S8x8 => (8, 8),
            SpriteSize::S16x16 => (16, 16),
            SpriteSize::S32x32 => (32, 32),
            SpriteSize::S64x64 => (64, 64),
            SpriteSize::S16x8 => (16, 8),
            SpriteSize::S32x8 => (32, 8),
            SpriteSize::S32x16 => (32, 16),
            SpriteSize::S64x32 => (64, 32),
            SpriteSize::S8x16 => (8, 16),
            SpriteSize::S8x32 => (8, 32),
            SpriteSize::S16x32 => (16, 32),
            SpriteSize::S32x64 => (32, 64),
        }
    }
}

/// A claim on one OAM slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpriteHandle {
    index: u8,
    generation: u32,
}

impl SpriteHandle {
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// How the table reacts to exhaustion and out-of-range encode arguments.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OamMode {
    /// Report [`Error::OutOfSlots`] and [`Error::ValueOutOfRange`].
    Checked,
    /// Behave like the bare hardware routine: wrap allocation back to slot 0
    /// and truncate every field to its bit width.
    HardwareCompat,
}

/// Sprite palette and tile data, uploaded once at boot.
#[derive(Debug, Copy, Clone)]
pub struct SpriteSheet<'a> {
    /// 15-bit BGR colours, at most 256.
    pub palette: &'a [u16],
    /// Packed tile pixels, as half-words.
    pub tiles: &'a [u16],
}

pub struct OamTable {
    sprites: [Sprite; OAM_CAPACITY],
    generations: [u32; OAM_CAPACITY],
    next: usize,
    free: heapless::Vec<u8, OAM_CAPACITY>,
    mode: OamMode,
    flushed: Option<u32>,
}

impl OamTable {
    pub fn new(mode: OamMode) -> Self {
        Self {
            sprites: [Sprite::HIDDEN; OAM_CAPACITY],
            generations: [0; OAM_CAPACITY],
            next: 0,
            free: heapless::Vec::new(),
            mode,
            flushed: None,
        }
    }

    pub fn mode(&self) -> OamMode {
        self.mode
    }

    /// Slots currently claimed.
    pub fn allocated(&self) -> usize {
        self.next - self.free.len()
    }

    /// The RAM copy of the table, as it will be flushed.
    pub fn sprites(&self) -> &[Sprite; OAM_CAPACITY] {
        &self.sprites
    }

    pub fn sprite(&self, handle: SpriteHandle) -> Result<&Sprite> {
        self.check(handle)?;
        Ok(&self.sprites[handle.index()])
    }

    #[inline]
    fn check(&self, handle: SpriteHandle) -> Result<()> {
        if self.generations[handle.index()] != handle.generation {
            return Err(Error::StaleHandle { index: handle.index });
        }
        Ok(())
    }

    #[inline]
    fn slot_mut(&mut self, handle: SpriteHandle) -> Result<&mut Sprite> {
        self.check(handle)?;
        Ok(&mut self.sprites[handle.index()])
    }

    /// Claim a slot and fully encode its descriptor.
    pub fn allocate(
        &mut self,
        x: i32,
        y: i32,
        size: SpriteSize,
        h_flip: bool,
        v_flip: bool,
        tile: u16,
        priority: u8,
    ) -> Result<SpriteHandle> {
        if self.mode == OamMode::Checked {
            if tile > MAX_TILE {
                return Err(Error::ValueOutOfRange {
                    field: Field::TileIndex,
                    value: tile as i32,
                    max: MAX_TILE as i32,
                });
            }
            if priority > MAX_PRIORITY {
                return Err(Error::ValueOutOfRange {
                    field: Field::Priority,
                    value: priority as i32,
                    max: MAX_PRIORITY as i32,
                });
            }
        }

        let index = if let Some(index) = self.free.pop() {
            index as usize
        } else if self.next < OAM_CAPACITY {
            self.next += 1;
            self.next - 1
        } else {
            match self.mode {
                OamMode::Checked => return Err(Error::OutOfSlots { capacity: OAM_CAPACITY }),
                OamMode::HardwareCompat => {
                    warn!("sprite table exhausted, wrapping to slot 0");
                    self.next = 1;
                    0
                }
            }
        };

        self.sprites[index] = Sprite::encode(x as u16, y as u16, size, h_flip, v_flip, tile, priority);
        debug!("sprite {} allocated {:?} at ({}, {}) tile {}", index, size, x, y, tile);

        Ok(SpriteHandle {
            index: index as u8,
            generation: self.generations[index],
        })
    }

    /// Hide the slot and return it to the free list. The handle becomes stale.
    pub fn release(&mut self, handle: SpriteHandle) -> Result<()> {
        self.check(handle)?;
        let index = handle.index();
        self.sprites[index] = Sprite::HIDDEN;
        self.generations[index] = self.generations[index].wrapping_add(1);
        // a slot can only pass the generation check once, so it is never listed twice
        let _ = self.free.push(handle.index);
        debug!("sprite {} released", index);
        Ok(())
    }

    /// Move the sprite. `x` keeps its low 9 bits and `y` its low 8 bits.
    pub fn set_position(&mut self, handle: SpriteHandle, x: i32, y: i32) -> Result<()> {
        let sprite = self.slot_mut(handle)?;
        sprite.set_y(y as u16);
        sprite.set_x(x as u16);
        Ok(())
    }

    /// Decoded `(x, y)` as stored in the descriptor.
    pub fn position(&self, handle: SpriteHandle) -> Result<(i32, i32)> {
        let sprite = self.sprite(handle)?;
        Ok((sprite.x() as i32, sprite.y() as i32))
    }

    pub fn move_by(&mut self, handle: SpriteHandle, dx: i32, dy: i32) -> Result<()> {
        let (x, y) = self.position(handle)?;
        self.set_position(handle, x + dx, y + dy)
    }

    pub fn set_horizontal_flip(&mut self, handle: SpriteHandle, flip: bool) -> Result<()> {
        self.slot_mut(handle)?.set_h_flip(flip);
        Ok(())
    }

    pub fn set_vertical_flip(&mut self, handle: SpriteHandle, flip: bool) -> Result<()> {
        self.slot_mut(handle)?.set_v_flip(flip);
        Ok(())
    }

    /// Point the sprite at another tile. Keeps the low 10 bits of `offset`.
    pub fn set_tile_offset(&mut self, handle: SpriteHandle, offset: u16) -> Result<()> {
        self.slot_mut(handle)?.set_tile(offset);
        Ok(())
    }

    /// Hide every sprite, forget every claim.
    ///
    /// Slots are re-encoded in full, so a reused slot never shows a stale
    /// size, tile or flip. Outstanding handles become stale.
    pub fn reset_all(&mut self) {
        self.sprites = [Sprite::HIDDEN; OAM_CAPACITY];
        for generation in self.generations.iter_mut() {
            *generation = generation.wrapping_add(1);
        }
        self.next = 0;
        self.free.clear();
        debug!("sprite table reset");
    }

    /// Copy the whole table to OAM. At most once per vblank.
    pub fn flush<H: Hardware>(&mut self, console: &mut Console<H>, frame: &Frame) -> Result<()> {
        if self.flushed == Some(frame.number) {
            return Err(Error::AlreadyFlushed { frame: frame.number });
        }

        let words: &[u16] = bytemuck::cast_slice(&self.sprites);
        console.transfer(OAM, words, TransferWidth::Half)?;
        self.flushed = Some(frame.number);
        Ok(())
    }

    /// Upload the sprite palette and tile sheet.
    pub fn load_sprite_sheet<H: Hardware>(&self, console: &mut Console<H>, sheet: &SpriteSheet<'_>) -> Result<()> {
        if sheet.palette.len() > PALETTE_SIZE {
            return Err(Error::ValueOutOfRange {
                field: Field::Palette,
                value: sheet.palette.len() as i32,
                max: PALETTE_SIZE as i32,
            });
        }
        if sheet.tiles.len() > MAX_TRANSFER {
            return Err(Error::ValueOutOfRange {
                field: Field::TileData,
                value: sheet.tiles.len() as i32,
                max: MAX_TRANSFER as i32,
            });
        }

        console.transfer(OBJ_PALETTE, sheet.palette, TransferWidth::Half)?;
        console.transfer(OBJ_TILES, sheet.tiles, TransferWidth::Half)?;
        info!(
            "sprite sheet loaded: {} colours, {} bytes of tiles",
            sheet.palette.len(),
            sheet.tiles.len() * 2
        );
        Ok(())
    }
}
