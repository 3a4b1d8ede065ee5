//! # Memory-Mapped Registers
//!
//! Addresses and flag types for the display, DMA and keypad registers.
//!
//! | Address       | Name     | Width | Description                                   |
//! |---------------|----------|-------|-----------------------------------------------|
//! | `$0400_0000`  | DISPCNT  | 16    | Display mode, layer enables ([`DisplayControl`]) |
//! | `$0400_0006`  | VCOUNT   | 16    | Current scanline (0-227, 160+ is vblank)      |
//! | `$0400_0008`  | BG0CNT   | 16    | Background 0 control ([`BgControl`](crate::video_dma::background::BgControl)) |
//! | `$0400_0010`  | BG0HOFS  | 16    | Background 0 horizontal scroll                |
//! | `$0400_0012`  | BG0VOFS  | 16    | Background 0 vertical scroll                  |
//! | `$0400_00D4`  | DMA3SAD  | 32    | DMA 3 source address                          |
//! | `$0400_00D8`  | DMA3DAD  | 32    | DMA 3 destination address                     |
//! | `$0400_00DC`  | DMA3CNT  | 32    | Count (low 16) and [`DmaFlags`] (high 16)     |
//! | `$0400_0130`  | KEYINPUT | 16    | Buttons, active-low ([`Buttons`])             |
//!
//! ## Video memory
//!
//! | Address       | Region                                           |
//! |---------------|--------------------------------------------------|
//! | `$0500_0000`  | Background palette, 256 × 15-bit colours        |
//! | `$0500_0200`  | Sprite palette, 256 × 15-bit colours            |
//! | `$0600_0000`  | VRAM: char blocks (16 KiB) / screen blocks (2 KiB) |
//! | `$0601_0000`  | Sprite tile data                                 |
//! | `$0700_0000`  | Object attribute memory, 128 × 4 half-words      |

pub const WIDTH: i32 = 240;
pub const HEIGHT: i32 = 160;

/// Total scanlines per refresh, visible and blank.
pub const SCANLINES: u16 = 228;

pub const PALETTE_SIZE: usize = 256;

pub const REG_DISPCNT: u32 = 0x0400_0000;
pub const REG_VCOUNT: u32 = 0x0400_0006;
pub const REG_BG0CNT: u32 = 0x0400_0008;
pub const REG_BG0HOFS: u32 = 0x0400_0010;
pub const REG_BG0VOFS: u32 = 0x0400_0012;
pub const REG_DMA3SAD: u32 = 0x0400_00D4;
pub const REG_DMA3DAD: u32 = 0x0400_00D8;
pub const REG_DMA3CNT: u32 = 0x0400_00DC;
pub const REG_KEYINPUT: u32 = 0x0400_0130;

pub const BG_PALETTE: u32 = 0x0500_0000;
pub const OBJ_PALETTE: u32 = 0x0500_0200;
pub const VRAM: u32 = 0x0600_0000;
pub const OBJ_TILES: u32 = 0x0601_0000;
pub const OAM: u32 = 0x0700_0000;

pub const CHAR_BLOCK_SIZE: u32 = 0x4000;
pub const SCREEN_BLOCK_SIZE: u32 = 0x800;

/// Base address of background tile block `block` (0-3).
#[inline(always)]
pub const fn char_block(block: u32) -> u32 {
    VRAM + block * CHAR_BLOCK_SIZE
}

/// Base address of tilemap block `block` (0-31).
#[inline(always)]
pub const fn screen_block(block: u32) -> u32 {
    VRAM + block * SCREEN_BLOCK_SIZE
}

bitflags::bitflags! {
    /// Display control word at `$0400_0000`.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct DisplayControl: u16 {
        /// Tiled mode 0: four regular backgrounds.
        const MODE0       = 0x0000;
        /// Sprite tiles are laid out linearly instead of in a 32×32 grid.
        const OBJ_MAP_1D  = 0x0040;
        const BG0_ENABLE  = 0x0100;
        const BG1_ENABLE  = 0x0200;
        const BG2_ENABLE  = 0x0400;
        const BG3_ENABLE  = 0x0800;
        const OBJ_ENABLE  = 0x1000;
    }

    /// High half of the DMA3 control word at `$0400_00DC`.
    ///
    /// The low 16 bits of the same word hold the element count, see
    /// [`dma_control_word`].
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct DmaFlags: u32 {
        /// Copy 32-bit words instead of 16-bit half-words.
        const WORD   = 0x0400_0000;
        /// Raise an interrupt when the transfer completes.
        const IRQ    = 0x4000_0000;
        /// Start the transfer. Hardware clears it on completion.
        const ENABLE = 0x8000_0000;
    }

    /// Keypad bits as read from `$0400_0130`, after inverting the active-low
    /// raw value: a set bit means pressed.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Buttons: u16 {
        const A      = 1 << 0;
        const B      = 1 << 1;
        const SELECT = 1 << 2;
        const START  = 1 << 3;
        const RIGHT  = 1 << 4;
        const LEFT   = 1 << 5;
        const UP     = 1 << 6;
        const DOWN   = 1 << 7;
        const R      = 1 << 8;
        const L      = 1 << 9;
    }
}

/// Packs an element count and flags into one DMA3 control word.
#[inline(always)]
pub const fn dma_control_word(count: u16, flags: DmaFlags) -> u32 {
    count as u32 | flags.bits()
}

impl Buttons {
    /// Decode the active-low KEYINPUT register.
    #[inline]
    pub const fn from_keyinput(raw: u16) -> Self {
        Buttons::from_bits_truncate(!raw)
    }

    /// Encode back to the active-low register form. Unused high bits read as 1.
    #[inline]
    pub const fn to_keyinput(self) -> u16 {
        !self.bits()
    }
}
