use std::fmt;

use log::{debug, trace, warn};
use shambles::{
    hw::Hardware,
    scr::{BG_PALETTE, Buttons, DmaFlags, OAM, REG_DMA3CNT, REG_KEYINPUT, REG_VCOUNT, SCANLINES, VRAM},
    video_dma::oam::{OAM_CAPACITY, Sprite},
};

pub const IO_BASE: u32 = 0x0400_0000;
pub const IO_SIZE: usize = 0x400;
pub const PALETTE_SIZE: usize = 0x400;
pub const VRAM_SIZE: usize = 0x18000;
pub const OAM_SIZE: usize = OAM_CAPACITY * 8;

/// First scanline of vertical blank.
pub const VBLANK_LINE: u16 = 160;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Region {
    Io,
    Palette,
    Vram,
    Oam,
}

/// One DMA3 start as the bus saw it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TransferRecord {
    pub destination: u32,
    pub control: u32,
    /// Half-words copied.
    pub len: usize,
    /// Scanline the transfer started on.
    pub line: u16,
}

/// Host-side stand-in for the console: register file, video memory and a
/// scanline counter that advances one line per VCOUNT read.
pub struct SimBus {
    // heap allocations, VRAM alone is 96 KiB
    io: Box<[u16]>,
    palette: Box<[u16]>,
    vram: Box<[u16]>,
    oam: Box<[u16]>,

    line: u16,
    keys: Buttons,

    /// Busy polls each transfer costs.
    pub dma_latency: u32,
    busy_polls: u32,

    pub transfers: Vec<TransferRecord>,
    pub overlapping_transfers: u32,
    pub vblanks: u64,
    pub delay_ticks: u64,
    pub unmapped_accesses: u32,
}

impl Default for SimBus {
    fn default() -> Self {
        Self {
            io: vec![0; IO_SIZE / 2].into_boxed_slice(),
            palette: vec![0; PALETTE_SIZE / 2].into_boxed_slice(),
            vram: vec![0; VRAM_SIZE / 2].into_boxed_slice(),
            oam: vec![0; OAM_SIZE / 2].into_boxed_slice(),
            line: 0,
            keys: Buttons::empty(),
            dma_latency: 0,
            busy_polls: 0,
            transfers: Vec::new(),
            overlapping_transfers: 0,
            vblanks: 0,
            delay_ticks: 0,
            unmapped_accesses: 0,
        }
    }
}

impl fmt::Debug for SimBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimBus")
            .field("line", &self.line)
            .field("keys", &self.keys)
            .field("vblanks", &self.vblanks)
            .field("transfers", &self.transfers.len())
            .field("delay_ticks", &self.delay_ticks)
            .finish_non_exhaustive()
    }
}

fn decode(address: u32) -> Option<(Region, usize)> {
    let (region, base, size) = match address {
        0x0400_0000..=0x0400_03FF => (Region::Io, IO_BASE, IO_SIZE),
        0x0500_0000..=0x0500_03FF => (Region::Palette, BG_PALETTE, PALETTE_SIZE),
        0x0600_0000..=0x0601_7FFF => (Region::Vram, VRAM, VRAM_SIZE),
        0x0700_0000..=0x0700_03FF => (Region::Oam, OAM, OAM_SIZE),
        _ => return None,
    };
    let offset = (address - base) as usize;
    (offset < size).then_some((region, offset / 2))
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dma_latency(latency: u32) -> Self {
        Self {
            dma_latency: latency,
            ..Self::default()
        }
    }

    pub fn hold(&mut self, buttons: Buttons) {
        self.keys |= buttons;
    }

    pub fn release(&mut self, buttons: Buttons) {
        self.keys.remove(buttons);
    }

    pub fn held(&self) -> Buttons {
        self.keys
    }

    pub fn line(&self) -> u16 {
        self.line
    }

    fn region(&self, region: Region) -> &[u16] {
        match region {
            Region::Io => &self.io,
            Region::Palette => &self.palette,
            Region::Vram => &self.vram,
            Region::Oam => &self.oam,
        }
    }

    fn region_mut(&mut self, region: Region) -> &mut [u16] {
        match region {
            Region::Io => &mut self.io,
            Region::Palette => &mut self.palette,
            Region::Vram => &mut self.vram,
            Region::Oam => &mut self.oam,
        }
    }

    /// Read memory without side effects. Registers report their stored value.
    pub fn peek_u16(&self, address: u32) -> u16 {
        match address {
            REG_VCOUNT => self.line,
            REG_KEYINPUT => self.keys.to_keyinput(),
            _ => match decode(address) {
                Some((region, index)) => self.region(region)[index],
                None => 0,
            },
        }
    }

    /// Sprite descriptors as last copied into OAM.
    pub fn sprites(&self) -> &[Sprite] {
        bytemuck::cast_slice(&self.oam[..])
    }

    pub fn palette(&self) -> &[u16] {
        &self.palette
    }

    pub fn vram(&self) -> &[u16] {
        &self.vram
    }

    fn advance_line(&mut self) {
        self.line = (self.line + 1) % SCANLINES;
        if self.line == VBLANK_LINE {
            self.vblanks += 1;
            trace!("vblank {}", self.vblanks);
        }
    }

    fn store(&mut self, address: u32, value: u16) {
        match decode(address) {
            Some((region, index)) => self.region_mut(region)[index] = value,
            None => {
                self.unmapped_accesses += 1;
                warn!("write to unmapped ${:08X}={:04X}", address, value);
            }
        }
    }
}

impl Hardware for SimBus {
    fn read_u16(&mut self, address: u32) -> u16 {
        match address {
            REG_VCOUNT => {
                let line = self.line;
                self.advance_line();
                line
            }
            REG_KEYINPUT => self.keys.to_keyinput(),
            _ => match decode(address) {
                Some((region, index)) => self.region(region)[index],
                None => {
                    self.unmapped_accesses += 1;
                    warn!("read from unmapped ${:08X}", address);
                    0
                }
            },
        }
    }

    fn write_u16(&mut self, address: u32, value: u16) {
        if address == REG_VCOUNT || address == REG_KEYINPUT {
            debug!("ignored write to read-only ${:08X}", address);
            return;
        }
        self.store(address, value);
    }

    fn write_u32(&mut self, address: u32, value: u32) {
        self.write_u16(address, value as u16);
        self.write_u16(address + 2, (value >> 16) as u16);
    }

    fn start_transfer(&mut self, destination: u32, source: &[u16], control: u32) {
        if self.busy_polls > 0 {
            self.overlapping_transfers += 1;
            warn!("DMA3 restarted while busy ({} polls left)", self.busy_polls);
        }

        let mut len = (control & 0xFFFF) as usize;
        if control & DmaFlags::WORD.bits() != 0 {
            len *= 2;
        }
        if len > source.len() {
            warn!("DMA3 count {} exceeds source of {} half-words, clamping", len, source.len());
            len = source.len();
        }

        for (i, value) in source[..len].iter().enumerate() {
            self.store(destination + 2 * i as u32, *value);
        }
        self.write_u32(REG_DMA3CNT, control);

        self.transfers.push(TransferRecord {
            destination,
            control,
            len,
            line: self.line,
        });
        self.busy_polls = self.dma_latency;
        debug!("DMA3 ${:08X} <- {} half-words", destination, len);
    }

    fn transfer_busy(&mut self) -> bool {
        if self.busy_polls > 0 {
            self.busy_polls -= 1;
            true
        } else {
            false
        }
    }

    fn delay(&mut self, ticks: u32) {
        self.delay_ticks += ticks as u64;
    }
}
