//! Recording stand-in for the hardware, used by unit tests.

use std::{collections::HashMap, vec::Vec};

use crate::{
    console::Console,
    hw::Hardware,
    scr::{Buttons, DmaFlags, REG_KEYINPUT, REG_VCOUNT, SCANLINES},
    video_dma::{TransferPolicy, vsync::SyncMode},
};

#[derive(Debug, Clone)]
pub struct Transfer {
    pub destination: u32,
    pub control: u32,
    pub data: Vec<u16>,
}

#[derive(Debug, Default)]
pub struct FakeHw {
    regs: HashMap<u32, u16>,
    keys: u16,
    /// Next scanline VCOUNT will report. Advances by one per read.
    pub vcount: u16,
    pub vcount_reads: u32,
    pub transfers: Vec<Transfer>,
    /// Every 32-bit store, in order.
    pub word_writes: Vec<(u32, u32)>,
    /// Remaining `transfer_busy` polls that report busy.
    pub busy_polls: u32,
    /// Busy polls each new transfer costs.
    pub latency: u32,
    pub delayed: u64,
}

impl FakeHw {
    pub fn new() -> Self {
        Self {
            keys: 0xFFFF,
            ..Default::default()
        }
    }

    pub fn hold(&mut self, buttons: Buttons) {
        self.keys = buttons.to_keyinput();
    }

    pub fn reg(&self, address: u32) -> u16 {
        self.regs.get(&address).copied().unwrap_or(0)
    }
}

impl Hardware for FakeHw {
    fn read_u16(&mut self, address: u32) -> u16 {
        match address {
            REG_VCOUNT => {
                let line = self.vcount;
                self.vcount = (self.vcount + 1) % SCANLINES;
                self.vcount_reads += 1;
                line
            }
            REG_KEYINPUT => self.keys,
            _ => self.reg(address),
        }
    }

    fn write_u16(&mut self, address: u32, value: u16) {
        self.regs.insert(address, value);
    }

    fn write_u32(&mut self, address: u32, value: u32) {
        self.word_writes.push((address, value));
        self.regs.insert(address, value as u16);
        self.regs.insert(address + 2, (value >> 16) as u16);
    }

    fn start_transfer(&mut self, destination: u32, source: &[u16], control: u32) {
        let mut count = (control & 0xFFFF) as usize;
        if control & DmaFlags::WORD.bits() != 0 {
            count *= 2;
        }
        self.transfers.push(Transfer {
            destination,
            control,
            data: source[..count].to_vec(),
        });
        self.busy_polls = self.latency;
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
        self.delayed += ticks as u64;
    }
}

pub fn fake_console() -> Console<FakeHw> {
    Console::init(FakeHw::new(), SyncMode::Edge, TransferPolicy::Reject)
}
