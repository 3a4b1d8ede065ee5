//! # Memory-Mapped I/O
//!
//! The [`Hardware`] implementation used on the real console. Register
//! accesses are volatile pointer reads and writes; DMA3 is driven through a
//! register block overlaid at `$0400_00D4`.
//!
//! ```ignore
//! let hw = unsafe { Mmio::new() };
//! let mut game = Game::boot(hw, GameConfig::default(), &ASSETS, summon, rng)?;
//! game.run()?;
//! ```

use volatile_register::{RW, WO};

use crate::{
    hw::Hardware,
    scr::{DmaFlags, REG_DMA3SAD},
};

/// DMA channel 3 register layout at `$0400_00D4-$0400_00DF`.
#[repr(C)]
pub struct Dma3 {
    /// Source address.
    pub sad: WO<u32>,
    /// Destination address.
    pub dad: WO<u32>,
    /// Count (low 16 bits) and [`DmaFlags`] (high 16 bits).
    pub cnt: RW<u32>,
}

impl Dma3 {
    #[inline(always)]
    unsafe fn new() -> &'static mut Dma3 {
        unsafe { &mut *(REG_DMA3SAD as *mut Dma3) }
    }
}

/// Direct access to the console's registers.
pub struct Mmio {
    dma3: &'static mut Dma3,
}

impl Mmio {
    /// # Safety
    ///
    /// Only valid on the target console, and only one `Mmio` may exist.
    pub unsafe fn new() -> Self {
        Self {
            dma3: unsafe { Dma3::new() },
        }
    }
}

impl Hardware for Mmio {
    #[inline(always)]
    fn read_u16(&mut self, address: u32) -> u16 {
        unsafe { core::ptr::read_volatile(address as *const u16) }
    }

    #[inline(always)]
    fn write_u16(&mut self, address: u32, value: u16) {
        unsafe { core::ptr::write_volatile(address as *mut u16, value) }
    }

    #[inline(always)]
    fn write_u32(&mut self, address: u32, value: u32) {
        unsafe { core::ptr::write_volatile(address as *mut u32, value) }
    }

    #[inline(always)]
    fn start_transfer(&mut self, destination: u32, source: &[u16], control: u32) {
        unsafe {
            self.dma3.sad.write(source.as_ptr() as u32);
            self.dma3.dad.write(destination);
            self.dma3.cnt.write(control);
        }
    }

    #[inline(always)]
    fn transfer_busy(&mut self) -> bool {
        self.dma3.cnt.read() & DmaFlags::ENABLE.bits() != 0
    }
}
